//! Array storage
//!
//! Every array the program creates (the graded input and each local array
//! declaration) is one block of cells. Cells are `None` until written. The
//! number of cells alive at once is capped. A local array's block is freed
//! when its declaring scope ends and its slot is reused by later allocations.

use super::value::ArrayRef;
use thiserror::Error;

/// Default cap on allocated cells
pub const DEFAULT_MAX_CELLS: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("allocation of {requested} cells exceeds the limit of {limit}")]
    OutOfMemory { requested: usize, limit: usize },

    #[error("index {index} out of bounds for array of size {size}")]
    OutOfBounds { index: i64, size: usize },

    #[error("invalid array handle #{0}")]
    InvalidRef(usize),
}

#[derive(Debug, Clone)]
pub struct ArrayHeap {
    /// `None` marks a freed slot
    blocks: Vec<Option<Vec<Option<i32>>>>,
    free_slots: Vec<usize>,
    cells_in_use: usize,
    max_cells: usize,
}

impl ArrayHeap {
    pub fn new(max_cells: usize) -> Self {
        ArrayHeap {
            blocks: Vec::new(),
            free_slots: Vec::new(),
            cells_in_use: 0,
            max_cells,
        }
    }

    /// Allocate `len` uninitialized cells. The cap is checked before any
    /// host memory is reserved.
    pub fn allocate(&mut self, len: usize) -> Result<ArrayRef, HeapError> {
        let requested = self.cells_in_use.saturating_add(len);
        if requested > self.max_cells {
            return Err(HeapError::OutOfMemory {
                requested: len,
                limit: self.max_cells,
            });
        }
        self.cells_in_use = requested;

        let block = Some(vec![None; len]);
        match self.free_slots.pop() {
            Some(slot) => {
                self.blocks[slot] = block;
                Ok(ArrayRef(slot))
            }
            None => {
                self.blocks.push(block);
                Ok(ArrayRef(self.blocks.len() - 1))
            }
        }
    }

    /// Release a block; its handle becomes invalid
    pub fn free(&mut self, array: ArrayRef) -> Result<(), HeapError> {
        let block = self
            .blocks
            .get_mut(array.0)
            .and_then(Option::take)
            .ok_or(HeapError::InvalidRef(array.0))?;
        self.cells_in_use -= block.len();
        self.free_slots.push(array.0);
        Ok(())
    }

    /// Cells held by live blocks
    pub fn cells_in_use(&self) -> usize {
        self.cells_in_use
    }

    /// Write `value` into every cell from `start` to the end of the block
    pub fn fill_from(&mut self, array: ArrayRef, start: usize, value: i32) -> Result<(), HeapError> {
        let block = self.block_mut(array)?;
        for cell in block.iter_mut().skip(start) {
            *cell = Some(value);
        }
        Ok(())
    }

    /// Allocate a block holding `values`
    pub fn allocate_from(&mut self, values: &[i32]) -> Result<ArrayRef, HeapError> {
        let array = self.allocate(values.len())?;
        let block = self.block_mut(array)?;
        for (cell, v) in block.iter_mut().zip(values) {
            *cell = Some(*v);
        }
        Ok(array)
    }

    pub fn len(&self, array: ArrayRef) -> Result<usize, HeapError> {
        Ok(self.block(array)?.len())
    }

    /// Read one cell; `Ok(None)` means it was never written
    pub fn read(&self, array: ArrayRef, index: i64) -> Result<Option<i32>, HeapError> {
        let block = self.block(array)?;
        let slot = Self::slot(index, block.len())?;
        Ok(block[slot])
    }

    pub fn write(&mut self, array: ArrayRef, index: i64, value: i32) -> Result<(), HeapError> {
        let block = self.block_mut(array)?;
        let slot = Self::slot(index, block.len())?;
        block[slot] = Some(value);
        Ok(())
    }

    pub fn swap(&mut self, array: ArrayRef, i: i64, j: i64) -> Result<(), HeapError> {
        let block = self.block_mut(array)?;
        let a = Self::slot(i, block.len())?;
        let b = Self::slot(j, block.len())?;
        block.swap(a, b);
        Ok(())
    }

    /// Copy of a whole block
    pub fn contents(&self, array: ArrayRef) -> Result<Vec<Option<i32>>, HeapError> {
        Ok(self.block(array)?.clone())
    }

    fn block(&self, array: ArrayRef) -> Result<&Vec<Option<i32>>, HeapError> {
        self.blocks
            .get(array.0)
            .and_then(Option::as_ref)
            .ok_or(HeapError::InvalidRef(array.0))
    }

    fn block_mut(&mut self, array: ArrayRef) -> Result<&mut Vec<Option<i32>>, HeapError> {
        self.blocks
            .get_mut(array.0)
            .and_then(Option::as_mut)
            .ok_or(HeapError::InvalidRef(array.0))
    }

    fn slot(index: i64, size: usize) -> Result<usize, HeapError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < size)
            .ok_or(HeapError::OutOfBounds { index, size })
    }
}

impl Default for ArrayHeap {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CELLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_access() {
        let mut heap = ArrayHeap::new(16);
        let a = heap.allocate_from(&[3, 1, 2]).unwrap();
        assert_eq!(heap.len(a).unwrap(), 3);
        assert_eq!(heap.read(a, 0).unwrap(), Some(3));

        heap.write(a, 2, 9).unwrap();
        heap.swap(a, 0, 2).unwrap();
        assert_eq!(heap.contents(a).unwrap(), vec![Some(9), Some(1), Some(3)]);
    }

    #[test]
    fn test_uninitialized_cells() {
        let mut heap = ArrayHeap::new(16);
        let a = heap.allocate(2).unwrap();
        assert_eq!(heap.read(a, 1).unwrap(), None);
    }

    #[test]
    fn test_bounds_and_limits() {
        let mut heap = ArrayHeap::new(4);
        let a = heap.allocate(3).unwrap();
        assert_eq!(
            heap.read(a, 3),
            Err(HeapError::OutOfBounds { index: 3, size: 3 })
        );
        assert_eq!(
            heap.write(a, -1, 0),
            Err(HeapError::OutOfBounds { index: -1, size: 3 })
        );
        assert_eq!(
            heap.allocate(2),
            Err(HeapError::OutOfMemory { requested: 2, limit: 4 })
        );
        assert_eq!(heap.read(ArrayRef(7), 0), Err(HeapError::InvalidRef(7)));
    }

    #[test]
    fn test_free_returns_cells_and_reuses_slot() {
        let mut heap = ArrayHeap::new(4);
        let a = heap.allocate(3).unwrap();
        assert!(heap.allocate(3).is_err());

        heap.free(a).unwrap();
        assert_eq!(heap.cells_in_use(), 0);
        assert_eq!(heap.read(a, 0), Err(HeapError::InvalidRef(a.0)));
        assert_eq!(heap.free(a), Err(HeapError::InvalidRef(a.0)));

        let b = heap.allocate(4).unwrap();
        assert_eq!(b, a);
        assert_eq!(heap.cells_in_use(), 4);
    }

    #[test]
    fn test_huge_request_rejected_before_reserving() {
        let mut heap = ArrayHeap::default();
        assert_eq!(
            heap.allocate(2_000_000_000),
            Err(HeapError::OutOfMemory {
                requested: 2_000_000_000,
                limit: DEFAULT_MAX_CELLS
            })
        );
        assert_eq!(heap.cells_in_use(), 0);
    }

    #[test]
    fn test_fill_from() {
        let mut heap = ArrayHeap::new(8);
        let a = heap.allocate(4).unwrap();
        heap.write(a, 0, 7).unwrap();
        heap.fill_from(a, 1, 0).unwrap();
        assert_eq!(heap.contents(a).unwrap(), vec![Some(7), Some(0), Some(0), Some(0)]);
    }
}
