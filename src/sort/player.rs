//! Step playback for the demo animation.
//!
//! [`StepPlayer`] owns a precomputed trace and a cursor into it. Events are
//! applied one at a time, either by manual advance ([`StepPlayer::step_forward`])
//! or by automatic playback on a fixed interval. The two modes are mutually
//! exclusive: while automatic playback runs, manual advance is refused.
//!
//! Automatic playback has two drivers:
//! - [`StepPlayer::tick`], polled from an event loop that already owns the
//!   clock; the TUI's demo tab uses this one;
//! - [`StepPlayer::run_autoplay`], the headless driver for library callers
//!   without an event loop. It runs on a tokio interval and can be paused
//!   between any two steps through a watch channel.

use super::steps::{generate_steps_with, GeneratorOptions, Step};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Default delay between two automatic steps
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Errors returned by playback operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("automatic playback is running; pause it before stepping manually")]
    AutoPlayActive,

    #[error("the trace has been fully replayed")]
    Finished,
}

/// How a call to [`StepPlayer::run_autoplay`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    Paused,
    Finished,
}

/// Indices currently emphasized by the visualization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    /// Index being examined
    pub current: Option<usize>,
    /// Index it is compared against
    pub compared: Option<usize>,
}

/// Replays a bubble sort trace against a working copy of the array
#[derive(Debug, Clone)]
pub struct StepPlayer {
    original: Vec<i32>,
    array: Vec<i32>,
    steps: Vec<Step>,
    cursor: usize,
    playing: bool,
    highlight: Highlight,
    sorted: BTreeSet<usize>,
    interval: Duration,
    options: GeneratorOptions,
    last_tick: Option<Instant>,
    comparisons: usize,
    swaps: usize,
}

impl StepPlayer {
    /// Create a player for `values` using the base trace.
    pub fn new(values: Vec<i32>, interval: Duration) -> Self {
        Self::with_options(values, interval, GeneratorOptions::default())
    }

    pub fn with_options(values: Vec<i32>, interval: Duration, options: GeneratorOptions) -> Self {
        let steps = generate_steps_with(&values, options);
        StepPlayer {
            array: values.clone(),
            original: values,
            steps,
            cursor: 0,
            playing: false,
            highlight: Highlight::default(),
            sorted: BTreeSet::new(),
            interval,
            options,
            last_tick: None,
            comparisons: 0,
            swaps: 0,
        }
    }

    /// Replace the array and regenerate the trace. Playback stops.
    pub fn load(&mut self, values: Vec<i32>) {
        tracing::debug!(len = values.len(), "loading new array into player");
        *self = Self::with_options(values, self.interval, self.options);
    }

    /// Switch between the base and the early-exit trace, restarting playback.
    pub fn set_options(&mut self, options: GeneratorOptions) {
        self.options = options;
        let values = self.original.clone();
        self.load(values);
    }

    /// Restart from the original array.
    pub fn reset(&mut self) {
        self.array = self.original.clone();
        self.cursor = 0;
        self.playing = false;
        self.highlight = Highlight::default();
        self.sorted.clear();
        self.last_tick = None;
        self.comparisons = 0;
        self.swaps = 0;
    }

    /// Manual "Next Step".
    pub fn step_forward(&mut self) -> Result<Step, PlayerError> {
        if self.playing {
            return Err(PlayerError::AutoPlayActive);
        }
        self.advance().ok_or(PlayerError::Finished)
    }

    /// Start automatic playback. The first step is due immediately.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        if self.is_finished() {
            return Err(PlayerError::Finished);
        }
        self.playing = true;
        self.last_tick = None;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Toggle automatic playback; returns whether it is now running.
    pub fn toggle(&mut self) -> Result<bool, PlayerError> {
        if self.playing {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.playing)
    }

    /// Timer hook for a polling event loop.
    ///
    /// Applies at most one step per call, and only once `interval` has elapsed
    /// since the previous automatic step.
    pub fn tick(&mut self, now: Instant) -> Option<Step> {
        if !self.playing {
            return None;
        }
        let due = match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if !due {
            return None;
        }
        self.last_tick = Some(now);
        self.advance()
    }

    /// Play automatically until the trace ends or `pause` turns `true`.
    ///
    /// Returns [`PlaybackEnd::Paused`] without stepping if the signal is already
    /// set. The cursor is kept, so a later call resumes where this one stopped.
    pub async fn run_autoplay(
        &mut self,
        pause: &mut watch::Receiver<bool>,
    ) -> Result<PlaybackEnd, PlayerError> {
        if *pause.borrow_and_update() {
            return Ok(PlaybackEnd::Paused);
        }
        self.play()?;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut signal_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.advance();
                    if self.is_finished() {
                        return Ok(PlaybackEnd::Finished);
                    }
                }
                changed = pause.changed(), if signal_open => {
                    match changed {
                        Ok(()) => {
                            if *pause.borrow_and_update() {
                                self.pause();
                                tracing::debug!(cursor = self.cursor, "autoplay paused");
                                return Ok(PlaybackEnd::Paused);
                            }
                        }
                        // Nobody can pause us any more; play to the end
                        Err(_) => signal_open = false,
                    }
                }
            }
        }
    }

    fn advance(&mut self) -> Option<Step> {
        let step = *self.steps.get(self.cursor)?;
        self.apply(step);
        self.cursor += 1;

        if self.is_finished() {
            self.playing = false;
            self.highlight = Highlight::default();
        }
        Some(step)
    }

    fn apply(&mut self, step: Step) {
        match step {
            Step::Compare(i, j) => {
                self.highlight = Highlight {
                    current: Some(i),
                    compared: Some(j),
                };
                self.comparisons += 1;
            }
            Step::Swap(i, j) => {
                self.array.swap(i, j);
                self.highlight = Highlight {
                    current: Some(i),
                    compared: Some(j),
                };
                self.swaps += 1;
            }
            Step::MarkSorted(i) => {
                self.sorted.insert(i);
                self.highlight = Highlight::default();
            }
        }
    }

    pub fn array(&self) -> &[i32] {
        &self.array
    }

    pub fn original(&self) -> &[i32] {
        &self.original
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The most recently applied step
    pub fn last_step(&self) -> Option<Step> {
        self.cursor.checked_sub(1).and_then(|i| self.steps.get(i).copied())
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn sorted(&self) -> &BTreeSet<usize> {
        &self.sorted
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    pub fn swaps(&self) -> usize {
        self.swaps
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::steps::reference_sort;

    fn player(values: &[i32]) -> StepPlayer {
        StepPlayer::new(values.to_vec(), DEFAULT_INTERVAL)
    }

    #[test]
    fn test_manual_stepping_sorts() {
        let mut p = player(&[5, 3, 8, 4, 2]);
        assert_eq!(p.step_forward(), Ok(Step::Compare(0, 1)));
        assert_eq!(
            p.highlight(),
            Highlight {
                current: Some(0),
                compared: Some(1)
            }
        );
        assert_eq!(p.step_forward(), Ok(Step::Swap(0, 1)));
        assert_eq!(&p.array()[..2], &[3, 5]);

        while p.step_forward().is_ok() {}
        assert!(p.is_finished());
        assert_eq!(p.array(), reference_sort(&[5, 3, 8, 4, 2]).as_slice());
        assert_eq!(p.sorted().len(), 5);
        assert_eq!(p.highlight(), Highlight::default());
        assert_eq!(p.step_forward(), Err(PlayerError::Finished));
    }

    #[test]
    fn test_manual_step_refused_while_playing() {
        let mut p = player(&[2, 1]);
        p.play().unwrap();
        assert_eq!(p.step_forward(), Err(PlayerError::AutoPlayActive));
        p.pause();
        assert!(p.step_forward().is_ok());
    }

    #[test]
    fn test_tick_respects_interval() {
        let mut p = player(&[3, 2, 1]);
        let start = Instant::now();
        p.play().unwrap();

        assert_eq!(p.tick(start), Some(Step::Compare(0, 1)));
        assert_eq!(p.tick(start + Duration::from_millis(400)), None);
        assert_eq!(p.tick(start + Duration::from_millis(1000)), Some(Step::Swap(0, 1)));
        assert_eq!(p.cursor(), 2);
    }

    #[test]
    fn test_tick_stops_at_end() {
        let mut p = player(&[1]);
        let start = Instant::now();
        p.play().unwrap();
        assert_eq!(p.tick(start), Some(Step::MarkSorted(0)));
        assert!(!p.is_playing());
        assert_eq!(p.play(), Err(PlayerError::Finished));
    }

    #[test]
    fn test_paused_player_ignores_ticks() {
        let mut p = player(&[2, 1]);
        assert_eq!(p.tick(Instant::now()), None);
        assert_eq!(p.cursor(), 0);
    }

    #[test]
    fn test_reset_restores_original() {
        let mut p = player(&[4, 3, 2, 1]);
        for _ in 0..5 {
            p.step_forward().unwrap();
        }
        p.reset();
        assert_eq!(p.array(), &[4, 3, 2, 1]);
        assert_eq!(p.cursor(), 0);
        assert!(p.sorted().is_empty());
        assert_eq!(p.swaps(), 0);
    }

    #[test]
    fn test_load_replaces_trace() {
        let mut p = player(&[2, 1]);
        p.step_forward().unwrap();
        p.load(vec![1, 2, 3]);
        assert_eq!(p.cursor(), 0);
        assert_eq!(p.original(), &[1, 2, 3]);
        assert_eq!(p.steps()[0], Step::Compare(0, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_runs_to_end() {
        let mut p = player(&[2, 1]);
        let (_tx, mut rx) = watch::channel(false);
        let start = tokio::time::Instant::now();

        let end = p.run_autoplay(&mut rx).await.unwrap();

        assert_eq!(end, PlaybackEnd::Finished);
        assert_eq!(p.array(), &[1, 2]);
        // Four steps, first one immediate
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_pause_and_resume() {
        let mut p = player(&[3, 2, 1]);
        let (tx, mut rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            let _ = tx.send(true);
        });

        let end = p.run_autoplay(&mut rx).await.unwrap();
        assert_eq!(end, PlaybackEnd::Paused);
        assert_eq!(p.cursor(), 2);
        assert!(!p.is_playing());

        let (_tx, mut rx) = watch::channel(false);
        let end = p.run_autoplay(&mut rx).await.unwrap();
        assert_eq!(end, PlaybackEnd::Finished);
        assert_eq!(p.array(), &[1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_respects_initial_pause() {
        let mut p = player(&[2, 1]);
        let (_tx, mut rx) = watch::channel(true);
        assert_eq!(p.run_autoplay(&mut rx).await, Ok(PlaybackEnd::Paused));
        assert_eq!(p.cursor(), 0);
    }
}
