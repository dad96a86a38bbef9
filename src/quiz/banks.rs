use super::Question;

pub static QUIZ: &[Question] = &[
    Question {
        text: "What is the worst-case time complexity of bubble sort?",
        options: &["O(n)", "O(n log n)", "O(n^2)", "O(log n)"],
        correct: 2,
        explanation: "Each of the n-1 passes compares up to n-1 adjacent pairs.",
    },
    Question {
        text: "After the first pass of bubble sort, which element is guaranteed to be in its final position?",
        options: &[
            "The smallest element",
            "The largest element",
            "The middle element",
            "No element",
        ],
        correct: 1,
        explanation: "The largest element bubbles all the way to the end during the first pass.",
    },
    Question {
        text: "How many comparisons does bubble sort make on an array of 5 elements (without early exit)?",
        options: &["4", "5", "10", "25"],
        correct: 2,
        explanation: "4 + 3 + 2 + 1 = 10 comparisons.",
    },
    Question {
        text: "Is bubble sort a stable sorting algorithm?",
        options: &[
            "Yes, equal elements keep their relative order",
            "No, equal elements may be reordered",
        ],
        correct: 0,
        explanation: "Only strictly greater neighbours are swapped, so equal elements never pass each other.",
    },
    Question {
        text: "What extra memory does bubble sort need?",
        options: &["O(1)", "O(log n)", "O(n)", "O(n^2)"],
        correct: 0,
        explanation: "It sorts in place using a single temporary for swaps.",
    },
];

pub static PRETEST: &[Question] = &[
    Question {
        text: "What does it mean for an array to be sorted in ascending order?",
        options: &[
            "Every element is smaller than or equal to the next one",
            "Every element is larger than the next one",
            "The first and last elements are equal",
            "The elements are all distinct",
        ],
        correct: 0,
        explanation: "Ascending order means a[i] <= a[i + 1] for every valid i.",
    },
    Question {
        text: "Which operation exchanges the values stored at two array positions?",
        options: &["Insert", "Swap", "Merge", "Partition"],
        correct: 1,
        explanation: "A swap exchanges two values, usually through a temporary variable.",
    },
    Question {
        text: "What is the index of the last element of an array of length n (0-based)?",
        options: &["n", "n + 1", "n - 1", "1"],
        correct: 2,
        explanation: "Indices run from 0 to n - 1.",
    },
    Question {
        text: "How many times does the body of `for (int i = 0; i < 4; i++)` run?",
        options: &["3", "4", "5", "Forever"],
        correct: 1,
        explanation: "i takes the values 0, 1, 2 and 3.",
    },
];

pub static POSTTEST: &[Question] = &[
    Question {
        text: "Given [5, 3, 8, 4, 2], what does the array look like after the first pass of bubble sort?",
        options: &[
            "[3, 5, 4, 2, 8]",
            "[2, 3, 4, 5, 8]",
            "[3, 5, 8, 4, 2]",
            "[5, 3, 4, 2, 8]",
        ],
        correct: 0,
        explanation: "5 and 3 swap, 8 bubbles past 4 and 2, ending at the last position.",
    },
    Question {
        text: "What is the best-case time complexity of bubble sort with the early-exit optimization?",
        options: &["O(1)", "O(n)", "O(n log n)", "O(n^2)"],
        correct: 1,
        explanation: "On sorted input a single pass without swaps is enough to stop.",
    },
    Question {
        text: "How many swaps does bubble sort perform on an array that is already sorted?",
        options: &["0", "1", "n - 1", "n"],
        correct: 0,
        explanation: "No adjacent pair is out of order, so nothing is swapped.",
    },
    Question {
        text: "The number of swaps bubble sort performs equals the number of ...",
        options: &[
            "passes",
            "inversions in the input",
            "distinct values",
            "comparisons",
        ],
        correct: 1,
        explanation: "Each adjacent swap removes exactly one inversion.",
    },
    Question {
        text: "Which input makes bubble sort perform the most swaps?",
        options: &[
            "An already sorted array",
            "An array of equal values",
            "A reverse-sorted array",
            "A random array",
        ],
        correct: 2,
        explanation: "Every pair is an inversion, giving n(n-1)/2 swaps.",
    },
];
