//! Lab assistant: keyword-matched canned answers

struct Topic {
    keywords: &'static [&'static str],
    answer: &'static str,
}

/// Checked in order; the first topic with a keyword in the question wins
static TOPICS: &[Topic] = &[
    Topic {
        keywords: &["complexity", "big o", "o(n", "how fast", "slow"],
        answer: "Bubble sort makes O(n^2) comparisons in the worst and average case. \
                 With the early-exit optimization the best case (already sorted input) is O(n).",
    },
    Topic {
        keywords: &["stable", "stability"],
        answer: "Bubble sort is stable: it only swaps neighbours that are strictly out of order, \
                 so equal elements never pass each other.",
    },
    Topic {
        keywords: &["early exit", "optimiz", "optimis", "flag", "no swap"],
        answer: "If a whole pass makes no swap the array is already sorted, so the algorithm can stop. \
                 Toggle early exit on the Demo tab with 'e' to see it.",
    },
    Topic {
        keywords: &["pass", "largest", "bubble up", "end of the array"],
        answer: "Each pass walks the unsorted part left to right and carries the largest remaining \
                 element to the end, where it is marked sorted.",
    },
    Topic {
        keywords: &["swap", "exchange"],
        answer: "Two neighbours are swapped when the left one is greater than the right one. \
                 In the Practice tab, select the pair bubble sort would swap next.",
    },
    Topic {
        keywords: &["grade", "submit", "test", "editor", "code", "exercise"],
        answer: "Write `void bubble_sort(int arr[], int n)` in the Exercise tab and press Ctrl+R. \
                 Your function must sort arr in place; it is checked against a reference sort.",
    },
    Topic {
        keywords: &["memory", "space", "in place", "in-place"],
        answer: "Bubble sort sorts in place and needs only O(1) extra memory for the temporary used in a swap.",
    },
    Topic {
        keywords: &["quiz", "pretest", "posttest", "score"],
        answer: "Answer every question, then press Enter on Submit. Your score is the number of correct answers; \
                 press 'r' to try again.",
    },
    Topic {
        keywords: &["hello", "hi ", "hey"],
        answer: "Hello! Ask me about bubble sort: passes, swaps, complexity, stability or the exercises.",
    },
];

const FALLBACK: &str = "I'm not sure about that one. Try asking about passes, swaps, \
                        complexity, stability, early exit or how the exercise is graded.";

/// One question and the answer it got
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct Assistant {
    history: Vec<Exchange>,
}

impl Assistant {
    pub fn new() -> Self {
        Assistant::default()
    }

    /// The canned answer for `question`
    pub fn reply(question: &str) -> &'static str {
        // Padding lets keywords such as "hi " match at the end of the input
        let question = format!("{} ", question.to_lowercase());
        TOPICS
            .iter()
            .find(|topic| topic.keywords.iter().any(|k| question.contains(k)))
            .map_or(FALLBACK, |topic| topic.answer)
    }

    /// Answer and record in the conversation history
    pub fn ask(&mut self, question: &str) -> &'static str {
        let answer = Self::reply(question);
        self.history.push(Exchange {
            question: question.trim().to_string(),
            answer,
        });
        answer
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(Assistant::reply("What is the Time COMPLEXITY?").contains("O(n^2)"));
        assert!(Assistant::reply("is it stable").contains("stable"));
    }

    #[test]
    fn test_first_matching_topic_wins() {
        // Mentions both complexity and swaps; complexity is listed first
        assert!(Assistant::reply("how slow are all those swaps").contains("O(n^2)"));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(Assistant::reply("what's the weather like"), FALLBACK);
        assert_eq!(Assistant::reply("hi"), TOPICS[8].answer);
    }

    #[test]
    fn test_history() {
        let mut assistant = Assistant::new();
        assistant.ask("  stable? ");
        assert_eq!(assistant.history().len(), 1);
        assert_eq!(assistant.history()[0].question, "stable?");
        assistant.clear();
        assert!(assistant.history().is_empty());
    }
}
