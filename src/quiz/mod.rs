//! Quiz, pretest and posttest
//!
//! Question banks are static data. A [`QuizSession`] tracks one learner's
//! selections over a bank; submission is refused until every question has an
//! answer, and the score is the number of selections equal to the correct
//! option.

mod banks;

pub use banks::{POSTTEST, PRETEST, QUIZ};

use thiserror::Error;

#[derive(Debug, PartialEq, Eq)]
pub struct Question {
    pub text: &'static str,
    pub options: &'static [&'static str],
    /// Index into `options`
    pub correct: usize,
    /// Shown next to the question after submission
    pub explanation: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("answer every question before submitting ({answered}/{total} answered)")]
    Incomplete { answered: usize, total: usize },

    #[error("question {0} does not exist")]
    NoSuchQuestion(usize),

    #[error("question {question} has no option {option}")]
    NoSuchOption { question: usize, option: usize },

    #[error("answers are locked after submission; reset to try again")]
    AlreadySubmitted,
}

/// The three assessments of the lab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Pretest,
    Quiz,
    Posttest,
}

impl Assessment {
    pub fn bank(self) -> &'static [Question] {
        match self {
            Assessment::Pretest => PRETEST,
            Assessment::Quiz => QUIZ,
            Assessment::Posttest => POSTTEST,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Assessment::Pretest => "Pretest",
            Assessment::Quiz => "Quiz",
            Assessment::Posttest => "Posttest",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: &'static [Question],
    selections: Vec<Option<usize>>,
    score: Option<usize>,
}

impl QuizSession {
    pub fn new(bank: &'static [Question]) -> Self {
        QuizSession {
            bank,
            selections: vec![None; bank.len()],
            score: None,
        }
    }

    pub fn questions(&self) -> &'static [Question] {
        self.bank
    }

    /// Choose `option` for `question`, replacing any earlier choice
    pub fn select(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        if self.score.is_some() {
            return Err(QuizError::AlreadySubmitted);
        }
        let q = self
            .bank
            .get(question)
            .ok_or(QuizError::NoSuchQuestion(question))?;
        if option >= q.options.len() {
            return Err(QuizError::NoSuchOption { question, option });
        }
        self.selections[question] = Some(option);
        Ok(())
    }

    pub fn selection(&self, question: usize) -> Option<usize> {
        self.selections.get(question).copied().flatten()
    }

    pub fn answered(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == self.bank.len()
    }

    pub fn submit(&mut self) -> Result<usize, QuizError> {
        if !self.is_complete() {
            return Err(QuizError::Incomplete {
                answered: self.answered(),
                total: self.bank.len(),
            });
        }
        let score = self
            .bank
            .iter()
            .zip(&self.selections)
            .filter(|(q, s)| **s == Some(q.correct))
            .count();
        tracing::debug!(score, total = self.bank.len(), "assessment submitted");
        self.score = Some(score);
        Ok(score)
    }

    /// `None` until submitted
    pub fn score(&self) -> Option<usize> {
        self.score
    }

    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }

    /// Whether the selection for `question` was right, once submitted
    pub fn is_correct(&self, question: usize) -> Option<bool> {
        self.score?;
        let q = self.bank.get(question)?;
        Some(self.selection(question) == Some(q.correct))
    }

    pub fn reset(&mut self) {
        self.selections = vec![None; self.bank.len()];
        self.score = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banks_are_well_formed() {
        for bank in [QUIZ, PRETEST, POSTTEST] {
            assert!(!bank.is_empty());
            for q in bank {
                assert!(q.options.len() >= 2, "{}", q.text);
                assert!(q.correct < q.options.len(), "{}", q.text);
            }
        }
    }

    #[test]
    fn test_submit_requires_every_answer() {
        let mut session = QuizSession::new(QUIZ);
        session.select(0, 1).unwrap();
        assert_eq!(
            session.submit(),
            Err(QuizError::Incomplete {
                answered: 1,
                total: QUIZ.len()
            })
        );
        assert_eq!(session.score(), None);
    }

    #[test]
    fn test_score_counts_matches() {
        let mut session = QuizSession::new(QUIZ);
        for (i, q) in QUIZ.iter().enumerate() {
            // First question wrong, the rest right
            let option = if i == 0 {
                (q.correct + 1) % q.options.len()
            } else {
                q.correct
            };
            session.select(i, option).unwrap();
        }
        assert_eq!(session.submit(), Ok(QUIZ.len() - 1));
        assert_eq!(session.is_correct(0), Some(false));
        assert_eq!(session.is_correct(1), Some(true));
    }

    #[test]
    fn test_reset_clears_selections_and_score() {
        let mut session = QuizSession::new(PRETEST);
        for (i, q) in PRETEST.iter().enumerate() {
            session.select(i, q.correct).unwrap();
        }
        session.submit().unwrap();
        assert_eq!(session.select(0, 0), Err(QuizError::AlreadySubmitted));

        session.reset();
        assert_eq!(session.score(), None);
        assert_eq!(session.answered(), 0);
        assert_eq!(session.is_correct(0), None);
    }

    #[test]
    fn test_invalid_selection() {
        let mut session = QuizSession::new(POSTTEST);
        assert_eq!(
            session.select(POSTTEST.len(), 0),
            Err(QuizError::NoSuchQuestion(POSTTEST.len()))
        );
        assert_eq!(
            session.select(0, 99),
            Err(QuizError::NoSuchOption {
                question: 0,
                option: 99
            })
        );
    }
}
