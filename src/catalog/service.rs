//! In-process mock data service
//!
//! Collections are generated once at construction. Each accessor sleeps for a
//! fixed artificial delay before returning a copy, standing in for a network
//! fetch that always succeeds.

use super::models::{Discipline, Experiment, Institute};
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Experiments created within this many days are flagged recent
const RECENT_DAYS: i64 = 45;

const INSTITUTES: &[(&str, &str)] = &[
    ("iitb", "IIT Bombay"),
    ("iitd", "IIT Delhi"),
    ("iitg", "IIT Guwahati"),
    ("iitk", "IIT Kanpur"),
    ("iitkgp", "IIT Kharagpur"),
    ("iitr", "IIT Roorkee"),
    ("iiith", "IIIT Hyderabad"),
    ("amrita", "Amrita Vishwa Vidyapeetham"),
    ("nitk", "NIT Karnataka"),
    ("dei", "Dayalbagh Educational Institute"),
];

const DISCIPLINES: &[(&str, &str)] = &[
    ("cse", "Computer Science & Engineering"),
    ("ece", "Electronics & Communication"),
    ("ee", "Electrical Engineering"),
    ("mech", "Mechanical Engineering"),
    ("civil", "Civil Engineering"),
    ("chem-eng", "Chemical Engineering"),
    ("phy", "Physical Sciences"),
    ("chem", "Chemical Sciences"),
    ("bio", "Biotechnology & Biomedical Engineering"),
];

const TITLES: &[&str] = &[
    "Bubble Sort",
    "Insertion Sort",
    "Selection Sort",
    "Merge Sort",
    "Quick Sort",
    "Binary Search",
    "Stacks and Queues",
    "Linked Lists",
    "Depth First Search",
    "Breadth First Search",
    "Dijkstra's Shortest Path",
    "Ohm's Law",
    "RC Circuit Transients",
    "Logic Gates",
    "Half and Full Adders",
    "Amplitude Modulation",
    "Simple Pendulum",
    "Projectile Motion",
    "Beam Deflection",
    "Soil Compaction Test",
    "Titration of a Strong Acid",
    "Heat Exchanger",
    "DNA Extraction",
    "Enzyme Kinetics",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDelays {
    pub experiments: Duration,
    /// Institutes and disciplines
    pub directory: Duration,
    pub lookup: Duration,
}

impl Default for MockDelays {
    fn default() -> Self {
        MockDelays {
            experiments: Duration::from_millis(800),
            directory: Duration::from_millis(500),
            lookup: Duration::from_millis(300),
        }
    }
}

impl MockDelays {
    /// No waiting at all, for headless use and tests
    pub fn none() -> Self {
        MockDelays {
            experiments: Duration::ZERO,
            directory: Duration::ZERO,
            lookup: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockDataService {
    experiments: Vec<Experiment>,
    institutes: Vec<Institute>,
    disciplines: Vec<Discipline>,
    delays: MockDelays,
}

impl MockDataService {
    /// Generate `count` experiments. The same seed gives the same catalogue
    /// apart from absolute timestamps.
    pub fn new(delays: MockDelays, count: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let institutes: Vec<Institute> = INSTITUTES
            .iter()
            .map(|(id, name)| Institute {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        let disciplines: Vec<Discipline> = DISCIPLINES
            .iter()
            .map(|(id, name)| Discipline {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();

        let now = Utc::now();
        let experiments = (0..count)
            .map(|i| {
                let base = TITLES[i % TITLES.len()];
                let round = i / TITLES.len();
                let title = if round == 0 {
                    base.to_string()
                } else {
                    format!("{} ({})", base, round + 1)
                };
                let institute = institutes.choose(&mut rng).map(|x| x.id.clone());
                let discipline = disciplines.choose(&mut rng).map(|x| x.id.clone());
                let age_days = rng.gen_range(0..365);
                let rating = f32::from(rng.gen_range(30u8..=50)) / 10.0;

                Experiment {
                    id: format!("exp-{:03}", i + 1),
                    description: format!(
                        "An interactive virtual experiment on {}: theory, simulation and self-evaluation.",
                        base.to_lowercase()
                    ),
                    image: format!("images/experiments/{}.png", i % TITLES.len() + 1),
                    title,
                    rating,
                    institute: institute.unwrap_or_default(),
                    discipline: discipline.unwrap_or_default(),
                    popular: rating >= 4.5 || rng.gen_bool(0.2),
                    recent: age_days < RECENT_DAYS,
                    created_at: now - ChronoDuration::days(age_days),
                }
            })
            .collect();

        tracing::debug!(count, "generated mock catalogue");
        MockDataService {
            experiments,
            institutes,
            disciplines,
            delays,
        }
    }

    pub async fn experiments(&self) -> Vec<Experiment> {
        tokio::time::sleep(self.delays.experiments).await;
        self.experiments.clone()
    }

    pub async fn institutes(&self) -> Vec<Institute> {
        tokio::time::sleep(self.delays.directory).await;
        self.institutes.clone()
    }

    pub async fn disciplines(&self) -> Vec<Discipline> {
        tokio::time::sleep(self.delays.directory).await;
        self.disciplines.clone()
    }

    /// `None` for an unknown id
    pub async fn experiment(&self, id: &str) -> Option<Experiment> {
        tokio::time::sleep(self.delays.lookup).await;
        self.experiments.iter().find(|e| e.id == id).cloned()
    }

    pub fn delays(&self) -> MockDelays {
        self.delays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_generated_references_are_valid() {
        let service = MockDataService::new(MockDelays::none(), 30, Some(1));
        assert_eq!(service.experiments.len(), 30);
        for e in &service.experiments {
            assert!(service.institutes.iter().any(|i| i.id == e.institute));
            assert!(service.disciplines.iter().any(|d| d.id == e.discipline));
            assert!((3.0..=5.0).contains(&e.rating));
        }
        assert_eq!(service.experiments[24].title, "Bubble Sort (2)");
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = MockDataService::new(MockDelays::none(), 10, Some(42));
        let b = MockDataService::new(MockDelays::none(), 10, Some(42));
        let key = |s: &MockDataService| {
            s.experiments
                .iter()
                .map(|e| (e.institute.clone(), e.discipline.clone(), e.popular, e.recent))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&a), key(&b));
    }

    fn assert_window(start: Instant, millis: u64) {
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(millis), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(millis + 50), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_accessors_wait_for_their_delays() {
        let service = MockDataService::new(MockDelays::default(), 5, Some(3));

        let start = Instant::now();
        assert_eq!(service.experiments().await.len(), 5);
        assert_window(start, 800);

        let start = Instant::now();
        assert_eq!(service.institutes().await.len(), INSTITUTES.len());
        assert_eq!(service.disciplines().await.len(), DISCIPLINES.len());
        assert_window(start, 1000);

        let start = Instant::now();
        assert!(service.experiment("exp-002").await.is_some());
        assert!(service.experiment("missing").await.is_none());
        assert_window(start, 600);
    }
}
