//! Experiment catalogue
//!
//! - [`models`]: experiments, institutes and disciplines
//! - [`service`]: the in-process mock data service with artificial delays
//! - [`filter`]: institute/discipline/text filtering and the listing tabs

pub mod filter;
pub mod models;
pub mod service;

pub use filter::{CatalogTab, ExperimentFilter};
pub use models::{Discipline, Experiment, Institute};
pub use service::{MockDataService, MockDelays};
