//! Catalogue filtering
//!
//! [`ExperimentFilter`] narrows a listing by institute, discipline and a free
//! text query; an empty id list does not restrict. [`CatalogTab`] picks which
//! subset of the filtered listing is shown.

use super::models::Experiment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentFilter {
    pub institutes: BTreeSet<String>,
    pub disciplines: BTreeSet<String>,
    /// Typed search text; not persisted
    #[serde(skip)]
    pub query: String,
}

impl ExperimentFilter {
    pub fn matches(&self, experiment: &Experiment) -> bool {
        if !self.institutes.is_empty() && !self.institutes.contains(&experiment.institute) {
            return false;
        }
        if !self.disciplines.is_empty() && !self.disciplines.contains(&experiment.discipline) {
            return false;
        }
        let query = self.query.trim().to_lowercase();
        query.is_empty()
            || experiment.title.to_lowercase().contains(&query)
            || experiment.description.to_lowercase().contains(&query)
    }

    pub fn apply<'a>(&self, experiments: &'a [Experiment]) -> Vec<&'a Experiment> {
        experiments.iter().filter(|e| self.matches(e)).collect()
    }

    /// Add or remove an institute id; returns whether it is now selected
    pub fn toggle_institute(&mut self, id: &str) -> bool {
        toggle(&mut self.institutes, id)
    }

    pub fn toggle_discipline(&mut self, id: &str) -> bool {
        toggle(&mut self.disciplines, id)
    }

    pub fn is_empty(&self) -> bool {
        self.institutes.is_empty() && self.disciplines.is_empty() && self.query.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = ExperimentFilter::default();
    }
}

fn toggle(set: &mut BTreeSet<String>, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogTab {
    #[default]
    All,
    Popular,
    Recent,
    Starred,
}

impl CatalogTab {
    pub const ALL: [CatalogTab; 4] = [
        CatalogTab::All,
        CatalogTab::Popular,
        CatalogTab::Recent,
        CatalogTab::Starred,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CatalogTab::All => "All",
            CatalogTab::Popular => "Popular",
            CatalogTab::Recent => "Recent",
            CatalogTab::Starred => "Starred",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Popular is ordered by rating, Recent by creation date (newest first)
    pub fn select<'a>(
        self,
        experiments: Vec<&'a Experiment>,
        starred: &BTreeSet<String>,
    ) -> Vec<&'a Experiment> {
        let mut selected: Vec<&Experiment> = match self {
            CatalogTab::All => experiments,
            CatalogTab::Popular => experiments.into_iter().filter(|e| e.popular).collect(),
            CatalogTab::Recent => experiments.into_iter().filter(|e| e.recent).collect(),
            CatalogTab::Starred => experiments
                .into_iter()
                .filter(|e| starred.contains(&e.id))
                .collect(),
        };
        match self {
            CatalogTab::Popular => selected.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            CatalogTab::Recent => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            CatalogTab::All | CatalogTab::Starred => {}
        }
        selected
    }
}

impl fmt::Display for CatalogTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn experiment(id: &str, institute: &str, discipline: &str, rating: f32, day: u32) -> Experiment {
        Experiment {
            id: id.to_string(),
            title: format!("Experiment {}", id),
            description: "Sorting arrays".to_string(),
            image: String::new(),
            rating,
            institute: institute.to_string(),
            discipline: discipline.to_string(),
            popular: rating >= 4.5,
            recent: day > 10,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Experiment> {
        vec![
            experiment("a", "iitb", "cse", 4.6, 1),
            experiment("b", "iitd", "cse", 4.9, 20),
            experiment("c", "iitb", "phy", 3.2, 15),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let experiments = sample();
        assert_eq!(ExperimentFilter::default().apply(&experiments).len(), 3);
    }

    #[test]
    fn test_institute_and_discipline_filters_combine() {
        let experiments = sample();
        let mut filter = ExperimentFilter::default();
        assert!(filter.toggle_institute("iitb"));
        assert_eq!(filter.apply(&experiments).len(), 2);

        filter.toggle_discipline("cse");
        let ids: Vec<_> = filter.apply(&experiments).into_iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a"]);

        assert!(!filter.toggle_institute("iitb"));
        assert_eq!(filter.apply(&experiments).len(), 2);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let experiments = sample();
        let filter = ExperimentFilter {
            query: "  EXPERIMENT C ".to_string(),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&experiments).into_iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["c"]);
    }

    #[test]
    fn test_tabs() {
        let experiments = sample();
        let all: Vec<&Experiment> = experiments.iter().collect();
        let starred: BTreeSet<String> = ["c".to_string()].into();

        let popular: Vec<_> = CatalogTab::Popular
            .select(all.clone(), &starred)
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(popular, ["b", "a"]);

        let recent: Vec<_> = CatalogTab::Recent
            .select(all.clone(), &starred)
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(recent, ["b", "c"]);

        assert_eq!(CatalogTab::Starred.select(all, &starred)[0].id, "c");
        assert_eq!(CatalogTab::Starred.next(), CatalogTab::All);
    }
}
