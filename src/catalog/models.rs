use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institute {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discipline {
    pub id: String,
    pub name: String,
}

/// Mock experiment metadata, generated at startup and never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Path of the static thumbnail asset
    pub image: String,
    /// 0.0 to 5.0, one decimal
    pub rating: f32,
    /// Id of an [`Institute`]
    pub institute: String,
    /// Id of a [`Discipline`]
    pub discipline: String,
    pub popular: bool,
    pub recent: bool,
    pub created_at: DateTime<Utc>,
}
