//! Worker profile types.

use serde::{Deserialize, Serialize};

/// A person eligible for task assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Worker {
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role: None,
            skills: skills.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parameters for adding a worker. The directory assigns the id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWorker {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Partial update of a worker profile. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct WorkerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
}
