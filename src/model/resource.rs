//! Shared resources tasks can reserve: hardware, licenses, rooms.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    /// Free-form category such as "hardware" or "software".
    #[serde(rename = "type")]
    pub kind: String,
    /// Percentage of the resource currently available, 0 to 100.
    pub availability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Parameters for adding a resource. The engine assigns the id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub availability: f64,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceUpdate {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub availability: Option<f64>,
    pub quantity: Option<u32>,
    pub unit: Option<String>,
}

/// A task's claim on some amount of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    pub resource_id: String,
    pub amount: f64,
}
