use serde::{Deserialize, Serialize};
use ts_rs::TS;

use codestroke_core::models::eligibility::FindingTier;

/// A single toggleable contraindication.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Finding {
    pub id: String,
    pub label: String,
    pub tier: FindingTier,
    pub description: Option<String>,
}

impl Finding {
    pub fn new(id: &str, label: &str, tier: FindingTier) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            tier,
            description: None,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}
