//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entities::MoodRecord;

/// Request for POST /state and POST /pet
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitDataRequest {
    pub init_data: String,
}

/// Response for POST /state and POST /pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodResponse {
    pub happiness: u8,
    pub last_interaction: f64,
}

impl From<MoodRecord> for MoodResponse {
    fn from(record: MoodRecord) -> Self {
        Self {
            happiness: record.happiness.value(),
            last_interaction: record.last_interaction,
        }
    }
}

/// Response for POST /webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub ok: bool,
}
