use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Flight,
    Train,
    Bus,
    Car,
    Boat,
    Other,
}

impl TransportType {
    pub const ALL: [TransportType; 6] = [
        TransportType::Flight,
        TransportType::Train,
        TransportType::Bus,
        TransportType::Car,
        TransportType::Boat,
        TransportType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Flight => "flight",
            TransportType::Train => "train",
            TransportType::Bus => "bus",
            TransportType::Car => "car",
            TransportType::Boat => "boat",
            TransportType::Other => "other",
        }
    }

    /// Comma separated list of accepted values, for error messages.
    pub fn allowed() -> String {
        Self::ALL
            .iter()
            .map(TransportType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transport type: {0}")]
pub struct UnknownTransportType(pub String);

impl FromStr for TransportType {
    type Err = UnknownTransportType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownTransportType(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub id: EntityId,
    pub destination_id: EntityId,
    #[serde(rename = "type")]
    pub kind: TransportType,
    pub details: String,
    pub time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransport {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub details: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransport {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub details: Option<String>,
    pub time: Option<String>,
}
