/// Core data types for the Vigicrues client.
///
/// Every entity here is an immutable value built from one upstream
/// response record and handed to the caller. Nothing is cached.
///
/// The error taxonomy shared by every component also lives here.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Hierarchy types
// ---------------------------------------------------------------------------

/// Top-level hydrological zone (a "territoire" in Vigicrues terms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: String,
    pub name: String,
}

/// Monitored river section within a territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Troncon {
    pub id: String,
    pub name: String,
}

/// Minimal identity record for a monitoring station, as returned by
/// search and listing calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
}

/// Full station metadata with WGS84 coordinates.
///
/// `historical_floods` and `related_stations` are passed through from the
/// upstream document without field validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDetails {
    pub id: String,
    pub name: String,
    pub river: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub picture_url: Option<String>,
    pub commune_code: Option<String>,
    pub is_prediction_station: bool,
    pub has_height_data: bool,
    pub has_flow_data: bool,
    pub has_predictions: bool,
    pub historical_floods: Vec<serde_json::Value>,
    pub related_stations: Vec<serde_json::Value>,
}

/// Output of the combined client's search: either the bare catalog hit or
/// the detail record it was upgraded to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StationRecord {
    Summary(Station),
    Detailed(StationDetails),
}

impl StationRecord {
    pub fn id(&self) -> &str {
        match self {
            StationRecord::Summary(s) => &s.id,
            StationRecord::Detailed(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StationRecord::Summary(s) => &s.name,
            StationRecord::Detailed(d) => &d.name,
        }
    }

    pub fn details(&self) -> Option<&StationDetails> {
        match self {
            StationRecord::Detailed(d) => Some(d),
            StationRecord::Summary(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// Measured quantity: water level (H) or flow rate (Q).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "H")]
    Height,
    #[serde(rename = "Q")]
    Flow,
}

impl ObservationType {
    /// Series code used by the `GrdSerie` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            ObservationType::Height => "H",
            ObservationType::Flow => "Q",
        }
    }

    /// Unit of the values in the series. Not read from the response.
    pub fn unit(self) -> &'static str {
        match self {
            ObservationType::Height => "m",
            ObservationType::Flow => "m³/s",
        }
    }
}

impl fmt::Display for ObservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ObservationType {
    type Err = VigicruesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(ObservationType::Height),
            "Q" => Ok(ObservationType::Flow),
            _ => Err(VigicruesError::InvalidArgument(
                "obs_type must be 'H' (height) or 'Q' (flow)".to_string(),
            )),
        }
    }
}

/// One instantaneous reading for one station and one quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
    #[serde(rename = "type")]
    pub obs_type: ObservationType,
    pub unit: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors surfaced by every client operation.
#[derive(Debug, Error, PartialEq)]
pub enum VigicruesError {
    /// Empty or malformed caller input, detected before any request.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// No usable transport session.
    #[error("Precondition failed: {0}")]
    Precondition(String),
    /// Non-2xx HTTP response.
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },
    /// The request exceeded the session timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// Connection-level failure (DNS, refused, reset, ...).
    #[error("Transport error: {0}")]
    Transport(String),
    /// Malformed body, schema mismatch, missing fields or empty series.
    #[error("Data error: {0}")]
    Data(String),
    /// Broken built-in setup (projection definitions).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VigicruesError {
    /// True for failures raised by the transport rather than by validation:
    /// HTTP status, timeout and connection errors.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VigicruesError::Http { .. } | VigicruesError::Timeout(_) | VigicruesError::Transport(_)
        )
    }
}

impl From<reqwest::Error> for VigicruesError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            VigicruesError::Timeout(url)
        } else if let Some(status) = err.status() {
            VigicruesError::Http { status: status.as_u16(), url }
        } else if err.is_decode() || err.is_body() {
            VigicruesError::Data(err.to_string())
        } else {
            VigicruesError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for VigicruesError {
    fn from(err: serde_json::Error) -> Self {
        VigicruesError::Data(format!("JSON deserialization failed: {}", err))
    }
}

pub type Result<T, E = VigicruesError> = std::result::Result<T, E>;
