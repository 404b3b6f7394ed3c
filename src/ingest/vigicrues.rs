/// Vigicrues operational API client.
///
/// Territory → troncon → station hierarchy, station metadata and the
/// latest height/flow reading of a station.
///
/// Base URL: https://www.vigicrues.gouv.fr/services
///
/// Every operation validates its arguments, then the session, before the
/// request is issued.

use crate::config::{ClientConfig, DEFAULT_VIGICRUES_BASE_URL};
use crate::model::{
    Observation, ObservationType, Result, Station, StationDetails, Territory, Troncon, VigicruesError,
};
use crate::projection::extract_coordinates;
use crate::session::{self, Session};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::info;

/// `TypEntVigiCru` selecting the troncons of a territory.
pub const TYPE_TRONCONS_OF_TERRITORY: &str = "5";
/// `TypEntVigiCru` selecting the stations of a troncon.
pub const TYPE_STATIONS_OF_TRONCON: &str = "8";

// ---------------------------------------------------------------------------
// Serde structures for the Vigicrues documents
// ---------------------------------------------------------------------------

/// Entity codes are strings on most endpoints but occasionally numbers.
fn code<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(s) => s,
        Code::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct TerritoryList {
    #[serde(rename = "ListEntVigiCru", default)]
    entries: Vec<TerritoryEntry>,
}

#[derive(Debug, Deserialize)]
struct TerritoryEntry {
    #[serde(rename = "CdEntVigiCru", deserialize_with = "code")]
    id: String,
    #[serde(rename = "LbEntVigiCru")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Hierarchy {
    #[serde(rename = "ListEntVigiCru", default)]
    entries: Vec<HierarchyEntry>,
}

#[derive(Debug, Deserialize)]
struct HierarchyEntry {
    #[serde(rename = "aNMoinsUn", default)]
    children: Vec<ChildEntry>,
}

#[derive(Debug, Deserialize)]
struct ChildEntry {
    #[serde(rename = "CdEntVigiCruInferieur", deserialize_with = "code")]
    id: String,
    #[serde(rename = "LbEntVigiCruInferieur")]
    name: String,
}

/// Labels are optional at decode time so the coordinates can be checked
/// first; `station_details_from` enforces them afterwards.
#[derive(Debug, Deserialize)]
struct StationDocument {
    #[serde(rename = "LbStationHydro", default)]
    name: Option<String>,
    #[serde(rename = "LbCoursEau", default)]
    river: Option<String>,
    #[serde(rename = "CdCommune", default)]
    commune: Option<TextOrNumber>,
    #[serde(rename = "CoordStationHydro", default)]
    coordinates: Option<CoordinatesDocument>,
    #[serde(rename = "VigilanceCrues", default)]
    vigilance: Option<VigilanceDocument>,
}

#[derive(Debug, Deserialize)]
struct CoordinatesDocument {
    #[serde(rename = "CoordXStationHydro", default)]
    x: Option<TextOrNumber>,
    #[serde(rename = "CoordYStationHydro", default)]
    y: Option<TextOrNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    fn as_text(&self) -> String {
        match self {
            TextOrNumber::Text(s) => s.clone(),
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct VigilanceDocument {
    #[serde(rename = "Photo", default)]
    photo: Option<String>,
    #[serde(rename = "StationPrevision", default)]
    prediction: Option<bool>,
    #[serde(rename = "CruesHistoriques", default)]
    historical_floods: Option<Vec<serde_json::Value>>,
    #[serde(rename = "StationsBassin", default)]
    related_stations: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ObservationSeries {
    #[serde(rename = "Serie", default)]
    serie: Option<Serie>,
}

#[derive(Debug, Deserialize)]
struct Serie {
    #[serde(rename = "ObssHydro", default)]
    observations: Option<Vec<ObservationEntry>>,
}

#[derive(Debug, Deserialize)]
struct ObservationEntry {
    #[serde(rename = "DtObsHydro")]
    timestamp: String,
    #[serde(rename = "ResObsHydro")]
    value: f64,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub fn build_territories_url(base_url: &str) -> String {
    format!("{}/TerEntVigiCru.json", base_url)
}

pub fn build_troncons_url(base_url: &str, territory_id: &str) -> String {
    session::build_url(
        &format!("{}/v1.1/TerEntVigiCru.json", base_url),
        &[("CdEntVigiCru", territory_id), ("TypEntVigiCru", TYPE_TRONCONS_OF_TERRITORY)],
    )
}

pub fn build_troncon_stations_url(base_url: &str, troncon_id: &str) -> String {
    session::build_url(
        &format!("{}/v1.1/TronEntVigiCru.json", base_url),
        &[("CdEntVigiCru", troncon_id), ("TypEntVigiCru", TYPE_STATIONS_OF_TRONCON)],
    )
}

pub fn build_station_url(base_url: &str, station_id: &str) -> String {
    session::build_url(
        &format!("{}/station.json/index.php", base_url),
        &[("CdStationHydro", station_id)],
    )
}

pub fn build_observations_url(base_url: &str, station_id: &str, obs_type: ObservationType) -> String {
    session::build_url(
        &format!("{}/observations.json/index.php", base_url),
        &[
            ("CdStationHydro", station_id),
            ("GrdSerie", obs_type.code()),
            ("FormatDate", "iso"),
        ],
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

pub fn parse_territories(json: &str) -> Result<Vec<Territory>> {
    Ok(territories_from(serde_json::from_str(json)?))
}

pub fn parse_troncons(json: &str) -> Result<Vec<Troncon>> {
    Ok(troncons_from(serde_json::from_str(json)?))
}

pub fn parse_troncon_stations(json: &str) -> Result<Vec<Station>> {
    Ok(stations_from(serde_json::from_str(json)?))
}

/// Parses a station document, reprojecting its coordinates to WGS84.
///
/// # Errors
/// - `VigicruesError::Data` — malformed JSON or missing label fields.
/// - `VigicruesError::InvalidArgument` — missing or non-numeric coordinates.
pub fn parse_station_details(json: &str, station_id: &str) -> Result<StationDetails> {
    station_details_from(serde_json::from_str(json)?, station_id)
}

/// Parses an observation series and keeps its last entry.
///
/// # Errors
/// - `VigicruesError::Data` — malformed JSON, empty series or bad timestamp.
pub fn parse_latest_observation(json: &str, obs_type: ObservationType) -> Result<Observation> {
    latest_observation_from(serde_json::from_str(json)?, obs_type)
}

fn territories_from(list: TerritoryList) -> Vec<Territory> {
    list.entries
        .into_iter()
        .map(|e| Territory { id: e.id, name: e.name })
        .collect()
}

fn children_of(hierarchy: Hierarchy) -> impl Iterator<Item = ChildEntry> {
    hierarchy.entries.into_iter().flat_map(|e| e.children)
}

fn troncons_from(hierarchy: Hierarchy) -> Vec<Troncon> {
    children_of(hierarchy)
        .map(|c| Troncon { id: c.id, name: c.name })
        .collect()
}

fn stations_from(hierarchy: Hierarchy) -> Vec<Station> {
    children_of(hierarchy)
        .map(|c| Station { id: c.id, name: c.name })
        .collect()
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| VigicruesError::Data(format!("Missing field {} in station document", field)))
}

fn station_details_from(doc: StationDocument, station_id: &str) -> Result<StationDetails> {
    let (x, y) = match &doc.coordinates {
        Some(c) => (c.x.as_ref().map(TextOrNumber::as_text), c.y.as_ref().map(TextOrNumber::as_text)),
        None => (None, None),
    };
    let (latitude, longitude) = extract_coordinates(x.as_deref(), y.as_deref(), station_id)?;

    let name = required(doc.name, "LbStationHydro")?;
    let river = required(doc.river, "LbCoursEau")?;
    let commune = required(doc.commune, "CdCommune")?.as_text();

    let vigilance = doc.vigilance.unwrap_or_default();
    let prediction = vigilance.prediction.unwrap_or(false);

    Ok(StationDetails {
        id: station_id.to_string(),
        name,
        river,
        city: commune.clone(),
        latitude,
        longitude,
        picture_url: vigilance.photo,
        commune_code: Some(commune),
        is_prediction_station: prediction,
        // No upstream signal is consulted for these two.
        has_height_data: true,
        has_flow_data: true,
        has_predictions: prediction,
        historical_floods: vigilance.historical_floods.unwrap_or_default(),
        related_stations: vigilance.related_stations.unwrap_or_default(),
    })
}

fn latest_observation_from(series: ObservationSeries, obs_type: ObservationType) -> Result<Observation> {
    // Upstream returns the series in chronological order; no sort here.
    let latest = series
        .serie
        .and_then(|s| s.observations)
        .and_then(|mut obs| obs.pop())
        .ok_or_else(|| VigicruesError::Data("No observations found".to_string()))?;

    Ok(Observation {
        timestamp: parse_timestamp(&latest.timestamp)?,
        value: latest.value,
        obs_type,
        unit: obs_type.unit().to_string(),
    })
}

/// Parses an ISO 8601 timestamp. Readings without an offset are UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).fixed_offset())
        .map_err(|e| VigicruesError::Data(format!("Invalid timestamp '{}': {}", raw, e)))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

fn require_id(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(VigicruesError::InvalidArgument(format!("{} cannot be empty", what)));
    }
    Ok(())
}

/// Read operations against the Vigicrues operational services.
#[derive(Debug, Clone)]
pub struct VigicruesClient {
    session: Option<Session>,
    base_url: String,
}

impl VigicruesClient {
    /// Client against the public services.
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session,
            base_url: DEFAULT_VIGICRUES_BASE_URL.to_string(),
        }
    }

    pub fn with_config(session: Option<Session>, config: &ClientConfig) -> Self {
        Self {
            session,
            base_url: config.vigicrues_base_url.clone(),
        }
    }

    /// Lists every territory.
    pub fn get_territories(&self) -> Result<Vec<Territory>> {
        let session = session::require(self.session.as_ref())?;

        let list: TerritoryList = session.get_json(&build_territories_url(&self.base_url))?;
        let territories = territories_from(list);

        info!(count = territories.len(), "territories");
        Ok(territories)
    }

    /// Lists the troncons of a territory.
    pub fn get_troncons(&self, territory_id: &str) -> Result<Vec<Troncon>> {
        require_id(territory_id, "Territory ID")?;
        let session = session::require(self.session.as_ref())?;

        let hierarchy: Hierarchy = session.get_json(&build_troncons_url(&self.base_url, territory_id))?;
        let troncons = troncons_from(hierarchy);

        info!(territory_id, count = troncons.len(), "troncons");
        Ok(troncons)
    }

    /// Lists the stations of a troncon.
    pub fn get_troncon_stations(&self, troncon_id: &str) -> Result<Vec<Station>> {
        require_id(troncon_id, "Troncon ID")?;
        let session = session::require(self.session.as_ref())?;

        let hierarchy: Hierarchy =
            session.get_json(&build_troncon_stations_url(&self.base_url, troncon_id))?;
        let stations = stations_from(hierarchy);

        info!(troncon_id, count = stations.len(), "troncon stations");
        Ok(stations)
    }

    /// Fetches station metadata with WGS84 coordinates.
    ///
    /// # Errors
    /// - `InvalidArgument` — empty id, or missing/non-numeric coordinates.
    /// - `Precondition` — no session configured.
    /// - `Http` / `Timeout` / `Transport` — request failed.
    /// - `Data` — malformed document.
    pub fn get_station_details(&self, station_id: &str) -> Result<StationDetails> {
        require_id(station_id, "Station ID")?;
        let session = session::require(self.session.as_ref())?;

        let doc: StationDocument = session.get_json(&build_station_url(&self.base_url, station_id))?;
        station_details_from(doc, station_id)
    }

    /// Fetches the last reading of the `obs_type` series ("H" or "Q").
    ///
    /// # Errors
    /// - `InvalidArgument` — empty id or `obs_type` outside {H, Q}.
    /// - `Precondition` — no session configured.
    /// - `Http` / `Timeout` / `Transport` — request failed.
    /// - `Data` — malformed body, empty series or bad timestamp.
    pub fn get_latest_observations(&self, station_id: &str, obs_type: &str) -> Result<Observation> {
        require_id(station_id, "Station ID")?;
        let obs_type: ObservationType = obs_type.parse()?;
        let session = session::require(self.session.as_ref())?;

        let series: ObservationSeries =
            session.get_json(&build_observations_url(&self.base_url, station_id, obs_type))?;
        latest_observation_from(series, obs_type)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
