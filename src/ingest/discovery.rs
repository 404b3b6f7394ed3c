/// Station discovery through the OpenDataSoft catalog of the Vigicrues network.
///
/// Free-text search over station labels. Decommissioned stations (those
/// carrying a closure date) are filtered out of the results.
///
/// API Documentation: https://public.opendatasoft.com/explore/dataset/referentiel-des-stations-du-reseau-vigicrues/api/

use crate::config::{ClientConfig, DEFAULT_DISCOVERY_BASE_URL, DEFAULT_SEARCH_LIMIT};
use crate::model::{Result, Station, VigicruesError};
use crate::session::{self, Session};
use serde::Deserialize;
use tracing::info;

// ---------------------------------------------------------------------------
// Serde structures for the catalog response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CatalogRecord>,
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    cdstationhydro: Option<String>,
    lbstationhydro: Option<String>,
    #[serde(default)]
    dtfermeturestationhydro: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the catalog search URL matching `query` against station labels.
///
/// Pagination is fixed: `limit` records from offset 0.
pub fn build_search_url(base_url: &str, query: &str, limit: u32) -> String {
    let predicate = format!("search(lbstationhydro, \"{}\")", query);
    let limit = limit.to_string();
    session::build_url(
        &format!("{}/records", base_url),
        &[("where", &predicate), ("limit", &limit), ("offset", "0")],
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a catalog response body into active stations, upstream order
/// preserved.
///
/// # Errors
/// - `VigicruesError::Data` — malformed JSON, or a record missing its code
///   or label.
pub fn parse_search_response(json: &str) -> Result<Vec<Station>> {
    let response: SearchResponse = serde_json::from_str(json)?;
    active_stations(response)
}

fn active_stations(response: SearchResponse) -> Result<Vec<Station>> {
    let mut stations = Vec::with_capacity(response.results.len());

    for record in response.results {
        let (Some(id), Some(name)) = (record.cdstationhydro, record.lbstationhydro) else {
            return Err(VigicruesError::Data(
                "Invalid station data: cdstationhydro and lbstationhydro are required".to_string(),
            ));
        };

        if record.dtfermeturestationhydro.is_some() {
            continue; // closed station
        }

        stations.push(Station { id, name });
    }

    Ok(stations)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Searches the station catalog.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    session: Option<Session>,
    base_url: String,
    limit: u32,
}

impl DiscoveryClient {
    /// Client against the public catalog.
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session,
            base_url: DEFAULT_DISCOVERY_BASE_URL.to_string(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_config(session: Option<Session>, config: &ClientConfig) -> Self {
        Self {
            session,
            base_url: config.discovery_base_url.clone(),
            limit: config.search_limit,
        }
    }

    /// Searches stations by name.
    ///
    /// # Errors
    /// - `InvalidArgument` — empty `query`.
    /// - `Precondition` — no session configured.
    /// - `Http` / `Timeout` / `Transport` — request failed.
    /// - `Data` — malformed body or incomplete record.
    pub fn search_stations(&self, query: &str) -> Result<Vec<Station>> {
        if query.is_empty() {
            return Err(VigicruesError::InvalidArgument("Query cannot be empty".to_string()));
        }
        let session = session::require(self.session.as_ref())?;

        let url = build_search_url(&self.base_url, query, self.limit);
        let response: SearchResponse = session.get_json(&url)?;
        let stations = active_stations(response)?;

        info!(query, count = stations.len(), "catalog search");
        Ok(stations)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
