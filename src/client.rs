/// Combined client: catalog discovery plus the Vigicrues operational API.
///
/// Holds one collaborator per upstream service and delegates to them. Owns
/// the HTTP session when none is supplied by the caller, and closes it when
/// dropped. A caller-supplied session is left open.

use crate::config::ClientConfig;
use crate::ingest::discovery::DiscoveryClient;
use crate::ingest::vigicrues::VigicruesClient;
use crate::model::{
    Observation, Result, Station, StationDetails, StationRecord, Territory, Troncon, VigicruesError,
};
use crate::session::Session;
use std::time::Duration;
use tracing::{debug, warn};

/// Entry point of the crate: one session shared by the catalog search and
/// the operational API.
///
/// ```no_run
/// let client = vigicrues::Vigicrues::new(None, None)?;
/// for station in client.search_stations("Montauban", true)? {
///     println!("{} ({})", station.name(), station.id());
/// }
/// # Ok::<(), vigicrues::VigicruesError>(())
/// ```
pub struct Vigicrues {
    discovery: DiscoveryClient,
    monitoring: VigicruesClient,
    session: Session,
    owns_session: bool,
}

impl Vigicrues {
    /// Builds a client against the public services.
    ///
    /// Without `session`, one is created with `timeout` (30 s when `None`
    /// or zero) and closed when the client goes out of scope.
    ///
    /// # Errors
    /// - `InvalidArgument` — `timeout` too large to schedule a request with.
    pub fn new(session: Option<Session>, timeout: Option<Duration>) -> Result<Self> {
        let mut config = ClientConfig::default();
        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            config.timeout_secs = timeout.as_secs_f64();
        }
        Self::with_config(config, session)
    }

    /// Builds a client against the endpoints of `config`.
    ///
    /// # Errors
    /// - `InvalidArgument` — `config` fails validation (non-positive or
    ///   unrepresentable timeout, empty URL, zero search limit).
    pub fn with_config(config: ClientConfig, session: Option<Session>) -> Result<Self> {
        let config = config
            .validated()
            .map_err(|e| VigicruesError::InvalidArgument(e.to_string()))?;
        let owns_session = session.is_none();
        let session = match session {
            Some(s) => s,
            None => Session::new(config.timeout())?,
        };
        debug!(owns_session, "client created");

        Ok(Self {
            discovery: DiscoveryClient::with_config(Some(session.clone()), &config),
            monitoring: VigicruesClient::with_config(Some(session.clone()), &config),
            session,
            owns_session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn owns_session(&self) -> bool {
        self.owns_session
    }

    /// Releases the session now rather than at end of scope.
    pub fn close(self) {
        drop(self);
    }

    /// Searches stations by name.
    ///
    /// With `check`, each hit is replaced by its full details; hits whose
    /// detail request fails at the transport level (HTTP status, timeout,
    /// connection) are dropped. Any other error is returned.
    pub fn search_stations(&self, query: &str, check: bool) -> Result<Vec<StationRecord>> {
        let stations = self.discovery.search_stations(query)?;

        if !check {
            return Ok(stations.into_iter().map(StationRecord::Summary).collect());
        }

        let mut checked = Vec::with_capacity(stations.len());
        for station in stations {
            match self.monitoring.get_station_details(&station.id) {
                Ok(details) => checked.push(StationRecord::Detailed(details)),
                Err(e) if e.is_transport() => {
                    warn!(station_id = %station.id, error = %e, "dropping station from search results");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(checked)
    }

    pub fn get_territories(&self) -> Result<Vec<Territory>> {
        self.monitoring.get_territories()
    }

    pub fn get_troncons(&self, territory_id: &str) -> Result<Vec<Troncon>> {
        self.monitoring.get_troncons(territory_id)
    }

    pub fn get_troncon_stations(&self, troncon_id: &str) -> Result<Vec<Station>> {
        self.monitoring.get_troncon_stations(troncon_id)
    }

    pub fn get_station_details(&self, station_id: &str) -> Result<StationDetails> {
        self.monitoring.get_station_details(station_id)
    }

    pub fn get_latest_observations(&self, station_id: &str, obs_type: &str) -> Result<Observation> {
        self.monitoring.get_latest_observations(station_id, obs_type)
    }
}

impl Drop for Vigicrues {
    fn drop(&mut self) {
        if self.owns_session {
            self.session.close();
        }
    }
}
