/// vigicrues: client for the French Vigicrues flood-monitoring network.
///
/// # Module structure
///
/// ```text
/// vigicrues
/// ├── model       — shared data types (Station, StationDetails, Observation, VigicruesError, …)
/// ├── config      — endpoint/timeout configuration (vigicrues.toml + environment)
/// ├── session     — closable pooled HTTP session, GET + JSON decode
/// ├── projection  — Lambert-93 → WGS84 coordinate conversion
/// ├── ingest
/// │   ├── discovery — OpenDataSoft station catalog search
/// │   ├── vigicrues — territories, troncons, station details, observations
/// │   └── fixtures (test only) — representative API response payloads
/// ├── client      — combined client owning the session lifecycle
/// └── cli         — command definitions and output rendering
/// ```

/// Public modules
pub mod cli;
pub mod client;
pub mod config;
pub mod ingest;
pub mod model;
pub mod projection;
pub mod session;

pub use client::Vigicrues;
pub use config::ClientConfig;
pub use ingest::discovery::DiscoveryClient;
pub use ingest::vigicrues::VigicruesClient;
pub use model::{
    Observation, ObservationType, Station, StationDetails, StationRecord, Territory, Troncon, VigicruesError,
};
pub use session::Session;
