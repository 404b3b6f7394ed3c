/// Command-line front end: argument definitions and command rendering.
///
/// Rendering writes to any `io::Write` so commands can be exercised
/// against a buffer; `main.rs` only wires stdout, logging and config.

use crate::client::Vigicrues;
use crate::model::{ObservationType, StationDetails, VigicruesError};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "vigicrues")]
#[command(about = "Vigicrues CLI - French flood monitoring service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Configuration file path (default: ./vigicrues.toml if present)
    #[arg(short, long, global = true, env = "VIGICRUES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Search for stations
    Search {
        /// Search term (station name, city, etc.)
        query: String,
        /// Return catalog hits without loading each station's details
        #[arg(long)]
        no_check: bool,
    },
    /// Get latest observations for a station
    Get {
        /// Station identifier (e.g., O408101001)
        station_id: String,
    },
    /// List all territories
    Territories,
    /// List troncons in a territory
    Troncons {
        /// Territory identifier
        territory_id: String,
    },
    /// List stations in a troncon
    Stations {
        /// Troncon identifier
        troncon_id: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] VigicruesError),
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runs one command against `client`, writing human-readable (or JSON)
/// output to `out`.
pub fn run(client: &Vigicrues, command: &Command, as_json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Search { query, no_check } => search(client, query, !no_check, as_json, out),
        Command::Get { station_id } => get(client, station_id, as_json, out),
        Command::Territories => territories(client, as_json, out),
        Command::Troncons { territory_id } => troncons(client, territory_id, as_json, out),
        Command::Stations { troncon_id } => stations(client, troncon_id, as_json, out),
    }
}

fn search(client: &Vigicrues, query: &str, check: bool, as_json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let stations = client.search_stations(query, check)?;
    if as_json {
        return write_json(out, &stations);
    }

    if stations.is_empty() {
        writeln!(out, "No stations found")?;
    } else {
        writeln!(out, "Found {} stations:", stations.len())?;
        for station in &stations {
            writeln!(out, "  - {} (ID: {})", station.name(), station.id())?;
        }
    }
    Ok(())
}

fn get(client: &Vigicrues, station_id: &str, as_json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let details = match client.get_station_details(station_id) {
        Ok(d) => d,
        Err(VigicruesError::Http { .. }) => {
            writeln!(out, "Impossible to trouver la station {}", station_id)?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let height = latest(client, &details, ObservationType::Height, details.has_height_data)?;
    let flow = latest(client, &details, ObservationType::Flow, details.has_flow_data)?;

    if as_json {
        let doc = json!({
            "station": details,
            "height": height.as_ref().and_then(|r| r.as_ref().ok()),
            "flow": flow.as_ref().and_then(|r| r.as_ref().ok()),
        });
        return write_json(out, &doc);
    }

    writeln!(out, "Station: {}", details.name)?;
    writeln!(out, "River: {}", details.river)?;
    writeln!(out, "City: {}", details.city)?;
    writeln!(out, "Coordinates: ({}, {})", details.latitude, details.longitude)?;
    writeln!(out)?;

    for (label, reading) in [("Latest water level", height), ("Latest flow rate", flow)] {
        match reading {
            None => {}
            Some(Ok(obs)) => writeln!(out, "{}: {} {} at {}", label, obs.value, obs.unit, obs.timestamp)?,
            Some(Err(_)) => writeln!(out, "{}: No observations found", label)?,
        }
    }
    Ok(())
}

/// `None` when the station does not advertise the series, `Some(Err)` when
/// the series has no usable reading.
fn latest(
    client: &Vigicrues,
    details: &StationDetails,
    obs_type: ObservationType,
    advertised: bool,
) -> Result<Option<Result<crate::model::Observation, VigicruesError>>, CliError> {
    if !advertised {
        return Ok(None);
    }
    match client.get_latest_observations(&details.id, obs_type.code()) {
        Ok(obs) => Ok(Some(Ok(obs))),
        Err(e @ VigicruesError::Data(_)) => Ok(Some(Err(e))),
        Err(e) => Err(e.into()),
    }
}

fn territories(client: &Vigicrues, as_json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let territories = client.get_territories()?;
    if as_json {
        return write_json(out, &territories);
    }

    if territories.is_empty() {
        writeln!(out, "No territories found")?;
    } else {
        writeln!(out, "Territories:")?;
        for territory in &territories {
            writeln!(out, "  - {} (id: {})", territory.name, territory.id)?;
        }
    }
    Ok(())
}

fn troncons(client: &Vigicrues, territory_id: &str, as_json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let troncons = client.get_troncons(territory_id)?;
    if as_json {
        return write_json(out, &troncons);
    }

    if troncons.is_empty() {
        writeln!(out, "No troncons found")?;
    } else {
        writeln!(out, "Troncons in territory {}:", territory_id)?;
        for troncon in &troncons {
            writeln!(out, "  - {} (id: {})", troncon.name, troncon.id)?;
        }
    }
    Ok(())
}

fn stations(client: &Vigicrues, troncon_id: &str, as_json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let stations = client.get_troncon_stations(troncon_id)?;
    if as_json {
        return write_json(out, &stations);
    }

    if stations.is_empty() {
        writeln!(out, "No stations found")?;
    } else {
        writeln!(out, "Stations in troncon {}:", troncon_id)?;
        for station in &stations {
            writeln!(out, "  - {} (id: {})", station.name, station.id)?;
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_defaults_to_checked() {
        let cli = Cli::try_parse_from(["vigicrues", "search", "Sulpice"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Search { query: "Sulpice".to_string(), no_check: false }
        );
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vigicrues", "get", "O408101001", "--timeout", "5", "--json"]).unwrap();
        assert_eq!(cli.command, Command::Get { station_id: "O408101001".to_string() });
        assert_eq!(cli.timeout, Some(5.0));
        assert!(cli.json);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["vigicrues"]).is_err());
    }

    #[test]
    fn test_troncons_requires_territory() {
        assert!(Cli::try_parse_from(["vigicrues", "troncons"]).is_err());
    }
}
