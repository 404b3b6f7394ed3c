//! Local stub of the two upstream services for integration tests.
//!
//! Serves canned JSON bodies from a `tiny_http` server on an ephemeral
//! port and records every request URL (path + query) it receives.
//! Routes match on URL prefix; the first match wins, anything else is 404.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use vigicrues::ClientConfig;

pub const CATALOG_PATH: &str = "/catalog";
pub const SERVICES_PATH: &str = "/services";

pub struct Route {
    prefix: String,
    status: u16,
    body: String,
    delay: Option<Duration>,
}

impl Route {
    pub fn json(prefix: &str, body: serde_json::Value) -> Self {
        Self {
            prefix: prefix.to_string(),
            status: 200,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn raw(prefix: &str, status: u16, body: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(prefix: &str, status: u16) -> Self {
        Self::raw(prefix, status, "{}")
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

pub struct StubServer {
    server: Arc<tiny_http::Server>,
    handle: Option<JoinHandle<()>>,
    requests: Arc<Mutex<Vec<String>>>,
    base_url: String,
}

impl StubServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("Failed to bind stub server"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("stub server should listen on TCP")
            .port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    let url = request.url().to_string();
                    requests.lock().unwrap().push(url.clone());

                    let response = match routes.iter().find(|r| url.starts_with(&r.prefix)) {
                        Some(route) => {
                            if let Some(delay) = route.delay {
                                thread::sleep(delay);
                            }
                            tiny_http::Response::from_string(route.body.clone())
                                .with_status_code(route.status)
                        }
                        None => tiny_http::Response::from_string("{}").with_status_code(404),
                    };
                    let response = response.with_header(
                        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                    );

                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            handle: Some(handle),
            requests,
            base_url: format!("http://127.0.0.1:{}", port),
        }
    }

    /// Client configuration pointing both services at this stub.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            discovery_base_url: format!("{}{}", self.base_url, CATALOG_PATH),
            vigicrues_base_url: format!("{}{}", self.base_url, SERVICES_PATH),
            ..ClientConfig::default()
        }
    }

    /// URLs (path + query) received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ---------------------------------------------------------------------------
// Canned bodies
// ---------------------------------------------------------------------------

pub fn catalog_body(records: &[(&str, &str, Option<&str>)]) -> serde_json::Value {
    let results: Vec<_> = records
        .iter()
        .map(|(id, name, closed)| {
            serde_json::json!({
                "cdstationhydro": id,
                "lbstationhydro": name,
                "dtfermeturestationhydro": closed,
            })
        })
        .collect();
    serde_json::json!({ "total_count": results.len(), "results": results })
}

pub fn station_body(name: &str, x: &str, y: &str) -> serde_json::Value {
    serde_json::json!({
        "LbStationHydro": name,
        "LbCoursEau": "Tarn",
        "CdCommune": "82121",
        "CoordStationHydro": {
            "CoordXStationHydro": x,
            "CoordYStationHydro": y
        },
        "VigilanceCrues": {
            "Photo": "t",
            "StationPrevision": true,
            "CruesHistoriques": [
                { "LbUsuel": "Crue du 03/03/1930", "ValHauteur": 11.5, "ValDebit": 0 }
            ],
            "StationsBassin": [
                { "CdStationHydro": "O598101001", "LbStationHydro": "Moissac", "LbCoursEau": "Tarn" }
            ]
        }
    })
}

pub fn series_body(entries: &[(&str, f64)]) -> serde_json::Value {
    let obs: Vec<_> = entries
        .iter()
        .map(|(ts, v)| serde_json::json!({ "DtObsHydro": ts, "ResObsHydro": v }))
        .collect();
    serde_json::json!({ "Serie": { "ObssHydro": obs } })
}
