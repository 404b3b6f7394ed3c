/// Test fixtures: representative JSON payloads from the two upstream APIs.
///
/// Trimmed to the fields the parsers read, plus a few extra fields the
/// live services return, so tolerance of unknown keys is exercised too.
///
/// OpenDataSoft catalog shape:
///   results[]
///     .cdstationhydro           — station code (string)
///     .lbstationhydro           — station label
///     .dtfermeturestationhydro  — closure date, null while the station is active
///
/// Vigicrues hierarchy shape:
///   ListEntVigiCru[]
///     .CdEntVigiCru / .LbEntVigiCru          — the parent entity
///     .aNMoinsUn[]
///       .CdEntVigiCruInferieur / .LbEntVigiCruInferieur — its children
///
/// Station coordinates are Lambert-93 metres rendered as STRINGS.

/// One active station (Rabastens) and one closed station.
#[cfg(test)]
pub(crate) fn fixture_search_active_and_closed_json() -> &'static str {
    r#"{
      "total_count": 2,
      "results": [
        {
          "cdstationhydro": "O408101001",
          "lbstationhydro": "Le Tarn à Rabastens - Saint-Sulpice",
          "dtfermeturestationhydro": null,
          "lbcoursdeau": "Le Tarn"
        },
        {
          "cdstationhydro": "O408101002",
          "lbstationhydro": "Le Tarn à Saint-Sulpice (ancienne)",
          "dtfermeturestationhydro": "2011-12-31"
        }
      ]
    }"#
}

/// Catalog record without a station code.
#[cfg(test)]
pub(crate) fn fixture_search_missing_code_json() -> &'static str {
    r#"{ "total_count": 1, "results": [ { "fields": { "invalid_field": "value" } } ] }"#
}

#[cfg(test)]
pub(crate) fn fixture_territories_json() -> &'static str {
    r#"{
      "VersionFlux": "Beta 0.4a",
      "ListEntVigiCru": [
        { "CdEntVigiCru": "25", "LbEntVigiCru": "Garonne-Tarn-Lot", "TypEntVigiCru": "7" },
        { "CdEntVigiCru": "13", "LbEntVigiCru": "Seine moyenne-Yonne-Loing", "TypEntVigiCru": "7" }
      ]
    }"#
}

/// Territory 25 with two troncons.
#[cfg(test)]
pub(crate) fn fixture_troncons_json() -> &'static str {
    r#"{
      "ListEntVigiCru": [
        {
          "CdEntVigiCru": "25",
          "LbEntVigiCru": "Garonne-Tarn-Lot",
          "aNMoinsUn": [
            { "CdEntVigiCruInferieur": "AG3", "LbEntVigiCruInferieur": "Tarn aval" },
            { "CdEntVigiCruInferieur": "AG4", "LbEntVigiCruInferieur": "Aveyron aval" }
          ]
        }
      ]
    }"#
}

/// Troncon AG3 with its stations; codes here are numeric on purpose.
#[cfg(test)]
pub(crate) fn fixture_troncon_stations_json() -> &'static str {
    r#"{
      "ListEntVigiCru": [
        {
          "CdEntVigiCru": "AG3",
          "aNMoinsUn": [
            { "CdEntVigiCruInferieur": "O494101001", "LbEntVigiCruInferieur": "Montauban" },
            { "CdEntVigiCruInferieur": 598101001, "LbEntVigiCruInferieur": "Moissac" }
          ]
        }
      ]
    }"#
}

/// Montauban on the Tarn, Lambert-93 (567613, 6325598) ≈ (44.0169°N, 1.3488°E).
#[cfg(test)]
pub(crate) fn fixture_station_montauban_json() -> &'static str {
    r#"{
      "CdStationHydro": "O494101001",
      "LbStationHydro": "Montauban",
      "LbCoursEau": "Tarn",
      "CdCommune": "82121",
      "CoordStationHydro": {
        "CoordXStationHydro": "567613",
        "CoordYStationHydro": "6325598"
      },
      "VigilanceCrues": {
        "Photo": "https://www.vigicrues.gouv.fr/photos/O494101001.jpg",
        "StationPrevision": true,
        "CruesHistoriques": [
          { "LbUsuel": "Crue du 03/03/1930", "ValHauteur": 11.5, "ValDebit": 0 }
        ],
        "StationsBassin": [
          { "CdStationHydro": "O598101001", "LbStationHydro": "Moissac", "LbCoursEau": "Tarn" }
        ]
      }
    }"#
}

/// Station document with no `VigilanceCrues` section at all.
#[cfg(test)]
pub(crate) fn fixture_station_without_vigilance_json() -> &'static str {
    r#"{
      "LbStationHydro": "Moissac",
      "LbCoursEau": "Tarn",
      "CdCommune": "82112",
      "CoordStationHydro": {
        "CoordXStationHydro": 548120,
        "CoordYStationHydro": 6336400
      }
    }"#
}

/// Height series with two readings in chronological order.
#[cfg(test)]
pub(crate) fn fixture_height_series_json() -> &'static str {
    r#"{
      "Serie": {
        "CdStationHydro": "O408101001",
        "GrdSerie": "H",
        "ObssHydro": [
          { "DtObsHydro": "2026-02-12T11:10:00+00:00", "ResObsHydro": 5.38 },
          { "DtObsHydro": "2026-02-12T11:15:00+00:00", "ResObsHydro": 5.41 }
        ]
      }
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_empty_series_json() -> &'static str {
    r#"{ "Serie": { "ObssHydro": [] } }"#
}
