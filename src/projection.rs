/// Lambert-93 (EPSG:2154) to WGS84 (EPSG:4326) conversion.
///
/// Vigicrues publishes station positions in the French national metric
/// grid. Both projection definitions are fixed, so the conversion is a pure
/// function of its input.

use crate::model::{Result, VigicruesError};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use std::sync::LazyLock;

/// RGF93 / Lambert-93.
const LAMBERT_93: &str = "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 \
                          +x_0=700000 +y_0=6600000 +ellps=GRS80 \
                          +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// WGS84 geographic coordinates.
const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Both definitions, parsed once. Construction failure is kept as a message
/// and reported on every conversion.
static PROJECTIONS: LazyLock<std::result::Result<(Proj, Proj), String>> = LazyLock::new(|| {
    let source = Proj::from_proj_string(LAMBERT_93).map_err(|e| format!("Invalid Lambert-93 definition: {:?}", e))?;
    let target = Proj::from_proj_string(WGS84).map_err(|e| format!("Invalid WGS84 definition: {:?}", e))?;
    Ok((source, target))
});

/// Converts a Lambert-93 `(x, y)` pair to `(longitude, latitude)` in
/// degrees.
pub fn lambert93_to_wgs84(x: f64, y: f64) -> Result<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return Err(VigicruesError::InvalidArgument(format!(
            "Invalid coordinate format: {}, {}",
            x, y
        )));
    }

    let (source, target) = PROJECTIONS.as_ref().map_err(|e| VigicruesError::Internal(e.clone()))?;

    let mut point = (x, y, 0.0);
    transform(source, target, &mut point).map_err(|e| {
        VigicruesError::InvalidArgument(format!("Transform of ({}, {}) failed: {:?}", x, y, e))
    })?;

    // proj4rs works in radians for geographic systems
    let (lon, lat) = (point.0.to_degrees(), point.1.to_degrees());
    if !lon.is_finite() || !lat.is_finite() {
        return Err(VigicruesError::InvalidArgument(format!(
            "Coordinates ({}, {}) fall outside the Lambert-93 domain",
            x, y
        )));
    }

    Ok((lon, lat))
}

/// Validates the raw coordinate strings of a station document and returns
/// `(latitude, longitude)`.
///
/// # Errors
/// - `InvalidArgument("Missing coordinates for station …")` when either
///   value is absent or empty.
/// - `InvalidArgument("Invalid coordinate format: x, y")` when either value
///   is not a finite number.
pub fn extract_coordinates(x: Option<&str>, y: Option<&str>, station_id: &str) -> Result<(f64, f64)> {
    let (x_str, y_str) = match (x.map(str::trim), y.map(str::trim)) {
        (Some(x), Some(y)) if !x.is_empty() && !y.is_empty() => (x, y),
        _ => {
            return Err(VigicruesError::InvalidArgument(format!(
                "Missing coordinates for station {}",
                station_id
            )));
        }
    };

    let invalid = || VigicruesError::InvalidArgument(format!("Invalid coordinate format: {}, {}", x_str, y_str));
    let x: f64 = x_str.parse().map_err(|_| invalid())?;
    let y: f64 = y_str.parse().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }

    let (longitude, latitude) = lambert93_to_wgs84(x, y)?;
    Ok((latitude, longitude))
}
