//! # Route loader
//!
//! Loads a route from a CSV file with the header `x,y,z,yaw,speed_ms`. Positions are in meters in
//! the map frame, `yaw` is the waypoint heading in radians and `speed_ms` the reference speed in
//! meters/second.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{io::Read, path::Path};

use nalgebra::Vector3;
use serde::Deserialize;

use super::{Route, RouteError, Waypoint};
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One row of a route file.
#[derive(Debug, Deserialize)]
struct RouteRow {
    x: f64,
    y: f64,
    z: f64,
    yaw: f64,
    speed_ms: f64,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Could not read the route file: {0}")]
    CsvError(csv::Error),

    #[error("The route file does not describe a valid route: {0}")]
    InvalidRoute(RouteError),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a route from the CSV file at `path`.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Route, LoaderError> {
    let reader = csv::Reader::from_path(path).map_err(LoaderError::CsvError)?;

    read_route(reader)
}

/// Load a route from any reader providing CSV data.
pub fn load_csv_from_reader<R: Read>(rdr: R) -> Result<Route, LoaderError> {
    read_route(csv::Reader::from_reader(rdr))
}

fn read_route<R: Read>(mut reader: csv::Reader<R>) -> Result<Route, LoaderError> {
    let waypoints = reader
        .deserialize::<RouteRow>()
        .map(|row| {
            row.map(|r| Waypoint {
                pose: Pose::from_position_heading(Vector3::new(r.x, r.y, r.z), r.yaw),
                speed_ms: r.speed_ms,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(LoaderError::CsvError)?;

    Route::new(waypoints).map_err(LoaderError::InvalidRoute)
}
