//! Tool layer.
//!
//! Each tool validates and normalizes caller arguments, makes exactly one
//! NS API call, and projects the result into a flat JSON shape. Tools never
//! fail: upstream and validation errors come back as an `error` field next
//! to empty results, so an agent can carry on after a failed lookup.

mod departures;
mod dto;
mod resource;
mod state;
mod stations;
mod trips;

pub use departures::get_departures;
pub use dto::*;
pub use resource::{STATION_URI_PREFIX, station_profile};
pub use state::AppState;
pub use stations::search_stations;
pub use trips::search_trips;
