//! Domain types for NS travel information.
//!
//! This is the only place that knows the NS JSON schema. Dutch and
//! abbreviated upstream field names (`namen`, `lang`, `land`, `UICCode`, ...)
//! are mapped to normalized names here via serde attributes, so every other
//! module sees one consistent vocabulary. Fields NS may omit are `Option`.

mod departure;
mod price;
mod station;
mod time;
mod trip;

pub use departure::{Departure, DeparturesPayload, DeparturesResponse, RouteStation};
pub use price::{DiscountType, Price, TravelClass, format_price};
pub use station::{Location, Station, StationNames};
pub use time::{QueryTime, TimeError, Timestamp, parse_timestamp};
pub use trip::{Leg, LegDuration, Product, Stop, Trip, TripSearchResponse};
