//! Trip planner response types.

use serde::Deserialize;

use super::price::Price;
use super::time::{Timestamp, deserialize_optional_timestamp};

/// A point on a leg: its origin, its destination, or an intermediate stop.
///
/// Planned times are usually present at origin and destination but may be
/// missing at intermediate stops.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub planned_date_time: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub actual_date_time: Option<Timestamp>,
    pub planned_track: Option<String>,
    pub actual_track: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub country_code: Option<String>,
    pub uic_code: Option<String>,
    pub station_code: Option<String>,
}

/// Line and operator metadata for a leg or departure.
///
/// Every field is optional; a missing field means "unknown".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub number: Option<String>,
    /// e.g. "IC"
    pub category_code: Option<String>,
    pub short_category_name: Option<String>,
    /// e.g. "Intercity"
    pub long_category_name: Option<String>,
    pub operator_code: Option<String>,
    pub operator_name: Option<String>,
    /// e.g. "TRAIN", "BUS"
    #[serde(rename = "type")]
    pub product_type: Option<String>,
}

/// Display duration of a leg.
///
/// NS sends either `{"value": "26 min."}` or a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegDuration {
    Display { value: String },
    Text(String),
}

impl LegDuration {
    pub fn as_str(&self) -> &str {
        match self {
            LegDuration::Display { value } => value,
            LegDuration::Text(text) => text,
        }
    }
}

/// One continuous ride on a single vehicle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub idx: String,
    /// e.g. "NS Intercity 2800"
    pub name: String,
    pub direction: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
    pub origin: Stop,
    pub destination: Stop,
    pub product: Option<Product>,
    #[serde(default)]
    pub stops: Vec<Stop>,
    pub duration: Option<LegDuration>,
}

/// A complete trip option from origin to destination.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub idx: i64,
    pub uid: String,
    pub planned_duration_in_minutes: i64,
    pub actual_duration_in_minutes: Option<i64>,
    pub transfers: i64,
    /// e.g. "NORMAL", "CANCELLED"
    pub status: String,
    pub legs: Vec<Leg>,
    pub fare_route: Option<serde_json::Value>,
    /// Fare for the requested class and discount.
    pub product_fare: Option<Price>,
    /// All fare options.
    pub fares: Option<Vec<Price>>,
    /// Legacy alias of `product_fare`.
    pub price: Option<Price>,
}

impl Trip {
    /// The fare to show: the selected fare, falling back to the legacy field.
    pub fn display_fare(&self) -> Option<&Price> {
        self.product_fare.as_ref().or(self.price.as_ref())
    }

    pub fn first_leg(&self) -> Option<&Leg> {
        self.legs.first()
    }

    pub fn last_leg(&self) -> Option<&Leg> {
        self.legs.last()
    }
}

/// Response of the trips endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TripSearchResponse {
    pub source: String,
    pub trips: Vec<Trip>,
}
