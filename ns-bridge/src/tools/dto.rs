//! Tool parameters and output shapes.
//!
//! Outputs are flat, stable JSON shapes for agents. Times are ISO 8601
//! strings; fields that NS did not report are left out rather than sent
//! as placeholders, except where a key is always present (then `null`).

use chrono::SecondsFormat;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use crate::domain::{Departure, Leg, Price, Station, Stop, Timestamp, Trip, format_price};
use crate::ns::NsError;

fn default_station_limit() -> i64 {
    10
}

fn default_travel_class() -> String {
    "second".to_string()
}

fn default_discount() -> String {
    "none".to_string()
}

fn default_num_trips() -> i64 {
    5
}

fn default_max_journeys() -> i64 {
    10
}

fn iso(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Tracks are sometimes sent as empty strings; treat those as unknown.
fn track(track: &Option<String>) -> Option<String> {
    track.as_deref().filter(|t| !t.is_empty()).map(str::to_string)
}

/// Accept integers, whole-number floats (`5.0`) and numeric strings (`"20"`).
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    };
    number.ok_or_else(|| de::Error::custom(format!("expected an integer, got {value}")))
}

fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Arguments of the `search_stations` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchStationsParams {
    /// Station name query (at least 2 characters). Empty lists all stations.
    #[serde(default)]
    pub query: Option<String>,

    /// Comma-separated country codes, e.g. "nl,de,be"
    #[serde(default)]
    pub country_codes: Option<String>,

    /// Maximum number of results (clamped to 1..=100)
    #[serde(default = "default_station_limit", deserialize_with = "lenient_int")]
    pub limit: i64,
}

impl Default for SearchStationsParams {
    fn default() -> Self {
        Self {
            query: None,
            country_codes: None,
            limit: default_station_limit(),
        }
    }
}

/// Arguments of the `search_trips` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchTripsParams {
    /// Origin station code, e.g. "ut"
    pub origin: String,

    /// Destination station code, e.g. "asd"
    pub destination: String,

    /// Departure (or arrival) time in ISO format; defaults to now
    #[serde(default)]
    pub date_time: Option<String>,

    /// Treat `date_time` as the arrival time
    #[serde(default)]
    pub search_for_arrival: bool,

    /// Optional station code to route through
    #[serde(default)]
    pub via_station: Option<String>,

    /// "first" or "second"
    #[serde(default = "default_travel_class")]
    pub travel_class: String,

    /// "none", "20_percent" or "40_percent"
    #[serde(default = "default_discount")]
    pub discount: String,

    /// Number of trip options to return; negative means none
    #[serde(default = "default_num_trips", deserialize_with = "lenient_int")]
    pub num_trips: i64,
}

impl SearchTripsParams {
    /// Trip search between two station codes with default options.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            date_time: None,
            search_for_arrival: false,
            via_station: None,
            travel_class: default_travel_class(),
            discount: default_discount(),
            num_trips: default_num_trips(),
        }
    }
}

/// Arguments of the `get_departures` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct GetDeparturesParams {
    /// Station code, e.g. "ut"
    pub station: String,

    /// Maximum number of departures (clamped to 1..=40)
    #[serde(default = "default_max_journeys", deserialize_with = "lenient_int")]
    pub max_journeys: i64,

    /// Show departures from this ISO time; defaults to now
    #[serde(default)]
    pub date_time: Option<String>,
}

impl GetDeparturesParams {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            max_journeys: default_max_journeys(),
            date_time: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Station search output
// ---------------------------------------------------------------------------

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A station in search results.
#[derive(Debug, Serialize)]
pub struct StationView {
    pub name: String,
    pub code: Option<String>,
    pub uic_code: Option<String>,
    pub country: Option<String>,
    /// Present only when both coordinates are known
    pub location: Option<Coordinates>,
}

impl From<&Station> for StationView {
    fn from(station: &Station) -> Self {
        Self {
            name: station.name().to_string(),
            code: station.code.clone(),
            uic_code: station.uic_code.clone(),
            country: station.country_code.clone(),
            location: station
                .coordinates()
                .map(|(lat, lng)| Coordinates { lat, lng }),
        }
    }
}

/// Output of the `search_stations` tool.
#[derive(Debug, Serialize)]
pub struct StationsOutput {
    pub count: usize,
    pub stations: Vec<StationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
}

impl StationsOutput {
    pub fn found(stations: Vec<StationView>) -> Self {
        Self {
            count: stations.len(),
            stations,
            error: None,
            error_type: None,
        }
    }

    pub fn failed(err: &NsError) -> Self {
        Self {
            count: 0,
            stations: Vec::new(),
            error: Some(err.to_string()),
            error_type: Some(err.kind()),
        }
    }
}

// ---------------------------------------------------------------------------
// Trip search output
// ---------------------------------------------------------------------------

/// Origin or destination of a leg.
#[derive(Debug, Serialize)]
pub struct StopView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_track: Option<String>,
}

impl From<&Stop> for StopView {
    fn from(stop: &Stop) -> Self {
        Self {
            name: stop.name.clone(),
            planned_time: stop.planned_date_time.as_ref().map(iso),
            actual_time: stop.actual_date_time.as_ref().map(iso),
            planned_track: track(&stop.planned_track),
            actual_track: track(&stop.actual_track),
        }
    }
}

/// One leg of a trip.
#[derive(Debug, Serialize)]
pub struct LegView {
    /// e.g. "NS Intercity 2800"
    pub transport: String,
    pub direction: Option<String>,
    pub origin: StopView,
    pub destination: StopView,
    pub cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Category label, e.g. "Intercity"
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Leg> for LegView {
    fn from(leg: &Leg) -> Self {
        Self {
            transport: leg.name.clone(),
            direction: leg.direction.clone(),
            origin: StopView::from(&leg.origin),
            destination: StopView::from(&leg.destination),
            cancelled: leg.cancelled,
            operator: leg.product.as_ref().and_then(|p| p.operator_name.clone()),
            category: leg
                .product
                .as_ref()
                .and_then(|p| p.long_category_name.clone()),
        }
    }
}

/// Fare for a trip.
#[derive(Debug, Serialize)]
pub struct PriceView {
    pub total_cents: i64,
    pub total_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplement_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplement_formatted: Option<String>,
}

impl From<&Price> for PriceView {
    fn from(price: &Price) -> Self {
        let base = price.price_in_cents_excluding_supplement;
        let supplement = price.supplement_in_cents.filter(|cents| *cents != 0);

        Self {
            total_cents: price.price_in_cents,
            total_formatted: format_price(price.price_in_cents),
            product: price.product.clone(),
            travel_class: price.travel_class.clone(),
            discount_type: price.discount_type.clone(),
            base_cents: base,
            base_formatted: base.map(format_price),
            supplement_cents: supplement,
            supplement_formatted: supplement.map(format_price),
        }
    }
}

/// A trip option.
///
/// Planned and actual times/tracks at the trip's endpoints are reported
/// separately so callers can spot delays and platform changes.
#[derive(Debug, Serialize)]
pub struct TripView {
    pub duration_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_duration_minutes: Option<i64>,
    pub transfers: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_departure_track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_departure_track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_arrival_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_arrival_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_arrival_track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_arrival_track: Option<String>,
    pub legs: Vec<LegView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceView>,
}

impl From<&Trip> for TripView {
    fn from(trip: &Trip) -> Self {
        let departure = trip.first_leg().map(|leg| &leg.origin);
        let arrival = trip.last_leg().map(|leg| &leg.destination);

        Self {
            duration_minutes: trip.planned_duration_in_minutes,
            actual_duration_minutes: trip.actual_duration_in_minutes,
            transfers: trip.transfers,
            status: trip.status.clone(),
            planned_departure_time: departure.and_then(|s| s.planned_date_time.as_ref().map(iso)),
            actual_departure_time: departure.and_then(|s| s.actual_date_time.as_ref().map(iso)),
            planned_departure_track: departure.and_then(|s| track(&s.planned_track)),
            actual_departure_track: departure.and_then(|s| track(&s.actual_track)),
            planned_arrival_time: arrival.and_then(|s| s.planned_date_time.as_ref().map(iso)),
            actual_arrival_time: arrival.and_then(|s| s.actual_date_time.as_ref().map(iso)),
            planned_arrival_track: arrival.and_then(|s| track(&s.planned_track)),
            actual_arrival_track: arrival.and_then(|s| track(&s.actual_track)),
            legs: trip.legs.iter().map(LegView::from).collect(),
            price: trip.display_fare().map(PriceView::from),
        }
    }
}

/// The caller's request as understood by the tool, echoed on failure.
#[derive(Debug, Clone, Serialize)]
pub struct TripDebug {
    pub origin: String,
    pub destination: String,
    pub travel_class: String,
    pub travel_class_int: u8,
    pub discount: String,
    pub date_time: Option<String>,
    pub search_for_arrival: bool,
    pub via_station: Option<String>,
}

/// Output of the `search_trips` tool.
#[derive(Debug, Serialize)]
pub struct TripsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub trips: Vec<TripView>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<TripDebug>,
}

impl TripsOutput {
    pub fn found(origin: String, destination: String, trips: Vec<TripView>) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            count: trips.len(),
            trips,
            error: None,
            error_type: None,
            debug: None,
        }
    }

    pub fn failed(err: &NsError, debug: TripDebug) -> Self {
        Self {
            origin: None,
            destination: None,
            trips: Vec::new(),
            count: 0,
            error: Some(err.to_string()),
            error_type: Some(err.kind()),
            debug: Some(debug),
        }
    }

    /// Failure before the arguments could be read, so there is no request
    /// to echo.
    pub fn rejected(err: &NsError) -> Self {
        Self {
            origin: None,
            destination: None,
            trips: Vec::new(),
            count: 0,
            error: Some(err.to_string()),
            error_type: Some(err.kind()),
            debug: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Departures output
// ---------------------------------------------------------------------------

/// A departure on the board.
#[derive(Debug, Serialize)]
pub struct DepartureView {
    pub direction: String,
    pub name: String,
    pub planned_time: String,
    pub planned_track: Option<String>,
    pub cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<String>,
    /// Only for positive delays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<i64>,
    /// Only when different from the planned track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Departure> for DepartureView {
    fn from(departure: &Departure) -> Self {
        let changed_track = departure.changed_track().map(str::to_string);

        Self {
            direction: departure.direction.clone(),
            name: departure.name.clone(),
            planned_time: iso(&departure.planned_date_time),
            planned_track: departure.planned_track.clone(),
            cancelled: departure.cancelled,
            actual_time: departure.actual_date_time.as_ref().map(iso),
            delay_minutes: departure.delay_minutes().filter(|mins| *mins > 0),
            track_changed: changed_track.as_ref().map(|_| true),
            actual_track: changed_track,
            operator: departure
                .product
                .as_ref()
                .and_then(|p| p.operator_name.clone()),
            category: departure
                .product
                .as_ref()
                .and_then(|p| p.long_category_name.clone()),
        }
    }
}

/// Output of the `get_departures` tool.
#[derive(Debug, Serialize)]
pub struct DeparturesOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    pub departures: Vec<DepartureView>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
}

impl DeparturesOutput {
    pub fn found(station: String, departures: Vec<DepartureView>) -> Self {
        Self {
            station: Some(station),
            count: departures.len(),
            departures,
            error: None,
            error_type: None,
        }
    }

    pub fn failed(err: &NsError) -> Self {
        Self {
            station: None,
            departures: Vec::new(),
            count: 0,
            error: Some(err.to_string()),
            error_type: Some(err.kind()),
        }
    }
}
