//! Departure board types.

use serde::Deserialize;

use super::time::{Timestamp, deserialize_optional_timestamp, deserialize_timestamp};
use super::trip::Product;

/// A station the departing train calls at.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStation {
    pub uic_code: String,
    pub medium_name: String,
}

/// A single upcoming departure at one station.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub direction: String,
    /// Train identification, e.g. "NS 2800"
    pub name: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub planned_date_time: Timestamp,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub actual_date_time: Option<Timestamp>,
    pub planned_track: Option<String>,
    pub actual_track: Option<String>,
    pub product: Option<Product>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub route_stations: Vec<RouteStation>,
}

impl Departure {
    /// Whole minutes between planned and actual departure, truncated toward zero.
    ///
    /// `None` when no actual time is known.
    pub fn delay_minutes(&self) -> Option<i64> {
        self.actual_date_time
            .map(|actual| (actual - self.planned_date_time).num_minutes())
    }

    /// The actual track, only when it is known and differs from the planned one.
    ///
    /// NS sends an empty string when no actual track is assigned yet.
    pub fn changed_track(&self) -> Option<&str> {
        self.actual_track
            .as_deref()
            .filter(|actual| !actual.is_empty())
            .filter(|actual| Some(*actual) != self.planned_track.as_deref())
    }
}

/// Inner payload of the departures endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeparturesPayload {
    pub source: String,
    pub departures: Vec<Departure>,
}

/// Response of the departures endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeparturesResponse {
    pub payload: DeparturesPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn departure(planned: &str, actual: Option<&str>) -> Departure {
        serde_json::from_value(json!({
            "direction": "Rotterdam Centraal",
            "name": "NS 2800",
            "plannedDateTime": planned,
            "actualDateTime": actual,
            "plannedTrack": "5b",
            "actualTrack": "5b",
        }))
        .unwrap()
    }

    #[test]
    fn delay_in_whole_minutes() {
        let dep = departure("2025-11-18T10:00:00+0100", Some("2025-11-18T10:07:00+0100"));
        assert_eq!(dep.delay_minutes(), Some(7));

        let dep = departure("2025-11-18T10:00:00+0100", Some("2025-11-18T10:07:59+0100"));
        assert_eq!(dep.delay_minutes(), Some(7));

        let dep = departure("2025-11-18T10:00:00+0100", Some("2025-11-18T09:58:00+0100"));
        assert_eq!(dep.delay_minutes(), Some(-2));

        let dep = departure("2025-11-18T10:00:00+0100", None);
        assert_eq!(dep.delay_minutes(), None);
    }

    #[test]
    fn delay_across_offsets() {
        let dep = departure("2025-11-18T10:00:00+0100", Some("2025-11-18T09:05:00Z"));
        assert_eq!(dep.delay_minutes(), Some(5));
    }

    #[test]
    fn track_change_detection() {
        let mut dep = departure("2025-11-18T10:00:00+0100", None);
        assert_eq!(dep.changed_track(), None);

        dep.actual_track = Some("5a".into());
        assert_eq!(dep.changed_track(), Some("5a"));

        dep.actual_track = None;
        assert_eq!(dep.changed_track(), None);

        dep.planned_track = None;
        dep.actual_track = Some("7".into());
        assert_eq!(dep.changed_track(), Some("7"));

        dep.planned_track = Some("5b".into());
        dep.actual_track = Some(String::new());
        assert_eq!(dep.changed_track(), None);
    }

    #[test]
    fn defaults_for_missing_fields() {
        let dep: Departure = serde_json::from_value(json!({
            "direction": "Zwolle",
            "name": "NS 700",
            "plannedDateTime": "2025-11-18T10:00:00+0100",
        }))
        .unwrap();
        assert!(!dep.cancelled);
        assert!(dep.product.is_none());
        assert!(dep.route_stations.is_empty());
        assert!(dep.planned_track.is_none());
    }

    #[test]
    fn planned_time_is_required() {
        let result: Result<Departure, _> = serde_json::from_value(json!({
            "direction": "Zwolle",
            "name": "NS 700",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn response_envelope() {
        let response: DeparturesResponse = serde_json::from_value(json!({
            "payload": {
                "source": "PPV",
                "departures": [{
                    "direction": "Zwolle",
                    "name": "NS 700",
                    "plannedDateTime": "2025-11-18T10:00:00+0100",
                    "routeStations": [{ "uicCode": "8400058", "mediumName": "Amersfoort C." }]
                }]
            }
        }))
        .unwrap();
        assert_eq!(response.payload.departures.len(), 1);
        assert_eq!(
            response.payload.departures[0].route_stations[0].medium_name,
            "Amersfoort C."
        );
    }
}
