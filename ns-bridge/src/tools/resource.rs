//! The `station://{code}` resource.

use askama::Template;
use tracing::warn;

use crate::domain::Station;

use super::state::AppState;

/// URI scheme of the station resource.
pub const STATION_URI_PREFIX: &str = "station://";

/// Markdown profile of a single station.
#[derive(Template)]
#[template(
    source = "# {{ name }}\n\n- **Code**: {{ code }}\n- **UIC Code**: {{ uic_code }}\n- **Country**: {{ country }}\n{% if let Some(location) = location %}- **Location**: {{ location }}\n{% endif %}",
    ext = "txt"
)]
struct StationProfileTemplate<'a> {
    name: &'a str,
    code: &'a str,
    uic_code: &'a str,
    country: &'a str,
    location: Option<String>,
}

impl<'a> From<&'a Station> for StationProfileTemplate<'a> {
    fn from(station: &'a Station) -> Self {
        Self {
            name: station.name(),
            code: station.code.as_deref().unwrap_or("unknown"),
            uic_code: station.uic_code.as_deref().unwrap_or("unknown"),
            country: station.country_code.as_deref().unwrap_or("unknown"),
            location: station
                .coordinates()
                .map(|(lat, lng)| format!("{lat}, {lng}")),
        }
    }
}

/// Render the profile of the station with the given code.
///
/// Never fails: a missing station or an upstream error is described in the
/// returned text.
pub async fn station_profile(state: &AppState, code: &str) -> String {
    let stations = match state.client.search_stations(Some(code), None, 1).await {
        Ok(stations) => stations,
        Err(e) => {
            warn!(error = %e, code, "station profile lookup failed");
            return format!("Error retrieving station information: {e}");
        }
    };

    let Some(station) = stations.first() else {
        return format!("Station '{code}' not found");
    };

    StationProfileTemplate::from(station)
        .render()
        .unwrap_or_else(|e| format!("Error retrieving station information: {e}"))
}
