//! Station and location types.

use serde::Deserialize;

/// Station name variants (`namen` in the NS API).
#[derive(Debug, Clone, Deserialize)]
pub struct StationNames {
    /// Full name, e.g. "Utrecht Centraal"
    #[serde(rename = "lang")]
    pub long: String,
    /// e.g. "Utrecht C."
    #[serde(rename = "middel")]
    pub medium: Option<String>,
    /// e.g. "Utrecht"
    #[serde(rename = "kort")]
    pub short: Option<String>,
}

/// A station from the NS station directory.
///
/// Only the full name is guaranteed; foreign stations in particular often
/// lack a code or coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct Station {
    #[serde(rename = "namen")]
    pub names: StationNames,
    /// Short NS station code, e.g. "ut"
    pub code: Option<String>,
    #[serde(rename = "UICCode")]
    pub uic_code: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "land")]
    pub country_code: Option<String>,
}

impl Station {
    /// The full station name.
    pub fn name(&self) -> &str {
        &self.names.long
    }

    /// Coordinates as `(lat, lng)`, only when both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

/// A named place in a trip response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub country_code: Option<String>,
    pub uic_code: Option<String>,
}
