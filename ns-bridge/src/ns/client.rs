//! NS API HTTP client.
//!
//! One shared request executor backs the three operations. Every call is a
//! single GET; there is no retry and no caching.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{DEFAULT_BASE_URL, Settings};
use crate::domain::{
    DeparturesResponse, DiscountType, QueryTime, Station, TravelClass, TripSearchResponse,
};

use super::error::NsError;

/// Header carrying the subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

const STATIONS_ENDPOINT: &str = "/nsapp-stations/v2";
const TRIPS_ENDPOINT: &str = "/reisinformatie-api/api/v3/trips";
const DEPARTURES_ENDPOINT: &str = "/reisinformatie-api/api/v2/departures";

/// Shortest accepted station search query, in characters.
const MIN_QUERY_LENGTH: usize = 2;

/// How much of an unparseable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the NS client.
#[derive(Debug, Clone)]
pub struct NsConfig {
    /// Subscription key sent with every request
    pub api_key: String,
    /// Base URL for the API (defaults to the production gateway)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl From<&Settings> for NsConfig {
    fn from(settings: &Settings) -> Self {
        NsConfig::new(settings.ns_api_key.clone()).with_base_url(settings.ns_api_base_url.clone())
    }
}

/// Parameters for a trip search.
///
/// Origin and destination can each be given as a station code or a UIC
/// code; the station code wins when both are set.
#[derive(Debug, Clone, Default)]
pub struct TripQuery {
    pub origin_station: Option<String>,
    pub destination_station: Option<String>,
    pub origin_uic: Option<String>,
    pub destination_uic: Option<String>,
    pub date_time: Option<QueryTime>,
    pub search_for_arrival: bool,
    pub via_station: Option<String>,
    pub travel_class: TravelClass,
    pub discount: DiscountType,
}

impl TripQuery {
    /// Trip between two station codes with default options.
    pub fn between(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin_station: Some(origin.into()),
            destination_station: Some(destination.into()),
            ..Self::default()
        }
    }

    /// Build the upstream query parameters, validating the endpoints.
    fn to_params(&self) -> Result<Vec<(&'static str, String)>, NsError> {
        let mut params = vec![("travelClass", self.travel_class.as_query_int().to_string())];

        if self.discount != DiscountType::NoDiscount {
            params.push(("discount", self.discount.as_str().to_string()));
        }

        match (
            non_empty(&self.origin_station),
            non_empty(&self.origin_uic),
        ) {
            (Some(station), _) => params.push(("fromStation", station.to_string())),
            (None, Some(uic)) => params.push(("originUicCode", uic.to_string())),
            (None, None) => {
                return Err(NsError::Validation(
                    "Either origin_station or origin_uic must be provided".to_string(),
                ));
            }
        }

        match (
            non_empty(&self.destination_station),
            non_empty(&self.destination_uic),
        ) {
            (Some(station), _) => params.push(("toStation", station.to_string())),
            (None, Some(uic)) => params.push(("destinationUicCode", uic.to_string())),
            (None, None) => {
                return Err(NsError::Validation(
                    "Either destination_station or destination_uic must be provided".to_string(),
                ));
            }
        }

        if let Some(date_time) = &self.date_time {
            params.push(("dateTime", date_time.to_query_value()));
        }

        if self.search_for_arrival {
            params.push(("searchForArrival", "true".to_string()));
        }

        if let Some(via) = non_empty(&self.via_station) {
            params.push(("viaStation", via.to_string()));
        }

        Ok(params)
    }
}

/// NS API client.
///
/// Cheap to share: the underlying `reqwest::Client` pools connections and is
/// safe for concurrent use.
#[derive(Debug, Clone)]
pub struct NsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NsClient {
    /// Create a new NS client with the given configuration.
    pub fn new(config: NsConfig) -> Result<Self, NsError> {
        let mut headers = HeaderMap::new();

        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| NsError::InvalidApiKey)?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static(SUBSCRIPTION_KEY_HEADER), api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(NsError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue one request and return the response body as untyped JSON.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, NsError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, ?params, "NS API request");

        let response = self
            .http
            .request(method, &url)
            .query(params)
            .send()
            .await
            .inspect_err(|e| error!(%url, error = %e, "NS API request error"))?;

        let status = response.status();
        debug!(status = status.as_u16(), "NS API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "NS API request failed");
            return Err(NsError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| NsError::Deserialize {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }

    /// Search stations by name and/or country.
    ///
    /// A non-empty `query` must be at least two characters. Station records
    /// that fail to parse are skipped rather than failing the whole search.
    pub async fn search_stations(
        &self,
        query: Option<&str>,
        country_codes: Option<&[String]>,
        limit: u32,
    ) -> Result<Vec<Station>, NsError> {
        let mut params = vec![("limit", limit.to_string())];

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            if query.chars().count() < MIN_QUERY_LENGTH {
                return Err(NsError::Validation(format!(
                    "Query must be at least {MIN_QUERY_LENGTH} characters long"
                )));
            }
            params.push(("q", query.to_string()));
        }

        if let Some(codes) = country_codes.filter(|c| !c.is_empty()) {
            params.push(("countryCodes", codes.join(",")));
        }

        let data = self
            .request(Method::GET, STATIONS_ENDPOINT, &params)
            .await?;

        Ok(parse_stations(data))
    }

    /// Search trips between two stations, with fares for the requested
    /// class and discount.
    pub async fn search_trips(&self, query: &TripQuery) -> Result<TripSearchResponse, NsError> {
        let params = query.to_params()?;
        let data = self.request(Method::GET, TRIPS_ENDPOINT, &params).await?;
        decode(data)
    }

    /// Get the departure board of a station, by station code or UIC code.
    pub async fn get_departures(
        &self,
        station: Option<&str>,
        uic_code: Option<&str>,
        max_journeys: u32,
        date_time: Option<&QueryTime>,
    ) -> Result<DeparturesResponse, NsError> {
        let mut params = vec![("maxJourneys", max_journeys.to_string())];

        match (
            station.filter(|s| !s.is_empty()),
            uic_code.filter(|u| !u.is_empty()),
        ) {
            (Some(station), _) => params.push(("station", station.to_string())),
            (None, Some(uic)) => params.push(("uicCode", uic.to_string())),
            (None, None) => {
                return Err(NsError::Validation(
                    "Either station or uic_code must be provided".to_string(),
                ));
            }
        }

        if let Some(date_time) = date_time {
            params.push(("dateTime", date_time.to_query_value()));
        }

        let data = self
            .request(Method::GET, DEPARTURES_ENDPOINT, &params)
            .await?;
        decode(data)
    }
}

/// Parse the `payload` array of a stations response item by item.
pub(crate) fn parse_stations(mut data: Value) -> Vec<Station> {
    let records = match data.get_mut("payload").map(Value::take) {
        Some(Value::Array(records)) => records,
        None | Some(Value::Null) => return Vec::new(),
        Some(_) => {
            warn!("stations payload is not an array, ignoring it");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Station>(record) {
            Ok(station) => Some(station),
            Err(e) => {
                warn!(error = %e, "Failed to parse station data, skipping");
                None
            }
        })
        .collect()
}

/// Deserialize a whole response; any mismatch fails the call.
fn decode<T: DeserializeOwned>(data: Value) -> Result<T, NsError> {
    serde_json::from_value(data).map_err(|e| {
        error!(error = %e, "NS API response did not match the expected shape");
        NsError::Deserialize {
            message: e.to_string(),
            body: None,
        }
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
