//! Local stand-in for the NS API gateway.
//!
//! Serves canned responses per path and records every request it receives,
//! so tests can check both what was sent and that nothing was sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
};
use ns_bridge::config::Settings;
use ns_bridge::ns::{NsClient, NsConfig};
use ns_bridge::tools::AppState;
use serde_json::{Value, json};

pub const STATIONS_PATH: &str = "/nsapp-stations/v2";
pub const TRIPS_PATH: &str = "/reisinformatie-api/api/v3/trips";
pub const DEPARTURES_PATH: &str = "/reisinformatie-api/api/v2/departures";

pub const API_KEY: &str = "test-subscription-key";

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub api_key: Option<String>,
}

#[derive(Clone)]
struct MockState {
    routes: Arc<HashMap<String, (StatusCode, String)>>,
    delays: Arc<HashMap<String, Duration>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[derive(Default)]
pub struct MockBuilder {
    routes: HashMap<String, (StatusCode, String)>,
    delays: HashMap<String, Duration>,
}

impl MockBuilder {
    /// Respond to `path` with 200 and the given JSON.
    pub fn json(self, path: &str, body: Value) -> Self {
        self.raw(path, 200, &body.to_string())
    }

    /// Respond to `path` with an arbitrary status and body.
    pub fn raw(mut self, path: &str, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.routes
            .insert(path.to_string(), (status, body.to_string()));
        self
    }

    /// Hold responses to `path` back for `delay`.
    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub async fn start(self) -> MockUpstream {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            routes: Arc::new(self.routes),
            delays: Arc::new(self.delays),
            requests: requests.clone(),
        };

        let app = Router::new().fallback(respond).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockUpstream {
            base_url: format!("http://{addr}"),
            requests,
        }
    }
}

async fn respond(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query,
        api_key: headers
            .get("ocp-apim-subscription-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if let Some(delay) = state.delays.get(uri.path()) {
        tokio::time::sleep(*delay).await;
    }

    match state.routes.get(uri.path()) {
        Some((status, body)) => (*status, body.clone()),
        None => (StatusCode::NOT_FOUND, "no mock for this path".to_string()),
    }
}

pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The single request received; panics otherwise.
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    pub fn client(&self) -> NsClient {
        NsClient::new(NsConfig::new(API_KEY).with_base_url(&self.base_url).with_timeout(5)).unwrap()
    }

    pub fn state(&self) -> AppState {
        let base_url = self.base_url.clone();
        let settings = Settings::from_lookup(|key| match key {
            "NS_API_KEY" => Some(API_KEY.to_string()),
            "NS_API_BASE_URL" => Some(base_url.clone()),
            _ => None,
        })
        .unwrap();
        AppState::with_client(self.client(), settings)
    }
}

/// A base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn station(name: &str, code: &str, uic: &str) -> Value {
    json!({
        "namen": { "lang": name, "middel": name, "kort": code },
        "code": code.to_uppercase(),
        "UICCode": uic,
        "lat": 52.0,
        "lng": 5.0,
        "land": "NL"
    })
}

pub fn stations_response() -> Value {
    json!({
        "payload": [
            station("Utrecht Centraal", "ut", "8400621"),
            station("Amsterdam Centraal", "asd", "8400058"),
            { "code": "BROKEN", "UICCode": "0" },
            station("Rotterdam Centraal", "rtd", "8400530"),
            station("Den Haag Centraal", "gvc", "8400282"),
        ]
    })
}

fn leg(
    idx: &str,
    from: (&str, &str, &str),
    to: (&str, &str, &str),
    extra_origin: Value,
) -> Value {
    let mut origin = json!({
        "name": from.0,
        "plannedDateTime": from.1,
        "plannedTrack": from.2,
    });
    if let (Some(origin), Some(extra)) = (origin.as_object_mut(), extra_origin.as_object()) {
        origin.extend(extra.clone());
    }
    json!({
        "idx": idx,
        "name": "NS Intercity 2800",
        "direction": to.0,
        "cancelled": false,
        "origin": origin,
        "destination": {
            "name": to.0,
            "plannedDateTime": to.1,
            "plannedTrack": to.2,
        },
        "product": {
            "number": "2800",
            "categoryCode": "IC",
            "longCategoryName": "Intercity",
            "operatorName": "NS",
            "type": "TRAIN"
        },
        "stops": [],
        "duration": { "value": "27 min." }
    })
}

pub fn trips_response() -> Value {
    json!({
        "source": "HARP",
        "trips": [
            {
                "idx": 0,
                "uid": "trip-0",
                "plannedDurationInMinutes": 27,
                "actualDurationInMinutes": 30,
                "transfers": 0,
                "status": "NORMAL",
                "legs": [leg(
                    "0",
                    ("Utrecht Centraal", "2025-11-18T14:30:00+0100", "5b"),
                    ("Rotterdam Centraal", "2025-11-18T14:57:00+0100", "12"),
                    json!({ "actualDateTime": "2025-11-18T14:33:00+0100", "actualTrack": "5a" }),
                )],
                "productFare": {
                    "priceInCents": 1250,
                    "priceInCentsExcludingSupplement": 1000,
                    "supplementInCents": 250,
                    "product": "OVCHIPKAART_ENKELE_REIS",
                    "travelClass": "SECOND_CLASS",
                    "discountType": "NO_DISCOUNT"
                },
                "price": { "priceInCents": 999 },
                "fares": [{ "priceInCents": 1250 }, { "priceInCents": 2130 }]
            },
            {
                "idx": 1,
                "uid": "trip-1",
                "plannedDurationInMinutes": 41,
                "transfers": 1,
                "status": "NORMAL",
                "legs": [
                    leg(
                        "0",
                        ("Utrecht Centraal", "2025-11-18T14:40:00+0100", "7"),
                        ("Gouda", "2025-11-18T15:00:00+0100", "3"),
                        json!({}),
                    ),
                    leg(
                        "1",
                        ("Gouda", "2025-11-18T15:05:00+0100", "4"),
                        ("Rotterdam Centraal", "2025-11-18T15:21:00+0100", "9"),
                        json!({}),
                    ),
                ],
                "price": { "priceInCents": 1180 }
            },
            {
                "idx": 2,
                "uid": "trip-2",
                "plannedDurationInMinutes": 27,
                "transfers": 0,
                "status": "CANCELLED",
                "legs": [leg(
                    "0",
                    ("Utrecht Centraal", "2025-11-18T15:00:00+0100", "5b"),
                    ("Rotterdam Centraal", "2025-11-18T15:27:00+0100", "12"),
                    json!({}),
                )]
            }
        ]
    })
}

pub fn departures_response() -> Value {
    json!({
        "payload": {
            "source": "PPV",
            "departures": [
                {
                    "direction": "Rotterdam Centraal",
                    "name": "NS 2800",
                    "plannedDateTime": "2025-11-18T10:00:00+0100",
                    "actualDateTime": "2025-11-18T10:07:00+0100",
                    "plannedTrack": "5b",
                    "actualTrack": "5a",
                    "product": {
                        "number": "2800",
                        "longCategoryName": "Intercity",
                        "operatorName": "NS"
                    },
                    "cancelled": false,
                    "routeStations": [{ "uicCode": "8400258", "mediumName": "Gouda" }]
                },
                {
                    "direction": "Zwolle",
                    "name": "NS 700",
                    "plannedDateTime": "2025-11-18T10:00:00+0100",
                    "actualDateTime": "2025-11-18T09:58:00+0100",
                    "plannedTrack": "18",
                    "actualTrack": "18",
                    "cancelled": true
                }
            ]
        }
    })
}
