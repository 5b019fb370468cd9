//! Tool and resource descriptors advertised to MCP clients.

use serde::Serialize;
use serde_json::json;

use crate::tools::STATION_URI_PREFIX;

/// A callable tool.
#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// A parameterized resource.
#[derive(Debug, Serialize)]
pub struct ResourceTemplate {
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

pub const SEARCH_STATIONS: &str = "search_stations";
pub const SEARCH_TRIPS: &str = "search_trips";
pub const GET_DEPARTURES: &str = "get_departures";

pub fn tools() -> Vec<Tool> {
    vec![
        Tool {
            name: SEARCH_STATIONS,
            description: "Search for train stations by name or filter by country. Use this to find station codes needed for trip planning. Returns stations with their code, UIC code, country and location.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Station name to search for (minimum 2 characters). Leave empty to list all stations."
                    },
                    "country_codes": {
                        "type": "string",
                        "description": "Comma-separated country codes to filter on, e.g. \"nl,de,be\""
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results (default: 10, max: 100)"
                    }
                }
            }),
        },
        Tool {
            name: SEARCH_TRIPS,
            description: "Search for train trips between two stations with pricing. Returns trip options with travel times, transfers, legs, delays, platform changes and fares.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "origin": {
                        "type": "string",
                        "description": "Origin station code, e.g. \"ut\" for Utrecht Centraal. Use search_stations to find codes."
                    },
                    "destination": {
                        "type": "string",
                        "description": "Destination station code, e.g. \"asd\" for Amsterdam Centraal."
                    },
                    "date_time": {
                        "type": "string",
                        "description": "Departure (or arrival) time in ISO format, e.g. \"2025-11-18T14:30:00\". Defaults to now."
                    },
                    "search_for_arrival": {
                        "type": "boolean",
                        "description": "Treat date_time as the desired arrival time (default: false)"
                    },
                    "via_station": {
                        "type": "string",
                        "description": "Optional station code to route through"
                    },
                    "travel_class": {
                        "type": "string",
                        "enum": ["first", "second"],
                        "description": "Travel class (default: second)"
                    },
                    "discount": {
                        "type": "string",
                        "enum": ["none", "20_percent", "40_percent"],
                        "description": "Discount used for pricing (default: none)"
                    },
                    "num_trips": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of trip options to return (default: 5)"
                    }
                },
                "required": ["origin", "destination"]
            }),
        },
        Tool {
            name: GET_DEPARTURES,
            description: "Get upcoming train departures for a station, including real-time delays, cancellations and platform changes.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "station": {
                        "type": "string",
                        "description": "Station code, e.g. \"ut\". Use search_stations to find codes."
                    },
                    "max_journeys": {
                        "type": "integer",
                        "description": "Maximum number of departures (default: 10, max: 40)"
                    },
                    "date_time": {
                        "type": "string",
                        "description": "Show departures from this time, ISO format. Defaults to now."
                    }
                },
                "required": ["station"]
            }),
        },
    ]
}

pub fn resource_templates() -> Vec<ResourceTemplate> {
    vec![ResourceTemplate {
        uri_template: format!("{STATION_URI_PREFIX}{{code}}"),
        name: "station",
        description: "Details of a station by station code, e.g. station://ut",
        mime_type: "text/markdown",
    }]
}
