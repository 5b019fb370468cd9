//! NS (Nederlandse Spoorwegen) API client.
//!
//! This module provides an HTTP client for the NS public API gateway:
//! - the station directory (`nsapp-stations`)
//! - the trip planner with fares (`reisinformatie-api` trips)
//! - departure boards (`reisinformatie-api` departures)
//!
//! Authentication is a static subscription key sent as a header.

mod client;
mod error;

pub use client::{NsClient, NsConfig, TripQuery};
pub use error::NsError;

pub use crate::domain::format_price;
