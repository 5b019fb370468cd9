//! NS travel information bridge.
//!
//! Exposes station search, trip planning with fares, and departure boards
//! from the Dutch railways (NS) API as Model Context Protocol tools.

pub mod config;
pub mod domain;
pub mod mcp;
pub mod ns;
pub mod tools;
