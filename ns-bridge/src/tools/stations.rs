//! The `search_stations` tool.

use tracing::warn;

use super::dto::{SearchStationsParams, StationView, StationsOutput};
use super::state::AppState;

const MAX_STATION_LIMIT: i64 = 100;

/// Search stations by name and/or country.
pub async fn search_stations(state: &AppState, params: SearchStationsParams) -> StationsOutput {
    let country_codes = params.country_codes.as_deref().map(parse_country_codes);
    let limit = params.limit.clamp(1, MAX_STATION_LIMIT) as u32;

    match state
        .client
        .search_stations(params.query.as_deref(), country_codes.as_deref(), limit)
        .await
    {
        Ok(stations) => StationsOutput::found(stations.iter().map(StationView::from).collect()),
        Err(e) => {
            warn!(error = %e, "search_stations failed");
            StationsOutput::failed(&e)
        }
    }
}

/// Split "NL, de,,be" into `["nl", "de", "be"]`.
fn parse_country_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|code| code.trim().to_lowercase())
        .filter(|code| !code.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn country_codes_are_normalized() {
        assert_eq!(parse_country_codes("NL, de,,be "), vec!["nl", "de", "be"]);
        assert!(parse_country_codes("").is_empty());
        assert!(parse_country_codes(" , ").is_empty());
    }

    proptest! {
        #[test]
        fn normalized_codes_are_lowercase_and_non_empty(raw in "[a-zA-Z ,]{0,30}") {
            for code in parse_country_codes(&raw) {
                prop_assert!(!code.is_empty());
                prop_assert_eq!(code.trim(), code.as_str());
                prop_assert_eq!(code.to_lowercase(), code.clone());
            }
        }
    }
}
