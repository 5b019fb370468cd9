//! The `get_departures` tool.

use tracing::warn;

use crate::domain::{DeparturesResponse, QueryTime};
use crate::ns::NsError;

use super::dto::{DepartureView, DeparturesOutput, GetDeparturesParams};
use super::state::AppState;

const MAX_JOURNEYS: i64 = 40;

/// Departure board of a station, with delays and platform changes.
pub async fn get_departures(state: &AppState, params: GetDeparturesParams) -> DeparturesOutput {
    match fetch_departures(state, &params).await {
        Ok(response) => {
            let departures = response
                .payload
                .departures
                .iter()
                .map(DepartureView::from)
                .collect();
            DeparturesOutput::found(params.station, departures)
        }
        Err(e) => {
            warn!(error = %e, station = %params.station, "get_departures failed");
            DeparturesOutput::failed(&e)
        }
    }
}

async fn fetch_departures(
    state: &AppState,
    params: &GetDeparturesParams,
) -> Result<DeparturesResponse, NsError> {
    let date_time = params
        .date_time
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(QueryTime::parse)
        .transpose()?;
    let max_journeys = params.max_journeys.clamp(1, MAX_JOURNEYS) as u32;

    state
        .client
        .get_departures(
            Some(params.station.as_str()),
            None,
            max_journeys,
            date_time.as_ref(),
        )
        .await
}
