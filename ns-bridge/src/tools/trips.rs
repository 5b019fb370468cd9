//! The `search_trips` tool.

use tracing::warn;

use crate::domain::{DiscountType, QueryTime, TravelClass, TripSearchResponse};
use crate::ns::{NsError, TripQuery};

use super::dto::{SearchTripsParams, TripDebug, TripView, TripsOutput};
use super::state::AppState;

/// Search trips between two stations, with fares.
///
/// Trips come back in upstream order, truncated to `num_trips` (a negative
/// count yields no trips).
pub async fn search_trips(state: &AppState, params: SearchTripsParams) -> TripsOutput {
    let travel_class = TravelClass::from_label(&params.travel_class);
    let discount = DiscountType::from_key(&params.discount);

    match fetch_trips(state, &params, travel_class, discount).await {
        Ok(response) => {
            let trips = response
                .trips
                .iter()
                .take(usize::try_from(params.num_trips).unwrap_or(0))
                .map(TripView::from)
                .collect();
            TripsOutput::found(params.origin, params.destination, trips)
        }
        Err(e) => {
            warn!(error = %e, origin = %params.origin, destination = %params.destination, "search_trips failed");
            TripsOutput::failed(&e, debug_info(&params, travel_class))
        }
    }
}

async fn fetch_trips(
    state: &AppState,
    params: &SearchTripsParams,
    travel_class: TravelClass,
    discount: DiscountType,
) -> Result<TripSearchResponse, NsError> {
    let date_time = params
        .date_time
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(QueryTime::parse)
        .transpose()?;

    let query = TripQuery {
        date_time,
        search_for_arrival: params.search_for_arrival,
        via_station: params.via_station.clone(),
        travel_class,
        discount,
        ..TripQuery::between(params.origin.clone(), params.destination.clone())
    };

    state.client.search_trips(&query).await
}

fn debug_info(params: &SearchTripsParams, travel_class: TravelClass) -> TripDebug {
    TripDebug {
        origin: params.origin.clone(),
        destination: params.destination.clone(),
        travel_class: params.travel_class.clone(),
        travel_class_int: travel_class.as_query_int(),
        discount: params.discount.clone(),
        date_time: params.date_time.clone(),
        search_for_arrival: params.search_for_arrival,
        via_station: params.via_station.clone(),
    }
}
