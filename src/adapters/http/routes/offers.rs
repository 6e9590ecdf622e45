use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::use_cases::offers::{ListOffersInput, SortDirection},
    domain::entities::offer::OfferFilters,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_offers))
}

#[derive(Debug, Default, Deserialize)]
struct ListOffersQuery {
    position: Option<String>,
    location: Option<String>,
    level: Option<String>,
    #[serde(default)]
    sort: SortDirection,
    page: Option<i64>,
    limit: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<ListOffersQuery> for ListOffersInput {
    fn from(query: ListOffersQuery) -> Self {
        Self {
            filters: OfferFilters {
                position: non_blank(query.position),
                location: non_blank(query.location),
                level: non_blank(query.level),
            },
            sort: query.sort,
            page: query.page,
            limit: query.limit,
        }
    }
}

/// GET /api/offers
async fn list_offers(
    State(app_state): State<AppState>,
    Query(query): Query<ListOffersQuery>,
) -> AppResult<impl IntoResponse> {
    let listing = app_state
        .offer_use_cases
        .list_offers(&query.into())
        .await?;

    Ok(Json(listing))
}
