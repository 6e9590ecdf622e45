pub mod admin;
pub mod offers;
pub mod payments;
pub mod users;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/payments", payments::router())
        .nest("/offers", offers::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
}
