pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /entry/request            ask to enter (driver, JWT)
/// /exit/request             ask to leave (driver, JWT)
///
/// /gate/entry/confirm       entry trigger fired (gate LAN)
/// /gate/exit/confirm        exit trigger fired (gate LAN)
/// /gate/spot                spot sensor report (gate LAN)
///
/// /tickets                  caller's tickets (JWT)
/// /tickets/{id}             one ticket, owner only (JWT)
/// /tickets/{id}/pay         simulated payment (JWT)
///
/// /spots                    spot grid (JWT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/entry/request", post(handlers::requests::request_entry))
        .route("/exit/request", post(handlers::requests::request_exit))
        .nest("/gate", gate_router())
        .route("/tickets", get(handlers::tickets::list_tickets))
        .route("/tickets/{id}", get(handlers::tickets::get_ticket))
        .route("/tickets/{id}/pay", post(handlers::tickets::pay_ticket))
        .route("/spots", get(handlers::spots::list_spots))
}

/// Gate controller and sensor routes mounted at `/gate`.
fn gate_router() -> Router<AppState> {
    Router::new()
        .route("/entry/confirm", post(handlers::gate::confirm_entry))
        .route("/exit/confirm", post(handlers::gate::confirm_exit))
        .route("/spot", post(handlers::gate::assign_spot))
}
