pub mod claims;
pub mod health;
pub mod leads;
pub mod reservations;
pub mod reviews;
pub mod venues;

use axum::Router;

use crate::Deployment;

pub fn router(deployment: &Deployment) -> Router<Deployment> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(health::router(deployment))
            .merge(venues::router(deployment))
            .merge(reservations::router(deployment))
            .merge(claims::router(deployment))
            .merge(reviews::router(deployment))
            .merge(leads::router(deployment)),
    )
}
