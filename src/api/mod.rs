/// API routes and handlers
pub mod account;
pub mod health;
pub mod middleware;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes(ctx: AppContext) -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(account::routes(ctx))
}
