//! HTTP surface for hotfeed.
//!
//! Serves the threshold-filtered feed, a health check and a small status page.

pub mod handlers;
pub mod router;
pub mod server;

pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
