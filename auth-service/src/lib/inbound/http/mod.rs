pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::cors_layer;
pub use router::create_router;
pub use router::AppState;
