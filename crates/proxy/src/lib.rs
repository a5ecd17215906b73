//! Proxy engine and HTTP surface: admission, registry dispatch, credential
//! injection, streaming passthrough, and the three fixed routes.

mod admission;
mod engine;
mod error;
mod http_surface;
mod logger;
mod router;
mod state;

pub use error::ApiError;
pub use router::make_router;
pub use state::AppState;
