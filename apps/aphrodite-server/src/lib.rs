//! HTTP boundary for building natal charts and comparing them.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::{AppState, ChartCache, SharedProvider};
