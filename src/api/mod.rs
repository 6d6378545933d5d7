//! HTTP API for the payroll engine.
//!
//! This module provides the axum-based surface over the engine: the
//! router, request/response types, and shared application state.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BulkReviewUpdateRequest, ReviewUpdateRequest, SyncRequest, TransitionRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
