//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the `/stream` endpoint.
//! The token generator and event types live in the `sse` crate.

pub mod handler;
