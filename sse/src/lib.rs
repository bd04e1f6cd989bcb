//! Server-Sent Events (SSE) token stream for the `/stream` demo endpoint.
//!
//! This crate owns the generator behind the demo stream and the wire types
//! it emits. The web layer only wraps the generator in an axum `Sse`
//! response.
//!
//! # Message Flow
//!
//! 1. Client opens `GET /stream`
//! 2. Web handler assigns a `StreamId` and starts a `token_stream`
//! 3. The generator yields `token` events `1..=token_count`, pausing
//!    `token_interval` between them
//! 4. A single `done` event carrying the token count closes the stream
//! 5. The HTTP body completes once the generator is exhausted
//!
//! Dropping the stream (client disconnect) stops the generator at its next
//! await point. Nothing is buffered or replayed.
//!
//! # Modules
//!
//! - `message`: Type-safe event definitions and their SSE encoding
//! - `stream`: `StreamId`, `StreamSettings` and the token generator
//! - `error`: Encoding errors

pub mod error;
pub mod message;
pub mod stream;

pub use error::Error;
pub use stream::{token_stream, StreamId, StreamSettings};
