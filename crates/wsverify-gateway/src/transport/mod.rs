//! Transport layer (WebSocket).
//!
//! `upgrade` turns an HTTP upgrade request into a `RequestDescriptor` and
//! awaits the pipeline's decision; `ws` is the route handler and the
//! post-admission session loop.

pub mod upgrade;
pub mod ws;
