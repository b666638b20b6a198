//! wsVerify gateway library entry.
//!
//! Wires config loading, the admission pipeline, and the WebSocket upgrade
//! route into a runnable gateway. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod router;
pub mod transport;
