//! Top-level facade crate for wsVerify.
//!
//! Re-exports the admission core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use wsverify_core::*;
}

pub mod gateway {
    pub use wsverify_gateway::*;
}
