//! End-to-end tests for tracking-gate.
//!
//! These drive the access gate and resolver together over in-memory
//! collaborators, with a fault-injecting store for the degraded paths.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test e2e
//! ```

mod gate_flow;
mod harness;
mod resolver;

pub use harness::TestHarness;
