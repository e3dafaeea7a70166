//! Tests for the check evaluator.
//!
//! Organized by functionality:
//! - Reducer semantics (identities, short-circuits, cancellation)
//! - Direct checks and rewrite evaluation end to end
//! - Depth budget, error propagation and timing behavior

mod mocks;
