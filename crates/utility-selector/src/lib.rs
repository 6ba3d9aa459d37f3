//! Anti-thrash utility selection for tick-driven simulations.
//!
//! This library provides one selection mechanism, parameterized over the key
//! type being decided for (an agent, a squad, ...) and the context the options
//! read from:
//!
//! - **Every tick**: every option writes a fresh score for every live key
//! - **Hysteresis**: the currently active option gets a bonus so small score
//!   wobbles do not flip the choice back and forth
//! - **Stable ties**: equal effective scores resolve to the first declared option
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`UtilityOption`]: Core trait for a scored option (score, hooks, hysteresis)
//! - [`UtilityHost`]: Storage for per-key scores and the active assignment
//! - [`UtilitySelector`]: Runs the selection algorithm over a set of keys
//! - [`Switch`]: Record of an assignment change produced by a tick

pub mod option;
pub mod selector;
pub mod switch;

// Re-export core types for ergonomic API
pub use option::{UtilityHost, UtilityOption};
pub use selector::{UtilitySelector, pick};
pub use switch::Switch;
