//! Guidance Mode Types and Dispatch
//!
//! # Contents
//!
//! - `FlightMode` / `GuidanceMode` state types
//! - `ModeResolver` trait with the flight-mode and planner-ready variants
//! - `ModeDispatcher`, which loads canned programs on mode entry

mod dispatcher;
mod state;
mod traits;

pub use dispatcher::{canned_program, ModeDispatcher, ModeUpdate};
pub use state::{FlightMode, GuidanceMode};
pub use traits::{FlightModeResolver, ModeResolver, PlannerReadyResolver};
