//! path_manager_core - Guidance segment sequencer
//!
//! Platform-agnostic path manager: turns an ordered list of path segments
//! (straight lines and arcs) into the single active segment a path follower
//! tracks, and decides each cycle when to switch to the next one.
//!
//! # Design Principles
//!
//! - **no_std**: no allocation, fixed-capacity `heapless` containers
//! - **Trait abstractions**: position, mode, status, alarm and time are
//!   injected through traits with host mocks in [`traits`]
//! - **One owner**: all guidance state lives in [`task::PathManager`]
//!
//! # Modules
//!
//! - [`geometry`]: Planar vectors, arc center solver, angle helpers
//! - [`segment`]: Segment descriptors, store, canned programs
//! - [`guidance`]: Progress tracker, goal detector, sequencer, supervisors
//! - [`mode`]: Guidance modes, resolvers and the mode dispatcher
//! - [`parameters`]: Parameter store and tunables
//! - [`task`]: Per-cycle driver, periodic schedule, startup barrier
//! - [`traits`]: Collaborator traits and mocks

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod logging;

pub mod geometry;
pub mod guidance;
pub mod mode;
pub mod parameters;
pub mod segment;
pub mod task;
pub mod traits;
