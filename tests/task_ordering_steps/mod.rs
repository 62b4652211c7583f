//! Step definitions for ordered task list scenarios.

pub mod given;
pub mod when;
pub mod world;
