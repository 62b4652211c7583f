//! Todo Diaries: ordered personal task lists.
//!
//! This crate provides the core of a personal task tracker: recording short
//! tasks, pinning a subset for priority, marking tasks achieved at a chosen
//! time, and summarising achievements per month.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and identity
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`task`]: Partitioned task ordering, transitions and statistics

pub mod task;
