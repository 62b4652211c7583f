//! Ordered task lists.
//!
//! Tasks live in one of three partitions: pinned, unpinned, or achieved.
//! The two active partitions are ordered by sparse integer keys allocated
//! at the list edges; achieved tasks carry a timestamp instead. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Engine limits in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
