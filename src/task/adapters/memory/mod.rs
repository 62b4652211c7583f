//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! tests and for embedding the engine without a document store.

mod identity;
mod task;

pub use identity::StaticIdentity;
pub use task::InMemoryTaskRepository;
