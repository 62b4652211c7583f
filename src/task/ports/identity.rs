//! Identity port supplying the current owner.

use crate::task::domain::OwnerId;
use async_trait::async_trait;

/// Source of the signed-in user's identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the current owner, or `None` when nobody is signed in.
    async fn current_owner(&self) -> Option<OwnerId>;
}
