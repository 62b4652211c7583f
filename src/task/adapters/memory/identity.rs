//! Fixed identity provider.

use async_trait::async_trait;

use crate::task::{domain::OwnerId, ports::IdentityProvider};

/// Identity provider returning a fixed owner, or nobody.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    owner: Option<OwnerId>,
}

impl StaticIdentity {
    /// Creates a provider for a signed-in owner.
    #[must_use]
    pub const fn signed_in(owner: OwnerId) -> Self {
        Self { owner: Some(owner) }
    }

    /// Creates a provider with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { owner: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_owner(&self) -> Option<OwnerId> {
        self.owner.clone()
    }
}
