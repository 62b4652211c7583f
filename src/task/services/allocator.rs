//! Order key allocation at partition edges.

use std::sync::Arc;

use thiserror::Error;

use crate::task::{
    config::OrderingConfig,
    domain::{OrderEdge, OrderGap, OrderKey, OwnerId, Partition, Task},
    ports::{RankedQuery, SortDirection, TaskRepository, TaskRepositoryError},
};

/// Errors raised while allocating an order key.
#[derive(Debug, Clone, Error)]
pub enum AllocationFailure {
    /// The ranged read of the partition extreme did not complete.
    #[error("could not read the current {edge} order key: {source}")]
    ReadUnavailable {
        /// Edge whose extreme was being read.
        edge: OrderEdge,
        /// Underlying repository error.
        #[source]
        source: TaskRepositoryError,
    },

    /// Achieved tasks carry no order key.
    #[error("partition {0} is not ordered")]
    UnorderedPartition(Partition),

    /// Stepping past the extreme would overflow the key range.
    #[error("order keys exhausted past {extreme} at the {edge} edge")]
    KeySpaceExhausted {
        /// Current extreme key.
        extreme: OrderKey,
        /// Edge being extended.
        edge: OrderEdge,
    },
}

/// Computes order keys for tasks inserted at either edge of a partition.
///
/// Every call re-reads the current extreme; nothing is cached between calls
/// and the read is not transactional with the caller's later write.
#[derive(Clone)]
pub struct OrderKeyAllocator<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
    gap: OrderGap,
    baseline: OrderKey,
}

impl<R> OrderKeyAllocator<R>
where
    R: TaskRepository,
{
    /// Creates an allocator with the configured gap and baseline.
    #[must_use]
    pub const fn new(repository: Arc<R>, config: &OrderingConfig) -> Self {
        Self {
            repository,
            gap: config.order_gap,
            baseline: config.baseline_key,
        }
    }

    /// Returns a key placing a new task at `edge` of `partition`.
    ///
    /// An empty partition yields the baseline key; otherwise the key is one
    /// gap past the current extreme.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationFailure::UnorderedPartition`] for
    /// [`Partition::Achieved`], [`AllocationFailure::ReadUnavailable`] when
    /// the extreme cannot be read, and
    /// [`AllocationFailure::KeySpaceExhausted`] on overflow.
    pub async fn allocate(
        &self,
        owner_id: &OwnerId,
        partition: Partition,
        edge: OrderEdge,
    ) -> Result<OrderKey, AllocationFailure> {
        if !partition.is_ordered() {
            return Err(AllocationFailure::UnorderedPartition(partition));
        }

        let direction = match edge {
            OrderEdge::Max => SortDirection::Descending,
            OrderEdge::Min => SortDirection::Ascending,
        };
        let query = RankedQuery::new(owner_id.clone(), partition, direction, 1);
        let extreme = self
            .repository
            .find_ranked(&query)
            .await
            .map_err(|source| AllocationFailure::ReadUnavailable { edge, source })?
            .first()
            .and_then(Task::order);

        let Some(extreme) = extreme else {
            return Ok(self.baseline);
        };
        extreme
            .beyond(edge, self.gap)
            .ok_or(AllocationFailure::KeySpaceExhausted { extreme, edge })
    }
}
