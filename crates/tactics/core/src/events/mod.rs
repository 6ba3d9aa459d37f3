//! Combat events: storage, spatial queries and clustering.
//!
//! The [`CombatEventRegistry`] is an explicit ring buffer owned by the caller.
//! All queries ignore events that are inactive or older than the supplied
//! age limit. Clustering is a separate pure pass over any event snapshot.
mod cluster;
mod registry;
mod types;

pub use cluster::{CombatCluster, cluster_events, death_events};
pub use registry::{CombatEventRegistry, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use types::{CombatEvent, CombatEventKind, EventWeights};
