//! Squad-level strategies driven by the strategy selector.
//!
//! Declaration order (and therefore tie-break order) is
//! [`TacticalPositioningStrategy`], then [`RegroupStrategy`].

pub mod pipeline;
mod regroup;
mod tactical;

use utility_selector::UtilityOption;

use crate::context::TickContext;
use crate::world::SquadId;

pub use pipeline::PipelineOutcome;
pub use regroup::RegroupStrategy;
pub use tactical::TacticalPositioningStrategy;

/// Boxed strategy as stored by the selector.
pub type BoxedStrategy = Box<dyn UtilityOption<SquadId, TickContext>>;

/// Built-in strategies in declaration order.
pub fn default_strategies() -> Vec<BoxedStrategy> {
    vec![
        Box::new(TacticalPositioningStrategy::new()),
        Box::new(RegroupStrategy::new()),
    ]
}
