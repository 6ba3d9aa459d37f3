//! Host-supplied callbacks consumed by the tactical pipeline.
//!
//! Navigation, visibility and cover knowledge live in the host engine. The
//! core only sees them through these synchronous, side-effect-free oracles.
//! Every oracle is optional: a missing one disables its gate, which then
//! always passes. [`TacticalEnv`] bundles whatever the host provides.
mod oracles;

pub use oracles::{CoverSource, PositionValidator, ReachabilityOracle, SightlineOracle};

/// Borrowed set of optional oracles.
#[derive(Clone, Copy, Default)]
pub struct TacticalEnv<'a> {
    validator: Option<&'a dyn PositionValidator>,
    reachability: Option<&'a dyn ReachabilityOracle>,
    sightline: Option<&'a dyn SightlineOracle>,
    cover: Option<&'a dyn CoverSource>,
}

impl<'a> TacticalEnv<'a> {
    pub fn new(
        validator: Option<&'a dyn PositionValidator>,
        reachability: Option<&'a dyn ReachabilityOracle>,
        sightline: Option<&'a dyn SightlineOracle>,
        cover: Option<&'a dyn CoverSource>,
    ) -> Self {
        Self {
            validator,
            reachability,
            sightline,
            cover,
        }
    }

    /// An environment without any oracle; every gate passes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_validator(mut self, validator: &'a dyn PositionValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_reachability(mut self, reachability: &'a dyn ReachabilityOracle) -> Self {
        self.reachability = Some(reachability);
        self
    }

    pub fn with_sightline(mut self, sightline: &'a dyn SightlineOracle) -> Self {
        self.sightline = Some(sightline);
        self
    }

    pub fn with_cover(mut self, cover: &'a dyn CoverSource) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn validator(&self) -> Option<&'a dyn PositionValidator> {
        self.validator
    }

    pub fn reachability(&self) -> Option<&'a dyn ReachabilityOracle> {
        self.reachability
    }

    pub fn sightline(&self) -> Option<&'a dyn SightlineOracle> {
        self.sightline
    }

    pub fn cover(&self) -> Option<&'a dyn CoverSource> {
        self.cover
    }
}

impl core::fmt::Debug for TacticalEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TacticalEnv")
            .field("validator", &self.validator.is_some())
            .field("reachability", &self.reachability.is_some())
            .field("sightline", &self.sightline.is_some())
            .field("cover", &self.cover.is_some())
            .finish()
    }
}
