//! Core option and host traits.
//!
//! An option never owns the entities it scores. Keys are small copyable
//! handles and every read or write goes through a context `C`, which lets the
//! same selector drive agents and squads that live in the same world.

/// Per-key storage the selector reads and writes.
///
/// Implemented by the caller's tick context. The selector only ever touches
/// keys it was handed in [`crate::UtilitySelector::tick`].
pub trait UtilityHost<K: Copy> {
    /// Returns `false` for keys that are dead or otherwise inactive.
    ///
    /// Inactive keys lose their assignment (with a `deactivate` call) and are
    /// not scored.
    fn is_selectable(&self, key: K) -> bool;

    /// Stores the freshly computed score of option `ordinal` for `key`.
    fn write_score(&mut self, key: K, ordinal: usize, score: f32);

    /// Returns the ordinal of the option currently assigned to `key`.
    fn assignment(&self, key: K) -> Option<usize>;

    /// Records the option assigned to `key` (`None` clears it).
    fn set_assignment(&mut self, key: K, assignment: Option<usize>);
}

/// A scored option competing for a key.
///
/// # Hooks
///
/// - [`score`](Self::score) runs for every live key every tick
/// - [`activate`](Self::activate) / [`deactivate`](Self::deactivate) run only
///   when the assignment of a key actually changes
/// - [`update`](Self::update) runs once per tick whether or not anything is
///   assigned to the option
pub trait UtilityOption<K: Copy, C> {
    /// Short identifier used in logs and switch records.
    fn name(&self) -> &'static str;

    /// Bonus added to this option's score while it is the active one.
    ///
    /// Negative values are treated as zero.
    fn hysteresis(&self) -> f32 {
        0.0
    }

    /// Scores this option for `key`. Values `<= 0` mean "not applicable".
    ///
    /// # Arguments
    ///
    /// * `ordinal` - Declaration index of this option inside the selector
    /// * `key` - The key being decided for
    /// * `ctx` - Read-only view of the context
    fn score(&self, ordinal: usize, key: K, ctx: &C) -> f32;

    /// Called when this option becomes the active assignment of `key`.
    fn activate(&mut self, _key: K, _ctx: &mut C) {}

    /// Called when this option stops being the active assignment of `key`.
    fn deactivate(&mut self, _key: K, _ctx: &mut C) {}

    /// Called once per tick after selection.
    ///
    /// `active` lists the keys currently assigned to this option, in the
    /// order they were passed to the selector.
    fn update(&mut self, _active: &[K], _ctx: &mut C) {}
}

/// Blanket implementation for boxed options.
///
/// This allows `Box<dyn UtilityOption<K, C>>` to be used wherever an option is
/// expected, enabling heterogeneous option lists.
impl<K: Copy, C> UtilityOption<K, C> for Box<dyn UtilityOption<K, C>> {
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn hysteresis(&self) -> f32 {
        (**self).hysteresis()
    }

    #[inline]
    fn score(&self, ordinal: usize, key: K, ctx: &C) -> f32 {
        (**self).score(ordinal, key, ctx)
    }

    #[inline]
    fn activate(&mut self, key: K, ctx: &mut C) {
        (**self).activate(key, ctx)
    }

    #[inline]
    fn deactivate(&mut self, key: K, ctx: &mut C) {
        (**self).deactivate(key, ctx)
    }

    #[inline]
    fn update(&mut self, active: &[K], ctx: &mut C) {
        (**self).update(active, ctx)
    }
}
