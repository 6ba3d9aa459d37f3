//! Assignment change records.

/// A change of the active option for one key during a tick.
///
/// Produced only when the assignment actually changed; a tick that keeps the
/// current option yields no record for that key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch<K> {
    /// The key whose assignment changed.
    pub key: K,
    /// Ordinal of the previously active option.
    pub from: Option<usize>,
    /// Ordinal of the newly active option (`None` when cleared).
    pub to: Option<usize>,
}

impl<K> Switch<K> {
    /// Returns `true` if the key ended up with no active option.
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.to.is_none()
    }
}
