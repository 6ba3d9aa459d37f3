//! The selection algorithm.
//!
//! # Semantics
//!
//! For every key, each tick:
//!
//! 1. If the key is not selectable, deactivate and clear its assignment, stop
//! 2. Every option writes a fresh score for the key
//! 3. `effective = score + hysteresis` for the current option, `score` otherwise
//! 4. The strictly greatest effective score wins; ties keep the current option
//!    and otherwise go to the first declared option. A best value `<= 0`
//!    clears the assignment
//! 5. Only an actual change triggers `deactivate` / `activate`
//!
//! After all keys are processed, every option's `update` hook runs once.

use crate::{Switch, UtilityHost, UtilityOption};

/// Picks the winning option from freshly computed scores.
///
/// `hysteresis[i]` is only applied when `current == Some(i)`. NaN scores never
/// win. Returns `None` when no effective score is strictly positive.
///
/// # Example
///
/// ```
/// use utility_selector::pick;
///
/// // Option 0 is active with a 0.2 bonus, option 1 is only slightly better.
/// assert_eq!(pick(&[0.5, 0.6], &[0.2, 0.0], Some(0)), Some(0));
/// // Without a current option the raw scores decide.
/// assert_eq!(pick(&[0.5, 0.6], &[0.2, 0.0], None), Some(1));
/// ```
pub fn pick(scores: &[f32], hysteresis: &[f32], current: Option<usize>) -> Option<usize> {
    let effective = |ordinal: usize, score: f32| -> f32 {
        if current == Some(ordinal) {
            score + hysteresis.get(ordinal).copied().unwrap_or(0.0).max(0.0)
        } else {
            score
        }
    };

    let mut best: Option<(usize, f32)> = None;
    for (ordinal, &score) in scores.iter().enumerate() {
        let value = effective(ordinal, score);
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((ordinal, value)),
        }
    }

    let (winner, best_value) = best?;
    if best_value <= 0.0 {
        return None;
    }

    // The active option keeps its slot on an exact tie.
    if let Some(current) = current
        && current < scores.len()
        && effective(current, scores[current]) == best_value
    {
        return Some(current);
    }

    Some(winner)
}

/// Runs the selection algorithm for a fixed, ordered list of options.
///
/// The declaration order of `options` is the tie-break order and defines the
/// ordinal of each option.
pub struct UtilitySelector<K: Copy, C> {
    options: Vec<Box<dyn UtilityOption<K, C>>>,
}

impl<K: Copy, C: UtilityHost<K>> UtilitySelector<K, C> {
    /// Creates a new selector with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `options` is empty. A selector with no options is
    /// meaningless and likely indicates a programming error.
    pub fn new(options: Vec<Box<dyn UtilityOption<K, C>>>) -> Self {
        assert!(
            !options.is_empty(),
            "UtilitySelector must have at least one option"
        );
        Self { options }
    }

    /// Number of registered options (the length of every key's score array).
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Always `false`; a selector holds at least one option.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns the name of the option with the given ordinal.
    pub fn option_name(&self, ordinal: usize) -> Option<&'static str> {
        self.options.get(ordinal).map(|option| option.name())
    }

    /// Returns the ordinal of the first option with the given name.
    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|option| option.name() == name)
    }

    /// Runs one selection tick over `keys` and then every `update` hook.
    ///
    /// # Returns
    ///
    /// One [`Switch`] per key whose assignment changed, in key order.
    pub fn tick(&mut self, keys: &[K], ctx: &mut C) -> Vec<Switch<K>> {
        let mut switches = Vec::new();
        let hysteresis: Vec<f32> = self
            .options
            .iter()
            .map(|option| option.hysteresis().max(0.0))
            .collect();
        let mut scores = vec![0.0; self.options.len()];

        for &key in keys {
            // Assignments pointing past the option list are stale; drop them silently.
            let current = ctx
                .assignment(key)
                .filter(|&ordinal| ordinal < self.options.len());

            if !ctx.is_selectable(key) {
                if let Some(current) = current {
                    self.options[current].deactivate(key, ctx);
                    switches.push(Switch {
                        key,
                        from: Some(current),
                        to: None,
                    });
                }
                ctx.set_assignment(key, None);
                continue;
            }

            for (ordinal, option) in self.options.iter().enumerate() {
                let score = option.score(ordinal, key, ctx);
                scores[ordinal] = score;
                ctx.write_score(key, ordinal, score);
            }

            let selected = pick(&scores, &hysteresis, current);
            if selected == current {
                continue;
            }

            if let Some(current) = current {
                self.options[current].deactivate(key, ctx);
            }
            ctx.set_assignment(key, selected);
            if let Some(selected) = selected {
                self.options[selected].activate(key, ctx);
            }
            switches.push(Switch {
                key,
                from: current,
                to: selected,
            });
        }

        let mut active: Vec<Vec<K>> = vec![Vec::new(); self.options.len()];
        for &key in keys {
            if let Some(ordinal) = ctx.assignment(key)
                && let Some(bucket) = active.get_mut(ordinal)
            {
                bucket.push(key);
            }
        }
        for (option, keys) in self.options.iter_mut().zip(active.iter()) {
            option.update(keys, ctx);
        }

        switches
    }

    /// Deactivates and clears the assignment of a single key.
    ///
    /// Used when a key is torn down outside of the regular tick.
    pub fn release(&mut self, key: K, ctx: &mut C) -> Option<Switch<K>> {
        let current = ctx
            .assignment(key)
            .filter(|&ordinal| ordinal < self.options.len())?;
        self.options[current].deactivate(key, ctx);
        ctx.set_assignment(key, None);
        Some(Switch {
            key,
            from: Some(current),
            to: None,
        })
    }
}
