//! Common value components used across the engine.

/// Sanitise a mutation amount: negative or non-finite amounts count as zero.
#[inline]
fn non_negative(amount: f32) -> f32 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// A bounded scalar pool (health, energy). `current` always stays in `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourcePool {
    current: f32,
    max: f32,
}

impl ResourcePool {
    /// Create a full pool.
    pub fn new(max: f32) -> Self {
        let max = non_negative(max);
        Self { current: max, max }
    }

    /// Create a pool at a given level, clamped into range.
    pub fn with_current(current: f32, max: f32) -> Self {
        let max = non_negative(max);
        Self {
            current: non_negative(current).min(max),
            max,
        }
    }

    /// Remove `amount` from the pool, bottoming out at zero.
    pub fn drain(&mut self, amount: f32) {
        self.current = (self.current - non_negative(amount)).max(0.0);
    }

    /// Add `amount` to the pool, capped at `max`.
    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + non_negative(amount)).min(self.max);
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Fill fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_and_restore_zero_are_noops() {
        let mut pool = ResourcePool::with_current(42.0, 100.0);
        pool.drain(0.0);
        pool.restore(0.0);
        assert_eq!(pool.current(), 42.0);
    }

    #[test]
    fn cumulative_drain_bottoms_out_at_zero() {
        let mut pool = ResourcePool::new(100.0);
        pool.drain(70.0);
        pool.drain(70.0);
        assert_eq!(pool.current(), 0.0);
        assert!(pool.is_empty());
    }

    #[test]
    fn restore_caps_at_max() {
        let mut pool = ResourcePool::with_current(95.0, 100.0);
        pool.restore(20.0);
        assert_eq!(pool.current(), 100.0);
    }

    #[test]
    fn negative_and_nan_amounts_are_ignored() {
        let mut pool = ResourcePool::with_current(50.0, 100.0);
        pool.drain(-10.0);
        pool.restore(-10.0);
        pool.drain(f32::NAN);
        pool.restore(f32::INFINITY);
        assert_eq!(pool.current(), 50.0);
    }
}
