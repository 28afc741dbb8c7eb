//! Per-frame control snapshot produced by whichever input adapter is active.

/// Boolean drive controls for one frame. The simulation only ever reads this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

impl ControlSnapshot {
    /// All controls released.
    pub const NEUTRAL: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        boost: false,
    };

    /// Steering direction: -1 for left, 1 for right, 0 when neither or both are held.
    pub fn steer_axis(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Merge two adapters (keyboard + touch): a control is held if either holds it.
    pub fn merge(self, other: Self) -> Self {
        Self {
            forward: self.forward || other.forward,
            backward: self.backward || other.backward,
            left: self.left || other.left,
            right: self.right || other.right,
            boost: self.boost || other.boost,
        }
    }
}
