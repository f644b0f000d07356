//! Reduced-motion gate.
//!
//! Two states: [`MotionMode::Animated`] runs the frame loop,
//! [`MotionMode::Static`] shows the gradient fallback instead. The gate is
//! initialised at mount from the platform preference and is the only thing
//! that moves between the two.

/// Presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    Animated,
    Static,
}

/// A change of [`MotionMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionTransition {
    /// Stop the loop and show the static fallback.
    ToStatic,
    /// Resume the loop on the canvas.
    ToAnimated,
}

/// Tracks the platform "prefers reduced motion" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityGate {
    reduced_motion: bool,
}

impl AccessibilityGate {
    pub fn new(reduced_motion: bool) -> Self {
        Self { reduced_motion }
    }

    #[inline]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn mode(&self) -> MotionMode {
        if self.reduced_motion {
            MotionMode::Static
        } else {
            MotionMode::Animated
        }
    }

    /// Apply a new preference value; `None` if the mode did not change.
    pub fn update(&mut self, reduced_motion: bool) -> Option<MotionTransition> {
        if self.reduced_motion == reduced_motion {
            return None;
        }
        self.reduced_motion = reduced_motion;
        Some(if reduced_motion {
            MotionTransition::ToStatic
        } else {
            MotionTransition::ToAnimated
        })
    }
}

impl Default for AccessibilityGate {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut gate = AccessibilityGate::new(false);
        assert_eq!(gate.mode(), MotionMode::Animated);
        assert_eq!(gate.update(false), None);
        assert_eq!(gate.update(true), Some(MotionTransition::ToStatic));
        assert_eq!(gate.mode(), MotionMode::Static);
        assert_eq!(gate.update(true), None);
        assert_eq!(gate.update(false), Some(MotionTransition::ToAnimated));
        assert_eq!(gate.mode(), MotionMode::Animated);
    }

    #[test]
    fn test_initialised_static() {
        assert_eq!(AccessibilityGate::new(true).mode(), MotionMode::Static);
    }
}
