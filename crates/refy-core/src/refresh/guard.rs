/// Absorbs the burst of duplicate activations the navigation layer issues
/// while laying out a screen.
///
/// Each redundant activation increments the counter until it reaches the
/// threshold; the next one is let through and the counter goes back to zero.
/// A threshold of zero lets every activation through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecompositionGuard {
    count: u32,
    threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Absorb { count: u32 },
    Allow,
}

impl RecompositionGuard {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn check(&mut self) -> GuardDecision {
        if self.count >= self.threshold {
            self.reset();
            GuardDecision::Allow
        } else {
            self.count += 1;
            GuardDecision::Absorb { count: self.count }
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
