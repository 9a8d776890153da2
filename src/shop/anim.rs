//! Balance counter animation and short-lived visual cues.
//!
//! All of this is display-only. The authoritative balance lives in
//! `ShopState::balance` and is already final when an animation starts.

use tachyonfx::Interpolation;

/// Length of the balance counter animation.
pub const MONEY_ANIM_MS: f64 = 1000.0;
/// Owned-counter highlight after a successful purchase.
pub const QUANTITY_PULSE_MS: f64 = 300.0;
/// Balance shown in alarm colours after a failed purchase.
pub const INSUFFICIENT_CUE_MS: f64 = 1000.0;

/// Counts the displayed balance from `from` to `to` with a quartic ease-out.
#[derive(Clone, Debug, PartialEq)]
pub struct MoneyAnimation {
    from: u64,
    to: u64,
    elapsed_ms: f64,
}

impl MoneyAnimation {
    pub fn new(from: u64, to: u64) -> Self {
        Self {
            from,
            to,
            elapsed_ms: 0.0,
        }
    }

    /// Start a new animation towards `to`, superseding `previous` if it is
    /// still running. The new one starts from whatever is on screen now so
    /// the counter never jumps.
    pub fn supersede(previous: Option<&MoneyAnimation>, current_balance: u64, to: u64) -> Self {
        let from = previous.map_or(current_balance, MoneyAnimation::value);
        Self::new(from, to)
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.elapsed_ms = (self.elapsed_ms + delta_ms).min(MONEY_ANIM_MS);
    }

    pub fn progress(&self) -> f64 {
        (self.elapsed_ms / MONEY_ANIM_MS).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= MONEY_ANIM_MS
    }

    #[cfg(test)]
    pub fn target(&self) -> u64 {
        self.to
    }

    /// Value to display at the current point of the animation.
    pub fn value(&self) -> u64 {
        if self.is_finished() {
            return self.to;
        }
        let eased = Interpolation::QuartOut.alpha(self.progress() as f32) as f64;
        let from = self.from as f64;
        let to = self.to as f64;
        let v = (from + (to - from) * eased).round();
        let (lo, hi) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        (v.max(0.0) as u64).clamp(lo, hi)
    }
}

/// A countdown that keeps a visual cue on for a fixed time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cue {
    remaining_ms: f64,
}

impl Cue {
    /// (Re)start the cue. Retriggering while active restarts the full duration.
    pub fn trigger(&mut self, duration_ms: f64) {
        self.remaining_ms = duration_ms;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }
}
