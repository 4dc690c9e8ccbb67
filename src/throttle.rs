//! Two-tier send pacing
//!
//! Messages are sent in groups of up to `group_size`: consecutive
//! messages within a group are spaced by the individual gap, and a
//! longer gap is inserted when a new group starts. This keeps bursts
//! inside provider rate limits without slowing every single send down
//! to the group cadence.
//!
//! # Example
//!
//! ```text
//! group_size: 2, individual_gap_ms: 50, group_gap_ms: 500
//! - message 1: no prior send, no delay
//! - message 2: ~50ms after message 1
//! - message 3: new group, ~500ms after message 2
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Configuration for send pacing.
///
/// All values default to zero, which disables pacing entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Messages per group before the group gap is inserted.
    #[serde(default)]
    pub group_size: u32,

    /// Gap between consecutive messages within a group, in milliseconds.
    #[serde(default)]
    pub individual_gap_ms: u64,

    /// Gap between message groups, in milliseconds.
    #[serde(default)]
    pub group_gap_ms: u64,
}

impl ThrottleConfig {
    /// The within-group gap as a [`Duration`].
    #[must_use]
    pub const fn individual_gap(&self) -> Duration {
        Duration::from_millis(self.individual_gap_ms)
    }

    /// The between-group gap as a [`Duration`].
    #[must_use]
    pub const fn group_gap(&self) -> Duration {
        Duration::from_millis(self.group_gap_ms)
    }
}

/// The pacing state machine.
///
/// Owned by exactly one sender. The state is single-writer by design;
/// shared use requires an external serialization boundary (the sender
/// wraps it in a mutex held for the whole send, wait included).
#[derive(Debug)]
pub struct Throttle {
    config: ThrottleConfig,
    group_index: u32,
    last_sent: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with no send history.
    #[must_use]
    pub const fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            group_index: 0,
            last_sent: None,
        }
    }

    /// Compute how long to wait before the next send.
    ///
    /// Reaching a group boundary resets the group counter and measures
    /// against the group gap; otherwise the individual gap applies. With
    /// a `group_size` of zero every message is its own group. The delay
    /// is the configured gap minus the time already elapsed since the
    /// last send, floored at zero.
    pub fn next_delay(&mut self) -> Duration {
        if self.group_index >= self.config.group_size {
            self.group_index = 0;
            self.gap(self.config.group_gap())
        } else {
            self.gap(self.config.individual_gap())
        }
    }

    fn gap(&self, configured: Duration) -> Duration {
        match self.last_sent {
            Some(last) if !configured.is_zero() => configured.saturating_sub(last.elapsed()),
            _ => Duration::ZERO,
        }
    }

    /// Record the send instant.
    ///
    /// Called immediately before the transport call, not after it
    /// completes, so a slow delivery does not inflate the next gap.
    pub fn mark_sent(&mut self) {
        self.last_sent = Some(Instant::now());
    }

    /// Count a completed send against the current group.
    pub fn advance(&mut self) {
        self.group_index += 1;
    }

    /// The instant just before the last message was handed to the
    /// transport, if any send has happened.
    #[must_use]
    pub const fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(group_size: u32, individual_gap_ms: u64, group_gap_ms: u64) -> ThrottleConfig {
        ThrottleConfig {
            group_size,
            individual_gap_ms,
            group_gap_ms,
        }
    }

    #[test]
    fn first_send_is_never_delayed() {
        let mut throttle = Throttle::new(config(2, 50, 500));
        assert_eq!(throttle.next_delay(), Duration::ZERO);
    }

    #[test]
    fn zero_gap_disables_pacing() {
        let mut throttle = Throttle::new(config(10, 0, 0));
        throttle.mark_sent();
        throttle.advance();
        assert_eq!(throttle.next_delay(), Duration::ZERO);
    }

    #[test]
    fn back_to_back_sends_pay_the_remaining_gap() {
        let mut throttle = Throttle::new(config(10, 100, 0));
        assert_eq!(throttle.next_delay(), Duration::ZERO);
        throttle.mark_sent();
        throttle.advance();

        let delay = throttle.next_delay();
        assert!(delay > Duration::from_millis(50), "delay was {delay:?}");
        assert!(delay <= Duration::from_millis(100), "delay was {delay:?}");
    }

    #[test]
    fn elapsed_gap_means_no_delay() {
        let mut throttle = Throttle::new(config(10, 100, 0));
        throttle.mark_sent();
        throttle.advance();

        // Backdate the last send beyond the configured gap.
        throttle.last_sent = Instant::now().checked_sub(Duration::from_millis(200));
        assert_eq!(throttle.next_delay(), Duration::ZERO);
    }

    #[test]
    fn zero_group_size_always_uses_group_gap() {
        let mut throttle = Throttle::new(config(0, 100, 400));

        for _ in 0..3 {
            throttle.next_delay();
            throttle.mark_sent();
            throttle.advance();
            throttle.last_sent = Instant::now().checked_sub(Duration::from_millis(150));

            // 150ms already elapsed: past the individual gap but well
            // inside the group gap, so a boundary must still pay.
            let delay = throttle.next_delay();
            assert!(delay > Duration::from_millis(200), "delay was {delay:?}");
            throttle.mark_sent();
            throttle.advance();
            throttle.last_sent = Instant::now().checked_sub(Duration::from_millis(150));
        }
    }

    #[test]
    fn group_boundary_resets_counter_and_uses_group_gap() {
        let mut throttle = Throttle::new(config(2, 100, 400));

        // Two sends fill the group.
        for _ in 0..2 {
            throttle.next_delay();
            throttle.mark_sent();
            throttle.advance();
        }

        // Third send crosses the boundary: elapsed is near zero, so the
        // delay tracks the group gap, and the counter restarts.
        throttle.last_sent = Instant::now().checked_sub(Duration::from_millis(150));
        let delay = throttle.next_delay();
        assert!(delay > Duration::from_millis(200), "delay was {delay:?}");
        assert!(delay <= Duration::from_millis(250), "delay was {delay:?}");

        throttle.mark_sent();
        throttle.advance();

        // Back inside a group, the individual gap applies again.
        let delay = throttle.next_delay();
        assert!(delay <= Duration::from_millis(100), "delay was {delay:?}");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ThrottleConfig = toml::from_str("group_size = 2\nindividual_gap_ms = 50")
            .unwrap();
        assert_eq!(config.group_size, 2);
        assert_eq!(config.individual_gap(), Duration::from_millis(50));
        assert_eq!(config.group_gap(), Duration::ZERO);
    }
}
