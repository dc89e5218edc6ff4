//! Echo edge timer
//!
//! Runs in interrupt context. A rising edge arms the timer with the current
//! timestamp; the next falling edge consumes it and yields the pulse width.
//!
//! The armed timestamp lives in a single 64-bit atomic where `0` means
//! unarmed. Arming is a plain store, consuming is a swap back to `0`, so a
//! falling edge can never observe a half-written timestamp and a single
//! rising edge can never produce two pulses.

use portable_atomic::{AtomicU32, AtomicU64, Ordering};

/// Sentinel for "no rising edge recorded"
const UNARMED: u64 = 0;

/// Echo line transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    /// Classify an edge from the line level sampled right after it
    pub fn from_level(is_high: bool) -> Self {
        if is_high {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }
}

/// Echo pulse duration in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseWidth(u64);

impl PulseWidth {
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }
}

/// What an edge did to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// Rising edge recorded (any earlier unmatched one discarded)
    Armed,
    /// Falling edge completed a pulse and it was enqueued
    Published(PulseWidth),
    /// Falling edge completed a pulse but the queue was full
    Dropped(PulseWidth),
    /// Falling edge with no armed rising edge
    Ignored,
}

/// Edge timer state shared between the echo interrupt and diagnostics
pub struct EdgeTimer {
    armed_at: AtomicU64,
    stray_edges: AtomicU32,
    dropped_pulses: AtomicU32,
}

impl Default for EdgeTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeTimer {
    pub const fn new() -> Self {
        Self {
            armed_at: AtomicU64::new(UNARMED),
            stray_edges: AtomicU32::new(0),
            dropped_pulses: AtomicU32::new(0),
        }
    }

    /// Record a rising edge
    ///
    /// Overwrites any unmatched rising edge. A timestamp of 0 is stored as 1
    /// so it still arms the timer.
    pub fn arm(&self, now_us: u64) {
        self.armed_at.store(now_us.max(1), Ordering::Release);
    }

    /// Complete a pulse on a falling edge
    ///
    /// Returns `None` and counts a stray edge if the timer was not armed.
    /// The timer is unarmed afterwards either way.
    pub fn consume(&self, now_us: u64) -> Option<PulseWidth> {
        let start = self.armed_at.swap(UNARMED, Ordering::AcqRel);
        if start == UNARMED {
            self.stray_edges.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        Some(PulseWidth(now_us.saturating_sub(start)))
    }

    /// Apply an edge and hand any completed pulse to `publish`
    ///
    /// `publish` must not block; an `Err` from it means the pulse was
    /// dropped, which is counted and never retried.
    pub fn handle_edge<E>(
        &self,
        edge: Edge,
        now_us: u64,
        publish: impl FnOnce(PulseWidth) -> Result<(), E>,
    ) -> EdgeOutcome {
        match edge {
            Edge::Rising => {
                self.arm(now_us);
                EdgeOutcome::Armed
            }
            Edge::Falling => match self.consume(now_us) {
                None => EdgeOutcome::Ignored,
                Some(pulse) => match publish(pulse) {
                    Ok(()) => EdgeOutcome::Published(pulse),
                    Err(_) => {
                        self.dropped_pulses.fetch_add(1, Ordering::Relaxed);
                        EdgeOutcome::Dropped(pulse)
                    }
                },
            },
        }
    }

    /// Check whether a rising edge is waiting for its falling edge
    pub fn is_armed(&self) -> bool {
        self.armed_at.load(Ordering::Acquire) != UNARMED
    }

    /// Falling edges that arrived with no armed rising edge
    pub fn stray_edges(&self) -> u32 {
        self.stray_edges.load(Ordering::Relaxed)
    }

    /// Pulses lost because the queue was full
    pub fn dropped_pulses(&self) -> u32 {
        self.dropped_pulses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Deque;
    use proptest::prelude::*;

    fn push(
        queue: &mut Deque<PulseWidth, 4>,
    ) -> impl FnOnce(PulseWidth) -> Result<(), PulseWidth> + '_ {
        move |pulse| queue.push_back(pulse)
    }

    #[test]
    fn test_rising_then_falling() {
        let timer = EdgeTimer::new();
        let mut queue: Deque<PulseWidth, 4> = Deque::new();

        assert_eq!(
            timer.handle_edge(Edge::Rising, 5_000, push(&mut queue)),
            EdgeOutcome::Armed
        );
        assert!(timer.is_armed());
        assert_eq!(
            timer.handle_edge(Edge::Falling, 6_000, push(&mut queue)),
            EdgeOutcome::Published(PulseWidth::from_micros(1_000))
        );

        assert!(!timer.is_armed());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_front(), Some(PulseWidth::from_micros(1_000)));
    }

    #[test]
    fn test_falling_without_rising_writes_nothing() {
        let timer = EdgeTimer::new();
        let mut queue: Deque<PulseWidth, 4> = Deque::new();

        assert_eq!(
            timer.handle_edge(Edge::Falling, 1_000, push(&mut queue)),
            EdgeOutcome::Ignored
        );
        assert!(queue.is_empty());
        assert_eq!(timer.stray_edges(), 1);
    }

    #[test]
    fn test_second_falling_edge_is_ignored() {
        let timer = EdgeTimer::new();
        let mut queue: Deque<PulseWidth, 4> = Deque::new();

        timer.handle_edge(Edge::Rising, 100, push(&mut queue));
        timer.handle_edge(Edge::Falling, 400, push(&mut queue));
        assert_eq!(
            timer.handle_edge(Edge::Falling, 900, push(&mut queue)),
            EdgeOutcome::Ignored
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_second_rising_edge_wins() {
        let timer = EdgeTimer::new();
        let mut queue: Deque<PulseWidth, 4> = Deque::new();

        timer.handle_edge(Edge::Rising, 1_000, push(&mut queue));
        timer.handle_edge(Edge::Rising, 3_000, push(&mut queue));
        timer.handle_edge(Edge::Falling, 3_500, push(&mut queue));

        assert_eq!(queue.pop_front(), Some(PulseWidth::from_micros(500)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_drops_pulse() {
        let timer = EdgeTimer::new();
        let mut queue: Deque<PulseWidth, 4> = Deque::new();
        for i in 0..4 {
            queue.push_back(PulseWidth::from_micros(i)).unwrap();
        }

        timer.handle_edge(Edge::Rising, 10, push(&mut queue));
        assert_eq!(
            timer.handle_edge(Edge::Falling, 60, push(&mut queue)),
            EdgeOutcome::Dropped(PulseWidth::from_micros(50))
        );
        assert_eq!(timer.dropped_pulses(), 1);
        assert_eq!(queue.len(), 4);
        // Dropped pulse still disarms the timer
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_timestamp_zero_still_arms() {
        let timer = EdgeTimer::new();
        timer.arm(0);
        assert!(timer.is_armed());
        assert_eq!(timer.consume(580), Some(PulseWidth::from_micros(579)));
    }

    #[test]
    fn test_clock_anomaly_saturates() {
        let timer = EdgeTimer::new();
        timer.arm(2_000);
        assert_eq!(timer.consume(1_000), Some(PulseWidth::from_micros(0)));
    }

    #[test]
    fn test_edge_from_level() {
        assert_eq!(Edge::from_level(true), Edge::Rising);
        assert_eq!(Edge::from_level(false), Edge::Falling);
    }

    proptest! {
        #[test]
        fn prop_edge_pair_yields_exactly_delta(
            start in 1u64..1_000_000_000,
            delta in 0u64..100_000
        ) {
            let timer = EdgeTimer::new();
            let mut queue: Deque<PulseWidth, 4> = Deque::new();

            timer.handle_edge(Edge::Rising, start, push(&mut queue));
            timer.handle_edge(Edge::Falling, start + delta, push(&mut queue));

            prop_assert_eq!(queue.len(), 1);
            prop_assert_eq!(queue.pop_front(), Some(PulseWidth::from_micros(delta)));
        }
    }
}
