//! Interrupt-driven rotary encoder pulse counting
//!
//! Every edge on the primary channel samples the companion channel once:
//! high counts a forward pulse, low counts a backward pulse. This is a
//! single-sample heuristic, not a quadrature decoder - contact bounce or
//! noise can double count or misattribute direction, and nothing here tries
//! to correct that.
//!
//! Counters live in a [`PulseCounter`] built from atomic fields so it can sit
//! in a `static` shared between the edge handler (interrupt context) and the
//! main path. Individual fields are always read and written whole, but two
//! separate reads are not consistent as a pair; use
//! [`PulseCounter::snapshot`] when a caller needs all fields from the same
//! instant.

use portable_atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use pulsepanel_hal::{InputPin, TickSource};
use pulsepanel_protocol::DisplayMode;

/// Direction inferred from the most recent edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// No edge since construction or the last reset
    #[default]
    Idle,
    /// Companion channel was high at the last edge
    Forward,
    /// Companion channel was low at the last edge
    Backward,
}

impl Direction {
    const fn to_raw(self) -> u8 {
        match self {
            Direction::Idle => 0,
            Direction::Forward => 1,
            Direction::Backward => 2,
        }
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Direction::Forward,
            2 => Direction::Backward,
            _ => Direction::Idle,
        }
    }
}

/// Consistent copy of all counter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderSnapshot {
    /// Forward pulses since reset
    pub forward: u32,
    /// Backward pulses since reset
    pub backward: u32,
    /// Direction of the last edge
    pub direction: Direction,
    /// Tick of the last edge (0 after reset)
    pub last_pulse_tick: u64,
}

impl EncoderSnapshot {
    /// Derived value for a display mode
    pub fn value(&self, mode: DisplayMode) -> i64 {
        match mode {
            DisplayMode::Difference => i64::from(self.forward) - i64::from(self.backward),
            DisplayMode::ForwardOnly => i64::from(self.forward),
            DisplayMode::BackwardOnly => i64::from(self.backward),
        }
    }

    /// Derived value for a raw mode selector
    ///
    /// Unknown selectors yield 0.
    pub fn value_for_selector(&self, selector: i32) -> i64 {
        DisplayMode::from_selector(selector)
            .map(|mode| self.value(mode))
            .unwrap_or(0)
    }

    /// Check whether no edge arrived within `timeout` ticks of `now`
    ///
    /// An encoder that has not moved since reset is always idle.
    pub fn is_idle(&self, now: u64, timeout: u64) -> bool {
        self.direction == Direction::Idle || now.saturating_sub(self.last_pulse_tick) >= timeout
    }
}

/// Interrupt-safe pulse counters for one encoder
pub struct PulseCounter {
    forward: AtomicU32,
    backward: AtomicU32,
    direction: AtomicU8,
    last_pulse_tick: AtomicU64,
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseCounter {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            forward: AtomicU32::new(0),
            backward: AtomicU32::new(0),
            direction: AtomicU8::new(Direction::Idle.to_raw()),
            last_pulse_tick: AtomicU64::new(0),
        }
    }

    /// Record one edge
    ///
    /// Safe to call from interrupt context: only atomic stores, never blocks.
    /// Counters wrap at `u32::MAX`.
    pub fn record(&self, companion_high: bool, now: u64) {
        let direction = if companion_high {
            self.forward.fetch_add(1, Ordering::Relaxed);
            Direction::Forward
        } else {
            self.backward.fetch_add(1, Ordering::Relaxed);
            Direction::Backward
        };
        self.direction.store(direction.to_raw(), Ordering::Relaxed);
        self.last_pulse_tick.store(now, Ordering::Release);
    }

    /// Zero both counters, clear direction and the last pulse tick
    ///
    /// Meant for the main path. All four stores happen inside one critical
    /// section, so an edge lands either fully before or fully after.
    pub fn reset(&self) {
        critical_section::with(|_| {
            self.forward.store(0, Ordering::Relaxed);
            self.backward.store(0, Ordering::Relaxed);
            self.direction.store(Direction::Idle.to_raw(), Ordering::Relaxed);
            self.last_pulse_tick.store(0, Ordering::Relaxed);
        });
    }

    /// Read all fields from the same instant
    pub fn snapshot(&self) -> EncoderSnapshot {
        critical_section::with(|_| EncoderSnapshot {
            forward: self.forward.load(Ordering::Relaxed),
            backward: self.backward.load(Ordering::Relaxed),
            direction: Direction::from_raw(self.direction.load(Ordering::Relaxed)),
            last_pulse_tick: self.last_pulse_tick.load(Ordering::Relaxed),
        })
    }

    /// Forward pulses since reset
    pub fn forward_count(&self) -> u32 {
        self.forward.load(Ordering::Relaxed)
    }

    /// Backward pulses since reset
    pub fn backward_count(&self) -> u32 {
        self.backward.load(Ordering::Relaxed)
    }

    /// Direction of the last edge
    pub fn direction(&self) -> Direction {
        Direction::from_raw(self.direction.load(Ordering::Relaxed))
    }

    /// Tick of the last edge
    pub fn last_pulse_tick(&self) -> u64 {
        self.last_pulse_tick.load(Ordering::Acquire)
    }

    /// Derived value for a display mode
    pub fn value(&self, mode: DisplayMode) -> i64 {
        self.snapshot().value(mode)
    }

    /// Derived value for a raw mode selector, 0 for unknown selectors
    pub fn value_for_selector(&self, selector: i32) -> i64 {
        self.snapshot().value_for_selector(selector)
    }
}

/// Pin numbers of the two encoder channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderPins {
    /// Channel whose edges trigger counting
    pub primary: u8,
    /// Channel sampled to infer direction
    pub companion: u8,
}

/// One physical rotary encoder
///
/// Both pins are handed over already configured as inputs. The encoder does
/// not register any interrupt itself: whoever owns the primary channel must
/// call [`Encoder::handle_edge`] on every rising edge.
pub struct Encoder<'a, C, T> {
    counter: &'a PulseCounter,
    pins: EncoderPins,
    companion: C,
    clock: T,
}

impl<'a, C: InputPin, T: TickSource> Encoder<'a, C, T> {
    /// Bind counters to the companion input and a tick source
    pub fn new(counter: &'a PulseCounter, pins: EncoderPins, companion: C, clock: T) -> Self {
        Self {
            counter,
            pins,
            companion,
            clock,
        }
    }

    /// Count one primary-channel edge
    ///
    /// Interrupt context entry point.
    pub fn handle_edge(&self) {
        let companion_high = self.companion.is_high();
        self.counter.record(companion_high, self.clock.now_ticks());
    }

    /// Zero counters and direction (main path only)
    pub fn reset(&self) {
        self.counter.reset();
    }

    /// Derived value for a display mode
    pub fn value(&self, mode: DisplayMode) -> i64 {
        self.counter.value(mode)
    }

    /// Derived value for a raw mode selector, 0 for unknown selectors
    pub fn value_for_selector(&self, selector: i32) -> i64 {
        self.counter.value_for_selector(selector)
    }

    /// All counter fields from the same instant
    pub fn snapshot(&self) -> EncoderSnapshot {
        self.counter.snapshot()
    }

    /// Direction of the last edge
    pub fn direction(&self) -> Direction {
        self.counter.direction()
    }

    /// Check whether no edge arrived within `timeout` ticks of `now`
    pub fn is_idle(&self, now: u64, timeout: u64) -> bool {
        self.snapshot().is_idle(now, timeout)
    }

    /// Like [`Encoder::is_idle`], measured from the encoder's own clock
    pub fn is_idle_now(&self, timeout: u64) -> bool {
        self.is_idle(self.clock.now_ticks(), timeout)
    }

    /// Pin numbers given at construction
    pub fn pins(&self) -> EncoderPins {
        self.pins
    }

    /// Shared counters
    pub fn counter(&self) -> &'a PulseCounter {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Mock companion pin
    struct MockPin {
        high: Cell<bool>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: Cell::new(false),
            }
        }
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            self.high.get()
        }
    }

    /// Mock clock advanced by hand
    struct MockClock {
        now: Cell<u64>,
    }

    impl MockClock {
        fn new(start: u64) -> Self {
            Self {
                now: Cell::new(start),
            }
        }

        fn advance(&self, ticks: u64) {
            self.now.set(self.now.get() + ticks);
        }
    }

    impl TickSource for MockClock {
        fn now_ticks(&self) -> u64 {
            self.now.get()
        }
    }

    const PINS: EncoderPins = EncoderPins {
        primary: 2,
        companion: 3,
    };

    #[test]
    fn test_forward_edge() {
        let counter = PulseCounter::new();
        let pin = MockPin::new();
        let clock = MockClock::new(100);
        let encoder = Encoder::new(&counter, PINS, &pin, &clock);

        pin.high.set(true);
        encoder.handle_edge();

        let snap = encoder.snapshot();
        assert_eq!(snap.forward, 1);
        assert_eq!(snap.backward, 0);
        assert_eq!(snap.direction, Direction::Forward);
        assert_eq!(snap.last_pulse_tick, 100);
    }

    #[test]
    fn test_backward_edge() {
        let counter = PulseCounter::new();
        let pin = MockPin::new();
        let clock = MockClock::new(250);
        let encoder = Encoder::new(&counter, PINS, &pin, &clock);

        encoder.handle_edge();

        assert_eq!(counter.forward_count(), 0);
        assert_eq!(counter.backward_count(), 1);
        assert_eq!(encoder.direction(), Direction::Backward);
        assert_eq!(counter.last_pulse_tick(), 250);
    }

    #[test]
    fn test_values_per_mode() {
        let counter = PulseCounter::new();
        let pin = MockPin::new();
        let clock = MockClock::new(0);
        let encoder = Encoder::new(&counter, PINS, &pin, &clock);

        pin.high.set(true);
        for _ in 0..3 {
            encoder.handle_edge();
        }
        pin.high.set(false);
        for _ in 0..5 {
            encoder.handle_edge();
        }

        assert_eq!(encoder.value(DisplayMode::Difference), -2);
        assert_eq!(encoder.value(DisplayMode::ForwardOnly), 3);
        assert_eq!(encoder.value(DisplayMode::BackwardOnly), 5);

        assert_eq!(encoder.value_for_selector(0), -2);
        assert_eq!(encoder.value_for_selector(1), 3);
        assert_eq!(encoder.value_for_selector(2), 5);

        // Unknown selectors are a silent no-op
        assert_eq!(encoder.value_for_selector(3), 0);
        assert_eq!(encoder.value_for_selector(-1), 0);
    }

    #[test]
    fn test_reset() {
        let counter = PulseCounter::new();
        let pin = MockPin::new();
        let clock = MockClock::new(10);
        let encoder = Encoder::new(&counter, PINS, &pin, &clock);

        pin.high.set(true);
        encoder.handle_edge();
        pin.high.set(false);
        encoder.handle_edge();

        encoder.reset();
        let once = encoder.snapshot();
        assert_eq!(once, EncoderSnapshot::default());
        assert_eq!(encoder.value_for_selector(0), 0);

        // Second reset is a no-op
        encoder.reset();
        assert_eq!(encoder.snapshot(), once);
    }

    #[test]
    fn test_direction_never_returns_to_idle_from_edge() {
        let counter = PulseCounter::new();
        assert_eq!(counter.direction(), Direction::Idle);

        counter.record(true, 1);
        assert_eq!(counter.direction(), Direction::Forward);
        counter.record(false, 2);
        assert_eq!(counter.direction(), Direction::Backward);
        counter.record(true, 3);
        assert_eq!(counter.direction(), Direction::Forward);

        counter.reset();
        assert_eq!(counter.direction(), Direction::Idle);
    }

    #[test]
    fn test_idle_detection() {
        let counter = PulseCounter::new();
        let pin = MockPin::new();
        let clock = MockClock::new(1_000);
        let encoder = Encoder::new(&counter, PINS, &pin, &clock);

        // Never moved
        assert!(encoder.is_idle_now(500));

        encoder.handle_edge();
        assert!(!encoder.is_idle_now(500));
        assert!(!encoder.is_idle(1_499, 500));
        assert!(encoder.is_idle(1_500, 500));

        clock.advance(499);
        assert!(!encoder.is_idle_now(500));

        clock.advance(1);
        assert!(encoder.is_idle_now(500));
    }

    #[test]
    fn test_pins_are_kept() {
        let counter = PulseCounter::new();
        let pin = MockPin::new();
        let clock = MockClock::new(0);
        let encoder = Encoder::new(&counter, PINS, &pin, &clock);

        assert_eq!(encoder.pins().primary, 2);
        assert_eq!(encoder.pins().companion, 3);
        assert!(core::ptr::eq(encoder.counter(), &counter));
    }

    #[test]
    fn test_counter_in_static() {
        static COUNTER: PulseCounter = PulseCounter::new();

        COUNTER.record(true, 5);
        COUNTER.record(true, 6);
        assert_eq!(COUNTER.value(DisplayMode::ForwardOnly), 2);
        COUNTER.reset();
        assert_eq!(COUNTER.value(DisplayMode::ForwardOnly), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn counts_follow_companion_level(levels in proptest::collection::vec(any::<bool>(), 0..200)) {
                let counter = PulseCounter::new();
                let mut previous = counter.snapshot();

                for (tick, &high) in levels.iter().enumerate() {
                    counter.record(high, tick as u64);
                    let snap = counter.snapshot();

                    // Exactly one counter moves, by exactly one
                    if high {
                        prop_assert_eq!(snap.forward, previous.forward + 1);
                        prop_assert_eq!(snap.backward, previous.backward);
                        prop_assert_eq!(snap.direction, Direction::Forward);
                    } else {
                        prop_assert_eq!(snap.backward, previous.backward + 1);
                        prop_assert_eq!(snap.forward, previous.forward);
                        prop_assert_eq!(snap.direction, Direction::Backward);
                    }
                    prop_assert!(snap.last_pulse_tick >= previous.last_pulse_tick);
                    previous = snap;
                }

                let forward = levels.iter().filter(|&&h| h).count() as i64;
                let backward = levels.len() as i64 - forward;
                prop_assert_eq!(counter.value_for_selector(0), forward - backward);
                prop_assert_eq!(counter.value_for_selector(1), forward);
                prop_assert_eq!(counter.value_for_selector(2), backward);
            }

            #[test]
            fn reset_always_zeroes(levels in proptest::collection::vec(any::<bool>(), 0..50)) {
                let counter = PulseCounter::new();
                for (tick, &high) in levels.iter().enumerate() {
                    counter.record(high, tick as u64 + 1);
                }

                counter.reset();
                prop_assert_eq!(counter.snapshot(), EncoderSnapshot::default());
                prop_assert_eq!(counter.value_for_selector(0), 0);
            }

            #[test]
            fn unknown_selectors_yield_zero(selector in 3i32..i32::MAX, edges in 0u32..20) {
                let counter = PulseCounter::new();
                for tick in 0..edges {
                    counter.record(tick % 3 == 0, u64::from(tick));
                }
                prop_assert_eq!(counter.value_for_selector(selector), 0);
                prop_assert_eq!(counter.value_for_selector(-selector), 0);
            }
        }
    }
}
