//! Double-tap detection and mode-toggle arbitration.
//!
//! Only accepted press edges are counted. Two presses on the same switch
//! inside the window make a double-tap, which requests a mode toggle. The
//! winning switch clears every switch's counter, so a second switch that
//! was one press away from its own double-tap has to start over.
//!
//! Two switches completing a double-tap in the same tick are resolved by
//! index order: the lower index is processed first and wins.

/// Presses needed to toggle the mode.
const TAPS_TO_TOGGLE: u8 = 2;

/// Tap state for one switch.
#[derive(Clone, Copy, Debug, Default)]
pub struct TapCounter {
    last_press_ms: Option<u64>,
    count: u8,
}

impl TapCounter {
    pub const fn new() -> Self {
        Self {
            last_press_ms: None,
            count: 0,
        }
    }

    /// Record an accepted press at `now_ms`.
    ///
    /// Returns `true` when this press completes a double-tap. The counter is
    /// already cleared when that happens; clearing the other switches is up
    /// to the caller (see [`arbitrate`]).
    pub fn press(&mut self, now_ms: u64, window_ms: u64) -> bool {
        let within = self
            .last_press_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < window_ms);
        self.last_press_ms = Some(now_ms);

        self.count = if within { self.count.saturating_add(1) } else { 1 };

        if self.count >= TAPS_TO_TOGGLE {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

/// Clear the tap counters of every switch once a double-tap has won.
pub fn arbitrate<'a, I>(counters: I)
where
    I: IntoIterator<Item = &'a mut TapCounter>,
{
    for counter in counters {
        counter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: u64 = 400;

    #[test]
    fn single_press_counts_one() {
        let mut t = TapCounter::new();
        assert!(!t.press(1000, WINDOW));
        assert_eq!(t.count(), 1);
    }

    #[test]
    fn two_presses_inside_window_double_tap() {
        let mut t = TapCounter::new();
        assert!(!t.press(1000, WINDOW));
        assert!(t.press(1399, WINDOW));
        assert_eq!(t.count(), 0);
    }

    #[test]
    fn press_at_window_edge_starts_over() {
        let mut t = TapCounter::new();
        assert!(!t.press(1000, WINDOW));
        assert!(!t.press(1400, WINDOW));
        assert_eq!(t.count(), 1);
    }

    #[test]
    fn third_press_after_toggle_counts_fresh() {
        let mut t = TapCounter::new();
        t.press(1000, WINDOW);
        assert!(t.press(1100, WINDOW));
        // Counter was cleared, so this is the first tap of a new pattern.
        assert!(!t.press(1200, WINDOW));
        assert_eq!(t.count(), 1);
        assert!(t.press(1300, WINDOW));
    }

    #[test]
    fn first_press_ever_is_never_a_double_tap() {
        let mut t = TapCounter::new();
        assert!(!t.press(0, WINDOW));
    }

    #[test]
    fn arbitration_clears_all_counters() {
        let mut counters = [TapCounter::new(); 4];
        counters[1].press(1000, WINDOW);
        counters[3].press(1000, WINDOW);
        arbitrate(counters.iter_mut());
        assert!(counters.iter().all(|c| c.count() == 0));
    }
}
