//! Cooperative scheduler for the two periodic game triggers.
//!
//! Nothing here owns a thread. The caller polls [`GameClock::next_due`] with
//! the current instant and dispatches each returned event before polling
//! again, so moves and timer ticks are strictly sequential.

use std::time::{Duration, Instant};

use crate::config::TIMER_INTERVAL;

/// Which trigger fired.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClockEvent {
    Move,
    Second,
}

/// A single periodic trigger: an interval and an optional next deadline.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Trigger {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Trigger {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Cancels any pending deadline and schedules the next fire one full
    /// interval after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Replaces the interval and re-arms from `now`.
    pub fn rearm(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.arm(now);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn due_at(&self, now: Instant) -> Option<Instant> {
        self.deadline.filter(|deadline| *deadline <= now)
    }

    fn fire(&mut self) -> Option<Instant> {
        let fired_at = self.deadline?;
        self.deadline = Some(fired_at + self.interval);
        Some(fired_at)
    }
}

/// Move trigger plus the one-second elapsed-time trigger.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameClock {
    movement: Trigger,
    timer: Trigger,
}

impl GameClock {
    #[must_use]
    pub fn new(move_interval: Duration) -> Self {
        Self {
            movement: Trigger::new(move_interval),
            timer: Trigger::new(TIMER_INTERVAL),
        }
    }

    /// Arms both triggers from `now`.
    pub fn start(&mut self, now: Instant) {
        self.movement.arm(now);
        self.timer.arm(now);
    }

    /// Cancels both triggers.
    pub fn stop(&mut self) {
        self.movement.cancel();
        self.timer.cancel();
    }

    /// Changes the move interval, discarding time accrued since the last move.
    pub fn set_move_interval(&mut self, interval: Duration, now: Instant) {
        self.movement.rearm(interval, now);
    }

    /// Sets the move interval without arming anything.
    pub fn reset_move_interval(&mut self, interval: Duration) {
        self.movement = Trigger::new(interval);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.movement.is_armed() || self.timer.is_armed()
    }

    #[must_use]
    pub fn movement(&self) -> &Trigger {
        &self.movement
    }

    #[must_use]
    pub fn timer(&self) -> &Trigger {
        &self.timer
    }

    /// Returns the earliest pending deadline, if any trigger is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.movement.deadline(), self.timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Pops the earliest trigger due at `now`, rescheduling it one interval
    /// after its own deadline. Returns the event and its nominal fire time.
    /// The move trigger wins ties.
    pub fn next_due(&mut self, now: Instant) -> Option<(ClockEvent, Instant)> {
        let movement = self.movement.due_at(now);
        let timer = self.timer.due_at(now);

        match (movement, timer) {
            (Some(m), Some(t)) if t < m => self.timer.fire().map(|at| (ClockEvent::Second, at)),
            (Some(_), _) => self.movement.fire().map(|at| (ClockEvent::Move, at)),
            (None, Some(_)) => self.timer.fire().map(|at| (ClockEvent::Second, at)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ClockEvent, GameClock};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn unarmed_clock_never_fires() {
        let mut clock = GameClock::new(ms(500));
        let t0 = Instant::now();

        assert_eq!(clock.next_due(t0 + ms(10_000)), None);
        assert!(!clock.is_running());
    }

    #[test]
    fn move_fires_after_one_interval() {
        let mut clock = GameClock::new(ms(500));
        let t0 = Instant::now();
        clock.start(t0);

        assert_eq!(clock.next_due(t0 + ms(499)), None);
        assert_eq!(
            clock.next_due(t0 + ms(500)),
            Some((ClockEvent::Move, t0 + ms(500)))
        );
        assert_eq!(clock.next_due(t0 + ms(500)), None);
    }

    #[test]
    fn late_poll_replays_events_in_deadline_order() {
        let mut clock = GameClock::new(ms(400));
        let t0 = Instant::now();
        clock.start(t0);

        let mut events = Vec::new();
        while let Some(event) = clock.next_due(t0 + ms(1_200)) {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                (ClockEvent::Move, t0 + ms(400)),
                (ClockEvent::Move, t0 + ms(800)),
                (ClockEvent::Second, t0 + ms(1_000)),
                (ClockEvent::Move, t0 + ms(1_200)),
            ]
        );
    }

    #[test]
    fn move_wins_ties_with_the_timer() {
        let mut clock = GameClock::new(ms(1_000));
        let t0 = Instant::now();
        clock.start(t0);

        assert_eq!(
            clock.next_due(t0 + ms(1_000)).map(|(event, _)| event),
            Some(ClockEvent::Move)
        );
        assert_eq!(
            clock.next_due(t0 + ms(1_000)).map(|(event, _)| event),
            Some(ClockEvent::Second)
        );
    }

    #[test]
    fn rearm_discards_time_since_last_move() {
        let mut clock = GameClock::new(ms(500));
        let t0 = Instant::now();
        clock.start(t0);

        clock.set_move_interval(ms(480), t0 + ms(300));

        assert_eq!(clock.movement().deadline(), Some(t0 + ms(780)));
        assert_eq!(clock.next_due(t0 + ms(779)), None);
        assert_eq!(
            clock.next_due(t0 + ms(780)),
            Some((ClockEvent::Move, t0 + ms(780)))
        );
    }

    #[test]
    fn stop_cancels_both_triggers() {
        let mut clock = GameClock::new(ms(200));
        let t0 = Instant::now();
        clock.start(t0);

        clock.stop();

        assert!(!clock.is_running());
        assert_eq!(clock.next_deadline(), None);
        assert_eq!(clock.next_due(t0 + ms(5_000)), None);
    }

    #[test]
    fn next_deadline_is_the_earliest_armed_trigger() {
        let mut clock = GameClock::new(ms(1_500));
        let t0 = Instant::now();
        clock.start(t0);

        assert_eq!(clock.next_deadline(), Some(t0 + ms(1_000)));
    }
}
