//! Tick-driven delayed events
//!
//! Delayed transitions (wave pause, cooldown, game-over pause, delayed sound)
//! are queued with a due tick and handed back at the top of the tick that
//! reaches it. Nothing runs off the simulation thread and tests can step
//! through delays tick by tick.

use super::state::Sound;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Grow the spawn count, rebuild the asteroid field, end the pause
    WaveAdvance,
    /// Re-enable firing after a miss
    CooldownExpired,
    /// End the pause after game over so a restart click is accepted
    GameOverSettle,
    /// Play a cue late
    Sound(Sound),
}

#[derive(Debug, Clone)]
struct Pending {
    due_tick: u64,
    event: TimerEvent,
}

/// One-shot timers ordered by due tick, then by scheduling order
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once `delay_ticks` have passed after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, event: TimerEvent) {
        self.pending.push(Pending {
            due_tick: now.saturating_add(delay_ticks),
            event,
        });
    }

    /// Remove and return every event due at or before `now`
    pub fn drain_due(&mut self, now: u64) -> Vec<TimerEvent> {
        if !self.pending.iter().any(|p| p.due_tick <= now) {
            return Vec::new();
        }

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due_tick <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        // Stable sort keeps scheduling order among events due on the same tick
        due.sort_by_key(|p| p.due_tick);
        due.into_iter().map(|p| p.event).collect()
    }

    pub fn is_pending(&self, event: TimerEvent) -> bool {
        self.pending.iter().any(|p| p.event == event)
    }

    /// Tick at which `event` is next due, if scheduled
    #[cfg(test)]
    pub fn due_tick(&self, event: TimerEvent) -> Option<u64> {
        self.pending
            .iter()
            .filter(|p| p.event == event)
            .map(|p| p.due_tick)
            .min()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_early() {
        let mut timers = Timers::new();
        timers.schedule(10, 5, TimerEvent::CooldownExpired);
        assert!(timers.drain_due(14).is_empty());
        assert_eq!(timers.drain_due(15), vec![TimerEvent::CooldownExpired]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_drain_orders_by_due_then_schedule() {
        let mut timers = Timers::new();
        timers.schedule(0, 6, TimerEvent::Sound(Sound::ExplosionMid));
        timers.schedule(0, 3, TimerEvent::CooldownExpired);
        timers.schedule(0, 6, TimerEvent::WaveAdvance);
        let fired = timers.drain_due(10);
        assert_eq!(
            fired,
            vec![
                TimerEvent::CooldownExpired,
                TimerEvent::Sound(Sound::ExplosionMid),
                TimerEvent::WaveAdvance,
            ]
        );
    }

    #[test]
    fn test_zero_delay_is_due_immediately() {
        let mut timers = Timers::new();
        timers.schedule(7, 0, TimerEvent::GameOverSettle);
        assert_eq!(timers.due_tick(TimerEvent::GameOverSettle), Some(7));
        assert_eq!(timers.drain_due(8), vec![TimerEvent::GameOverSettle]);
    }

    #[test]
    fn test_is_pending() {
        let mut timers = Timers::new();
        assert!(!timers.is_pending(TimerEvent::WaveAdvance));
        timers.schedule(0, 120, TimerEvent::WaveAdvance);
        assert!(timers.is_pending(TimerEvent::WaveAdvance));
        assert_eq!(timers.len(), 1);
    }
}
