// Session state: phase, catch log, elapsed timer, and the transient
// HUD message. One-way phase machine: Ready -> Running -> Won.

use std::time::{Duration, Instant};

use super::animals::SPECIES;

/// Seconds a "Caught a ..." message stays on screen.
const MESSAGE_SECS: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player to click in (pointer lock).
    Ready,
    Running,
    Won,
}

pub struct Session {
    phase: Phase,
    started_at: Option<Instant>,
    /// Captured at the moment of the win; the win screen shows this, not
    /// a still-running clock.
    final_time: Option<Duration>,
    /// Species indices in catch order; the HUD renders these as a glyph trail.
    pub caught: Vec<usize>,
    pub total: usize,
    message: Option<(String, f32)>,
}

impl Session {
    pub fn new(total: usize) -> Self {
        Self {
            phase: Phase::Ready,
            started_at: None,
            final_time: None,
            caught: Vec::with_capacity(total),
            total,
            message: None,
        }
    }

    /// Start the clock. Called when the player first locks the pointer;
    /// a second call is a no-op so the timer never restarts.
    pub fn begin(&mut self) {
        if self.phase == Phase::Ready {
            self.phase = Phase::Running;
            self.started_at = Some(Instant::now());
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Record one caught animal. Returns true exactly when this catch wins
    /// the session — callers use it to release the pointer once, even if
    /// several animals land in the same hit-test pass.
    pub fn record_catch(&mut self, species: usize) -> bool {
        let desc = &SPECIES[species];
        self.caught.push(species);
        self.message = Some((
            format!("Caught a {} {}!", desc.glyph, desc.name),
            MESSAGE_SECS,
        ));

        if self.phase == Phase::Running && self.caught.len() >= self.total {
            self.phase = Phase::Won;
            self.final_time = Some(self.elapsed());
            return true;
        }
        false
    }

    /// Time since the session began; once won, the duration captured at
    /// the winning catch.
    pub fn elapsed(&self) -> Duration {
        if let Some(final_time) = self.final_time {
            return final_time;
        }
        self.started_at.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Whole seconds, for the HUD clock.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    /// mm:ss for the HUD.
    pub fn format_elapsed(&self) -> String {
        let secs = self.elapsed_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// Age out the transient message.
    pub fn tick_message(&mut self, dt: f32) {
        if let Some((_, ttl)) = &mut self.message {
            *ttl -= dt;
            if *ttl <= 0.0 {
                self.message = None;
            }
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    /// Glyphs of everything caught so far, in catch order.
    pub fn caught_glyphs(&self) -> String {
        self.caught
            .iter()
            .map(|&s| SPECIES[s].glyph)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_idempotent() {
        let mut session = Session::new(10);
        assert_eq!(session.phase(), Phase::Ready);
        session.begin();
        assert!(session.is_running());
        let started = session.started_at;
        session.begin();
        assert_eq!(session.started_at, started);
    }

    #[test]
    fn win_transition_fires_exactly_once() {
        let mut session = Session::new(3);
        session.begin();
        assert!(!session.record_catch(0));
        assert!(!session.record_catch(1));
        // Two animals land in the same pass; only the third catch reports
        // the win, the fourth does not re-fire it.
        assert!(session.record_catch(2));
        assert_eq!(session.phase(), Phase::Won);
        assert!(!session.record_catch(3));
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.caught.len(), 4);
    }

    #[test]
    fn catch_message_expires_after_ttl() {
        let mut session = Session::new(10);
        session.begin();
        session.record_catch(0);
        assert!(session.message().unwrap().contains("Fox"));
        session.tick_message(1.0);
        assert!(session.message().is_some());
        session.tick_message(2.0);
        assert!(session.message().is_none());
    }

    #[test]
    fn glyph_trail_preserves_catch_order() {
        let mut session = Session::new(10);
        session.begin();
        session.record_catch(1);
        session.record_catch(0);
        let trail = session.caught_glyphs();
        let rabbit = SPECIES[1].glyph;
        let fox = SPECIES[0].glyph;
        assert_eq!(trail, format!("{rabbit} {fox}"));
    }

    #[test]
    fn timer_freezes_at_the_winning_catch() {
        let mut session = Session::new(1);
        session.begin();
        std::thread::sleep(Duration::from_millis(30));
        assert!(session.record_catch(0));

        let frozen = session.elapsed();
        assert!(frozen >= Duration::from_millis(30));
        std::thread::sleep(Duration::from_millis(30));
        // The win screen's clock stops at the winning catch.
        assert_eq!(session.elapsed(), frozen);

        // Post-win catches (same hit-test pass) don't disturb it either.
        session.record_catch(1);
        assert_eq!(session.elapsed(), frozen);
    }

    #[test]
    fn timer_is_zero_before_begin() {
        let session = Session::new(10);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.format_elapsed(), "0:00");
    }
}
