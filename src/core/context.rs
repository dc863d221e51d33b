//! Per-step simulation context passed explicitly into fighter updates.

use crate::combat::hitbox::HitboxDb;
use crate::game::events::MatchEvent;
use rand_chacha::ChaCha8Rng;

/// Everything a fighter update needs besides the two fighters.
pub struct SimContext<'a> {
    /// Simulation clock in milliseconds.
    pub now_ms: u64,
    /// Stage walkway where feet land.
    pub ground_y: i32,
    pub hitboxes: &'a HitboxDb,
    pub events: &'a mut Vec<MatchEvent>,
    pub rng: &'a mut ChaCha8Rng,
}

impl SimContext<'_> {
    pub fn emit(&mut self, event: MatchEvent) {
        self.events.push(event);
    }
}
