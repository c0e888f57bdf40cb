use super::direction::Direction;
use super::worm::Worm;

/// Decides which requested direction changes take effect.
///
/// At most one change is accepted per tick, and the worm may never be turned
/// straight back onto itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DirectionArbiter {
    current: Direction,
    moved_since_last_commit: bool,
}

impl DirectionArbiter {
    pub(crate) fn new() -> DirectionArbiter {
        DirectionArbiter {
            current: Worm::DEFAULT_DIRECTION,
            moved_since_last_commit: true,
        }
    }

    pub(crate) fn current(&self) -> Direction {
        self.current
    }

    /// Try to change the current direction to `direction`.  Returns whether
    /// the change was accepted.
    ///
    /// Requesting the current direction is not a change and does not use up
    /// the tick's slot.
    pub(crate) fn request(&mut self, direction: Direction) -> bool {
        if direction == self.current
            || direction == self.current.reverse()
            || !self.moved_since_last_commit
        {
            return false;
        }
        self.current = direction;
        self.moved_since_last_commit = false;
        true
    }

    pub(crate) fn on_tick_advanced(&mut self) {
        self.moved_since_last_commit = true;
    }

    pub(crate) fn reset(&mut self) {
        *self = DirectionArbiter::new();
    }
}

impl Default for DirectionArbiter {
    fn default() -> DirectionArbiter {
        DirectionArbiter::new()
    }
}
