use crate::types::Action;

/// Commits a policy to its last decision for a number of ticks.
///
/// Engaging for `n` ticks covers the deciding tick plus `n - 1` held ticks.
/// While held, movement and shield are repeated verbatim; anything else
/// (attacks, shots, jumps) fires once and then degrades to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecisionLock {
    action: Option<Action>,
    remaining: u32,
}

impl DecisionLock {
    pub fn engage(&mut self, action: Action, ticks: u32) {
        self.action = Some(action);
        self.remaining = ticks.saturating_sub(1);
    }

    pub fn is_engaged(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn held_action(&self) -> Option<Action> {
        self.action.filter(|_| self.is_engaged())
    }

    /// Consume one held tick. `None` when the lock is free.
    pub fn hold(&mut self) -> Option<Action> {
        if !self.is_engaged() {
            return None;
        }
        self.remaining -= 1;
        Some(match self.action {
            Some(a) if a.persists_under_lock() => a,
            _ => Action::Idle,
        })
    }

    pub fn release(&mut self) {
        self.action = None;
        self.remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(lock: &mut DecisionLock) -> Vec<Action> {
        std::iter::from_fn(|| lock.hold()).collect()
    }

    #[test]
    fn attack_degrades_to_idle() {
        let mut lock = DecisionLock::default();
        lock.engage(Action::LightAttack, 25);
        let held = drain(&mut lock);
        assert_eq!(held.len(), 24);
        assert!(held.iter().all(|&a| a == Action::Idle));
        assert!(!lock.is_engaged());
    }

    #[test]
    fn movement_and_shield_repeat() {
        let mut lock = DecisionLock::default();
        lock.engage(Action::MoveLeft, 5);
        assert_eq!(drain(&mut lock), vec![Action::MoveLeft; 4]);

        lock.engage(Action::Shield, 3);
        assert_eq!(drain(&mut lock), vec![Action::Shield; 2]);
    }

    #[test]
    fn jump_fires_once() {
        let mut lock = DecisionLock::default();
        lock.engage(Action::Jump, 5);
        assert_eq!(lock.hold(), Some(Action::Idle));
    }

    #[test]
    fn single_tick_lock_holds_nothing() {
        let mut lock = DecisionLock::default();
        lock.engage(Action::Shoot, 1);
        assert!(!lock.is_engaged());
        assert_eq!(lock.hold(), None);
        assert_eq!(lock.held_action(), None);
    }

    #[test]
    fn release_frees_immediately() {
        let mut lock = DecisionLock::default();
        lock.engage(Action::MoveRight, 10);
        assert_eq!(lock.held_action(), Some(Action::MoveRight));
        lock.release();
        assert_eq!(lock.remaining(), 0);
        assert_eq!(lock.hold(), None);
    }
}
