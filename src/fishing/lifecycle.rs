//! Finite state machine for a single fish, from spawn to catch or escape.

use bevy::prelude::*;
use std::fmt;

use crate::shared::FishState;

/// A rejected transition request. The machine's state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: FishState,
    pub to: FishState,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fish transition {:?} -> {:?}", self.from, self.to)
    }
}

/// Externally visible effect of entering a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleNotice {
    Hooked,
    Caught,
    Escaped,
}

pub fn entry_notice(state: FishState) -> Option<LifecycleNotice> {
    match state {
        FishState::Hooked => Some(LifecycleNotice::Hooked),
        FishState::Caught => Some(LifecycleNotice::Caught),
        FishState::Escaped => Some(LifecycleNotice::Escaped),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FishLifecycle {
    state: FishState,
    /// True once the hook has been announced for this fish.
    hooked_announced: bool,
}

impl FishLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FishState {
        self.state
    }

    /// Attempt a transition. On success returns the previous state.
    pub fn transition(&mut self, to: FishState) -> Result<FishState, InvalidTransition> {
        let from = self.state;
        if !from.can_transition_to(to) {
            warn!("[Lifecycle] Rejected {:?} -> {:?}", from, to);
            return Err(InvalidTransition { from, to });
        }
        self.state = to;
        debug!("[Lifecycle] {:?} -> {:?}", from, to);
        Ok(from)
    }

    /// Same as [`transition`](Self::transition) but also reports the entry
    /// notice. Returning to Hooked from Struggling does not re-announce.
    pub fn transition_with_notice(
        &mut self,
        to: FishState,
    ) -> Result<Option<LifecycleNotice>, InvalidTransition> {
        self.transition(to)?;
        let notice = match entry_notice(to) {
            Some(LifecycleNotice::Hooked) if self.hooked_announced => None,
            Some(LifecycleNotice::Hooked) => {
                self.hooked_announced = true;
                Some(LifecycleNotice::Hooked)
            }
            other => other,
        };
        Ok(notice)
    }

    pub fn can_advance_toward_target(&self) -> bool {
        self.state == FishState::Swimming
    }

    pub fn is_hooked_or_struggling(&self) -> bool {
        matches!(self.state, FishState::Hooked | FishState::Struggling)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, FishState::Caught | FishState::Escaped)
    }

    pub fn force_hook(&mut self) -> Result<Option<LifecycleNotice>, InvalidTransition> {
        self.transition_with_notice(FishState::Hooked)
    }

    pub fn force_catch(&mut self) -> Result<Option<LifecycleNotice>, InvalidTransition> {
        self.transition_with_notice(FishState::Caught)
    }

    pub fn force_escape(&mut self) -> Result<Option<LifecycleNotice>, InvalidTransition> {
        self.transition_with_notice(FishState::Escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FishState::*;

    const ALL: [FishState; 6] = [Spawning, Swimming, Hooked, Struggling, Caught, Escaped];

    fn machine_in(state: FishState) -> FishLifecycle {
        FishLifecycle {
            state,
            hooked_announced: false,
        }
    }

    #[test]
    fn test_transition_table_is_exact() {
        let legal = [
            (Spawning, Swimming),
            (Swimming, Hooked),
            (Swimming, Escaped),
            (Hooked, Struggling),
            (Hooked, Caught),
            (Hooked, Escaped),
            (Struggling, Hooked),
            (Struggling, Caught),
            (Struggling, Escaped),
        ];
        for from in ALL {
            for to in ALL {
                let mut m = machine_in(from);
                let result = m.transition(to);
                if legal.contains(&(from, to)) {
                    assert_eq!(result, Ok(from));
                    assert_eq!(m.state(), to);
                } else {
                    assert_eq!(result, Err(InvalidTransition { from, to }));
                    assert_eq!(m.state(), from, "{from:?} -> {to:?} changed state");
                }
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        assert!(Caught.successors().is_empty());
        assert!(Escaped.successors().is_empty());
        assert!(machine_in(Caught).is_terminal());
        assert!(machine_in(Escaped).is_terminal());
    }

    #[test]
    fn test_queries() {
        assert!(machine_in(Swimming).can_advance_toward_target());
        assert!(!machine_in(Hooked).can_advance_toward_target());
        assert!(machine_in(Hooked).is_hooked_or_struggling());
        assert!(machine_in(Struggling).is_hooked_or_struggling());
        assert!(!machine_in(Swimming).is_hooked_or_struggling());
    }

    #[test]
    fn test_notices_on_entry() {
        let mut m = FishLifecycle::new();
        assert_eq!(m.transition_with_notice(Swimming), Ok(None));
        assert_eq!(m.force_hook(), Ok(Some(LifecycleNotice::Hooked)));
        assert_eq!(m.transition_with_notice(Struggling), Ok(None));
        // Coming back from a struggle is not a new hook.
        assert_eq!(m.transition_with_notice(Hooked), Ok(None));
        assert_eq!(m.force_catch(), Ok(Some(LifecycleNotice::Caught)));
        assert!(m.force_escape().is_err());
        assert_eq!(m.state(), Caught);
    }
}
