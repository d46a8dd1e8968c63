//! Simple rule-based strategies.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xidach_engine::hand::Role;

use crate::{BotAction, BotPlayer, SeatView};

/// Stands once the hand reaches a role-specific threshold.
///
/// Participants stop at 17, the dealer at 16. Hands that can no longer hit
/// always stand.
#[derive(Debug, Clone)]
pub struct BaselineBot {
    participant_target: u8,
    dealer_target: u8,
}

impl BaselineBot {
    pub fn new() -> Self {
        Self {
            participant_target: 17,
            dealer_target: 16,
        }
    }

    fn target(&self, role: Role) -> u8 {
        match role {
            Role::Dealer => self.dealer_target,
            Role::Participant => self.participant_target,
        }
    }
}

impl Default for BaselineBot {
    fn default() -> Self {
        Self::new()
    }
}

impl BotPlayer for BaselineBot {
    fn decide(&self, view: &SeatView) -> BotAction {
        if !view.can_hit {
            return BotAction::Stand;
        }
        if view.can_stand && view.value >= self.target(view.role) {
            BotAction::Stand
        } else {
            BotAction::Hit
        }
    }

    fn name(&self) -> &str {
        "BaselineBot"
    }
}

/// Stands the moment standing is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CautiousBot;

impl BotPlayer for CautiousBot {
    fn decide(&self, view: &SeatView) -> BotAction {
        if view.can_stand || !view.can_hit {
            BotAction::Stand
        } else {
            BotAction::Hit
        }
    }

    fn name(&self) -> &str {
        "CautiousBot"
    }
}

/// Flips a coin whenever both hitting and standing are allowed.
#[derive(Debug)]
pub struct RandomBot {
    rng: Mutex<StdRng>,
}

impl RandomBot {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl BotPlayer for RandomBot {
    fn decide(&self, view: &SeatView) -> BotAction {
        match (view.can_hit, view.can_stand) {
            (true, false) => BotAction::Hit,
            (false, _) => BotAction::Stand,
            (true, true) => {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                if rng.random_bool(0.5) {
                    BotAction::Hit
                } else {
                    BotAction::Stand
                }
            }
        }
    }

    fn name(&self) -> &str {
        "RandomBot"
    }
}
