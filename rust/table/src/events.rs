use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;
use xidach_engine::cards::Card;
use xidach_engine::logger::SettlementRecord;
use xidach_engine::participant::Participant;
use xidach_engine::player::Player;
use xidach_engine::round::Round;

/// Receives table notifications once the table's own state is updated.
///
/// Every method runs after all manager and round locks are released, so an
/// implementation may call back into the manager. Ordering is only
/// guaranteed between events of the same kind within one round.
pub trait TableObserver: Send + Sync {
    fn new_round(&self, _round: &Round) {}
    fn player_joined(&self, _player: &Player) {}
    fn player_left(&self, _player: &Player) {}
    fn bet_placed(&self, _round: &Round, _player_id: &str, _amount: u64) {}
    fn turn_started(&self, _round: &Round, _seat: &Participant) {}
    fn stood(&self, _round: &Round, _seat: &Participant) {}
    fn hit(&self, _round: &Round, _seat: &Participant, _card: Card) {}
    fn round_finished(&self, _round: &Round) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TableObserver for NoopObserver {}

// Bounded so a stalled subscriber cannot grow memory without limit;
// events for a full channel are dropped and the subscriber pruned.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<TableEvent>;
pub type EventReceiver = mpsc::Receiver<TableEvent>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    RoundCreated {
        round_id: String,
        dealer_id: String,
        rule_id: String,
    },
    PlayerJoined {
        player_id: String,
        name: String,
    },
    PlayerLeft {
        player_id: String,
    },
    BetPlaced {
        round_id: String,
        player_id: String,
        amount: u64,
    },
    TurnStarted {
        round_id: String,
        player_id: String,
        is_dealer: bool,
    },
    PlayerStood {
        round_id: String,
        player_id: String,
    },
    /// The drawn card stays private; others only see the count.
    PlayerHit {
        round_id: String,
        player_id: String,
        card_count: usize,
    },
    RoundFinished {
        round_id: String,
        results: Vec<SettlementRecord>,
    },
}

impl TableEvent {
    pub fn round_id(&self) -> Option<&str> {
        match self {
            TableEvent::RoundCreated { round_id, .. }
            | TableEvent::BetPlaced { round_id, .. }
            | TableEvent::TurnStarted { round_id, .. }
            | TableEvent::PlayerStood { round_id, .. }
            | TableEvent::PlayerHit { round_id, .. }
            | TableEvent::RoundFinished { round_id, .. } => Some(round_id),
            TableEvent::PlayerJoined { .. } | TableEvent::PlayerLeft { .. } => None,
        }
    }
}

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

/// Fans [`TableEvent`]s out to every subscriber.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBusInner {
    fn read(&self) -> RwLockReadGuard<'_, Vec<(usize, EventSender)>> {
        self.subscribers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<(usize, EventSender)>> {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw();
        EventSubscription {
            bus: self.clone(),
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner.write().push((id, tx));

        tracing::info!(subscriber_id = id, "client subscribed to table events");

        (id, rx)
    }

    pub fn broadcast(&self, event: TableEvent) {
        tracing::debug!(
            round_id = event.round_id().unwrap_or("-"),
            event_type = ?event,
            "broadcasting table event"
        );

        let subscribers = self.inner.read().clone();
        if subscribers.is_empty() {
            tracing::trace!("no subscribers for table events");
            return;
        }

        let mut failed = Vec::new();
        for (id, sender) in subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    subscriber_id = id,
                    error = ?e,
                    "failed to send event to subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
    }

    pub fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.read().len()
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        self.inner.write().retain(|(id, _)| !ids.contains(id));
    }
}

impl TableObserver for EventBus {
    fn new_round(&self, round: &Round) {
        self.broadcast(TableEvent::RoundCreated {
            round_id: round.id().to_string(),
            dealer_id: round.dealer().id().to_string(),
            rule_id: round.rule().id.clone(),
        });
    }

    fn player_joined(&self, player: &Player) {
        self.broadcast(TableEvent::PlayerJoined {
            player_id: player.id.clone(),
            name: player.name.clone(),
        });
    }

    fn player_left(&self, player: &Player) {
        self.broadcast(TableEvent::PlayerLeft {
            player_id: player.id.clone(),
        });
    }

    fn bet_placed(&self, round: &Round, player_id: &str, amount: u64) {
        self.broadcast(TableEvent::BetPlaced {
            round_id: round.id().to_string(),
            player_id: player_id.to_string(),
            amount,
        });
    }

    fn turn_started(&self, round: &Round, seat: &Participant) {
        self.broadcast(TableEvent::TurnStarted {
            round_id: round.id().to_string(),
            player_id: seat.id().to_string(),
            is_dealer: seat.is_dealer(),
        });
    }

    fn stood(&self, round: &Round, seat: &Participant) {
        self.broadcast(TableEvent::PlayerStood {
            round_id: round.id().to_string(),
            player_id: seat.id().to_string(),
        });
    }

    fn hit(&self, round: &Round, seat: &Participant, _card: Card) {
        self.broadcast(TableEvent::PlayerHit {
            round_id: round.id().to_string(),
            player_id: seat.id().to_string(),
            card_count: seat.cards().len(),
        });
    }

    fn round_finished(&self, round: &Round) {
        self.broadcast(TableEvent::RoundFinished {
            round_id: round.id().to_string(),
            results: round.results(),
        });
    }
}
