//! # xidach-table: One Xì Dách Table
//!
//! The session layer on top of `xidach-engine`: a player registry backed by a
//! [`PlayerStore`], at most one open [`Round`](xidach_engine::round::Round),
//! turn timeouts, settlement bookkeeping and event notification.
//!
//! ```rust
//! use std::sync::Arc;
//! use xidach_engine::player::PlayerRole;
//! use xidach_table::{MemoryStore, SessionManager, TableSettings};
//!
//! let settings = TableSettings { initial_balance: 2_000, ..TableSettings::default() };
//! let table = SessionManager::new(Arc::new(MemoryStore::new()), settings).unwrap();
//! table.register_player("dealer", "Dealer", PlayerRole::Normal).unwrap();
//! table.register_player("p1", "Alice", PlayerRole::Normal).unwrap();
//!
//! let round = table.new_round("dealer").unwrap();
//! table.bet(round.id(), "p1", 100).unwrap();
//! table.deal(round.id()).unwrap();
//! let summary = table.finish(round.id(), true).unwrap();
//! assert_eq!(summary.net(), 0);
//! assert!(table.current_round().is_none());
//! ```

pub mod errors;
pub mod events;
pub mod logging;
pub mod session;
pub mod settings;
pub mod store;

pub use errors::{ErrorReply, ErrorSeverity, IntoErrorReply};
pub use events::{EventBus, EventSubscription, NoopObserver, TableEvent, TableObserver};
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use session::{Progress, RoundId, SessionManager, TableError};
pub use settings::{SettingsError, TableSettings};
pub use store::{MemoryStore, PlayerStore, StoreError};
