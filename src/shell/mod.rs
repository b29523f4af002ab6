//! Presentation Shell
//!
//! Turns intents from the file-browser front end into store mutations and
//! current-folder transitions, and reports them to a notifier.

pub mod intent;
pub mod notify;
pub mod session;

pub use intent::{action_ids, Intent, RawIntent};
pub use notify::{
    ActionNotification, MemoryNotifier, NotificationConfig, NotificationFilter, NotificationKind,
    Notifier, NullNotifier, TracingNotifier,
};
pub use session::{Effect, Outcome, Session};
