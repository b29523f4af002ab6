//! Action notifications: user-visible feedback for handled intents.

use super::intent::action_ids;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Whether the action went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// What the notification collaborator receives for one intent.
///
/// File and folder references are resolved to display names before the
/// intent is applied, so deleted files still show up by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionNotification {
    pub action_id: String,
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionNotification {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            kind: NotificationKind::Success,
            target: None,
            files: Vec::new(),
            source: None,
            destination: None,
            error: None,
        }
    }

    /// Mark as failed with the given reason
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.kind = NotificationKind::Failure;
        self.error = Some(error.into());
        self
    }

    /// Toast text, one line per part
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(error) = &self.error {
            parts.push(format!("Could not complete {}: {}", self.action_id, error));
        } else if self.action_id == action_ids::MOVE_FILES {
            parts.push(format!(
                "You moved {} file(s) from {} to {}.",
                self.files.len(),
                self.source.as_deref().unwrap_or("~"),
                self.destination.as_deref().unwrap_or("~"),
            ));
        } else if self.action_id == action_ids::OPEN_FILES && !self.files.is_empty() {
            parts.push(format!(
                "You opened {} file(s): {}.",
                self.files.len(),
                self.files.join(", ")
            ));
        }
        parts.push(format!("Action: {}", self.action_id));
        parts.join("\n")
    }
}

/// The notification collaborator. Has no say over store state.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &ActionNotification);
}

/// Emits notifications as tracing events
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &ActionNotification) {
        match notification.kind {
            NotificationKind::Success => info!(
                action = %notification.action_id,
                files = notification.files.len(),
                "{}",
                notification.text()
            ),
            NotificationKind::Failure => warn!(
                action = %notification.action_id,
                files = notification.files.len(),
                "{}",
                notification.text()
            ),
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<ActionNotification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<ActionNotification> {
        self.received.lock().clone()
    }

    /// Remove and return everything received so far
    pub fn drain(&self) -> Vec<ActionNotification> {
        std::mem::take(&mut *self.received.lock())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: &ActionNotification) {
        self.received.lock().push(notification.clone());
    }
}

/// Discards notifications
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &ActionNotification) {}
}

fn default_true() -> bool {
    true
}

fn default_ignored_actions() -> Vec<String> {
    [
        action_ids::MOUSE_CLICK_FILE,
        action_ids::KEYBOARD_CLICK_FILE,
        action_ids::START_DRAG_N_DROP,
        action_ids::END_DRAG_N_DROP,
        action_ids::CHANGE_SELECTION,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Notification configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Actions that never produce a notification
    #[serde(default = "default_ignored_actions")]
    pub ignored_actions: Vec<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            ignored_actions: default_ignored_actions(),
        }
    }
}

/// Decides which actions reach the notifier
#[derive(Debug, Clone)]
pub struct NotificationFilter {
    enabled: bool,
    ignored: BTreeSet<String>,
}

impl NotificationFilter {
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            enabled: config.enabled,
            ignored: config.ignored_actions.iter().cloned().collect(),
        }
    }

    pub fn allows(&self, action_id: &str) -> bool {
        self.enabled && !self.ignored.contains(action_id)
    }
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}
