//! Browsing session: the current folder pointer plus intent dispatch.

use super::intent::Intent;
use super::notify::{ActionNotification, NotificationFilter, Notifier};
use crate::error::StoreError;
use crate::store::{DeleteReport, FileMap, FileMapStore};
use crate::types::FileId;
use crate::views::{self, FolderView};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// State change caused by one intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// The current folder changed
    Navigated { folder_id: FileId },
    Created { folder_id: FileId },
    Deleted { report: DeleteReport },
    Moved { count: usize, destination: FileId },
    /// Nothing changed; the intent was only reported
    Forwarded,
}

/// Result of `Session::dispatch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub effect: Effect,
    pub notified: bool,
    /// Set when the current folder vanished and the session went back to the root
    pub returned_to_root: bool,
}

/// The presentation shell: owns the store and the current folder.
pub struct Session {
    store: FileMapStore,
    current_folder_id: FileId,
    notifier: Arc<dyn Notifier>,
    filter: NotificationFilter,
}

impl Session {
    pub fn new(store: FileMapStore, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_filter(store, notifier, NotificationFilter::default())
    }

    pub fn with_filter(
        store: FileMapStore,
        notifier: Arc<dyn Notifier>,
        filter: NotificationFilter,
    ) -> Self {
        Self {
            current_folder_id: store.root_id().clone(),
            store,
            notifier,
            filter,
        }
    }

    pub fn store(&self) -> &FileMapStore {
        &self.store
    }

    pub fn map(&self) -> Arc<FileMap> {
        self.store.map()
    }

    pub fn current_folder_id(&self) -> &FileId {
        &self.current_folder_id
    }

    /// Children and ancestor chain of the current folder
    pub fn view(&self) -> FolderView {
        FolderView::of(&self.store.map(), &self.current_folder_id)
    }

    /// Back to the seed map, looking at the root
    pub fn reset(&mut self) {
        self.store.reset();
        self.current_folder_id = self.store.root_id().clone();
        info!(root = %self.current_folder_id, "Session reset");
    }

    /// Apply one intent.
    ///
    /// Opening a folder changes the current folder and is not reported. Every
    /// other intent is passed to the notifier, failed mutations included.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome, StoreError> {
        debug!(action = intent.action_id(), current = %self.current_folder_id, "Dispatching intent");
        let notification = self.describe(&intent);
        let result = self.apply(&intent);

        let notified = match &result {
            Ok(Effect::Navigated { .. }) => false,
            Ok(_) => self.notify(&notification),
            Err(err) => self.notify(&notification.clone().failed(err.to_string())),
        };
        let effect = result?;
        let returned_to_root = self.ensure_current_folder();

        Ok(Outcome {
            effect,
            notified,
            returned_to_root,
        })
    }

    fn apply(&mut self, intent: &Intent) -> Result<Effect, StoreError> {
        match intent {
            Intent::OpenFiles { .. } => {
                let Some(target) = intent.open_target() else {
                    return Ok(Effect::Forwarded);
                };
                match self.store.get(target.as_str()) {
                    Some(record) if record.is_dir => {
                        self.current_folder_id = record.id.clone();
                        Ok(Effect::Navigated {
                            folder_id: record.id.clone(),
                        })
                    }
                    _ => Ok(Effect::Forwarded),
                }
            }
            Intent::DeleteFiles { files } => {
                let report = self.store.delete_files(files)?;
                Ok(Effect::Deleted { report })
            }
            Intent::MoveFiles {
                files,
                source,
                destination,
            } => {
                let source = match source {
                    Some(source) => source.clone(),
                    None => self.source_of(files)?,
                };
                self.store.move_files(files, &source, destination)?;
                let distinct: BTreeSet<&FileId> = files.iter().collect();
                Ok(Effect::Moved {
                    count: distinct.len(),
                    destination: destination.clone(),
                })
            }
            Intent::CreateFolder { name } => {
                let parent = self.current_folder_id.clone();
                let folder_id = self.store.create_folder(&parent, name)?;
                Ok(Effect::Created { folder_id })
            }
            Intent::Other { .. } => Ok(Effect::Forwarded),
        }
    }

    /// Parent of the first moved file, for moves that name no source.
    /// An empty selection moves out of the current folder.
    fn source_of(&self, files: &[FileId]) -> Result<FileId, StoreError> {
        let Some(first) = files.first() else {
            return Ok(self.current_folder_id.clone());
        };
        let record = self
            .store
            .get(first.as_str())
            .ok_or_else(|| StoreError::NotFound(first.clone()))?;
        record
            .parent_id
            .clone()
            .ok_or_else(|| StoreError::NotFound(first.clone()))
    }

    /// Resolve ids to names against the map as it is before the intent runs
    fn describe(&self, intent: &Intent) -> ActionNotification {
        let map = self.store.map();
        let name_of = |id: &FileId| {
            map.get(id.as_str())
                .map(|record| record.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        let mut notification = ActionNotification::new(intent.action_id());
        notification.files = intent.files().iter().map(&name_of).collect();
        match intent {
            Intent::OpenFiles { target, .. } => {
                notification.target = target.as_ref().map(&name_of);
            }
            Intent::MoveFiles {
                source,
                destination,
                ..
            } => {
                notification.source = source.as_ref().map(&name_of);
                notification.destination = Some(name_of(destination));
            }
            Intent::CreateFolder { name } => {
                notification.target = Some(name.clone());
                notification.destination = Some(name_of(&self.current_folder_id));
            }
            Intent::DeleteFiles { .. } | Intent::Other { .. } => {}
        }
        notification
    }

    fn notify(&self, notification: &ActionNotification) -> bool {
        if !self.filter.allows(&notification.action_id) {
            return false;
        }
        self.notifier.notify(notification);
        true
    }

    /// Fall back to the root when the current folder is gone or cut off
    fn ensure_current_folder(&mut self) -> bool {
        let map = self.store.map();
        let root_id = self.store.root_id();
        let usable = map
            .get(self.current_folder_id.as_str())
            .map(|record| record.is_dir)
            .unwrap_or(false)
            && views::is_reachable(&map, root_id, &self.current_folder_id);
        if usable {
            return false;
        }
        info!(
            folder = %self.current_folder_id,
            root = %root_id,
            "Current folder no longer reachable, returning to root"
        );
        self.current_folder_id = root_id.clone();
        true
    }
}
