//! User intents emitted by the file-browser front end.

use crate::error::IntentError;
use crate::types::FileId;
use serde::{Deserialize, Serialize};

/// Action ids used by the file-browser component
pub mod action_ids {
    pub const OPEN_FILES: &str = "open_files";
    pub const DELETE_FILES: &str = "delete_files";
    pub const MOVE_FILES: &str = "move_files";
    pub const CREATE_FOLDER: &str = "create_folder";
    pub const MOUSE_CLICK_FILE: &str = "mouse_click_file";
    pub const KEYBOARD_CLICK_FILE: &str = "keyboard_click_file";
    pub const START_DRAG_N_DROP: &str = "start_drag_n_drop";
    pub const END_DRAG_N_DROP: &str = "end_drag_n_drop";
    pub const CHANGE_SELECTION: &str = "change_selection";
}

/// A user-initiated action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIntent", into = "RawIntent")]
pub enum Intent {
    OpenFiles {
        target: Option<FileId>,
        files: Vec<FileId>,
    },
    DeleteFiles {
        files: Vec<FileId>,
    },
    /// `source` is absent when the files were dragged from outside a folder
    MoveFiles {
        files: Vec<FileId>,
        source: Option<FileId>,
        destination: FileId,
    },
    CreateFolder {
        name: String,
    },
    /// Select, sort, click, drag and anything else the shell only reports
    Other {
        action_id: String,
        files: Vec<FileId>,
    },
}

impl Intent {
    pub fn action_id(&self) -> &str {
        match self {
            Intent::OpenFiles { .. } => action_ids::OPEN_FILES,
            Intent::DeleteFiles { .. } => action_ids::DELETE_FILES,
            Intent::MoveFiles { .. } => action_ids::MOVE_FILES,
            Intent::CreateFolder { .. } => action_ids::CREATE_FOLDER,
            Intent::Other { action_id, .. } => action_id,
        }
    }

    /// Files the intent refers to
    pub fn files(&self) -> &[FileId] {
        match self {
            Intent::OpenFiles { files, .. }
            | Intent::DeleteFiles { files }
            | Intent::MoveFiles { files, .. }
            | Intent::Other { files, .. } => files,
            Intent::CreateFolder { .. } => &[],
        }
    }

    /// The file an open intent acts on: the explicit target, else the first selected file
    pub fn open_target(&self) -> Option<&FileId> {
        match self {
            Intent::OpenFiles { target, files } => target.as_ref().or(files.first()),
            _ => None,
        }
    }
}

/// Flat wire form: `{"action": "move_files", "files": [...], ...}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIntent {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<FileId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<FileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<FileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TryFrom<RawIntent> for Intent {
    type Error = IntentError;

    fn try_from(raw: RawIntent) -> Result<Self, Self::Error> {
        let action = raw.action.clone();
        let missing = |field| IntentError::MissingField {
            action: action.clone(),
            field,
        };
        let intent = match action.as_str() {
            action_ids::OPEN_FILES => Intent::OpenFiles {
                target: raw.target,
                files: raw.files,
            },
            action_ids::DELETE_FILES => Intent::DeleteFiles { files: raw.files },
            action_ids::MOVE_FILES => Intent::MoveFiles {
                destination: raw.destination.ok_or_else(|| missing("destination"))?,
                files: raw.files,
                source: raw.source,
            },
            action_ids::CREATE_FOLDER => Intent::CreateFolder {
                name: raw.name.ok_or_else(|| missing("name"))?,
            },
            _ => Intent::Other {
                action_id: raw.action,
                files: raw.files,
            },
        };
        Ok(intent)
    }
}

impl From<Intent> for RawIntent {
    fn from(intent: Intent) -> Self {
        let action = intent.action_id().to_string();
        match intent {
            Intent::OpenFiles { target, files } => RawIntent {
                action,
                target,
                files,
                ..RawIntent::default()
            },
            Intent::DeleteFiles { files } | Intent::Other { files, .. } => RawIntent {
                action,
                files,
                ..RawIntent::default()
            },
            Intent::MoveFiles {
                files,
                source,
                destination,
            } => RawIntent {
                action,
                files,
                source,
                destination: Some(destination),
                ..RawIntent::default()
            },
            Intent::CreateFolder { name } => RawIntent {
                action,
                name: Some(name),
                ..RawIntent::default()
            },
        }
    }
}
