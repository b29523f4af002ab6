//! CLI Tooling
//!
//! Command-line access to a seed snapshot: inspect the tree, list folders,
//! validate invariants and replay intent scripts through a session.

use crate::config::{ConfigLoader, FilemapConfig};
use crate::error::ApiError;
use crate::shell::{Intent, MemoryNotifier, NotificationFilter, Notifier, Session};
use crate::store::{FileMapStore, Seed};
use crate::types::FileId;
use crate::views::{self, FolderView};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Filemap CLI - in-memory virtual file system
#[derive(Parser)]
#[command(name = "filemap")]
#[command(about = "Browse and mutate an in-memory virtual file system")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Seed snapshot (JSON); overrides the configured seed
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold the logging flags into `config`
    pub fn apply_logging_overrides(&self, config: &mut FilemapConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the whole tree below the root
    Tree,
    /// List the contents of a folder (root by default)
    Ls {
        folder: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the ancestor chain of a folder
    Chain {
        folder: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check the seed for broken links and cycles
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Run a JSON array of intents through a session
    Replay {
        script: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// One replayed intent
#[derive(Debug, Serialize)]
struct ReplayStep {
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    effect: Option<crate::shell::Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    notifications: Vec<String>,
    current_folder: FileId,
}

/// Loaded configuration plus seed, ready to execute commands
pub struct CliContext {
    config: FilemapConfig,
    seed: Seed,
}

impl CliContext {
    /// Load configuration, then the seed it (or `seed_override`) points at
    pub fn new(seed_override: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = Self::load_config(config_path.as_deref())?;
        Self::with_config(config, seed_override)
    }

    pub fn load_config(config_path: Option<&Path>) -> Result<FilemapConfig, ApiError> {
        Ok(ConfigLoader::load(config_path)?)
    }

    pub fn with_config(config: FilemapConfig, seed_override: Option<PathBuf>) -> Result<Self, ApiError> {
        let seed = match seed_override.or_else(|| config.seed.clone()) {
            Some(path) => {
                info!(seed = %path.display(), "Loading seed");
                Seed::from_path(&path)?
            }
            None => Seed::demo()?,
        };
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &FilemapConfig {
        &self.config
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    fn store(&self) -> Result<FileMapStore, ApiError> {
        Ok(FileMapStore::with_config(
            self.seed.clone(),
            self.config.store.clone(),
        )?)
    }

    /// Execute a command and return its printable output
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree => {
                let store = self.store()?;
                Ok(views::render_tree(&store.map(), store.root_id()))
            }
            Commands::Ls { folder, format } => {
                let store = self.store()?;
                let folder_id = folder
                    .as_deref()
                    .map(FileId::from)
                    .unwrap_or_else(|| store.root_id().clone());
                let view = self.folder_view(&store, &folder_id)?;
                match format.as_str() {
                    "json" => Ok(serde_json::to_string_pretty(&view)?),
                    _ => Ok(format_listing(&view)),
                }
            }
            Commands::Chain { folder, format } => {
                let store = self.store()?;
                let view = self.folder_view(&store, &FileId::from(folder.as_str()))?;
                match format.as_str() {
                    "json" => Ok(serde_json::to_string_pretty(&view.folder_chain)?),
                    _ => Ok(view.breadcrumb()),
                }
            }
            Commands::Validate { format } => {
                let report = self.seed.validate();
                match format.as_str() {
                    "json" => Ok(serde_json::to_string_pretty(&json!({
                        "valid": report.is_valid(),
                        "records": self.seed.file_map.len(),
                        "counts": report.counts(),
                        "issues": report.issues,
                    }))?),
                    _ => {
                        if report.is_valid() {
                            return Ok(format!(
                                "Seed is valid ({} records)",
                                self.seed.file_map.len()
                            ));
                        }
                        let mut out = format!("{} issue(s) found:\n", report.issues.len());
                        for issue in &report.issues {
                            out.push_str(&format!("  - {}\n", issue));
                        }
                        Ok(out)
                    }
                }
            }
            Commands::Replay { script, format } => {
                let json = std::fs::read_to_string(script)?;
                let intents: Vec<Intent> = serde_json::from_str(&json)?;
                let steps = self.replay(intents)?;
                match format.as_str() {
                    "json" => Ok(serde_json::to_string_pretty(&steps)?),
                    _ => Ok(format_replay(&steps)),
                }
            }
        }
    }

    fn folder_view(&self, store: &FileMapStore, folder_id: &FileId) -> Result<FolderView, ApiError> {
        match store.get(folder_id.as_str()) {
            Some(record) if record.is_dir => Ok(FolderView::of(&store.map(), folder_id)),
            Some(_) => Err(crate::error::StoreError::NotADirectory(folder_id.clone()).into()),
            None => Err(crate::error::StoreError::NotFound(folder_id.clone()).into()),
        }
    }

    fn replay(&self, intents: Vec<Intent>) -> Result<Vec<ReplayStep>, ApiError> {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut session = Session::with_filter(
            self.store()?,
            notifier.clone() as Arc<dyn Notifier>,
            NotificationFilter::from_config(&self.config.notifications),
        );

        let mut steps = Vec::with_capacity(intents.len());
        for intent in intents {
            let action = intent.action_id().to_string();
            let (effect, error) = match session.dispatch(intent) {
                Ok(outcome) => (Some(outcome.effect), None),
                Err(err) => (None, Some(err.to_string())),
            };
            steps.push(ReplayStep {
                action,
                effect,
                error,
                notifications: notifier.drain().iter().map(|n| n.text()).collect(),
                current_folder: session.current_folder_id().clone(),
            });
        }
        info!(steps = steps.len(), "Replay finished");
        Ok(steps)
    }
}

fn format_listing(view: &FolderView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Name", "Type", "Size"]);
    for file in &view.files {
        match file {
            Some(record) => table.add_row(vec![
                record.id.to_string(),
                record.name.clone(),
                if record.is_dir { "dir" } else { "file" }.to_string(),
                record
                    .attributes
                    .size
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]),
            None => table.add_row(vec!["?", "(missing)", "-", "-"]),
        };
    }
    format!("{}\n{}", view.breadcrumb(), table)
}

fn format_replay(steps: &[ReplayStep]) -> String {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        let status = match (&step.effect, &step.error) {
            (_, Some(error)) => format!("error: {}", error),
            (Some(effect), None) => format!("{:?}", effect),
            (None, None) => "-".to_string(),
        };
        out.push_str(&format!(
            "[{}] {} -> {} (in {})\n",
            i + 1,
            step.action,
            status,
            step.current_folder
        ));
        for text in &step.notifications {
            for line in text.lines() {
                out.push_str(&format!("    {}\n", line));
            }
        }
    }
    out
}
