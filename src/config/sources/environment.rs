//! Environment variable source: FILEMAP_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

const PREFIX: &str = "FILEMAP";

/// Keys that take a comma separated list
const LIST_KEYS: &[&str] = &["notifications.ignored_actions"];

/// `FILEMAP__STORE__DELETE_MODE=recursive` sets `store.delete_mode`,
/// `FILEMAP__NOTIFICATIONS__IGNORED_ACTIONS=open_files,move_files` replaces
/// the ignore list and `FILEMAP__SEED=/path/seed.json` picks the seed.
fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(PREFIX)
            .separator("__")
            .list_separator(",")
            .try_parsing(true),
        |env, key| env.with_list_parse_key(key),
    )
}

/// Add environment variable overlay to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(environment()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, Map};

    fn overlay(vars: &[(&str, &str)]) -> Config {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_nested_keys_map_to_sections() {
        let config = overlay(&[("FILEMAP__STORE__DELETE_MODE", "recursive")]);
        assert_eq!(config.get_string("store.delete_mode").unwrap(), "recursive");
    }

    #[test]
    fn test_ignored_actions_parse_as_list() {
        let config = overlay(&[(
            "FILEMAP__NOTIFICATIONS__IGNORED_ACTIONS",
            "open_files,move_files",
        )]);
        let ignored: Vec<String> = config.get("notifications.ignored_actions").unwrap();
        assert_eq!(ignored, vec!["open_files", "move_files"]);
    }

    #[test]
    fn test_unprefixed_vars_are_ignored() {
        let config = overlay(&[("STORE__DELETE_MODE", "recursive")]);
        assert!(config.get_string("store.delete_mode").is_err());
    }
}
