//! Seed and configuration files loaded through the CLI context

use std::fs;

use filemap::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

const SMALL_SEED: &str = r#"{
    "rootFolderId": "home",
    "fileMap": {
        "home": {"id": "home", "name": "home", "isDir": true, "childrenIds": ["src"], "childrenCount": 1},
        "src": {"id": "src", "name": "src", "isDir": true, "parentId": "home", "childrenIds": ["main"], "childrenCount": 1},
        "main": {"id": "main", "name": "main.rs", "size": 120, "parentId": "src"}
    }
}"#;

#[test]
fn seed_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let seed_path = temp_dir.path().join("seed.json");
    fs::write(&seed_path, SMALL_SEED).unwrap();
    let config_path = temp_dir.path().join("filemap.toml");
    fs::write(
        &config_path,
        format!("seed = {:?}\n", seed_path.to_string_lossy()),
    )
    .unwrap();

    let ctx = CliContext::new(None, Some(config_path)).unwrap();
    assert_eq!(ctx.seed().root_folder_id.as_str(), "home");
    let tree = ctx.execute(&Commands::Tree).unwrap();
    assert_eq!(tree, "home/\n  src/\n    main.rs\n");
}

#[test]
fn seed_override_wins_over_config() {
    let temp_dir = TempDir::new().unwrap();
    let seed_path = temp_dir.path().join("seed.json");
    fs::write(&seed_path, SMALL_SEED).unwrap();

    let config = CliContext::load_config(None).unwrap();
    let ctx = CliContext::with_config(config, Some(seed_path)).unwrap();
    let listing = ctx
        .execute(&Commands::Ls {
            folder: Some("src".to_string()),
            format: "text".to_string(),
        })
        .unwrap();
    assert!(listing.starts_with("home / src\n"));
    assert!(listing.contains("main.rs"));
    assert!(listing.contains("120"));
}

#[test]
fn validate_reports_broken_seed() {
    let temp_dir = TempDir::new().unwrap();
    let seed_path = temp_dir.path().join("broken.json");
    fs::write(
        &seed_path,
        r#"{
            "rootFolderId": "r",
            "fileMap": {
                "r": {"id": "r", "name": "r", "isDir": true, "childrenIds": ["gone"]},
                "x": {"id": "x", "name": "x", "parentId": "r"}
            }
        }"#,
    )
    .unwrap();

    let ctx = CliContext::with_config(Default::default(), Some(seed_path)).unwrap();
    let output = ctx
        .execute(&Commands::Validate {
            format: "json".to_string(),
        })
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["counts"]["dangling_child"], 1);
    assert_eq!(report["counts"]["not_listed_by_parent"], 1);
}

#[test]
fn malformed_seed_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let seed_path = temp_dir.path().join("bad.json");
    fs::write(&seed_path, "not json").unwrap();
    let err = CliContext::with_config(Default::default(), Some(seed_path))
        .err()
        .unwrap();
    assert!(err.to_string().contains("Malformed seed data"));
}
