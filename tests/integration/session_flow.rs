//! End-to-end intent dispatch through a Session

use std::sync::Arc;

use filemap::shell::{
    action_ids, Effect, Intent, MemoryNotifier, NotificationConfig, NotificationFilter, Notifier,
    Session,
};
use filemap::store::{DeleteMode, FileMapStore, Seed, StoreConfig};
use filemap::FileId;

fn id(s: &str) -> FileId {
    FileId::new(s)
}

fn session_with(mode: DeleteMode, filter: NotificationFilter) -> (Session, Arc<MemoryNotifier>) {
    let store = FileMapStore::with_config(
        Seed::demo().unwrap(),
        StoreConfig {
            delete_mode: mode,
            ..StoreConfig::default()
        },
    )
    .unwrap();
    let notifier = Arc::new(MemoryNotifier::new());
    let session = Session::with_filter(store, notifier.clone() as Arc<dyn Notifier>, filter);
    (session, notifier)
}

#[test]
fn browse_create_move_and_delete() {
    let (mut session, notifier) = session_with(DeleteMode::Shallow, NotificationFilter::default());

    session
        .dispatch(Intent::OpenFiles {
            target: Some(id("documents")),
            files: vec![],
        })
        .unwrap();
    let created = match session
        .dispatch(Intent::CreateFolder {
            name: "Old reports".to_string(),
        })
        .unwrap()
        .effect
    {
        Effect::Created { folder_id } => folder_id,
        other => panic!("unexpected effect {:?}", other),
    };

    session
        .dispatch(Intent::MoveFiles {
            files: vec![id("report")],
            source: Some(id("documents")),
            destination: created.clone(),
        })
        .unwrap();
    session
        .dispatch(Intent::OpenFiles {
            target: None,
            files: vec![created.clone()],
        })
        .unwrap();

    let view = session.view();
    assert_eq!(view.breadcrumb(), "Demo Files / Documents / Old reports");
    assert_eq!(view.files.len(), 1);
    assert_eq!(view.files[0].as_ref().unwrap().name, "quarterly-report.pdf");

    session
        .dispatch(Intent::DeleteFiles {
            files: vec![id("report")],
        })
        .unwrap();
    assert!(session.view().files.is_empty());
    assert_eq!(session.current_folder_id(), &created);

    let actions: Vec<String> = notifier
        .notifications()
        .into_iter()
        .map(|n| n.action_id)
        .collect();
    assert_eq!(
        actions,
        vec![
            action_ids::CREATE_FOLDER,
            action_ids::MOVE_FILES,
            action_ids::DELETE_FILES
        ]
    );
    assert_eq!(notifier.notifications()[2].files, vec!["quarterly-report.pdf"]);
}

#[test]
fn stale_child_reference_shows_placeholder() {
    let json = r#"{
        "rootFolderId": "r",
        "fileMap": {
            "r": {"id": "r", "name": "root", "isDir": true, "childrenIds": ["a", "lost"]},
            "a": {"id": "a", "name": "a.txt", "parentId": "r"}
        }
    }"#;
    let store = FileMapStore::new(Seed::from_json(json).unwrap()).unwrap();
    let session = Session::new(store, Arc::new(MemoryNotifier::new()));
    let view = session.view();
    assert_eq!(view.files.len(), 2);
    assert!(view.files[0].is_some());
    assert!(view.files[1].is_none());
}

#[test]
fn recursive_delete_of_ancestor_returns_to_root() {
    let (mut session, _notifier) =
        session_with(DeleteMode::Recursive, NotificationFilter::default());
    session
        .dispatch(Intent::OpenFiles {
            target: Some(id("vacation")),
            files: vec![],
        })
        .unwrap();
    let outcome = session
        .dispatch(Intent::DeleteFiles {
            files: vec![id("pictures")],
        })
        .unwrap();
    assert!(outcome.returned_to_root);
    assert_eq!(session.current_folder_id(), &id("root"));
    assert!(session.map().get("beach").is_none());
}

#[test]
fn disabled_notifications_still_mutate() {
    let filter = NotificationFilter::from_config(&NotificationConfig {
        enabled: false,
        ..NotificationConfig::default()
    });
    let (mut session, notifier) = session_with(DeleteMode::Shallow, filter);
    let outcome = session
        .dispatch(Intent::DeleteFiles {
            files: vec![id("readme")],
        })
        .unwrap();
    assert!(!outcome.notified);
    assert!(notifier.notifications().is_empty());
    assert!(session.map().get("readme").is_none());
}

#[test]
fn held_map_survives_later_mutations() {
    let (mut session, _notifier) = session_with(DeleteMode::Shallow, NotificationFilter::default());
    let held = session.map();
    session
        .dispatch(Intent::DeleteFiles {
            files: vec![id("documents")],
        })
        .unwrap();
    assert!(held.contains("documents"));
    assert_eq!(*held, Seed::demo().unwrap().file_map);
}
