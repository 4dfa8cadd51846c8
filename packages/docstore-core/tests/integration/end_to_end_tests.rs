//! Full-stack tests: typed repository operations, raw collection
//! access and connection lifecycle behavior together.

use std::collections::HashSet;

use serde_json::json;

use docstore_core::{DbError, Document, Filter, Model, Patch, Repository};

use crate::helpers::{connect, Project};

#[tokio::test]
async fn test_full_crud_lifecycle() {
    let conn = connect();
    let repo: Repository<Project> = Repository::new(&conn);

    let tracker = repo
        .insert_one(&Project::new("Tracker", "Ada"))
        .await
        .unwrap();
    repo.insert_one(&Project::new("Billing", "Brian"))
        .await
        .unwrap();

    let all = repo.find(Filter::new()).await.unwrap();
    assert_eq!(all.len(), 2);

    let found = repo
        .find_one(Filter::new().eq("owner", "Ada"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, tracker);

    let updated = repo
        .update_one(
            Filter::new().eq("title", "Billing"),
            Patch::new().set("owner", "Grace"),
        )
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert!(repo
        .find_one(Filter::new().eq("owner", "Brian"))
        .await
        .unwrap()
        .is_none());

    let renamed = Project {
        title: "Issue tracker".to_string(),
        ..tracker.clone()
    };
    let saved = repo.save(&renamed).await.unwrap();
    assert_eq!(saved.id, tracker.id);
    assert_eq!(repo.count(Filter::new()).await.unwrap(), 2);

    assert_eq!(
        repo.delete_one(Filter::new().eq("owner", "Grace"))
            .await
            .unwrap(),
        1
    );
    assert_eq!(repo.delete_many(Filter::new()).await.unwrap(), 1);
    assert!(repo.find(Filter::new()).await.unwrap().is_empty());

    conn.close();
}

#[tokio::test]
async fn test_typed_and_raw_access_share_documents() {
    let conn = connect();
    let repo: Repository<Project> = Repository::new(&conn);

    let stored = repo
        .insert_one(&Project::new("Tracker", "Ada"))
        .await
        .unwrap();

    let raw = conn
        .collection(Project::COLLECTION)
        .find_one(&Filter::by_id(stored.id.unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw["title"], json!("Tracker"));
    assert_eq!(raw["owner"], json!("Ada"));

    let mut doc = Document::new();
    doc.insert("title".to_string(), json!("Payroll"));
    doc.insert("owner".to_string(), json!("Grace"));
    conn.collection(Project::COLLECTION).insert(doc).await.unwrap();

    let hydrated = repo
        .find_one(Filter::new().eq("title", "Payroll"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hydrated.owner, "Grace");
}

#[tokio::test]
async fn test_concurrent_inserts_get_unique_identities() {
    let conn = connect();

    let mut handles = Vec::new();
    for worker in 0..8 {
        let conn = conn.clone();
        handles.push(tokio::spawn(async move {
            let repo: Repository<Project> = Repository::new(&conn);
            let mut ids = Vec::new();
            for item in 0..5 {
                let title = format!("Project {worker}-{item}");
                let stored = repo.insert_one(&Project::new(&title, "Ada")).await.unwrap();
                ids.push(stored.id.unwrap().as_u64());
            }
            ids
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(seen.insert(id), "identity {id} assigned twice");
        }
    }
    assert_eq!(seen.len(), 40);

    let repo: Repository<Project> = Repository::new(&conn);
    assert_eq!(repo.count(Filter::new()).await.unwrap(), 40);
}

#[tokio::test]
async fn test_validation_reports_every_field_through_repository() {
    let conn = connect();
    let repo: Repository<Project> = Repository::new(&conn);

    let err = repo.insert_one(&Project::new("", "")).await.unwrap_err();
    match err {
        DbError::Validation(err) => {
            assert_eq!(err.len(), 2);
            assert!(err.contains("title"));
            assert!(err.contains("owner"));
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert_eq!(repo.count(Filter::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_closed_connection_rejects_repository_operations() {
    let conn = connect();
    let repo: Repository<Project> = Repository::new(&conn);
    let stored = repo
        .insert_one(&Project::new("Tracker", "Ada"))
        .await
        .unwrap();

    conn.close();

    assert!(matches!(
        repo.find(Filter::new()).await.unwrap_err(),
        DbError::ConnectionClosed { .. }
    ));
    assert!(matches!(
        repo.insert_one(&Project::new("Billing", "Brian"))
            .await
            .unwrap_err(),
        DbError::ConnectionClosed { .. }
    ));
    assert!(matches!(
        repo.save(&stored).await.unwrap_err(),
        DbError::ConnectionClosed { .. }
    ));
    assert!(matches!(
        repo.remove(&stored).await.unwrap_err(),
        DbError::ConnectionClosed { .. }
    ));
    assert!(matches!(
        repo.delete_many(Filter::new()).await.unwrap_err(),
        DbError::ConnectionClosed { .. }
    ));
}
