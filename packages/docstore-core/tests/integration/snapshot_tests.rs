//! Snapshot persistence tests: round trips, corruption detection and
//! database identity checks.

use anyhow::Result;
use tempfile::tempdir;

use docstore_core::{Connection, DbError, Filter, Repository};

use crate::helpers::{connect, Project};

async fn populated_connection() -> Result<Connection> {
    let conn = connect();
    let repo: Repository<Project> = Repository::new(&conn);
    repo.insert_one(&Project::new("Tracker", "Ada")).await?;
    repo.insert_one(&Project::new("Billing", "Brian")).await?;
    Ok(conn)
}

#[tokio::test]
async fn test_snapshot_roundtrip_restores_documents_and_identities() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("integration.snapshot.json");

    let conn = populated_connection().await?;
    conn.save_snapshot(&path).await?;
    conn.close();

    let restored = connect();
    restored.load_snapshot(&path).await?;

    let repo: Repository<Project> = Repository::new(&restored);
    let all = repo.find(Filter::new()).await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Tracker");
    assert_eq!(all[1].title, "Billing");

    // The identity counter survives too: new inserts never reuse ids.
    let next = repo.insert_one(&Project::new("Payroll", "Grace")).await?;
    assert_eq!(next.id.map(|id| id.as_u64()), Some(3));

    let mut ids: Vec<u64> = repo
        .find(Filter::new())
        .await?
        .iter()
        .map(|p| p.id.expect("stored project carries an identity").as_u64())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_load_replaces_existing_contents() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("integration.snapshot.json");

    let conn = populated_connection().await?;
    conn.save_snapshot(&path).await?;

    let other = connect();
    let repo: Repository<Project> = Repository::new(&other);
    repo.insert_one(&Project::new("Scratch", "Nobody")).await?;

    other.load_snapshot(&path).await?;
    let titles: Vec<String> = repo
        .find(Filter::new())
        .await?
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Tracker".to_string(), "Billing".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_tampered_snapshot_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("integration.snapshot.json");

    let conn = populated_connection().await?;
    conn.save_snapshot(&path).await?;

    let contents = std::fs::read_to_string(&path)?;
    assert!(contents.contains("Tracker"));
    std::fs::write(&path, contents.replace("Tracker", "Cracker"))?;

    let err = connect().load_snapshot(&path).await.unwrap_err();
    match err {
        DbError::DataCorruption(detail) => assert!(detail.contains("checksum")),
        other => panic!("expected corruption error, got {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_snapshot_for_another_database_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("other.snapshot.json");

    let conn = populated_connection().await?;
    conn.save_snapshot(&path).await?;

    let other = Connection::connect("docstore://localhost:7878/somewhere-else")?;
    let err = other.load_snapshot(&path).await.unwrap_err();
    match err {
        DbError::SnapshotMismatch { expected, found } => {
            assert_eq!(expected, "somewhere-else");
            assert_eq!(found, "integration");
        }
        other => panic!("expected snapshot mismatch, got {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_snapshot_file_is_an_io_error() -> Result<()> {
    let dir = tempdir()?;
    let err = connect()
        .load_snapshot(dir.path().join("nothing-here.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Io(_)));
    Ok(())
}

#[tokio::test]
async fn test_snapshots_require_an_open_connection() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("integration.snapshot.json");

    let conn = populated_connection().await?;
    conn.save_snapshot(&path).await?;
    conn.close();

    assert!(matches!(
        conn.save_snapshot(&path).await.unwrap_err(),
        DbError::ConnectionClosed { .. }
    ));
    assert!(matches!(
        conn.load_snapshot(&path).await.unwrap_err(),
        DbError::ConnectionClosed { .. }
    ));
    Ok(())
}
