// Integration tests for the directory clip store

use anyhow::Result;
use qk_recorder::storage::{ClipStore, FsClipStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_ensure_root_creates_nested_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("a").join("b");
    let store = FsClipStore::new(&root);

    store.ensure_root().await?;
    store.ensure_root().await?;

    assert!(root.is_dir());
    Ok(())
}

#[tokio::test]
async fn test_list_filters_by_extension() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FsClipStore::new(temp_dir.path());

    std::fs::write(temp_dir.path().join("one.mp3"), b"x")?;
    std::fs::write(temp_dir.path().join("TWO.MP3"), b"x")?;
    std::fs::write(temp_dir.path().join("notes.txt"), b"x")?;
    std::fs::write(temp_dir.path().join("voice.wav"), b"x")?;
    std::fs::create_dir(temp_dir.path().join("folder.mp3"))?;

    let mut names: Vec<String> = store
        .list("mp3")
        .await?
        .into_iter()
        .map(|blob| blob.file_name)
        .collect();
    names.sort();

    assert_eq!(names, ["TWO.MP3", "one.mp3"]);
    Ok(())
}

#[tokio::test]
async fn test_list_missing_directory_fails() {
    let store = FsClipStore::new("/nonexistent/qk-recorder/clips");
    assert!(store.list("mp3").await.is_err());
}

#[tokio::test]
async fn test_relocate_refuses_to_overwrite() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FsClipStore::new(temp_dir.path());
    let from = store.location_for("from.mp3");
    let to = store.location_for("to.mp3");
    std::fs::write(&from, b"new")?;
    std::fs::write(&to, b"old")?;

    assert!(store.relocate(&from, &to).await.is_err());
    assert_eq!(std::fs::read(&to)?, b"old");
    assert!(store.exists(&from).await?);

    Ok(())
}

#[tokio::test]
async fn test_relocate_moves_blob() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FsClipStore::new(temp_dir.path());
    let from = store.location_for("from.mp3");
    let to = store.location_for("to.mp3");
    std::fs::write(&from, b"audio")?;

    store.relocate(&from, &to).await?;

    assert!(!store.exists(&from).await?);
    assert_eq!(std::fs::read(&to)?, b"audio");
    Ok(())
}

#[tokio::test]
async fn test_remove_missing_blob_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FsClipStore::new(temp_dir.path());

    assert!(store.remove(&store.location_for("ghost.mp3")).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_relocate_missing_source_leaves_no_target() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FsClipStore::new(temp_dir.path());
    let from = store.location_for("gone.mp3");
    let to = store.location_for("target.mp3");

    let err = store
        .relocate(&from, &to)
        .await
        .expect_err("Moving a missing file should fail");

    let io_err = err
        .downcast_ref::<std::io::Error>()
        .expect("Underlying io error is kept");
    assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
    assert!(!store.exists(&to).await?, "No copy may be left at the target");

    Ok(())
}
