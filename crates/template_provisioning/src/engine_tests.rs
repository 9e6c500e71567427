//! Tests for the provisioning engine over local sources.

use super::*;
use crate::extraction::PACKAGE_MANIFEST_NAME;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_package(
    directory: &Path,
    file_name: &str,
    id: &str,
    version: &str,
    tags: &[&str],
) -> PathBuf {
    let manifest = serde_json::json!({
        "id": id,
        "version": version,
        "title": id,
        "description": format!("{} template package", id),
        "tags": tags,
    });
    let path = directory.join(file_name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    writer.start_file(PACKAGE_MANIFEST_NAME, options).unwrap();
    writer
        .write_all(manifest.to_string().as_bytes())
        .unwrap();
    writer
        .start_file("content/.devcontainer/devcontainer.json", options)
        .unwrap();
    writer.write_all(b"{\"name\": \"sample\"}").unwrap();
    writer.finish().unwrap();
    path
}

fn local_engine(directory: &Path) -> TemplateProvisioner {
    TemplateProvisioner::new(vec![TemplateSource::LocalDirectory(
        directory.to_path_buf(),
    )])
}

#[tokio::test]
async fn discover_reports_local_packages_matching_the_tag() {
    let dir = tempfile::tempdir().unwrap();
    write_package(
        dir.path(),
        "rust.1.0.0.nupkg",
        "sample.rust",
        "1.0.0",
        &["devcontainer", "rust"],
    );
    write_package(
        dir.path(),
        "plain.1.0.0.nupkg",
        "sample.plain",
        "1.0.0",
        &["unrelated"],
    );

    let engine = local_engine(dir.path());
    let cancel = CancellationToken::new();
    let packages = engine
        .discover("devcontainer", None, 10, &cancel)
        .await
        .unwrap();

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].id, "sample.rust");
}

#[tokio::test]
async fn discover_dedups_across_sources_keeping_the_highest_version() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_package(
        first.path(),
        "old.nupkg",
        "sample.rust",
        "1.0.0",
        &["devcontainer"],
    );
    write_package(
        second.path(),
        "new.nupkg",
        "sample.rust",
        "2.0.0",
        &["devcontainer"],
    );

    let engine = TemplateProvisioner::new(vec![
        TemplateSource::LocalDirectory(first.path().to_path_buf()),
        TemplateSource::LocalDirectory(second.path().to_path_buf()),
    ]);
    let cancel = CancellationToken::new();
    let packages = engine
        .discover("devcontainer", None, 10, &cancel)
        .await
        .unwrap();

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].version, "2.0.0");
}

#[tokio::test]
async fn discover_skips_a_missing_source_and_keeps_going() {
    let present = tempfile::tempdir().unwrap();
    write_package(
        present.path(),
        "pkg.nupkg",
        "sample.rust",
        "1.0.0",
        &["devcontainer"],
    );

    let engine = TemplateProvisioner::new(vec![
        TemplateSource::LocalDirectory(PathBuf::from("/nonexistent/feed")),
        TemplateSource::LocalDirectory(present.path().to_path_buf()),
    ]);
    let cancel = CancellationToken::new();
    let packages = engine
        .discover("devcontainer", None, 10, &cancel)
        .await
        .unwrap();

    assert_eq!(packages.len(), 1);
}

#[tokio::test]
async fn discover_surfaces_cancellation() {
    let dir = tempfile::tempdir().unwrap();
    let engine = local_engine(dir.path());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = engine.discover("devcontainer", None, 10, &cancel).await;
    assert!(matches!(result, Err(ProvisioningError::Canceled)));
}

#[tokio::test]
async fn extract_writes_content_from_a_matching_local_package() {
    let feed = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_package(
        feed.path(),
        "pkg.nupkg",
        "sample.rust",
        "1.0.0",
        &["devcontainer"],
    );

    let engine = local_engine(feed.path());
    let cancel = CancellationToken::new();
    let result = engine
        .extract("sample.rust", "1.0.0", out.path(), &cancel)
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.written_files.len(), 1);
    assert!(out.path().join(".devcontainer/devcontainer.json").exists());
    assert!(result.error_message.is_none());
}

#[tokio::test]
async fn extract_matches_package_ids_case_insensitively() {
    let feed = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_package(
        feed.path(),
        "pkg.nupkg",
        "Sample.Rust",
        "1.0.0",
        &["devcontainer"],
    );

    let engine = local_engine(feed.path());
    let cancel = CancellationToken::new();
    let result = engine
        .extract("sample.rust", "1.0.0", out.path(), &cancel)
        .await
        .unwrap();

    assert!(result.success);
}

#[tokio::test]
async fn extract_falls_through_to_the_next_source() {
    let empty = tempfile::tempdir().unwrap();
    let feed = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_package(
        feed.path(),
        "pkg.nupkg",
        "sample.rust",
        "1.0.0",
        &["devcontainer"],
    );

    let engine = TemplateProvisioner::new(vec![
        TemplateSource::LocalDirectory(empty.path().to_path_buf()),
        TemplateSource::LocalDirectory(feed.path().to_path_buf()),
    ]);
    let cancel = CancellationToken::new();
    let result = engine
        .extract("sample.rust", "1.0.0", out.path(), &cancel)
        .await
        .unwrap();

    assert!(result.success);
}

#[tokio::test]
async fn extract_reports_failure_when_no_source_has_the_package() {
    let feed = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_package(
        feed.path(),
        "pkg.nupkg",
        "sample.rust",
        "1.0.0",
        &["devcontainer"],
    );

    let engine = local_engine(feed.path());
    let cancel = CancellationToken::new();
    let result = engine
        .extract("sample.rust", "9.9.9", out.path(), &cancel)
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.written_files.is_empty());
    let message = result.error_message.unwrap();
    assert!(message.contains("sample.rust"));
    assert!(message.contains("9.9.9"));
}

#[tokio::test]
async fn extract_surfaces_cancellation() {
    let feed = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let engine = local_engine(feed.path());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = engine.extract("sample.rust", "1.0.0", out.path(), &cancel).await;
    assert!(matches!(result, Err(ProvisioningError::Canceled)));
}

#[tokio::test]
async fn validate_sources_accepts_existing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let engine = local_engine(dir.path());
    let cancel = CancellationToken::new();

    let validation = engine.validate_sources(&cancel).await.unwrap();
    assert!(validation.is_valid());
    assert_eq!(validation.valid.len(), 1);
}

#[tokio::test]
async fn validate_sources_flags_a_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let engine = TemplateProvisioner::new(vec![
        TemplateSource::LocalDirectory(dir.path().to_path_buf()),
        TemplateSource::LocalDirectory(PathBuf::from("/nonexistent/feed")),
    ]);
    let cancel = CancellationToken::new();

    let validation = engine.validate_sources(&cancel).await.unwrap();
    assert!(!validation.is_valid());
    assert_eq!(validation.valid.len(), 1);
    assert_eq!(validation.invalid.len(), 1);
}

#[test]
fn from_configured_defaults_to_the_public_feed() {
    let engine = TemplateProvisioner::from_configured(&[]).unwrap();
    assert_eq!(engine.sources().len(), 1);
    assert!(matches!(
        engine.sources()[0],
        TemplateSource::RemoteFeed(_)
    ));
}
