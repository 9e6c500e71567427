//! Tests for template source classification.

use super::*;

#[test]
fn https_urls_become_remote_feeds() {
    let source = parse_source("https://feed.example.com/v3/index.json").unwrap();
    assert!(matches!(source, TemplateSource::RemoteFeed(_)));
}

#[test]
fn http_urls_become_remote_feeds() {
    let source = parse_source("http://localhost:5000/v3/index.json").unwrap();
    assert!(matches!(source, TemplateSource::RemoteFeed(_)));
}

#[test]
fn rooted_paths_become_local_directories() {
    let source = parse_source("/srv/template-packages").unwrap();
    assert_eq!(
        source,
        TemplateSource::LocalDirectory(std::path::PathBuf::from("/srv/template-packages"))
    );
}

#[test]
fn existing_relative_directories_become_local_sources() {
    let dir = tempfile::tempdir().unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    std::fs::create_dir("packages").unwrap();

    let source = parse_source("packages").unwrap();

    std::env::set_current_dir(previous).unwrap();
    assert!(matches!(source, TemplateSource::LocalDirectory(_)));
}

#[test]
fn unusable_strings_are_rejected() {
    let error = parse_source("ftp://feed.example.com").unwrap_err();
    assert!(matches!(error, ProvisioningError::InvalidSource { .. }));

    let error = parse_source("no-such-relative-dir").unwrap_err();
    assert!(matches!(error, ProvisioningError::InvalidSource { .. }));
}

#[test]
fn empty_configuration_falls_back_to_the_default_feed() {
    let sources = default_sources(&[]).unwrap();
    assert_eq!(sources.len(), 1);
    let TemplateSource::RemoteFeed(url) = &sources[0] else {
        panic!("expected the default remote feed");
    };
    assert_eq!(url.as_str(), DEFAULT_FEED_ROOT);
}

#[test]
fn configured_sources_preserve_order() {
    let sources = default_sources(&[
        "https://feed.example.com/v3/index.json".to_string(),
        "/srv/template-packages".to_string(),
    ])
    .unwrap();
    assert_eq!(sources.len(), 2);
    assert!(matches!(sources[0], TemplateSource::RemoteFeed(_)));
    assert!(matches!(sources[1], TemplateSource::LocalDirectory(_)));
}
