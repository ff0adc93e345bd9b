//! Integration tests for uploads and signed-URL downloads

use lens_api::{LensClient, LensError};
use lens_core::domain::newtypes::UniqueFileName;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

async fn mount_signed_url(server: &MockServer, unique: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/upload/{unique}")))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": format!("{}/signed/{unique}", server.uri())
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_sends_multipart_under_unique_name() {
    let (server, mut client) = common::setup_lens_mock().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let local = dir.path().join("bracket.FCStd");
    std::fs::write(&local, b"FCStd payload").expect("write");
    let unique = UniqueFileName::for_path(&local);

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains(unique.as_str()))
        .and(body_string_contains("FCStd payload"))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": unique.as_str()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client.upload_file(&unique, &local).await.expect("upload");
    assert_eq!(response["id"], unique.as_str());
    assert!(unique.as_str().ends_with(".fcstd"));
}

#[tokio::test]
async fn test_upload_missing_file_sends_nothing() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.FCStd");
    let err = client
        .upload_file(&UniqueFileName::generate("fcstd"), &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, LensError::Io(_)), "got {err:?}");
}

#[tokio::test]
async fn test_download_follows_signed_url_without_credentials() {
    let (server, mut client) = common::setup_lens_mock().await;
    mount_signed_url(&server, "u1.fcstd").await;
    Mock::given(method("GET"))
        .and(path("/signed/u1.fcstd"))
        .and(common::no_authorization)
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"model bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("nested").join("deeper").join("part.FCStd");
    client.download_file("u1.fcstd", &dest).await.expect("download");

    assert_eq!(std::fs::read(&dest).expect("read"), b"model bytes");
}

fn dir_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_failed_download_creates_no_file() {
    let (server, mut client) = common::setup_lens_mock().await;
    mount_signed_url(&server, "u2.fcstd").await;
    Mock::given(method("GET"))
        .and(path("/signed/u2.fcstd"))
        .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("part.FCStd");
    let err = client.download_file("u2.fcstd", &dest).await.unwrap_err();

    match err {
        LensError::Request { status, .. } => assert_eq!(status, 403),
        other => panic!("expected Request, got {other:?}"),
    }
    assert!(!dest.exists());
    assert!(dir_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_failed_download_keeps_existing_local_copy() {
    let (server, mut client) = common::setup_lens_mock().await;
    mount_signed_url(&server, "u1.fcstd").await;
    Mock::given(method("GET"))
        .and(path("/signed/u1.fcstd"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("part.FCStd");
    std::fs::write(&dest, b"existing local copy").expect("write");

    let err = client.download_file("u1.fcstd", &dest).await.unwrap_err();

    assert!(matches!(err, LensError::Request { status: 403, .. }), "got {err:?}");
    assert_eq!(std::fs::read(&dest).expect("read"), b"existing local copy");
    assert_eq!(dir_names(dir.path()), vec!["part.FCStd"]);
}

#[tokio::test]
async fn test_download_replaces_existing_copy() {
    let (server, mut client) = common::setup_lens_mock().await;
    mount_signed_url(&server, "u4.fcstd").await;
    Mock::given(method("GET"))
        .and(path("/signed/u4.fcstd"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new revision".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("part.FCStd");
    std::fs::write(&dest, b"old revision, longer than the new one").expect("write");

    client.download_file("u4.fcstd", &dest).await.expect("download");

    assert_eq!(std::fs::read(&dest).expect("read"), b"new revision");
    assert_eq!(dir_names(dir.path()), vec!["part.FCStd"]);
}

#[tokio::test]
async fn test_offline_object_download_keeps_existing_copy() {
    let mut client = LensClient::with_base_url(
        common::UNREACHABLE_URL,
        common::session_credentials(common::ACCESS_TOKEN),
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("part.obj");
    std::fs::write(&dest, b"cached mesh").expect("write");

    client.get_status().await;
    let url = format!("{}/objects/part.obj", common::UNREACHABLE_URL);
    let err = client.download_object_file(&url, &dest).await.unwrap_err();

    assert!(matches!(err, LensError::Offline), "got {err:?}");
    assert_eq!(std::fs::read(&dest).expect("read"), b"cached mesh");
}

#[tokio::test]
async fn test_download_unknown_unique_name_is_not_found() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/upload/gone.fcstd"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("gone.FCStd");
    let err = client.download_file("gone.fcstd", &dest).await.unwrap_err();
    assert!(matches!(err, LensError::NotFound { .. }), "got {err:?}");
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_download_into_writer() {
    let (server, mut client) = common::setup_lens_mock().await;
    mount_signed_url(&server, "u3.step").await;
    Mock::given(method("GET"))
        .and(path("/signed/u3.step"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ISO-10303-21;".to_vec()))
        .mount(&server)
        .await;

    let mut buffer: Vec<u8> = Vec::new();
    client
        .download_file_to_writer("u3.step", &mut buffer)
        .await
        .expect("download");
    assert_eq!(buffer, b"ISO-10303-21;");
}
