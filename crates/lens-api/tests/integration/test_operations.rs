//! Integration tests for domain operations against a mocked Lens API

use lens_api::organizations::PreferenceFile;
use lens_api::{LensError, Params};
use lens_core::domain::newtypes::UniqueFileName;
use lens_core::domain::records::{Directory, DirectoryRef, WorkspaceRef};
use lens_core::domain::share_link::ShareLink;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_get_models_sends_defaults_and_filter() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("$limit", "50"))
        .and(query_param("$skip", "0"))
        .and(query_param("isSharedModel", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([
            {"_id": "m1", "custFileName": "a.FCStd", "uniqueFileName": "u1.fcstd", "updatedAt": 1000},
            {"_id": "m2", "custFileName": "b.FCStd", "uniqueFileName": "u2.fcstd", "updatedAt": 2000}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let models = client.get_models(Params::new()).await.expect("models");
    let names: Vec<_> = models.iter().map(|m| m.cust_file_name.as_str()).collect();
    assert_eq!(names, vec!["a.FCStd", "b.FCStd"]);
}

#[tokio::test]
async fn test_caller_limit_overrides_default() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .and(query_param("$limit", "5"))
        .and(query_param("$skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client
        .get_workspaces(Params::new().with("$limit", 5))
        .await
        .expect("workspaces");
}

#[tokio::test]
async fn test_get_files_excludes_system_generated() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/file"))
        .and(query_param("isSystemGenerated", "false"))
        .and(query_param("directory._id", "d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([
            {"_id": "f1", "custFileName": "part.FCStd"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let files = client
        .get_files(Params::new().with("directory._id", "d1"))
        .await
        .expect("files");
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_public_gallery_query() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/shared-models"))
        .and(query_param("$limit", "25"))
        .and(query_param("$skip", "0"))
        .and(query_param("$sort[createdAt]", "-1"))
        .and(query_param("protection", "Listed"))
        .and(query_param("isActive", "true"))
        .and(query_param("isThumbnailGenerated", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([
            {"_id": "s1", "title": "Planetary gear", "protection": "Listed"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let links = client.get_public_share_links().await.expect("gallery");
    assert_eq!(links[0].title, "Planetary gear");
}

#[tokio::test]
async fn test_share_links_drop_empty_pin_filter() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/shared-models"))
        .and(|request: &wiremock::Request| {
            !request.url.query_pairs().any(|(key, _)| key == "pin")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client
        .get_share_links(Params::new().with("pin", ""))
        .await
        .expect("share links");
}

#[tokio::test]
async fn test_search_text_is_encoded_twice() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/keywords"))
        .and(query_param("text", "gear+box"))
        .and(query_param("target", "shared-models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([
            {
                "_id": "k1",
                "sortedMatches": [
                    {"score": 2, "curation": {"_id": "c1", "collectionName": "shared-models", "name": "Gear box"}},
                    {"score": 1, "curation": {"_id": "c2", "collectionName": "shared-models", "name": "Box"}}
                ]
            }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let results = client
        .get_search_results("gear box", Some("shared-models"))
        .await
        .expect("search");
    let names: Vec<_> = results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Gear box", "Box"]);
}

#[tokio::test]
async fn test_search_without_keyword_match_is_empty() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/keywords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([]))))
        .mount(&server)
        .await;

    let results = client.get_search_results("zzz", None).await.expect("search");
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_default_organization_missing_is_not_found() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(query_param("type", "Ondsel"))
        .and(query_param("publicInfo", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_default_organization().await.unwrap_err();
    assert!(matches!(err, LensError::NotFound { .. }), "got {err:?}");
}

fn preference_files() -> (PreferenceFile, PreferenceFile) {
    (
        PreferenceFile {
            file_name: "user.cfg".to_string(),
            unique_name: UniqueFileName::new("u-user.cfg".to_string()).expect("valid name"),
        },
        PreferenceFile {
            file_name: "system.cfg".to_string(),
            unique_name: UniqueFileName::new("u-system.cfg".to_string()).expect("valid name"),
        },
    )
}

#[tokio::test]
async fn test_upload_prefs_commits_new_version_when_present() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/organizations/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "o1",
            "name": "Acme",
            "preferencesId": "p1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/preferences/p1"))
        .and(body_partial_json(json!({
            "shouldCommitNewVersion": true,
            "version": {"files": [
                {"fileName": "user.cfg", "uniqueFileName": "u-user.cfg",
                 "additionalData": {"message": "Update preferences"}},
                {"fileName": "system.cfg", "uniqueFileName": "u-system.cfg"}
            ]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "p1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/preferences"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let (user, system) = preference_files();
    let result = client.upload_prefs("o1", &user, &system).await.expect("upload");
    assert_eq!(result["_id"], "p1");
}

#[tokio::test]
async fn test_upload_prefs_creates_when_absent() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/organizations/o2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "o2",
            "name": "Fresh"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/preferences"))
        .and(body_partial_json(json!({
            "organizationId": "o2",
            "version": {"files": [
                {"additionalData": {"message": "Initial commit preferences"}},
                {"fileName": "system.cfg"}
            ]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "p2"})))
        .expect(1)
        .mount(&server)
        .await;

    let (user, system) = preference_files();
    let result = client.upload_prefs("o2", &user, &system).await.expect("upload");
    assert_eq!(result["_id"], "p2");
}

#[tokio::test]
async fn test_download_prefs_without_id_sends_nothing() {
    let (server, mut client) = common::setup_lens_mock().await;

    assert!(client.download_prefs(None).await.expect("prefs").is_none());
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

fn parent_directory() -> Directory {
    Directory {
        id: "d-root".to_string(),
        name: "/".to_string(),
        directories: vec![DirectoryRef {
            id: "d-old".to_string(),
            name: "old".to_string(),
        }],
        ..Default::default()
    }
}

fn workspace_ref() -> WorkspaceRef {
    WorkspaceRef {
        id: "w1".to_string(),
        name: "Default".to_string(),
        ref_name: None,
    }
}

#[tokio::test]
async fn test_create_subdirectory_attaches_to_parent() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("POST"))
        .and(path("/directories"))
        .and(body_partial_json(json!({
            "name": "fixtures",
            "parentDirectory": {"_id": "d-root", "name": "/"},
            "workspace": {"_id": "w1", "name": "Default"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "d-new",
            "name": "fixtures"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/directories/d-root"))
        .and(body_json(json!({"directories": ["d-old", "d-new"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "d-root",
            "name": "/"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_subdirectory("fixtures", &parent_directory(), &workspace_ref())
        .await
        .expect("subdirectory");
    assert_eq!(created.id, "d-new");
}

#[tokio::test]
async fn test_create_subdirectory_attach_failure_propagates() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("POST"))
        .and(path("/directories"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "d-new",
            "name": "fixtures"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/directories/d-root"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .create_subdirectory("fixtures", &parent_directory(), &workspace_ref())
        .await
        .unwrap_err();
    match err {
        LensError::Request { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_share_link_strips_refused_fields() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("PATCH"))
        .and(path("/shared-models/s1"))
        .and(|request: &wiremock::Request| {
            let body: serde_json::Value = match serde_json::from_slice(&request.body) {
                Ok(body) => body,
                Err(_) => return false,
            };
            body.get("pin").is_none()
                && body.get("isSystemGenerated").is_none()
                && body["title"] == "Renamed"
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "s1",
            "title": "Renamed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link: ShareLink = serde_json::from_value(json!({
        "_id": "s1",
        "title": "Renamed",
        "pin": "",
        "isSystemGenerated": false
    }))
    .expect("share link");
    let updated = client.update_share_link(&link).await.expect("update");
    assert_eq!(updated.title, "Renamed");
}

#[tokio::test]
async fn test_delete_returns_deleted_record() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/models/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "m1",
            "custFileName": "old.FCStd"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = client.delete_model("m1").await.expect("delete");
    assert_eq!(deleted.cust_file_name, "old.FCStd");
}

#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let (server, mut client) = common::setup_lens_mock().await;
    Mock::given(method("GET"))
        .and(path("/models/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.get_model("m1").await.unwrap_err();
    assert!(matches!(err, LensError::InvalidResponse(_)), "got {err:?}");
}
