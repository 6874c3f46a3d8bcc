//! End-to-end tests for the animals API over an in-process store.

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use animal_registry::config::RegistryConfig;
use animal_registry::state::AppState;
use animal_registry::store::MemoryStore;

fn test_server(uploads: &TempDir) -> TestServer {
    let mut config = RegistryConfig::default();
    config.uploads.directory = uploads.path().to_path_buf();

    let state = AppState::new(config, Arc::new(MemoryStore::new())).unwrap();
    TestServer::new(animal_registry::router(state)).unwrap()
}

fn lion() -> Value {
    json!({
        "name": "Lion",
        "description": "The king of animals",
        "animalClassification": "Feline",
    })
}

#[tokio::test]
async fn test_empty_store_lists_empty_array() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let response = server.get("/animals/").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_create_then_list() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let created = server.post("/animals/").json(&lion()).await;
    created.assert_status(axum::http::StatusCode::CREATED);

    let record = created.json::<Value>();
    assert_eq!(record["name"], "Lion");
    assert_eq!(record["description"], "The king of animals");
    assert_eq!(record["animalClassification"], "Feline");
    assert_eq!(record["imageUrl"], "/uploads/default.png");
    assert!(!record["id"].as_str().unwrap().is_empty());
    assert!(!record["timestamp"].as_str().unwrap().is_empty());

    let listed = server.get("/animals/").await.json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], record);
}

#[tokio::test]
async fn test_routes_work_without_trailing_slash() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    server
        .post("/animals")
        .json(&lion())
        .await
        .assert_status(axum::http::StatusCode::CREATED);
    let listed = server.get("/animals").await.json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_duplicate_name_differs_only_by_case() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    server
        .post("/animals/")
        .json(&lion())
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let mut shouting = lion();
    shouting["name"] = json!("LION");
    let conflict = server.post("/animals/").json(&shouting).await;
    conflict.assert_status(axum::http::StatusCode::CONFLICT);
    assert_eq!(
        conflict.json::<Value>()["message"],
        "'LION' already exists."
    );

    // Exactly one record survives
    let listed = server.get("/animals/").await.json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Lion");
}

#[tokio::test]
async fn test_missing_name_is_400_and_writes_nothing() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let response = server
        .post("/animals/")
        .json(&json!({
            "description": "The king of animals",
            "animalClassification": "Feline",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"]["name"],
        "missing required field"
    );

    let listed = server.get("/animals/").await.json::<Vec<Value>>();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_non_string_field_is_400() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let mut payload = lion();
    payload["name"] = json!(42);

    let response = server.post("/animals/").json(&payload).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"]["name"], "expected a string");
}

#[tokio::test]
async fn test_non_object_body_is_400() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let response = server.post("/animals/").json(&json!(["not", "an", "object"])).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_multipart_create_without_file() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let form = MultipartForm::new()
        .add_text("name", "Gecko")
        .add_text("description", "A small lizard")
        .add_text("animalClassification", "Reptile");

    let response = server.post("/animals/").multipart(form).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["imageUrl"], "/uploads/default.png");
}

#[tokio::test]
async fn test_disallowed_upload_extension_falls_back_to_default() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let form = MultipartForm::new()
        .add_text("name", "Gecko")
        .add_text("description", "A small lizard")
        .add_text("animalClassification", "Reptile")
        .add_part(
            "imageUrl",
            Part::bytes(b"MZ not an image".to_vec())
                .file_name("photo.EXE")
                .mime_type("application/octet-stream"),
        );

    let response = server.post("/animals/").multipart(form).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["imageUrl"], "/uploads/default.png");
}

#[tokio::test]
async fn test_same_image_uploaded_twice_gets_distinct_urls() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let mut urls = Vec::new();
    for name in ["Cat", "Ocelot"] {
        let form = MultipartForm::new()
            .add_text("name", name)
            .add_text("description", "A feline")
            .add_text("animalClassification", "Feline")
            .add_part(
                "imageUrl",
                Part::bytes(b"identical png bytes".to_vec())
                    .file_name("cat.png")
                    .mime_type("image/png"),
            );

        let response = server.post("/animals/").multipart(form).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        urls.push(
            response.json::<Value>()["imageUrl"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    assert_ne!(urls[0], urls[1]);

    // Both URLs resolve to the uploaded bytes
    for url in &urls {
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let served = server.get(url).await;
        served.assert_status_ok();
        assert_eq!(served.as_bytes().as_ref(), b"identical png bytes".as_slice());

        let content_type = served.header(axum::http::header::CONTENT_TYPE);
        assert_eq!(content_type.to_str().unwrap(), "image/png");
    }
}

#[tokio::test]
async fn test_missing_upload_is_404() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let response = server.get("/uploads/nope.png").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_caller_supplied_readonly_fields_are_ignored() {
    let uploads = TempDir::new().unwrap();
    let server = test_server(&uploads);

    let mut payload = lion();
    payload["id"] = json!("caller-chosen-id");
    payload["timestamp"] = json!("1970-01-01T00:00:00Z");
    payload["imageUrl"] = json!("https://example.com/evil.png");

    let response = server.post("/animals/").json(&payload).await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let record = response.json::<Value>();
    assert_ne!(record["id"], "caller-chosen-id");
    assert_ne!(record["timestamp"], "1970-01-01T00:00:00Z");
    assert_eq!(record["imageUrl"], "/uploads/default.png");
}
