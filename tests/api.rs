//! End-to-end API behavior over the in-memory backend.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{png, FilePart, TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};
use studio_cms::domain::UserRole;

// ── Auth ───────────────────────────────────────────────────────────

#[tokio::test]
async fn login_issues_token_carrying_the_role() {
    let app = TestApp::spawn().await;

    let response = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["tokenType"], "Bearer");
    assert_eq!(response.body["data"]["user"]["role"], "admin");
    assert!(response.body["data"]["user"].get("passwordHash").is_none());

    let token = common::token_of(&response);
    let identity = app.state.users.authenticate(&token).await.unwrap();
    assert_eq!(identity.role, UserRole::Admin);
    assert_eq!(identity.username, ADMIN_USERNAME);
}

#[tokio::test]
async fn unknown_user_and_wrong_password_fail_identically() {
    let app = TestApp::spawn().await;

    let unknown = app.login("nobody", "whatever").await;
    let wrong = app.login(ADMIN_USERNAME, "not-the-password").await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn blank_login_fields_are_rejected_with_field_errors() {
    let app = TestApp::spawn().await;

    let response = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "  " })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["password", "username"]);
}

#[tokio::test]
async fn fifth_failure_locks_the_client_out() {
    let app = TestApp::spawn().await;

    for _ in 0..5 {
        let response = app.login(ADMIN_USERNAME, "wrong").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    // Correct credentials are refused while locked.
    let locked = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(locked.status, StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = locked.headers[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 300);
}

#[tokio::test]
async fn success_resets_the_failure_count() {
    let app = TestApp::spawn().await;

    for _ in 0..4 {
        app.login(ADMIN_USERNAME, "wrong").await;
    }
    assert_eq!(
        app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.status,
        StatusCode::OK
    );
    for _ in 0..4 {
        app.login(ADMIN_USERNAME, "wrong").await;
    }
    assert_eq!(
        app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn registration_is_admin_only_and_unique() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let account = json!({
        "username": "mira",
        "password": "secret1",
        "name": "Mira",
        "email": "mira@studio.example",
    });

    let anonymous = app
        .json(Method::POST, "/api/auth/register", None, Some(account.clone()))
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let created = app
        .json(Method::POST, "/api/auth/register", Some(&admin), Some(account.clone()))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["user"]["role"], "editor");

    let editor = common::token_of(&created);
    let by_editor = app
        .json(
            Method::POST,
            "/api/auth/register",
            Some(&editor),
            Some(json!({
                "username": "other",
                "password": "secret1",
                "name": "Other",
                "email": "other@studio.example",
            })),
        )
        .await;
    assert_eq!(by_editor.status, StatusCode::FORBIDDEN);

    let duplicate = app
        .json(Method::POST, "/api/auth/register", Some(&admin), Some(account))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["error"], "Username already exists");
}

#[tokio::test]
async fn profile_requires_a_valid_token() {
    let app = TestApp::spawn().await;

    assert_eq!(
        app.get("/api/auth/profile", None).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get("/api/auth/profile", Some("garbage")).await.status,
        StatusCode::UNAUTHORIZED
    );

    let token = app.editor_token("lena").await;
    let profile = app.get("/api/auth/profile", Some(&token)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["data"]["username"], "lena");
    assert_eq!(profile.body["data"]["role"], "editor");
}

#[tokio::test]
async fn password_change_checks_the_current_password() {
    let app = TestApp::spawn().await;
    let token = app.editor_token("lena").await;

    let wrong = app
        .json(
            Method::PUT,
            "/api/auth/password",
            Some(&token),
            Some(json!({ "currentPassword": "nope", "newPassword": "brand-new" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.body["errors"][0]["field"], "currentPassword");

    let changed = app
        .json(
            Method::PUT,
            "/api/auth/password",
            Some(&token),
            Some(json!({ "currentPassword": "editor-pass", "newPassword": "brand-new" })),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    assert_eq!(app.login("lena", "editor-pass").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login("lena", "brand-new").await.status, StatusCode::OK);
}

// ── News ───────────────────────────────────────────────────────────

fn news(title: &str, published: bool) -> serde_json::Value {
    json!({
        "title": title,
        "content": "Full story",
        "summary": "Short version",
        "isPublished": published,
        "category": "event",
    })
}

#[tokio::test]
async fn anonymous_readers_only_see_published_news() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let published = app
        .json(Method::POST, "/api/news", Some(&editor), Some(news("Open day", true)))
        .await;
    assert_eq!(published.status, StatusCode::CREATED);
    let draft = app
        .json(Method::POST, "/api/news", Some(&editor), Some(news("Secret", false)))
        .await;
    assert_eq!(draft.status, StatusCode::CREATED);
    let draft_id = draft.body["data"]["id"].as_str().unwrap().to_string();

    let public = app.get("/api/news", None).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body["data"]["total"], 1);
    assert_eq!(public.body["data"]["items"][0]["title"], "Open day");

    let staff = app.get("/api/news", Some(&editor)).await;
    assert_eq!(staff.body["data"]["total"], 2);

    let hidden = app.get(&format!("/api/news/{draft_id}"), None).await;
    assert_eq!(hidden.status, StatusCode::FORBIDDEN);
    let visible = app.get(&format!("/api/news/{draft_id}"), Some(&editor)).await;
    assert_eq!(visible.status, StatusCode::OK);
    assert!(visible.body["data"]["createdBy"].is_string());
}

#[tokio::test]
async fn news_writes_need_an_editor() {
    let app = TestApp::spawn().await;

    let response = app
        .json(Method::POST, "/api/news", None, Some(news("Nope", true)))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.state.news.count().await.unwrap(), 0);
}

#[tokio::test]
async fn news_validation_reports_every_field() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let response = app
        .json(
            Method::POST,
            "/api/news",
            Some(&editor),
            Some(json!({ "title": "", "category": "gossip", "publishDate": "soon" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["category", "content", "publishDate", "summary", "title"]
    );
}

#[tokio::test]
async fn news_image_upload_and_replacement() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let created = app
        .multipart(
            Method::POST,
            "/api/news",
            &editor,
            &[
                ("title", "Spring show"),
                ("content", "Tickets on sale"),
                ("summary", "Spring show"),
                ("isPublished", "true"),
            ],
            Some(png("image")),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let id = created.body["data"]["id"].as_str().unwrap().to_string();
    let first = created.body["data"]["image"].as_str().unwrap().to_string();
    assert!(first.starts_with("/uploads/"));
    assert!(app.stored_file(&first).exists());

    let updated = app
        .multipart(
            Method::PUT,
            &format!("/api/news/{id}"),
            &editor,
            &[("title", "Spring show 2")],
            Some(png("image")),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    let second = updated.body["data"]["image"].as_str().unwrap().to_string();
    assert_ne!(first, second);
    assert_eq!(updated.body["data"]["title"], "Spring show 2");
    assert_eq!(updated.body["data"]["summary"], "Spring show");
    assert!(!app.stored_file(&first).exists());
    assert!(app.stored_file(&second).exists());

    let deleted = app
        .json(Method::DELETE, &format!("/api/news/{id}"), Some(&editor), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(!app.stored_file(&second).exists());
}

#[tokio::test]
async fn malformed_form_flag_names_the_field() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let response = app
        .multipart(
            Method::POST,
            "/api/news",
            &editor,
            &[
                ("title", "Open day"),
                ("content", "Doors open at ten"),
                ("summary", "Open day"),
                ("isPublished", "maybe"),
            ],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "isPublished");
    assert_eq!(app.state.news.count().await.unwrap(), 0);
}

#[tokio::test]
async fn huge_page_number_returns_an_empty_page() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;
    app.json(Method::POST, "/api/news", Some(&editor), Some(news("Open day", true)))
        .await;

    for uri in [
        "/api/news?page=9223372036854775807",
        "/api/news?page=18446744073709551615&limit=100",
        "/api/media?page=9223372036854775807",
        "/api/schedule?page=9223372036854775807",
    ] {
        let response = app.get(uri, Some(&editor)).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}: {}", response.body);
        assert_eq!(response.body["data"]["items"], json!([]), "{uri}");
    }
}

#[tokio::test]
async fn disallowed_file_type_stores_nothing() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let response = app
        .multipart(
            Method::POST,
            "/api/news",
            &editor,
            &[
                ("title", "Bad"),
                ("content", "Bad"),
                ("summary", "Bad"),
            ],
            Some(FilePart {
                field: "image",
                filename: "run.sh",
                content_type: "application/x-sh",
                bytes: b"#!/bin/sh",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.state.news.count().await.unwrap(), 0);
    assert_eq!(std::fs::read_dir(&app.upload_dir).unwrap().count(), 0);
}

// ── Schedule ───────────────────────────────────────────────────────

fn class(day: i64, start: &str) -> serde_json::Value {
    json!({
        "title": "Contemporary",
        "description": "Floor work and improvisation",
        "instructor": "Ana",
        "studio": "Studio A",
        "level": "intermediate",
        "dayOfWeek": day,
        "startTime": start,
        "endTime": "19:30",
        "capacity": 16,
    })
}

#[tokio::test]
async fn schedule_rejects_out_of_range_day_and_loose_times() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let bad_day = app
        .json(Method::POST, "/api/schedule", Some(&editor), Some(class(7, "18:00")))
        .await;
    assert_eq!(bad_day.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_day.body["errors"][0]["field"], "dayOfWeek");

    let bad_time = app
        .json(Method::POST, "/api/schedule", Some(&editor), Some(class(2, "9:00")))
        .await;
    assert_eq!(bad_time.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_time.body["errors"][0]["field"], "startTime");

    assert_eq!(app.state.schedule.count().await.unwrap(), 0);
}

#[tokio::test]
async fn schedule_partial_update_keeps_other_fields() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let created = app
        .json(Method::POST, "/api/schedule", Some(&editor), Some(class(2, "18:00")))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["data"]["isActive"], true);
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let updated = app
        .json(
            Method::PUT,
            &format!("/api/schedule/{id}"),
            Some(&editor),
            Some(json!({ "capacity": 20, "instructor": "" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["capacity"], 20);
    assert_eq!(updated.body["data"]["instructor"], "Ana");
    assert_eq!(updated.body["data"]["dayOfWeek"], 2);
    assert_eq!(updated.body["data"]["startTime"], "18:00");
}

#[tokio::test]
async fn inactive_classes_are_hidden_from_the_public() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let mut inactive = class(3, "10:00");
    inactive["isActive"] = json!(false);
    app.json(Method::POST, "/api/schedule", Some(&editor), Some(inactive))
        .await;
    app.json(Method::POST, "/api/schedule", Some(&editor), Some(class(3, "12:00")))
        .await;

    let public = app.get("/api/schedule?dayOfWeek=3", None).await;
    assert_eq!(public.body["data"]["total"], 1);
    assert_eq!(public.body["data"]["items"][0]["startTime"], "12:00");

    let staff = app.get("/api/schedule?dayOfWeek=3", Some(&editor)).await;
    assert_eq!(staff.body["data"]["total"], 2);
}

#[tokio::test]
async fn missing_items_are_not_found() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    assert_eq!(
        app.get("/api/schedule/does-not-exist", None).await.status,
        StatusCode::NOT_FOUND
    );
    let response = app
        .json(Method::DELETE, "/api/news/does-not-exist", Some(&editor), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "News not found");
}

// ── Media ──────────────────────────────────────────────────────────

#[tokio::test]
async fn media_upload_and_delete_remove_the_file() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let uploaded = app
        .multipart(
            Method::POST,
            "/api/media",
            &editor,
            &[("description", "Poster")],
            Some(png("file")),
        )
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{}", uploaded.body);
    assert_eq!(uploaded.body["data"]["type"], "image");
    assert_eq!(uploaded.body["data"]["mimeType"], "image/png");
    assert_eq!(uploaded.body["data"]["originalName"], "poster.png");
    let id = uploaded.body["data"]["id"].as_str().unwrap().to_string();
    let path = uploaded.body["data"]["path"].as_str().unwrap().to_string();
    assert!(app.stored_file(&path).exists());

    assert_eq!(app.get("/api/media", None).await.status, StatusCode::UNAUTHORIZED);

    let deleted = app
        .json(Method::DELETE, &format!("/api/media/{id}"), Some(&editor), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(!app.stored_file(&path).exists());

    let again = app
        .json(Method::DELETE, &format!("/api/media/{id}"), Some(&editor), None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn media_upload_requires_a_file() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let response = app
        .multipart(
            Method::POST,
            "/api/media",
            &editor,
            &[("description", "Nothing attached")],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "file");
}

#[tokio::test]
async fn media_referenced_by_news_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;

    let uploaded = app
        .multipart(Method::POST, "/api/media", &editor, &[], Some(png("file")))
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED);
    let id = uploaded.body["data"]["id"].as_str().unwrap().to_string();
    let path = uploaded.body["data"]["path"].as_str().unwrap().to_string();

    let story = json!({
        "title": "Gallery",
        "content": format!("<img src=\"{path}\">"),
        "summary": "Photos",
    });
    let created = app
        .json(Method::POST, "/api/news", Some(&editor), Some(story))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let refused = app
        .json(Method::DELETE, &format!("/api/media/{id}"), Some(&editor), None)
        .await;
    assert_eq!(refused.status, StatusCode::CONFLICT);
    assert!(app.stored_file(&path).exists());
}

// ── Admin ──────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_are_admin_only() {
    let app = TestApp::spawn().await;
    let editor = app.editor_token("lena").await;
    let admin = app.admin_token().await;

    app.json(Method::POST, "/api/news", Some(&editor), Some(news("One", true)))
        .await;
    app.json(Method::POST, "/api/schedule", Some(&editor), Some(class(1, "17:00")))
        .await;

    assert_eq!(
        app.get("/api/admin/stats", Some(&editor)).await.status,
        StatusCode::FORBIDDEN
    );

    let stats = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["data"]["newsCount"], 1);
    assert_eq!(stats.body["data"]["scheduleCount"], 1);
    assert_eq!(stats.body["data"]["mediaCount"], 0);
    assert_eq!(stats.body["data"]["userCount"], 2);
}

#[tokio::test]
async fn health_and_info_are_public() {
    let app = TestApp::spawn().await;

    let health = app.get("/api/health", None).await;
    assert_eq!(health.status, StatusCode::OK);

    let info = app.get("/api", None).await;
    assert_eq!(info.status, StatusCode::OK);
}
