//! Shared harness: the full router over in-memory repositories and a
//! temporary upload directory.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use studio_cms::config::{AppConfig, StorageBackend};
use studio_cms::server::{build_app, seed_default_admin};
use studio_cms::{AppState, InMemoryRepositoryProvider};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const BOUNDARY: &str = "studio-cms-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
    _tmp: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

/// One file part of a multipart body.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let tmp = tempfile::tempdir().unwrap();

        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.security.bcrypt_cost = 4;
        config.uploads.dir = tmp.path().join("uploads");
        config.admin.username = ADMIN_USERNAME.into();
        config.admin.password = ADMIN_PASSWORD.into();
        customize(&mut config);

        let app = build_app(&config, Arc::new(InMemoryRepositoryProvider::new()))
            .await
            .unwrap();
        seed_default_admin(&app.state, &config).await.unwrap();

        Self {
            router: app.router,
            state: app.state,
            upload_dir: config.uploads.dir.clone(),
            _tmp: tmp,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.json(Method::GET, uri, token, None).await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        file: Option<FilePart<'_>>,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send(request).await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let response = self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        token_of(&response)
    }

    /// Register an editor through the admin API and return its token.
    pub async fn editor_token(&self, username: &str) -> String {
        let admin = self.admin_token().await;
        let response = self
            .json(
                Method::POST,
                "/api/auth/register",
                Some(&admin),
                Some(json!({
                    "username": username,
                    "password": "editor-pass",
                    "name": "Studio Editor",
                    "email": format!("{username}@studio.example"),
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        token_of(&response)
    }

    /// Path on disk of a file served under `/uploads/<name>`.
    pub fn stored_file(&self, public_path: &str) -> PathBuf {
        let name = public_path.rsplit('/').next().unwrap_or_default();
        self.upload_dir.join(name)
    }
}

pub fn token_of(response: &TestResponse) -> String {
    response.body["data"]["token"].as_str().unwrap().to_string()
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn png(field: &str) -> FilePart<'_> {
    FilePart {
        field,
        filename: "poster.png",
        content_type: "image/png",
        bytes: b"\x89PNG\r\n\x1a\nnot-really-a-png",
    }
}
