use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use ::common::StorageConfig;
use ::common::config::FilesystemStorageConfig;
use ::common::storage::build_storage;
use atelier_server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use atelier_server::error::AppError;
use atelier_server::extractors::auth::JwtGuard;
use atelier_server::models::image::{ImageRecord, NewImage};
use atelier_server::services::ImageService;
use atelier_server::state::AppState;
use atelier_server::use_cases::{
    CreateImage, DeleteImage, IndexImages, ShowImage, UpdateImage, UserRecord, UserStore,
};

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Uploads larger than this are rejected.
pub const MAX_OBJECT_SIZE: u64 = 1024;

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const IMAGES: &str = "/api/v1/images";

    pub fn image(id: &str) -> String {
        format!("/api/v1/images/{id}")
    }

    pub fn file(storage_id: &str) -> String {
        format!("/files/{storage_id}")
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<UserRecord>>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailTaken);
        }
        let user = UserRecord {
            id: users.len() as i32 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[derive(Default)]
pub struct MemoryImages {
    images: Mutex<Vec<ImageRecord>>,
}

fn not_found() -> AppError {
    AppError::NotFound("Image not found".into())
}

#[async_trait]
impl CreateImage for MemoryImages {
    async fn create(&self, image: NewImage) -> Result<ImageRecord, AppError> {
        let now = Utc::now();
        let record = ImageRecord::from_new(Uuid::now_v7(), image, now, now);
        self.images.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ShowImage for MemoryImages {
    async fn show(&self, id: Uuid) -> Result<ImageRecord, AppError> {
        let images = self.images.lock().unwrap();
        images.iter().find(|i| i.id == id).cloned().ok_or_else(not_found)
    }
}

#[async_trait]
impl IndexImages for MemoryImages {
    async fn index(&self) -> Result<Vec<ImageRecord>, AppError> {
        Ok(self.images.lock().unwrap().clone())
    }
}

#[async_trait]
impl DeleteImage for MemoryImages {
    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|i| i.id != id);
        if images.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

#[async_trait]
impl UpdateImage for MemoryImages {
    async fn update(&self, id: Uuid, image: NewImage) -> Result<ImageRecord, AppError> {
        let mut images = self.images.lock().unwrap();
        let slot = images.iter_mut().find(|i| i.id == id).ok_or_else(not_found)?;
        *slot = ImageRecord::from_new(id, image, slot.created_at, Utc::now());
        Ok(slot.clone())
    }
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// Raw response body.
    pub bytes: Vec<u8>,
}

/// The full router over in-memory stores and a temp-dir storage backend.
pub struct TestApp {
    router: Router,
    pub storage_root: tempfile::TempDir,
}

const BOUNDARY: &str = "atelier-test-boundary";

fn multipart_body(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

impl TestApp {
    pub async fn spawn() -> Self {
        let storage_root = tempfile::tempdir().expect("Failed to create storage dir");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                token_ttl_hours: 1,
            },
            storage: StorageConfig {
                public_url: "http://localhost/files".to_string(),
                max_object_size: MAX_OBJECT_SIZE,
                filesystem: FilesystemStorageConfig {
                    root: storage_root.path().to_path_buf(),
                },
                ..Default::default()
            },
        };

        let storage = build_storage(&config.storage)
            .await
            .expect("Failed to build storage");

        let state = AppState {
            guard: JwtGuard::jwt(JWT_SECRET),
            images: ImageService::from_store(Arc::new(MemoryImages::default()), storage),
            users: Arc::new(MemoryUsers::default()),
            config: Arc::new(config),
        };

        Self {
            router: atelier_server::build_router(state),
            storage_root,
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let res = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = res.status().as_u16();
        let bytes = res
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            text,
            body,
            bytes,
        }
    }

    fn request(method: &str, path: &str, token: Option<&str>) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let request = Self::request("POST", path, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let request = Self::request("GET", path, token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        let request = Self::request("DELETE", path, token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Bodiless request with any method and no credentials.
    pub async fn call(&self, method: &str, path: &str) -> TestResponse {
        let request = Self::request(method, path, None)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Raw request with an arbitrary `Authorization` header value.
    pub async fn get_with_authorization(&self, path: &str, value: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn upload(
        &self,
        method: &str,
        path: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
        token: Option<&str>,
    ) -> TestResponse {
        let request = Self::request(method, path, token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(file_name, content_type, bytes)))
            .unwrap();
        self.send(request).await
    }

    /// Register a user and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let reg = self.post_json(routes::REGISTER, &body, None).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self.post_json(routes::LOGIN, &body, None).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }

    /// Files currently held by the storage backend, ignoring its scratch dir.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.storage_root.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
