//! Fakes for the external collaborators, used by router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::identity::{AuthUser, IdentityError, IdentityProvider, Session};
use crate::config::Config;
use crate::mail::{EmailMessage, MailError, Mailer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{ResumeBucket, StorageError};
use crate::store::memory::MemoryStore;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const VISITOR_EMAIL: &str = "visitor@example.com";
pub const VISITOR_TOKEN: &str = "visitor-token";
pub const PASSWORD: &str = "correct horse";

#[derive(Default)]
pub struct FakeIdentity {
    users: HashMap<String, AuthUser>,
    unavailable: bool,
    pub signed_out: Mutex<Vec<String>>,
    pub magic_links: Mutex<Vec<(String, Option<String>)>>,
}

fn user(email: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
        user_metadata: Value::Null,
    }
}

impl FakeIdentity {
    /// Knows the admin and a non-admin visitor, both with password [`PASSWORD`].
    pub fn new() -> Self {
        let mut users = HashMap::new();
        users.insert(ADMIN_TOKEN.to_string(), user(ADMIN_EMAIL));
        users.insert(VISITOR_TOKEN.to_string(), user(VISITOR_EMAIL));
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, IdentityError> {
        if self.unavailable {
            return Err(IdentityError::Rejected {
                status: 503,
                message: "auth service unavailable".into(),
            });
        }
        Ok(self.users.get(access_token).cloned())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let found = self
            .users
            .iter()
            .find(|(_, u)| u.email.as_deref() == Some(email));
        match found {
            Some((token, user)) if password == PASSWORD => Ok(Session {
                access_token: token.clone(),
                refresh_token: format!("{token}-refresh"),
                token_type: "bearer".into(),
                expires_in: 3600,
                user: user.clone(),
            }),
            _ => Err(IdentityError::Rejected {
                status: 400,
                message: "Invalid login credentials".into(),
            }),
        }
    }

    async fn send_magic_link(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), IdentityError> {
        self.magic_links
            .lock()
            .expect("lock poisoned")
            .push((email.to_string(), redirect_to.map(str::to_string)));
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.signed_out
            .lock()
            .expect("lock poisoned")
            .push(access_token.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Provider {
                status: 500,
                message: "provider down".into(),
            });
        }
        self.sent
            .lock()
            .expect("lock poisoned")
            .push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeBucket {
    pub objects: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl ResumeBucket for FakeBucket {
    async fn upload(&self, key: &str, body: Bytes) -> Result<String, StorageError> {
        self.objects
            .lock()
            .expect("lock poisoned")
            .push((key.to_string(), body.len()));
        Ok(format!("https://cdn.example.com/resume/{key}"))
    }
}

pub fn test_config() -> Config {
    let vars = HashMap::from([
        ("DATABASE_URL", "postgres://localhost/portfolio"),
        ("SUPABASE_URL", "https://demo.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
        ("STORAGE_ACCESS_KEY_ID", "key"),
        ("STORAGE_SECRET_ACCESS_KEY", "secret"),
        ("SITE_URL", "https://me.dev"),
        ("CONTACT_TO_EMAIL", "owner@example.com"),
    ]);
    Config::from_vars(|k| vars.get(k).map(|v| v.to_string())).expect("test config")
}

/// Handles to the fakes behind a test router.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<FakeIdentity>,
    pub mailer: Arc<RecordingMailer>,
    pub bucket: Arc<FakeBucket>,
}

pub struct TestAppBuilder {
    store: MemoryStore,
    identity: FakeIdentity,
    mailer: Option<RecordingMailer>,
    config: Config,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new().with_admin(ADMIN_EMAIL),
            identity: FakeIdentity::new(),
            mailer: Some(RecordingMailer::default()),
            config: test_config(),
        }
    }

    pub fn store(mut self, store: MemoryStore) -> Self {
        self.store = store.with_admin(ADMIN_EMAIL);
        self
    }

    pub fn identity(mut self, identity: FakeIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn mailer(mut self, mailer: Option<RecordingMailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn config(mut self, f: impl FnOnce(&mut Config)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn build(self) -> TestApp {
        let store = Arc::new(self.store);
        let identity = Arc::new(self.identity);
        let has_mailer = self.mailer.is_some();
        let mailer = Arc::new(self.mailer.unwrap_or_default());
        let bucket = Arc::new(FakeBucket::default());

        let state = AppState {
            store: store.clone(),
            identity: identity.clone(),
            mailer: has_mailer.then(|| mailer.clone() as Arc<dyn Mailer>),
            bucket: bucket.clone(),
            config: self.config,
        };

        TestApp {
            router: build_router(state),
            store,
            identity,
            mailer,
            bucket,
        }
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.expect("infallible")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send(router, request(method, uri, token, body)).await;
    let status = response.status();
    (status, body_json(response).await)
}
