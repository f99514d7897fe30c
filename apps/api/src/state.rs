use std::sync::Arc;

use crate::auth::identity::IdentityProvider;
use crate::config::Config;
use crate::mail::Mailer;
use crate::storage::ResumeBucket;
use crate::store::ContentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    /// `None` when neither Resend nor SMTP is configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub bucket: Arc<dyn ResumeBucket>,
    pub config: Config,
}
