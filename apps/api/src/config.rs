use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RESUME_BUCKET: &str = "resume";
const DEFAULT_STORAGE_REGION: &str = "us-east-1";
const DEFAULT_CONTACT_FROM: &str = "no-reply@portfolio.local";
const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP fallback transport settings. Only present when host, user and
/// password are all configured.
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub resume_bucket: String,
    pub storage_s3_endpoint: String,
    pub storage_region: String,
    pub storage_access_key_id: String,
    pub storage_secret_access_key: String,
    pub site_url: Option<String>,
    pub contact_to_email: Option<String>,
    pub contact_from_email: String,
    pub resend_api_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let supabase_url = require("SUPABASE_URL")?.trim_end_matches('/').to_string();

        let smtp = match (get("SMTP_HOST"), get("SMTP_USER"), get("SMTP_PASS")) {
            (Some(host), Some(user), Some(pass)) => Some(SmtpConfig {
                host,
                port: get("SMTP_PORT")
                    .map(|p| p.parse::<u16>())
                    .transpose()
                    .context("SMTP_PORT must be a valid port number")?
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user,
                pass,
            }),
            _ => None,
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            supabase_anon_key: require("SUPABASE_ANON_KEY")?,
            resume_bucket: get("RESUME_BUCKET").unwrap_or_else(|| DEFAULT_RESUME_BUCKET.to_string()),
            storage_s3_endpoint: get("STORAGE_S3_ENDPOINT")
                .unwrap_or_else(|| format!("{supabase_url}/storage/v1/s3")),
            storage_region: get("STORAGE_REGION")
                .unwrap_or_else(|| DEFAULT_STORAGE_REGION.to_string()),
            storage_access_key_id: require("STORAGE_ACCESS_KEY_ID")?,
            storage_secret_access_key: require("STORAGE_SECRET_ACCESS_KEY")?,
            site_url: get("SITE_URL").map(|u| u.trim_end_matches('/').to_string()),
            contact_to_email: get("CONTACT_TO_EMAIL"),
            contact_from_email: get("CONTACT_FROM_EMAIL")
                .unwrap_or_else(|| DEFAULT_CONTACT_FROM.to_string()),
            resend_api_key: get("RESEND_API_KEY"),
            smtp,
            port: get("PORT")
                .map(|p| p.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(DEFAULT_PORT),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            supabase_url,
        })
    }

    /// Public URL of an object in the resume bucket.
    pub fn public_resume_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.supabase_url, self.resume_bucket, key
        )
    }

    /// Where magic links send the admin back to.
    pub fn admin_redirect_url(&self) -> Option<String> {
        self.site_url.as_ref().map(|site| format!("{site}/admin"))
    }
}
