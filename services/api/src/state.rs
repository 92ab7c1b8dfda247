//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    clients::{DriveClient, Mailer, YoutubeClient},
    config::ApiConfig,
    middleware::JwtVerifier,
    repositories::DocumentRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<ApiConfig>,
    pub jwt: JwtVerifier,
    pub documents: DocumentRepository,
    pub drive: DriveClient,
    pub youtube: YoutubeClient,
    pub mailer: Mailer,
    /// Client for the image proxy, restricted to allowed redirect hosts
    pub proxy_http: reqwest::Client,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        config: ApiConfig,
        http: reqwest::Client,
        proxy_http: reqwest::Client,
    ) -> Self {
        Self {
            jwt: JwtVerifier::new(&config.jwt_secret),
            documents: DocumentRepository::new(db_pool.clone()),
            drive: DriveClient::new(http.clone(), config.google_drive_api_key.clone()),
            youtube: YoutubeClient::new(http.clone(), config.google_youtube_api_key.clone()),
            mailer: Mailer::new(
                http.clone(),
                config.resend_api_key.clone(),
                config.mail_from.clone(),
                config.notification_email.clone(),
                config.public_view_base.clone(),
                config.dashboard_url.clone(),
            ),
            db_pool,
            config: Arc::new(config),
            proxy_http,
        }
    }
}
