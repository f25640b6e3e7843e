//! Router test helpers: migrated temp database, capturing mailer, tokens.

#![allow(dead_code)]

use std::{
    net::IpAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use arbe_events::{
    AppState, Config,
    config::{
        DatabaseConfig, ObservabilityConfig, SchedulerConfig, SecurityConfig, ServerConfig,
    },
};
use arbe_events_event::EventInput;
use arbe_events_notification::{EmailConfig, Mail, Mailer};
use arbe_events_shared::Settings;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key_minimum_32_characters_long";

#[derive(Default)]
pub struct CapturingMailer {
    pub sent: Mutex<Vec<Mail>>,
}

impl CapturingMailer {
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(mail);

        Ok(())
    }
}

pub fn test_config(path: &PathBuf) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            trusted_proxies: vec![IpAddr::from([127, 0, 0, 1])],
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", path.display()),
            max_connections: 1,
        },
        security: SecurityConfig {
            jwt_secret: JWT_SECRET.to_string(),
            issuer: "arbe-events".to_string(),
            form_token_ttl_secs: 3600,
            admin_token_days: 1,
        },
        email: EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
        },
        observability: ObservabilityConfig::default(),
        scheduler: SchedulerConfig {
            enabled: false,
            ..Default::default()
        },
        site: Settings {
            admin_email: "office@example.com".to_string(),
            site_name: "Maison Events".to_string(),
            ..Default::default()
        },
    }
}

pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<CapturingMailer>,
}

pub async fn setup_app(path: PathBuf) -> anyhow::Result<TestApp> {
    setup_app_with(test_config(&path)).await
}

pub async fn setup_app_with(config: Config) -> anyhow::Result<TestApp> {
    let pool = arbe_events::db::create_pool(&config.database.url, 1).await?;
    arbe_events::migrate(&pool).await?;

    let mailer = Arc::new(CapturingMailer::default());
    let state = arbe_events::app_state(config, pool, mailer.clone());

    Ok(TestApp { state, mailer })
}

impl TestApp {
    pub fn router(&self) -> Router {
        arbe_events::router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<Response<Body>> {
        Ok(self.router().oneshot(request).await?)
    }

    pub fn admin_token(&self) -> anyhow::Result<String> {
        arbe_events::auth::generate_token(&self.state.config.security, "root@example.com", 1)
    }

    pub fn form_token(&self, event_id: i64) -> anyhow::Result<String> {
        arbe_events::security::issue_form_token(&self.state.config.security, event_id)
    }

    pub async fn create_event(
        &self,
        capacity: u32,
        waitlist_enabled: bool,
    ) -> anyhow::Result<i64> {
        self.create_event_with(EventInput {
            capacity: Some(capacity),
            waitlist_enabled,
            ..event_input("Spring Gala")
        })
        .await
    }

    pub async fn create_event_with(&self, input: EventInput) -> anyhow::Result<i64> {
        Ok(self.state.event_command.create(input).await?)
    }

    /// Submits the public form synchronously with a valid token.
    pub async fn register(
        &self,
        event_id: i64,
        name: &str,
        email: &str,
    ) -> anyhow::Result<Response<Body>> {
        let token = self.form_token(event_id)?;
        let body = serde_urlencoded::to_string([
            ("name", name),
            ("email", email),
            ("_token", token.as_str()),
        ])?;

        self.send(form_request(event_id, body)?).await
    }

    pub async fn admin_get(&self, uri: &str) -> anyhow::Result<Response<Body>> {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.admin_token()?))
            .body(Body::empty())?;

        self.send(request).await
    }

    pub async fn admin_json(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<Response<Body>> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.admin_token()?))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?;

        self.send(request).await
    }
}

pub fn event_input(title: &str) -> EventInput {
    EventInput {
        title: title.to_owned(),
        start_date: Some("2025-09-12".to_owned()),
        start_time: Some("19:00".to_owned()),
        venue: Some("Maison du Peuple".to_owned()),
        city: Some("Brussels".to_owned()),
        registration_enabled: true,
        ..Default::default()
    }
}

pub fn form_request(event_id: i64, body: String) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(format!("/events/{event_id}/register"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))?)
}

pub async fn body_bytes(response: Response<Body>) -> anyhow::Result<Vec<u8>> {
    Ok(response.into_body().collect().await?.to_bytes().to_vec())
}

pub async fn body_text(response: Response<Body>) -> anyhow::Result<String> {
    Ok(String::from_utf8(body_bytes(response).await?)?)
}

pub async fn body_json(response: Response<Body>) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_slice(&body_bytes(response).await?)?)
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
