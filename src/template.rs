use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::AppError;

pub fn render<T: Template>(template: T) -> Response {
    render_with_status(StatusCode::OK, template)
}

pub fn render_with_status<T: Template>(status: StatusCode, template: T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("Failed to render template: {err}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template. Error: {err}"),
            )
                .into_response()
        }
    }
}

/// Flash shown above the public form.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: &'static str,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: "error",
            message: message.into(),
        }
    }
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub site_name: String,
    pub event_id: i64,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub virtual_url: Option<String>,
    pub open: bool,
    pub capacity_note: Option<String>,
    pub notice: Option<Notice>,
    pub token: String,
    pub recaptcha_site_key: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub site_name: String,
    pub status_code: u16,
    pub error_title: String,
    pub error_message: String,
}

/// HTML counterpart of the JSON error body.
pub fn error_page(site_name: &str, error: AppError) -> Response {
    let (status, message) = error.status_and_message();

    render_with_status(
        status,
        ErrorTemplate {
            site_name: site_name.to_owned(),
            status_code: status.as_u16(),
            error_title: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_owned(),
            error_message: message,
        },
    )
}
