use std::net::{IpAddr, SocketAddr};

use arbe_events_event::Event;
use arbe_events_registration::{
    Admission, CapacityProbe, Rejection, SpotsRemaining, Status, SubmitInput,
};
use arbe_events_shared::{Error, Metadata, Settings, format_date, format_time, now};
use axum::{
    Extension, Json,
    extract::{ConnectInfo, Form, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth,
    error::AppError,
    routes::AppState,
    security::{issue_form_token, verify_form_token},
    template::{Notice, RegisterTemplate, error_page, render},
};

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub registered: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl PageQuery {
    fn notice(&self, settings: &Settings) -> Option<Notice> {
        if self.registered.as_deref() == Some("1") {
            let message = if self.status.as_deref() == Some("waitlist") {
                &settings.form_waitlist_message
            } else {
                &settings.form_success_message
            };

            return Some(Notice::success(message));
        }

        let message = match self.error.as_deref()? {
            "closed" => Rejection::RegistrationClosed.message(),
            "duplicate" => Rejection::Duplicate.message(),
            "full" => Rejection::CapacityFull.message(),
            "invalid" => "Please enter your name and a valid email address.".to_owned(),
            _ => settings.form_error_message.to_owned(),
        };

        Some(Notice::error(message))
    }
}

fn schedule(
    start: &Option<String>,
    end: &Option<String>,
    format: impl Fn(&str) -> String,
) -> String {
    let start = start.as_deref().map(&format).unwrap_or_default();
    let end = end.as_deref().map(&format).unwrap_or_default();

    match (start.is_empty(), end.is_empty()) {
        (false, false) if start != end => format!("{start} - {end}"),
        (true, false) => end,
        _ => start,
    }
}

fn capacity_note(probe: &CapacityProbe) -> Option<String> {
    match probe.spots_remaining {
        SpotsRemaining::Unlimited => None,
        SpotsRemaining::Count(1) => Some("1 spot remaining".to_owned()),
        SpotsRemaining::Count(0) if probe.waitlist_enabled => {
            Some("This event is full. New registrations join the waitlist.".to_owned())
        }
        SpotsRemaining::Count(0) => Some("This event is full.".to_owned()),
        SpotsRemaining::Count(n) => Some(format!("{n} spots remaining")),
    }
}

fn page_template(
    app: &AppState,
    event: &Event,
    probe: &CapacityProbe,
    notice: Option<Notice>,
) -> anyhow::Result<RegisterTemplate> {
    let settings = &app.settings;

    Ok(RegisterTemplate {
        site_name: settings.site_name.to_owned(),
        event_id: event.id,
        title: event.title.to_owned(),
        date: schedule(&event.start_date, &event.end_date, |v| {
            format_date(v, &settings.date_format)
        }),
        time: schedule(&event.start_time, &event.end_time, |v| {
            format_time(v, &settings.time_format)
        }),
        location: event.location(),
        virtual_url: event
            .virtual_url
            .to_owned()
            .filter(|url| !url.trim().is_empty()),
        open: event.is_open(now()),
        capacity_note: capacity_note(probe),
        notice,
        token: issue_form_token(&app.config.security, event.id)?,
        recaptcha_site_key: settings
            .enable_recaptcha
            .then(|| settings.recaptcha_site_key.to_owned()),
    })
}

/// GET /events/{id}/register
pub async fn page(
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
    Query(query): Query<PageQuery>,
) -> Response {
    let site_name = app.settings.site_name.to_owned();

    let event = match app.registration_command.events().find(id).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return error_page(&site_name, Error::NotFound(format!("event {id}")).into());
        }
        Err(err) => return error_page(&site_name, err.into()),
    };

    let probe = match app.registration_command.capacity(id).await {
        Ok(probe) => probe,
        Err(err) => return error_page(&site_name, err.into()),
    };

    match page_template(&app, &event, &probe, query.notice(&app.settings)) {
        Ok(template) => render(template),
        Err(err) => error_page(&site_name, err.into()),
    }
}

#[derive(Deserialize)]
pub struct ActionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "_token", default)]
    pub token: String,
    pub ajax: Option<String>,
}

fn wants_json(input: &ActionInput, headers: &HeaderMap) -> bool {
    input.ajax.as_deref() == Some("1")
        || headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Submitter address: the peer, or the first forwarded address when the
/// peer is a trusted proxy.
fn client_ip(
    trusted_proxies: &[IpAddr],
    peer: Option<IpAddr>,
    headers: &HeaderMap,
) -> Option<String> {
    let peer = peer?;
    if !trusted_proxies.contains(&peer) {
        return Some(peer.to_string());
    }

    let forwarded = header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().and_then(|ip| ip.trim().parse::<IpAddr>().ok()))
        .or_else(|| header_value(headers, "x-real-ip").and_then(|ip| ip.parse().ok()));

    Some(forwarded.unwrap_or(peer).to_string())
}

/// Submitter context: client address, user agent, admin subject.
fn metadata(app: &AppState, peer: Option<IpAddr>, headers: &HeaderMap) -> Metadata {
    let ip_address = client_ip(&app.config.server.trusted_proxies, peer, headers);

    Metadata::new(ip_address, header_value(headers, header::USER_AGENT.as_str()))
        .by(auth::subject(&app.config.security, headers))
}

fn failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "data": { "message": message },
        })),
    )
        .into_response()
}

/// POST /events/{id}/register
pub async fn action(
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
    Form(input): Form<ActionInput>,
) -> Response {
    let json = wants_json(&input, &headers);
    let site_name = app.settings.site_name.to_owned();

    if let Err(err) = verify_form_token(&app.config.security, &input.token, id) {
        tracing::warn!(event_id = id, "registration form token rejected");

        let err = AppError::from(err);
        return if json {
            err.into_response()
        } else {
            error_page(&site_name, err)
        };
    }

    let peer = connect_info.map(|Extension(ConnectInfo(addr))| addr.ip());
    let metadata = metadata(&app, peer, &headers);
    let submitted = app
        .registration_command
        .submit(
            SubmitInput {
                event_id: id,
                name: input.name,
                email: input.email,
                phone: input.phone,
            },
            metadata,
        )
        .await;

    let admission = match submitted {
        Ok(admission) => admission,
        Err(err) => {
            let err = AppError::from(err);
            return if json {
                err.into_response()
            } else {
                error_page(&site_name, err)
            };
        }
    };

    match admission {
        Admission::Accepted {
            id: registration_id,
            status,
        } => {
            if json {
                let message = if status == Status::Waitlist {
                    &app.settings.form_waitlist_message
                } else {
                    &app.settings.form_success_message
                };

                return Json(json!({
                    "success": true,
                    "data": {
                        "message": message,
                        "status": status,
                        "registration_id": registration_id,
                    },
                }))
                .into_response();
            }

            let waitlist = if status == Status::Waitlist {
                "&status=waitlist"
            } else {
                ""
            };

            Redirect::to(&format!("/events/{id}/register?registered=1{waitlist}")).into_response()
        }
        Admission::Rejected(rejection) => {
            if json {
                return failure(StatusCode::OK, rejection.message());
            }

            Redirect::to(&format!("/events/{id}/register?error={}", rejection.code()))
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(spots_remaining: SpotsRemaining, waitlist_enabled: bool) -> CapacityProbe {
        CapacityProbe {
            available: spots_remaining != SpotsRemaining::Count(0),
            spots_remaining,
            waitlist_enabled,
            capacity: 10,
            registered: 0,
        }
    }

    #[test]
    fn test_capacity_note() {
        assert_eq!(capacity_note(&probe(SpotsRemaining::Unlimited, false)), None);
        assert_eq!(
            capacity_note(&probe(SpotsRemaining::Count(3), false)).as_deref(),
            Some("3 spots remaining")
        );
        assert_eq!(
            capacity_note(&probe(SpotsRemaining::Count(1), false)).as_deref(),
            Some("1 spot remaining")
        );
        assert_eq!(
            capacity_note(&probe(SpotsRemaining::Count(0), true)).as_deref(),
            Some("This event is full. New registrations join the waitlist.")
        );
    }

    #[test]
    fn test_client_ip() {
        let proxy = IpAddr::from([10, 0, 0, 1]);
        let peer = IpAddr::from([198, 51, 100, 9]);

        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&[], Some(peer), &headers).as_deref(), Some("198.51.100.9"));
        assert_eq!(client_ip(&[], None, &headers), None);

        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(
            client_ip(&[proxy], Some(peer), &headers).as_deref(),
            Some("198.51.100.9")
        );
        assert_eq!(
            client_ip(&[proxy], Some(proxy), &headers).as_deref(),
            Some("203.0.113.7")
        );

        headers.insert("x-forwarded-for", "not-an-ip".parse().unwrap());
        headers.insert("x-real-ip", "203.0.113.8".parse().unwrap());
        assert_eq!(
            client_ip(&[proxy], Some(proxy), &headers).as_deref(),
            Some("203.0.113.8")
        );

        headers.clear();
        assert_eq!(client_ip(&[proxy], Some(proxy), &headers).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_schedule_range() {
        let same = schedule(&Some("a".to_owned()), &Some("a".to_owned()), str::to_owned);
        assert_eq!(same, "a");

        let range = schedule(&Some("a".to_owned()), &Some("b".to_owned()), str::to_owned);
        assert_eq!(range, "a - b");

        assert_eq!(schedule(&None, &None, str::to_owned), "");
    }

    #[test]
    fn test_notice_from_query() {
        let settings = Settings::default();

        let query = PageQuery {
            registered: Some("1".to_owned()),
            status: Some("waitlist".to_owned()),
            error: None,
        };
        assert_eq!(
            query.notice(&settings),
            Some(Notice::success(settings.form_waitlist_message.to_owned()))
        );

        let query = PageQuery {
            error: Some("full".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            query.notice(&settings),
            Some(Notice::error("Sorry, this event is full."))
        );

        assert_eq!(PageQuery::default().notice(&settings), None);
    }
}
