use std::time::{SystemTime, UNIX_EPOCH};

use arbe_events_shared::Error;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, HeaderMapExt, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::SecurityConfig, error::AppError, routes::AppState};

pub const ADMIN_AUDIENCE: &str = "arbe-events-admin";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    sub: String,
}

pub fn generate_token(config: &SecurityConfig, sub: &str, days: u64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        aud: ADMIN_AUDIENCE.to_owned(),
        exp: now + days * 24 * 60 * 60,
        iat: now,
        iss: config.issuer.to_owned(),
        sub: sub.to_owned(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

/// Subject of a valid admin token.
pub fn verify_token(config: &SecurityConfig, token: &str) -> Option<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[ADMIN_AUDIENCE]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.sub)
}

/// Subject of the bearer token on a request, when present and valid.
pub fn subject(config: &SecurityConfig, headers: &axum::http::HeaderMap) -> Option<String> {
    let Authorization(bearer) = headers.typed_get::<Authorization<Bearer>>()?;

    verify_token(config, bearer.token())
}

/// Admin caller authenticated with a bearer token.
pub struct AuthAdmin {
    pub subject: String,
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::Forbidden)?;

        let Some(subject) = verify_token(&state.config.security, bearer.token()) else {
            tracing::warn!("rejected admin token");
            return Err(Error::Forbidden.into());
        };

        Ok(AuthAdmin { subject })
    }
}
