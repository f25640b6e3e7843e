//! Anti-forgery tokens for the public registration form.
//!
//! A token is a short-lived HS256 JWT bound to one event, so a token issued
//! for the form of event 3 is rejected on a submission for event 4.

use std::time::{SystemTime, UNIX_EPOCH};

use arbe_events_shared::{Error, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

pub const FORM_AUDIENCE: &str = "arbe-events-form";

#[derive(Debug, Serialize, Deserialize)]
struct FormClaims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    event_id: i64,
}

pub fn issue_form_token(config: &SecurityConfig, event_id: i64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = FormClaims {
        aud: FORM_AUDIENCE.to_owned(),
        exp: now + config.form_token_ttl_secs,
        iat: now,
        iss: config.issuer.to_owned(),
        event_id,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

pub fn verify_form_token(config: &SecurityConfig, token: &str, event_id: i64) -> Result<()> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[FORM_AUDIENCE]);
    validation.leeway = 0;

    let data = decode::<FormClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(err = %e, "invalid form token");
        Error::InvalidToken
    })?;

    if data.claims.event_id != event_id {
        return Err(Error::InvalidToken);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test_secret_key_minimum_32_characters_long".to_string(),
            issuer: "arbe-events".to_string(),
            form_token_ttl_secs: 3600,
            admin_token_days: 7,
        }
    }

    #[test]
    fn test_form_token_accepts_same_event() -> anyhow::Result<()> {
        let token = issue_form_token(&config(), 3)?;

        assert!(verify_form_token(&config(), &token, 3).is_ok());

        Ok(())
    }

    #[test]
    fn test_form_token_bound_to_event() -> anyhow::Result<()> {
        let token = issue_form_token(&config(), 3)?;

        assert!(matches!(
            verify_form_token(&config(), &token, 4),
            Err(Error::InvalidToken)
        ));

        Ok(())
    }

    #[test]
    fn test_form_token_garbage() {
        assert!(matches!(
            verify_form_token(&config(), "not-a-token", 3),
            Err(Error::InvalidToken)
        ));
    }

    #[test]
    fn test_admin_token_is_not_a_form_token() -> anyhow::Result<()> {
        let token = crate::auth::generate_token(&config(), "admin", 1)?;

        assert!(verify_form_token(&config(), &token, 3).is_err());

        Ok(())
    }
}
