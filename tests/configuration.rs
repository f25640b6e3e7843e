//! Tests for configuration system

use std::net::{IpAddr, Ipv6Addr};

use arbe_events::{Config, config::LogFormat};
use temp_dir::TempDir;

#[test]
fn test_config_loads_from_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("arbe-events.toml");
    std::fs::write(
        &path,
        r#"
[server]
port = 8080
trusted_proxies = ["10.0.0.1", "::1"]

[security]
jwt_secret = "file_secret_key_minimum_32_characters_long"

[observability]
log_format = "json"

[site]
admin_email = "office@example.com"
default_capacity = 25

[site.templates]
reminder_subject = "See you tomorrow"
"#,
    )?;

    let config = Config::load(Some(path.display().to_string()))?;

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(
        config.server.trusted_proxies,
        vec![IpAddr::from([10, 0, 0, 1]), IpAddr::from(Ipv6Addr::LOCALHOST)]
    );
    assert_eq!(config.observability.log_format, LogFormat::Json);
    assert_eq!(config.site.admin_email, "office@example.com");
    assert_eq!(config.site.default_capacity, 25);
    assert_eq!(config.site.templates.reminder_subject, "See you tomorrow");
    assert_eq!(
        config.site.templates.user_confirmation_subject,
        "Registration Confirmation"
    );
    assert_eq!(config.scheduler.reminder_cron, "0 0 8 * * *");
    assert!(config.validate().is_ok());

    Ok(())
}

#[test]
fn test_config_defaults_require_secret() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("missing.toml");

    let config = Config::load(Some(path.display().to_string()))?;

    assert_eq!(config.site.default_capacity, 100);
    assert!(config.site.enable_notifications);
    if std::env::var("JWT_SECRET").is_err() {
        assert!(config.validate().is_err());
    }

    Ok(())
}

#[test]
fn test_config_rejects_invalid_site_settings() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("arbe-events.toml");
    std::fs::write(
        &path,
        r#"
[security]
jwt_secret = "file_secret_key_minimum_32_characters_long"

[site]
admin_email = "not an email"
date_format = "[year"
"#,
    )?;

    let config = Config::load(Some(path.display().to_string()))?;
    let err = config.validate().unwrap_err();

    assert!(err.contains("admin_email"));
    assert!(err.contains("date_format"));

    Ok(())
}
