use std::sync::Arc;

use arbe_events_notification::Dispatcher;
use arbe_events_registration::SubmitInput;
use arbe_events_shared::{Metadata, Settings};
use temp_dir::TempDir;

mod helpers;

fn input(event_id: i64) -> SubmitInput {
    SubmitInput {
        event_id,
        name: "Ada Lovelace".to_owned(),
        email: "ada@arbe-events.localhost".to_owned(),
        phone: Some("0470 00 00 00".to_owned()),
    }
}

#[tokio::test]
async fn test_sends_admin_and_user_emails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let event_id = helpers::create_event(&pool, "Book club", "2025-05-20").await?;
    let mailer = Arc::new(helpers::CapturingMailer::default());
    let settings = Arc::new(Settings {
        admin_email: "owner@arbe-events.localhost".to_owned(),
        ..Default::default()
    });
    let command =
        helpers::command(&pool).observer(Arc::new(Dispatcher::new(mailer.clone(), settings)));

    assert!(command.submit(input(event_id), Metadata::default()).await?.is_accepted());

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);

    assert_eq!(sent[0].to, "owner@arbe-events.localhost");
    assert_eq!(sent[0].subject, "New Event Registration");
    assert!(sent[0].body.contains("Event: Book club"));
    assert!(sent[0].body.contains("Phone: 0470 00 00 00"));
    assert_eq!(sent[0].from_name, "Arbe Events");
    assert_eq!(sent[0].from_address, "noreply@arbe-events.localhost");

    assert_eq!(sent[1].to, "ada@arbe-events.localhost");
    assert_eq!(sent[1].subject, "Registration Confirmation");
    assert!(sent[1].body.starts_with("Dear Ada Lovelace,"));
    assert!(sent[1].body.contains("Date: May 20, 2025"));
    assert!(sent[1].body.contains("Time: 9:15 am"));
    assert!(sent[1].body.contains("Location: Library"));
    assert!(!sent[1].body.contains('{'));

    Ok(())
}

#[tokio::test]
async fn test_respects_toggles() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let event_id = helpers::create_event(&pool, "Book club", "2025-05-20").await?;
    let mailer = Arc::new(helpers::CapturingMailer::default());
    let settings = Arc::new(Settings {
        enable_notifications: false,
        ..Default::default()
    });
    let command =
        helpers::command(&pool).observer(Arc::new(Dispatcher::new(mailer.clone(), settings)));

    command.submit(input(event_id), Metadata::default()).await?;

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@arbe-events.localhost");

    let mailer = Arc::new(helpers::CapturingMailer::default());
    let settings = Arc::new(Settings {
        enable_user_confirmation: false,
        ..Default::default()
    });
    let command =
        helpers::command(&pool).observer(Arc::new(Dispatcher::new(mailer.clone(), settings)));

    command
        .submit(
            SubmitInput {
                email: "bob@arbe-events.localhost".to_owned(),
                ..input(event_id)
            },
            Metadata::default(),
        )
        .await?;

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "admin@arbe-events.localhost");

    Ok(())
}

#[tokio::test]
async fn test_failed_admin_email_still_sends_user_email() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let event_id = helpers::create_event(&pool, "Book club", "2025-05-20").await?;
    let mailer = Arc::new(helpers::CapturingMailer::rejecting(
        "admin@arbe-events.localhost",
    ));
    let command = helpers::command(&pool).observer(Arc::new(Dispatcher::new(
        mailer.clone(),
        Arc::new(Settings::default()),
    )));

    let admission = command.submit(input(event_id), Metadata::default()).await?;
    assert!(admission.is_accepted());

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@arbe-events.localhost");
    assert_eq!(command.count_by_event(event_id, None).await?, 1);

    Ok(())
}
