use std::sync::Arc;

use arbe_events_notification::Reminders;
use arbe_events_shared::date_in_days;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::config::SchedulerConfig;

/// Daily reminder job for events starting the next UTC day.
pub async fn scheduler(
    config: &SchedulerConfig,
    reminders: Arc<Reminders>,
) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;

    sched
        .add(Job::new_async(config.reminder_cron.as_str(), move |uuid, mut l| {
            let reminders = reminders.clone();

            Box::pin(async move {
                let date = date_in_days(1);

                match reminders.send_for(&date).await {
                    Ok(report) => tracing::info!(
                        date = %date,
                        events = report.events,
                        sent = report.sent,
                        failed = report.failed,
                        "event reminders processed"
                    ),
                    Err(err) => {
                        tracing::error!(err = %err, date = %date, "failed to send event reminders")
                    }
                }

                if let Err(err) = l.next_tick_for_job(uuid).await {
                    tracing::error!(err = %err, "failed to get next tick for event reminders");
                }
            })
        })?)
        .await?;

    Ok(sched)
}
