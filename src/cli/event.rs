use arbe_events::Config;
use arbe_events_event::EventInput;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum EventCommands {
    /// Create an event
    Create {
        #[arg(long)]
        title: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Start time (HH:MM)
        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        venue: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// 0 means unlimited, defaults to the site default capacity
        #[arg(long)]
        capacity: Option<u32>,

        #[arg(long)]
        waitlist: bool,
    },
    /// List events
    List,
}

pub async fn run(config: &Config, command: EventCommands) -> anyhow::Result<()> {
    let pool = arbe_events::db::create_pool(&config.database.url, 1).await?;

    match command {
        EventCommands::Create {
            title,
            date,
            time,
            venue,
            city,
            capacity,
            waitlist,
        } => {
            let command =
                arbe_events_event::Command::new(pool.clone(), config.site.default_capacity);
            let id = command
                .create(EventInput {
                    title,
                    start_date: date,
                    start_time: time,
                    venue,
                    city,
                    capacity,
                    waitlist_enabled: waitlist,
                    registration_enabled: true,
                    ..Default::default()
                })
                .await?;

            tracing::info!(id, "event created");
            println!("{id}");
        }
        EventCommands::List => {
            for event in arbe_events_event::Query(pool.clone()).list().await? {
                let capacity = if event.is_unlimited() {
                    "unlimited".to_owned()
                } else {
                    event.capacity.to_string()
                };

                println!(
                    "{}\t{}\t{}\t{}",
                    event.id,
                    event.start_date.as_deref().unwrap_or("-"),
                    capacity,
                    event.title
                );
            }
        }
    }

    pool.close().await;

    Ok(())
}
