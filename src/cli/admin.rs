use arbe_events::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Print a bearer token for the admin API
    Token {
        /// Recorded as the token subject and in `registered_by`
        #[arg(long)]
        subject: String,

        /// Validity in days (overrides config file)
        #[arg(long)]
        days: Option<u64>,
    },
}

pub fn run(config: &Config, command: AdminCommands) -> anyhow::Result<()> {
    match command {
        AdminCommands::Token { subject, days } => {
            let days = days.unwrap_or(config.security.admin_token_days);
            let token = arbe_events::auth::generate_token(&config.security, &subject, days)?;

            tracing::info!(subject = %subject, days, "admin token issued");
            println!("{token}");
        }
    }

    Ok(())
}
