//! Auth commands - Login, Logout, and Status for Lens
//!
//! Provides the `lens auth` CLI subcommands which:
//! 1. `login`  - Exchanges an email and password for a session and stores
//!    it in the system keyring.
//! 2. `logout` - Removes the stored session.
//! 3. `status` - Probes the service and reports the connection status.

use std::io::BufRead;

use anyhow::{Context, Result};
use clap::Subcommand;
use lens_core::domain::connection::ConnStatus;
use tracing::info;

use crate::context::{api_error, AppContext};
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Environment variable read when `--password` is not given
const PASSWORD_ENV: &str = "LENS_PASSWORD";

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in with an email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password; read from LENS_PASSWORD or stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove the stored session
    Logout,
    /// Check the connection and login status
    Status,
}

impl AuthCommand {
    pub async fn execute(&self, ctx: AppContext, format: OutputFormat) -> Result<()> {
        let fmt = get_formatter(format);
        match self {
            AuthCommand::Login { email, password } => {
                self.execute_login(&ctx, email, password.as_deref(), &*fmt)
                    .await
            }
            AuthCommand::Logout => self.execute_logout(&ctx, &*fmt),
            AuthCommand::Status => self.execute_status(&ctx, &*fmt, format).await,
        }
    }

    async fn execute_login(
        &self,
        ctx: &AppContext,
        email: &str,
        password: Option<&str>,
        fmt: &dyn OutputFormatter,
    ) -> Result<()> {
        let password = match password {
            Some(p) => p.to_string(),
            None => read_password()?,
        };

        info!(email, "Logging in to Lens");
        let mut client = ctx.password_client(email.to_string(), password);
        client
            .authenticate()
            .await
            .map_err(|e| api_error(e, "log in"))?;

        let session = client
            .session()
            .context("Login succeeded without a session")?;
        ctx.sessions
            .store(session)
            .context("Failed to store session in keyring")?;

        fmt.success(&format!("Logged in as {}", client.user_display_name()));
        fmt.info(&format!("Server: {}", client.base_url()));
        Ok(())
    }

    fn execute_logout(&self, ctx: &AppContext, fmt: &dyn OutputFormatter) -> Result<()> {
        ctx.sessions
            .clear()
            .context("Failed to clear session from keyring")?;
        fmt.success("Logged out");
        fmt.info("Session removed from keyring");
        Ok(())
    }

    async fn execute_status(
        &self,
        ctx: &AppContext,
        fmt: &dyn OutputFormatter,
        format: OutputFormat,
    ) -> Result<()> {
        let mut client = ctx.client();
        let status = client.get_status().await;
        let user = client.session().map(|s| s.user.clone());

        if format == OutputFormat::Json {
            fmt.print_json(&serde_json::json!({
                "status": status,
                "server": client.base_url(),
                "logged_in": client.is_logged_in(),
                "user": user,
            }));
            return Ok(());
        }

        match status {
            ConnStatus::Connected => {
                fmt.success(&format!("Connected as {}", client.user_display_name()))
            }
            ConnStatus::LoggedOut => {
                fmt.warn("Not logged in");
                fmt.info("Run 'lens auth login --email <EMAIL>' to log in");
            }
            ConnStatus::Disconnected => {
                fmt.warn("Lens service unreachable");
                if client.is_logged_in() {
                    fmt.info(&format!("Stored session for {}", client.user_display_name()));
                }
            }
        }
        fmt.info(&format!("Server: {}", client.base_url()));
        if let Some(tier) = user.and_then(|u| u.tier) {
            fmt.info(&format!("Tier:   {tier}"));
        }
        Ok(())
    }
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
