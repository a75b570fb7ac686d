use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    /// Verified sending address. Optional at load: its absence is a
    /// per-request validation failure, not a boot failure.
    pub sender_email: Option<String>,
    pub reply_to_email: Option<String>,
}

impl EmailConfig {
    pub fn init() -> Result<Self> {
        let smtp_server =
            std::env::var("SMTP_HOST").context("Missing environment variable: SMTP_HOST")?;
        let smtp_port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .context("SMTP_PORT must be a valid u16 integer")?;
        let smtp_user =
            std::env::var("SMTP_USERNAME").context("Missing environment variable: SMTP_USERNAME")?;
        let smtp_pass =
            std::env::var("SMTP_PASSWORD").context("Missing environment variable: SMTP_PASSWORD")?;

        let sender_email = optional_var("SENDER_EMAIL");
        let reply_to_email = optional_var("REPLY_TO_EMAIL");

        Ok(Self {
            smtp_server,
            smtp_port,
            smtp_user,
            smtp_pass,
            sender_email,
            reply_to_email,
        })
    }
}

// An empty value is treated the same as an unset variable.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub kafka_broker: String,
    pub email_config: EmailConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let kafka_broker = std::env::var("KAFKA").context("Missing environment variable: KAFKA")?;
        let email_config = EmailConfig::init().context("failed email config")?;

        Ok(Self {
            kafka_broker,
            email_config,
        })
    }
}
