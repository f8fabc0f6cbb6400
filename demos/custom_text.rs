//! Example demonstrating types with their own text parser

use envtag::{Env, FromEnvText};
use std::net::IpAddr;

#[derive(Debug, Default)]
enum LogLevel {
    #[default]
    Info,
    Debug,
    Warn,
}

impl FromEnvText for LogLevel {
    type Err = String;

    fn from_env_text(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "warn" => Ok(LogLevel::Warn),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

envtag::text_field!(LogLevel);

// Annotated fields of this type use `from_env_text`; unannotated ones are
// walked field by field.
#[derive(Debug, Default, Env)]
#[env(text)]
pub struct Endpoint {
    #[env("BACKUP_HOST")]
    pub host: String,
    #[env("BACKUP_PORT")]
    pub port: u16,
}

impl FromEnvText for Endpoint {
    type Err = String;

    fn from_env_text(text: &str) -> Result<Self, Self::Err> {
        let (host, port) = text
            .rsplit_once(':')
            .ok_or_else(|| format!("expected host:port, got '{text}'"))?;
        Ok(Endpoint {
            host: host.to_string(),
            port: port.parse().map_err(|e| format!("invalid port: {e}"))?,
        })
    }
}

#[derive(Debug, Default, Env)]
pub struct Config {
    #[env("LOG_LEVEL")]
    pub log_level: LogLevel,

    #[env("BIND_ADDR")]
    pub bind_addr: Option<IpAddr>,

    #[env("PRIMARY")]
    pub primary: Endpoint,

    pub backup: Endpoint,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("LOG_LEVEL", "DEBUG");
    std::env::set_var("BIND_ADDR", "0.0.0.0");
    std::env::set_var("PRIMARY", "db.internal:5432");
    std::env::set_var("BACKUP_HOST", "db-backup.internal");
    std::env::set_var("BACKUP_PORT", "5433");

    // `bind_addr` starts out present so the walker can fill it
    let mut config = Config {
        bind_addr: Some(IpAddr::from([127, 0, 0, 1])),
        ..Config::default()
    };
    envtag::parse(&mut config)?;

    println!("Configuration loaded:");
    println!("  Log Level: {:?}", config.log_level);
    println!("  Bind Address: {:?}", config.bind_addr);
    println!("  Primary: {}:{}", config.primary.host, config.primary.port);
    println!("  Backup: {}:{}", config.backup.host, config.backup.port);

    Ok(())
}
