//! Basic usage example

use envtag::{Duration, Env};

#[derive(Debug, Default, Env)]
pub struct Config {
    // Loaded from DEBUG_MODE
    #[env("DEBUG_MODE")]
    pub debug_mode: bool,

    // Hex, octal and binary literals work too
    #[env("WORKERS_COUNT")]
    pub workers_count: i32,

    // No annotation: the walker goes inside
    pub timeouts: Timeouts,

    // Private fields are left alone
    started: bool,
}

#[derive(Debug, Default, Env)]
pub struct Timeouts {
    #[env("TIMEOUT")]
    pub default: Duration,

    // Named after the field: READ
    #[env]
    pub read: std::time::Duration,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables for demonstration
    std::env::set_var("DEBUG_MODE", "true");
    std::env::set_var("WORKERS_COUNT", "0x10");
    std::env::set_var("TIMEOUT", "1m30s");
    std::env::set_var("READ", "250ms");

    let mut config = Config::default();
    envtag::parse(&mut config)?;

    println!("Configuration loaded:");
    println!("  Debug Mode: {}", config.debug_mode);
    println!("  Workers: {}", config.workers_count);
    println!("  Default Timeout: {}", config.timeouts.default);
    println!("  Read Timeout: {:?}", config.timeouts.read);
    println!("  Started: {}", config.started);

    Ok(())
}
