//! Example demonstrating JSON-encoded values

use envtag::{Env, Json};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
}

#[derive(Debug, Default, Env)]
pub struct Config {
    // Plain text
    #[env("APP_NAME")]
    pub app_name: String,

    // JSON array
    #[env("TAGS")]
    pub tags: Json<Vec<String>>,

    // JSON object
    #[env("ENVIRONMENT_VARS")]
    pub environment_vars: Json<HashMap<String, String>>,

    // JSON object into a serde struct
    #[env("DATABASE")]
    pub database: Json<DatabaseConfig>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_NAME", "my-application");
    std::env::set_var("TAGS", r#"["production","api","v2"]"#);
    std::env::set_var(
        "ENVIRONMENT_VARS",
        r#"{"LOG_LEVEL":"debug","TIMEOUT":"30"}"#,
    );
    std::env::set_var(
        "DATABASE",
        r#"{"host":"localhost","port":5432,"username":"admin"}"#,
    );

    let mut config = Config::default();
    envtag::parse(&mut config)?;

    println!("Configuration loaded:");
    println!("  App Name: {}", config.app_name);
    println!("  Tags: {:?}", *config.tags);
    println!("  Environment Variables: {:?}", *config.environment_vars);
    println!(
        "  Database: {}:{} (user: {})",
        config.database.host, config.database.port, config.database.username
    );

    Ok(())
}
