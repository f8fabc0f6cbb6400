//! Example demonstrating file-based secrets (Kubernetes/Docker)

use envtag::{Env, Parser};
use std::io::Write;

#[derive(Debug, Default, Env)]
pub struct Config {
    // Reads from MYAPP_API_KEY or MYAPP_API_KEY_FILE
    #[env("API_KEY")]
    pub api_key: String,

    // Reads from MYAPP_DATABASE_PASSWORD or MYAPP_DATABASE_PASSWORD_FILE
    #[env("DATABASE_PASSWORD")]
    pub database_password: String,

    #[env("DATABASE_URL")]
    pub database_url: String,
}

fn main() -> anyhow::Result<()> {
    // Simulate a mounted secret
    let mut secret_file = tempfile::NamedTempFile::new()?;
    writeln!(secret_file, "file-password")?;

    std::env::set_var("MYAPP_API_KEY", "direct-key");
    std::env::set_var("MYAPP_DATABASE_PASSWORD_FILE", secret_file.path());
    std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/mydb");

    let mut config = Config::default();
    Parser::new()
        .prefix("MYAPP_")
        .with_files()
        .parse(&mut config)?;

    println!("Configuration loaded:");
    println!("  API Key: {}", config.api_key);
    println!("  Database Password: {}", config.database_password);
    println!("  Database URL: {}", config.database_url);

    Ok(())
}
