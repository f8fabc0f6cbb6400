//! Fill annotated struct fields from environment variables
//!
//! `envtag` walks a struct you already own and assigns every field annotated
//! with an environment variable name, converting the variable's text into the
//! field's type. Nested structs are walked recursively, `Option`/`Box`
//! layers are looked through, and fields without an annotation are left
//! alone.
//!
//! # Features
//!
//! - **Declarative**: describe the mapping once with `#[derive(Env)]`
//! - **In place**: fills an existing value, no constructor required
//! - **Built-in conversions**: `bool`, integers (decimal, `0x`, `0o`, `0b`, leading `0`),
//!   floats, `String`, [`Duration`] and `std::time::Duration`
//! - **Custom types**: implement [`FromEnvText`] to take over the conversion
//! - **Pluggable sources**: process environment, maps, `{VAR}_FILE` secrets
//!
//! # Example
//!
//! ```rust
//! use envtag::{Duration, Env};
//!
//! #[derive(Debug, Default, Env)]
//! pub struct Config {
//!     #[env("ENVTAG_EXAMPLE_DEBUG")]
//!     pub debug: bool,
//!
//!     #[env("ENVTAG_EXAMPLE_WORKERS")]
//!     pub workers: u32,
//!
//!     // No annotation: walked recursively
//!     pub timeouts: Timeouts,
//! }
//!
//! #[derive(Debug, Default, Env)]
//! pub struct Timeouts {
//!     #[env("ENVTAG_EXAMPLE_TIMEOUT")]
//!     pub default: Duration,
//! }
//!
//! # fn main() -> Result<(), envtag::EnvError> {
//! #     std::env::set_var("ENVTAG_EXAMPLE_DEBUG", "true");
//! #     std::env::set_var("ENVTAG_EXAMPLE_WORKERS", "4");
//! #     std::env::set_var("ENVTAG_EXAMPLE_TIMEOUT", "1m30s");
//! let mut config = Config::default();
//! envtag::parse(&mut config)?;
//! #     assert!(config.debug);
//! #     assert_eq!(config.workers, 4);
//! #     assert_eq!(config.timeouts.default.to_string(), "1m30s");
//! #     Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[env("NAME")]` / `#[env(name = "NAME")]`
//!
//! Read the field from variable `NAME`. A variable that is not set reads as an
//! empty string, which fails to convert for anything but `String`.
//!
//! ## `#[env]`
//!
//! Read the field from the variable named like the field, upper-cased.
//!
//! ## `#[env(skip)]`
//!
//! Never touch the field. Private fields are skipped the same way.
//!
//! ## `#[env(text)]` on a struct
//!
//! Annotated fields of this struct type go through its [`FromEnvText`] impl
//! instead of being rejected; unannotated ones are still walked.
//!
//! # Sources
//!
//! ```rust
//! # use envtag::{Env, Parser};
//! # use std::collections::HashMap;
//! #[derive(Default, Env)]
//! pub struct Config {
//!     #[env("PORT")]
//!     pub port: u16,
//! }
//!
//! let vars = HashMap::from([("APP_PORT".to_string(), "8080".to_string())]);
//! let mut config = Config::default();
//! Parser::with_source(vars).prefix("APP_").parse(&mut config).unwrap();
//! assert_eq!(config.port, 8080);
//! ```

// Lets `#[derive(Env)]` be used inside this crate.
extern crate self as envtag;

mod coerce;
mod duration;
mod error;
mod json;
mod source;
mod target;
mod walk;

pub use duration::{Duration, DurationError};
pub use envtag_derive::Env;
pub use error::EnvError;
pub use json::Json;
pub use source::{FileSecrets, ProcessEnv, Source};
pub use target::{FieldRef, Fields, FromEnvText, Kind, Scalar, Target, TextSlot};
pub use walk::{parse, Parser};
