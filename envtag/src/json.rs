//! JSON-encoded values

use crate::target::{FromEnvText, Kind, Target, TextSlot};
use serde::de::DeserializeOwned;
use std::ops::{Deref, DerefMut};

/// A field whose variable holds a JSON document.
///
/// Useful for values the built-in table does not cover, such as lists or
/// maps:
///
/// ```rust
/// use envtag::{Env, Json, Parser};
/// use std::collections::HashMap;
///
/// #[derive(Env, Default)]
/// struct Config {
///     #[env("TAGS")]
///     pub tags: Json<Vec<String>>,
/// }
///
/// let vars = HashMap::from([("TAGS".to_string(), r#"["a","b"]"#.to_string())]);
/// let mut config = Config::default();
/// Parser::with_source(vars).parse(&mut config).unwrap();
/// assert_eq!(*config.tags, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned> FromEnvText for Json<T> {
    type Err = serde_json::Error;

    fn from_env_text(text: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(text).map(Json)
    }
}

impl<T: DeserializeOwned> Target for Json<T> {
    fn text_slot(&mut self) -> Option<&mut dyn TextSlot> {
        Some(self)
    }

    fn kind(&mut self) -> Kind<'_> {
        Kind::Unsupported(std::any::type_name::<Self>())
    }
}
