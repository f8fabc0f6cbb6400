//! The field walker

use crate::error::EnvError;
use crate::source::{FileSecrets, ProcessEnv, Source};
use crate::target::{FieldRef, Fields, Kind, Target};

/// Fills annotated struct fields from a [`Source`].
///
/// The default parser reads the process environment:
///
/// ```rust
/// use envtag::{Env, Parser};
///
/// #[derive(Env, Default)]
/// struct Config {
///     #[env("ENVTAG_DOC_WORKERS")]
///     pub workers: u32,
/// }
///
/// std::env::set_var("ENVTAG_DOC_WORKERS", "8");
/// let mut config = Config::default();
/// Parser::new().parse(&mut config).unwrap();
/// assert_eq!(config.workers, 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser<S = ProcessEnv> {
    source: S,
    prefix: String,
}

impl Parser<ProcessEnv> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Source> Parser<S> {
    /// A parser reading variables from `source` instead of the process environment.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            prefix: String::new(),
        }
    }

    /// Prepends `prefix` to every variable name before it is looked up.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Also accept `{VAR}_FILE` naming a file that holds the value of `VAR`.
    pub fn with_files(self) -> Parser<FileSecrets<S>> {
        Parser {
            source: FileSecrets::new(self.source),
            prefix: self.prefix,
        }
    }

    /// Walks `target` and fills every annotated field.
    ///
    /// # Errors
    ///
    /// - `target` is not a struct
    /// - A field is annotated with an empty name
    /// - A value cannot be converted into its field's type
    /// - An annotated field has a type with no conversion from text
    ///
    /// The walk stops at the first error; fields filled before it keep their
    /// new values.
    pub fn parse<T: Target + ?Sized>(&self, target: &mut T) -> Result<(), EnvError> {
        match target.kind() {
            Kind::Struct(fields) => self.walk_struct(fields),
            _ => Err(EnvError::NotAStruct {
                type_name: std::any::type_name::<T>(),
            }),
        }
    }

    fn walk_struct(&self, target: &mut dyn Fields) -> Result<(), EnvError> {
        for field in target.fields() {
            self.walk_field(field)?;
        }
        Ok(())
    }

    fn walk_field(&self, field: FieldRef<'_>) -> Result<(), EnvError> {
        let FieldRef { name, key, value } = field;

        let Some(value) = value else {
            log::trace!("field `{name}` is not settable, skipping");
            return Ok(());
        };

        if key == Some("") {
            return Err(EnvError::EmptyVarName {
                field: name.to_string(),
            });
        }

        self.visit(name, key, value)
    }

    /// Applies the decision procedure to one field value, unwrapping one
    /// indirection layer per call.
    fn visit(&self, name: &str, key: Option<&str>, value: &mut dyn Target) -> Result<(), EnvError> {
        if let Some(key) = key {
            if let Some(slot) = value.text_slot() {
                let var = self.var_name(key);
                let text = self.resolve(&var)?;
                slot.set_text(&text)
                    .map_err(|reason| EnvError::parse_error(name, &var, reason))?;
                log::debug!("field `{name}` set from `{var}` via its text parser");
                return Ok(());
            }
        }

        match value.kind() {
            Kind::Indirect(Some(inner)) => {
                log::trace!("field `{name}`: following indirection");
                self.visit(name, key, inner)
            }
            Kind::Indirect(None) => {
                log::trace!("field `{name}`: indirection is empty, skipping");
                Ok(())
            }
            Kind::Struct(fields) => match key {
                None => {
                    log::trace!("field `{name}`: entering nested struct");
                    self.walk_struct(fields)
                        .map_err(|inner| EnvError::nested(name, inner))
                }
                Some(_) => Err(EnvError::UnparsableType {
                    field: name.to_string(),
                }),
            },
            Kind::Scalar(scalar) => {
                let Some(key) = key else {
                    return Ok(());
                };
                let var = self.var_name(key);
                let text = self.resolve(&var)?;
                crate::coerce::coerce(scalar, &text)
                    .map_err(|reason| EnvError::parse_error(name, &var, reason))?;
                log::debug!("field `{name}` set from `{var}`");
                Ok(())
            }
            Kind::Unsupported(type_name) => match key {
                None => Ok(()),
                Some(_) => {
                    log::trace!("field `{name}`: no conversion from text into `{type_name}`");
                    Err(EnvError::UnparsableType {
                        field: name.to_string(),
                    })
                }
            },
        }
    }

    fn var_name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Value of `var`, or an empty string when it is not set.
    fn resolve(&self, var: &str) -> Result<String, EnvError> {
        Ok(self.source.get(var)?.unwrap_or_default())
    }
}

/// Fills `target` from the process environment.
///
/// Shorthand for `Parser::new().parse(target)`.
pub fn parse<T: Target + ?Sized>(target: &mut T) -> Result<(), EnvError> {
    Parser::new().parse(target)
}
