//! Error types for populating structs from environment variables

/// Errors that can occur while walking a struct and filling its fields.
///
/// Every error aborts the walk. Fields assigned before the failing one keep
/// their new values.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// The value handed to `parse` is not a struct.
    #[error("expected a mutable reference to a struct, got '{type_name}'")]
    NotAStruct {
        /// Type name of the rejected value
        type_name: &'static str,
    },

    /// A field is annotated with an empty environment variable name.
    #[error("env var name cannot be empty on field '{field}'")]
    EmptyVarName {
        /// Name of the offending field
        field: String,
    },

    /// The field's type has no coercion from a string.
    ///
    /// Raised for annotated fields whose type is outside the built-in table,
    /// including annotated structs that do not implement `FromEnvText`.
    #[error("type of field '{field}' is not parsable from string")]
    UnparsableType {
        /// Name of the offending field
        field: String,
    },

    /// Converting the variable's value into the field's type failed.
    ///
    /// Also used to wrap a failure inside a nested struct: `var` is then empty,
    /// `reason` carries the inner message and `inner` the inner error. The
    /// inner error is not reported as [`source`](std::error::Error::source)
    /// since `reason` already prints it.
    #[error("field '{field}' failed to parse from '{var}' env var: {reason}")]
    Parse {
        /// Name of the field being assigned
        field: String,
        /// Environment variable the value was read from
        var: String,
        /// Message from the coercion, the `FromEnvText` impl or the nested walk
        reason: String,
        /// Inner error when the failure happened in a nested struct
        inner: Option<Box<EnvError>>,
    },

    /// Failed to read from a file specified by `{VAR}_FILE` environment variable.
    #[error("Failed to read file '{path}' for environment variable '{name}': {source}")]
    FileRead {
        /// Name of the `{VAR}_FILE` environment variable (e.g., "API_KEY_FILE")
        name: String,
        /// Path to the file that failed to be read
        path: String,
        /// Underlying I/O error that caused the failure
        source: std::io::Error,
    },

    /// The process environment holds a value that is not valid Unicode.
    #[error("environment variable '{name}' is not valid unicode")]
    NotUnicode {
        /// Name of the environment variable
        name: String,
    },
}

impl EnvError {
    pub(crate) fn parse_error(
        field: impl Into<String>,
        var: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Parse {
            field: field.into(),
            var: var.into(),
            reason: reason.to_string(),
            inner: None,
        }
    }

    pub(crate) fn nested(field: impl Into<String>, inner: EnvError) -> Self {
        Self::Parse {
            field: field.into(),
            var: String::new(),
            reason: inner.to_string(),
            inner: Some(Box::new(inner)),
        }
    }

    /// Name of the field this error is reported on, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::EmptyVarName { field }
            | Self::UnparsableType { field }
            | Self::Parse { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Innermost error of a chain of nested-struct failures.
    pub fn root_cause(&self) -> &EnvError {
        let mut current = self;
        while let Self::Parse {
            inner: Some(inner),
            ..
        } = current
        {
            current = &**inner;
        }
        current
    }

    /// Field names from the outermost struct down to the failing field.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            path.extend(current.field());
            match current {
                Self::Parse {
                    inner: Some(inner),
                    ..
                } => current = &**inner,
                _ => return path,
            }
        }
    }
}
