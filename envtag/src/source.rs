//! Where variable values come from

use crate::error::EnvError;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;

/// A read-only lookup from variable name to value.
///
/// `Ok(None)` means the variable is not set; the walker then uses an empty
/// string.
pub trait Source {
    fn get(&self, key: &str) -> Result<Option<String>, EnvError>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, key: &str) -> Result<Option<String>, EnvError> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode {
                name: key.to_string(),
            }),
        }
    }
}

impl<S: std::hash::BuildHasher> Source for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Result<Option<String>, EnvError> {
        Ok(HashMap::get(self, key).cloned())
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Result<Option<String>, EnvError> {
        Ok(BTreeMap::get(self, key).cloned())
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn get(&self, key: &str) -> Result<Option<String>, EnvError> {
        (**self).get(key)
    }
}

/// Falls back to reading `{KEY}_FILE` when `KEY` itself is not set.
///
/// Priority order:
/// 1. Direct variable (`KEY`) - for local development
/// 2. File path from variable (`KEY_FILE`) - for Kubernetes/Docker secrets
///
/// File contents are trimmed of surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct FileSecrets<S> {
    inner: S,
}

impl<S> FileSecrets<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Source for FileSecrets<S> {
    fn get(&self, key: &str) -> Result<Option<String>, EnvError> {
        if let Some(value) = self.inner.get(key)? {
            return Ok(Some(value));
        }

        let file_var_name = format!("{}_FILE", key);
        match self.inner.get(&file_var_name)? {
            Some(file_path) => fs::read_to_string(&file_path)
                .map(|s| Some(s.trim().to_string()))
                .map_err(|e| EnvError::FileRead {
                    name: file_var_name,
                    path: file_path,
                    source: e,
                }),
            None => Ok(None),
        }
    }
}
