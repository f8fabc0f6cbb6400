//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates walker attributes from structs and
//! their fields during macro expansion.

use syn::{DeriveInput, Field, LitStr, Meta, Visibility};

/// Parsed `#[env(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Environment variable annotation:
    /// - `None`: no annotation, the field is only walked into
    /// - `Some(None)`: bare `#[env]`, named after the field in upper case
    /// - `Some(Some(name))`: explicit name, possibly empty
    pub key: Option<Option<String>>,

    /// `#[env(skip)]`: the walker never touches this field.
    pub skip: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[env(...)]` attributes from a struct field.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            match &attr.meta {
                // #[env]
                Meta::Path(_) => attrs.set_key(attr, None)?,

                Meta::NameValue(_) => {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "expected #[env(\"NAME\")] or #[env(name = \"NAME\")]",
                    ));
                }

                Meta::List(_) => {
                    // #[env("NAME")]
                    if let Ok(name) = attr.parse_args::<LitStr>() {
                        attrs.set_key(attr, Some(name.value()))?;
                        continue;
                    }

                    let mut name = None;
                    attr.parse_nested_meta(|meta| {
                        // name = "..."
                        if meta.path.is_ident("name") {
                            let value: LitStr = meta.value()?.parse()?;
                            name = Some(value.value());
                            return Ok(());
                        }

                        // skip
                        if meta.path.is_ident("skip") {
                            attrs.skip = true;
                            return Ok(());
                        }

                        if meta.path.is_ident("text") {
                            return Err(meta.error("`text` is only supported on the struct"));
                        }

                        Err(meta.error("unsupported env attribute"))
                    })?;

                    if let Some(name) = name {
                        attrs.set_key(attr, Some(name))?;
                    }
                }
            }
        }

        if attrs.skip && attrs.key.is_some() {
            return Err(syn::Error::new_spanned(
                &field.ident,
                "`skip` cannot be combined with an environment variable name",
            ));
        }

        Ok(attrs)
    }

    fn set_key(&mut self, attr: &syn::Attribute, name: Option<String>) -> syn::Result<()> {
        if self.key.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "environment variable name specified more than once",
            ));
        }
        self.key = Some(name);
        Ok(())
    }

    /// Private fields and `#[env(skip)]` fields are never handed to the walker.
    pub fn is_settable(&self, vis: &Visibility) -> bool {
        !self.skip && !matches!(vis, Visibility::Inherited)
    }
}

/// Parsed `#[env(...)]` attributes from the struct itself.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// `#[env(text)]`: the struct's `FromEnvText` impl is its text parser.
    pub text: bool,
}

impl StructAttrs {
    pub fn from_input(input: &DeriveInput) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &input.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("text") {
                    attrs.text = true;
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level env attribute"))
            })?;
        }

        Ok(attrs)
    }
}
