//! Schema the walker runs on
//!
//! Each type a field can hold implements [`Target`], which tells the walker
//! what the value is: a scalar from the built-in table, a nested struct, an
//! indirection layer, or something unsupported. Independently of that, a type
//! may expose a [`TextSlot`], which takes priority over all of the above when
//! the field is annotated.
//!
//! Structs implement [`Fields`] (usually through `#[derive(Env)]`) to list
//! their fields in declaration order.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::duration::Duration;

/// A type the walker can visit.
pub trait Target {
    /// The text-parsing hook of this type, if it has one.
    fn text_slot(&mut self) -> Option<&mut dyn TextSlot> {
        None
    }

    /// What the built-in walker sees in this value.
    fn kind(&mut self) -> Kind<'_>;
}

/// A struct whose fields can be walked.
pub trait Fields {
    /// One entry per declared field, in declaration order.
    fn fields(&mut self) -> Vec<FieldRef<'_>>;
}

/// A single field of a struct as handed to the walker.
pub struct FieldRef<'a> {
    pub(crate) name: &'static str,
    pub(crate) key: Option<&'static str>,
    pub(crate) value: Option<&'a mut dyn Target>,
}

impl<'a> FieldRef<'a> {
    /// A settable field, annotated with `key` or not at all.
    pub fn new(name: &'static str, key: Option<&'static str>, value: &'a mut dyn Target) -> Self {
        Self {
            name,
            key,
            value: Some(value),
        }
    }

    /// A field the walker must not touch.
    pub fn locked(name: &'static str) -> Self {
        Self {
            name,
            key: None,
            value: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> Option<&'static str> {
        self.key
    }

    pub fn is_settable(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRef")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("settable", &self.is_settable())
            .finish()
    }
}

/// Shape of a value as seen by the walker.
pub enum Kind<'a> {
    /// One of the built-in scalar kinds.
    Scalar(Scalar<'a>),
    /// A nested struct.
    Struct(&'a mut dyn Fields),
    /// One layer of indirection; `None` is the absent state.
    Indirect(Option<&'a mut dyn Target>),
    /// Nothing the built-in table can coerce into.
    Unsupported(&'static str),
}

/// Mutable handle to a value of one of the built-in scalar kinds.
pub enum Scalar<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Str(&'a mut String),
    Duration(&'a mut Duration),
    StdDuration(&'a mut std::time::Duration),
}

/// Parse a value of this type from the text of an environment variable.
///
/// Implementing this (and exposing it with [`text_field!`](crate::text_field)
/// or `#[env(text)]`) replaces the built-in coercion for the type.
///
/// ```rust
/// use envtag::FromEnvText;
///
/// #[derive(Debug, PartialEq)]
/// enum Level {
///     Low,
///     High,
/// }
///
/// impl FromEnvText for Level {
///     type Err = String;
///
///     fn from_env_text(text: &str) -> Result<Self, Self::Err> {
///         match text {
///             "low" => Ok(Level::Low),
///             "high" => Ok(Level::High),
///             other => Err(format!("unknown level '{other}'")),
///         }
///     }
/// }
///
/// envtag::text_field!(Level);
/// ```
pub trait FromEnvText: Sized {
    type Err: fmt::Display;

    fn from_env_text(text: &str) -> Result<Self, Self::Err>;
}

/// Object-safe form of [`FromEnvText`] used by the walker.
pub trait TextSlot {
    /// Replaces `self` with the value parsed from `text`. On error `self` is
    /// left as it was.
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

impl<T: FromEnvText> TextSlot for T {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        *self = T::from_env_text(text).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Implements [`Target`] for types whose only route from text is their
/// [`FromEnvText`] impl.
///
/// ```rust
/// # use envtag::FromEnvText;
/// struct Token(String);
///
/// impl FromEnvText for Token {
///     type Err = std::convert::Infallible;
///
///     fn from_env_text(text: &str) -> Result<Self, Self::Err> {
///         Ok(Token(text.to_string()))
///     }
/// }
///
/// envtag::text_field!(Token);
/// ```
#[macro_export]
macro_rules! text_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Target for $ty {
                fn text_slot(&mut self) -> ::std::option::Option<&mut dyn $crate::TextSlot> {
                    ::std::option::Option::Some(self)
                }

                fn kind(&mut self) -> $crate::Kind<'_> {
                    $crate::Kind::Unsupported(::std::any::type_name::<$ty>())
                }
            }
        )+
    };
}

macro_rules! scalar_target {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Target for $ty {
                fn kind(&mut self) -> Kind<'_> {
                    Kind::Scalar(Scalar::$variant(self))
                }
            }
        )+
    };
}

scalar_target! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => Str,
    Duration => Duration,
    std::time::Duration => StdDuration,
}

impl<T: Target> Target for Option<T> {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Indirect(self.as_mut().map(|v| v as &mut dyn Target))
    }
}

impl<T: Target> Target for Box<T> {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Indirect(Some(&mut **self))
    }
}

macro_rules! unsupported_target {
    ($(<$($param:ident),+> $ty:ty),+ $(,)?) => {
        $(
            impl<$($param),+> Target for $ty {
                fn kind(&mut self) -> Kind<'_> {
                    Kind::Unsupported(std::any::type_name::<$ty>())
                }
            }
        )+
    };
}

unsupported_target! {
    <T> *const T,
    <T> *mut T,
    <T> Vec<T>,
    <T> VecDeque<T>,
    <T, S> HashSet<T, S>,
    <T> BTreeSet<T>,
    <K, V, S> HashMap<K, V, S>,
    <K, V> BTreeMap<K, V>,
}

macro_rules! from_str_text {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromEnvText for $ty {
                type Err = <$ty as std::str::FromStr>::Err;

                fn from_env_text(text: &str) -> Result<Self, Self::Err> {
                    text.parse()
                }
            }

            text_field!($ty);
        )+
    };
}

from_str_text!(IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, PathBuf);
