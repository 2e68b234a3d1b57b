//! Identifiers that fill the holes of a diagram.
//!
//! An identifier names either a state or an event. Scalars compare by value,
//! callables compare by reference: two closures with the same display name
//! are still two different identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Dynamic value passed to and returned from behaviors.
///
/// `Value::Null` stands for "no return value".
pub type Value = serde_json::Value;

type Func = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A plain value identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Text(String),
    Number(i64),
}

impl Scalar {
    /// Convert the scalar into a dynamic value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A named, shareable function.
///
/// Cloning a `Callable` shares the underlying function, so clones stay
/// equal to each other. Creating two callables from the same closure code
/// yields two distinct identifiers.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<Func>,
}

impl Callable {
    /// Create a named callable.
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Create a callable without a display name.
    pub fn anonymous<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::new("", func)
    }

    /// Display name, or `None` for anonymous callables.
    pub fn name(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    /// Invoke the function.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.func).cast::<()>() as usize
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Callable {}

impl Hash for Callable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Callable({name})"),
            None => write!(f, "Callable(<anonymous>@{:#x})", self.addr()),
        }
    }
}

/// A state or event reference.
///
/// The variant is fixed when the identifier is created, so dispatch never
/// has to inspect the value again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ident {
    /// Plain value, compared by value.
    Scalar(Scalar),
    /// Function run when its state is entered or its event fires.
    Behavior(Callable),
    /// Factory that also answers construction requests.
    Constructor(Callable),
}

impl Ident {
    /// Text scalar.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(text.into()))
    }

    /// Numeric scalar.
    pub fn number(n: i64) -> Self {
        Self::Scalar(Scalar::Number(n))
    }

    /// Named behavior.
    pub fn behavior<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Behavior(Callable::new(name, func))
    }

    /// Named constructor.
    pub fn constructor<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Constructor(Callable::new(name, func))
    }

    /// The function behind a behavior or constructor.
    pub fn callable(&self) -> Option<&Callable> {
        match self {
            Self::Behavior(callable) | Self::Constructor(callable) => Some(callable),
            Self::Scalar(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        self.callable().is_some()
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self, Self::Constructor(_))
    }

    /// Human-readable label: the callable's name or the scalar's text.
    ///
    /// Anonymous callables have an empty label.
    pub fn label(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.to_string(),
            Self::Behavior(callable) | Self::Constructor(callable) => {
                callable.name().unwrap_or_default().to_string()
            }
        }
    }

    /// Scalar identifiers as a dynamic value; callables yield `Null`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(scalar) => scalar.to_value(),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{scalar}"),
            Self::Behavior(callable) | Self::Constructor(callable) => {
                f.write_str(callable.name().unwrap_or("<anonymous>"))
            }
        }
    }
}

impl From<&str> for Ident {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Ident {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<i64> for Ident {
    fn from(n: i64) -> Self {
        Self::number(n)
    }
}

impl From<Callable> for Ident {
    fn from(callable: Callable) -> Self {
        Self::Behavior(callable)
    }
}
