use alloc::string::String;
use core::fmt;

use crate::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    Unsupported(&'static str),
    InvalidInput(&'static str),
    Internal(&'static str),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Unsupported(message) => write!(f, "unsupported: {message}"),
            CoreError::InvalidInput(message) => write!(f, "invalid input: {message}"),
            CoreError::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Message,
    Term,
}

impl EntryKind {
    pub fn of(id: &str) -> Self {
        if id.starts_with('-') {
            EntryKind::Term
        } else {
            EntryKind::Message
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Message => f.write_str("message"),
            EntryKind::Term => f.write_str("term"),
        }
    }
}

/// Failures recorded while resolving a pattern. None of them stop resolution;
/// the resolver substitutes a placeholder and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    UnknownMessage(String),
    UnknownTerm(String),
    UnknownAttribute(String),
    UnknownVariant(String),
    UnknownFunction(String),
    UnknownVariable(String),
    UnsupportedVariableType { name: String, kind: &'static str },
    NoDefault,
    NoValue,
    Cyclic,
    TooManyCharacters { length: usize, max: usize },
    TooDeeplyNested { max: usize },
    FunctionFailed { name: String, error: CoreError },
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::UnknownMessage(id) => write!(f, "Unknown message: {id}"),
            ResolverError::UnknownTerm(id) => write!(f, "Unknown term: {id}"),
            ResolverError::UnknownAttribute(name) => write!(f, "Unknown attribute: {name}"),
            ResolverError::UnknownVariant(key) => write!(f, "Unknown variant: {key}"),
            ResolverError::UnknownFunction(name) => write!(f, "Unknown function: {name}()"),
            ResolverError::UnknownVariable(name) => write!(f, "Unknown variable: {name}"),
            ResolverError::UnsupportedVariableType { name, kind } => {
                write!(f, "Unsupported variable type: {name}, {kind}")
            }
            ResolverError::NoDefault => f.write_str("No default"),
            ResolverError::NoValue => f.write_str("No value"),
            ResolverError::Cyclic => f.write_str("Cyclic reference"),
            ResolverError::TooManyCharacters { length, max } => write!(
                f,
                "Too many characters in placeable ({length}, max allowed is {max})"
            ),
            ResolverError::TooDeeplyNested { max } => {
                write!(f, "Too deeply nested references (max allowed is {max})")
            }
            ResolverError::FunctionFailed { name, error } => {
                write!(f, "Function {name}() failed: {error}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FluentError {
    Overriding { kind: EntryKind, id: String },
    Parser(ParseError),
    Resolver(ResolverError),
}

impl fmt::Display for FluentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FluentError::Overriding { kind, id } => {
                write!(f, "Attempt to override an existing {kind}: \"{id}\"")
            }
            FluentError::Parser(error) => write!(f, "parser error: {error}"),
            FluentError::Resolver(error) => write!(f, "resolver error: {error}"),
        }
    }
}

impl From<ParseError> for FluentError {
    fn from(error: ParseError) -> Self {
        FluentError::Parser(error)
    }
}

impl From<ResolverError> for FluentError {
    fn from(error: ResolverError) -> Self {
        FluentError::Resolver(error)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}

#[cfg(feature = "std")]
impl std::error::Error for ResolverError {}

#[cfg(feature = "std")]
impl std::error::Error for FluentError {}

#[cfg(test)]
mod tests {
    use super::{CoreError, EntryKind, FluentError, ResolverError};
    use alloc::string::{String, ToString};

    #[test]
    fn display_formats_core_errors() {
        assert_eq!(
            CoreError::Unsupported("feature").to_string(),
            "unsupported: feature"
        );
        assert_eq!(
            CoreError::InvalidInput("arg").to_string(),
            "invalid input: arg"
        );
        assert_eq!(CoreError::Internal("state").to_string(), "internal error: state");
    }

    #[test]
    fn entry_kind_follows_dash_prefix() {
        assert_eq!(EntryKind::of("-brand"), EntryKind::Term);
        assert_eq!(EntryKind::of("brand"), EntryKind::Message);
    }

    #[test]
    fn overriding_names_kind_and_id() {
        let err = FluentError::Overriding {
            kind: EntryKind::Term,
            id: String::from("-brand"),
        };
        assert_eq!(
            err.to_string(),
            "Attempt to override an existing term: \"-brand\""
        );
    }

    #[test]
    fn resolver_errors_read_like_messages() {
        let err = ResolverError::TooManyCharacters {
            length: 2600,
            max: 2500,
        };
        assert_eq!(
            err.to_string(),
            "Too many characters in placeable (2600, max allowed is 2500)"
        );
        assert_eq!(
            ResolverError::UnknownFunction(String::from("PLATFORM")).to_string(),
            "Unknown function: PLATFORM()"
        );
        assert_eq!(
            ResolverError::TooDeeplyNested { max: 100 }.to_string(),
            "Too deeply nested references (max allowed is 100)"
        );
    }
}
