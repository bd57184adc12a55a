#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod args;
mod ast;
mod builtins;
mod bundle;
mod error;
mod format_backend;
mod language_tag;
mod memoizer;
mod negotiation;
mod parser;
mod resolver;
mod types;

pub use args::{Args, NamedArgs, Value};
pub use ast::{
    CallArgument, EntryNode, EntryValue, Expression, FunctionReference, NumberLiteral, Pattern,
    PatternElement, SelectExpression, Variant, VariantKey,
};
pub use builtins::{BuiltinFunction, FluentFunction, datetime, number};
pub use bundle::{Bundle, BundleOptions, Transform};
pub use error::{CoreError, CoreResult, EntryKind, FluentError, ResolverError};
pub use format_backend::{
    BasicFormatBackend, DateTimeFormat, FormatBackend, FormatterKind, FormatterOptionValue,
    FormatterOptions, NumberFormat, PluralCategory, PluralRules, format_decimal,
};
pub use language_tag::LanguageTag;
pub use negotiation::negotiate_lookup;
pub use parser::{MAX_NESTING_DEPTH, MAX_PLACEABLES, ParseError, ParseErrorKind, Resource, Span, parse_resource};
pub use resolver::{Formattable, MAX_PLACEABLE_LENGTH, MAX_RESOLVE_DEPTH, resolve};
pub use types::{FluentDateTime, FluentNumber, FluentValue};
