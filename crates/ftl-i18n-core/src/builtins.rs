use alloc::boxed::Box;

use crate::{
    CoreError, CoreResult, FluentDateTime, FluentNumber, FluentValue, FormatterOptions, NamedArgs,
};

/// A function callable from FTL as `NAME(positional, named: value)`.
pub type FluentFunction = Box<dyn Fn(&[FluentValue], &NamedArgs) -> CoreResult<FluentValue>>;

pub type BuiltinFunction = fn(&[FluentValue], &NamedArgs) -> CoreResult<FluentValue>;

pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    match name {
        "NUMBER" => Some(number),
        "DATETIME" => Some(datetime),
        _ => None,
    }
}

/// `NUMBER(value, ...options)`: wraps a number or a numeric string, merging the
/// named options over the ones the value already carries.
pub fn number(positional: &[FluentValue], named: &NamedArgs) -> CoreResult<FluentValue> {
    let (value, mut options) = match positional.first() {
        Some(FluentValue::Number(number)) => (number.value, number.options.clone()),
        Some(FluentValue::String(text)) | Some(FluentValue::Symbol(text)) => {
            let value = text
                .trim()
                .parse::<f64>()
                .map_err(|_| CoreError::InvalidInput("NUMBER expects a numeric argument"))?;
            (value, FormatterOptions::new())
        }
        _ => return Err(CoreError::InvalidInput("NUMBER expects a numeric argument")),
    };
    options.merge(&named_options(named));
    Ok(FluentValue::Number(FluentNumber::with_options(value, options)))
}

/// `DATETIME(value, ...options)`: wraps a date, or a number of epoch milliseconds.
pub fn datetime(positional: &[FluentValue], named: &NamedArgs) -> CoreResult<FluentValue> {
    let (epoch_millis, mut options) = match positional.first() {
        Some(FluentValue::DateTime(date)) => (date.epoch_millis, date.options.clone()),
        Some(FluentValue::Number(number)) if number.value.is_finite() => {
            (number.value as i64, number.options.clone())
        }
        _ => return Err(CoreError::InvalidInput("DATETIME expects a date argument")),
    };
    options.merge(&named_options(named));
    Ok(FluentValue::DateTime(FluentDateTime::with_options(
        epoch_millis,
        options,
    )))
}

fn named_options(named: &NamedArgs) -> FormatterOptions {
    let mut options = FormatterOptions::new();
    for (name, value) in named {
        match value {
            FluentValue::String(text) | FluentValue::Symbol(text) => {
                options.insert(name.as_str(), text.as_str());
            }
            FluentValue::Number(number) => {
                options.insert(name.as_str(), number.value);
            }
            FluentValue::None(_) | FluentValue::DateTime(_) => {}
        }
    }
    options
}

pub(crate) enum Callee<'b> {
    Custom(&'b FluentFunction),
    Builtin(BuiltinFunction),
}

impl Callee<'_> {
    pub(crate) fn call(
        &self,
        positional: &[FluentValue],
        named: &NamedArgs,
    ) -> CoreResult<FluentValue> {
        match self {
            Callee::Custom(function) => function(positional, named),
            Callee::Builtin(function) => function(positional, named),
        }
    }
}
