use alloc::string::{String, ToString};

use crate::{Bundle, FormatterOptions};

#[derive(Clone, Debug, PartialEq)]
pub struct FluentNumber {
    pub value: f64,
    pub options: FormatterOptions,
}

impl FluentNumber {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            options: FormatterOptions::new(),
        }
    }

    pub fn with_options(value: f64, options: FormatterOptions) -> Self {
        Self { value, options }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FluentDateTime {
    pub epoch_millis: i64,
    pub options: FormatterOptions,
}

impl FluentDateTime {
    pub fn new(epoch_millis: i64) -> Self {
        Self {
            epoch_millis,
            options: FormatterOptions::new(),
        }
    }

    pub fn with_options(epoch_millis: i64, options: FormatterOptions) -> Self {
        Self {
            epoch_millis,
            options,
        }
    }
}

/// A resolved value. `None` stands in for anything that failed to resolve and
/// renders as its name, or `???` when it has none.
#[derive(Clone, Debug, PartialEq)]
pub enum FluentValue {
    None(Option<String>),
    String(String),
    Symbol(String),
    Number(FluentNumber),
    DateTime(FluentDateTime),
}

impl FluentValue {
    pub fn none() -> Self {
        FluentValue::None(None)
    }

    pub fn named_none(name: impl Into<String>) -> Self {
        FluentValue::None(Some(name.into()))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FluentValue::None(_))
    }

    pub fn format(&self, bundle: &Bundle) -> String {
        match self {
            FluentValue::None(Some(name)) if !name.is_empty() => name.clone(),
            FluentValue::None(_) => "???".to_string(),
            FluentValue::String(value) | FluentValue::Symbol(value) => value.clone(),
            FluentValue::Number(number) => bundle.format_number(number.value, &number.options),
            FluentValue::DateTime(date) => {
                bundle.format_datetime(date.epoch_millis, &date.options)
            }
        }
    }

    /// Whether this value, used as a variant key, selects `other`.
    pub fn matches(&self, bundle: &Bundle, other: &FluentValue) -> bool {
        match (self, other) {
            (FluentValue::Number(key), FluentValue::Number(selector)) => {
                key.value == selector.value
            }
            (FluentValue::Symbol(key), FluentValue::Symbol(selector))
            | (FluentValue::Symbol(key), FluentValue::String(selector)) => key == selector,
            (FluentValue::Symbol(key), FluentValue::Number(selector)) => {
                bundle
                    .plural_category(selector.value, &selector.options)
                    .as_str()
                    == key
            }
            _ => false,
        }
    }
}

impl From<&str> for FluentValue {
    fn from(value: &str) -> Self {
        FluentValue::String(value.to_string())
    }
}

impl From<String> for FluentValue {
    fn from(value: String) -> Self {
        FluentValue::String(value)
    }
}

impl From<f64> for FluentValue {
    fn from(value: f64) -> Self {
        FluentValue::Number(FluentNumber::new(value))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{FluentNumber, FluentValue};
    use crate::{Bundle, BundleOptions, FormatterOptions};

    fn bundle() -> Bundle {
        Bundle::new(vec![], BundleOptions::default())
    }

    #[test]
    fn none_renders_name_or_placeholder() {
        let bundle = bundle();
        assert_eq!(FluentValue::named_none("name").format(&bundle), "name");
        assert_eq!(FluentValue::none().format(&bundle), "???");
        assert_eq!(FluentValue::named_none("").format(&bundle), "???");
    }

    #[test]
    fn numbers_format_through_bundle() {
        let bundle = bundle();
        let mut options = FormatterOptions::new();
        options.insert("minimumFractionDigits", 1.0);
        let value = FluentValue::Number(FluentNumber::with_options(3.0, options));
        assert_eq!(value.format(&bundle), "3.0");
    }

    #[test]
    fn symbols_match_strings_and_symbols() {
        let bundle = bundle();
        let key = FluentValue::Symbol(String::from("feminine"));
        assert!(key.matches(&bundle, &FluentValue::from("feminine")));
        assert!(key.matches(&bundle, &FluentValue::Symbol(String::from("feminine"))));
        assert!(!key.matches(&bundle, &FluentValue::from("masculine")));
    }

    #[test]
    fn numbers_match_by_value_only() {
        let bundle = bundle();
        let key = FluentValue::from(1.0);
        assert!(key.matches(&bundle, &FluentValue::from(1.0)));
        assert!(!key.matches(&bundle, &FluentValue::from("1")));
    }

    #[test]
    fn symbols_match_numbers_by_plural_category() {
        let bundle = bundle();
        let other = FluentValue::Symbol(String::from("other"));
        let one = FluentValue::Symbol(String::from("one"));
        assert!(other.matches(&bundle, &FluentValue::from(1.0)));
        assert!(!one.matches(&bundle, &FluentValue::from(1.0)));
    }
}
