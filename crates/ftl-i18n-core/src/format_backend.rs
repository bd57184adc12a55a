use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};

use crate::{CoreResult, LanguageTag};

const MAX_FRACTION_DIGITS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatterKind {
    Number,
    DateTime,
    PluralRules,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormatterOptionValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl From<&str> for FormatterOptionValue {
    fn from(value: &str) -> Self {
        FormatterOptionValue::Str(value.to_string())
    }
}

impl From<String> for FormatterOptionValue {
    fn from(value: String) -> Self {
        FormatterOptionValue::Str(value)
    }
}

impl From<f64> for FormatterOptionValue {
    fn from(value: f64) -> Self {
        FormatterOptionValue::Num(value)
    }
}

impl From<bool> for FormatterOptionValue {
    fn from(value: bool) -> Self {
        FormatterOptionValue::Bool(value)
    }
}

/// Options carried by number and date values, keyed by their FTL/Intl names
/// (`minimumFractionDigits`, `type`, `useGrouping`...).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormatterOptions {
    values: BTreeMap<String, FormatterOptionValue>,
}

impl FormatterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FormatterOptionValue>,
    ) -> Option<FormatterOptionValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FormatterOptionValue> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            FormatterOptionValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        match self.values.get(key)? {
            FormatterOptionValue::Num(value) if value.is_finite() && *value >= 0.0 => {
                Some(*value as usize)
            }
            FormatterOptionValue::Str(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            FormatterOptionValue::Bool(value) => Some(*value),
            FormatterOptionValue::Str(value) => match value.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            FormatterOptionValue::Num(_) => None,
        }
    }

    /// Copies every entry of `other` over this one; keys in `other` win.
    pub fn merge(&mut self, other: &FormatterOptions) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormatterOptionValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Stable serialization used to memoize formatters per option set.
    pub fn cache_key(&self) -> String {
        let mut key = String::new();
        for (name, value) in &self.values {
            key.push_str(&format!("{name}={value:?};"));
        }
        key
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

pub trait NumberFormat {
    fn format(&self, value: f64) -> String;
}

pub trait DateTimeFormat {
    fn format(&self, epoch_millis: i64) -> String;
}

pub trait PluralRules {
    fn select(&self, value: f64) -> CoreResult<PluralCategory>;
}

/// Constructs locale-aware formatters. A bundle asks for each formatter once per
/// distinct option set and reuses it afterwards.
pub trait FormatBackend {
    fn number_format(
        &self,
        locales: &[LanguageTag],
        options: &FormatterOptions,
    ) -> CoreResult<Box<dyn NumberFormat>>;

    fn datetime_format(
        &self,
        locales: &[LanguageTag],
        options: &FormatterOptions,
    ) -> CoreResult<Box<dyn DateTimeFormat>>;

    fn plural_rules(
        &self,
        locales: &[LanguageTag],
        options: &FormatterOptions,
    ) -> CoreResult<Box<dyn PluralRules>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BasicFormatBackend;

struct BasicNumberFormat {
    options: FormatterOptions,
}

impl NumberFormat for BasicNumberFormat {
    fn format(&self, value: f64) -> String {
        format_decimal(value, &self.options, None)
    }
}

struct EpochMillisFormat;

impl DateTimeFormat for EpochMillisFormat {
    fn format(&self, epoch_millis: i64) -> String {
        epoch_millis.to_string()
    }
}

struct OtherOnly;

impl PluralRules for OtherOnly {
    fn select(&self, _value: f64) -> CoreResult<PluralCategory> {
        Ok(PluralCategory::Other)
    }
}

impl FormatBackend for BasicFormatBackend {
    fn number_format(
        &self,
        _locales: &[LanguageTag],
        options: &FormatterOptions,
    ) -> CoreResult<Box<dyn NumberFormat>> {
        Ok(Box::new(BasicNumberFormat {
            options: options.clone(),
        }))
    }

    fn datetime_format(
        &self,
        _locales: &[LanguageTag],
        _options: &FormatterOptions,
    ) -> CoreResult<Box<dyn DateTimeFormat>> {
        Ok(Box::new(EpochMillisFormat))
    }

    fn plural_rules(
        &self,
        _locales: &[LanguageTag],
        _options: &FormatterOptions,
    ) -> CoreResult<Box<dyn PluralRules>> {
        Ok(Box::new(OtherOnly))
    }
}

/// Renders `value` as a plain decimal, honouring `minimumFractionDigits`,
/// `maximumFractionDigits` and, when a separator is given, `useGrouping`.
pub fn format_decimal(value: f64, options: &FormatterOptions, separator: Option<char>) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let min = options
        .get_usize("minimumFractionDigits")
        .unwrap_or(0)
        .min(MAX_FRACTION_DIGITS);
    let max = options
        .get_usize("maximumFractionDigits")
        .map(|max| max.min(MAX_FRACTION_DIGITS).max(min));

    let mut text = match max {
        Some(max) => format!("{value:.max$}"),
        None => value.to_string(),
    };

    let (integer, fraction) = match text.find('.') {
        Some(dot) => (text[..dot].to_string(), text[dot + 1..].to_string()),
        None => (text.clone(), String::new()),
    };
    let mut fraction = fraction;
    while fraction.len() > min && fraction.ends_with('0') {
        fraction.pop();
    }
    while fraction.len() < min {
        fraction.push('0');
    }

    let integer = match separator {
        Some(separator) if options.get_bool("useGrouping") != Some(false) => {
            group_digits(&integer, separator)
        }
        _ => integer,
    };

    text.clear();
    text.push_str(&integer);
    if !fraction.is_empty() {
        text.push('.');
        text.push_str(&fraction);
    }
    text
}

fn group_digits(integer: &str, separator: char) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integer),
    };
    let mut grouped = String::with_capacity(integer.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
