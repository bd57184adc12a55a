use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::ast::{
    CallArgument, EntryValue, Expression, FunctionReference, Pattern, PatternElement,
    SelectExpression, VariantKey,
};
use crate::{
    Args, Bundle, EntryKind, FluentDateTime, FluentError, FluentNumber, FluentValue, NamedArgs,
    ResolverError, Value,
};

pub const MAX_PLACEABLE_LENGTH: usize = 2500;
pub const MAX_RESOLVE_DEPTH: usize = 100;

const FSI: char = '\u{2068}';
const PDI: char = '\u{2069}';

/// Something a bundle can format: a whole entry, or one pattern such as an
/// attribute value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Formattable<'a> {
    Entry(&'a EntryValue),
    Pattern(&'a Pattern),
}

impl<'a> From<&'a EntryValue> for Formattable<'a> {
    fn from(entry: &'a EntryValue) -> Self {
        Formattable::Entry(entry)
    }
}

impl<'a> From<&'a Pattern> for Formattable<'a> {
    fn from(pattern: &'a Pattern) -> Self {
        Formattable::Pattern(pattern)
    }
}

/// Resolves `target` to a string. Failures never abort resolution; they are
/// appended to `errors` and a placeholder is rendered in their place.
pub fn resolve(
    bundle: &Bundle,
    args: Option<&Args>,
    target: Formattable<'_>,
    errors: &mut Vec<FluentError>,
) -> String {
    let mut scope = Scope {
        bundle,
        args,
        errors,
        dirty: BTreeSet::new(),
    };
    let value = match target {
        Formattable::Entry(entry) => scope.resolve_entry(entry),
        Formattable::Pattern(pattern) => scope.resolve_pattern(pattern),
    };
    value.format(bundle)
}

struct Scope<'b, 'e> {
    bundle: &'b Bundle,
    args: Option<&'b Args>,
    errors: &'e mut Vec<FluentError>,
    // Addresses of the patterns currently being expanded.
    dirty: BTreeSet<usize>,
}

impl<'b> Scope<'b, '_> {
    fn report(&mut self, error: ResolverError) {
        self.errors.push(FluentError::Resolver(error));
    }

    fn resolve_entry(&mut self, entry: &'b EntryValue) -> FluentValue {
        match entry {
            EntryValue::Text(text) => FluentValue::String(self.bundle.transform(text)),
            EntryValue::Node(node) => match &node.value {
                Some(pattern) => self.resolve_pattern(pattern),
                None => {
                    self.report(ResolverError::NoValue);
                    FluentValue::none()
                }
            },
        }
    }

    fn resolve_pattern(&mut self, pattern: &'b Pattern) -> FluentValue {
        let elements = match pattern {
            Pattern::Text(text) => return FluentValue::String(self.bundle.transform(text)),
            Pattern::Elements(elements) => elements,
        };

        let address = pattern as *const Pattern as usize;
        if self.dirty.contains(&address) {
            self.report(ResolverError::Cyclic);
            return FluentValue::none();
        }
        if self.dirty.len() >= MAX_RESOLVE_DEPTH {
            self.report(ResolverError::TooDeeplyNested {
                max: MAX_RESOLVE_DEPTH,
            });
            return FluentValue::none();
        }
        self.dirty.insert(address);

        let isolate = self.bundle.use_isolating() && elements.len() > 1;
        let mut result = String::new();
        for element in elements {
            let expression = match element {
                PatternElement::Text(text) => {
                    result.push_str(&self.bundle.transform(text));
                    continue;
                }
                PatternElement::Placeable(expression) => expression,
            };

            let part = self.resolve_expression(expression).format(self.bundle);
            if isolate {
                result.push(FSI);
            }
            let length = part.chars().count();
            if length > MAX_PLACEABLE_LENGTH {
                self.report(ResolverError::TooManyCharacters {
                    length,
                    max: MAX_PLACEABLE_LENGTH,
                });
                result.extend(part.chars().take(MAX_PLACEABLE_LENGTH));
            } else {
                result.push_str(&part);
            }
            if isolate {
                result.push(PDI);
            }
        }

        self.dirty.remove(&address);
        FluentValue::String(result)
    }

    fn resolve_expression(&mut self, expression: &'b Expression) -> FluentValue {
        match expression {
            Expression::Number(literal) => FluentValue::Number(FluentNumber::new(literal.value)),
            Expression::String(text) => FluentValue::String(self.bundle.transform(text)),
            Expression::Variable { name } => self.resolve_variable(name),
            Expression::Reference { name } => match self.reference(name) {
                Ok(entry) => self.resolve_entry(entry),
                Err(missing) => missing,
            },
            Expression::Attribute { id, name } => self.resolve_attribute(id, name),
            Expression::Variant { id, key } => self.resolve_variant(id, key),
            Expression::Call { callee, arguments } => self.resolve_call(callee, arguments),
            Expression::Select(select) => self.resolve_select(select),
        }
    }

    fn reference(&mut self, name: &str) -> Result<&'b EntryValue, FluentValue> {
        if let Some(entry) = self.bundle.lookup(name) {
            return Ok(entry);
        }
        let error = match EntryKind::of(name) {
            EntryKind::Term => ResolverError::UnknownTerm(name.into()),
            EntryKind::Message => ResolverError::UnknownMessage(name.into()),
        };
        self.report(error);
        Err(FluentValue::named_none(name))
    }

    fn resolve_attribute(&mut self, id: &str, name: &str) -> FluentValue {
        let entry = match self.reference(id) {
            Ok(entry) => entry,
            Err(missing) => return missing,
        };
        if let Some(pattern) = entry.attribute(name) {
            return self.resolve_pattern(pattern);
        }
        self.report(ResolverError::UnknownAttribute(name.into()));
        self.resolve_entry(entry)
    }

    fn resolve_variant(&mut self, id: &str, key: &VariantKey) -> FluentValue {
        let entry = match self.reference(id) {
            Ok(entry) => entry,
            Err(missing) => return missing,
        };
        let keyword = key_value(key);
        if let Some(list) = entry.value().and_then(Pattern::variant_list) {
            for variant in &list.variants {
                if key_value(&variant.key).matches(self.bundle, &keyword) {
                    return self.resolve_pattern(&variant.value);
                }
            }
        }
        self.report(ResolverError::UnknownVariant(keyword.format(self.bundle)));
        self.resolve_entry(entry)
    }

    fn resolve_select(&mut self, select: &'b SelectExpression) -> FluentValue {
        let Some(selector) = &select.selector else {
            return self.resolve_default(select);
        };
        let selector = self.resolve_expression(selector);
        if selector.is_none() {
            return self.resolve_default(select);
        }
        for variant in &select.variants {
            if key_value(&variant.key).matches(self.bundle, &selector) {
                return self.resolve_pattern(&variant.value);
            }
        }
        self.resolve_default(select)
    }

    fn resolve_default(&mut self, select: &'b SelectExpression) -> FluentValue {
        match select.default_variant() {
            Some(variant) => self.resolve_pattern(&variant.value),
            None => {
                self.report(ResolverError::NoDefault);
                FluentValue::none()
            }
        }
    }

    fn resolve_variable(&mut self, name: &str) -> FluentValue {
        let Some(value) = self.args.and_then(|args| args.get(name)) else {
            self.report(ResolverError::UnknownVariable(name.into()));
            return FluentValue::named_none(name);
        };
        match value {
            Value::Str(text) => FluentValue::String(text.clone()),
            Value::Num(number) => FluentValue::Number(FluentNumber::new(*number)),
            Value::DateTime(epoch_millis) => {
                FluentValue::DateTime(FluentDateTime::new(*epoch_millis))
            }
            Value::Typed(typed) => typed.clone(),
            Value::Bool(_) | Value::Any(_) => {
                self.report(ResolverError::UnsupportedVariableType {
                    name: name.into(),
                    kind: value.kind(),
                });
                FluentValue::named_none(name)
            }
        }
    }

    fn resolve_call(
        &mut self,
        callee: &FunctionReference,
        arguments: &'b [CallArgument],
    ) -> FluentValue {
        let bundle = self.bundle;
        let Some(function) = bundle.function(&callee.name) else {
            self.report(ResolverError::UnknownFunction(callee.name.clone()));
            return FluentValue::named_none(format!("{}()", callee.name));
        };

        let mut positional = Vec::new();
        let mut named = NamedArgs::new();
        for argument in arguments {
            match argument {
                CallArgument::Positional(expression) => {
                    positional.push(self.resolve_expression(expression));
                }
                CallArgument::Named { name, value } => {
                    let value = self.resolve_expression(value);
                    named.insert(name.clone(), value);
                }
            }
        }

        match function.call(&positional, &named) {
            Ok(value) => value,
            Err(error) => {
                self.report(ResolverError::FunctionFailed {
                    name: callee.name.clone(),
                    error,
                });
                FluentValue::none()
            }
        }
    }
}

fn key_value(key: &VariantKey) -> FluentValue {
    match key {
        VariantKey::Number(literal) => FluentValue::Number(FluentNumber::new(literal.value)),
        VariantKey::Keyword(name) => FluentValue::Symbol(name.clone()),
    }
}
