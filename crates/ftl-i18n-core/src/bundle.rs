use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::builtins::{self, Callee};
use crate::memoizer::FormatterCache;
use crate::{
    Args, BasicFormatBackend, EntryKind, EntryValue, FluentError, FluentFunction, FormatBackend,
    Formattable, FormatterKind, FormatterOptions, LanguageTag, Pattern, PluralCategory, Resource,
    parse_resource, resolve,
};

/// Applied to every piece of literal text before it is written out.
pub type Transform = fn(&str) -> Cow<'_, str>;

pub struct BundleOptions {
    /// Custom functions. These shadow the `NUMBER` and `DATETIME` builtins.
    pub functions: BTreeMap<String, FluentFunction>,
    /// Wrap placeables of mixed patterns in FSI/PDI marks.
    pub use_isolating: bool,
    pub transform: Option<Transform>,
    /// Number, date and plural formatting. The default [`BasicFormatBackend`]
    /// has no locale data and selects `other` for every number, so `[one]`
    /// variants never match. Use `CldrFormatBackend` from `ftl-i18n-runtime`
    /// or another [`FormatBackend`] for real plural rules.
    pub backend: Box<dyn FormatBackend>,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            functions: BTreeMap::new(),
            use_isolating: true,
            transform: None,
            backend: Box::new(BasicFormatBackend),
        }
    }
}

impl BundleOptions {
    pub fn with_function(mut self, name: impl Into<String>, function: FluentFunction) -> Self {
        self.functions.insert(name.into(), function);
        self
    }

    pub fn with_backend(mut self, backend: impl FormatBackend + 'static) -> Self {
        self.backend = Box::new(backend);
        self
    }
}

/// A set of messages and terms for one locale chain, plus the functions and
/// formatters used to resolve them.
pub struct Bundle {
    locales: Vec<LanguageTag>,
    messages: BTreeMap<String, EntryValue>,
    terms: BTreeMap<String, EntryValue>,
    functions: BTreeMap<String, FluentFunction>,
    use_isolating: bool,
    transform: Option<Transform>,
    backend: Box<dyn FormatBackend>,
    formatters: FormatterCache,
}

impl Bundle {
    pub fn new(locales: Vec<LanguageTag>, options: BundleOptions) -> Self {
        Self {
            locales,
            messages: BTreeMap::new(),
            terms: BTreeMap::new(),
            functions: options.functions,
            use_isolating: options.use_isolating,
            transform: options.transform,
            backend: options.backend,
            formatters: FormatterCache::default(),
        }
    }

    pub fn locales(&self) -> &[LanguageTag] {
        &self.locales
    }

    pub fn use_isolating(&self) -> bool {
        self.use_isolating
    }

    /// Adds every entry of `resource`. Existing messages and terms are never
    /// replaced; each collision is reported as an `Overriding` error after the
    /// resource's own parse errors.
    pub fn add_resource(&mut self, resource: Resource) -> Vec<FluentError> {
        let mut errors: Vec<FluentError> =
            resource.errors.into_iter().map(FluentError::from).collect();
        for (id, entry) in resource.entries {
            let kind = EntryKind::of(&id);
            let table = match kind {
                EntryKind::Term => &mut self.terms,
                EntryKind::Message => &mut self.messages,
            };
            match table.entry(id) {
                Entry::Occupied(existing) => errors.push(FluentError::Overriding {
                    kind,
                    id: existing.key().clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }
        errors
    }

    pub fn add_messages(&mut self, source: &str) -> Vec<FluentError> {
        self.add_resource(parse_resource(source))
    }

    pub fn has_message(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    pub fn get_message(&self, id: &str) -> Option<&EntryValue> {
        self.messages.get(id)
    }

    pub fn messages(&self) -> impl Iterator<Item = (&str, &EntryValue)> {
        self.messages.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Formats a message or a single pattern. Returns `None` for a message
    /// without a value; resolution failures go to `errors` and never abort.
    pub fn format<'a>(
        &self,
        target: impl Into<Formattable<'a>>,
        args: Option<&Args>,
        errors: &mut Vec<FluentError>,
    ) -> Option<String> {
        let target = target.into();
        match target {
            Formattable::Entry(EntryValue::Text(text))
            | Formattable::Pattern(Pattern::Text(text)) => Some(self.transform(text)),
            Formattable::Entry(EntryValue::Node(node)) => match &node.value {
                None => None,
                Some(Pattern::Text(text)) => Some(self.transform(text)),
                Some(pattern) => Some(resolve(self, args, pattern.into(), errors)),
            },
            Formattable::Pattern(_) => Some(resolve(self, args, target, errors)),
        }
    }

    /// Number of formatters of `kind` constructed so far.
    pub fn cached_formatters(&self, kind: FormatterKind) -> usize {
        self.formatters.len(kind)
    }

    pub(crate) fn lookup(&self, id: &str) -> Option<&EntryValue> {
        match EntryKind::of(id) {
            EntryKind::Term => self.terms.get(id),
            EntryKind::Message => self.messages.get(id),
        }
    }

    pub(crate) fn transform(&self, text: &str) -> String {
        match self.transform {
            Some(transform) => transform(text).into_owned(),
            None => text.to_string(),
        }
    }

    pub(crate) fn function(&self, name: &str) -> Option<Callee<'_>> {
        if let Some(function) = self.functions.get(name) {
            return Some(Callee::Custom(function));
        }
        builtins::lookup(name).map(Callee::Builtin)
    }

    pub(crate) fn format_number(&self, value: f64, options: &FormatterOptions) -> String {
        self.formatters
            .with_number(&*self.backend, &self.locales, options, |formatter| {
                formatter.format(value)
            })
            .unwrap_or_else(|_| value.to_string())
    }

    pub(crate) fn format_datetime(&self, epoch_millis: i64, options: &FormatterOptions) -> String {
        self.formatters
            .with_datetime(&*self.backend, &self.locales, options, |formatter| {
                formatter.format(epoch_millis)
            })
            .unwrap_or_else(|_| epoch_millis.to_string())
    }

    pub(crate) fn plural_category(&self, value: f64, options: &FormatterOptions) -> PluralCategory {
        self.formatters
            .with_plural_rules(&*self.backend, &self.locales, options, |rules| {
                rules.select(value)
            })
            .and_then(|category| category)
            .unwrap_or(PluralCategory::Other)
    }
}
