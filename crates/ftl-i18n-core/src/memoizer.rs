use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::string::String;
use core::cell::RefCell;

use crate::{
    CoreError, CoreResult, DateTimeFormat, FormatBackend, FormatterKind, FormatterOptions,
    LanguageTag, NumberFormat, PluralRules,
};

type Slot<T> = RefCell<BTreeMap<String, Box<T>>>;

/// Per-bundle formatter cache. Each formatter is constructed at most once per
/// distinct option set.
#[derive(Default)]
pub(crate) struct FormatterCache {
    numbers: Slot<dyn NumberFormat>,
    dates: Slot<dyn DateTimeFormat>,
    plurals: Slot<dyn PluralRules>,
}

impl FormatterCache {
    pub(crate) fn with_number<R>(
        &self,
        backend: &dyn FormatBackend,
        locales: &[LanguageTag],
        options: &FormatterOptions,
        use_formatter: impl FnOnce(&dyn NumberFormat) -> R,
    ) -> CoreResult<R> {
        with_try_get(
            &self.numbers,
            options,
            || backend.number_format(locales, options),
            |formatter| use_formatter(formatter),
        )
    }

    pub(crate) fn with_datetime<R>(
        &self,
        backend: &dyn FormatBackend,
        locales: &[LanguageTag],
        options: &FormatterOptions,
        use_formatter: impl FnOnce(&dyn DateTimeFormat) -> R,
    ) -> CoreResult<R> {
        with_try_get(
            &self.dates,
            options,
            || backend.datetime_format(locales, options),
            |formatter| use_formatter(formatter),
        )
    }

    pub(crate) fn with_plural_rules<R>(
        &self,
        backend: &dyn FormatBackend,
        locales: &[LanguageTag],
        options: &FormatterOptions,
        use_rules: impl FnOnce(&dyn PluralRules) -> R,
    ) -> CoreResult<R> {
        with_try_get(
            &self.plurals,
            options,
            || backend.plural_rules(locales, options),
            |rules| use_rules(rules),
        )
    }

    pub(crate) fn len(&self, kind: FormatterKind) -> usize {
        let len = match kind {
            FormatterKind::Number => self.numbers.try_borrow().map(|map| map.len()),
            FormatterKind::DateTime => self.dates.try_borrow().map(|map| map.len()),
            FormatterKind::PluralRules => self.plurals.try_borrow().map(|map| map.len()),
        };
        len.unwrap_or(0)
    }
}

fn with_try_get<T: ?Sized, R>(
    slot: &Slot<T>,
    options: &FormatterOptions,
    construct: impl FnOnce() -> CoreResult<Box<T>>,
    use_formatter: impl FnOnce(&T) -> R,
) -> CoreResult<R> {
    let mut map = slot
        .try_borrow_mut()
        .map_err(|_| CoreError::Internal("formatter cache used reentrantly"))?;
    let formatter = match map.entry(options.cache_key()) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => entry.insert(construct()?),
    };
    Ok(use_formatter(&**formatter))
}
