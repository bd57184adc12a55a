use std::collections::BTreeMap;

use ftl_i18n_core::{Args, Bundle, BundleOptions, EntryValue, FluentError, LanguageTag};

use crate::backend::CldrFormatBackend;
use crate::config::StoreConfig;
use crate::error::RuntimeResult;
use crate::source::ResourceSource;

type OptionsFactory = Box<dyn Fn() -> BundleOptions>;

/// Bundles keyed by (locale, namespace). A bundle is rebuilt from scratch
/// whenever its resource is (re)added.
pub struct BundleStore {
    config: StoreConfig,
    bundles: BTreeMap<(String, String), Bundle>,
    options: OptionsFactory,
}

impl BundleStore {
    /// A store whose bundles use the CLDR backend and the configured isolation.
    pub fn new(config: StoreConfig) -> Self {
        let use_isolating = config.use_isolating;
        Self::with_options(config, move || BundleOptions {
            use_isolating,
            ..BundleOptions::default().with_backend(CldrFormatBackend)
        })
    }

    /// A store that builds each bundle's options with `options`.
    pub fn with_options(config: StoreConfig, options: impl Fn() -> BundleOptions + 'static) -> Self {
        Self {
            config,
            bundles: BTreeMap::new(),
            options: Box::new(options),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Parses `text` into a fresh bundle for (`locale`, `namespace`), replacing
    /// any previous one. Parse and collision errors are logged and returned.
    pub fn create_bundle(
        &mut self,
        locale: &str,
        namespace: &str,
        text: &str,
    ) -> RuntimeResult<Vec<FluentError>> {
        let tag = LanguageTag::parse(locale)?;
        let key = (tag.normalized().to_string(), namespace.to_string());
        let mut bundle = Bundle::new(vec![tag], (self.options)());
        let errors = bundle.add_messages(&dedent_resource(text));
        for error in &errors {
            tracing::warn!(
                locale = key.0.as_str(),
                namespace,
                error = %error,
                "ftl resource error"
            );
        }
        tracing::debug!(
            locale = key.0.as_str(),
            namespace,
            messages = bundle.messages().count(),
            "bundle created"
        );
        self.bundles.insert(key, bundle);
        Ok(errors)
    }

    /// Rebuilds the bundle for (`locale`, `namespace`) from `source`. Returns
    /// `false` when the source has no resource for the pair.
    pub fn on_added(
        &mut self,
        source: &dyn ResourceSource,
        locale: &str,
        namespace: &str,
    ) -> RuntimeResult<bool> {
        let Some(text) = source.ftl_text(locale, namespace)? else {
            tracing::debug!(locale, namespace, "no ftl resource");
            return Ok(false);
        };
        self.create_bundle(locale, namespace, &text)?;
        Ok(true)
    }

    /// Loads every namespace of every language. Configured preload languages
    /// are loaded last. An empty `namespaces` means the default namespace.
    pub fn load_all(
        &mut self,
        source: &dyn ResourceSource,
        languages: &[&str],
        namespaces: &[&str],
    ) -> RuntimeResult<usize> {
        let namespaces: Vec<String> = if namespaces.is_empty() {
            vec![self.config.default_namespace.clone()]
        } else {
            namespaces.iter().map(|ns| ns.to_string()).collect()
        };
        let preload = self.config.preload.clone();
        let order: Vec<&str> = languages
            .iter()
            .copied()
            .filter(|language| !preload.iter().any(|preloaded| preloaded == language))
            .chain(preload.iter().map(String::as_str))
            .collect();

        let mut loaded = 0;
        for language in order {
            for namespace in &namespaces {
                if self.on_added(source, language, namespace)? {
                    loaded += 1;
                }
            }
        }
        tracing::debug!(loaded, "bundles loaded");
        Ok(loaded)
    }

    pub fn bundle(&self, locale: &str, namespace: &str) -> Option<&Bundle> {
        let tag = LanguageTag::parse(locale).ok()?;
        self.bundles
            .get(&(tag.normalized().to_string(), namespace.to_string()))
    }

    /// Looks up the message for `key`; for `message.attribute` keys, the part
    /// before the dot names the message.
    pub fn get_message(&self, locale: &str, namespace: &str, key: &str) -> Option<&EntryValue> {
        let (id, _) = split_key(key);
        self.bundle(locale, namespace)?.get_message(id)
    }

    /// Formats `key`, falling back to the key itself when the bundle, message
    /// or attribute does not exist.
    pub fn translate(
        &self,
        locale: &str,
        namespace: &str,
        key: &str,
        args: Option<&Args>,
    ) -> String {
        let Some(bundle) = self.bundle(locale, namespace) else {
            tracing::warn!(locale, namespace, key, "no bundle for translation");
            return key.to_string();
        };
        let (id, attribute) = split_key(key);
        let Some(entry) = bundle.get_message(id) else {
            tracing::warn!(locale, namespace, key, "missing message");
            return key.to_string();
        };

        let mut errors = Vec::new();
        let formatted = match attribute {
            Some(name) => match entry.attribute(name) {
                Some(pattern) => bundle.format(pattern, args, &mut errors),
                None => None,
            },
            None => bundle.format(entry, args, &mut errors),
        };
        if !errors.is_empty() {
            tracing::warn!(
                locale,
                namespace,
                key,
                errors = ?errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "errors while formatting"
            );
        }
        formatted.unwrap_or_else(|| {
            tracing::warn!(locale, namespace, key, "message has no value");
            key.to_string()
        })
    }
}

fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('.') {
        Some((id, attribute)) => (id, Some(attribute.split('.').next().unwrap_or(attribute))),
        None => (key, None),
    }
}

/// Drops blank lines and strips the indentation shared by the remaining ones.
pub fn dedent_resource(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();
    let common = lines
        .iter()
        .map(|line| line.chars().take_while(|ch| ch.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| {
            let offset = line
                .char_indices()
                .nth(common)
                .map_or(line.len(), |(index, _)| index);
            &line[offset..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}
