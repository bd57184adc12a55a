use ftl_i18n_core::{
    BasicFormatBackend, CoreError, CoreResult, DateTimeFormat, FormatBackend, FormatterOptions,
    LanguageTag, NumberFormat, PluralCategory, PluralRules, format_decimal, negotiate_lookup,
};
use intl_pluralrules::{
    PluralCategory as CldrCategory, PluralRuleType, PluralRules as CldrPluralRules,
};
use unic_langid::LanguageIdentifier;

const FALLBACK_LOCALE: &str = "en";
const DEFAULT_MAX_FRACTION_DIGITS: f64 = 3.0;

/// Format backend backed by CLDR plural data. Numbers are grouped with `,`
/// and keep at most three fraction digits unless told otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct CldrFormatBackend;

struct GroupedNumberFormat {
    options: FormatterOptions,
}

impl NumberFormat for GroupedNumberFormat {
    fn format(&self, value: f64) -> String {
        format_decimal(value, &self.options, Some(','))
    }
}

struct CldrRules(CldrPluralRules);

impl PluralRules for CldrRules {
    fn select(&self, value: f64) -> CoreResult<PluralCategory> {
        let category = self.0.select(value).map_err(CoreError::InvalidInput)?;
        Ok(match category {
            CldrCategory::ZERO => PluralCategory::Zero,
            CldrCategory::ONE => PluralCategory::One,
            CldrCategory::TWO => PluralCategory::Two,
            CldrCategory::FEW => PluralCategory::Few,
            CldrCategory::MANY => PluralCategory::Many,
            CldrCategory::OTHER => PluralCategory::Other,
        })
    }
}

impl FormatBackend for CldrFormatBackend {
    fn number_format(
        &self,
        _locales: &[LanguageTag],
        options: &FormatterOptions,
    ) -> CoreResult<Box<dyn NumberFormat>> {
        let mut options = options.clone();
        if options.get("maximumFractionDigits").is_none() {
            options.insert("maximumFractionDigits", DEFAULT_MAX_FRACTION_DIGITS);
        }
        Ok(Box::new(GroupedNumberFormat { options }))
    }

    fn datetime_format(
        &self,
        locales: &[LanguageTag],
        options: &FormatterOptions,
    ) -> CoreResult<Box<dyn DateTimeFormat>> {
        BasicFormatBackend.datetime_format(locales, options)
    }

    fn plural_rules(
        &self,
        locales: &[LanguageTag],
        options: &FormatterOptions,
    ) -> CoreResult<Box<dyn PluralRules>> {
        let ordinal = options.get_str("type") == Some("ordinal");
        let langid = plural_locale(locales, ordinal)?;
        let rules =
            CldrPluralRules::create(langid, rule_type(ordinal)).map_err(CoreError::Unsupported)?;
        Ok(Box::new(CldrRules(rules)))
    }
}

fn rule_type(ordinal: bool) -> PluralRuleType {
    if ordinal {
        PluralRuleType::ORDINAL
    } else {
        PluralRuleType::CARDINAL
    }
}

fn plural_locale(requested: &[LanguageTag], ordinal: bool) -> CoreResult<LanguageIdentifier> {
    let available: Vec<LanguageTag> = CldrPluralRules::get_locales(rule_type(ordinal))
        .iter()
        .filter_map(|langid| LanguageTag::parse(&langid.to_string()).ok())
        .collect();
    let selected = match negotiate_lookup(requested, &available) {
        Some(tag) => tag.normalized().to_string(),
        None => {
            tracing::debug!(
                requested = ?requested.iter().map(LanguageTag::normalized).collect::<Vec<_>>(),
                fallback = FALLBACK_LOCALE,
                "no plural rules for requested locales"
            );
            FALLBACK_LOCALE.to_string()
        }
    };
    selected
        .parse()
        .map_err(|_| CoreError::InvalidInput("plural rules locale is not a valid identifier"))
}
