use alloc::vec::Vec;

use crate::LanguageTag;

/// Lookup negotiation: each requested tag is tried as-is, then by dropping
/// subtags from the end. The first supported match wins.
pub fn negotiate_lookup<'a>(
    requested: &[LanguageTag],
    available: &'a [LanguageTag],
) -> Option<&'a LanguageTag> {
    for requested_tag in requested {
        if let Some(found) = find(requested_tag.normalized(), available) {
            return Some(found);
        }

        let mut match_parts: Vec<&str> = requested_tag
            .match_subtags()
            .iter()
            .map(|part| part.as_str())
            .collect();
        while !match_parts.is_empty() {
            let attempt = match_parts.join("-");
            if let Some(found) = find(&attempt, available) {
                return Some(found);
            }
            match_parts.pop();
        }
    }
    None
}

fn find<'a>(tag: &str, available: &'a [LanguageTag]) -> Option<&'a LanguageTag> {
    available
        .iter()
        .find(|candidate| candidate.normalized() == tag)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::negotiate_lookup;
    use crate::LanguageTag;

    fn tag(value: &str) -> LanguageTag {
        LanguageTag::parse(value).expect("valid tag")
    }

    #[test]
    fn lookup_falls_back_by_truncation() {
        let requested = vec![tag("en-GB")];
        let available = vec![tag("en"), tag("fr")];
        let selected = negotiate_lookup(&requested, &available).expect("match");
        assert_eq!(selected.normalized(), "en");
    }

    #[test]
    fn lookup_prefers_exact_private_use_match() {
        let requested = vec![tag("es-PE-x-northperu")];
        let available = vec![tag("es-PE"), tag("es-PE-x-northperu")];
        let selected = negotiate_lookup(&requested, &available).expect("match");
        assert_eq!(selected.normalized(), "es-PE-x-northperu");
    }

    #[test]
    fn lookup_drops_extensions_for_matching() {
        let requested = vec![tag("de-DE-u-co-phonebk")];
        let available = vec![tag("de-DE")];
        let selected = negotiate_lookup(&requested, &available).expect("match");
        assert_eq!(selected.normalized(), "de-DE");
    }

    #[test]
    fn lookup_tries_requested_tags_in_order() {
        let requested = vec![tag("ja-JP"), tag("pl")];
        let available = vec![tag("en"), tag("pl")];
        let selected = negotiate_lookup(&requested, &available).expect("match");
        assert_eq!(selected.normalized(), "pl");
        assert!(negotiate_lookup(&[tag("ja")], &available).is_none());
    }
}
