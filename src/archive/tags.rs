//! Time tags in archive path templates.

use chrono::NaiveDateTime;

/// Tag and `chrono` format pairs, replaced in this order.
const TAGS: [(&str, &str); 6] = [
    ("{YYYY}", "%Y"),
    ("{MM}", "%m"),
    ("{DD}", "%d"),
    ("{hh}", "%H"),
    ("{mm}", "%M"),
    ("{ss}", "%S"),
];

/// A string holding time tags such as `{YYYY}` or `{MM}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTemplate(String);

impl TaggedTemplate {
    /// Wraps a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The template with every tag replaced by the matching field of `at`.
    pub fn resolve(&self, at: NaiveDateTime) -> String {
        TAGS.iter().fold(self.0.clone(), |acc, (tag, format)| {
            acc.replace(tag, &at.format(format).to_string())
        })
    }

    /// The raw template.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_resolve_every_tag() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(8, 5, 9).unwrap();
        let template = TaggedTemplate::new("{YYYY}/{MM}/{DD} {hh}:{mm}:{ss} {YYYY}");
        assert_eq!(template.resolve(at), "2024/03/07 08:05:09 2024");
    }

    #[test]
    fn test_resolve_leaves_regex_quantifiers_alone() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let template = TaggedTemplate::new(r"^{YYYY}-{MM}-\d{2}.+");
        assert_eq!(template.resolve(at), r"^2024-03-\d{2}.+");
    }
}
