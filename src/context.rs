//! Collaborators injected into every edit
//!
//! The engine never formats user text or decides what is geographic on its
//! own: warning text comes from a [`Catalog`], warnings are pushed into a
//! [`WarningSink`], and geo-field detection asks a [`GeoLookup`].

use std::collections::HashSet;

use tracing::debug;

use crate::config::EngineConfig;

/// Localization lookup used to build warning text
pub trait Catalog {
    /// Translate `key`, substituting `{0}`, `{1}`, ... with `args`
    fn translate(&self, key: &str, args: &[&str]) -> String;
}

/// English templates for every warning the engine emits
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl DefaultCatalog {
    fn template(key: &str) -> Option<&'static str> {
        let template = match key {
            "measure.dropped" => "Measure {0} is not supported by {1} charts and was removed",
            "field.dropped" => "Field {0} cannot be placed in a {1} chart and was removed",
            "aesthetic.dropped" => {
                "Field {0} on {1} is not supported by {2} charts and was removed"
            }
            "namedgroup.unsupported" => {
                "Named group on {0} is not supported by {1} charts and was cleared"
            }
            "sort.reset" => "Sort of {0} by {1} was reset because {1} is no longer bound",
            "ranking.reset" => "Ranking of {0} by {1} was reset because {1} is no longer bound",
            "calculator.reset" => "Calculation on {0} no longer refers to {1} and was reset",
            "calculator.unsupported" => {
                "Calculation on {0} is not supported by {1} charts and was cleared"
            }
            "highlight.dropped" => "Highlights and hyperlinks are not kept for {0} charts",
            _ => return None,
        };
        Some(template)
    }
}

impl Catalog for DefaultCatalog {
    fn translate(&self, key: &str, args: &[&str]) -> String {
        match Self::template(key) {
            Some(template) => fill_template(template, args),
            None if args.is_empty() => key.to_string(),
            None => format!("{}: {}", key, args.join(", ")),
        }
    }
}

fn fill_template(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (i, arg)| {
            text.replace(&format!("{{{}}}", i), arg)
        })
}

/// Append-only channel for user-facing warnings
pub trait WarningSink {
    fn emit_warning(&mut self, message: String);
}

impl WarningSink for Vec<String> {
    fn emit_warning(&mut self, message: String) {
        self.push(message);
    }
}

/// Read-only geographic lookup
pub trait GeoLookup {
    /// Whether values of `column` look like geographic names
    fn is_geographic(&self, column: &str) -> bool;
}

/// Classifies columns as geographic by well-known name fragments
#[derive(Debug, Clone)]
pub struct KeywordGeoLookup {
    keywords: Vec<String>,
}

impl KeywordGeoLookup {
    pub const DEFAULT_KEYWORDS: &'static [&'static str] = &[
        "state", "country", "city", "zip", "postal", "province", "county", "region",
    ];

    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }
}

impl Default for KeywordGeoLookup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEYWORDS.iter().copied())
    }
}

impl GeoLookup for KeywordGeoLookup {
    fn is_geographic(&self, column: &str) -> bool {
        let column = column.to_lowercase();
        self.keywords.iter().any(|k| column.contains(k.as_str()))
    }
}

/// Lookup that never classifies anything as geographic
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeoLookup;

impl GeoLookup for NoGeoLookup {
    fn is_geographic(&self, _column: &str) -> bool {
        false
    }
}

/// Where the edit that triggered normalization came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditOrigin {
    /// Edited through an axis channel; axis settings win
    #[default]
    Axis,
    /// Edited through a legend; aesthetic settings win
    Legend,
}

/// Everything one edit needs besides the binding itself
pub struct EditContext<'a> {
    pub config: EngineConfig,
    pub origin: EditOrigin,
    catalog: &'a dyn Catalog,
    geo: &'a dyn GeoLookup,
    sink: &'a mut dyn WarningSink,
    emitted: HashSet<String>,
}

impl<'a> EditContext<'a> {
    pub fn new(
        config: EngineConfig,
        catalog: &'a dyn Catalog,
        geo: &'a dyn GeoLookup,
        sink: &'a mut dyn WarningSink,
    ) -> Self {
        Self {
            config,
            origin: EditOrigin::Axis,
            catalog,
            geo,
            sink,
            emitted: HashSet::new(),
        }
    }

    pub fn with_origin(mut self, origin: EditOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Emit a translated warning once per distinct message
    pub fn warn(&mut self, key: &str, args: &[&str]) {
        let message = self.catalog.translate(key, args);
        if self.emitted.insert(message.clone()) {
            debug!(key, %message, "warning");
            self.sink.emit_warning(message);
        }
    }

    pub fn is_geographic(&self, column: &str) -> bool {
        self.geo.is_geographic(column)
    }

    /// Number of warnings emitted through this context
    pub fn warning_count(&self) -> usize {
        self.emitted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_fills_arguments() {
        let text = DefaultCatalog.translate("measure.dropped", &["Sum(Profit)", "waterfall"]);
        assert_eq!(
            text,
            "Measure Sum(Profit) is not supported by waterfall charts and was removed"
        );

        let repeated = DefaultCatalog.translate("sort.reset", &["Region", "Sum(Sales)"]);
        assert_eq!(
            repeated,
            "Sort of Region by Sum(Sales) was reset because Sum(Sales) is no longer bound"
        );
    }

    #[test]
    fn test_default_catalog_unknown_key() {
        assert_eq!(DefaultCatalog.translate("custom.key", &[]), "custom.key");
        assert_eq!(DefaultCatalog.translate("custom.key", &["a", "b"]), "custom.key: a, b");
    }

    #[test]
    fn test_context_deduplicates_warnings() {
        let mut sink: Vec<String> = Vec::new();
        {
            let mut ctx = EditContext::new(
                EngineConfig::default(),
                &DefaultCatalog,
                &NoGeoLookup,
                &mut sink,
            );
            ctx.warn("measure.dropped", &["Sum(A)", "pie"]);
            ctx.warn("measure.dropped", &["Sum(A)", "pie"]);
            ctx.warn("measure.dropped", &["Sum(B)", "pie"]);
            assert_eq!(ctx.warning_count(), 2);
        }
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_keyword_geo_lookup() {
        let geo = KeywordGeoLookup::default();
        assert!(geo.is_geographic("State"));
        assert!(geo.is_geographic("customer_country"));
        assert!(geo.is_geographic("ZipCode"));
        assert!(!geo.is_geographic("Product"));
        assert!(!NoGeoLookup.is_geographic("State"));

        let custom = KeywordGeoLookup::new(["Territory"]);
        assert!(custom.is_geographic("sales_territory"));
        assert!(!custom.is_geographic("State"));
    }
}
