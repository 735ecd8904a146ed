//! Deklarative Filter-Ausdrücke für Layer (Definition-Expressions).
//!
//! Jeder Layer hat genau einen Filter-Slot. Ein neuer Ausdruck ersetzt den
//! alten vollständig; Prädikate werden nie verkettet.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use super::{Feature, FeatureId};

static TAUTOLOGY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*1\s*=\s*1\s*$").expect("gültige Regex"));
static CONTRADICTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*1\s*=\s*0\s*$").expect("gültige Regex"));
static EQUALS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*'((?:[^']|'')*)'\s*$").expect("gültige Regex")
});
static ID_IN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([A-Za-z_][A-Za-z0-9_]*)\s+IN\s*\(([^)]*)\)\s*$").expect("gültige Regex")
});

/// Fehler beim Parsen eines Filter-Strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterParseError {
    /// Ausdruck entspricht keiner unterstützten Form
    #[error("Nicht unterstützter Filter-Ausdruck: '{0}'")]
    Unsupported(String),
    /// ID-Liste enthält einen nicht-numerischen Eintrag
    #[error("Ungültige Feature-ID '{0}' in IN-Liste")]
    InvalidId(String),
}

/// Typisierter Inhalt des Filter-Slots eines Layers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterExpression {
    /// Tautologie `1=1`: alle Features sichtbar
    #[default]
    All,
    /// Kontradiktion `1=0`: kein Feature sichtbar
    Nothing,
    /// `field = 'value'`
    FieldEquals {
        /// Attributname
        field: String,
        /// Vergleichswert (unescaped)
        value: String,
    },
    /// `field IN (id, id, …)`, IDs sortiert und dedupliziert
    IdIn {
        /// Feld mit der stabilen Feature-ID
        field: String,
        /// Ausgewählte IDs (sortiert, eindeutig, nie leer)
        ids: Vec<FeatureId>,
    },
}

impl FilterExpression {
    /// Gleichheitsfilter auf ein Textfeld.
    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterExpression::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// ID-Auswahl. Eine leere ID-Menge ergibt `1=0`.
    pub fn id_in(field: impl Into<String>, ids: impl IntoIterator<Item = FeatureId>) -> Self {
        let mut ids: Vec<FeatureId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return FilterExpression::Nothing;
        }
        FilterExpression::IdIn {
            field: field.into(),
            ids,
        }
    }

    /// `true`, wenn der Ausdruck keine Features ausschließt.
    pub fn is_tautology(&self) -> bool {
        matches!(self, FilterExpression::All)
    }

    /// Wertet den Ausdruck gegen die Attribute eines Features aus.
    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            FilterExpression::All => true,
            FilterExpression::Nothing => false,
            FilterExpression::FieldEquals { field, value } => feature
                .attribute(field)
                .is_some_and(|attr| attr.to_string() == *value),
            FilterExpression::IdIn { field, ids } => feature
                .id(field)
                .is_some_and(|id| ids.binary_search(&id).is_ok()),
        }
    }

    /// Parst die deklarative String-Form.
    pub fn parse(input: &str) -> Result<Self, FilterParseError> {
        if TAUTOLOGY_RE.is_match(input) {
            return Ok(FilterExpression::All);
        }
        if CONTRADICTION_RE.is_match(input) {
            return Ok(FilterExpression::Nothing);
        }
        if let Some(caps) = EQUALS_RE.captures(input) {
            return Ok(FilterExpression::field_equals(
                &caps[1],
                caps[2].replace("''", "'"),
            ));
        }
        if let Some(caps) = ID_IN_RE.captures(input) {
            let ids = caps[2]
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<FeatureId>()
                        .map_err(|_| FilterParseError::InvalidId(part.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(FilterExpression::id_in(&caps[1], ids));
        }
        Err(FilterParseError::Unsupported(input.to_string()))
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::All => f.write_str("1=1"),
            FilterExpression::Nothing => f.write_str("1=0"),
            FilterExpression::FieldEquals { field, value } => {
                write!(f, "{field} = '{}'", value.replace('\'', "''"))
            }
            FilterExpression::IdIn { field, ids } => {
                let list = ids
                    .iter()
                    .map(FeatureId::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{field} IN ({list})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    fn station(id: i64, region: &str) -> Feature {
        Feature::new("stations", Point::new(0.0, 0.0))
            .with_attribute("OBJECTID", id)
            .with_attribute("region", region)
    }

    #[test]
    fn region_filter_renders_declarative_string() {
        let expr = FilterExpression::field_equals("region", "Casablanca-Settat");
        assert_eq!(expr.to_string(), "region = 'Casablanca-Settat'");
    }

    #[test]
    fn quotes_in_values_are_doubled_and_parsed_back() {
        let expr = FilterExpression::field_equals("region", "l'Oriental");
        let rendered = expr.to_string();
        assert_eq!(rendered, "region = 'l''Oriental'");
        assert_eq!(FilterExpression::parse(&rendered), Ok(expr));
    }

    #[test]
    fn id_in_sorts_dedups_and_collapses_empty_set() {
        let expr = FilterExpression::id_in("OBJECTID", [7, 3, 7, 5]);
        assert_eq!(expr.to_string(), "OBJECTID IN (3,5,7)");
        assert_eq!(
            FilterExpression::id_in("OBJECTID", Vec::new()),
            FilterExpression::Nothing
        );
    }

    #[test]
    fn parse_accepts_all_supported_forms() {
        assert_eq!(FilterExpression::parse("1=1"), Ok(FilterExpression::All));
        assert_eq!(FilterExpression::parse(" 1 = 0 "), Ok(FilterExpression::Nothing));
        assert_eq!(
            FilterExpression::parse("OBJECTID in (4, 2)"),
            Ok(FilterExpression::id_in("OBJECTID", [2, 4]))
        );
        assert!(matches!(
            FilterExpression::parse("OBJECTID IN (1,x)"),
            Err(FilterParseError::InvalidId(_))
        ));
        assert!(matches!(
            FilterExpression::parse("capacity > 10"),
            Err(FilterParseError::Unsupported(_))
        ));
    }

    #[test]
    fn matches_evaluates_against_attributes() {
        let casa = station(1, "Casablanca-Settat");
        let rabat = station(2, "Rabat-Salé-Kénitra");

        let by_region = FilterExpression::field_equals("region", "Casablanca-Settat");
        assert!(by_region.matches(&casa));
        assert!(!by_region.matches(&rabat));

        let by_id = FilterExpression::id_in("OBJECTID", [2]);
        assert!(!by_id.matches(&casa));
        assert!(by_id.matches(&rabat));

        assert!(FilterExpression::All.matches(&casa));
        assert!(!FilterExpression::Nothing.matches(&casa));
    }
}
