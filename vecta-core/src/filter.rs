/// Where-filter trees and their query-language rendering
///
/// A filter is either a comparison on a property path or a boolean
/// combination of other filters:
///
/// ```
/// use vecta_core::filter::{Comparator, WhereFilter};
///
/// let filter = WhereFilter::and(vec![
///     WhereFilter::leaf(["wordCount"], Comparator::GreaterThanEqual, 50),
///     WhereFilter::leaf(["title"], Comparator::Like, "apple*"),
/// ]);
///
/// assert_eq!(
///     filter.serialize().unwrap(),
///     r#"{operator: And, operands: [{path: ["wordCount"], operator: GreaterThanEqual, valueInt: 50}, {path: ["title"], operator: Like, valueString: "apple*"}]}"#
/// );
/// ```
///
/// The untyped JSON form used by other clients
/// (`{"operator": "Equal", "path": ["title"], "valueString": "apple"}`) is
/// accepted through `WhereFilter::from_json`.

use crate::error::UsageError;
use crate::literal;
use crate::validation::Checks;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value as Json;
use std::fmt;
use std::str::FromStr;

/// Comparison operators allowed on a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Like,
}

impl Comparator {
    pub fn name(&self) -> &'static str {
        match self {
            Comparator::Equal => "Equal",
            Comparator::NotEqual => "NotEqual",
            Comparator::GreaterThan => "GreaterThan",
            Comparator::GreaterThanEqual => "GreaterThanEqual",
            Comparator::LessThan => "LessThan",
            Comparator::LessThanEqual => "LessThanEqual",
            Comparator::Like => "Like",
        }
    }
}

impl FromStr for Comparator {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Equal" => Ok(Comparator::Equal),
            "NotEqual" => Ok(Comparator::NotEqual),
            "GreaterThan" => Ok(Comparator::GreaterThan),
            "GreaterThanEqual" => Ok(Comparator::GreaterThanEqual),
            "LessThan" => Ok(Comparator::LessThan),
            "LessThanEqual" => Ok(Comparator::LessThanEqual),
            "Like" => Ok(Comparator::Like),
            other => Err(unknown_operator(other)),
        }
    }
}

/// Boolean operators joining several filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn name(&self) -> &'static str {
        match self {
            Connective::And => "And",
            Connective::Or => "Or",
        }
    }
}

impl FromStr for Connective {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "And" => Ok(Connective::And),
            "Or" => Ok(Connective::Or),
            other => Err(unknown_operator(other)),
        }
    }
}

fn unknown_operator(name: &str) -> UsageError {
    UsageError::new(format!("operator '{}' is not a recognized filter operator", name))
}

/// Typed literal compared against a property.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Number(f64),
    String(String),
    Text(String),
    Boolean(bool),
    Date(DateTime<FixedOffset>),
}

const VALUE_KEYS: [&str; 6] = [
    "valueInt",
    "valueNumber",
    "valueString",
    "valueText",
    "valueBoolean",
    "valueDate",
];

impl FilterValue {
    /// The argument key carrying this literal.
    pub fn key(&self) -> &'static str {
        match self {
            FilterValue::Int(_) => "valueInt",
            FilterValue::Number(_) => "valueNumber",
            FilterValue::String(_) => "valueString",
            FilterValue::Text(_) => "valueText",
            FilterValue::Boolean(_) => "valueBoolean",
            FilterValue::Date(_) => "valueDate",
        }
    }

    pub fn render(&self) -> String {
        match self {
            FilterValue::Int(v) => v.to_string(),
            FilterValue::Number(v) => literal::float(*v),
            FilterValue::String(v) | FilterValue::Text(v) => literal::string(v),
            FilterValue::Boolean(v) => v.to_string(),
            FilterValue::Date(v) => literal::string(&v.to_rfc3339()),
        }
    }

    /// Read the literal stored under `key`, checking that the JSON value kind
    /// fits the key.
    fn from_json(key: &str, value: &Json) -> Result<Self, UsageError> {
        let mismatch = |expected: &str| {
            UsageError::new(format!("{} must be {}, got {}", key, expected, value))
        };

        match key {
            "valueInt" => value.as_i64().map(FilterValue::Int).ok_or_else(|| mismatch("an integer")),
            "valueNumber" => value.as_f64().map(FilterValue::Number).ok_or_else(|| mismatch("a number")),
            "valueString" => value
                .as_str()
                .map(|s| FilterValue::String(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            "valueText" => value
                .as_str()
                .map(|s| FilterValue::Text(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            "valueBoolean" => value.as_bool().map(FilterValue::Boolean).ok_or_else(|| mismatch("a boolean")),
            "valueDate" => value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(FilterValue::Date)
                .ok_or_else(|| mismatch("an RFC 3339 date string")),
            other => Err(UsageError::new(format!(
                "'{}' is not a recognized filter value key",
                other
            ))),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Number(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Boolean(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::String(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::String(v)
    }
}

impl From<DateTime<FixedOffset>> for FilterValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        FilterValue::Date(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        FilterValue::Date(v.fixed_offset())
    }
}

/// Filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereFilter {
    Leaf {
        path: Vec<String>,
        operator: Comparator,
        value: FilterValue,
    },
    Combinator {
        operator: Connective,
        operands: Vec<WhereFilter>,
    },
}

impl WhereFilter {
    pub fn leaf<P, S>(path: P, operator: Comparator, value: impl Into<FilterValue>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        WhereFilter::Leaf {
            path: path.into_iter().map(Into::into).collect(),
            operator,
            value: value.into(),
        }
    }

    pub fn and(operands: Vec<WhereFilter>) -> Self {
        WhereFilter::Combinator {
            operator: Connective::And,
            operands,
        }
    }

    pub fn or(operands: Vec<WhereFilter>) -> Self {
        WhereFilter::Combinator {
            operator: Connective::Or,
            operands,
        }
    }

    /// Check structural invariants of the whole tree, reporting every
    /// violation found.
    pub fn validate(&self) -> Result<(), UsageError> {
        self.check_into(Checks::new()).finish(())
    }

    fn check_into(&self, checks: Checks) -> Checks {
        match self {
            WhereFilter::Leaf { path, value, .. } => {
                let finite = match value {
                    FilterValue::Number(n) => n.is_finite(),
                    _ => true,
                };
                checks
                    .check(!path.is_empty(), "where filter path must not be empty")
                    .check(finite, "valueNumber must be a finite number")
            }
            WhereFilter::Combinator { operator, operands } => {
                let checks = checks.check(
                    !operands.is_empty(),
                    format!("operator {} requires at least one operand", operator.name()),
                );
                operands.iter().fold(checks, |acc, op| op.check_into(acc))
            }
        }
    }

    /// Render the tree as query-language argument text.
    pub fn serialize(&self) -> Result<String, UsageError> {
        self.validate()?;
        Ok(self.to_string())
    }

    /// Build a filter from its JSON form.
    pub fn from_json(value: &Json) -> Result<Self, UsageError> {
        let obj = value
            .as_object()
            .ok_or_else(|| UsageError::new(format!("where filter must be an object, got {}", value)))?;

        let operator = obj
            .get("operator")
            .and_then(Json::as_str)
            .ok_or_else(|| UsageError::new("where filter requires an operator"))?;

        if let Ok(connective) = operator.parse::<Connective>() {
            let operands = obj
                .get("operands")
                .and_then(Json::as_array)
                .ok_or_else(|| {
                    UsageError::new(format!("operator {} requires an operands list", operator))
                })?;
            let operands = operands
                .iter()
                .map(WhereFilter::from_json)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(WhereFilter::Combinator {
                operator: connective,
                operands,
            });
        }

        let comparator: Comparator = operator.parse()?;

        let path = obj
            .get("path")
            .and_then(Json::as_array)
            .and_then(|segments| {
                segments
                    .iter()
                    .map(|s| s.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or_else(|| UsageError::new("where filter path must be a list of strings"))?;

        let value_keys: Vec<&String> = obj.keys().filter(|k| k.starts_with("value")).collect();
        let value = match value_keys.as_slice() {
            [key] => FilterValue::from_json(key, &obj[key.as_str()])?,
            [] => {
                return Err(UsageError::new(format!(
                    "where filter requires one of {}",
                    VALUE_KEYS.join(", ")
                )))
            }
            many => {
                let keys: Vec<&str> = many.iter().map(|k| k.as_str()).collect();
                return Err(UsageError::new(format!(
                    "where filter must carry exactly one value key, got {}",
                    keys.join(", ")
                )));
            }
        };

        Ok(WhereFilter::Leaf {
            path,
            operator: comparator,
            value,
        })
    }
}

impl TryFrom<Json> for WhereFilter {
    type Error = UsageError;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        WhereFilter::from_json(&value)
    }
}

impl fmt::Display for WhereFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereFilter::Leaf {
                path,
                operator,
                value,
            } => write!(
                f,
                "{{path: {}, operator: {}, {}: {}}}",
                literal::string_list(path),
                operator.name(),
                value.key(),
                value.render()
            ),
            WhereFilter::Combinator { operator, operands } => {
                write!(f, "{{operator: {}, operands: [", operator.name())?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                f.write_str("]}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn count_value_keys(text: &str) -> usize {
        VALUE_KEYS.iter().map(|k| text.matches(&format!("{}:", k)).count()).sum()
    }

    #[test]
    fn test_leaf_int() {
        let filter = WhereFilter::leaf(["wordCount"], Comparator::GreaterThanEqual, 50);
        let text = filter.serialize().unwrap();
        assert_eq!(
            text,
            r#"{path: ["wordCount"], operator: GreaterThanEqual, valueInt: 50}"#
        );
        assert!(!text.contains("valueNumber"));
        assert!(!text.contains("valueString"));
    }

    #[test]
    fn test_leaf_value_kinds() {
        let number = WhereFilter::leaf(["score"], Comparator::LessThan, 2.0);
        assert!(number.to_string().ends_with("valueNumber: 2.0}"));

        let boolean = WhereFilter::leaf(["published"], Comparator::Equal, true);
        assert!(boolean.to_string().ends_with("valueBoolean: true}"));

        let text = WhereFilter::Leaf {
            path: vec!["body".into()],
            operator: Comparator::Like,
            value: FilterValue::Text("*apple*".into()),
        };
        assert!(text.to_string().ends_with(r#"valueText: "*apple*"}"#));

        let date = DateTime::parse_from_rfc3339("2020-01-01T00:00:00+00:00").unwrap();
        let dated = WhereFilter::leaf(["publishedAt"], Comparator::GreaterThan, date);
        assert!(dated
            .to_string()
            .ends_with(r#"valueDate: "2020-01-01T00:00:00+00:00"}"#));
    }

    #[test]
    fn test_nested_path() {
        let filter = WhereFilter::leaf(["inPublication", "Publication", "name"], Comparator::Equal, "Wired");
        assert_eq!(
            filter.to_string(),
            r#"{path: ["inPublication", "Publication", "name"], operator: Equal, valueString: "Wired"}"#
        );
    }

    #[test]
    fn test_combinator_preserves_operand_order() {
        let filter = WhereFilter::or(vec![
            WhereFilter::leaf(["b"], Comparator::Equal, 2),
            WhereFilter::and(vec![
                WhereFilter::leaf(["a"], Comparator::Equal, 1),
                WhereFilter::leaf(["c"], Comparator::NotEqual, "x"),
            ]),
        ]);
        assert_eq!(
            filter.serialize().unwrap(),
            r#"{operator: Or, operands: [{path: ["b"], operator: Equal, valueInt: 2}, {operator: And, operands: [{path: ["a"], operator: Equal, valueInt: 1}, {path: ["c"], operator: NotEqual, valueString: "x"}]}]}"#
        );
    }

    #[test]
    fn test_empty_operands_rejected() {
        let err = WhereFilter::and(vec![]).serialize().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid usage: operator And requires at least one operand"
        );
    }

    #[test]
    fn test_all_structural_problems_reported() {
        let filter = WhereFilter::or(vec![
            WhereFilter::leaf(Vec::<String>::new(), Comparator::Equal, 1),
            WhereFilter::leaf(["x"], Comparator::Equal, f64::NAN),
        ]);
        let err = filter.validate().unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = "GreaterThanOrEqual".parse::<Comparator>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid usage: operator 'GreaterThanOrEqual' is not a recognized filter operator"
        );
        assert!("and".parse::<Connective>().is_err());
    }

    #[test]
    fn test_from_json_leaf() {
        let filter = WhereFilter::from_json(&json!({
            "operator": "GreaterThanEqual",
            "path": ["wordCount"],
            "valueInt": 50
        }))
        .unwrap();
        assert_eq!(filter, WhereFilter::leaf(["wordCount"], Comparator::GreaterThanEqual, 50));
    }

    #[test]
    fn test_from_json_combinator() {
        let filter: WhereFilter = json!({
            "operator": "And",
            "operands": [
                {"path": ["title"], "valueString": "apple", "operator": "Equal"},
                {"path": ["wordCount"], "valueNumber": 1.5, "operator": "LessThan"}
            ]
        })
        .try_into()
        .unwrap();

        match filter {
            WhereFilter::Combinator { operator, operands } => {
                assert_eq!(operator, Connective::And);
                assert_eq!(operands.len(), 2);
                assert_eq!(
                    operands[1],
                    WhereFilter::leaf(["wordCount"], Comparator::LessThan, 1.5)
                );
            }
            other => panic!("expected combinator, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_value_kind_mismatch() {
        let err = WhereFilter::from_json(&json!({
            "operator": "Equal",
            "path": ["wordCount"],
            "valueInt": "fifty"
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid usage: valueInt must be an integer, got "fifty""#
        );
    }

    #[test]
    fn test_from_json_missing_or_unknown_value_key() {
        let missing = WhereFilter::from_json(&json!({"operator": "Equal", "path": ["a"]})).unwrap_err();
        assert!(missing.to_string().contains("requires one of valueInt"));

        let unknown = WhereFilter::from_json(&json!({
            "operator": "Equal",
            "path": ["a"],
            "valueGeoRange": {}
        }))
        .unwrap_err();
        assert!(unknown
            .to_string()
            .contains("'valueGeoRange' is not a recognized filter value key"));

        let two = WhereFilter::from_json(&json!({
            "operator": "Equal",
            "path": ["a"],
            "valueInt": 1,
            "valueString": "1"
        }))
        .unwrap_err();
        assert!(two.to_string().contains("exactly one value key"));
    }

    #[test]
    fn test_from_json_unknown_operator() {
        let err = WhereFilter::from_json(&json!({
            "operator": "Near",
            "path": ["a"],
            "valueInt": 1
        }))
        .unwrap_err();
        assert!(err.to_string().contains("'Near' is not a recognized filter operator"));
    }

    fn any_value() -> impl Strategy<Value = FilterValue> {
        prop_oneof![
            any::<i64>().prop_map(FilterValue::Int),
            (-1e9f64..1e9f64).prop_map(FilterValue::Number),
            "[a-z ]{0,12}".prop_map(FilterValue::String),
            any::<bool>().prop_map(FilterValue::Boolean),
        ]
    }

    fn any_comparator() -> impl Strategy<Value = Comparator> {
        prop_oneof![
            Just(Comparator::Equal),
            Just(Comparator::NotEqual),
            Just(Comparator::GreaterThan),
            Just(Comparator::GreaterThanEqual),
            Just(Comparator::LessThan),
            Just(Comparator::LessThanEqual),
            Just(Comparator::Like),
        ]
    }

    fn any_filter() -> impl Strategy<Value = WhereFilter> {
        let leaf = (
            proptest::collection::vec("[a-zA-Z]{1,8}", 1..3),
            any_comparator(),
            any_value(),
        )
            .prop_map(|(path, operator, value)| WhereFilter::Leaf { path, operator, value });

        leaf.prop_recursive(3, 16, 4, |inner| {
            (any::<bool>(), proptest::collection::vec(inner, 1..4)).prop_map(|(and, operands)| {
                if and {
                    WhereFilter::and(operands)
                } else {
                    WhereFilter::or(operands)
                }
            })
        })
    }

    fn leaf_count(filter: &WhereFilter) -> usize {
        match filter {
            WhereFilter::Leaf { .. } => 1,
            WhereFilter::Combinator { operands, .. } => operands.iter().map(leaf_count).sum(),
        }
    }

    proptest! {
        #[test]
        fn prop_one_value_key_per_leaf(filter in any_filter()) {
            let text = filter.serialize().unwrap();
            prop_assert_eq!(count_value_keys(&text), leaf_count(&filter));
        }

        #[test]
        fn prop_serialization_is_deterministic(filter in any_filter()) {
            let copy = filter.clone();
            prop_assert_eq!(filter.serialize().unwrap(), copy.serialize().unwrap());
        }
    }
}
