/// REST path assembly
///
/// Object paths are rooted at the kind collection (`/things`, `/actions`).
/// Id-addressed operations append the id, reference operations append
/// `/references/{property}`. List and get operations take an `include=`
/// parameter built from the enrichment toggles, plus an optional `limit=`.

use crate::kind::Kind;
use serde::{Deserialize, Serialize};

/// Optional computed properties a read may ask the server to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Include {
    Vector,
    Classification,
    Interpretation,
    NearestNeighbors,
    FeatureProjection,
}

impl Include {
    /// Token placed in the `include=` parameter.
    pub fn token(&self) -> &'static str {
        match self {
            Include::Vector => "vector",
            Include::Classification => "classification",
            Include::Interpretation => "interpretation",
            Include::NearestNeighbors => "nearestNeighbors",
            Include::FeatureProjection => "featureProjection",
        }
    }
}

/// Enabled enrichment toggles, kept in the order they were enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Includes {
    enabled: Vec<Include>,
}

impl Includes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a toggle. Enabling one twice keeps its first position.
    pub fn with(mut self, include: Include) -> Self {
        if !self.enabled.contains(&include) {
            self.enabled.push(include);
        }
        self
    }

    pub fn contains(&self, include: Include) -> bool {
        self.enabled.contains(&include)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Include> + '_ {
        self.enabled.iter().copied()
    }

    /// Comma-joined tokens, or `None` when nothing is enabled.
    pub fn to_param(&self) -> Option<String> {
        if self.enabled.is_empty() {
            return None;
        }
        let tokens: Vec<&str> = self.enabled.iter().map(Include::token).collect();
        Some(tokens.join(","))
    }
}

/// Query-string parameters shared by list and get operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadParams {
    pub includes: Includes,
    pub limit: Option<u32>,
}

impl ReadParams {
    /// Render `include=...&limit=...`, omitting absent parts.
    pub fn to_query_string(&self) -> Option<String> {
        let mut params = Vec::new();
        if let Some(include) = self.includes.to_param() {
            params.push(format!("include={}", include));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }

        if params.is_empty() {
            None
        } else {
            Some(params.join("&"))
        }
    }

    /// Append the query string to `path`, if there is one.
    pub fn apply(&self, path: String) -> String {
        match self.to_query_string() {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        }
    }
}

/// Whether `value` can stand alone as one path segment. Ids, reference
/// properties and class names are spliced into paths unencoded, so anything
/// that would leave the segment or start a query string is refused.
pub fn is_single_segment(value: &str) -> bool {
    !value.contains(&['/', '\\', '?', '#'][..]) && !value.contains("..")
}

/// Validation message for a `field` that is not a single segment.
pub fn segment_message(field: &str) -> String {
    format!("{} must not contain '/', '?', '#' or '..'", field)
}

/// `/{kind}` - create and list
pub fn collection(kind: Kind) -> String {
    format!("/{}", kind.as_str())
}

/// `/{kind}/{id}` - get, update, merge, delete
pub fn object(kind: Kind, id: &str) -> String {
    format!("/{}/{}", kind.as_str(), id)
}

/// `/{kind}/validate`
pub fn validate(kind: Kind) -> String {
    format!("/{}/validate", kind.as_str())
}

/// `/{kind}/{id}/references/{property}`
pub fn references(kind: Kind, id: &str, property: &str) -> String {
    format!("{}/references/{}", object(kind, id), property)
}

/// `/schema`
pub fn schema() -> String {
    "/schema".to_string()
}

/// `/schema/{kind}` - class creation
pub fn schema_kind(kind: Kind) -> String {
    format!("/schema/{}", kind.as_str())
}

/// `/schema/{kind}/{className}` - class deletion
pub fn schema_class(kind: Kind, class_name: &str) -> String {
    format!("/schema/{}/{}", kind.as_str(), class_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_object_paths() {
        assert_eq!(collection(Kind::Things), "/things");
        assert_eq!(object(Kind::Actions, "abc"), "/actions/abc");
        assert_eq!(validate(Kind::Things), "/things/validate");
        assert_eq!(
            references(Kind::Things, "599a0c64", "refProp"),
            "/things/599a0c64/references/refProp"
        );
    }

    #[test]
    fn test_hostile_ids_are_not_single_segments() {
        for id in [
            "../schema/things/Article",
            "abc?include=vector&x=",
            "abc#frag",
            "a/b",
            "..",
            "a\\b",
        ] {
            assert!(!is_single_segment(id), "{} accepted", id);
        }
        for id in ["599a0c64-4b5c-4d28-a5c3-0ec2c8e6a2b1", "Article", "refProp", "a.b"] {
            assert!(is_single_segment(id), "{} rejected", id);
        }
        assert_eq!(
            segment_message("id"),
            "id must not contain '/', '?', '#' or '..'"
        );
    }

    #[test]
    fn test_schema_paths() {
        assert_eq!(schema(), "/schema");
        assert_eq!(schema_kind(Kind::Actions), "/schema/actions");
        assert_eq!(schema_class(Kind::Things, "Article"), "/schema/things/Article");
    }

    #[test]
    fn test_list_with_limit_and_two_toggles() {
        let params = ReadParams {
            includes: Includes::new()
                .with(Include::Vector)
                .with(Include::Classification),
            limit: Some(2),
        };
        assert_eq!(
            params.apply(collection(Kind::Things)),
            "/things?include=vector,classification&limit=2"
        );
    }

    #[test]
    fn test_no_params_no_question_mark() {
        assert_eq!(ReadParams::default().apply("/things".into()), "/things");

        let limit_only = ReadParams {
            includes: Includes::new(),
            limit: Some(5),
        };
        assert_eq!(limit_only.to_query_string().as_deref(), Some("limit=5"));
    }

    #[test]
    fn test_duplicate_toggle_keeps_first_position() {
        let includes = Includes::new()
            .with(Include::NearestNeighbors)
            .with(Include::Vector)
            .with(Include::NearestNeighbors);
        assert_eq!(includes.to_param().as_deref(), Some("nearestNeighbors,vector"));
    }

    fn any_include() -> impl Strategy<Value = Include> {
        prop_oneof![
            Just(Include::Vector),
            Just(Include::Classification),
            Just(Include::Interpretation),
            Just(Include::NearestNeighbors),
            Just(Include::FeatureProjection),
        ]
    }

    proptest! {
        #[test]
        fn prop_include_tokens_once_in_enablement_order(toggles in proptest::collection::vec(any_include(), 0..12)) {
            let includes = toggles.iter().fold(Includes::new(), |acc, t| acc.with(*t));

            let mut expected: Vec<&str> = Vec::new();
            for t in &toggles {
                if !expected.contains(&t.token()) {
                    expected.push(t.token());
                }
            }

            match includes.to_param() {
                None => prop_assert!(expected.is_empty()),
                Some(param) => {
                    let got: Vec<&str> = param.split(',').collect();
                    prop_assert_eq!(got, expected);
                }
            }
        }
    }
}
