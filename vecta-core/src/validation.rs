/// Deferred request validation
///
/// Builders never fail while being configured. Instead each `build()` runs a
/// `Checks` pass that records every problem it finds and folds them into a
/// single `UsageError`, so one failed call reports all missing fields at once.

use crate::error::UsageError;

/// Stable validation messages. Callers match on these strings.
pub mod messages {
    pub const CLASS_NAME_REQUIRED: &str =
        "className must be set - set with .withClassName(className)";
    pub const ID_REQUIRED: &str = "id must be set - set with .withId(id)";
    pub const ID_REQUIRED_GETTER: &str = "id must be set - initialize with getterById(id)";
    pub const REFERENCE_PROPERTY_REQUIRED: &str =
        "referenceProperty must be set - set with .withReferenceProperty(referenceProperty)";
    pub const REFERENCE_REQUIRED: &str = "reference must be set - set with .withReference(reference)";
    pub const REFERENCES_REQUIRED: &str =
        "references must be set - set with .withReferences(references)";
    pub const CLASS_REQUIRED: &str = "class must be set - set with .withClass(class)";
    pub const FIELDS_REQUIRED: &str = "fields must be set - set with .withFields(fields)";
    pub const CONCEPTS_REQUIRED: &str = "concepts must be set - set with .withConcepts(concepts)";
    pub const LIMIT_POSITIVE: &str = "limit must be a positive integer";
    pub const CERTAINTY_RANGE: &str = "certainty must be between 0 and 1";
    pub const FORCE_RANGE: &str = "force must be between 0 and 1";
}

/// Ordered accumulator of validation failures.
///
/// ```
/// use vecta_core::validation::{Checks, messages};
///
/// let class_name: Option<String> = None;
/// let err = Checks::new()
///     .require_str(class_name.as_deref(), messages::CLASS_NAME_REQUIRED)
///     .check(false, messages::LIMIT_POSITIVE)
///     .finish(())
///     .unwrap_err();
/// assert_eq!(err.messages().len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
#[must_use = "checks do nothing until finish() is called"]
pub struct Checks {
    errors: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless `ok` holds.
    pub fn check(mut self, ok: bool, message: impl Into<String>) -> Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    /// Record `message` if the value is absent or empty.
    pub fn require_str(self, value: Option<&str>, message: impl Into<String>) -> Self {
        let present = value.map(|v| !v.is_empty()).unwrap_or(false);
        self.check(present, message)
    }

    /// Record `message` if the value is absent.
    pub fn require<T>(self, value: Option<&T>, message: impl Into<String>) -> Self {
        self.check(value.is_some(), message)
    }

    /// Record `message` if the slice is empty.
    pub fn require_non_empty<T>(self, values: &[T], message: impl Into<String>) -> Self {
        self.check(!values.is_empty(), message)
    }

    /// Record `message` if a given value lies outside `[0, 1]`.
    pub fn unit_interval(self, value: Option<f64>, message: impl Into<String>) -> Self {
        let ok = value.map(|v| (0.0..=1.0).contains(&v)).unwrap_or(true);
        self.check(ok, message)
    }

    /// Record a message if a given value would not stay one path segment.
    pub fn path_segment(self, value: Option<&str>, field: &str) -> Self {
        let ok = value.map(crate::path::is_single_segment).unwrap_or(true);
        self.check(ok, crate::path::segment_message(field))
    }

    /// Record `LIMIT_POSITIVE` if a given limit is zero.
    pub fn positive_limit(self, limit: Option<u32>) -> Self {
        self.check(limit.map(|l| l > 0).unwrap_or(true), messages::LIMIT_POSITIVE)
    }

    /// Merge the messages of a nested validation result.
    pub fn merge(mut self, result: Result<(), UsageError>) -> Self {
        if let Err(e) = result {
            self.errors.extend(e.messages().iter().cloned());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the accumulator: `Ok(value)` when nothing failed, otherwise one
    /// `UsageError` listing every failure in the order it was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, UsageError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            tracing::debug!(errors = self.errors.len(), "request failed validation");
            Err(UsageError::from_messages(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_checks_pass() {
        assert_eq!(Checks::new().finish(7).unwrap(), 7);
    }

    #[test]
    fn test_all_failures_are_reported_in_order() {
        let err = Checks::new()
            .require_str(None, messages::CLASS_NAME_REQUIRED)
            .require_str(Some("abc"), messages::ID_REQUIRED)
            .require_str(Some(""), messages::ID_REQUIRED)
            .finish(())
            .unwrap_err();

        assert_eq!(
            err.messages(),
            &[
                messages::CLASS_NAME_REQUIRED.to_string(),
                messages::ID_REQUIRED.to_string()
            ]
        );
        assert_eq!(
            err.to_string(),
            "invalid usage: className must be set - set with .withClassName(className), id must be set - set with .withId(id)"
        );
    }

    #[test]
    fn test_ranges() {
        assert!(Checks::new()
            .unit_interval(Some(0.0), "x")
            .unit_interval(Some(1.0), "x")
            .unit_interval(None, "x")
            .positive_limit(Some(1))
            .positive_limit(None)
            .is_empty());

        let err = Checks::new()
            .unit_interval(Some(1.5), messages::CERTAINTY_RANGE)
            .positive_limit(Some(0))
            .finish(())
            .unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_merge_nested_errors() {
        let nested = Err(UsageError::from_messages(vec!["a".into(), "b".into()]));
        let err = Checks::new()
            .check(false, "first")
            .merge(nested)
            .merge(Ok(()))
            .finish(())
            .unwrap_err();
        assert_eq!(err.messages(), &["first".to_string(), "a".into(), "b".into()]);
    }

    #[test]
    fn test_path_segment() {
        assert!(Checks::new()
            .path_segment(None, "id")
            .path_segment(Some("40d2f93a-8f55-4561-8636-7c759f89ef13"), "id")
            .is_empty());

        let err = Checks::new()
            .path_segment(Some("../schema"), "id")
            .path_segment(Some("refProp#x"), "referenceProperty")
            .finish(())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid usage: id must not contain '/', '?', '#' or '..', \
             referenceProperty must not contain '/', '?', '#' or '..'"
        );
    }
}
