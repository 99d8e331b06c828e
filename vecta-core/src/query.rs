/// Query assembly
///
/// Turns a `QueryRequest` into query-language text for one of three modes:
///
/// - `Fetch`: `{Get{Things{Article(where: ..., explore: ..., group: ..., limit: 7){title url}}}}`
/// - `Aggregate`: `{Aggregate{Things{Article(where: ..., groupBy: [...], limit: 10){meta { count }}}}}`
/// - `Explore`: `{Explore(concepts: [...], certainty: 0.7, moveTo: ..., moveAwayFrom: ..., limit: 3){beacon className}}`
///
/// Arguments are omitted when unset, and so are the parentheses when no
/// argument is set. Field selections are passed through verbatim.

use crate::error::UsageError;
use crate::filter::WhereFilter;
use crate::kind::Kind;
use crate::literal;
use crate::validation::{messages, Checks};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref CLASS_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Whether `name` can be spliced into a query as a class name.
pub fn is_valid_class_name(name: &str) -> bool {
    CLASS_NAME.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    Fetch,
    Aggregate,
    Explore,
}

impl QueryMode {
    pub fn name(&self) -> &'static str {
        match self {
            QueryMode::Fetch => "get",
            QueryMode::Aggregate => "aggregate",
            QueryMode::Explore => "explore",
        }
    }
}

/// Shift of the search vector toward or away from some concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub concepts: Vec<String>,
    pub force: f64,
}

impl Movement {
    pub fn new<I, S>(concepts: I, force: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            concepts: concepts.into_iter().map(Into::into).collect(),
            force,
        }
    }

    fn render(&self) -> String {
        format!(
            "{{concepts: {}, force: {}}}",
            literal::string_list(&self.concepts),
            literal::float(self.force)
        )
    }

    fn check_into(&self, checks: Checks, name: &str) -> Checks {
        checks
            .check(
                !self.concepts.is_empty(),
                format!("{} requires at least one concept", name),
            )
            .unit_interval(Some(self.force), messages::FORCE_RANGE)
    }
}

/// Semantic exploration parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExploreParams {
    pub concepts: Vec<String>,
    pub certainty: Option<f64>,
    pub move_to: Option<Movement>,
    pub move_away_from: Option<Movement>,
}

impl ExploreParams {
    pub fn new<I, S>(concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            concepts: concepts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_certainty(mut self, certainty: f64) -> Self {
        self.certainty = Some(certainty);
        self
    }

    pub fn with_move_to(mut self, movement: Movement) -> Self {
        self.move_to = Some(movement);
        self
    }

    pub fn with_move_away_from(mut self, movement: Movement) -> Self {
        self.move_away_from = Some(movement);
        self
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![format!("concepts: {}", literal::string_list(&self.concepts))];
        if let Some(certainty) = self.certainty {
            args.push(format!("certainty: {}", literal::float(certainty)));
        }
        if let Some(movement) = &self.move_to {
            args.push(format!("moveTo: {}", movement.render()));
        }
        if let Some(movement) = &self.move_away_from {
            args.push(format!("moveAwayFrom: {}", movement.render()));
        }
        args
    }

    fn check_into(&self, checks: Checks) -> Checks {
        let mut checks = checks
            .require_non_empty(&self.concepts, messages::CONCEPTS_REQUIRED)
            .unit_interval(self.certainty, messages::CERTAINTY_RANGE);
        if let Some(movement) = &self.move_to {
            checks = movement.check_into(checks, "moveTo");
        }
        if let Some(movement) = &self.move_away_from {
            checks = movement.check_into(checks, "moveAwayFrom");
        }
        checks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Closest,
    Merge,
}

impl GroupType {
    pub fn name(&self) -> &'static str {
        match self {
            GroupType::Closest => "closest",
            GroupType::Merge => "merge",
        }
    }
}

/// Result grouping for fetch queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupParams {
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub force: f64,
}

impl GroupParams {
    pub fn new(group_type: GroupType, force: f64) -> Self {
        Self { group_type, force }
    }

    fn render(&self) -> String {
        format!(
            "{{type: {}, force: {}}}",
            self.group_type.name(),
            literal::float(self.force)
        )
    }
}

/// A query against the query endpoint, before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub mode: QueryMode,
    pub class_name: Option<String>,
    pub kind: Kind,
    pub fields: Option<String>,
    pub filter: Option<WhereFilter>,
    pub limit: Option<u32>,
    pub explore: Option<ExploreParams>,
    pub group: Option<GroupParams>,
    pub group_by: Vec<String>,
}

impl QueryRequest {
    pub fn new(mode: QueryMode) -> Self {
        Self {
            mode,
            class_name: None,
            kind: Kind::default(),
            fields: None,
            filter: None,
            limit: None,
            explore: None,
            group: None,
            group_by: Vec::new(),
        }
    }

    /// Check every field against the mode, reporting all problems together.
    pub fn validate(&self) -> Result<(), UsageError> {
        let fields = self.fields.as_deref().map(str::trim);
        let mut checks = Checks::new()
            .require_str(fields, messages::FIELDS_REQUIRED)
            .positive_limit(self.limit);

        let mode = self.mode.name();
        let unsupported = |field: &str| format!("{} is not supported for {} queries", field, mode);

        match self.mode {
            QueryMode::Fetch | QueryMode::Aggregate => {
                checks = checks.require_str(self.class_name.as_deref(), messages::CLASS_NAME_REQUIRED);
                if let Some(name) = self.class_name.as_deref().filter(|n| !n.is_empty()) {
                    checks = checks.check(
                        is_valid_class_name(name),
                        format!("className '{}' is not a valid class name", name),
                    );
                }
                if let Some(filter) = &self.filter {
                    checks = checks.merge(filter.validate());
                }
            }
            QueryMode::Explore => {
                checks = checks
                    .check(self.class_name.is_none(), unsupported("className"))
                    .check(self.filter.is_none(), unsupported("where"))
                    .require(self.explore.as_ref(), messages::CONCEPTS_REQUIRED);
            }
        }

        match self.mode {
            QueryMode::Fetch => {
                checks = checks.check(self.group_by.is_empty(), unsupported("groupBy"));
                if let Some(explore) = &self.explore {
                    checks = explore.check_into(checks);
                }
                if let Some(group) = &self.group {
                    checks = checks.unit_interval(Some(group.force), messages::FORCE_RANGE);
                }
            }
            QueryMode::Aggregate => {
                checks = checks
                    .check(self.explore.is_none(), unsupported("explore"))
                    .check(self.group.is_none(), unsupported("group"));
            }
            QueryMode::Explore => {
                checks = checks
                    .check(self.group.is_none(), unsupported("group"))
                    .check(self.group_by.is_empty(), unsupported("groupBy"));
                if let Some(explore) = &self.explore {
                    checks = explore.check_into(checks);
                }
            }
        }

        checks.finish(())
    }

    /// Validate and render the request as query-language text.
    pub fn assemble(&self) -> Result<String, UsageError> {
        self.validate()?;
        let query = self.to_string();
        tracing::debug!(mode = self.mode.name(), query = %query, "assembled query");
        Ok(query)
    }

    fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        match self.mode {
            QueryMode::Fetch => {
                if let Some(filter) = &self.filter {
                    args.push(format!("where: {}", filter));
                }
                if let Some(explore) = &self.explore {
                    args.push(format!("explore: {{{}}}", explore.args().join(", ")));
                }
                if let Some(group) = &self.group {
                    args.push(format!("group: {}", group.render()));
                }
            }
            QueryMode::Aggregate => {
                if let Some(filter) = &self.filter {
                    args.push(format!("where: {}", filter));
                }
                if !self.group_by.is_empty() {
                    args.push(format!("groupBy: {}", literal::string_list(&self.group_by)));
                }
            }
            QueryMode::Explore => {
                if let Some(explore) = &self.explore {
                    args.extend(explore.args());
                }
            }
        }
        if let Some(limit) = self.limit {
            args.push(format!("limit: {}", limit));
        }
        args
    }
}

/// Renders without validating; use `assemble` for checked output.
impl fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self.args();
        let args = if args.is_empty() {
            String::new()
        } else {
            format!("({})", args.join(", "))
        };
        let fields = self.fields.as_deref().unwrap_or("").trim();
        let class_name = self.class_name.as_deref().unwrap_or("");

        match self.mode {
            QueryMode::Fetch => write!(
                f,
                "{{Get{{{}{{{}{}{{{}}}}}}}}}",
                self.kind.capitalized(),
                class_name,
                args,
                fields
            ),
            QueryMode::Aggregate => write!(
                f,
                "{{Aggregate{{{}{{{}{}{{{}}}}}}}}}",
                self.kind.capitalized(),
                class_name,
                args,
                fields
            ),
            QueryMode::Explore => write!(f, "{{Explore{}{{{}}}}}", args, fields),
        }
    }
}

/// JSON body posted to the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBody {
    pub query: String,
}
