/// Query builders: Get, Aggregate and Explore
///
/// Each builder fills a `QueryRequest`; `build()` validates and assembles the
/// query text, `execute()` posts it to the query endpoint.

use crate::client::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use vecta_core::validation::Checks;
use vecta_core::{
    ExploreParams, GroupParams, Kind, Movement, QueryMode, QueryRequest, Result, WhereFilter,
};

/// Response of the query endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub data: Json,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Json>>,
}

impl QueryResponse {
    /// Objects returned by a Get query for `class_name`.
    pub fn get(&self, kind: Kind, class_name: &str) -> &[Json] {
        self.results(&["Get", kind.capitalized(), class_name])
    }

    /// Groups returned by an Aggregate query for `class_name`.
    pub fn aggregate(&self, kind: Kind, class_name: &str) -> &[Json] {
        self.results(&["Aggregate", kind.capitalized(), class_name])
    }

    /// Beacons returned by an Explore query.
    pub fn explore(&self) -> &[Json] {
        self.results(&["Explore"])
    }

    fn results(&self, path: &[&str]) -> &[Json] {
        path.iter()
            .try_fold(&self.data, |node, key| node.get(*key))
            .and_then(Json::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct Graphql {
    client: Client,
}

impl Graphql {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn get(&self) -> GetBuilder {
        GetBuilder {
            client: self.client.clone(),
            request: QueryRequest::new(QueryMode::Fetch),
            pending: Checks::new(),
        }
    }

    pub fn aggregate(&self) -> AggregateBuilder {
        AggregateBuilder {
            client: self.client.clone(),
            request: QueryRequest::new(QueryMode::Aggregate),
            pending: Checks::new(),
        }
    }

    pub fn explore(&self) -> ExploreBuilder {
        ExploreBuilder {
            client: self.client.clone(),
            request: QueryRequest::new(QueryMode::Explore),
            explore: ExploreParams::default(),
        }
    }
}

/// Folds errors recorded while configuring into the request's own checks.
fn assemble(request: &QueryRequest, pending: &Checks) -> Result<String> {
    if !pending.is_empty() {
        pending.clone().merge(request.validate()).finish(())?;
    }
    Ok(request.assemble()?)
}

/// Parse a JSON filter now, report a bad one at build time.
fn parse_where(filter: &Json, pending: Checks) -> (Option<WhereFilter>, Checks) {
    match WhereFilter::from_json(filter) {
        Ok(filter) => (Some(filter), pending),
        Err(e) => (None, pending.merge(Err(e))),
    }
}

/// Fetch objects of one class
#[derive(Debug)]
pub struct GetBuilder {
    client: Client,
    request: QueryRequest,
    pending: Checks,
}

impl GetBuilder {
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.request.kind = kind;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.request.class_name = Some(class_name.into());
        self
    }

    /// Field selection, passed through verbatim
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.request.fields = Some(fields.into());
        self
    }

    pub fn with_where(mut self, filter: WhereFilter) -> Self {
        self.request.filter = Some(filter);
        self
    }

    /// Accepts the untyped form, e.g.
    /// `{"operator": "Equal", "path": ["title"], "valueString": "x"}`
    pub fn with_where_json(mut self, filter: &Json) -> Self {
        let (filter, pending) = parse_where(filter, self.pending);
        self.request.filter = filter;
        self.pending = pending;
        self
    }

    pub fn with_explore(mut self, explore: ExploreParams) -> Self {
        self.request.explore = Some(explore);
        self
    }

    pub fn with_group(mut self, group: GroupParams) -> Self {
        self.request.group = Some(group);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.request.limit = Some(limit);
        self
    }

    pub fn build(&self) -> Result<String> {
        assemble(&self.request, &self.pending)
    }

    pub async fn execute(self) -> Result<QueryResponse> {
        let query = self.build()?;
        self.client.query(query).await
    }
}

/// Aggregate over the objects of one class
#[derive(Debug)]
pub struct AggregateBuilder {
    client: Client,
    request: QueryRequest,
    pending: Checks,
}

impl AggregateBuilder {
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.request.kind = kind;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.request.class_name = Some(class_name.into());
        self
    }

    /// Aggregation sub-query, e.g. `meta { count }`
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.request.fields = Some(fields.into());
        self
    }

    pub fn with_where(mut self, filter: WhereFilter) -> Self {
        self.request.filter = Some(filter);
        self
    }

    pub fn with_where_json(mut self, filter: &Json) -> Self {
        let (filter, pending) = parse_where(filter, self.pending);
        self.request.filter = filter;
        self.pending = pending;
        self
    }

    /// Property path to group results by
    pub fn with_group_by<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.group_by = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.request.limit = Some(limit);
        self
    }

    pub fn build(&self) -> Result<String> {
        assemble(&self.request, &self.pending)
    }

    pub async fn execute(self) -> Result<QueryResponse> {
        let query = self.build()?;
        self.client.query(query).await
    }
}

/// Semantic search across all classes
#[derive(Debug)]
pub struct ExploreBuilder {
    client: Client,
    request: QueryRequest,
    explore: ExploreParams,
}

impl ExploreBuilder {
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.request.fields = Some(fields.into());
        self
    }

    pub fn with_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explore.concepts = concepts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_certainty(mut self, certainty: f64) -> Self {
        self.explore.certainty = Some(certainty);
        self
    }

    pub fn with_move_to(mut self, movement: Movement) -> Self {
        self.explore.move_to = Some(movement);
        self
    }

    pub fn with_move_away_from(mut self, movement: Movement) -> Self {
        self.explore.move_away_from = Some(movement);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.request.limit = Some(limit);
        self
    }

    pub fn build(&self) -> Result<String> {
        let mut request = self.request.clone();
        request.explore = Some(self.explore.clone());
        Ok(request.assemble()?)
    }

    pub async fn execute(self) -> Result<QueryResponse> {
        let query = self.build()?;
        self.client.query(query).await
    }
}
