use crate::client::Client;
use vecta_core::validation::{messages, Checks};
use vecta_core::{path, DataObject, Include, Kind, Method, ObjectList, ReadParams, RestRequest, Result};

/// List the objects of a kind
///
/// The enrichment toggles add tokens to `include=` in the order they were
/// called; a toggle called twice is sent once.
#[derive(Debug)]
pub struct Getter {
    client: Client,
    kind: Kind,
    params: ReadParams,
}

impl Getter {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            kind: Kind::default(),
            params: ReadParams::default(),
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Maximum number of objects to return
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.params.limit = Some(limit);
        self
    }

    pub fn with_include(mut self, include: Include) -> Self {
        self.params.includes = self.params.includes.with(include);
        self
    }

    pub fn with_vector(self) -> Self {
        self.with_include(Include::Vector)
    }

    pub fn with_classification(self) -> Self {
        self.with_include(Include::Classification)
    }

    pub fn with_interpretation(self) -> Self {
        self.with_include(Include::Interpretation)
    }

    pub fn with_nearest_neighbors(self) -> Self {
        self.with_include(Include::NearestNeighbors)
    }

    pub fn with_feature_projection(self) -> Self {
        self.with_include(Include::FeatureProjection)
    }

    pub fn build(&self) -> Result<RestRequest> {
        Checks::new().positive_limit(self.params.limit).finish(())?;
        let path = self.params.apply(path::collection(self.kind));
        Ok(RestRequest::new(Method::Get, path))
    }

    pub async fn execute(self) -> Result<ObjectList> {
        let request = self.build()?;
        let body = self.client.send(request).await?;
        ObjectList::from_response(self.kind, body)
    }
}

/// Fetch a single object by id
#[derive(Debug)]
pub struct GetterById {
    client: Client,
    kind: Kind,
    id: Option<String>,
    params: ReadParams,
}

impl GetterById {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            kind: Kind::default(),
            id: None,
            params: ReadParams::default(),
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_include(mut self, include: Include) -> Self {
        self.params.includes = self.params.includes.with(include);
        self
    }

    pub fn with_vector(self) -> Self {
        self.with_include(Include::Vector)
    }

    pub fn with_classification(self) -> Self {
        self.with_include(Include::Classification)
    }

    pub fn with_interpretation(self) -> Self {
        self.with_include(Include::Interpretation)
    }

    pub fn with_nearest_neighbors(self) -> Self {
        self.with_include(Include::NearestNeighbors)
    }

    pub fn with_feature_projection(self) -> Self {
        self.with_include(Include::FeatureProjection)
    }

    pub fn build(&self) -> Result<RestRequest> {
        let id = Checks::new()
            .require_str(self.id.as_deref(), messages::ID_REQUIRED_GETTER)
            .path_segment(self.id.as_deref(), "id")
            .finish(self.id.as_deref().unwrap_or_default())?;
        let path = self.params.apply(path::object(self.kind, id));
        Ok(RestRequest::new(Method::Get, path))
    }

    pub async fn execute(self) -> Result<DataObject> {
        let request = self.build()?;
        let body = self.client.send(request).await?;
        DataObject::from_response(self.kind, body)
    }
}
