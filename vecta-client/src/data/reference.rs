use crate::client::Client;
use vecta_core::validation::{messages, Checks};
use vecta_core::{path, Kind, Method, ReferencePayload, RestRequest, Result};

/// Builds the `{"beacon": ...}` body pointing at a target object
#[derive(Debug)]
pub struct ReferencePayloadBuilder {
    client: Client,
    kind: Kind,
    id: Option<String>,
}

impl ReferencePayloadBuilder {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            kind: Kind::default(),
            id: None,
        }
    }

    /// Kind of the target object
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Id of the target object
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn payload(&self) -> Result<ReferencePayload> {
        let id = Checks::new()
            .require_str(self.id.as_deref(), messages::ID_REQUIRED)
            .path_segment(self.id.as_deref(), "id")
            .finish(self.id.as_deref().unwrap_or_default())?;
        Ok(ReferencePayload::new(self.client.beacon_format(), self.kind, id))
    }
}

/// Source object and property every reference operation addresses.
#[derive(Debug, Default)]
struct ReferenceSource {
    kind: Kind,
    id: Option<String>,
    property: Option<String>,
}

impl ReferenceSource {
    fn checks(&self) -> Checks {
        Checks::new()
            .require_str(self.id.as_deref(), messages::ID_REQUIRED)
            .require_str(self.property.as_deref(), messages::REFERENCE_PROPERTY_REQUIRED)
            .path_segment(self.id.as_deref(), "id")
            .path_segment(self.property.as_deref(), "referenceProperty")
    }

    fn path(&self) -> String {
        path::references(
            self.kind,
            self.id.as_deref().unwrap_or_default(),
            self.property.as_deref().unwrap_or_default(),
        )
    }
}

/// Add one reference to a property: `POST /{kind}/{id}/references/{property}`
#[derive(Debug)]
pub struct ReferenceCreator {
    client: Client,
    source: ReferenceSource,
    reference: Option<ReferencePayload>,
}

impl ReferenceCreator {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            source: ReferenceSource::default(),
            reference: None,
        }
    }

    /// Kind of the source object
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.source.kind = kind;
        self
    }

    /// Id of the source object
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.source.id = Some(id.into());
        self
    }

    pub fn with_reference_property(mut self, property: impl Into<String>) -> Self {
        self.source.property = Some(property.into());
        self
    }

    pub fn with_reference(mut self, reference: ReferencePayload) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn build(&self) -> Result<RestRequest> {
        let reference = self
            .source
            .checks()
            .require(self.reference.as_ref(), messages::REFERENCE_REQUIRED)
            .finish(self.reference.as_ref())?;
        RestRequest::new(Method::Post, self.source.path()).with_json(&reference)
    }

    pub async fn execute(self) -> Result<()> {
        let request = self.build()?;
        self.client.send(request).await?;
        Ok(())
    }
}

/// Replace every reference of a property: `PUT /{kind}/{id}/references/{property}`
#[derive(Debug)]
pub struct ReferenceReplacer {
    client: Client,
    source: ReferenceSource,
    references: Option<Vec<ReferencePayload>>,
}

impl ReferenceReplacer {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            source: ReferenceSource::default(),
            references: None,
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.source.kind = kind;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.source.id = Some(id.into());
        self
    }

    pub fn with_reference_property(mut self, property: impl Into<String>) -> Self {
        self.source.property = Some(property.into());
        self
    }

    /// The new full set of targets. An empty list clears the property.
    pub fn with_references(mut self, references: Vec<ReferencePayload>) -> Self {
        self.references = Some(references);
        self
    }

    pub fn build(&self) -> Result<RestRequest> {
        let references = self
            .source
            .checks()
            .require(self.references.as_ref(), messages::REFERENCES_REQUIRED)
            .finish(self.references.as_ref())?;
        RestRequest::new(Method::Put, self.source.path()).with_json(&references)
    }

    pub async fn execute(self) -> Result<()> {
        let request = self.build()?;
        self.client.send(request).await?;
        Ok(())
    }
}

/// Remove one reference from a property: `DELETE /{kind}/{id}/references/{property}`
#[derive(Debug)]
pub struct ReferenceDeleter {
    client: Client,
    source: ReferenceSource,
    reference: Option<ReferencePayload>,
}

impl ReferenceDeleter {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            source: ReferenceSource::default(),
            reference: None,
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.source.kind = kind;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.source.id = Some(id.into());
        self
    }

    pub fn with_reference_property(mut self, property: impl Into<String>) -> Self {
        self.source.property = Some(property.into());
        self
    }

    pub fn with_reference(mut self, reference: ReferencePayload) -> Self {
        self.reference = Some(reference);
        self
    }

    /// The target to remove travels in the body of the DELETE.
    pub fn build(&self) -> Result<RestRequest> {
        let reference = self
            .source
            .checks()
            .require(self.reference.as_ref(), messages::REFERENCE_REQUIRED)
            .finish(self.reference.as_ref())?;
        RestRequest::new(Method::Delete, self.source.path()).with_json(&reference)
    }

    pub async fn execute(self) -> Result<()> {
        let request = self.build()?;
        self.client.send(request).await?;
        Ok(())
    }
}
