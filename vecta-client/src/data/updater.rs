use super::schema_properties;
use crate::client::Client;
use serde_json::Value as Json;
use vecta_core::validation::{messages, Checks};
use vecta_core::{path, DataObject, Kind, Method, RestRequest, Result};

/// Fields shared by the full-replace and merge builders.
#[derive(Debug, Default)]
struct ObjectPatch {
    kind: Kind,
    class_name: Option<String>,
    id: Option<String>,
    schema: Option<Json>,
}

impl ObjectPatch {
    fn request(&self, method: Method) -> Result<RestRequest> {
        let checks = Checks::new()
            .require_str(self.id.as_deref(), messages::ID_REQUIRED)
            .path_segment(self.id.as_deref(), "id")
            .require_str(self.class_name.as_deref(), messages::CLASS_NAME_REQUIRED);
        let (schema, checks) = schema_properties(self.schema.clone(), checks);
        checks.finish(())?;

        let id = self.id.clone().unwrap_or_default();
        let class_name = self.class_name.clone().unwrap_or_default();
        let object = DataObject::new(class_name, self.kind, schema).with_id(id.clone());

        RestRequest::new(method, path::object(self.kind, &id)).with_json(&object)
    }
}

/// Replace an object's properties
#[derive(Debug)]
pub struct Updater {
    client: Client,
    patch: ObjectPatch,
}

impl Updater {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            patch: ObjectPatch::default(),
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.patch.kind = kind;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.patch.class_name = Some(class_name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.patch.id = Some(id.into());
        self
    }

    pub fn with_schema(mut self, schema: Json) -> Self {
        self.patch.schema = Some(schema);
        self
    }

    pub fn build(&self) -> Result<RestRequest> {
        self.patch.request(Method::Put)
    }

    pub async fn execute(self) -> Result<DataObject> {
        let request = self.build()?;
        let body = self.client.send(request).await?;
        DataObject::from_response(self.patch.kind, body)
    }
}

/// Merge properties into an object, leaving the others untouched
#[derive(Debug)]
pub struct Merger {
    client: Client,
    patch: ObjectPatch,
}

impl Merger {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            patch: ObjectPatch::default(),
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.patch.kind = kind;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.patch.class_name = Some(class_name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.patch.id = Some(id.into());
        self
    }

    pub fn with_schema(mut self, schema: Json) -> Self {
        self.patch.schema = Some(schema);
        self
    }

    pub fn build(&self) -> Result<RestRequest> {
        self.patch.request(Method::Patch)
    }

    /// The server answers a merge with an empty body.
    pub async fn execute(self) -> Result<()> {
        let request = self.build()?;
        self.client.send(request).await?;
        Ok(())
    }
}
