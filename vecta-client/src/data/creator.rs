use super::schema_properties;
use crate::client::Client;
use serde_json::Value as Json;
use vecta_core::validation::{messages, Checks};
use vecta_core::{path, DataObject, Kind, Method, RestRequest, Result};

/// Create an object
///
/// The id is optional; when absent the server assigns one and returns it.
#[derive(Debug)]
pub struct Creator {
    client: Client,
    kind: Kind,
    class_name: Option<String>,
    id: Option<String>,
    schema: Option<Json>,
}

impl Creator {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            kind: Kind::default(),
            class_name: None,
            id: None,
            schema: None,
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Use a caller-chosen id instead of a server-assigned one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Property values; must be a JSON object
    pub fn with_schema(mut self, schema: Json) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn build(&self) -> Result<RestRequest> {
        let checks =
            Checks::new().require_str(self.class_name.as_deref(), messages::CLASS_NAME_REQUIRED);
        let (schema, checks) = schema_properties(self.schema.clone(), checks);
        let class_name = checks.finish(self.class_name.clone().unwrap_or_default())?;

        let mut object = DataObject::new(class_name, self.kind, schema);
        object.id = self.id.clone().filter(|id| !id.is_empty());

        RestRequest::new(Method::Post, path::collection(self.kind)).with_json(&object)
    }

    /// Returns the stored object, including the id the server assigned.
    pub async fn execute(self) -> Result<DataObject> {
        let request = self.build()?;
        let body = self.client.send(request).await?;
        DataObject::from_response(self.kind, body)
    }
}
