use super::schema_properties;
use crate::client::Client;
use serde_json::Value as Json;
use vecta_core::validation::{messages, Checks};
use vecta_core::{path, DataObject, Kind, Method, RestRequest, Result};

/// Check an object against the schema without storing it
#[derive(Debug)]
pub struct Validator {
    client: Client,
    kind: Kind,
    class_name: Option<String>,
    id: Option<String>,
    schema: Option<Json>,
}

impl Validator {
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

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

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

        RestRequest::new(Method::Post, path::validate(self.kind)).with_json(&object)
    }

    /// `Ok(true)` when the server accepts the object. A rejected object
    /// surfaces as `Error::Server` carrying the server's explanation.
    pub async fn execute(self) -> Result<bool> {
        let request = self.build()?;
        self.client.send(request).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::MockTransport;
    use serde_json::json;
    use vecta_core::{Error, Kind};

    #[tokio::test]
    async fn test_valid_object() {
        let transport = MockTransport::new();
        let valid = transport
            .client()
            .data()
            .validator()
            .with_kind(Kind::Actions)
            .with_class_name("Event")
            .with_schema(json!({"stringProp": "x"}))
            .execute()
            .await
            .unwrap();

        assert!(valid);
        assert_eq!(transport.requests()[0].to_string(), "POST /actions/validate");
    }

    #[tokio::test]
    async fn test_rejected_object_is_server_error() {
        let transport = MockTransport::new();
        transport.respond(Err(Error::Server {
            status: 422,
            body: json!({"error": [{"message": "no such class"}]}),
        }));

        let err = transport
            .client()
            .data()
            .validator()
            .with_class_name("Nope")
            .execute()
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
    }
}
