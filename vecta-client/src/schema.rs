/// Schema management builders
///
/// Class definitions are passed through as JSON; the client does not model
/// the schema language.

use crate::client::Client;
use serde_json::Value as Json;
use vecta_core::validation::{messages, Checks};
use vecta_core::{path, Kind, Method, RestRequest, Result};

#[derive(Debug, Clone)]
pub struct Schema {
    client: Client,
}

impl Schema {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Dump the whole schema: `GET /schema`
    pub fn getter(&self) -> SchemaGetter {
        SchemaGetter {
            client: self.client.clone(),
        }
    }

    /// Add a class: `POST /schema/{kind}`
    pub fn class_creator(&self) -> ClassCreator {
        ClassCreator {
            client: self.client.clone(),
            kind: Kind::default(),
            class: None,
        }
    }

    /// Drop a class: `DELETE /schema/{kind}/{className}`
    pub fn class_deleter(&self) -> ClassDeleter {
        ClassDeleter {
            client: self.client.clone(),
            kind: Kind::default(),
            class_name: None,
        }
    }
}

#[derive(Debug)]
pub struct SchemaGetter {
    client: Client,
}

impl SchemaGetter {
    pub fn build(&self) -> Result<RestRequest> {
        Ok(RestRequest::new(Method::Get, path::schema()))
    }

    /// The schema document, with one section per kind.
    pub async fn execute(self) -> Result<Json> {
        let request = self.build()?;
        self.client.send(request).await
    }
}

#[derive(Debug)]
pub struct ClassCreator {
    client: Client,
    kind: Kind,
    class: Option<Json>,
}

impl ClassCreator {
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Class definition, e.g. `{"class": "Article", "properties": [...]}`
    pub fn with_class(mut self, class: Json) -> Self {
        self.class = Some(class);
        self
    }

    pub fn build(&self) -> Result<RestRequest> {
        let class = self.class.as_ref().filter(|c| !c.is_null());
        let class = Checks::new()
            .require(class, messages::CLASS_REQUIRED)
            .check(
                class.map(Json::is_object).unwrap_or(true),
                "class must be a JSON object",
            )
            .finish(class.cloned().unwrap_or_default())?;
        Ok(RestRequest::new(Method::Post, path::schema_kind(self.kind)).with_body(class))
    }

    /// Returns the class as stored by the server.
    pub async fn execute(self) -> Result<Json> {
        let request = self.build()?;
        self.client.send(request).await
    }
}

#[derive(Debug)]
pub struct ClassDeleter {
    client: Client,
    kind: Kind,
    class_name: Option<String>,
}

impl ClassDeleter {
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn build(&self) -> Result<RestRequest> {
        let class_name = Checks::new()
            .require_str(self.class_name.as_deref(), messages::CLASS_NAME_REQUIRED)
            .path_segment(self.class_name.as_deref(), "className")
            .finish(self.class_name.as_deref().unwrap_or_default())?;
        Ok(RestRequest::new(
            Method::Delete,
            path::schema_class(self.kind, class_name),
        ))
    }

    pub async fn execute(self) -> Result<()> {
        let request = self.build()?;
        self.client.send(request).await?;
        Ok(())
    }
}
