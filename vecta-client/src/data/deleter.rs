use crate::client::Client;
use vecta_core::validation::{messages, Checks};
use vecta_core::{path, Kind, Method, RestRequest, Result};

/// Delete an object by id
#[derive(Debug)]
pub struct Deleter {
    client: Client,
    kind: Kind,
    id: Option<String>,
}

impl Deleter {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            kind: Kind::default(),
            id: None,
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

    pub fn build(&self) -> Result<RestRequest> {
        let id = Checks::new()
            .require_str(self.id.as_deref(), messages::ID_REQUIRED)
            .path_segment(self.id.as_deref(), "id")
            .finish(self.id.as_deref().unwrap_or_default())?;
        Ok(RestRequest::new(Method::Delete, path::object(self.kind, id)))
    }

    pub async fn execute(self) -> Result<()> {
        let request = self.build()?;
        self.client.send(request).await?;
        Ok(())
    }
}
