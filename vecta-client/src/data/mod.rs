/// Object CRUD and reference builders
///
/// Every builder is obtained from `client.data()`, configured with consuming
/// `with_*` calls, and finished either with `build()` (pure, returns the
/// `RestRequest` that would be sent) or `execute()` (validates, then sends).

mod creator;
mod deleter;
mod getter;
mod reference;
mod updater;
mod validator;

pub use creator::Creator;
pub use deleter::Deleter;
pub use getter::{Getter, GetterById};
pub use reference::{ReferenceCreator, ReferenceDeleter, ReferencePayloadBuilder, ReferenceReplacer};
pub use updater::{Merger, Updater};
pub use validator::Validator;

use crate::client::Client;
use serde_json::Value as Json;
use vecta_core::validation::Checks;
use vecta_core::Properties;

/// Entry point for the data builders.
#[derive(Debug, Clone)]
pub struct Data {
    client: Client,
}

impl Data {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create an object: `POST /{kind}`
    pub fn creator(&self) -> Creator {
        Creator::new(self.client.clone())
    }

    /// Dry-run an object against the schema: `POST /{kind}/validate`
    pub fn validator(&self) -> Validator {
        Validator::new(self.client.clone())
    }

    /// List objects of a kind: `GET /{kind}`
    pub fn getter(&self) -> Getter {
        Getter::new(self.client.clone())
    }

    /// Fetch one object: `GET /{kind}/{id}`
    pub fn getter_by_id(&self) -> GetterById {
        GetterById::new(self.client.clone())
    }

    /// Replace an object: `PUT /{kind}/{id}`
    pub fn updater(&self) -> Updater {
        Updater::new(self.client.clone())
    }

    /// Merge properties into an object: `PATCH /{kind}/{id}`
    pub fn merger(&self) -> Merger {
        Merger::new(self.client.clone())
    }

    /// Delete an object: `DELETE /{kind}/{id}`
    pub fn deleter(&self) -> Deleter {
        Deleter::new(self.client.clone())
    }

    pub fn reference_creator(&self) -> ReferenceCreator {
        ReferenceCreator::new(self.client.clone())
    }

    pub fn reference_replacer(&self) -> ReferenceReplacer {
        ReferenceReplacer::new(self.client.clone())
    }

    pub fn reference_deleter(&self) -> ReferenceDeleter {
        ReferenceDeleter::new(self.client.clone())
    }

    /// Build `{"beacon": ...}` bodies with the client's beacon format.
    pub fn reference_payload_builder(&self) -> ReferencePayloadBuilder {
        ReferencePayloadBuilder::new(self.client.clone())
    }
}

/// Property maps arrive as arbitrary JSON; only objects are accepted.
pub(crate) fn schema_properties(schema: Option<Json>, checks: Checks) -> (Properties, Checks) {
    match schema {
        None | Some(Json::Null) => (Properties::new(), checks),
        Some(Json::Object(map)) => (map, checks),
        Some(other) => (
            Properties::new(),
            checks.check(false, format!("schema must be an object, got {}", other)),
        ),
    }
}
