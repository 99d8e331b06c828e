use crate::error::{Error, Result};
use crate::kind::Kind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// Property name -> value map of an object.
pub type Properties = Map<String, Json>;

/// A stored object, as sent on create/update and returned on reads.
///
/// The underscore-prefixed enrichment fields are only present when the read
/// asked for them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "class", default)]
    pub class_name: String,

    /// Implied by the endpoint, never part of the body.
    #[serde(skip)]
    pub kind: Kind,

    #[serde(default)]
    pub schema: Properties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time_unix: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_unix: Option<i64>,

    #[serde(rename = "_vector", default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,

    #[serde(rename = "_classification", default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Json>,

    #[serde(rename = "_interpretation", default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Json>,

    #[serde(rename = "_nearestNeighbors", default, skip_serializing_if = "Option::is_none")]
    pub nearest_neighbors: Option<Json>,

    #[serde(rename = "_featureProjection", default, skip_serializing_if = "Option::is_none")]
    pub feature_projection: Option<Json>,
}

impl DataObject {
    /// Body for create, update, merge and validate requests.
    pub fn new(class_name: impl Into<String>, kind: Kind, schema: Properties) -> Self {
        Self {
            class_name: class_name.into(),
            kind,
            schema,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Decode a single-object response and stamp it with the kind it was
    /// read from.
    pub fn from_response(kind: Kind, body: Json) -> Result<Self> {
        let mut object: DataObject = serde_json::from_value(body)?;
        object.kind = kind;
        Ok(object)
    }
}

/// Response of a list operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectList {
    pub objects: Vec<DataObject>,
    pub total_results: Option<u64>,
}

impl ObjectList {
    /// List responses carry their objects under the kind's plural name,
    /// e.g. `{"things": [...], "totalResults": 3}`.
    pub fn from_response(kind: Kind, body: Json) -> Result<Self> {
        let mut body = match body {
            Json::Object(map) => map,
            other => {
                return Err(Error::Decode(format!(
                    "expected an object list, got {}",
                    other
                )))
            }
        };

        let objects = match body.remove(kind.list_key()) {
            Some(Json::Null) | None => Vec::new(),
            Some(items) => serde_json::from_value::<Vec<DataObject>>(items)?,
        };
        let total_results = body.get("totalResults").and_then(Json::as_u64);

        Ok(Self {
            objects: objects
                .into_iter()
                .map(|mut object| {
                    object.kind = kind;
                    object
                })
                .collect(),
            total_results,
        })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
