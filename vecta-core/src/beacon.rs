/// Cross-object reference locators ("beacons")
///
/// A beacon encodes the target kind and id of a referenced object. The
/// concrete grammar is pluggable through `BeaconFormat`; `HostBeacon` is the
/// format the server resolves by default.

use crate::kind::Kind;
use serde::{Deserialize, Serialize};

/// Renders a locator for a (kind, id) pair.
///
/// Implementations must be deterministic: the same input always yields the
/// same string.
pub trait BeaconFormat: Send + Sync {
    fn locate(&self, kind: Kind, id: &str) -> String;
}

/// `{scheme}://{host}/{kind}/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBeacon {
    pub scheme: String,
    pub host: String,
}

impl HostBeacon {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }
}

impl Default for HostBeacon {
    fn default() -> Self {
        Self::new("weaviate", "localhost")
    }
}

impl BeaconFormat for HostBeacon {
    fn locate(&self, kind: Kind, id: &str) -> String {
        format!("{}://{}/{}/{}", self.scheme, self.host, kind.as_str(), id)
    }
}

/// Body used wherever a reference target is sent: `{"beacon": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferencePayload {
    pub beacon: String,
}

impl ReferencePayload {
    pub fn new(format: &dyn BeaconFormat, kind: Kind, id: &str) -> Self {
        Self {
            beacon: format.locate(kind, id),
        }
    }
}
