/// Vecta client: entry point to the data, schema and query builders

use crate::config::ClientConfig;
use crate::data::Data;
use crate::graphql::{Graphql, QueryResponse};
use crate::schema::Schema;
use crate::transport::{HttpTransport, Transport};
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::debug;
use vecta_core::{BeaconFormat, Error, HostBeacon, QueryBody, RestRequest, Result};

/// Path of the query endpoint, relative to the API root.
pub const QUERY_PATH: &str = "/graphql";

/// Cheap to clone; clones share the transport.
///
/// # Example
/// ```no_run
/// # use vecta_client::{Client, ClientConfig};
/// # async fn example() -> vecta_client::Result<()> {
/// let client = Client::new(ClientConfig::new("http", "localhost:8080"))?;
///
/// let response = client
///     .graphql()
///     .get()
///     .with_class_name("Article")
///     .with_fields("title url wordCount")
///     .with_limit(7)
///     .execute()
///     .await?;
///
/// println!("{} articles", response.get(vecta_client::Kind::Things, "Article").len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    beacon: Arc<dyn BeaconFormat>,
}

impl Client {
    /// Connect over HTTP using `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let beacon = HostBeacon::new("weaviate", config.beacon_host.clone());
        Ok(Self {
            transport: Arc::new(transport),
            beacon: Arc::new(beacon),
        })
    }

    /// Use a custom transport, e.g. a recording one in tests.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            beacon: Arc::new(HostBeacon::default()),
        }
    }

    /// Replace the beacon grammar used by reference payloads.
    pub fn with_beacon_format(mut self, beacon: Arc<dyn BeaconFormat>) -> Self {
        self.beacon = beacon;
        self
    }

    /// Object CRUD and references
    pub fn data(&self) -> Data {
        Data::new(self.clone())
    }

    /// Schema management
    pub fn schema(&self) -> Schema {
        Schema::new(self.clone())
    }

    /// Get, Aggregate and Explore queries
    pub fn graphql(&self) -> Graphql {
        Graphql::new(self.clone())
    }

    pub fn beacon_format(&self) -> &dyn BeaconFormat {
        self.beacon.as_ref()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) async fn send(&self, request: RestRequest) -> Result<Json> {
        debug!(request = %request, "executing request");
        self.transport.send(request).await
    }

    /// Post an assembled query. A response carrying a non-empty `errors`
    /// array is a server error even though the HTTP status was 2xx.
    pub(crate) async fn query(&self, query: String) -> Result<QueryResponse> {
        let body = serde_json::to_value(QueryBody { query })?;
        let response = self.transport.post(QUERY_PATH, body).await?;

        let has_errors = response
            .get("errors")
            .and_then(Json::as_array)
            .map(|errors| !errors.is_empty())
            .unwrap_or(false);
        if has_errors {
            return Err(Error::Server {
                status: 200,
                body: response,
            });
        }

        Ok(serde_json::from_value(response)?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
