/// Vecta client library
///
/// Fluent builders over the REST (object CRUD, references, schema) and query
/// (Get, Aggregate, Explore) surfaces of a Vecta server.

pub mod client;
pub mod config;
pub mod data;
pub mod graphql;
pub mod retry;
pub mod schema;
pub mod transport;

#[cfg(test)]
mod mock;

// Re-export key types
pub use client::Client;
pub use config::ClientConfig;
pub use graphql::{AggregateBuilder, ExploreBuilder, GetBuilder, QueryResponse};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport};
pub use vecta_core::{
    Comparator, Connective, DataObject, Error, ExploreParams, FilterValue, GroupParams, GroupType,
    Include, Kind, Movement, ObjectList, ReferencePayload, Result, UsageError, WhereFilter,
};
