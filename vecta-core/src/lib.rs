/// Vecta request construction
///
/// Everything needed to turn builder configuration into a request, with no
/// I/O: object kinds, deferred validation, REST paths, beacons, where-filter
/// serialization and query assembly.

pub mod error;
pub mod kind;
pub mod validation;
pub mod literal;
pub mod path;
pub mod beacon;
pub mod filter;
pub mod query;
pub mod rest;
pub mod types;

pub use beacon::{BeaconFormat, HostBeacon, ReferencePayload};
pub use error::{Error, Result, UsageError};
pub use filter::{Comparator, Connective, FilterValue, WhereFilter};
pub use kind::Kind;
pub use path::{Include, Includes, ReadParams};
pub use query::{ExploreParams, GroupParams, GroupType, Movement, QueryBody, QueryMode, QueryRequest};
pub use rest::{Method, RestRequest};
pub use types::{DataObject, ObjectList, Properties};
