/// Object kinds
///
/// Every object lives in one of two parallel namespaces. The kind picks the
/// REST collection, the schema section, and the query addressing level.

use crate::error::UsageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Primary kind, used whenever no kind is given
    #[default]
    Things,
    /// Secondary kind
    Actions,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Things, Kind::Actions];

    /// Lower-case plural name, used as the REST path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Things => "things",
            Kind::Actions => "actions",
        }
    }

    /// Capitalized name, used to address the kind inside a query.
    pub fn capitalized(&self) -> &'static str {
        match self {
            Kind::Things => "Things",
            Kind::Actions => "Actions",
        }
    }

    /// Key under which list responses return their objects.
    pub fn list_key(&self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for Kind {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "things" => Ok(Kind::Things),
            "actions" => Ok(Kind::Actions),
            other => Err(UsageError::new(format!(
                "kind must be one of [things, actions], got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
