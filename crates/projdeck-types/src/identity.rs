use crate::error::Error;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical remote identity: the `(host, owner, name)` triple a remote URL
/// normalizes to. This is the join key that matches a project cloned under
/// different local folder names on different machines.
///
/// Serialized as the string `host/owner/name` so it can also key JSON maps.
/// Owner and name case is preserved as declared by the remote.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemoteIdentity {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RemoteIdentity {
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RemoteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.name)
    }
}

impl FromStr for RemoteIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(owner), Some(name))
                if !host.is_empty() && !owner.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(host, owner, name))
            }
            _ => Err(Error::InvalidIdentity(s.to_string())),
        }
    }
}

impl Serialize for RemoteIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RemoteIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
