use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the IPv4 address of each SRV target is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMode {
    /// Issue one A query per unique SRV target.
    #[default]
    Lookup,

    /// Decode the address from the first 8 hex characters of the target's
    /// leftmost label (`7f000001.addr.dc1.consul.` is `127.0.0.1`).
    Embedded,
}

impl AddressMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Embedded => "embedded",
        }
    }
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lookup" => Ok(Self::Lookup),
            "embedded" => Ok(Self::Embedded),
            other => Err(format!("Unknown address mode: {}", other)),
        }
    }
}
