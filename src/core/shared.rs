use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration types provide their default values through this trait,
/// so that encoder and decoder configurations are built the same way.
pub trait ConfigType {
    fn default() -> Self;
}

/// Serialization form of an STL stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Ascii,
    Binary,
}

impl Encoding {
    /// The encoding a conversion writes for an input in `self`.
    pub fn opposite(self) -> Self {
        match self {
            Encoding::Ascii => Encoding::Binary,
            Encoding::Binary => Encoding::Ascii,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Ascii => f.write_str("ASCII"),
            Encoding::Binary => f.write_str("BINARY"),
        }
    }
}
