use serde::{Deserialize, Serialize};

pub const EMPTY_PLACEHOLDER_NAME: &str = "No lights found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    pub index: i64,
    pub name: String,
    pub status: bool,
}

impl Light {
    /// A light as it looks the moment it is registered: switched off.
    pub fn new(index: i64, name: &str) -> Self {
        Light {
            index,
            name: name.to_owned(),
            status: false,
        }
    }

    /// Stand-in record returned by `list` when nothing is registered.
    pub fn placeholder() -> Self {
        Light {
            index: 0,
            name: EMPTY_PLACEHOLDER_NAME.to_owned(),
            status: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Light),
    CapacityReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Light),
    Empty,
}
