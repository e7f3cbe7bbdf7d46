use serde::{Deserialize, Serialize};

use super::{EntityId, de};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "de::null_as_empty")]
    pub kind: String,
}
