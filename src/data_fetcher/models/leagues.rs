use serde::{Deserialize, Serialize};

/// League record from the static allow-list (`{id, name, country}`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub country: String,
}

impl League {
    pub fn new(id: i64, name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            country: country.into(),
        }
    }
}
