use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A location of the console, consumed by a [`crate::actions::Navigator`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub pathname: String,

    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

impl NavigationTarget {
    pub fn path(pathname: &str) -> Self {
        Self {
            pathname: pathname.to_owned(),
            query: BTreeMap::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_owned(), value.to_owned());
        self
    }
}
