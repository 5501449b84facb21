use serde::{Deserialize, Serialize};

/// A detail page URL as found on a listing page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieLink {
    pub url: String,
    /// 1-based listing page the link was read from
    pub page: u32,
}

impl MovieLink {
    pub fn new(url: impl Into<String>, page: u32) -> Self {
        Self { url: url.into(), page }
    }
}
