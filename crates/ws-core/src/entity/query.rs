use serde::{Deserialize, Serialize};

use super::filter::FilterState;
use crate::ids::ListId;

/// Parameters of one collection read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub list_id: Option<ListId>,
    pub filters: Vec<(String, String)>,
}

impl CollectionQuery {
    pub fn build(page: u32, limit: u32, filters: &FilterState, list_id: Option<&ListId>) -> Self {
        Self {
            page: page.max(1),
            limit,
            search: filters.search().map(str::to_string),
            list_id: list_id.cloned(),
            filters: filters.query_pairs(),
        }
    }

    /// Query pairs in wire order: `search`, `page`, `limit`, `listId`, then filters.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(4 + self.filters.len());
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        if let Some(list_id) = &self.list_id {
            pairs.push(("listId".to_string(), list_id.to_string()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}
