use serde::{Deserialize, Serialize};

/// Pagination as reported by the server, normalized.
///
/// Invariants: `current_page >= 1`, `total_pages >= 1`, `items_per_page > 0`
/// and `current_page <= total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

/// Wire form of the `pagination` object; every member is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWire {
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
    pub items_per_page: Option<u32>,
}

impl PaginationState {
    pub fn first(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn from_wire(wire: PaginationWire, requested_page: u32, items_per_page: u32) -> Self {
        let items_per_page = wire.items_per_page.unwrap_or(items_per_page).max(1);
        let total_items = wire.total_items.unwrap_or(0);
        let total_pages = wire
            .total_pages
            .unwrap_or_else(|| pages_for(total_items, items_per_page))
            .max(1);
        let current_page = wire
            .current_page
            .unwrap_or(requested_page)
            .clamp(1, total_pages);
        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
        }
    }

    /// Builds pagination for a response that carried none: everything fits on one page.
    pub fn synthesize(item_count: usize, items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: item_count as u64,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.can_go_previous().then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.can_go_next().then(|| self.current_page + 1)
    }
}

fn pages_for(total_items: u64, items_per_page: u32) -> u32 {
    let pages = total_items.div_ceil(u64::from(items_per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
