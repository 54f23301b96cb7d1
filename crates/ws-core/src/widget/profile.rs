use serde::{Deserialize, Serialize};

/// Entity kinds that have a profile view the host can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Contact,
    Lead,
    Company,
    Deal,
    Sale,
    Ticket,
    Task,
}

/// Capability → handler table: the callback prop a widget receives for each kind.
pub const PROFILE_HANDLERS: [(ProfileKind, &str); 7] = [
    (ProfileKind::Contact, "onOpenContactProfile"),
    (ProfileKind::Lead, "onOpenLeadProfile"),
    (ProfileKind::Company, "onOpenCompanyProfile"),
    (ProfileKind::Deal, "onOpenDealProfile"),
    (ProfileKind::Sale, "onOpenSaleProfile"),
    (ProfileKind::Ticket, "onOpenTicketProfile"),
    (ProfileKind::Task, "onOpenTaskProfile"),
];

impl ProfileKind {
    pub fn handler_name(self) -> &'static str {
        PROFILE_HANDLERS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
            .unwrap_or("onOpenProfile")
    }
}
