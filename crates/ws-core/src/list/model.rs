use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, ListId, MembershipId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Static,
    Smart,
}

/// A saved list of records of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityList {
    pub id: ListId,
    pub name: String,
    pub entity_type: String,
    #[serde(rename = "type", default)]
    pub kind: ListKind,
    #[serde(default)]
    pub member_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    pub name: String,
    pub entity_type: String,
    #[serde(rename = "type")]
    pub kind: ListKind,
}

/// One membership record joining a list and an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMember {
    #[serde(rename = "id")]
    pub membership_id: MembershipId,
    pub entity_id: EntityId,
}
