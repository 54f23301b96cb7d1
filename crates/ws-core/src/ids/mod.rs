//! ID type wrappers for type safety.

mod id_macro;

use serde::Serialize;

use id_macro::impl_id;

/// Server-side identifier of a business record (contact, lead, ticket...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

/// Identifier of a saved list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ListId(String);

/// Identifier of a membership record.
///
/// Membership records have their own id; they are not keyed by entity id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MembershipId(String);

impl_id!(EntityId, ListId, MembershipId);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_accepts_numbers_and_strings() {
        assert_eq!(EntityId::from_json(&json!(35)), Some(EntityId::from("35")));
        assert_eq!(EntityId::from_json(&json!("c-9")), Some(EntityId::from("c-9")));
    }

    #[test]
    fn deserializes_numeric_ids() {
        let id: EntityId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id.as_str(), "42");
        let id: ListId = serde_json::from_value(json!("vip")).unwrap();
        assert_eq!(id.as_str(), "vip");
        assert!(serde_json::from_value::<MembershipId>(json!(null)).is_err());
    }

    #[test]
    fn from_json_rejects_other_shapes() {
        assert_eq!(EntityId::from_json(&json!(null)), None);
        assert_eq!(EntityId::from_json(&json!("")), None);
        assert_eq!(EntityId::from_json(&json!({"id": 1})), None);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = ListId::from("list-1");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("list-1"));
    }
}
