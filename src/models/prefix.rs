use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::{Record, SqlValue};

/// Name prefix (title) row, e.g. "นาย" / "Mr.".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefix {
    pub id: Uuid,
    pub name_th: String,
    pub name_en: String,
    pub gender_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for Prefix {
    const TABLE: &'static str = "prefixes";

    fn primary_key(&self) -> SqlValue {
        self.id.into()
    }
}

impl Prefix {
    pub fn new(name_th: String, name_en: String, gender_id: Option<Uuid>, is_active: bool) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            name_th,
            name_en,
            gender_id,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields supplied when creating a prefix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewPrefix {
    pub name_th: String,
    pub name_en: String,
    pub gender_id: Option<Uuid>,
    pub is_active: bool,
}

impl From<NewPrefix> for Prefix {
    fn from(new: NewPrefix) -> Self {
        Prefix::new(new.name_th, new.name_en, new.gender_id, new.is_active)
    }
}

/// Partial update. Absent or empty names keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PrefixChanges {
    pub name_th: Option<String>,
    pub name_en: Option<String>,
    pub gender_id: Option<Uuid>,
    pub is_active: bool,
}

impl Prefix {
    /// Applies `changes` and bumps `updated_at`.
    pub fn apply(&mut self, changes: PrefixChanges) {
        if let Some(name_th) = changes.name_th.filter(|n| !n.is_empty()) {
            self.name_th = name_th;
        }
        if let Some(name_en) = changes.name_en.filter(|n| !n.is_empty()) {
            self.name_en = name_en;
        }
        if changes.gender_id.is_some() {
            self.gender_id = changes.gender_id;
        }
        self.is_active = changes.is_active;
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_empty_names() {
        let mut prefix = Prefix::new("นาย".into(), "Mr.".into(), None, true);
        let created = prefix.created_at;

        prefix.apply(PrefixChanges {
            name_th: Some(String::new()),
            name_en: Some("Mister".into()),
            gender_id: None,
            is_active: false,
        });

        assert_eq!(prefix.name_th, "นาย");
        assert_eq!(prefix.name_en, "Mister");
        assert!(!prefix.is_active);
        assert_eq!(prefix.created_at, created);
        assert!(prefix.updated_at >= created);
    }
}
