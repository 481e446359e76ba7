use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, ValidationErrors};

/// Free-form label attached to any number of transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn from_draft(id: Uuid, owner_id: Uuid, draft: TagDraft) -> Result<Self, ValidationErrors> {
        draft.validate()?;
        Ok(Self {
            id,
            owner_id,
            name: draft.name.trim().to_string(),
            color: draft.color,
        })
    }
}

impl Identifiable for Tag {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Tag {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagDraft {
    pub name: String,
    #[serde(default = "TagDraft::default_color")]
    pub color: String,
}

impl TagDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Self::default_color(),
        }
    }

    pub fn default_color() -> String {
        "#6B7280".into()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "tag name is required");
        }
        errors.into_result()
    }
}
