//! Domain types representing income and expense categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, DomainError, TransactionKind, ValidationErrors};

/// Categorises transactions for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub active: bool,
}

impl Category {
    pub fn from_draft(id: Uuid, owner_id: Uuid, draft: CategoryDraft) -> Result<Self, ValidationErrors> {
        draft.validate()?;
        Ok(Self {
            id,
            owner_id,
            name: draft.name.trim().to_string(),
            kind: draft.kind,
            color: draft.color,
            icon: draft.icon,
            active: draft.active,
        })
    }

    pub fn apply_draft(&mut self, draft: CategoryDraft) -> Result<(), ValidationErrors> {
        draft.validate()?;
        self.name = draft.name.trim().to_string();
        self.kind = draft.kind;
        self.color = draft.color;
        self.icon = draft.icon;
        self.active = draft.active;
        Ok(())
    }

    /// Whether a transaction of `kind` may reference this category.
    pub fn accepts(&self, kind: TransactionKind) -> bool {
        self.kind.accepts(kind)
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.icon, self.name, self.kind)
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn accepts(self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (CategoryKind::Income, TransactionKind::Income)
                | (CategoryKind::Expense, TransactionKind::Expense)
        )
    }
}

impl From<TransactionKind> for CategoryKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => CategoryKind::Income,
            TransactionKind::Expense => CategoryKind::Expense,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for CategoryKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .parse::<TransactionKind>()
            .map(CategoryKind::from)
            .map_err(|_| DomainError::UnknownVariant {
                kind: "category type",
                value: value.to_string(),
            })
    }
}

/// User-editable category fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "CategoryDraft::default_active")]
    pub active: bool,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        let color = match kind {
            CategoryKind::Income => "#10B981",
            CategoryKind::Expense => "#EF4444",
        };
        Self {
            name: name.into(),
            kind,
            color: color.into(),
            icon: String::new(),
            active: true,
        }
    }

    pub fn default_active() -> bool {
        true
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            kind: category.kind,
            color: category.color.clone(),
            icon: category.icon.clone(),
            active: category.active,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "category name is required");
        }
        if self.icon.chars().count() > 8 {
            errors.add("icon", "icon must be a short glyph");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_kind_constrains_transaction_kind() {
        assert!(CategoryKind::Expense.accepts(TransactionKind::Expense));
        assert!(!CategoryKind::Expense.accepts(TransactionKind::Income));
        assert!(CategoryKind::Income.accepts(TransactionKind::Income));
    }

    #[test]
    fn draft_requires_name() {
        let err = CategoryDraft::new("", CategoryKind::Income).validate().unwrap_err();
        assert_eq!(err.get("name"), Some("category name is required"));
    }

    #[test]
    fn from_draft_trims_name() {
        let draft = CategoryDraft::new("  Food ", CategoryKind::Expense).with_icon("🍔");
        let category = Category::from_draft(Uuid::new_v4(), Uuid::new_v4(), draft).unwrap();
        assert_eq!(category.name, "Food");
        assert_eq!(category.display_label(), "🍔 Food (expense)");
    }
}
