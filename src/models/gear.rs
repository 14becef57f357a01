//! Gear model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::UserId;
use crate::utils::errors::{CampBarError, Result};
use crate::utils::helpers::{normalize_optional_text, require_text};

pub const DEFAULT_CATEGORY: &str = "general";
const MAX_NAME_LENGTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GearItem {
    pub id: i64,
    pub trip_id: i64,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub assigned_to: Option<UserId>,
    pub notes: Option<String>,
    pub packed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GearItem {
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.assigned_to == Some(user_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewGearItem {
    pub trip_id: i64,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGearRequest {
    pub name: String,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

impl CreateGearRequest {
    pub fn into_new_item(self, trip_id: i64) -> Result<NewGearItem> {
        let quantity = self.quantity.unwrap_or(1);
        validate_quantity(quantity)?;

        Ok(NewGearItem {
            trip_id,
            name: require_text("name", &self.name, MAX_NAME_LENGTH)?,
            category: normalize_category(self.category),
            quantity,
            notes: normalize_optional_text(self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGearRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
    pub packed: Option<bool>,
}

impl UpdateGearRequest {
    pub fn apply_to(self, item: &mut GearItem) -> Result<()> {
        if let Some(name) = self.name {
            item.name = require_text("name", &name, MAX_NAME_LENGTH)?;
        }
        if self.category.is_some() {
            item.category = normalize_category(self.category);
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
            item.quantity = quantity;
        }
        if let Some(notes) = self.notes {
            item.notes = normalize_optional_text(Some(notes));
        }
        if let Some(packed) = self.packed {
            item.packed = packed;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPackedRequest {
    pub packed: bool,
}

/// Read-side grouping of a trip's gear by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearCategoryGroup {
    pub category: String,
    pub items: Vec<GearItem>,
}

impl GearCategoryGroup {
    /// Groups come back sorted by category; items keep their input order
    pub fn group(items: Vec<GearItem>) -> Vec<GearCategoryGroup> {
        let mut groups: BTreeMap<String, Vec<GearItem>> = BTreeMap::new();
        for item in items {
            groups.entry(item.category.clone()).or_default().push(item);
        }
        groups
            .into_iter()
            .map(|(category, items)| GearCategoryGroup { category, items })
            .collect()
    }
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(CampBarError::Validation("quantity must be at least 1".to_string()));
    }
    Ok(())
}

fn normalize_category(category: Option<String>) -> String {
    normalize_optional_text(category)
        .map(|c| c.to_lowercase())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}
