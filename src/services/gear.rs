//! Gear coordination service implementation
//!
//! The organizer defines what the group needs; members volunteer to bring
//! items. An item is carried by at most one person at a time.

use std::sync::Arc;

use tracing::debug;

use super::access::{fetch_trip, lock_trip, require_member, require_organizer};
use super::lifecycle::ensure_active;
use crate::database::TripStore;
use crate::models::{
    CreateGearRequest, GearCategoryGroup, GearItem, UpdateGearRequest, UserId,
};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::logging::log_trip_action;

#[derive(Clone)]
pub struct GearService {
    store: Arc<dyn TripStore>,
}

impl GearService {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Trip gear grouped by category
    pub async fn list_grouped(&self, trip_id: i64) -> Result<Vec<GearCategoryGroup>> {
        let mut tx = self.store.begin().await?;
        fetch_trip(tx.as_mut(), trip_id).await?;
        let items = tx.list_gear(trip_id).await?;
        Ok(GearCategoryGroup::group(items))
    }

    pub async fn add(&self, trip_id: i64, user_id: UserId, request: CreateGearRequest) -> Result<GearItem> {
        let new_item = request.into_new_item(trip_id)?;

        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;
        ensure_active(&trip)?;

        let item = tx.insert_gear(&new_item).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "add_gear", user_id, Some(&item.name));
        Ok(item)
    }

    pub async fn update(
        &self,
        trip_id: i64,
        gear_id: i64,
        user_id: UserId,
        request: UpdateGearRequest,
    ) -> Result<GearItem> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;
        ensure_active(&trip)?;

        let mut item = tx
            .get_gear(trip_id, gear_id)
            .await?
            .ok_or(CampBarError::GearItemNotFound { trip_id, gear_id })?;
        request.apply_to(&mut item)?;
        let item = tx.save_gear(&item).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "update_gear", user_id, Some(&item.name));
        Ok(item)
    }

    pub async fn delete(&self, trip_id: i64, gear_id: i64, user_id: UserId) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;
        ensure_active(&trip)?;

        if !tx.delete_gear(trip_id, gear_id).await? {
            return Err(CampBarError::GearItemNotFound { trip_id, gear_id });
        }
        tx.commit().await?;

        log_trip_action(trip_id, "delete_gear", user_id, None);
        Ok(())
    }

    /// Toggle the caller's claim on an item.
    ///
    /// Unassigned items go to the caller, the caller's own item goes back to
    /// unassigned, and anyone else's item is a conflict.
    pub async fn volunteer(&self, trip_id: i64, gear_id: i64, user_id: UserId) -> Result<GearItem> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_member(tx.as_mut(), &trip, user_id).await?;
        ensure_active(&trip)?;

        let mut item = tx
            .get_gear(trip_id, gear_id)
            .await?
            .ok_or(CampBarError::GearItemNotFound { trip_id, gear_id })?;

        match item.assigned_to {
            None => item.assigned_to = Some(user_id),
            Some(holder) if holder == user_id => {
                item.assigned_to = None;
                item.packed = false;
            }
            Some(holder) => {
                return Err(CampBarError::AlreadyAssigned {
                    gear_id,
                    assigned_to: holder,
                });
            }
        }

        let item = tx.save_gear(&item).await?;
        tx.commit().await?;

        debug!(trip_id = trip_id, gear_id = gear_id, assigned_to = ?item.assigned_to, "Gear assignment toggled");
        Ok(item)
    }

    /// Put an item back to unassigned (its holder or the organizer)
    pub async fn release(&self, trip_id: i64, gear_id: i64, user_id: UserId) -> Result<GearItem> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_member(tx.as_mut(), &trip, user_id).await?;
        ensure_active(&trip)?;

        let mut item = tx
            .get_gear(trip_id, gear_id)
            .await?
            .ok_or(CampBarError::GearItemNotFound { trip_id, gear_id })?;

        let Some(holder) = item.assigned_to else {
            return Ok(item);
        };
        if holder != user_id && !trip.is_organizer(user_id) {
            return Err(CampBarError::Forbidden(
                "Only the person bringing this item or the organizer can release it".to_string(),
            ));
        }

        item.assigned_to = None;
        item.packed = false;
        let item = tx.save_gear(&item).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "release_gear", user_id, Some(&item.name));
        Ok(item)
    }

    /// Mark an item packed or unpacked (its holder or the organizer)
    pub async fn set_packed(&self, trip_id: i64, gear_id: i64, user_id: UserId, packed: bool) -> Result<GearItem> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        ensure_active(&trip)?;

        let mut item = tx
            .get_gear(trip_id, gear_id)
            .await?
            .ok_or(CampBarError::GearItemNotFound { trip_id, gear_id })?;
        if !item.is_assigned_to(user_id) && !trip.is_organizer(user_id) {
            return Err(CampBarError::Forbidden(
                "Only the person bringing this item or the organizer can pack it".to_string(),
            ));
        }

        item.packed = packed;
        let item = tx.save_gear(&item).await?;
        tx.commit().await?;
        Ok(item)
    }
}
