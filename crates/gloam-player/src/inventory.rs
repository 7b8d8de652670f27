//! Player inventory
//!
//! A fixed grid of 20 slots holding item data. Slot actions that need the
//! world (equipping, viewing, dropping) run through the interaction
//! controller; the inventory itself only manages slot contents and the
//! drop placement probes.

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use gloam_core::{ItemData, ItemEffect, ItemKind, ObjectId, Scene, SpatialQuery};

/// Number of item slots in the grid
pub const SLOT_COUNT: usize = 20;

/// How far ahead of the camera a dropped item lands
const DROP_DISTANCE: f32 = 2.0;
/// Height above the ground hit where a dropped body is released
const DROP_HEIGHT: f32 = 0.7;

/// Why a drop did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropError {
    /// The slot is empty or its item has no respawn template
    NoPrefab,
    /// Something solid sits between the camera and the drop point
    Blocked,
    /// No ground under the drop point
    NoGround,
}

pub struct Inventory {
    slots: Vec<Option<ItemData>>,
    /// Set while the inventory UI is on screen; the controller suspends
    /// world interaction while it is
    pub ui_open: bool,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            slots: vec![None; SLOT_COUNT],
            ui_open: false,
        }
    }

    /// Store an item in the first free slot. Returns false when full.
    pub fn pickup_item(&mut self, item: ItemData) -> bool {
        for slot in &mut self.slots {
            if slot.is_none() {
                *slot = Some(item);
                return true;
            }
        }
        debug!(item = %item.name, "inventory full, pickup refused");
        false
    }

    pub fn has_free_slot(&self) -> bool {
        self.slots.iter().any(|slot| slot.is_none())
    }

    pub fn inventory_full(&self) -> bool {
        !self.has_free_slot()
    }

    pub fn item(&self, slot: usize) -> Option<&ItemData> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Remove and return the item in a slot
    pub fn take(&mut self, slot: usize) -> Option<ItemData> {
        self.slots.get_mut(slot).and_then(|s| s.take())
    }

    /// Swap the contents of two slots
    pub fn swap(&mut self, from: usize, to: usize) {
        if from < self.slots.len() && to < self.slots.len() {
            self.slots.swap(from, to);
        }
    }

    /// Consume the item in a slot, returning its effect for the caller to
    /// apply. Non-consumables stay put.
    pub fn use_slot(&mut self, slot: usize) -> Option<ItemEffect> {
        let item = self.item(slot)?;
        if item.action.kind != ItemKind::Consumable {
            return None;
        }
        let item = self.take(slot)?;
        item.action.effect
    }

    /// Respawn the item in a slot as a world body in front of the camera.
    ///
    /// A forward probe refuses the drop when the path is blocked, then a
    /// downward probe finds the ground; the body is released a little above
    /// it with a random orientation so repeated drops scatter. Bodiless
    /// prefabs only get a random yaw and stay upright.
    pub fn drop_slot(
        &mut self,
        slot: usize,
        scene: &mut Scene,
        spatial: &dyn SpatialQuery,
        camera_position: Vec3,
        camera_forward: Vec3,
    ) -> Result<ObjectId, DropError> {
        let prefab = self
            .item(slot)
            .and_then(|item| item.prefab)
            .ok_or(DropError::NoPrefab)?;

        let target = camera_position + camera_forward.normalize_or_zero() * DROP_DISTANCE;
        if spatial.ray(camera_position, target).is_some() {
            debug!("drop refused, path blocked");
            return Err(DropError::Blocked);
        }

        let ground = spatial
            .ray(target + Vec3::Y * 2.0, target - Vec3::Y * 5.0)
            .ok_or(DropError::NoGround)?;

        let id = scene.instantiate(prefab).map_err(|_| DropError::NoPrefab)?;
        let mut rng = rand::thread_rng();
        if let Some(object) = scene.get_mut(id) {
            object.transform.position = ground.point + Vec3::Y * DROP_HEIGHT;
            object.transform.rotation.y = rng.gen_range(0.0..std::f32::consts::TAU);
            if object.body.is_some() {
                object.transform.rotation.x = rng.gen_range(0.0..std::f32::consts::TAU);
                object.transform.rotation.z = rng.gen_range(0.0..std::f32::consts::TAU);
            }
        }
        if let Some(body) = scene.body_mut(id) {
            body.frozen = false;
            body.gravity_scale = 1.0;
            body.linear_velocity = Vec3::ZERO;
            body.angular_velocity = Vec3::ZERO;
        }

        self.take(slot);
        Ok(id)
    }
}
