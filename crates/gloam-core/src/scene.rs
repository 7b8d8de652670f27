//! Scene registry: the transform/physics collaborator contract
//!
//! The interaction code reads and writes orientation and velocity through
//! this registry; it never simulates physics. The host engine is expected to
//! mirror these objects into its own physics and render state.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::types::{ColliderId, ObjectId, PrefabId};

/// Position and euler-angle orientation of a world object.
///
/// The rotatable interactions drive a single euler axis at a time (doors on
/// Y, switches and wheels on Z), so rotation is kept in euler radians rather
/// than a quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler rotation in radians (XYZ order)
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    /// Create a transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Rigid-body state mirrored from the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub mass: f32,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub gravity_scale: f32,
    /// When frozen the host engine stops simulating the body
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            frozen: false,
        }
    }
}

impl RigidBody {
    /// Create a body with the given mass
    pub fn with_mass(mass: f32) -> Self {
        Self {
            mass,
            ..Default::default()
        }
    }
}

/// A renderable mesh owned by a world object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshInstance {
    /// Render layer mask; equipped items move to the overlay layer
    pub layer: u32,
    /// Proximity-highlight overlay material toggle
    pub overlay: bool,
}

impl Default for MeshInstance {
    fn default() -> Self {
        Self {
            layer: 1,
            overlay: false,
        }
    }
}

/// An object in the scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldObject {
    pub name: String,
    /// Attachment parent (hand anchors and the like); bookkeeping for the host
    pub parent: Option<ObjectId>,
    pub transform: Transform,
    pub body: Option<RigidBody>,
    pub meshes: Vec<MeshInstance>,
    pub colliders: Vec<ColliderId>,
}

impl WorldObject {
    /// Create a named object at the origin
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Place the object at a position
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Attach a rigid body with the given mass
    pub fn with_body(mut self, mass: f32) -> Self {
        self.body = Some(RigidBody::with_mass(mass));
        self
    }

    /// Attach a default mesh instance
    pub fn with_mesh(mut self) -> Self {
        self.meshes.push(MeshInstance::default());
        self
    }

    /// Attach a collision shape handle
    pub fn with_collider(mut self, collider: ColliderId) -> Self {
        self.colliders.push(collider);
        self
    }
}

/// Registry of live world objects and spawnable templates
#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, WorldObject>,
    prefabs: HashMap<PrefabId, WorldObject>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning its handle
    pub fn spawn(&mut self, object: WorldObject) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.insert(id, object);
        id
    }

    /// Remove an object. Stale handles afterwards resolve to `None`.
    pub fn despawn(&mut self, id: ObjectId) {
        self.objects.remove(&id);
    }

    /// Whether the handle still refers to a live object
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.get_mut(&id)
    }

    /// Position of an object, if alive
    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.objects.get(&id).map(|o| o.transform.position)
    }

    /// Rigid-body state of an object, if it has one
    pub fn body_mut(&mut self, id: ObjectId) -> Option<&mut RigidBody> {
        self.objects.get_mut(&id).and_then(|o| o.body.as_mut())
    }

    /// Reparent an object to an anchor (or detach with `None`)
    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.parent = parent;
        }
    }

    /// Register a spawnable template, returning its handle
    pub fn register_prefab(&mut self, template: WorldObject) -> PrefabId {
        self.next_id += 1;
        let id = PrefabId(self.next_id);
        self.prefabs.insert(id, template);
        id
    }

    /// Spawn a fresh instance of a registered template
    pub fn instantiate(&mut self, prefab: PrefabId) -> Result<ObjectId, SceneError> {
        let template = self
            .prefabs
            .get(&prefab)
            .cloned()
            .ok_or(SceneError::UnknownPrefab(prefab))?;
        Ok(self.spawn(template))
    }

    /// Move every mesh of an object to a render layer
    pub fn set_mesh_layer(&mut self, id: ObjectId, layer: u32) {
        if let Some(object) = self.objects.get_mut(&id) {
            for mesh in &mut object.meshes {
                mesh.layer = layer;
            }
        }
    }

    /// Toggle the proximity-highlight overlay on every mesh of an object
    pub fn set_mesh_overlay(&mut self, id: ObjectId, overlay: bool) {
        if let Some(object) = self.objects.get_mut(&id) {
            for mesh in &mut object.meshes {
                mesh.overlay = overlay;
            }
        }
    }

    /// Remove every collision shape from an object
    pub fn strip_colliders(&mut self, id: ObjectId) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.colliders.clear();
        }
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_despawn() {
        let mut scene = Scene::new();
        let id = scene.spawn(WorldObject::named("crate"));
        assert!(scene.is_alive(id));
        scene.despawn(id);
        assert!(!scene.is_alive(id));
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn test_instantiate_prefab() {
        let mut scene = Scene::new();
        let prefab = scene.register_prefab(WorldObject::named("key").with_body(0.2));
        let id = scene.instantiate(prefab).unwrap();
        assert_eq!(scene.get(id).unwrap().name, "key");
        assert_eq!(scene.get(id).unwrap().body.unwrap().mass, 0.2);
    }

    #[test]
    fn test_instantiate_unknown_prefab_fails() {
        let mut scene = Scene::new();
        assert!(scene.instantiate(PrefabId(99)).is_err());
    }

    #[test]
    fn test_strip_colliders_and_mesh_layer() {
        let mut scene = Scene::new();
        let id = scene.spawn(
            WorldObject::named("lantern")
                .with_mesh()
                .with_collider(ColliderId(1)),
        );
        scene.set_mesh_layer(id, 2);
        scene.strip_colliders(id);
        let object = scene.get(id).unwrap();
        assert_eq!(object.meshes[0].layer, 2);
        assert!(object.colliders.is_empty());
    }
}
