//! Gloam Core - Foundational types for the Gloam interaction subsystem
//!
//! This crate provides the types shared by the interaction and player crates:
//! - Object and prefab handles
//! - The scene registry (transform + rigid-body state the interactions read and write)
//! - Item data carried by collectables and the inventory
//! - The audio-sink and spatial-query collaborator contracts

pub mod audio;
pub mod error;
pub mod item;
pub mod scene;
pub mod spatial;
pub mod types;

pub use audio::{AudioSink, AudioTrack, ChannelId, MemoryAudio, SoundClip};
pub use error::SceneError;
pub use item::{ItemAction, ItemData, ItemEffect, ItemKind};
pub use scene::{MeshInstance, RigidBody, Scene, Transform, WorldObject};
pub use spatial::{EmptySpace, RayHit, SpatialQuery};
pub use types::{ColliderId, ObjectId, PrefabId};
