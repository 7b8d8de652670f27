//! Spatial query collaborator contract
//!
//! The core never performs its own spatial queries; the host engine answers
//! segment ray casts through this trait.

use glam::Vec3;

use crate::types::ObjectId;

/// Result of a ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub object: ObjectId,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Ray-cast provider supplied by the host engine
pub trait SpatialQuery {
    /// Cast a segment from `from` to `to`, returning the first hit
    fn ray(&self, from: Vec3, to: Vec3) -> Option<RayHit>;
}

/// Query that hits nothing; useful for tests and empty scenes
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySpace;

impl SpatialQuery for EmptySpace {
    fn ray(&self, _from: Vec3, _to: Vec3) -> Option<RayHit> {
        None
    }
}
