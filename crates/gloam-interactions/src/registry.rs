//! Interaction registry
//!
//! Maps world objects to their interaction components so the controller can
//! resolve a raycast candidate in O(1) instead of re-walking scene
//! ancestors every frame. Several objects may resolve to one interaction:
//! each keypad button binds to its keypad.

use std::collections::HashMap;

use gloam_core::ObjectId;

use crate::interaction::{Interaction, InteractionCtx};

/// Handle to an interaction stored in an [`InteractionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionId(u64);

/// Owns every interaction in the world and drives their per-frame ticks
#[derive(Default)]
pub struct InteractionSet {
    interactions: HashMap<InteractionId, Box<dyn Interaction>>,
    by_object: HashMap<ObjectId, InteractionId>,
    next_id: u64,
}

impl InteractionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interaction, binding its owner object for candidate lookup
    pub fn insert(&mut self, interaction: Box<dyn Interaction>) -> InteractionId {
        self.next_id += 1;
        let id = InteractionId(self.next_id);
        self.by_object.insert(interaction.state().owner, id);
        self.interactions.insert(id, interaction);
        id
    }

    /// Bind an additional object to an interaction (keypad buttons, pivot
    /// children)
    pub fn bind_object(&mut self, object: ObjectId, id: InteractionId) {
        self.by_object.insert(object, id);
    }

    /// Resolve the interaction a hit object belongs to
    pub fn resolve(&self, object: ObjectId) -> Option<InteractionId> {
        self.by_object.get(&object).copied()
    }

    pub fn get(&self, id: InteractionId) -> Option<&dyn Interaction> {
        self.interactions.get(&id).map(|i| i.as_ref())
    }

    pub fn get_mut(&mut self, id: InteractionId) -> Option<&mut Box<dyn Interaction>> {
        self.interactions.get_mut(&id)
    }

    /// Drop an interaction and every object binding pointing at it
    pub fn remove(&mut self, id: InteractionId) {
        self.interactions.remove(&id);
        self.by_object.retain(|_, bound| *bound != id);
    }

    /// Per-frame tick for every interaction
    pub fn tick_all(&mut self, ctx: &mut InteractionCtx<'_>) {
        for interaction in self.interactions.values_mut() {
            interaction.tick(ctx);
        }
    }

    /// Fixed-rate physics tick for every interaction
    pub fn physics_tick_all(&mut self, ctx: &mut InteractionCtx<'_>) {
        for interaction in self.interactions.values_mut() {
            interaction.physics_tick(ctx);
        }
    }

    /// Route a body contact to the interaction owning the object
    pub fn notify_contact(&mut self, object: ObjectId, ctx: &mut InteractionCtx<'_>) {
        if let Some(id) = self.resolve(object) {
            if let Some(interaction) = self.interactions.get_mut(&id) {
                interaction.on_contact(ctx);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{InteractionKind, InteractionState};

    struct Stub {
        state: InteractionState,
    }

    impl Interaction for Stub {
        fn state(&self) -> &InteractionState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut InteractionState {
            &mut self.state
        }
        fn kind(&self) -> InteractionKind {
            InteractionKind::Switch
        }
    }

    #[test]
    fn test_resolve_owner_and_bound_objects() {
        let mut set = InteractionSet::new();
        let id = set.insert(Box::new(Stub {
            state: InteractionState::new(ObjectId(10)),
        }));
        set.bind_object(ObjectId(11), id);

        assert_eq!(set.resolve(ObjectId(10)), Some(id));
        assert_eq!(set.resolve(ObjectId(11)), Some(id));
        assert_eq!(set.resolve(ObjectId(12)), None);

        set.remove(id);
        assert_eq!(set.resolve(ObjectId(10)), None);
        assert_eq!(set.resolve(ObjectId(11)), None);
    }
}
