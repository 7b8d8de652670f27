//! Collectable world objects
//!
//! Collectables do not run a multi-frame lifecycle: one confirm press emits
//! a pickup or inspection event and disarms the interaction so it cannot
//! fire again while the controller removes the object from the world.

use gloam_core::{ItemData, ObjectId, SoundClip};

use crate::interaction::{
    Interaction, InteractionCtx, InteractionEvent, InteractionKind, InteractionState,
};

/// Item data plus the sound announced when it is picked up
#[derive(Debug, Clone)]
pub struct PickupPayload {
    pub item: ItemData,
    pub collect_clip: SoundClip,
}

impl PickupPayload {
    pub fn new(item: ItemData) -> Self {
        Self {
            item,
            collect_clip: SoundClip::new("sfx/handle_coins.ogg"),
        }
    }

    pub fn with_clip(mut self, clip: SoundClip) -> Self {
        self.collect_clip = clip;
        self
    }
}

/// An item picked up straight into the inventory
pub struct ConsumableInteraction {
    state: InteractionState,
    payload: PickupPayload,
}

impl ConsumableInteraction {
    pub fn new(owner: ObjectId, item: ItemData) -> Self {
        Self {
            state: InteractionState::new(owner),
            payload: PickupPayload::new(item),
        }
    }

    pub fn with_payload(owner: ObjectId, payload: PickupPayload) -> Self {
        Self {
            state: InteractionState::new(owner),
            payload,
        }
    }
}

impl Interaction for ConsumableInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Consumable
    }

    fn interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if !self.state.can_interact {
            return;
        }
        self.state.can_interact = false;
        ctx.events.push(InteractionEvent::ItemCollected {
            object: self.state.owner,
            item: Some(self.payload.item.clone()),
            sound: Some(self.payload.collect_clip.clone()),
            equip: false,
        });
    }
}

/// An item the player can hold in the hand and use on world objects
pub struct EquippableInteraction {
    state: InteractionState,
    payload: PickupPayload,
}

impl EquippableInteraction {
    pub fn new(owner: ObjectId, item: ItemData) -> Self {
        Self {
            state: InteractionState::new(owner),
            payload: PickupPayload::new(item),
        }
    }

    pub fn with_payload(owner: ObjectId, payload: PickupPayload) -> Self {
        Self {
            state: InteractionState::new(owner),
            payload,
        }
    }
}

impl Interaction for EquippableInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Equippable
    }

    fn interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if !self.state.can_interact {
            return;
        }
        self.state.can_interact = false;
        ctx.events.push(InteractionEvent::ItemCollected {
            object: self.state.owner,
            item: Some(self.payload.item.clone()),
            sound: Some(self.payload.collect_clip.clone()),
            equip: true,
        });
    }
}

/// A readable note: brings up the reading overlay and then joins the
/// inventory for re-reading.
pub struct InspectableInteraction {
    state: InteractionState,
    payload: PickupPayload,
    content: String,
    put_away_clip: SoundClip,
}

impl InspectableInteraction {
    /// Authored content may carry literal `\n` escapes; they become real
    /// line breaks here.
    pub fn new(owner: ObjectId, item: ItemData, content: impl Into<String>) -> Self {
        Self {
            state: InteractionState::new(owner),
            payload: PickupPayload::new(item).with_clip(SoundClip::new("sfx/draw_knife_2.ogg")),
            content: content.into().replace("\\n", "\n"),
            put_away_clip: SoundClip::new("sfx/draw_knife_3.ogg"),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Interaction for InspectableInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Inspectable
    }

    fn interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if !self.state.can_interact {
            return;
        }
        self.state.can_interact = false;
        ctx.events.push(InteractionEvent::NoteInspected {
            object: self.state.owner,
            item: Some(self.payload.item.clone()),
            content: self.content.clone(),
            open_sound: Some(self.payload.collect_clip.clone()),
            put_away_sound: Some(self.put_away_clip.clone()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloam_core::{MemoryAudio, Scene, WorldObject};

    use crate::dependents::DependentRegistry;
    use crate::interaction::PointerState;

    fn ctx<'a>(
        scene: &'a mut Scene,
        audio: &'a mut MemoryAudio,
        dependents: &'a mut DependentRegistry,
        events: &'a mut Vec<InteractionEvent>,
    ) -> InteractionCtx<'a> {
        InteractionCtx {
            dt: 0.016,
            scene,
            audio,
            dependents,
            events,
            pointer: PointerState::default(),
        }
    }

    #[test]
    fn test_pickup_fires_once() {
        let mut scene = Scene::new();
        let owner = scene.spawn(WorldObject::named("tonic"));
        let mut audio = MemoryAudio::new();
        let mut dependents = DependentRegistry::new();
        let mut events = Vec::new();

        let mut pickup = ConsumableInteraction::new(owner, ItemData::consumable("Nerve Tonic"));
        pickup.interact(&mut ctx(&mut scene, &mut audio, &mut dependents, &mut events));
        pickup.interact(&mut ctx(&mut scene, &mut audio, &mut dependents, &mut events));

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            InteractionEvent::ItemCollected { object, equip: false, .. } if *object == owner
        ));
        assert!(!pickup.state().can_interact);
    }

    #[test]
    fn test_equippable_requests_equip() {
        let mut scene = Scene::new();
        let owner = scene.spawn(WorldObject::named("key"));
        let mut audio = MemoryAudio::new();
        let mut dependents = DependentRegistry::new();
        let mut events = Vec::new();

        let mut pickup = EquippableInteraction::new(owner, ItemData::equippable("Cellar Key"));
        pickup.interact(&mut ctx(&mut scene, &mut audio, &mut dependents, &mut events));

        assert!(matches!(
            &events[0],
            InteractionEvent::ItemCollected { equip: true, .. }
        ));
    }

    #[test]
    fn test_note_unescapes_line_breaks() {
        let mut scene = Scene::new();
        let owner = scene.spawn(WorldObject::named("note"));
        let mut audio = MemoryAudio::new();
        let mut dependents = DependentRegistry::new();
        let mut events = Vec::new();

        let mut note = InspectableInteraction::new(
            owner,
            ItemData::inspectable("Torn Page"),
            "Don't go\\ndownstairs.",
        );
        assert_eq!(note.content(), "Don't go\ndownstairs.");

        note.interact(&mut ctx(&mut scene, &mut audio, &mut dependents, &mut events));
        assert!(matches!(
            &events[0],
            InteractionEvent::NoteInspected { content, .. } if content == "Don't go\ndownstairs."
        ));
    }
}
