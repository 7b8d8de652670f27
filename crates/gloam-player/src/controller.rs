//! Interaction arbitration
//!
//! The controller is the only writer of interaction lifecycles: it resolves
//! the aimed-at candidate through the registry, promotes it on a confirm
//! press, drives the held/release lifecycle, and drains the events the
//! interactions emit. Exactly one interaction is active at a time.

use glam::{EulerRot, Quat, Vec3};
use tracing::debug;

use gloam_core::{AudioSink, AudioTrack, ChannelId, ItemData, ObjectId, RayHit, Scene, SoundClip};
use gloam_interactions::{
    DependentRegistry, Interaction, InteractionCtx, InteractionEvent, InteractionId,
    InteractionSet, PromoteSetup,
};

use crate::camera::CameraView;
use crate::input::FrameInput;
use crate::inventory::Inventory;

/// Interactions further away than this are dropped mid-lifecycle
const MAX_INTERACT_DISTANCE: f32 = 5.0;
/// Seconds the transient feedback text stays up
const TEXT_DURATION: f32 = 1.0;
/// Render layer equipped items and held notes move to
const HAND_LAYER: u32 = 2;

const FAILURE_VOLUME: f32 = 0.056;
const SUCCESS_VOLUME: f32 = 0.316;
const EQUIP_VOLUME: f32 = 0.1;

const TEXT_INVENTORY_FULL: &str = "Inventory Full...";
const TEXT_NOTHING_TO_USE_ON: &str = "Nothing to be used on...";
const TEXT_NOTHING_HAPPENS: &str = "Nothing interesting happens...";
const TEXT_USED: &str = "Used.";

/// Which reticle the HUD shows, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReticleState {
    Default,
    /// Aiming at something interactable
    Highlight,
    /// An interaction is running
    Interacting,
    /// An equipped item will be used on the target
    Use,
}

/// Requests the controller hands back to the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Capture (true) or release (false) the OS pointer
    PointerCapture(bool),
}

/// A note currently held up for reading
struct HeldNote {
    object: Option<ObjectId>,
    item: Option<ItemData>,
    put_away_sound: Option<SoundClip>,
}

pub struct InteractionController {
    /// Anchor grabbables are pulled toward
    hand: ObjectId,
    /// Anchor held notes attach to
    note_hand: ObjectId,
    /// Anchor equipped items attach to
    item_hand: ObjectId,

    active: Option<InteractionId>,
    candidate: Option<InteractionId>,
    equipped: Option<(ObjectId, ItemData)>,
    note: Option<HeldNote>,
    note_content: Option<String>,
    reticle: ReticleState,
    /// Feedback text and its remaining display time
    text: Option<(String, f32)>,

    failure_clip: SoundClip,
    success_clip: SoundClip,
    equip_clip: SoundClip,
    failure_channel: ChannelId,
}

fn make_ctx<'a>(
    frame: FrameInput,
    scene: &'a mut Scene,
    audio: &'a mut dyn AudioSink,
    dependents: &'a mut DependentRegistry,
    events: &'a mut Vec<InteractionEvent>,
) -> InteractionCtx<'a> {
    InteractionCtx {
        dt: frame.dt,
        scene,
        audio,
        dependents,
        events,
        pointer: frame.pointer,
    }
}

impl InteractionController {
    /// Create a controller wired to the player's anchor objects
    pub fn new(player: ObjectId, hand: ObjectId, note_hand: ObjectId, item_hand: ObjectId) -> Self {
        Self {
            hand,
            note_hand,
            item_hand,
            active: None,
            candidate: None,
            equipped: None,
            note: None,
            note_content: None,
            reticle: ReticleState::Default,
            text: None,
            failure_clip: SoundClip::new("sfx/key_use_failure.wav"),
            success_clip: SoundClip::new("sfx/key_use_success.ogg"),
            equip_clip: SoundClip::new("sfx/key_equip.ogg"),
            failure_channel: ChannelId::new(player, AudioTrack::Feedback),
        }
    }

    pub fn reticle(&self) -> ReticleState {
        self.reticle
    }

    pub fn is_item_equipped(&self) -> bool {
        self.equipped.is_some()
    }

    /// Feedback text currently on screen
    pub fn interaction_text(&self) -> Option<&str> {
        self.text.as_ref().map(|(text, _)| text.as_str())
    }

    /// Content of the note overlay, when one is open
    pub fn note_overlay(&self) -> Option<&str> {
        self.note_content.as_deref()
    }

    /// Whether the look control must be suppressed this frame
    pub fn is_camera_locked(&self, interactions: &InteractionSet) -> bool {
        self.active
            .and_then(|id| interactions.get(id))
            .map(|i| i.state().lock_camera && i.state().is_interacting)
            .unwrap_or(false)
    }

    /// Per-frame arbitration. `aim` is the host's raycast along the camera
    /// center.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        frame: FrameInput,
        camera: &CameraView,
        aim: Option<RayHit>,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        interactions: &mut InteractionSet,
        dependents: &mut DependentRegistry,
        inventory: &mut Inventory,
    ) -> Vec<PlayerEvent> {
        let mut out = Vec::new();
        let mut events = Vec::new();

        if let Some((_, remaining)) = &mut self.text {
            *remaining -= frame.dt;
            if *remaining <= 0.0 {
                self.text = None;
            }
        }

        if inventory.ui_open {
            if let Some(id) = self.active.take() {
                if let Some(interaction) = interactions.get_mut(id) {
                    let mut ctx = make_ctx(frame, scene, audio, dependents, &mut events);
                    interaction.post_interact(&mut ctx);
                }
            }
            self.candidate = None;
            self.drain_events(&mut events, scene, audio, interactions, inventory, &mut out);
            self.reticle = ReticleState::Default;
            return out;
        }

        if self.note_content.is_some() && frame.primary_pressed {
            self.stow_note(scene, audio, inventory);
            self.update_reticle(interactions);
            return out;
        }

        self.candidate = aim
            .as_ref()
            .and_then(|hit| interactions.resolve(hit.object));

        if self.equipped.is_some() && self.active.is_none() && frame.primary_pressed {
            self.use_equipped(aim.as_ref(), scene, audio, interactions, inventory);
        } else if self.active.is_some() {
            self.process_active(
                frame, camera, aim.as_ref(), scene, audio, dependents, interactions, inventory,
                &mut events,
            );
        } else if frame.primary_pressed {
            self.try_promote(
                frame, camera, aim.as_ref(), scene, audio, dependents, interactions, &mut events,
            );
        }

        self.drain_events(&mut events, scene, audio, interactions, inventory, &mut out);
        self.update_reticle(interactions);
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn process_active(
        &mut self,
        frame: FrameInput,
        camera: &CameraView,
        aim: Option<&RayHit>,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        dependents: &mut DependentRegistry,
        interactions: &mut InteractionSet,
        inventory: &Inventory,
        events: &mut Vec<InteractionEvent>,
    ) {
        let Some(id) = self.active else { return };
        let Some(owner) = interactions.get(id).map(|i| i.state().owner) else {
            // The interaction vanished out from under us; the pointer still
            // has to come back
            events.push(InteractionEvent::SetPointerCaptured(true));
            self.active = None;
            return;
        };
        if !scene.is_alive(owner) {
            // Owner destroyed mid-interaction: close the lifecycle so the
            // camera lock and pointer capture are restored
            if let Some(interaction) = interactions.get_mut(id) {
                let mut ctx = make_ctx(frame, scene, audio, dependents, events);
                interaction.post_interact(&mut ctx);
            }
            interactions.remove(id);
            self.active = None;
            return;
        }

        // The player wandered off mid-interaction
        if let Some(hit) = aim {
            if camera.position.distance(hit.point) > MAX_INTERACT_DISTANCE {
                if let Some(interaction) = interactions.get_mut(id) {
                    let mut ctx = make_ctx(frame, scene, audio, dependents, events);
                    interaction.post_interact(&mut ctx);
                }
                self.active = None;
                return;
            }
        }

        if frame.secondary_pressed {
            if let Some(interaction) = interactions.get_mut(id) {
                let mut ctx = make_ctx(frame, scene, audio, dependents, events);
                interaction.aux_interact(&mut ctx);
                interaction.post_interact(&mut ctx);
            }
            self.active = None;
            return;
        }

        if frame.primary_held {
            let Some(interaction) = interactions.get_mut(id) else {
                self.active = None;
                return;
            };

            if interaction.kind().is_collectable() && inventory.inventory_full() {
                if !audio.is_playing(self.failure_channel) {
                    audio.play_on(self.failure_channel, &self.failure_clip, FAILURE_VOLUME);
                    self.show_text(TEXT_INVENTORY_FULL);
                }
                return;
            }

            let mut ctx = make_ctx(frame, scene, audio, dependents, events);
            interaction.interact(&mut ctx);
            return;
        }

        // Confirm released: the lifecycle ends
        if let Some(interaction) = interactions.get_mut(id) {
            let mut ctx = make_ctx(frame, scene, audio, dependents, events);
            interaction.post_interact(&mut ctx);
        }
        self.active = None;
    }

    #[allow(clippy::too_many_arguments)]
    fn try_promote(
        &mut self,
        frame: FrameInput,
        camera: &CameraView,
        aim: Option<&RayHit>,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        dependents: &mut DependentRegistry,
        interactions: &mut InteractionSet,
        events: &mut Vec<InteractionEvent>,
    ) {
        let (Some(hit), Some(id)) = (aim, self.candidate) else {
            return;
        };
        let Some(interaction) = interactions.get_mut(id) else {
            return;
        };
        if !interaction.state().can_interact {
            return;
        }

        let owner = interaction.state().owner;
        let hit_local = scene
            .get(owner)
            .map(|object| {
                let r = object.transform.rotation;
                Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z).inverse()
                    * (hit.point - object.transform.position)
            })
            .unwrap_or(Vec3::ZERO);
        let pivot_screen = scene.position(owner).and_then(|p| camera.project(p));

        interaction.configure(&PromoteSetup {
            hit_object: hit.object,
            hit_point: hit.point,
            hit_local,
            hand_anchor: Some(self.hand),
            pivot_screen,
            pointer_position: frame.pointer.position,
        });

        let mut ctx = make_ctx(frame, scene, audio, dependents, events);
        interaction.pre_interact(&mut ctx);
        self.active = Some(id);
    }

    /// Fire the equipped item at whatever the player is aiming at
    fn use_equipped(
        &mut self,
        aim: Option<&RayHit>,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        interactions: &mut InteractionSet,
        inventory: &mut Inventory,
    ) {
        let Some((_, item)) = self.equipped.clone() else {
            return;
        };

        if aim.is_none() {
            self.show_text(TEXT_NOTHING_TO_USE_ON);
            self.fail_equipped_use(scene, audio, inventory);
            return;
        }

        let accepted = self
            .candidate
            .and_then(|id| interactions.get_mut(id))
            .map(|interaction| interaction.use_item(&item))
            .unwrap_or(false);
        if !accepted {
            self.show_text(TEXT_NOTHING_HAPPENS);
            self.fail_equipped_use(scene, audio, inventory);
            return;
        }

        audio.play(&self.success_clip, SUCCESS_VOLUME);
        self.show_text(
            item.action
                .success_text
                .clone()
                .unwrap_or_else(|| TEXT_USED.to_owned()),
        );

        if item.action.one_time_use {
            if let Some((object, _)) = self.equipped.take() {
                scene.despawn(object);
            }
        }
    }

    /// A failed use returns the item to the inventory and empties the hand
    fn fail_equipped_use(
        &mut self,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        inventory: &mut Inventory,
    ) {
        audio.play_on(self.failure_channel, &self.failure_clip, FAILURE_VOLUME);

        if let Some((object, item)) = self.equipped.take() {
            inventory.pickup_item(item);
            scene.despawn(object);
        }
        self.candidate = None;
    }

    fn drain_events(
        &mut self,
        events: &mut Vec<InteractionEvent>,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        interactions: &mut InteractionSet,
        inventory: &mut Inventory,
        out: &mut Vec<PlayerEvent>,
    ) {
        for event in events.drain(..) {
            match event {
                InteractionEvent::SetPointerCaptured(captured) => {
                    out.push(PlayerEvent::PointerCapture(captured));
                }
                InteractionEvent::ItemCollected {
                    object,
                    item,
                    sound,
                    equip,
                } => {
                    if let Some(clip) = &sound {
                        audio.play(clip, 1.0);
                    }

                    if self.active == interactions.resolve(object) {
                        self.active = None;
                    }

                    if equip && self.equipped.is_none() {
                        if let Some(item) = item {
                            self.equip_object(object, item, scene, audio, interactions);
                        }
                    } else {
                        match item {
                            Some(item) => {
                                inventory.pickup_item(item);
                            }
                            None => debug!(object = object.0, "collected object had no item data"),
                        }
                        if let Some(id) = interactions.resolve(object) {
                            interactions.remove(id);
                        }
                        scene.despawn(object);
                    }
                }
                InteractionEvent::NoteInspected {
                    object,
                    item,
                    content,
                    open_sound,
                    put_away_sound,
                } => {
                    if self.note_content.is_some() {
                        self.stow_note(scene, audio, inventory);
                    }
                    if let Some(clip) = &open_sound {
                        audio.play(clip, 1.0);
                    }
                    if self.active == interactions.resolve(object) {
                        self.active = None;
                    }
                    if let Some(id) = interactions.resolve(object) {
                        interactions.remove(id);
                    }

                    self.hold_in_hand(object, self.note_hand, scene);
                    if let Some(note) = scene.get_mut(object) {
                        note.transform.rotation =
                            Vec3::new(std::f32::consts::FRAC_PI_2, 10.0_f32.to_radians(), 0.0);
                    }

                    self.note = Some(HeldNote {
                        object: Some(object),
                        item,
                        put_away_sound,
                    });
                    self.note_content = Some(content);
                }
            }
        }
    }

    /// Close the note overlay and stow the note into the inventory
    fn stow_note(&mut self, scene: &mut Scene, audio: &mut dyn AudioSink, inventory: &mut Inventory) {
        if let Some(note) = self.note.take() {
            if let Some(clip) = &note.put_away_sound {
                audio.play(clip, 1.0);
            }
            if let Some(item) = note.item {
                inventory.pickup_item(item);
            }
            if let Some(object) = note.object {
                scene.despawn(object);
            }
        }
        self.note_content = None;
    }

    /// Move a world object into the player's hand: physics off, overlay
    /// render layer, collision gone.
    fn hold_in_hand(&self, object: ObjectId, anchor: ObjectId, scene: &mut Scene) {
        if let Some(body) = scene.body_mut(object) {
            body.frozen = true;
            body.linear_velocity = Vec3::ZERO;
            body.angular_velocity = Vec3::ZERO;
            body.gravity_scale = 0.0;
        }
        scene.set_parent(object, Some(anchor));
        if let Some(anchor_position) = scene.position(anchor) {
            if let Some(held) = scene.get_mut(object) {
                held.transform.position = anchor_position;
            }
        }
        scene.set_mesh_layer(object, HAND_LAYER);
        scene.strip_colliders(object);
    }

    /// Put a world object into the item hand as the equipped item
    fn equip_object(
        &mut self,
        object: ObjectId,
        item: ItemData,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        interactions: &mut InteractionSet,
    ) {
        self.hold_in_hand(object, self.item_hand, scene);
        if let Some(held) = scene.get_mut(object) {
            held.transform.rotation =
                Vec3::new(0.0, std::f32::consts::PI, -std::f32::consts::FRAC_PI_2);
        }
        // No longer a world candidate while held
        if let Some(id) = interactions.resolve(object) {
            interactions.remove(id);
        }

        audio.play(&self.equip_clip, EQUIP_VOLUME);
        self.equipped = Some((object, item));
    }

    /// Equip an item out of an inventory slot. Refused while something is
    /// already in the hand.
    pub fn equip_from_inventory(
        &mut self,
        slot: usize,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        interactions: &mut InteractionSet,
        inventory: &mut Inventory,
    ) -> bool {
        if self.equipped.is_some() {
            return false;
        }
        let Some(prefab) = inventory.item(slot).and_then(|item| item.prefab) else {
            return false;
        };
        let Ok(object) = scene.instantiate(prefab) else {
            return false;
        };
        let Some(item) = inventory.take(slot) else {
            scene.despawn(object);
            return false;
        };

        self.equip_object(object, item, scene, audio, interactions);
        true
    }

    /// Re-open a collected note from an inventory slot
    pub fn view_from_inventory(
        &mut self,
        slot: usize,
        scene: &mut Scene,
        audio: &mut dyn AudioSink,
        inventory: &mut Inventory,
    ) {
        let Some(item) = inventory.take(slot) else {
            return;
        };
        if self.note_content.is_some() {
            self.stow_note(scene, audio, inventory);
        }

        let object = item.prefab.and_then(|prefab| scene.instantiate(prefab).ok());
        if let Some(object) = object {
            self.hold_in_hand(object, self.note_hand, scene);
        }

        audio.play(&SoundClip::new("sfx/draw_knife_2.ogg"), 1.0);
        self.note_content = Some(item.description.clone());
        self.note = Some(HeldNote {
            object,
            item: Some(item),
            put_away_sound: Some(SoundClip::new("sfx/draw_knife_3.ogg")),
        });
    }

    /// A collectable walked into pickup range: highlight it
    pub fn collectable_entered_range(
        &self,
        object: ObjectId,
        scene: &mut Scene,
        interactions: &InteractionSet,
    ) {
        if is_pickup(object, interactions) {
            scene.set_mesh_overlay(object, true);
        }
    }

    /// A collectable left pickup range: drop the highlight
    pub fn collectable_exited_range(
        &self,
        object: ObjectId,
        scene: &mut Scene,
        interactions: &InteractionSet,
    ) {
        if is_pickup(object, interactions) {
            scene.set_mesh_overlay(object, false);
        }
    }

    fn show_text(&mut self, text: impl Into<String>) {
        self.text = Some((text.into(), TEXT_DURATION));
    }

    fn update_reticle(&mut self, interactions: &InteractionSet) {
        if self.equipped.is_some() {
            self.reticle = ReticleState::Use;
            return;
        }

        if let Some(interaction) = self.active.and_then(|id| interactions.get(id)) {
            self.reticle = if interaction.state().is_interacting {
                ReticleState::Interacting
            } else if interaction.state().can_interact {
                ReticleState::Highlight
            } else {
                ReticleState::Default
            };
            return;
        }

        let highlight = self
            .candidate
            .and_then(|id| interactions.get(id))
            .map(|i| i.state().can_interact)
            .unwrap_or(false);
        self.reticle = if highlight {
            ReticleState::Highlight
        } else {
            ReticleState::Default
        };
    }
}

fn is_pickup(object: ObjectId, interactions: &InteractionSet) -> bool {
    interactions
        .resolve(object)
        .and_then(|id| interactions.get(id))
        .map(|i| {
            matches!(
                i.kind(),
                gloam_interactions::InteractionKind::Consumable
                    | gloam_interactions::InteractionKind::Equippable
            )
        })
        .unwrap_or(false)
}
