//! Hinged door driven by vertical pointer drag
//!
//! The door rotates a pivot object around Y. Drag direction depends on which
//! side of the door the player grabbed, the pivot flip, and an optional
//! reversal, so pushing away always swings the door away. A locked door only
//! wiggles and rattles; a matching key item or an external unlock trigger
//! clears the lock.

use serde::{Deserialize, Serialize};

use gloam_core::{AudioTrack, ChannelId, ItemData, ObjectId, Scene, SoundClip};

use crate::interaction::{
    approx_eq, Interaction, InteractionCtx, InteractionKind, InteractionState, PromoteSetup,
};
use crate::rotation::{RotationActuator, RotationConfig};

/// Swing needed before the door counts as opened
const SHUT_ANGLE_THRESHOLD: f32 = 0.2;
/// Proximity to the frame at which an opened door slams shut
const SHUT_SNAP_RANGE: f32 = 0.05;
/// Angular slack a locked door still gives
const LOCK_WIGGLE: f32 = 0.02;
/// Pointer-to-angle scale
const INPUT_SCALE: f32 = 0.001;

/// Construction parameters for a door
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Swing magnitude in radians
    pub max_rotation: f32,
    /// Hinge on the opposite jamb; swings negative
    pub flip_pivot: bool,
    /// Extra input inversion for doors modeled back-to-front
    pub reverse_input: bool,
    pub locked: bool,
    /// Item name accepted by `use_item`
    pub unlock_key_name: String,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            max_rotation: 1.6,
            flip_pivot: false,
            reverse_input: false,
            locked: false,
            unlock_key_name: String::new(),
        }
    }
}

pub struct DoorInteraction {
    state: InteractionState,
    rot: RotationActuator,
    /// Pivot object whose Y rotation the door drives
    pivot: ObjectId,
    flip_pivot: bool,
    reverse_input: bool,
    locked: bool,
    unlock_key_name: String,
    /// Which side the player grabbed, resolved at promotion
    is_front: bool,
    /// Swung past the opened threshold since last shutting
    door_opened: bool,
    /// One-frame snap-back after an unlock
    was_just_unlocked: bool,
    shut_clip: SoundClip,
    locked_clip: SoundClip,
    shut_channel: ChannelId,
    locked_channel: ChannelId,
}

impl DoorInteraction {
    pub fn new(owner: ObjectId, pivot: ObjectId, scene: &Scene, config: DoorConfig) -> Self {
        let starting = scene
            .get(pivot)
            .map(|o| o.transform.rotation.y)
            .unwrap_or(0.0);
        let max = if config.flip_pivot {
            starting - config.max_rotation.abs()
        } else {
            starting + config.max_rotation.abs()
        };

        Self {
            state: InteractionState::new(owner),
            rot: RotationActuator::new(
                owner,
                SoundClip::new("sfx/door_creak.ogg"),
                RotationConfig {
                    creak_velocity_threshold: 0.005,
                    fade_speed: 1.0,
                    volume_scale: 1000.0,
                    smoothing: 80.0,
                },
                starting,
                max,
            ),
            pivot,
            flip_pivot: config.flip_pivot,
            reverse_input: config.reverse_input,
            locked: config.locked,
            unlock_key_name: config.unlock_key_name,
            is_front: true,
            door_opened: false,
            was_just_unlocked: false,
            shut_clip: SoundClip::new("sfx/door_close.ogg"),
            locked_clip: SoundClip::new("sfx/door_locked.ogg"),
            shut_channel: ChannelId::new(owner, AudioTrack::Shut),
            locked_channel: ChannelId::new(owner, AudioTrack::Locked),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Current pivot angle
    pub fn angle(&self) -> f32 {
        self.rot.current_angle
    }

    pub fn percentage(&self) -> f32 {
        self.rot.percentage()
    }

    /// External unlock trigger: clears the lock, snaps the door back to its
    /// frame and cancels any in-progress drag.
    pub fn unlock(&mut self) {
        self.locked = false;
        self.was_just_unlocked = true;
        self.rot.angular_velocity = 0.0;
        self.rot.input_active = false;
        self.rot.current_angle = self.rot.starting_angle;
    }

    fn write_pivot(&self, scene: &mut Scene) {
        if let Some(object) = scene.get_mut(self.pivot) {
            object.transform.rotation.y = self.rot.current_angle;
        }
    }
}

impl Interaction for DoorInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Door
    }

    fn configure(&mut self, setup: &PromoteSetup) {
        self.is_front = setup.hit_local.z > 0.0;
    }

    fn pre_interact(&mut self, _ctx: &mut InteractionCtx<'_>) {
        self.state.is_interacting = true;
        self.state.lock_camera = true;
        self.rot.previous_angle = self.rot.current_angle;
    }

    fn interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if ctx.pointer.delta.y == 0.0 {
            return;
        }

        let mut input_delta = -ctx.pointer.delta.y * INPUT_SCALE;
        if !self.is_front {
            input_delta = -input_delta;
        }
        if self.flip_pivot {
            input_delta = -input_delta;
        }
        if self.reverse_input {
            input_delta = -input_delta;
        }
        // Ease very small drags so the door does not jitter
        if input_delta.abs() < 0.01 {
            input_delta *= 0.25;
        }

        self.rot.input_active = true;
        self.rot.allow_movement_sound = true;
        self.rot.smooth_toward(input_delta);
    }

    fn tick(&mut self, ctx: &mut InteractionCtx<'_>) {
        if self.was_just_unlocked {
            self.rot.angular_velocity = 0.0;
            self.rot.input_active = false;
            self.rot.current_angle = self.rot.starting_angle;
            self.rot.previous_angle = self.rot.starting_angle;
            self.write_pivot(ctx.scene);
            self.was_just_unlocked = false;
        } else {
            if !self.rot.input_active {
                self.rot.damp(ctx.dt);
            }
            self.rot.current_angle += self.rot.angular_velocity;

            if self.locked {
                let start = self.rot.starting_angle;
                self.rot.current_angle = if self.flip_pivot {
                    self.rot.current_angle.clamp(start - LOCK_WIGGLE, start)
                } else {
                    self.rot.current_angle.clamp(start, start + LOCK_WIGGLE)
                };
                self.write_pivot(ctx.scene);

                // Rattle once per failed attempt: input moved the door and
                // the previous rattle finished
                if self.rot.input_active
                    && !ctx.audio.is_playing(self.locked_channel)
                    && !approx_eq(self.rot.previous_angle, self.rot.current_angle)
                {
                    ctx.audio.play_on(self.locked_channel, &self.locked_clip, 1.0);
                    self.rot.input_active = false;
                }
            } else {
                self.rot.clamp_to_range();
                self.write_pivot(ctx.scene);
                self.rot.input_active = false;

                if approx_eq(self.rot.previous_angle, self.rot.current_angle) {
                    self.rot.stop_movement_sound(ctx.audio, ctx.dt);
                } else {
                    self.rot.play_movement_sound(ctx.audio, ctx.dt);
                }
            }

            self.rot.previous_angle = self.rot.current_angle;
        }

        let swing = (self.rot.current_angle - self.rot.starting_angle).abs();
        if swing > SHUT_ANGLE_THRESHOLD {
            self.door_opened = true;
        }
        if self.door_opened && swing < SHUT_SNAP_RANGE {
            self.rot.cut_movement_sound(ctx.audio);
            self.rot.angular_velocity = 0.0;
            ctx.audio.stop(self.shut_channel);
            ctx.audio.play_on(self.shut_channel, &self.shut_clip, 1.0);
            self.door_opened = false;
        }
    }

    fn use_item(&mut self, item: &ItemData) -> bool {
        if !self.unlock_key_name.is_empty() && item.name == self.unlock_key_name {
            self.locked = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use gloam_core::{MemoryAudio, WorldObject};

    use crate::dependents::DependentRegistry;
    use crate::interaction::{InteractionEvent, PointerState};

    struct Rig {
        scene: Scene,
        audio: MemoryAudio,
        dependents: DependentRegistry,
        events: Vec<InteractionEvent>,
        owner: ObjectId,
        pivot: ObjectId,
    }

    impl Rig {
        fn new() -> Self {
            let mut scene = Scene::new();
            let pivot = scene.spawn(WorldObject::named("door_pivot"));
            let owner = scene.spawn(WorldObject::named("door"));
            Self {
                scene,
                audio: MemoryAudio::new(),
                dependents: DependentRegistry::new(),
                events: Vec::new(),
                owner,
                pivot,
            }
        }

        fn ctx(&mut self, delta: Vec2) -> InteractionCtx<'_> {
            InteractionCtx {
                dt: 0.016,
                scene: &mut self.scene,
                audio: &mut self.audio,
                dependents: &mut self.dependents,
                events: &mut self.events,
                pointer: PointerState {
                    delta,
                    position: Vec2::ZERO,
                },
            }
        }
    }

    fn door(rig: &Rig, config: DoorConfig) -> DoorInteraction {
        DoorInteraction::new(rig.owner, rig.pivot, &rig.scene, config)
    }

    fn setup_front() -> PromoteSetup {
        PromoteSetup {
            hit_object: ObjectId(0),
            hit_point: Vec3::ZERO,
            hit_local: Vec3::new(0.0, 0.0, 0.5),
            hand_anchor: None,
            pivot_screen: None,
            pointer_position: Vec2::ZERO,
        }
    }

    fn drag(door: &mut DoorInteraction, rig: &mut Rig, pointer_y: f32, frames: usize) {
        for _ in 0..frames {
            let mut ctx = rig.ctx(Vec2::new(0.0, pointer_y));
            door.interact(&mut ctx);
            door.tick(&mut ctx);
        }
    }

    #[test]
    fn test_angle_stays_clamped_through_drags() {
        let mut rig = Rig::new();
        let mut door = door(&rig, DoorConfig::default());
        door.configure(&setup_front());
        door.pre_interact(&mut rig.ctx(Vec2::ZERO));

        // Wild alternating drags must never escape the range
        drag(&mut door, &mut rig, -400.0, 120);
        assert!(door.angle() >= 0.0 && door.angle() <= 1.6);
        drag(&mut door, &mut rig, 400.0, 240);
        assert!(door.angle() >= 0.0 && door.angle() <= 1.6);
    }

    #[test]
    fn test_flipped_door_swings_negative() {
        let mut rig = Rig::new();
        let mut door = door(
            &rig,
            DoorConfig {
                flip_pivot: true,
                ..Default::default()
            },
        );
        door.configure(&setup_front());
        door.pre_interact(&mut rig.ctx(Vec2::ZERO));
        drag(&mut door, &mut rig, -400.0, 120);
        assert!(door.angle() <= 0.0 && door.angle() >= -1.6);
    }

    #[test]
    fn test_locked_door_only_wiggles_and_rattles_once() {
        let mut rig = Rig::new();
        let mut door = door(
            &rig,
            DoorConfig {
                locked: true,
                ..Default::default()
            },
        );
        door.configure(&setup_front());
        door.pre_interact(&mut rig.ctx(Vec2::ZERO));
        drag(&mut door, &mut rig, -400.0, 60);

        assert!(door.angle() <= LOCK_WIGGLE + 1.0e-6);
        // The rattle is serialized on its channel: one playback started
        assert_eq!(rig.audio.times_played("sfx/door_locked.ogg"), 1);
    }

    #[test]
    fn test_use_item_key_matching() {
        let mut rig = Rig::new();
        let mut door = door(
            &rig,
            DoorConfig {
                locked: true,
                unlock_key_name: "Cellar Key".to_string(),
                ..Default::default()
            },
        );

        let wrong = ItemData::equippable("Rusty Spoon");
        assert!(!door.use_item(&wrong));
        assert!(door.is_locked());

        let key = ItemData::equippable("Cellar Key");
        assert!(door.use_item(&key));
        assert!(!door.is_locked());
    }

    #[test]
    fn test_unlock_snaps_back_to_start() {
        let mut rig = Rig::new();
        let mut door = door(&rig, DoorConfig::default());
        door.configure(&setup_front());
        door.pre_interact(&mut rig.ctx(Vec2::ZERO));
        drag(&mut door, &mut rig, -400.0, 120);
        assert!(door.angle() > 0.5);

        door.unlock();
        let mut ctx = rig.ctx(Vec2::ZERO);
        door.tick(&mut ctx);
        assert_eq!(door.angle(), 0.0);
        assert_eq!(
            rig.scene.get(rig.pivot).unwrap().transform.rotation.y,
            0.0
        );
    }

    #[test]
    fn test_shut_sound_after_open_close_cycle() {
        let mut rig = Rig::new();
        let mut door = door(&rig, DoorConfig::default());
        door.configure(&setup_front());
        door.pre_interact(&mut rig.ctx(Vec2::ZERO));

        drag(&mut door, &mut rig, -400.0, 120);
        assert!(door.angle() > SHUT_ANGLE_THRESHOLD);
        drag(&mut door, &mut rig, 400.0, 240);
        assert!(door.angle() < SHUT_SNAP_RANGE);
        assert_eq!(rig.audio.times_played("sfx/door_close.ogg"), 1);
    }
}
