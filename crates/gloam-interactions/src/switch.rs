//! Lever switch with endpoint snapping
//!
//! Dragging rotates the switch body around Z between its endpoints. On
//! release the switch snaps home when barely moved (< 30% travel) or to the
//! far endpoint when mostly thrown (> 70%); anywhere in the middle band it
//! stays put. Dependents are notified with the travel percentage both while
//! dragging and while snapping.

use gloam_core::{AudioTrack, ChannelId, ObjectId, Scene, SoundClip};

use crate::interaction::{
    lerp, Interaction, InteractionCtx, InteractionEvent, InteractionKind, InteractionState,
};
use crate::rotation::{RotationActuator, RotationConfig};

/// Released below this travel fraction: snap back to start
const SNAP_BACK_BAND: f32 = 0.3;
/// Released above this travel fraction: snap to the far endpoint
const SNAP_FORWARD_BAND: f32 = 0.7;
/// Distance at which a snap settles onto its target
const SNAP_SETTLE: f32 = 0.01;
/// Pointer-to-angle scale
const INPUT_SCALE: f32 = 0.001;

pub struct SwitchInteraction {
    state: InteractionState,
    rot: RotationActuator,
    /// Damped interpolation toward `snap_target` is in progress
    snapping: bool,
    /// Travelled enough this hold to count as moved
    moved: bool,
    /// Fires the snap sound exactly once per snap
    kickback_triggered: bool,
    snap_target: f32,
    snap_clip: SoundClip,
    snap_channel: ChannelId,
}

impl SwitchInteraction {
    /// Create a switch on `owner`, sweeping `max_rotation` radians from the
    /// object's current Z rotation.
    pub fn new(owner: ObjectId, scene: &Scene, max_rotation: f32) -> Self {
        let starting = scene
            .get(owner)
            .map(|o| o.transform.rotation.z)
            .unwrap_or(0.0);

        Self {
            state: InteractionState::new(owner),
            rot: RotationActuator::new(
                owner,
                SoundClip::new("sfx/lever_pull.ogg"),
                RotationConfig {
                    creak_velocity_threshold: 0.0001,
                    fade_speed: 50.0,
                    volume_scale: 1000.0,
                    smoothing: 8.0,
                },
                starting,
                starting + max_rotation,
            ),
            snapping: false,
            moved: false,
            kickback_triggered: false,
            snap_target: starting,
            snap_clip: SoundClip::new("sfx/lever_snap.ogg"),
            snap_channel: ChannelId::new(owner, AudioTrack::Snap),
        }
    }

    pub fn angle(&self) -> f32 {
        self.rot.current_angle
    }

    pub fn percentage(&self) -> f32 {
        self.rot.percentage()
    }

    fn write_rotation(&self, scene: &mut Scene) {
        if let Some(object) = scene.get_mut(self.state.owner) {
            object.transform.rotation.z = self.rot.current_angle;
        }
    }

    fn at_endpoint(&self) -> bool {
        (self.rot.current_angle - self.rot.max_angle).abs() < SNAP_SETTLE
            || (self.rot.current_angle - self.rot.starting_angle).abs() < SNAP_SETTLE
    }
}

impl Interaction for SwitchInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Switch
    }

    fn pre_interact(&mut self, _ctx: &mut InteractionCtx<'_>) {
        self.state.is_interacting = true;
        self.state.lock_camera = true;
        self.moved = false;
        self.rot.previous_angle = self.rot.current_angle;
    }

    fn interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if ctx.pointer.delta.y == 0.0 {
            return;
        }

        let before = self.rot.current_angle;
        self.rot.current_angle += ctx.pointer.delta.y * INPUT_SCALE;
        self.rot.clamp_to_range();
        self.write_rotation(ctx.scene);

        if (self.rot.current_angle - before).abs() > SNAP_SETTLE {
            self.moved = true;
        }

        let percentage = self.rot.percentage();
        ctx.dependents.notify(&self.state.affected, percentage * 100.0);
    }

    fn post_interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        self.state.is_interacting = false;
        self.state.lock_camera = false;
        ctx.events.push(InteractionEvent::SetPointerCaptured(true));

        let percentage = self.rot.percentage();
        if percentage < SNAP_BACK_BAND {
            self.snap_target = self.rot.starting_angle;
            self.snapping = true;
        } else if percentage > SNAP_FORWARD_BAND {
            self.snap_target = self.rot.max_angle;
            self.snapping = true;
        }
    }

    fn tick(&mut self, ctx: &mut InteractionCtx<'_>) {
        self.rot.allow_movement_sound = true;

        if self.state.is_interacting {
            self.rot.play_movement_sound(ctx.audio, ctx.dt);
            // Hitting an endpoint mid-drag clacks once per travel
            if self.moved && self.at_endpoint() {
                ctx.audio.play_on(self.snap_channel, &self.snap_clip, 1.0);
                self.moved = false;
            }
        } else {
            self.rot.stop_movement_sound(ctx.audio, ctx.dt);
        }

        if self.snapping {
            if !self.kickback_triggered {
                self.kickback_triggered = true;
                if !ctx.audio.is_playing(self.snap_channel) {
                    ctx.audio.play_on(self.snap_channel, &self.snap_clip, 1.0);
                }
            }

            self.rot.current_angle = lerp(
                self.rot.current_angle,
                self.snap_target,
                ctx.dt * self.rot.config.smoothing,
            );
            if (self.rot.current_angle - self.snap_target).abs() < SNAP_SETTLE {
                self.rot.current_angle = self.snap_target;
                self.snapping = false;
            }
            self.write_rotation(ctx.scene);

            let percentage = self.rot.percentage();
            ctx.dependents.notify(&self.state.affected, percentage * 100.0);
        } else {
            self.kickback_triggered = false;
        }

        self.rot.angular_velocity = self.rot.current_angle - self.rot.previous_angle;
        self.rot.previous_angle = self.rot.current_angle;
    }
}
