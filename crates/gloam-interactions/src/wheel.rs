//! Valve wheel driven by circular pointer gestures
//!
//! Rather than raw drag distance, the wheel reads the sign of the 2D cross
//! product between the previous and current pointer positions relative to
//! the screen-projected wheel pivot: circling one way winds the wheel a
//! fixed step per pointer event, circling the other way unwinds it. The
//! cursor stays visible during the gesture. On release the wheel kicks back
//! a little and the kickback decays to rest.

use glam::Vec2;

use gloam_core::{AudioTrack, ChannelId, ObjectId, Scene, SoundClip};

use crate::interaction::{
    lerp, Interaction, InteractionCtx, InteractionEvent, InteractionKind, InteractionState,
    PromoteSetup,
};
use crate::rotation::{RotationActuator, RotationConfig};

/// World radians per internal angle unit
const UNIT_SCALE: f32 = 0.1;
/// Angle units added per pointer event
const GESTURE_STEP: f32 = 0.1;
/// Kickback magnitude below which the wheel is at rest
const KICKBACK_REST: f32 = 0.0001;
/// Kickback magnitude that still warrants the clack sound
const KICKBACK_AUDIBLE: f32 = 0.01;

pub struct WheelInteraction {
    state: InteractionState,
    /// Angles kept in units of [`UNIT_SCALE`] radians
    rot: RotationActuator,
    kick_intensity: f32,
    kickback: f32,
    kickback_triggered: bool,
    /// Screen-projected pivot, captured at promotion
    pivot_screen: Vec2,
    previous_pointer: Vec2,
    kickback_clip: SoundClip,
    kickback_channel: ChannelId,
}

impl WheelInteraction {
    /// Create a wheel on `owner`, winding `max_rotation` radians from the
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
                SoundClip::new("sfx/wheel_spin.ogg"),
                RotationConfig {
                    creak_velocity_threshold: 0.0001,
                    fade_speed: 5.0,
                    volume_scale: 1000.0,
                    smoothing: 8.0,
                },
                starting / UNIT_SCALE,
                (starting + max_rotation) / UNIT_SCALE,
            ),
            kick_intensity: 0.05,
            kickback: 0.0,
            kickback_triggered: false,
            pivot_screen: Vec2::ZERO,
            previous_pointer: Vec2::ZERO,
            kickback_clip: SoundClip::new("sfx/wheel_kickback.ogg"),
            kickback_channel: ChannelId::new(owner, AudioTrack::Kickback),
        }
    }

    /// World-space wheel angle in radians
    pub fn angle(&self) -> f32 {
        self.rot.current_angle * UNIT_SCALE
    }

    pub fn percentage(&self) -> f32 {
        self.rot.percentage()
    }

    fn write_rotation(&self, scene: &mut Scene) {
        if let Some(object) = scene.get_mut(self.state.owner) {
            object.transform.rotation.z = self.rot.current_angle * UNIT_SCALE;
        }
    }

    /// Positive when the pointer swept one way around the pivot, negative
    /// the other way
    fn gesture_cross(&self, pointer: Vec2) -> f32 {
        let to_previous = self.previous_pointer - self.pivot_screen;
        let to_current = pointer - self.pivot_screen;
        to_current.x * to_previous.y - to_current.y * to_previous.x
    }
}

impl Interaction for WheelInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Wheel
    }

    fn configure(&mut self, setup: &PromoteSetup) {
        self.pivot_screen = setup.pivot_screen.unwrap_or(Vec2::ZERO);
        self.previous_pointer = setup.pointer_position;
    }

    fn pre_interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        self.state.is_interacting = true;
        self.state.lock_camera = true;
        self.rot.previous_angle = self.rot.current_angle;
        // The gesture needs a visible cursor
        ctx.events.push(InteractionEvent::SetPointerCaptured(false));
    }

    fn interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if ctx.pointer.delta == Vec2::ZERO {
            return;
        }

        let pointer = ctx.pointer.position;
        if self.gesture_cross(pointer) > 0.0 {
            self.rot.current_angle += GESTURE_STEP;
        } else {
            self.rot.current_angle -= GESTURE_STEP;
        }
        self.rot.clamp_to_range();
        self.rot.allow_movement_sound = true;
        self.write_rotation(ctx.scene);

        let percentage = self.rot.percentage();
        ctx.dependents.notify(&self.state.affected, percentage * 100.0);
        self.previous_pointer = pointer;
    }

    fn post_interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        self.state.is_interacting = false;
        self.state.lock_camera = false;
        ctx.events.push(InteractionEvent::SetPointerCaptured(true));
        self.kickback = -self.kick_intensity;
    }

    fn tick(&mut self, ctx: &mut InteractionCtx<'_>) {
        self.rot.allow_movement_sound = true;

        if self.state.is_interacting {
            self.rot.play_movement_sound(ctx.audio, ctx.dt);
        } else {
            self.rot.stop_movement_sound(ctx.audio, ctx.dt);
        }

        if self.kickback.abs() > KICKBACK_REST {
            self.rot.current_angle += self.kickback;
            self.kickback = lerp(self.kickback, 0.0, ctx.dt * 6.0);
            self.rot.clamp_to_range();
            self.write_rotation(ctx.scene);

            let percentage = self.rot.percentage();
            ctx.dependents.notify(&self.state.affected, percentage * 100.0);

            if !self.state.is_interacting
                && !self.kickback_triggered
                && self.kickback.abs() > KICKBACK_AUDIBLE
            {
                self.kickback_triggered = true;
                ctx.audio.stop(self.kickback_channel);
                ctx.audio
                    .play_on(self.kickback_channel, &self.kickback_clip, 1.0);
            }
        } else {
            self.kickback_triggered = false;
        }

        self.rot.angular_velocity = self.rot.current_angle - self.rot.previous_angle;
        self.rot.previous_angle = self.rot.current_angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use gloam_core::{MemoryAudio, WorldObject};

    use crate::dependents::DependentRegistry;
    use crate::interaction::PointerState;

    struct Rig {
        scene: Scene,
        audio: MemoryAudio,
        dependents: DependentRegistry,
        events: Vec<InteractionEvent>,
        owner: ObjectId,
    }

    impl Rig {
        fn new() -> Self {
            let mut scene = Scene::new();
            let owner = scene.spawn(WorldObject::named("valve"));
            Self {
                scene,
                audio: MemoryAudio::new(),
                dependents: DependentRegistry::new(),
                events: Vec::new(),
                owner,
            }
        }

        fn ctx(&mut self, delta: Vec2, position: Vec2) -> InteractionCtx<'_> {
            InteractionCtx {
                dt: 0.016,
                scene: &mut self.scene,
                audio: &mut self.audio,
                dependents: &mut self.dependents,
                events: &mut self.events,
                pointer: PointerState { delta, position },
            }
        }
    }

    const PIVOT: Vec2 = Vec2::new(400.0, 300.0);

    fn promote(wheel: &mut WheelInteraction, rig: &mut Rig, start: Vec2) {
        wheel.configure(&PromoteSetup {
            hit_object: rig.owner,
            hit_point: Vec3::ZERO,
            hit_local: Vec3::ZERO,
            hand_anchor: None,
            pivot_screen: Some(PIVOT),
            pointer_position: start,
        });
        let mut ctx = rig.ctx(Vec2::ZERO, start);
        wheel.pre_interact(&mut ctx);
    }

    /// Sweep the pointer around the pivot through `steps` small arcs.
    /// Negative steps wind the wheel up, positive steps unwind it.
    fn sweep(wheel: &mut WheelInteraction, rig: &mut Rig, start_angle: f32, step: f32, steps: usize) {
        let radius = 100.0;
        let mut theta = start_angle;
        for _ in 0..steps {
            theta += step;
            let position = PIVOT + radius * Vec2::new(theta.cos(), theta.sin());
            let mut ctx = rig.ctx(Vec2::ONE, position);
            wheel.interact(&mut ctx);
            wheel.tick(&mut ctx);
        }
    }

    #[test]
    fn test_gesture_direction_is_consistent() {
        let mut rig = Rig::new();
        let mut wheel = WheelInteraction::new(rig.owner, &rig.scene, 4.0);
        promote(&mut wheel, &mut rig, PIVOT + Vec2::new(100.0, 0.0));

        sweep(&mut wheel, &mut rig, 0.0, -0.1, 20);
        let wound = wheel.angle();
        assert!(wound > 0.0);

        // Reversing the sweep unwinds the wheel
        sweep(&mut wheel, &mut rig, 2.0, 0.1, 10);
        let unwound = wheel.angle();
        assert!(unwound < wound);
        assert!(unwound >= 0.0);
    }

    #[test]
    fn test_angle_clamped_to_range() {
        let mut rig = Rig::new();
        let mut wheel = WheelInteraction::new(rig.owner, &rig.scene, 0.5);
        promote(&mut wheel, &mut rig, PIVOT + Vec2::new(100.0, 0.0));

        sweep(&mut wheel, &mut rig, 0.0, -0.1, 400);
        assert!(wheel.angle() >= 0.0 && wheel.angle() <= 0.5 + 1.0e-6);
        sweep(&mut wheel, &mut rig, 40.0, 0.1, 800);
        assert!(wheel.angle() >= -1.0e-6 && wheel.angle() <= 0.5 + 1.0e-6);
    }

    #[test]
    fn test_kickback_decays_and_clacks_once() {
        let mut rig = Rig::new();
        let mut wheel = WheelInteraction::new(rig.owner, &rig.scene, 4.0);
        promote(&mut wheel, &mut rig, PIVOT + Vec2::new(100.0, 0.0));
        sweep(&mut wheel, &mut rig, 0.0, -0.1, 40);
        let wound = wheel.angle();
        assert!(wound > 0.0);

        wheel.post_interact(&mut rig.ctx(Vec2::ZERO, Vec2::ZERO));
        for _ in 0..400 {
            let mut ctx = rig.ctx(Vec2::ZERO, Vec2::ZERO);
            wheel.tick(&mut ctx);
        }

        // Wheel slipped back a little, then settled inside its range
        assert!(wheel.angle() != wound);
        assert!(wheel.angle() >= 0.0 && wheel.angle() <= 4.0);
        assert_eq!(rig.audio.times_played("sfx/wheel_kickback.ogg"), 1);
    }

    #[test]
    fn test_wheel_releases_pointer_capture_for_gesture() {
        let mut rig = Rig::new();
        let mut wheel = WheelInteraction::new(rig.owner, &rig.scene, 4.0);
        promote(&mut wheel, &mut rig, PIVOT + Vec2::new(100.0, 0.0));
        assert!(rig
            .events
            .contains(&InteractionEvent::SetPointerCaptured(false)));
    }
}
