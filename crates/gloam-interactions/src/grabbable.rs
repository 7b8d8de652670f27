//! Physically carried objects
//!
//! While the confirm input is held the object's body is pulled toward the
//! player's hand anchor each frame, scaled down by mass so heavy objects lag
//! behind. The secondary input throws the object along the hand's facing and
//! starts a short cooldown before it can be grabbed again. Hard contacts
//! play an impact sound based on the velocity lost in the collision.

use glam::{EulerRot, Quat, Vec3};

use gloam_core::{AudioTrack, ChannelId, ObjectId, Scene, SoundClip};

use crate::interaction::{Interaction, InteractionCtx, InteractionKind, InteractionState, PromoteSetup};

/// Velocity change below which a contact stays silent
const CONTACT_VELOCITY_THRESHOLD: f32 = 1.0;
/// Pull strength toward the hand, divided by mass
const CARRY_STRENGTH: f32 = 5.0;
/// Throw speed, divided by mass
const THROW_STRENGTH: f32 = 20.0;
/// Seconds the object refuses interaction after a throw
const THROW_COOLDOWN: f32 = 0.5;

pub struct GrabbableInteraction {
    state: InteractionState,
    hand_anchor: Option<ObjectId>,
    /// Body velocity sampled on the previous physics tick, for measuring
    /// how hard a contact was
    last_velocity: Vec3,
    cooldown: f32,
    impact_clip: SoundClip,
    impact_channel: ChannelId,
}

impl GrabbableInteraction {
    pub fn new(owner: ObjectId) -> Self {
        Self {
            state: InteractionState::new(owner),
            hand_anchor: None,
            last_velocity: Vec3::ZERO,
            cooldown: 0.0,
            impact_clip: SoundClip::new("sfx/impact_plank.ogg"),
            impact_channel: ChannelId::new(owner, AudioTrack::Impact),
        }
    }

    fn hand_forward(&self, scene: &Scene) -> Option<Vec3> {
        let hand = scene.get(self.hand_anchor?)?;
        let r = hand.transform.rotation;
        Some(Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z) * Vec3::NEG_Z)
    }
}

impl Interaction for GrabbableInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Grabbable
    }

    fn configure(&mut self, setup: &PromoteSetup) {
        self.hand_anchor = setup.hand_anchor;
    }

    /// Pull the body toward the hand anchor
    fn interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if !self.state.can_interact {
            return;
        }
        let Some(hand) = self.hand_anchor else {
            return;
        };
        let Some(hand_position) = ctx.scene.position(hand) else {
            return;
        };
        let Some(owner_position) = ctx.scene.position(self.state.owner) else {
            return;
        };

        if let Some(body) = ctx.scene.body_mut(self.state.owner) {
            body.linear_velocity = (hand_position - owner_position) * (CARRY_STRENGTH / body.mass);
        }
    }

    /// Throw along the hand's facing and start the regrab cooldown
    fn aux_interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        if !self.state.can_interact {
            return;
        }
        let Some(direction) = self.hand_forward(ctx.scene) else {
            return;
        };

        if let Some(body) = ctx.scene.body_mut(self.state.owner) {
            body.linear_velocity = direction * (THROW_STRENGTH / body.mass);
        }

        self.state.can_interact = false;
        self.cooldown = THROW_COOLDOWN;
    }

    fn tick(&mut self, ctx: &mut InteractionCtx<'_>) {
        if self.cooldown > 0.0 {
            self.cooldown -= ctx.dt;
            if self.cooldown <= 0.0 {
                self.cooldown = 0.0;
                self.state.can_interact = true;
            }
        }
    }

    fn physics_tick(&mut self, ctx: &mut InteractionCtx<'_>) {
        if let Some(object) = ctx.scene.get(self.state.owner) {
            if let Some(body) = &object.body {
                self.last_velocity = body.linear_velocity;
            }
        }
    }

    fn on_contact(&mut self, ctx: &mut InteractionCtx<'_>) {
        let Some(body) = ctx.scene.get(self.state.owner).and_then(|o| o.body.as_ref()) else {
            return;
        };

        let impact_strength = (self.last_velocity - body.linear_velocity).length();
        if impact_strength > CONTACT_VELOCITY_THRESHOLD && !ctx.audio.is_playing(self.impact_channel)
        {
            ctx.audio.play_on(self.impact_channel, &self.impact_clip, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use gloam_core::{MemoryAudio, WorldObject};

    use crate::dependents::DependentRegistry;
    use crate::interaction::{InteractionEvent, PointerState};

    struct Rig {
        scene: Scene,
        audio: MemoryAudio,
        dependents: DependentRegistry,
        events: Vec<InteractionEvent>,
        owner: ObjectId,
        hand: ObjectId,
    }

    impl Rig {
        fn new(mass: f32) -> Self {
            let mut scene = Scene::new();
            let owner = scene.spawn(
                WorldObject::named("crate")
                    .at(Vec3::new(0.0, 0.0, -2.0))
                    .with_body(mass),
            );
            let hand = scene.spawn(WorldObject::named("hand").at(Vec3::new(0.0, 1.5, 0.0)));
            Self {
                scene,
                audio: MemoryAudio::new(),
                dependents: DependentRegistry::new(),
                events: Vec::new(),
                owner,
                hand,
            }
        }

        fn ctx(&mut self) -> InteractionCtx<'_> {
            InteractionCtx {
                dt: 0.016,
                scene: &mut self.scene,
                audio: &mut self.audio,
                dependents: &mut self.dependents,
                events: &mut self.events,
                pointer: PointerState::default(),
            }
        }
    }

    fn grab(rig: &Rig) -> GrabbableInteraction {
        let mut grabbable = GrabbableInteraction::new(rig.owner);
        grabbable.configure(&PromoteSetup {
            hit_object: rig.owner,
            hit_point: Vec3::ZERO,
            hit_local: Vec3::ZERO,
            hand_anchor: Some(rig.hand),
            pivot_screen: None,
            pointer_position: Vec2::ZERO,
        });
        grabbable
    }

    #[test]
    fn test_carry_pulls_toward_hand_scaled_by_mass() {
        let mut rig = Rig::new(2.0);
        let mut grabbable = grab(&rig);
        grabbable.interact(&mut rig.ctx());

        let body = rig.scene.get(rig.owner).unwrap().body.as_ref().unwrap();
        let expected = (Vec3::new(0.0, 1.5, 0.0) - Vec3::new(0.0, 0.0, -2.0)) * (5.0 / 2.0);
        assert!((body.linear_velocity - expected).length() < 1.0e-6);
    }

    #[test]
    fn test_throw_uses_hand_facing_and_cooldown() {
        let mut rig = Rig::new(1.0);
        let mut grabbable = grab(&rig);
        grabbable.aux_interact(&mut rig.ctx());

        let body = rig.scene.get(rig.owner).unwrap().body.as_ref().unwrap();
        // Hand is unrotated: facing is -Z
        assert!((body.linear_velocity - Vec3::new(0.0, 0.0, -20.0)).length() < 1.0e-4);
        assert!(!grabbable.state().can_interact);

        // A second throw during the cooldown is refused
        let before = rig.scene.get(rig.owner).unwrap().body.as_ref().unwrap().linear_velocity;
        grabbable.aux_interact(&mut rig.ctx());
        let after = rig.scene.get(rig.owner).unwrap().body.as_ref().unwrap().linear_velocity;
        assert_eq!(before, after);

        // Cooldown runs out after half a second of ticks
        for _ in 0..40 {
            grabbable.tick(&mut rig.ctx());
        }
        assert!(grabbable.state().can_interact);
    }

    #[test]
    fn test_hard_contact_plays_impact_sound_once() {
        let mut rig = Rig::new(1.0);
        let mut grabbable = grab(&rig);

        rig.scene.body_mut(rig.owner).unwrap().linear_velocity = Vec3::new(0.0, 0.0, -8.0);
        grabbable.physics_tick(&mut rig.ctx());
        rig.scene.body_mut(rig.owner).unwrap().linear_velocity = Vec3::ZERO;
        grabbable.on_contact(&mut rig.ctx());
        assert_eq!(rig.audio.times_played("sfx/impact_plank.ogg"), 1);

        // Still ringing out: a second contact does not restart it
        grabbable.physics_tick(&mut rig.ctx());
        rig.scene.body_mut(rig.owner).unwrap().linear_velocity = Vec3::new(0.0, 0.0, 8.0);
        grabbable.on_contact(&mut rig.ctx());
        assert_eq!(rig.audio.times_played("sfx/impact_plank.ogg"), 1);
    }

    #[test]
    fn test_soft_contact_is_silent() {
        let mut rig = Rig::new(1.0);
        let mut grabbable = grab(&rig);

        rig.scene.body_mut(rig.owner).unwrap().linear_velocity = Vec3::new(0.0, 0.0, -0.5);
        grabbable.physics_tick(&mut rig.ctx());
        rig.scene.body_mut(rig.owner).unwrap().linear_velocity = Vec3::ZERO;
        grabbable.on_contact(&mut rig.ctx());
        assert_eq!(rig.audio.times_played("sfx/impact_plank.ogg"), 0);
    }
}
