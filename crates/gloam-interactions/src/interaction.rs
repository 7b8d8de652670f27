//! The shared interaction lifecycle contract
//!
//! An interaction decorates one world object and defines how the player may
//! act on it. The controller promotes a candidate, then calls the lifecycle
//! hooks in order: [`Interaction::configure`] with the promotion context,
//! [`Interaction::pre_interact`] once, [`Interaction::interact`] every frame
//! the confirm input is held (or [`Interaction::aux_interact`] once on the
//! secondary input), and [`Interaction::post_interact`] once at the end.
//! [`Interaction::tick`] runs every frame for every interaction regardless of
//! whether it is active, carrying settling motion, cooldowns, and audio
//! fades between frames.

use glam::{Vec2, Vec3};

use gloam_core::{AudioSink, ItemData, ObjectId, Scene, SoundClip};

use crate::dependents::DependentRegistry;

/// What family an interaction belongs to; the controller uses this for its
/// collectable/inventory-full guard and for reticle feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Door,
    Switch,
    Wheel,
    Grabbable,
    Consumable,
    Equippable,
    Inspectable,
    Keypad,
}

impl InteractionKind {
    /// Whether interacting picks something up into the inventory
    pub fn is_collectable(self) -> bool {
        matches!(
            self,
            InteractionKind::Consumable | InteractionKind::Equippable | InteractionKind::Inspectable
        )
    }
}

/// State every interaction carries
#[derive(Debug, Clone)]
pub struct InteractionState {
    /// The world object this interaction decorates
    pub owner: ObjectId,
    /// Objects notified with the actuation percentage
    pub affected: Vec<ObjectId>,
    /// Gates candidate selection; false during cooldowns and after
    /// single-use consumption
    pub can_interact: bool,
    /// True strictly between `pre_interact` and `post_interact`
    pub is_interacting: bool,
    /// True while the surrounding look control must be suppressed
    pub lock_camera: bool,
}

impl InteractionState {
    pub fn new(owner: ObjectId) -> Self {
        Self {
            owner,
            affected: Vec::new(),
            can_interact: true,
            is_interacting: false,
            lock_camera: false,
        }
    }
}

/// Notifications pushed by interactions and drained by the controller once
/// per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// A collectable was picked up
    ItemCollected {
        object: ObjectId,
        item: Option<ItemData>,
        sound: Option<SoundClip>,
        equip: bool,
    },
    /// A note was brought up for reading
    NoteInspected {
        object: ObjectId,
        item: Option<ItemData>,
        content: String,
        open_sound: Option<SoundClip>,
        put_away_sound: Option<SoundClip>,
    },
    /// The input collaborator should capture (true) or release (false) the
    /// pointer
    SetPointerCaptured(bool),
}

/// Pointer input for the current frame
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Relative motion this frame
    pub delta: Vec2,
    /// Absolute screen position
    pub position: Vec2,
}

/// Everything an interaction may touch during a lifecycle call
pub struct InteractionCtx<'a> {
    /// Seconds since the previous frame
    pub dt: f32,
    pub scene: &'a mut Scene,
    pub audio: &'a mut dyn AudioSink,
    pub dependents: &'a mut DependentRegistry,
    pub events: &'a mut Vec<InteractionEvent>,
    pub pointer: PointerState,
}

/// Promotion context handed to [`Interaction::configure`] when a candidate
/// becomes active. Replaces per-type setup calls: doors read the hit side,
/// keypads the hit button, grabbables the hand anchor, wheels the projected
/// pivot.
#[derive(Debug, Clone, Copy)]
pub struct PromoteSetup {
    /// The exact object the ray hit (a keypad button, a door panel)
    pub hit_object: ObjectId,
    /// World-space hit point
    pub hit_point: Vec3,
    /// Hit point in the owner's local space, for side detection
    pub hit_local: Vec3,
    /// The player's hand anchor object
    pub hand_anchor: Option<ObjectId>,
    /// Screen-space projection of the mechanism pivot, when available
    pub pivot_screen: Option<Vec2>,
    /// Pointer position at promotion time
    pub pointer_position: Vec2,
}

/// Behavior contract for interactable objects
pub trait Interaction {
    fn state(&self) -> &InteractionState;
    fn state_mut(&mut self) -> &mut InteractionState;
    fn kind(&self) -> InteractionKind;

    /// Absorb promotion context before `pre_interact`
    fn configure(&mut self, _setup: &PromoteSetup) {}

    /// Runs once when interaction begins
    fn pre_interact(&mut self, _ctx: &mut InteractionCtx<'_>) {
        self.state_mut().is_interacting = true;
    }

    /// Runs every frame the confirm input is held
    fn interact(&mut self, _ctx: &mut InteractionCtx<'_>) {}

    /// Runs once on the secondary input
    fn aux_interact(&mut self, _ctx: &mut InteractionCtx<'_>) {}

    /// Runs once when interaction ends, on every exit path
    fn post_interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        let state = self.state_mut();
        state.is_interacting = false;
        state.lock_camera = false;
        ctx.events.push(InteractionEvent::SetPointerCaptured(true));
    }

    /// Per-frame self-processing, active or not
    fn tick(&mut self, _ctx: &mut InteractionCtx<'_>) {}

    /// Fixed-rate physics tick
    fn physics_tick(&mut self, _ctx: &mut InteractionCtx<'_>) {}

    /// The owner's body contacted something
    fn on_contact(&mut self, _ctx: &mut InteractionCtx<'_>) {}

    /// Attempt to use an inventory item on this object. Returns true when
    /// the item was accepted.
    fn use_item(&mut self, _item: &ItemData) -> bool {
        false
    }
}

/// Scalar linear interpolation
pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Angle comparison tolerance shared by the rotation mechanisms
pub(crate) const ANGLE_EPSILON: f32 = 1.0e-4;

pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < ANGLE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloam_core::{MemoryAudio, WorldObject};

    struct Probe {
        state: InteractionState,
    }

    impl Interaction for Probe {
        fn state(&self) -> &InteractionState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut InteractionState {
            &mut self.state
        }
        fn kind(&self) -> InteractionKind {
            InteractionKind::Grabbable
        }
    }

    #[test]
    fn test_lifecycle_flags() {
        let mut scene = Scene::new();
        let owner = scene.spawn(WorldObject::named("crate"));
        let mut audio = MemoryAudio::new();
        let mut dependents = DependentRegistry::new();
        let mut events = Vec::new();
        let mut ctx = InteractionCtx {
            dt: 0.016,
            scene: &mut scene,
            audio: &mut audio,
            dependents: &mut dependents,
            events: &mut events,
            pointer: PointerState::default(),
        };

        let mut probe = Probe {
            state: InteractionState::new(owner),
        };
        assert!(!probe.state().is_interacting);
        probe.pre_interact(&mut ctx);
        assert!(probe.state().is_interacting);
        probe.post_interact(&mut ctx);
        assert!(!probe.state().is_interacting);
        assert!(!probe.state().lock_camera);
        assert!(events.contains(&InteractionEvent::SetPointerCaptured(true)));
    }

    #[test]
    fn test_collectable_kinds() {
        assert!(InteractionKind::Consumable.is_collectable());
        assert!(InteractionKind::Inspectable.is_collectable());
        assert!(!InteractionKind::Door.is_collectable());
        assert!(!InteractionKind::Keypad.is_collectable());
    }
}
