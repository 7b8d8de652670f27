//! Gloam Interactions - Interaction components and state machines
//!
//! Every interactable object in the world carries one interaction component:
//! doors, switches and valve wheels (continuous rotation mechanisms),
//! grabbable rigid bodies, collectables, and code keypads. Components share
//! the [`Interaction`] lifecycle contract and are driven by the player-side
//! controller, which keeps exactly one of them active at a time.

pub mod collectable;
pub mod dependents;
pub mod door;
pub mod grabbable;
pub mod interaction;
pub mod keypad;
pub mod registry;
pub mod rotation;
pub mod switch;
pub mod wheel;

pub use collectable::{
    ConsumableInteraction, EquippableInteraction, InspectableInteraction, PickupPayload,
};
pub use dependents::{Actuated, DependentNode, DependentRegistry, Unlockable};
pub use door::{DoorConfig, DoorInteraction};
pub use grabbable::GrabbableInteraction;
pub use interaction::{
    Interaction, InteractionCtx, InteractionEvent, InteractionKind, InteractionState,
    PointerState, PromoteSetup,
};
pub use keypad::{ButtonKind, DisplayTone, KeypadDisplay, KeypadInteraction, MAX_CODE_LENGTH};
pub use registry::{InteractionId, InteractionSet};
pub use rotation::{RotationActuator, RotationConfig};
pub use switch::SwitchInteraction;
pub use wheel::WheelInteraction;
