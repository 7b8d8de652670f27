//! Gloam Player - Input, camera, arbitration and inventory
//!
//! The player side of the interaction system: maps raw window events to
//! actions, projects the camera, arbitrates which single interaction is
//! active, and manages the item inventory. The host engine feeds it a
//! [`FrameInput`] snapshot and an aim raycast each frame and applies the
//! [`PlayerEvent`]s it returns.

pub mod camera;
pub mod controller;
pub mod input;
pub mod inventory;

pub use camera::CameraView;
pub use controller::{InteractionController, PlayerEvent, ReticleState};
pub use input::{FrameInput, InputAction, InputBindings, InputHandler, InputState};
pub use inventory::{DropError, Inventory, SLOT_COUNT};
