//! Input system with action-based mapping
//!
//! Provides an abstraction layer between raw window events and player
//! actions. The controller never sees keys or buttons, only a [`FrameInput`]
//! snapshot taken once per frame.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use gloam_interactions::PointerState;

/// Player actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Confirm/interact (left mouse button by default)
    Primary,
    /// Secondary interact, e.g. throw (right mouse button by default)
    Secondary,
    /// Open/close the inventory (Tab by default)
    ToggleInventory,
    /// Pause/unpause (Escape by default)
    Pause,
}

/// Current state of all inputs
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Pointer movement delta for this frame
    pub pointer_delta: Vec2,
    /// Absolute pointer position in window coordinates
    pub pointer_position: Vec2,
    /// Whether the cursor is captured (invisible, locked)
    pub cursor_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.pointer_delta = Vec2::ZERO;
    }
}

/// Binding of a physical key or button to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

/// Maps physical inputs to player actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<InputBinding, InputAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        bindings.bind_mouse(0, InputAction::Primary);
        bindings.bind_mouse(1, InputAction::Secondary);
        bindings.bind(KeyCode::Tab, InputAction::ToggleInventory);
        bindings.bind(KeyCode::Escape, InputAction::Pause);

        bindings
    }
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.bindings.insert(InputBinding::Key(key), action);
    }

    /// Bind a mouse button to an action
    pub fn bind_mouse(&mut self, button: u32, action: InputAction) {
        self.bindings.insert(InputBinding::Mouse(button), action);
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<InputAction> {
        self.bindings.get(binding).copied()
    }
}

/// Per-frame input snapshot consumed by the interaction controller
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f32,
    pub primary_pressed: bool,
    pub primary_held: bool,
    pub secondary_pressed: bool,
    pub pointer: PointerState,
}

/// Input handler that processes raw window events and updates state
#[derive(Debug)]
pub struct InputHandler {
    pub state: InputState,
    pub bindings: InputBindings,
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            state: InputState::new(),
            bindings: InputBindings::default(),
            mouse_sensitivity: 1.0,
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            if let Some(action) = self.bindings.get_action(&InputBinding::Key(key_code)) {
                self.apply(action, element_state);
            }
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let button_id = match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        };

        if let Some(action) = self.bindings.get_action(&InputBinding::Mouse(button_id)) {
            self.apply(action, state);
        }
    }

    fn apply(&mut self, action: InputAction, element_state: ElementState) {
        match element_state {
            ElementState::Pressed => {
                if !self.state.held.contains(&action) {
                    self.state.just_pressed.insert(action);
                }
                self.state.held.insert(action);
            }
            ElementState::Released => {
                self.state.held.remove(&action);
                self.state.just_released.insert(action);
            }
        }
    }

    /// Handle relative mouse movement
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        self.state.pointer_delta += Vec2::new(
            delta.0 as f32 * self.mouse_sensitivity,
            delta.1 as f32 * self.mouse_sensitivity,
        );
    }

    /// Handle absolute cursor movement
    pub fn handle_cursor_moved(&mut self, position: (f64, f64)) {
        self.state.pointer_position = Vec2::new(position.0 as f32, position.1 as f32);
    }

    /// Snapshot the state for the interaction controller
    pub fn frame_input(&self, dt: f32) -> FrameInput {
        FrameInput {
            dt,
            primary_pressed: self.state.is_just_pressed(InputAction::Primary),
            primary_held: self.state.is_held(InputAction::Primary),
            secondary_pressed: self.state.is_just_pressed(InputAction::Secondary),
            pointer: PointerState {
                delta: self.state.pointer_delta,
                position: self.state.pointer_position,
            },
        }
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }

    /// Set cursor capture state
    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.state.cursor_captured = captured;
    }
}
