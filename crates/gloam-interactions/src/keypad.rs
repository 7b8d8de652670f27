//! Code keypad
//!
//! A keypad spans several button objects that all resolve to the same
//! interaction. Pressing a digit appends it to the entered code, clear wipes
//! it, and confirm checks it against the correct code: on a match every
//! dependent exposing the unlock capability is unlocked. The display mirrors
//! the entered digits and flashes ENTER or ERROR on confirmation.

use std::collections::HashMap;

use tracing::debug;

use gloam_core::{ObjectId, SoundClip};

use crate::interaction::{
    Interaction, InteractionCtx, InteractionKind, InteractionState, PromoteSetup,
};

/// Digits a code may hold before further presses are ignored
pub const MAX_CODE_LENGTH: usize = 5;

/// How far a pressed button sinks into the panel
const PRESS_DEPTH: f32 = 0.02;
/// Seconds a pressed button stays sunk
const PRESS_DURATION: f32 = 0.1;
/// Display text while no digits are entered
const IDLE_TEXT: &str = "-----";

/// Role of one physical button on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Digit(u8),
    Clear,
    Confirm,
}

/// Color cue of the display text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTone {
    Neutral,
    Success,
    Error,
}

/// What the keypad screen currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadDisplay {
    pub text: String,
    pub tone: DisplayTone,
}

impl Default for KeypadDisplay {
    fn default() -> Self {
        Self {
            text: IDLE_TEXT.to_owned(),
            tone: DisplayTone::Neutral,
        }
    }
}

pub struct KeypadInteraction {
    state: InteractionState,
    correct_code: Vec<u8>,
    entered: Vec<u8>,
    buttons: HashMap<ObjectId, ButtonKind>,
    /// Button object the promoting ray hit
    target: Option<ObjectId>,
    /// Button currently sunk into the panel, with time left
    pressed: Option<(ObjectId, f32)>,
    display: KeypadDisplay,
    press_clip: SoundClip,
    success_clip: SoundClip,
    failure_clip: SoundClip,
}

impl KeypadInteraction {
    pub fn new(owner: ObjectId, correct_code: Vec<u8>) -> Self {
        Self {
            state: InteractionState::new(owner),
            correct_code,
            entered: Vec::new(),
            buttons: HashMap::new(),
            target: None,
            pressed: None,
            display: KeypadDisplay::default(),
            press_clip: SoundClip::new("sfx/keypad_press.ogg"),
            success_clip: SoundClip::new("sfx/keypad_success.ogg"),
            failure_clip: SoundClip::new("sfx/keypad_failure.ogg"),
        }
    }

    /// Assign a role to a button object. The same object should also be
    /// bound to this interaction in the registry so raycasts resolve here.
    pub fn register_button(&mut self, object: ObjectId, kind: ButtonKind) {
        self.buttons.insert(object, kind);
    }

    pub fn display(&self) -> &KeypadDisplay {
        &self.display
    }

    pub fn entered_code(&self) -> &[u8] {
        &self.entered
    }

    fn press_button(&mut self, target: ObjectId, ctx: &mut InteractionCtx<'_>) {
        let Some(&kind) = self.buttons.get(&target) else {
            return;
        };

        // Sink the button into the panel; tick pops it back out
        if let Some(object) = ctx.scene.get_mut(target) {
            object.transform.position.z = PRESS_DEPTH;
        }
        self.pressed = Some((target, PRESS_DURATION));
        ctx.audio.play(&self.press_clip, 1.0);

        match kind {
            ButtonKind::Clear => {
                self.entered.clear();
                self.display = KeypadDisplay::default();
            }
            ButtonKind::Confirm => {
                if self.entered == self.correct_code {
                    self.display = KeypadDisplay {
                        text: "ENTER".to_owned(),
                        tone: DisplayTone::Success,
                    };
                    ctx.audio.play(&self.success_clip, 1.0);
                    ctx.dependents.unlock(&self.state.affected);
                } else {
                    self.display = KeypadDisplay {
                        text: "ERROR".to_owned(),
                        tone: DisplayTone::Error,
                    };
                    ctx.audio.play(&self.failure_clip, 1.0);
                }
                self.entered.clear();
            }
            ButtonKind::Digit(digit) => {
                if self.entered.len() < MAX_CODE_LENGTH {
                    self.entered.push(digit);
                    self.display = KeypadDisplay {
                        text: self.entered.iter().map(|d| d.to_string()).collect(),
                        tone: DisplayTone::Neutral,
                    };
                } else {
                    debug!(owner = self.state.owner.0, "entered code is full");
                }
            }
        }
    }
}

impl Interaction for KeypadInteraction {
    fn state(&self) -> &InteractionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Keypad
    }

    fn configure(&mut self, setup: &PromoteSetup) {
        self.target = Some(setup.hit_object);
    }

    fn pre_interact(&mut self, ctx: &mut InteractionCtx<'_>) {
        self.state.is_interacting = true;
        if let Some(target) = self.target.take() {
            self.press_button(target, ctx);
        }
    }

    fn tick(&mut self, ctx: &mut InteractionCtx<'_>) {
        if let Some((button, remaining)) = &mut self.pressed {
            *remaining -= ctx.dt;
            if *remaining <= 0.0 {
                if let Some(object) = ctx.scene.get_mut(*button) {
                    object.transform.position.z = 0.0;
                }
                self.pressed = None;
            }
        }
    }
}
