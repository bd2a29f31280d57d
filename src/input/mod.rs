//! Controller input seams
//!
//! The simulation only ever sees [`ControllerInput`] snapshots. Where they come
//! from (keyboard, gamepads, a script, stdin) is up to the [`InputProvider`].

pub mod buffer;
pub mod controller;
pub mod scripted;

use std::collections::BTreeMap;

pub use buffer::{ChannelInputProvider, InputBuffer, InputBufferError, InputEvent, InputSender};
pub use controller::{Button, ControllerInput, ControllerSnapshot, HapticRequest};
pub use scripted::ScriptedInputProvider;

use crate::game::snake::ControllerId;

/// Active controllers for one tick, iterated in id order
pub type ControllerMap = BTreeMap<ControllerId, Box<dyn ControllerInput>>;

/// Everything the driver learns from one poll
#[derive(Default)]
pub struct InputFrame {
    pub controllers: Vec<Box<dyn ControllerInput>>,
    /// Process-wide exit was pressed since the previous poll
    pub global_exit: bool,
}

impl InputFrame {
    /// Key the controllers by id; a later duplicate replaces an earlier one
    pub fn into_controller_map(self) -> ControllerMap {
        self.controllers
            .into_iter()
            .map(|c| (c.id().to_string(), c))
            .collect()
    }
}

/// Source of per-tick controller snapshots
pub trait InputProvider {
    /// Called exactly once per tick, before the active state updates
    fn poll(&mut self) -> InputFrame;
}
