//! Lock-free input buffer between hardware pollers and the tick driver
//!
//! Pollers (keyboard, gamepads, stdin...) submit events from any thread
//! through an [`InputSender`]; the driver drains everything once per tick and
//! turns it into edge-triggered controller snapshots.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use hashbrown::HashMap;
use tracing::debug;

use crate::game::snake::ControllerId;
use crate::input::controller::{Button, ControllerInput, ControllerSnapshot, HapticRequest};
use crate::input::{InputFrame, InputProvider};

/// Capacity of the haptic return channel
const HAPTIC_CHANNEL_CAPACITY: usize = 64;

/// Raw event from a hardware poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Controller became available
    Connected(ControllerId),
    /// Controller went away
    Disconnected(ControllerId),
    /// Button went down (implicitly connects unknown controllers)
    Pressed {
        controller_id: ControllerId,
        button: Button,
    },
    /// Process-wide exit key
    GlobalExit,
}

/// Bounded MPSC channel of input events
pub struct InputBuffer {
    /// Sender side - cloned to each poller
    sender: Sender<InputEvent>,
    /// Receiver side - drained by the driver
    receiver: Receiver<InputEvent>,
    capacity: usize,
}

impl InputBuffer {
    /// Create a new input buffer with given capacity
    ///
    /// Capacity should cover the burst of events that can arrive between two
    /// ticks; presses past it are dropped.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Create a new sender handle for a poller
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Try to submit an event (non-blocking)
    ///
    /// Returns true if successful, false if buffer is full
    #[inline]
    pub fn try_submit(&self, event: InputEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    /// Drain all pending events for this tick
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        // 9 controllers mashing buttons for a few ticks
        Self::new(256)
    }
}

/// Clonable sender handle for pollers
#[derive(Clone)]
pub struct InputSender {
    sender: Sender<InputEvent>,
}

impl InputSender {
    /// Submit an event (non-blocking)
    #[inline]
    pub fn try_send(&self, event: InputEvent) -> Result<(), InputBufferError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => InputBufferError::Full,
            TrySendError::Disconnected(_) => InputBufferError::Disconnected,
        })
    }

    pub fn press(&self, controller_id: impl Into<ControllerId>, button: Button) -> Result<(), InputBufferError> {
        self.try_send(InputEvent::Pressed {
            controller_id: controller_id.into(),
            button,
        })
    }
}

/// Input buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputBufferError {
    /// Buffer is full (backpressure)
    #[error("Input buffer full")]
    Full,
    /// Channel disconnected (driver stopped)
    #[error("Input buffer disconnected")]
    Disconnected,
}

/// Input provider fed by an [`InputBuffer`]
///
/// Controllers stay active, with no presses, from the first event that
/// mentions them until they disconnect.
pub struct ChannelInputProvider {
    buffer: InputBuffer,
    controllers: HashMap<ControllerId, ControllerSnapshot>,
    haptic_sender: Sender<HapticRequest>,
    haptic_receiver: Receiver<HapticRequest>,
}

impl ChannelInputProvider {
    pub fn new(buffer: InputBuffer) -> Self {
        let (haptic_sender, haptic_receiver) = bounded(HAPTIC_CHANNEL_CAPACITY);
        Self {
            buffer,
            controllers: HashMap::new(),
            haptic_sender,
            haptic_receiver,
        }
    }

    /// Sender handle for a new poller
    pub fn sender(&self) -> InputSender {
        self.buffer.sender()
    }

    /// Receiver the hardware layer drains to apply rumble
    pub fn haptics(&self) -> Receiver<HapticRequest> {
        self.haptic_receiver.clone()
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    fn connect(&mut self, controller_id: ControllerId) -> &mut ControllerSnapshot {
        let haptics = &self.haptic_sender;
        self.controllers
            .entry(controller_id.clone())
            .or_insert_with(|| {
                debug!(controller = %controller_id, "Controller connected");
                ControllerSnapshot::new(controller_id).with_haptics(haptics.clone())
            })
    }
}

impl Default for ChannelInputProvider {
    fn default() -> Self {
        Self::new(InputBuffer::default())
    }
}

impl InputProvider for ChannelInputProvider {
    fn poll(&mut self) -> InputFrame {
        for snapshot in self.controllers.values_mut() {
            snapshot.release_all();
        }

        let mut global_exit = false;
        for event in self.buffer.drain() {
            match event {
                InputEvent::Connected(id) => {
                    self.connect(id);
                }
                InputEvent::Disconnected(id) => {
                    if self.controllers.remove(&id).is_some() {
                        debug!(controller = %id, "Controller disconnected");
                    }
                }
                InputEvent::Pressed { controller_id, button } => {
                    self.connect(controller_id).press(button);
                }
                InputEvent::GlobalExit => global_exit = true,
            }
        }

        let mut snapshots: Vec<&ControllerSnapshot> = self.controllers.values().collect();
        snapshots.sort_by(|a, b| a.id().cmp(b.id()));

        InputFrame {
            controllers: snapshots
                .into_iter()
                .map(|s| Box::new(s.clone()) as Box<dyn ControllerInput>)
                .collect(),
            global_exit,
        }
    }
}
