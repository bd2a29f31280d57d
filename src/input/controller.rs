use std::time::Duration;

use crossbeam_channel::Sender;

use crate::game::snake::ControllerId;

/// Logical buttons every controller exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Start,
    Exit,
}

impl Button {
    #[inline]
    fn mask(self) -> u8 {
        match self {
            Button::Up => 1,
            Button::Down => 1 << 1,
            Button::Left => 1 << 2,
            Button::Right => 1 << 3,
            Button::Start => 1 << 4,
            Button::Exit => 1 << 5,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "up" | "w" => Some(Button::Up),
            "down" | "s" => Some(Button::Down),
            "left" | "a" => Some(Button::Left),
            "right" | "d" => Some(Button::Right),
            "start" | "enter" => Some(Button::Start),
            "exit" | "back" => Some(Button::Exit),
            _ => None,
        }
    }
}

/// Rumble request travelling back to the hardware layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HapticRequest {
    pub controller_id: ControllerId,
    pub duration: Duration,
}

/// Edge-triggered view of one controller for the current tick
///
/// "Just pressed" means the press happened since the previous tick.
pub trait ControllerInput {
    fn id(&self) -> &str;
    fn is_up_just_pressed(&self) -> bool;
    fn is_down_just_pressed(&self) -> bool;
    fn is_left_just_pressed(&self) -> bool;
    fn is_right_just_pressed(&self) -> bool;
    fn is_start_just_pressed(&self) -> bool;
    fn is_exit_just_pressed(&self) -> bool;
    fn is_any_just_pressed(&self) -> bool;

    /// Fire-and-forget haptic feedback
    fn vibrate(&self, duration: Duration);

    fn equals(&self, other: &dyn ControllerInput) -> bool {
        self.id() == other.id()
    }
}

/// Plain-data controller state for one tick
#[derive(Debug, Clone, Default)]
pub struct ControllerSnapshot {
    id: ControllerId,
    pressed: u8,
    haptics: Option<Sender<HapticRequest>>,
}

impl ControllerSnapshot {
    pub fn new(id: impl Into<ControllerId>) -> Self {
        Self {
            id: id.into(),
            pressed: 0,
            haptics: None,
        }
    }

    /// Route `vibrate` calls to `sender`
    pub fn with_haptics(mut self, sender: Sender<HapticRequest>) -> Self {
        self.haptics = Some(sender);
        self
    }

    pub fn with_pressed(mut self, button: Button) -> Self {
        self.press(button);
        self
    }

    pub fn press(&mut self, button: Button) {
        self.pressed |= button.mask();
    }

    /// Forget all presses, keeping identity and haptics
    pub fn release_all(&mut self) {
        self.pressed = 0;
    }

    #[inline]
    fn is_pressed(&self, button: Button) -> bool {
        self.pressed & button.mask() != 0
    }
}

impl ControllerInput for ControllerSnapshot {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_up_just_pressed(&self) -> bool {
        self.is_pressed(Button::Up)
    }

    fn is_down_just_pressed(&self) -> bool {
        self.is_pressed(Button::Down)
    }

    fn is_left_just_pressed(&self) -> bool {
        self.is_pressed(Button::Left)
    }

    fn is_right_just_pressed(&self) -> bool {
        self.is_pressed(Button::Right)
    }

    fn is_start_just_pressed(&self) -> bool {
        self.is_pressed(Button::Start)
    }

    fn is_exit_just_pressed(&self) -> bool {
        self.is_pressed(Button::Exit)
    }

    fn is_any_just_pressed(&self) -> bool {
        self.pressed != 0
    }

    fn vibrate(&self, duration: Duration) {
        if let Some(sender) = &self.haptics {
            // Dropped when the hardware side is full or gone
            let _ = sender.try_send(HapticRequest {
                controller_id: self.id.clone(),
                duration,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_snapshot_no_presses() {
        let snapshot = ControllerSnapshot::new("pad-0");
        assert_eq!(snapshot.id(), "pad-0");
        assert!(!snapshot.is_any_just_pressed());
        assert!(!snapshot.is_start_just_pressed());
    }

    #[test]
    fn test_snapshot_presses() {
        let snapshot = ControllerSnapshot::new("pad-0")
            .with_pressed(Button::Left)
            .with_pressed(Button::Start);
        assert!(snapshot.is_left_just_pressed());
        assert!(snapshot.is_start_just_pressed());
        assert!(!snapshot.is_right_just_pressed());
        assert!(!snapshot.is_exit_just_pressed());
        assert!(snapshot.is_any_just_pressed());
    }

    #[test]
    fn test_release_all() {
        let mut snapshot = ControllerSnapshot::new("kb").with_pressed(Button::Up);
        snapshot.release_all();
        assert!(!snapshot.is_any_just_pressed());
    }

    #[test]
    fn test_equals_by_id() {
        let a = ControllerSnapshot::new("kb").with_pressed(Button::Up);
        let b = ControllerSnapshot::new("kb");
        let c = ControllerSnapshot::new("pad-1");
        assert!(a.equals(&b));
        assert!(!a.equals(&c));
    }

    #[test]
    fn test_vibrate_sends_request() {
        let (tx, rx) = bounded(4);
        let snapshot = ControllerSnapshot::new("pad-2").with_haptics(tx);
        snapshot.vibrate(Duration::from_millis(200));

        let request = rx.try_recv().unwrap();
        assert_eq!(request.controller_id, "pad-2");
        assert_eq!(request.duration, Duration::from_millis(200));
    }

    #[test]
    fn test_vibrate_without_haptics_is_noop() {
        let snapshot = ControllerSnapshot::new("kb");
        snapshot.vibrate(Duration::from_millis(200));
    }

    #[test]
    fn test_button_parse() {
        assert_eq!(Button::parse("UP"), Some(Button::Up));
        assert_eq!(Button::parse("a"), Some(Button::Left));
        assert_eq!(Button::parse("start"), Some(Button::Start));
        assert_eq!(Button::parse("jump"), None);
    }
}
