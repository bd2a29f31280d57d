use std::collections::VecDeque;

use crate::input::controller::{ControllerInput, ControllerSnapshot};
use crate::input::{InputFrame, InputProvider};

/// Replays pre-recorded frames, one per poll
///
/// Once the script runs out every poll reports the last known controllers
/// with nothing pressed. Used by tests, benchmarks and replays.
#[derive(Debug, Default)]
pub struct ScriptedInputProvider {
    frames: VecDeque<ScriptedFrame>,
    idle: Vec<ControllerSnapshot>,
}

#[derive(Debug, Default, Clone)]
struct ScriptedFrame {
    controllers: Vec<ControllerSnapshot>,
    global_exit: bool,
}

impl ScriptedInputProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one tick's worth of controller state
    pub fn push_frame(&mut self, controllers: Vec<ControllerSnapshot>) -> &mut Self {
        self.frames.push_back(ScriptedFrame {
            controllers,
            global_exit: false,
        });
        self
    }

    /// Queue `count` ticks with the given controllers connected and idle
    pub fn push_idle(&mut self, controllers: &[ControllerSnapshot], count: usize) -> &mut Self {
        let idle: Vec<ControllerSnapshot> = controllers
            .iter()
            .cloned()
            .map(|mut c| {
                c.release_all();
                c
            })
            .collect();
        for _ in 0..count {
            self.push_frame(idle.clone());
        }
        self
    }

    /// Queue a tick on which the global exit is pressed
    pub fn push_global_exit(&mut self) -> &mut Self {
        self.frames.push_back(ScriptedFrame {
            controllers: Vec::new(),
            global_exit: true,
        });
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputProvider for ScriptedInputProvider {
    fn poll(&mut self) -> InputFrame {
        let frame = match self.frames.pop_front() {
            Some(frame) => {
                if !frame.controllers.is_empty() {
                    self.idle = frame.controllers.clone();
                    for c in self.idle.iter_mut() {
                        c.release_all();
                    }
                }
                frame
            }
            None => ScriptedFrame {
                controllers: self.idle.clone(),
                global_exit: false,
            },
        };

        InputFrame {
            controllers: frame
                .controllers
                .into_iter()
                .map(|c| Box::new(c) as Box<dyn ControllerInput>)
                .collect(),
            global_exit: frame.global_exit,
        }
    }
}
