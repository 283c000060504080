//! Gamepad-to-servo mapping for driver control.
//!
//! Two buttons, two fixed setpoints, no state. A pressed button writes its
//! setpoint every cycle it is held; when both are held both writes happen,
//! A first, so the servo ends the cycle at the B setpoint.

use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Button snapshot for one control cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GamepadState {
    pub a: bool,
    pub b: bool,
}

impl GamepadState {
    pub fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }
}

/// Something that reports the current button state.
pub trait Gamepad {
    fn state(&mut self) -> GamepadState;
}

/// A positional servo.
pub trait Servo {
    /// Command a position in the normalized range `[0, 1]`.
    fn set_position(&mut self, position: f64);
}

/// Setpoints written by the two buttons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopConfig {
    /// Written while A is held.
    pub release_position: f64,
    /// Written while B is held.
    pub close_position: f64,
}

impl TeleopConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("release_position", self.release_position),
            ("close_position", self.close_position),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            release_position: 0.1,
            close_position: 0.45,
        }
    }
}

/// Driver-control loop for the single servo.
#[derive(Clone, Debug)]
pub struct TeleopLoop {
    config: TeleopConfig,
}

impl TeleopLoop {
    pub fn new(config: TeleopConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TeleopConfig {
        &self.config
    }

    /// Apply one cycle of input and return the setpoints written, in order.
    pub fn run_cycle<V: Servo + ?Sized>(&self, input: GamepadState, servo: &mut V) -> Vec<f64> {
        let mut commanded = Vec::with_capacity(2);

        if input.a {
            servo.set_position(self.config.release_position);
            commanded.push(self.config.release_position);
        }
        if input.b {
            servo.set_position(self.config.close_position);
            commanded.push(self.config.close_position);
        }

        if !commanded.is_empty() {
            trace!("Servo commanded {:?}", commanded);
        }
        commanded
    }

    /// Keep cycling while `keep_running` returns true. Returns the cycle count.
    pub fn run_until<G, V, F>(&self, gamepad: &mut G, servo: &mut V, mut keep_running: F) -> usize
    where
        G: Gamepad + ?Sized,
        V: Servo + ?Sized,
        F: FnMut() -> bool,
    {
        info!("Teleop loop started");
        let mut cycles = 0;
        while keep_running() {
            let input = gamepad.state();
            self.run_cycle(input, servo);
            cycles += 1;
        }
        info!("Teleop loop stopped after {} cycles", cycles);
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct RecordingServo {
        writes: Vec<f64>,
    }

    impl Servo for RecordingServo {
        fn set_position(&mut self, position: f64) {
            self.writes.push(position);
        }
    }

    struct ScriptedGamepad {
        states: VecDeque<GamepadState>,
    }

    impl Gamepad for ScriptedGamepad {
        fn state(&mut self) -> GamepadState {
            self.states.pop_front().unwrap_or_default()
        }
    }

    #[test]
    fn test_defaults_valid() {
        let teleop = TeleopLoop::new(TeleopConfig::default()).unwrap();
        assert_eq!(teleop.config().release_position, 0.1);
        assert_eq!(teleop.config().close_position, 0.45);
    }

    #[test]
    fn test_invalid_setpoint_rejected() {
        let config = TeleopConfig {
            release_position: -0.1,
            close_position: 0.45,
        };
        assert!(TeleopLoop::new(config).is_err());

        let config = TeleopConfig {
            release_position: 0.1,
            close_position: f64::NAN,
        };
        assert!(TeleopLoop::new(config).is_err());
    }

    #[test]
    fn test_buttons_map_to_setpoints() {
        let teleop = TeleopLoop::new(TeleopConfig::default()).unwrap();
        let mut servo = RecordingServo::default();

        assert_eq!(teleop.run_cycle(GamepadState::new(true, false), &mut servo), vec![0.1]);
        assert_eq!(teleop.run_cycle(GamepadState::new(false, true), &mut servo), vec![0.45]);
        assert!(teleop.run_cycle(GamepadState::default(), &mut servo).is_empty());
        assert_eq!(servo.writes, vec![0.1, 0.45]);
    }

    #[test]
    fn test_both_buttons_end_at_close() {
        let teleop = TeleopLoop::new(TeleopConfig::default()).unwrap();
        let mut servo = RecordingServo::default();

        teleop.run_cycle(GamepadState::new(true, true), &mut servo);
        assert_eq!(servo.writes, vec![0.1, 0.45]);
    }

    #[test]
    fn test_run_until_counts_cycles() {
        let teleop = TeleopLoop::new(TeleopConfig::default()).unwrap();
        let mut servo = RecordingServo::default();
        let mut gamepad = ScriptedGamepad {
            states: VecDeque::from(vec![
                GamepadState::new(true, false),
                GamepadState::default(),
                GamepadState::new(false, true),
            ]),
        };

        let mut remaining = 4;
        let cycles = teleop.run_until(&mut gamepad, &mut servo, || {
            remaining -= 1;
            remaining >= 0
        });

        assert_eq!(cycles, 4);
        assert_eq!(servo.writes, vec![0.1, 0.45]);
    }
}
