//! Automatic/Manual mode selection.
//!
//! The mode decides where the valve command comes from on each step:
//! the PID controller (`Automatic`) or a value held by the operator
//! (`Manual`). Switching never touches controller memory or simulation time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of the actuation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Valve driven by the PID controller.
    Automatic,
    /// Valve held at the operator's manual opening.
    #[default]
    Manual,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Automatic => "Automatic",
            Mode::Manual => "Manual",
        }
    }

    pub fn is_manual(self) -> bool {
        matches!(self, Mode::Manual)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mode state machine.
///
/// Every transition is legal. The run/pause flag belongs to the host; this
/// type only answers whether a step should happen given that flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    /// Start in `Manual`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch the actuation source. Returns the previous mode.
    pub fn set_mode(&mut self, mode: Mode) -> Mode {
        let previous = self.mode;
        if previous != mode {
            tracing::debug!(from = %previous, to = %mode, "mode change");
        }
        self.mode = mode;
        previous
    }

    /// Flip between `Automatic` and `Manual`. Returns the new mode.
    pub fn toggle(&mut self) -> Mode {
        let next = match self.mode {
            Mode::Automatic => Mode::Manual,
            Mode::Manual => Mode::Automatic,
        };
        self.set_mode(next);
        next
    }

    /// Whether the plant advances on this tick.
    ///
    /// Manual mode integrates even while paused so that moving the manual
    /// valve always has a visible effect.
    pub fn should_step(&self, running: bool) -> bool {
        running || self.mode.is_manual()
    }

    /// Mode shown to the operator: `Automatic` only while the loop is running.
    pub fn display_mode(&self, running: bool) -> Mode {
        match self.mode {
            Mode::Automatic if running => Mode::Automatic,
            _ => Mode::Manual,
        }
    }

    /// Back to the power-on default.
    pub fn reset(&mut self) {
        self.set_mode(Mode::Manual);
    }
}
