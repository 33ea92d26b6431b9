//! Capture direction and mode set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a call a batch of points came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single capture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Capture the call's input message
    In,
    /// Capture the call's output message
    Out,
}

impl From<CaptureMode> for Direction {
    fn from(mode: CaptureMode) -> Self {
        match mode {
            CaptureMode::In => Direction::In,
            CaptureMode::Out => Direction::Out,
        }
    }
}

/// Set of capture modes configured on one instrumented call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureModes {
    pub input: bool,
    pub output: bool,
}

impl CaptureModes {
    /// No capture at all
    pub const NONE: Self = Self {
        input: false,
        output: false,
    };
    /// Input only
    pub const IN: Self = Self {
        input: true,
        output: false,
    };
    /// Output only
    pub const OUT: Self = Self {
        input: false,
        output: true,
    };
    /// Input and output
    pub const BOTH: Self = Self {
        input: true,
        output: true,
    };

    pub fn contains(&self, mode: CaptureMode) -> bool {
        match mode {
            CaptureMode::In => self.input,
            CaptureMode::Out => self.output,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.input && !self.output
    }
}

impl FromIterator<CaptureMode> for CaptureModes {
    fn from_iter<I: IntoIterator<Item = CaptureMode>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, |mut modes, mode| {
            match mode {
                CaptureMode::In => modes.input = true,
                CaptureMode::Out => modes.output = true,
            }
            modes
        })
    }
}

impl<const N: usize> From<[CaptureMode; N]> for CaptureModes {
    fn from(modes: [CaptureMode; N]) -> Self {
        modes.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_from_list() {
        let modes = CaptureModes::from([CaptureMode::Out, CaptureMode::In]);
        assert_eq!(modes, CaptureModes::BOTH);
        assert!(modes.contains(CaptureMode::In));

        let none: CaptureModes = std::iter::empty().collect();
        assert!(none.is_empty());
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::In.to_string(), "in");
        assert_eq!(Direction::from(CaptureMode::Out), Direction::Out);
    }
}
