use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// One robot action a [`Program`](super::Program) can hold.
///
/// Declaration order is the order the vocabulary is listed to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    None,
    MoveForward,
    MoveBackward,
    StopMotors,
    Wait,
    TurnRight,
    TurnLeft,
    LedOn,
    LedOff,
    GetTemperature,
    Done,
}

impl Instruction {
    /// The whole vocabulary, in declaration order.
    pub const ALL: [Instruction; 11] = [
        Instruction::None,
        Instruction::MoveForward,
        Instruction::MoveBackward,
        Instruction::StopMotors,
        Instruction::Wait,
        Instruction::TurnRight,
        Instruction::TurnLeft,
        Instruction::LedOn,
        Instruction::LedOff,
        Instruction::GetTemperature,
        Instruction::Done,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Instruction::None => "NONE",
            Instruction::MoveForward => "MOVEFORWARD",
            Instruction::MoveBackward => "MOVEBACKWARD",
            Instruction::StopMotors => "STOPMOTORS",
            Instruction::Wait => "WAIT",
            Instruction::TurnRight => "TURNRIGHT",
            Instruction::TurnLeft => "TURNLEFT",
            Instruction::LedOn => "LEDON",
            Instruction::LedOff => "LEDOFF",
            Instruction::GetTemperature => "GETTEMPERATURE",
            Instruction::Done => "DONE",
        }
    }

    /// Vocabulary names for display, in declaration order.
    pub fn vocabulary() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|inst| inst.name())
    }

    /// Case-insensitive exact match against the vocabulary names.
    ///
    /// No trimming, prefix or fuzzy matching is done: anything that is not a
    /// member name is rejected.
    pub fn parse(token: &str) -> Result<Instruction, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|inst| inst.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| Error::UnknownInstruction(token.to_string()))
    }
}

impl FromStr for Instruction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Instruction::parse(s)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
