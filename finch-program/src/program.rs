use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use self::instruction::Instruction;

pub mod instruction;

/// Settings shared by every parameterized instruction of a [`Program`].
///
/// Intended ranges are 1..=255 for speed and brightness and 0..=10 seconds
/// for waits, but nothing here enforces them; the robot sees what was set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub drive_speed: i32,
    pub led_brightness: i32,
    pub wait_seconds: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            drive_speed: 100,
            led_brightness: 100,
            wait_seconds: 1.0,
        }
    }
}

impl Parameters {
    pub fn new(drive_speed: i32, led_brightness: i32, wait_seconds: f64) -> Self {
        Self {
            drive_speed,
            led_brightness,
            wait_seconds,
        }
    }

    /// Wait duration in whole milliseconds. Negative or NaN waits become zero.
    pub fn wait_millis(&self) -> u64 {
        (self.wait_seconds * 1000.0) as u64
    }
}

/// Parse operator input for a numeric field.
///
/// Whether a failure means "ask again" or "keep the old value" is up to the
/// caller.
pub fn parse_number<T: FromStr>(field: &'static str, input: &str) -> Result<T> {
    input.trim().parse().map_err(|_| Error::InvalidNumber {
        field,
        input: input.to_string(),
    })
}

/// Outcome of feeding one token to [`Program::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// The instruction was appended; keep reading tokens.
    Accepted(Instruction),
    /// `DONE` was appended; entry is over.
    Finished,
}

/// An ordered list of instructions plus the parameters they read when run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
    params: Parameters,
}

impl Program {
    pub fn new(params: Parameters) -> Self {
        Self {
            instructions: Vec::new(),
            params,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn params(&self) -> Parameters {
        self.params
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn append(&mut self, inst: Instruction) {
        debug!("append {inst} at {}", self.instructions.len());
        self.instructions.push(inst);
    }

    /// Replace all parameters at once.
    pub fn set_params(&mut self, params: Parameters) {
        debug!(?params, "set parameters");
        self.params = params;
    }

    /// Feed one operator token through the entry protocol.
    ///
    /// Unknown tokens leave the program untouched. `DONE` is appended like any
    /// other instruction and reports [`Entry::Finished`].
    pub fn enter(&mut self, token: &str) -> Result<Entry> {
        let inst = Instruction::parse(token)?;
        self.append(inst);
        Ok(match inst {
            Instruction::Done => Entry::Finished,
            other => Entry::Accepted(other),
        })
    }

    /// Build a program from a script: one token per line, `#` comments and
    /// blank lines skipped. Reading stops after `DONE`.
    pub fn from_script(script: &str, params: Parameters) -> Result<Self> {
        let mut program = Program::new(params);
        let mut lines = script
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        for (line, token) in lines.by_ref() {
            let entry = program.enter(token).map_err(|e| Error::Script {
                line,
                source: Box::new(e),
            })?;
            if entry == Entry::Finished {
                break;
            }
        }
        if let Some((line, _)) = lines.next() {
            warn!("ignoring instructions after DONE, starting at line {line}");
        }
        Ok(program)
    }
}

/// Numbered listing, one instruction per line.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "{:>3}. {inst}", i + 1)?;
        }
        Ok(())
    }
}
