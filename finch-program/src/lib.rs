//! Operator-authored programs for a Finch robot.
//!
//! A [`Program`] is an ordered list of [`Instruction`]s sharing one set of
//! [`Parameters`]. The [`Executor`] replays it against anything implementing
//! [`Robot`].

pub use error::{Error, Result};
pub use executor::{Executor, State, Step, execute};
pub use program::instruction::Instruction;
pub use program::{Entry, Parameters, Program};
pub use robot::{Call, RecordingRobot, Robot};

pub mod error;
pub mod executor;
pub mod program;
pub mod robot;
