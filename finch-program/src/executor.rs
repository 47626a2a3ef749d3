use tracing::debug;

use crate::program::instruction::Instruction;
use crate::program::{Parameters, Program};
use crate::robot::Robot;

/// Motor speed used for both wheels when turning in place.
pub const TURN_SPEED: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    NotStarted,
    Running,
    Complete,
}

/// Result of running a single instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub index: usize,
    pub instruction: Instruction,
    /// `None` only for [`Instruction::None`].
    pub trace: Option<String>,
}

/// Replays a program front to back, one instruction per [`step`](Self::step).
///
/// Parameters are captured when the executor is created, so editing the
/// program's parameters takes effect on the next run.
#[derive(Debug)]
pub struct Executor<'p> {
    program: &'p Program,
    params: Parameters,
    pc: usize,
}

impl<'p> Executor<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            params: program.params(),
            pc: 0,
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn params(&self) -> Parameters {
        self.params
    }

    /// Index of the next instruction to run.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> State {
        if self.pc >= self.program.len() {
            State::Complete
        } else if self.pc == 0 {
            State::NotStarted
        } else {
            State::Running
        }
    }

    /// Run the next instruction, or return `None` once the program is done.
    pub fn step(&mut self, robot: &mut impl Robot) -> Option<Step> {
        let instruction = *self.program.instructions().get(self.pc)?;
        let index = self.pc;
        self.pc += 1;

        debug!("{index}: {instruction}");
        let trace = dispatch(instruction, &self.params, robot);
        Some(Step {
            index,
            instruction,
            trace,
        })
    }

    /// Run every remaining instruction and collect the trace.
    pub fn run(mut self, robot: &mut impl Robot) -> Vec<String> {
        let mut trace = Vec::with_capacity(self.program.len() - self.pc);
        while let Some(step) = self.step(robot) {
            trace.extend(step.trace);
        }
        trace
    }
}

/// Replay `program` once against `robot`, returning one trace line per
/// instruction (none for `NONE`).
pub fn execute(program: &Program, robot: &mut impl Robot) -> Vec<String> {
    Executor::new(program).run(robot)
}

fn dispatch(inst: Instruction, params: &Parameters, robot: &mut impl Robot) -> Option<String> {
    let speed = params.drive_speed;
    let brightness = params.led_brightness;
    match inst {
        Instruction::None => return None,
        Instruction::MoveForward => robot.drive_motors(speed, speed),
        Instruction::MoveBackward => {
            // i32::MIN has no negation; reverse at full speed instead
            let reverse = speed.saturating_neg();
            robot.drive_motors(reverse, reverse)
        }
        Instruction::StopMotors => robot.drive_motors(0, 0),
        Instruction::Wait => robot.suspend_for(params.wait_millis()),
        Instruction::TurnRight => robot.drive_motors(TURN_SPEED, -TURN_SPEED),
        Instruction::TurnLeft => robot.drive_motors(-TURN_SPEED, TURN_SPEED),
        Instruction::LedOn => robot.set_light(brightness, brightness, brightness),
        Instruction::LedOff => robot.set_light(0, 0, 0),
        Instruction::GetTemperature => {
            let celsius = robot.read_temperature();
            return Some(format!("Temperature: {celsius:.2}"));
        }
        Instruction::Done => {}
    }
    Some(inst.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{Call, RecordingRobot};
    use proptest::prelude::*;

    fn program_of(instructions: &[Instruction], params: Parameters) -> Program {
        let mut program = Program::new(params);
        for &inst in instructions {
            program.append(inst);
        }
        program
    }

    #[test]
    fn runs_the_square_example() {
        let program = program_of(
            &[
                Instruction::MoveForward,
                Instruction::Wait,
                Instruction::TurnRight,
                Instruction::LedOn,
                Instruction::Done,
            ],
            Parameters::new(150, 80, 2.0),
        );
        let mut robot = RecordingRobot::default();
        let trace = execute(&program, &mut robot);

        assert_eq!(
            robot.calls,
            [
                Call::DriveMotors(150, 150),
                Call::SuspendFor(2000),
                Call::DriveMotors(100, -100),
                Call::SetLight(80, 80, 80),
            ]
        );
        assert_eq!(trace, ["MOVEFORWARD", "WAIT", "TURNRIGHT", "LEDON", "DONE"]);
    }

    #[test]
    fn covers_every_instruction() {
        let program = program_of(&Instruction::ALL, Parameters::new(60, 30, 0.25));
        let mut robot = RecordingRobot::with_temperature(21.0);
        let trace = execute(&program, &mut robot);

        assert_eq!(
            robot.calls,
            [
                Call::DriveMotors(60, 60),
                Call::DriveMotors(-60, -60),
                Call::DriveMotors(0, 0),
                Call::SuspendFor(250),
                Call::DriveMotors(100, -100),
                Call::DriveMotors(-100, 100),
                Call::SetLight(30, 30, 30),
                Call::SetLight(0, 0, 0),
                Call::ReadTemperature,
            ]
        );
        assert_eq!(
            trace,
            [
                "MOVEFORWARD",
                "MOVEBACKWARD",
                "STOPMOTORS",
                "WAIT",
                "TURNRIGHT",
                "TURNLEFT",
                "LEDON",
                "LEDOFF",
                "Temperature: 21.00",
                "DONE",
            ]
        );
    }

    #[test]
    fn empty_program_does_nothing() {
        let program = Program::default();
        let mut robot = RecordingRobot::default();
        let mut executor = Executor::new(&program);
        assert_eq!(executor.state(), State::Complete);
        assert_eq!(executor.step(&mut robot), None);
        assert!(execute(&program, &mut robot).is_empty());
        assert!(robot.calls.is_empty());
    }

    #[test]
    fn none_is_silent_even_after_other_output() {
        let program = program_of(
            &[Instruction::LedOn, Instruction::None, Instruction::None],
            Parameters::default(),
        );
        let mut robot = RecordingRobot::default();
        let trace = execute(&program, &mut robot);
        assert_eq!(trace, ["LEDON"]);
        assert_eq!(robot.calls.len(), 1);
    }

    #[test]
    fn done_in_the_middle_does_not_stop_execution() {
        let program = program_of(
            &[Instruction::Done, Instruction::MoveBackward, Instruction::Done],
            Parameters::new(40, 1, 0.0),
        );
        let mut robot = RecordingRobot::default();
        let trace = execute(&program, &mut robot);
        assert_eq!(trace, ["DONE", "MOVEBACKWARD", "DONE"]);
        assert_eq!(robot.calls, [Call::DriveMotors(-40, -40)]);
    }

    #[test]
    fn temperature_always_has_two_decimals() {
        let program = program_of(&[Instruction::GetTemperature], Parameters::default());
        for (reading, expected) in [
            (20.0, "Temperature: 20.00"),
            (19.456, "Temperature: 19.46"),
            (-3.1, "Temperature: -3.10"),
            (25.123456789, "Temperature: 25.12"),
        ] {
            let mut robot = RecordingRobot::with_temperature(reading);
            assert_eq!(execute(&program, &mut robot), [expected]);
        }
    }

    #[test]
    fn out_of_range_parameters_pass_through() {
        let program = program_of(
            &[Instruction::MoveForward, Instruction::LedOn],
            Parameters::new(1000, -7, 0.0),
        );
        let mut robot = RecordingRobot::default();
        execute(&program, &mut robot);
        assert_eq!(
            robot.calls,
            [Call::DriveMotors(1000, 1000), Call::SetLight(-7, -7, -7)]
        );
    }

    #[test]
    fn backward_at_minimum_speed_does_not_overflow() {
        let program = program_of(&[Instruction::MoveBackward], Parameters::new(i32::MIN, 1, 0.0));
        let mut robot = RecordingRobot::default();
        let trace = execute(&program, &mut robot);
        assert_eq!(trace, ["MOVEBACKWARD"]);
        assert_eq!(robot.calls, [Call::DriveMotors(i32::MAX, i32::MAX)]);
    }

    #[test]
    fn stepping_reports_state() {
        let program = program_of(
            &[Instruction::None, Instruction::StopMotors],
            Parameters::default(),
        );
        let mut robot = RecordingRobot::default();
        let mut executor = Executor::new(&program);
        assert_eq!(executor.state(), State::NotStarted);

        let step = executor.step(&mut robot).unwrap();
        assert_eq!(step.index, 0);
        assert_eq!(step.instruction, Instruction::None);
        assert_eq!(step.trace, None);
        assert_eq!(executor.state(), State::Running);

        let step = executor.step(&mut robot).unwrap();
        assert_eq!(step.trace.as_deref(), Some("STOPMOTORS"));
        assert_eq!(executor.state(), State::Complete);
        assert_eq!(executor.step(&mut robot), None);
    }

    #[test]
    fn rerun_picks_up_new_parameters() {
        let mut program = program_of(&[Instruction::MoveForward], Parameters::new(50, 1, 0.0));
        let mut robot = RecordingRobot::default();
        execute(&program, &mut robot);

        program.set_params(Parameters::new(200, 1, 0.0));
        program.append(Instruction::Done);
        execute(&program, &mut robot);

        assert_eq!(
            robot.calls,
            [Call::DriveMotors(50, 50), Call::DriveMotors(200, 200)]
        );
    }

    fn arb_instructions() -> impl Strategy<Value = Vec<Instruction>> {
        proptest::collection::vec(
            (0..Instruction::ALL.len()).prop_map(|i| Instruction::ALL[i]),
            0..32,
        )
    }

    fn arb_params() -> impl Strategy<Value = Parameters> {
        (1..=255i32, 1..=255i32, 0.0..10.0f64)
            .prop_map(|(speed, brightness, wait)| Parameters::new(speed, brightness, wait))
    }

    fn kind(call: &Call) -> u8 {
        match call {
            Call::DriveMotors(..) => 0,
            Call::SetLight(..) => 1,
            Call::SuspendFor(_) => 2,
            Call::ReadTemperature => 3,
        }
    }

    proptest! {
        #[test]
        fn repeated_runs_are_identical(
            instructions in arb_instructions(),
            params in arb_params(),
        ) {
            let program = program_of(&instructions, params);
            let mut first = RecordingRobot::with_temperature(18.25);
            let mut second = RecordingRobot::with_temperature(18.25);

            let first_trace = execute(&program, &mut first);
            let second_trace = execute(&program, &mut second);

            prop_assert_eq!(first_trace, second_trace);
            prop_assert_eq!(first.calls, second.calls);
        }

        #[test]
        fn parameters_change_magnitudes_only(
            instructions in arb_instructions(),
            before in arb_params(),
            after in arb_params(),
        ) {
            let mut program = program_of(&instructions, before);
            let mut first = RecordingRobot::default();
            let first_trace = execute(&program, &mut first);

            program.set_params(after);
            let mut second = RecordingRobot::default();
            let second_trace = execute(&program, &mut second);

            prop_assert_eq!(first_trace, second_trace);
            prop_assert_eq!(
                first.calls.iter().map(kind).collect::<Vec<_>>(),
                second.calls.iter().map(kind).collect::<Vec<_>>()
            );
        }

        #[test]
        fn one_trace_line_per_non_none_instruction(instructions in arb_instructions()) {
            let program = program_of(&instructions, Parameters::default());
            let trace = execute(&program, &mut RecordingRobot::default());
            let expected = instructions
                .iter()
                .filter(|inst| **inst != Instruction::None)
                .count();
            prop_assert_eq!(trace.len(), expected);
        }
    }
}
