//! The capability interface a program is replayed against.

/// Primitive robot operations used by the [`Executor`](crate::Executor).
///
/// Values are passed through as given. Motor channels are conventionally
/// -255..=255 and light channels 0..=255; range checks, if any, belong to
/// the implementation.
pub trait Robot {
    fn drive_motors(&mut self, left: i32, right: i32);
    fn set_light(&mut self, r: i32, g: i32, b: i32);
    /// Block the caller for `ms` milliseconds.
    fn suspend_for(&mut self, ms: u64);
    /// Temperature in degrees Celsius.
    fn read_temperature(&mut self) -> f64;
}

impl<R: Robot + ?Sized> Robot for &mut R {
    fn drive_motors(&mut self, left: i32, right: i32) {
        (**self).drive_motors(left, right)
    }
    fn set_light(&mut self, r: i32, g: i32, b: i32) {
        (**self).set_light(r, g, b)
    }
    fn suspend_for(&mut self, ms: u64) {
        (**self).suspend_for(ms)
    }
    fn read_temperature(&mut self) -> f64 {
        (**self).read_temperature()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    DriveMotors(i32, i32),
    SetLight(i32, i32, i32),
    SuspendFor(u64),
    ReadTemperature,
}

/// A robot that only remembers what it was asked to do.
///
/// Temperature reads return a fixed value.
#[derive(Debug, Clone, Default)]
pub struct RecordingRobot {
    pub calls: Vec<Call>,
    pub temperature: f64,
}

impl RecordingRobot {
    pub fn with_temperature(temperature: f64) -> Self {
        Self {
            calls: Vec::new(),
            temperature,
        }
    }
}

impl Robot for RecordingRobot {
    fn drive_motors(&mut self, left: i32, right: i32) {
        self.calls.push(Call::DriveMotors(left, right));
    }

    fn set_light(&mut self, r: i32, g: i32, b: i32) {
        self.calls.push(Call::SetLight(r, g, b));
    }

    fn suspend_for(&mut self, ms: u64) {
        self.calls.push(Call::SuspendFor(ms));
    }

    fn read_temperature(&mut self) -> f64 {
        self.calls.push(Call::ReadTemperature);
        self.temperature
    }
}
