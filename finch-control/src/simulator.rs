use std::thread;
use std::time::Duration;

use finch_program::Robot;
use rand::Rng;
use tracing::{debug, info};

use crate::config::SimulatorConfig;

/// Stand-in for a Finch robot: remembers its outputs and logs every action.
#[derive(Debug, Clone)]
pub struct SimulatedFinch {
    motors: (i32, i32),
    light: (i32, i32, i32),
    last_temperature: Option<f64>,
    ambient_celsius: f64,
    realtime: bool,
}

impl SimulatedFinch {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            motors: (0, 0),
            light: (0, 0, 0),
            last_temperature: None,
            ambient_celsius: config.ambient_celsius,
            realtime: config.realtime,
        }
    }

    pub fn motors(&self) -> (i32, i32) {
        self.motors
    }

    pub fn light(&self) -> (i32, i32, i32) {
        self.light
    }

    pub fn last_temperature(&self) -> Option<f64> {
        self.last_temperature
    }
}

impl Robot for SimulatedFinch {
    fn drive_motors(&mut self, left: i32, right: i32) {
        info!(left, right, "motors");
        self.motors = (left, right);
    }

    fn set_light(&mut self, r: i32, g: i32, b: i32) {
        info!(r, g, b, "led");
        self.light = (r, g, b);
    }

    fn suspend_for(&mut self, ms: u64) {
        if self.realtime {
            info!(ms, "waiting");
            thread::sleep(Duration::from_millis(ms));
        } else {
            debug!(ms, "skipping wait");
        }
    }

    fn read_temperature(&mut self) -> f64 {
        let celsius = self.ambient_celsius + rand::rng().random_range(-0.5..=0.5);
        info!(celsius, "temperature");
        self.last_temperature = Some(celsius);
        celsius
    }
}
