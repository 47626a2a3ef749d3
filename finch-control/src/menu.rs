use std::io::{BufRead, Write};
use std::path::PathBuf;

use color_eyre::Result;
use finch_program::program::parse_number;
use finch_program::{Entry, Executor, Instruction, Parameters, Program, Robot};
use tracing::{info, warn};

use crate::config::{Config, Theme, parse_color};
use crate::console::Console;

/// The interactive menu shell.
pub struct Shell<R, W, B> {
    console: Console<R, W>,
    robot: B,
    config: Config,
    /// Where theme changes are saved; `None` keeps them for this session only.
    config_path: Option<PathBuf>,
}

impl<R: BufRead, W: Write, B: Robot> Shell<R, W, B> {
    pub fn new(console: Console<R, W>, robot: B, config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            console,
            robot,
            config,
            config_path,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.console.header("Finch Control")?;
        self.console.continue_prompt()?;

        self.main_menu()?;

        self.console.header("Thank you for using Finch Control!")?;
        self.console.continue_prompt()?;
        self.console.reset()?;
        Ok(())
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            self.console.header("Main Menu")?;
            self.console.line("a) User Programming")?;
            self.console.line("b) Theme")?;
            self.console.line("q) Quit")?;
            let Some(choice) = self.console.prompt("\tEnter Choice: ")? else {
                return Ok(());
            };
            match choice.to_lowercase().as_str() {
                "a" => self.user_programming()?,
                "b" => self.theme_menu()?,
                "q" => return Ok(()),
                _ => {
                    self.console.blank()?;
                    self.console.line("Please enter a letter for the menu choice.")?;
                    self.console.continue_prompt()?;
                }
            }
        }
    }

    fn user_programming(&mut self) -> Result<()> {
        let mut program = Program::new(self.config.parameters);
        info!("programming session started");
        loop {
            self.console.header("User Programming")?;
            self.console.line("a) Set Command Parameters")?;
            self.console.line("b) Add Commands")?;
            self.console.line("c) View Commands")?;
            self.console.line("d) Execute Commands")?;
            self.console.line("q) Main Menu")?;
            let Some(choice) = self.console.prompt("\tEnter Choice: ")? else {
                break;
            };
            match choice.to_lowercase().as_str() {
                "a" => self.set_parameters(&mut program)?,
                "b" => self.add_commands(&mut program)?,
                "c" => self.view_commands(&program)?,
                "d" => self.execute_commands(&program)?,
                "q" => break,
                _ => {
                    self.console.blank()?;
                    self.console.line("Please enter a letter for the menu choice.")?;
                    self.console.continue_prompt()?;
                }
            }
        }
        info!(len = program.len(), "programming session ended");
        Ok(())
    }

    fn set_parameters(&mut self, program: &mut Program) -> Result<()> {
        let current = program.params();
        self.console.header("Command Parameters")?;

        let drive_speed = self.read_or_keep("motor speed", "Motor speed [1-255]", current.drive_speed)?;
        let led_brightness =
            self.read_or_keep("LED brightness", "LED brightness [1-255]", current.led_brightness)?;
        let wait_seconds =
            self.read_or_keep("wait time", "Wait time in seconds [0-10]", current.wait_seconds)?;

        let params = Parameters::new(drive_speed, led_brightness, wait_seconds);
        program.set_params(params);

        self.console.blank()?;
        self.console.line(format!("Motor speed: {}", params.drive_speed))?;
        self.console.line(format!("LED brightness: {}", params.led_brightness))?;
        self.console.line(format!("Wait time: {} seconds", params.wait_seconds))?;
        self.console.menu_prompt("User Programming")
    }

    /// Malformed input keeps `current` rather than asking again.
    fn read_or_keep<T>(&mut self, field: &'static str, label: &str, current: T) -> Result<T>
    where
        T: std::str::FromStr + std::fmt::Display + Copy,
    {
        let Some(input) = self.console.prompt(&format!("{label} (currently {current}): "))? else {
            return Ok(current);
        };
        Ok(parse_number(field, &input).unwrap_or_else(|e| {
            warn!("{e}, keeping {current}");
            current
        }))
    }

    fn add_commands(&mut self, program: &mut Program) -> Result<()> {
        self.console.header("Add Commands")?;
        self.console.line("Commands:")?;
        for name in Instruction::vocabulary() {
            self.console.line(format!("  {name}"))?;
        }
        self.console.blank()?;
        self.console.line("Enter one command per line, DONE to finish.")?;

        loop {
            let Some(token) = self.console.prompt(&format!("Command {}: ", program.len() + 1))? else {
                return Ok(());
            };
            match program.enter(&token) {
                Ok(Entry::Accepted(inst)) => self.console.line(format!("{inst} added."))?,
                Ok(Entry::Finished) => {
                    self.console.line("DONE added.")?;
                    break;
                }
                Err(e) => {
                    warn!("{e}");
                    self.console.line(format!("{token:?} is not a valid command, try again."))?;
                }
            }
        }
        self.console.menu_prompt("User Programming")
    }

    fn view_commands(&mut self, program: &Program) -> Result<()> {
        self.console.header("View Commands")?;
        if program.is_empty() {
            self.console.line("No commands entered yet.")?;
        }
        for line in program.to_string().lines() {
            self.console.line(line)?;
        }
        self.console.menu_prompt("User Programming")
    }

    fn execute_commands(&mut self, program: &Program) -> Result<()> {
        self.console.header("Execute Commands")?;
        self.console.line(format!("Executing {} commands.", program.len()))?;
        self.console.blank()?;

        let mut executor = Executor::new(program);
        while let Some(step) = executor.step(&mut self.robot) {
            if let Some(trace) = step.trace {
                self.console.line(trace)?;
            }
        }
        self.console.menu_prompt("User Programming")
    }

    fn theme_menu(&mut self) -> Result<()> {
        self.console.header("Theme")?;
        let current = self.config.theme.clone();
        self.console.line(format!("Foreground: {}", current.foreground))?;
        self.console.line(format!("Background: {}", current.background))?;
        self.console.blank()?;

        let foreground = self.console.prompt("New foreground (blank to keep): ")?.unwrap_or_default();
        let background = self.console.prompt("New background (blank to keep): ")?.unwrap_or_default();
        let theme = Theme {
            foreground: if foreground.is_empty() { current.foreground } else { foreground },
            background: if background.is_empty() { current.background } else { background },
        };

        match theme.colors() {
            Ok(colors) => {
                self.config.theme = theme;
                self.console.set_theme(colors);
                if let Some(path) = &self.config_path {
                    self.config.save(path)?;
                }
                self.console.line("Theme updated.")?;
            }
            Err(e) => self.console.line(format!("{e}, theme unchanged."))?,
        }
        self.console.menu_prompt("Main")
    }
}

/// Parse a colour pair given on the command line.
pub fn theme_from_args(foreground: &str, background: &str) -> Result<Theme> {
    parse_color(foreground)?;
    parse_color(background)?;
    Ok(Theme {
        foreground: foreground.to_string(),
        background: background.to_string(),
    })
}
