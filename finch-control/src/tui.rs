use color_eyre::Result;
use color_eyre::eyre::{self, Context};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use finch_program::{Executor, Program, State};
use ratatui::{
    prelude::*,
    symbols::border,
    widgets::{
        Block, Borders, Paragraph,
        block::{Position, Title},
    },
};
use std::{
    io::{self, Stdout, stdout},
    panic,
};

use crate::simulator::SimulatedFinch;

use self::widgets::{ProgramWidget, RobotWidget, TraceWidget};

mod widgets;

pub fn run(program: &Program, robot: SimulatedFinch) -> Result<()> {
    let mut terminal = init()?;
    App::new(program, robot).run(&mut terminal)?;
    restore()?;
    Ok(())
}

#[derive(Debug)]
pub struct App<'p> {
    executor: Executor<'p>,
    robot: SimulatedFinch,
    trace: Vec<String>,
    exit: bool,
}

impl<'p> App<'p> {
    pub fn new(program: &'p Program, robot: SimulatedFinch) -> Self {
        Self {
            executor: Executor::new(program),
            robot,
            trace: Vec::new(),
            exit: false,
        }
    }

    /// runs the application's main loop until the user quits
    pub fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.render_frame(frame))?;
            self.handle_events().wrap_err("handle events failed")?;
        }
        Ok(())
    }

    fn render_frame(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.size())
    }

    fn handle_events(&mut self) -> Result<()> {
        match event::read()? {
            // crossterm also emits key release and repeat events on Windows
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => self
                .handle_key_event(key_event)
                .wrap_err_with(|| format!("handling key event failed:\n{key_event:#?}")),
            _ => Ok(()),
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Char('q') => self.exit = true,
            KeyCode::Enter => {
                self.step();
            }
            KeyCode::Char('r') => while self.step() {},
            _ => {}
        }
        Ok(())
    }

    /// Returns false once there is nothing left to run.
    fn step(&mut self) -> bool {
        match self.executor.step(&mut self.robot) {
            Some(step) => {
                self.trace.extend(step.trace);
                true
            }
            None => false,
        }
    }
}

impl Widget for &App<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Percentage(35),
            ])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(3)])
            .split(layout[0]);

        let state = match self.executor.state() {
            State::NotStarted => "not started".yellow(),
            State::Running => "running".green(),
            State::Complete => "complete".blue(),
        };
        let params = self.executor.params();
        let status_text = Text::from(vec![
            Line::from(vec!["State: ".into(), state]),
            Line::from(format!("Motor speed: {}", params.drive_speed)),
            Line::from(format!("LED brightness: {}", params.led_brightness)),
            Line::from(format!("Wait: {} s", params.wait_seconds)),
        ]);
        let instructions = Title::from(Line::from(vec![
            " Step ".into(),
            "<Enter>".blue().bold(),
            " Run ".into(),
            "<R>".blue().bold(),
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ]));
        let block = Block::default()
            .title(Title::from(" Finch Program ".bold()).alignment(Alignment::Center))
            .title(
                instructions
                    .alignment(Alignment::Center)
                    .position(Position::Bottom),
            )
            .borders(Borders::ALL)
            .border_set(border::THICK);
        Paragraph::new(status_text)
            .block(block)
            .render(left[0], buf);

        ProgramWidget::new(self.executor.program(), self.executor.pc()).render(left[1], buf);
        RobotWidget::new(&self.robot).render(layout[1], buf);
        TraceWidget::new(&self.trace).render(layout[2], buf);
    }
}

/// A type alias for the terminal type used in this application
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal
pub fn init() -> Result<Tui> {
    install_hooks()?;
    execute!(stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

/// Restore the terminal to its original state
pub fn restore() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Replace the color_eyre panic and error hooks with ones that restore the
/// terminal before reporting.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();

    let panic_hook = panic_hook.into_panic_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = restore() {
            eprintln!("failed to restore terminal: {e}");
        }
        panic_hook(panic_info);
    }));

    let eyre_hook = eyre_hook.into_eyre_hook();
    eyre::set_hook(Box::new(move |error| {
        if let Err(e) = restore() {
            eprintln!("failed to restore terminal: {e}");
        }
        eyre_hook(error)
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use finch_program::{Instruction, Parameters};

    use super::*;
    use crate::config::SimulatorConfig;

    fn robot() -> SimulatedFinch {
        SimulatedFinch::new(&SimulatorConfig {
            ambient_celsius: 20.0,
            realtime: false,
        })
    }

    #[test]
    fn enter_steps_one_instruction() {
        let program =
            Program::from_script("moveforward\nnone\nledon\ndone", Parameters::new(70, 9, 0.0))
                .unwrap();
        let mut app = App::new(&program, robot());

        app.handle_key_event(KeyCode::Enter.into()).unwrap();
        assert_eq!(app.executor.pc(), 1);
        assert_eq!(app.robot.motors(), (70, 70));
        assert_eq!(app.trace, ["MOVEFORWARD"]);

        app.handle_key_event(KeyCode::Enter.into()).unwrap();
        assert_eq!(app.executor.pc(), 2);
        assert_eq!(app.trace, ["MOVEFORWARD"]);
    }

    #[test]
    fn r_runs_to_completion_and_q_quits() {
        let program =
            Program::from_script("ledon\nwait\ndone", Parameters::new(1, 33, 5.0)).unwrap();
        let mut app = App::new(&program, robot());

        app.handle_key_event(KeyCode::Char('r').into()).unwrap();
        assert_eq!(app.executor.state(), State::Complete);
        assert_eq!(app.robot.light(), (33, 33, 33));
        assert_eq!(app.trace, ["LEDON", "WAIT", "DONE"]);

        app.handle_key_event(KeyCode::Enter.into()).unwrap();
        assert_eq!(app.trace.len(), 3);

        app.handle_key_event(KeyCode::Char('q').into()).unwrap();
        assert!(app.exit);
    }

    #[test]
    fn renders_listing_and_trace() {
        let program = Program::from_script("turnleft\ndone", Parameters::default()).unwrap();
        let mut app = App::new(&program, robot());
        app.step();

        let mut buf = Buffer::empty(Rect::new(0, 0, 120, 20));
        (&app).render(buf.area, &mut buf);
        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();

        assert!(text.contains(Instruction::TurnLeft.name()));
        assert!(text.contains("running"));
        assert!(text.contains("-100"));
    }
}
