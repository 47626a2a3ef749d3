use finch_program::Program;
use ratatui::prelude::*;
use ratatui::symbols::border;
use ratatui::widgets::block::Title;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::simulator::SimulatedFinch;

fn titled_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(Title::from(title.bold()).alignment(Alignment::Center))
        .borders(Borders::ALL)
        .border_set(border::THICK)
}

/// Program listing with the next instruction highlighted.
pub struct ProgramWidget<'a> {
    program: &'a Program,
    pc: usize,
}

impl<'a> ProgramWidget<'a> {
    pub fn new(program: &'a Program, pc: usize) -> Self {
        Self { program, pc }
    }
}

impl Widget for ProgramWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // keep the cursor in view on long programs
        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.pc.saturating_sub(visible.saturating_sub(1));

        let lines = self
            .program
            .instructions()
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible)
            .map(|(i, inst)| {
                let text = format!("{:>3}. {inst}", i + 1);
                if i == self.pc {
                    Line::from(vec!["> ".yellow().bold(), text.yellow().bold()])
                } else {
                    Line::from(vec!["  ".into(), text.into()])
                }
            })
            .collect::<Vec<Line>>();

        Paragraph::new(Text::from(lines))
            .block(titled_block(" Commands "))
            .render(area, buf);
    }
}

pub struct RobotWidget<'a> {
    robot: &'a SimulatedFinch,
}

impl<'a> RobotWidget<'a> {
    pub fn new(robot: &'a SimulatedFinch) -> Self {
        Self { robot }
    }
}

impl Widget for RobotWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let (left, right) = self.robot.motors();
        let (r, g, b) = self.robot.light();
        let temperature = match self.robot.last_temperature() {
            Some(celsius) => format!("{celsius:.2} °C"),
            None => "-".to_string(),
        };

        let text = Text::from(vec![
            Line::from(vec!["Left motor:  ".into(), format!("{left:>5}").yellow()]),
            Line::from(vec!["Right motor: ".into(), format!("{right:>5}").yellow()]),
            Line::from(vec!["LED:         ".into(), format!("{r}, {g}, {b}").yellow()]),
            Line::from(vec!["Temperature: ".into(), temperature.yellow()]),
        ]);

        Paragraph::new(text)
            .block(titled_block(" Finch "))
            .render(area, buf);
    }
}

/// The most recent trace lines that fit.
pub struct TraceWidget<'a> {
    trace: &'a [String],
}

impl<'a> TraceWidget<'a> {
    pub fn new(trace: &'a [String]) -> Self {
        Self { trace }
    }
}

impl Widget for TraceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let visible = area.height.saturating_sub(2) as usize;
        let lines = self
            .trace
            .iter()
            .skip(self.trace.len().saturating_sub(visible))
            .map(|line| Line::from(line.as_str()))
            .collect::<Vec<Line>>();

        Paragraph::new(Text::from(lines))
            .block(titled_block(" Trace "))
            .render(area, buf);
    }
}
