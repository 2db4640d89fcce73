use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Workout;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Detail view body: one header per exercise followed by its sets.
pub(crate) fn workout_detail_lines(workout: &Workout) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for (idx, exercise) in workout.exercises().iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            exercise.name().to_string(),
            header_style,
        )));
        if exercise.sets().is_empty() {
            lines.push(Line::from(Span::styled(
                "  no sets",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for set in exercise.sets() {
            lines.push(Line::from(format!("  {set}")));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "This workout has no exercises.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "{} sets, {:.1} lbs total volume",
                workout.total_sets(),
                workout.total_volume()
            ),
            Style::default().fg(Color::Gray),
        )));
    }

    lines
}
