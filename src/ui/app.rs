use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info};

use crate::models::WorkoutId;
use crate::store::{StoreEvent, Subscription, WorkoutStore};

use super::forms::{ConfirmWorkoutDelete, WorkoutField, WorkoutForm};
use super::helpers::{centered_rect, surface_error, workout_detail_lines};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Field captions in the workout form; also used to place the cursor.
const EXERCISE_LABEL: &str = "Exercise";
const REPS_LABEL: &str = "Reps";
const WEIGHT_LABEL: &str = "Weight (lbs)";

/// Which page is on screen.
#[derive(Clone, Copy)]
enum Screen {
    Workouts,
    Detail(WorkoutId),
}

/// Modal overlays on top of the current screen.
enum Mode {
    Normal,
    EditingWorkout(WorkoutForm),
    ConfirmDelete(ConfirmWorkoutDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal front-end state. The store is owned here; every mutation it
/// performs comes back through the store subscription and is applied by
/// `apply_store_events`.
pub struct App {
    store: WorkoutStore,
    events: Rc<RefCell<Vec<StoreEvent>>>,
    subscription: Subscription,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(mut store: WorkoutStore) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = store.subscribe(move |event| sink.borrow_mut().push(*event));

        Self {
            store,
            events,
            subscription,
            selected: 0,
            screen: Screen::Workouts,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    /// Hand the store back, dropping the UI's subscription.
    pub fn into_store(mut self) -> WorkoutStore {
        self.store.unsubscribe(self.subscription);
        self.store
    }

    /// Index of the highlighted row in the workouts list.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.mode, Mode::EditingWorkout(_))
    }

    /// Id of the workout whose detail page is open.
    pub fn open_workout(&self) -> Option<WorkoutId> {
        match self.screen {
            Screen::Detail(id) => Some(id),
            Screen::Workouts => None,
        }
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::EditingWorkout(form) => self.handle_workout_form(code, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        self.apply_store_events();
        Ok(exit)
    }

    /// "Save": commit the workout being composed in the form.
    pub fn handle_ctrl_s(&mut self) -> Result<()> {
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::EditingWorkout(mut form) => match self.save_workout(&form) {
                Ok(()) => Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                    Mode::EditingWorkout(form)
                }
            },
            other => other,
        };

        self.apply_store_events();
        Ok(())
    }

    /// Take the last added set back out of the form's draft.
    pub fn handle_ctrl_u(&mut self) -> Result<()> {
        if let Mode::EditingWorkout(form) = &mut self.mode {
            match form.undo_set() {
                Some(set) => {
                    let message = format!("Removed {set}.");
                    self.set_status(message, StatusKind::Info);
                }
                None => self.set_status("No sets to remove.", StatusKind::Error),
            }
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Workouts => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    *exit = true;
                }
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                KeyCode::Home => self.selected = 0,
                KeyCode::End => self.selected = self.store.len().saturating_sub(1),
                KeyCode::Enter => {
                    if let Some(id) = self.current_workout_id() {
                        self.clear_status();
                        debug!(%id, "opening workout detail");
                        self.screen = Screen::Detail(id);
                    } else {
                        self.set_status("No workout selected.", StatusKind::Error);
                    }
                }
                KeyCode::Char('+') | KeyCode::Char('a') => {
                    self.clear_status();
                    return Ok(Mode::EditingWorkout(WorkoutForm::default()));
                }
                KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(mode) = self.confirm_delete_at(self.selected) {
                        self.clear_status();
                        return Ok(mode);
                    }
                    self.set_status("No workout selected to delete.", StatusKind::Error);
                }
                KeyCode::Char('e') | KeyCode::Char('E') => {
                    if let Some(form) = self
                        .store
                        .list_workouts()
                        .get(self.selected)
                        .map(WorkoutForm::from_workout)
                    {
                        self.clear_status();
                        return Ok(Mode::EditingWorkout(form));
                    }
                    self.set_status("No workout selected to edit.", StatusKind::Error);
                }
                _ => {}
            },
            Screen::Detail(id) => match code {
                KeyCode::Char('q') => {
                    *exit = true;
                }
                KeyCode::Esc | KeyCode::Left | KeyCode::Backspace => {
                    self.clear_status();
                    self.screen = Screen::Workouts;
                }
                KeyCode::Char('e') | KeyCode::Char('E') => {
                    if let Some(form) = self.store.get(id).map(WorkoutForm::from_workout) {
                        self.clear_status();
                        return Ok(Mode::EditingWorkout(form));
                    }
                }
                KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(mode) = self
                        .store
                        .position(id)
                        .and_then(|index| self.confirm_delete_at(index))
                    {
                        self.clear_status();
                        return Ok(mode);
                    }
                }
                _ => {}
            },
        }
        Ok(Mode::Normal)
    }

    fn handle_workout_form(&mut self, code: KeyCode, mut form: WorkoutForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                let message = if form.editing().is_some() {
                    "Edit cancelled."
                } else {
                    "Add workout cancelled."
                };
                self.set_status(message, StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.add_set() {
                Ok(set) => {
                    let message = format!("Added {set} to {}.", form.exercise.trim());
                    self.set_status(message, StatusKind::Info);
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::EditingWorkout(form))
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmWorkoutDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn save_workout(&mut self, form: &WorkoutForm) -> Result<()> {
        let workout = form.build_workout()?;
        let label = workout.date_label();
        let id = workout.id();

        if form.editing().is_some() {
            self.store.replace_workout(workout)?;
            info!(%id, "workout updated");
            self.set_status(format!("Updated workout from {label}."), StatusKind::Info);
        } else {
            self.store.add_workout(workout);
            info!(%id, "workout saved");
            self.set_status(format!("Saved workout for {label}."), StatusKind::Info);
        }
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmWorkoutDelete) -> Result<()> {
        let index = match self.store.list_workouts().get(confirm.index) {
            Some(workout) if workout.id() == confirm.id => confirm.index,
            _ => self
                .store
                .position(confirm.id)
                .ok_or_else(|| anyhow!("Workout no longer exists."))?,
        };
        let removed = self.store.delete_workout_at(index)?;
        info!(id = %removed.id(), index, "workout deleted");
        self.set_status(
            format!("Deleted workout from {}.", confirm.label),
            StatusKind::Info,
        );
        Ok(())
    }

    /// React to store notifications: follow additions with the selection and
    /// keep the selection and open detail page valid after deletions.
    fn apply_store_events(&mut self) {
        let events = mem::take(&mut *self.events.borrow_mut());
        for event in events {
            debug!(?event, "store changed");
            match event {
                StoreEvent::Added { index, .. } | StoreEvent::Replaced { index, .. } => {
                    self.selected = index;
                }
                StoreEvent::Unchanged { .. } => {}
                StoreEvent::Deleted { id, index } => {
                    if matches!(self.screen, Screen::Detail(open) if open == id) {
                        self.screen = Screen::Workouts;
                    }
                    if self.selected > index {
                        self.selected -= 1;
                    }
                    let len = self.store.len();
                    if self.selected >= len {
                        self.selected = len.saturating_sub(1);
                    }
                }
            }
        }
    }

    fn confirm_delete_at(&self, index: usize) -> Option<Mode> {
        self.store
            .list_workouts()
            .get(index)
            .map(|workout| Mode::ConfirmDelete(ConfirmWorkoutDelete::new(index, workout)))
    }

    fn current_workout_id(&self) -> Option<WorkoutId> {
        self.store
            .list_workouts()
            .get(self.selected)
            .map(|workout| workout.id())
    }

    fn move_selection(&mut self, offset: isize) {
        if self.store.is_empty() {
            return;
        }
        let new_index = self.selected as isize + offset;
        if (0..self.store.len() as isize).contains(&new_index) {
            self.selected = new_index as usize;
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Workouts => self.draw_workout_list(frame, content_area),
            Screen::Detail(id) => self.draw_workout_detail(frame, content_area, id),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::EditingWorkout(form) => self.draw_workout_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_workout_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("Workouts").borders(Borders::ALL);

        if self.store.is_empty() {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No workouts logged yet. Press + to add one.",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .store
            .list_workouts()
            .iter()
            .map(|workout| ListItem::new(workout.summary()))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_workout_detail(&self, frame: &mut Frame, area: Rect, id: WorkoutId) {
        let Some(workout) = self.store.get(id) else {
            let paragraph = Paragraph::new("Workout not found.")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, area);
            return;
        };

        let block = Block::default()
            .title(workout.date_label())
            .borders(Borders::ALL);
        let paragraph = Paragraph::new(workout_detail_lines(workout))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::EditingWorkout(_)) => &[
                ("[Enter]", " Add Set   "),
                ("[Ctrl+S]", " Save   "),
                ("[Ctrl+U]", " Undo Set   "),
                ("[Esc]", " Cancel"),
            ],
            (_, Mode::ConfirmDelete(_)) => &[("[Y]", " Delete   "), ("[N]", " Keep")],
            (Screen::Workouts, Mode::Normal) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[q]", " Quit"),
            ],
            (Screen::Detail(_), Mode::Normal) => &[
                ("[Esc]", " Back   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, action)| [Span::styled(*key, key_style), Span::raw(*action)])
            .collect();
        Line::from(spans)
    }

    fn draw_workout_form(&self, frame: &mut Frame, area: Rect, form: &WorkoutForm) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let title = if form.editing().is_some() {
            "Edit Workout"
        } else {
            "Add Workout"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(EXERCISE_LABEL, WorkoutField::Exercise),
            form.build_line(REPS_LABEL, WorkoutField::Reps),
            form.build_line(WEIGHT_LABEL, WorkoutField::Weight),
            Line::from(""),
            Line::from(Span::styled(
                "Sets in this workout:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        lines.extend(form.draft_lines());
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add set • Ctrl+S to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (label, row) = match form.active {
            WorkoutField::Exercise => (EXERCISE_LABEL, 0),
            WorkoutField::Reps => (REPS_LABEL, 1),
            WorkoutField::Weight => (WEIGHT_LABEL, 2),
        };
        let prefix = format!("{label}: ").len() as u16;
        frame.set_cursor_position((
            cursor_column(inner.x, prefix, form.value_len(form.active)),
            inner.y.saturating_add(row),
        ));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmWorkoutDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete the workout from {}?", confirm.label)),
            Line::from("Its exercises and sets are removed with it."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Column just past the typed text, clamped to the terminal coordinate range.
fn cursor_column(origin: u16, prefix: u16, value_len: usize) -> u16 {
    let value_len = u16::try_from(value_len).unwrap_or(u16::MAX);
    origin.saturating_add(prefix).saturating_add(value_len)
}

#[cfg(test)]
mod tests {
    use super::cursor_column;

    #[test]
    fn cursor_column_clamps_long_values() {
        assert_eq!(cursor_column(2, 10, 5), 17);
        assert_eq!(cursor_column(2, 10, 70_000), u16::MAX);
        assert_eq!(cursor_column(u16::MAX - 1, 10, 0), u16::MAX);
    }
}
