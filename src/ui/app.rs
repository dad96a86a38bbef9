//! Main TUI application state and logic

use crate::assistant::Assistant;
use crate::catalog::{Discipline, Experiment, Institute, MockDataService};
use crate::config::VlabConfig;
use crate::grader::{GradeReport, Grader, TestInput, STARTER_CODE};
use crate::prefs::PreferenceStore;
use crate::quiz::{Assessment, QuizSession};
use crate::sort::{GeneratorOptions, PracticeSession, StepPlayer, SwapFeedback};
use crate::ui::editor::Editor;
use crate::ui::panes;
use crate::ui::theme::theme_for;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Top-level views, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Demo,
    Practice,
    Exercise,
    Pretest,
    Quiz,
    Posttest,
    Catalog,
    Assistant,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Demo,
        Tab::Practice,
        Tab::Exercise,
        Tab::Pretest,
        Tab::Quiz,
        Tab::Posttest,
        Tab::Catalog,
        Tab::Assistant,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Demo => "Demo",
            Tab::Practice => "Practice",
            Tab::Exercise => "Exercise",
            Tab::Pretest => "Pretest",
            Tab::Quiz => "Quiz",
            Tab::Posttest => "Posttest",
            Tab::Catalog => "Experiments",
            Tab::Assistant => "Assistant",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn assessment(self) -> Option<Assessment> {
        match self {
            Tab::Pretest => Some(Assessment::Pretest),
            Tab::Quiz => Some(Assessment::Quiz),
            Tab::Posttest => Some(Assessment::Posttest),
            _ => None,
        }
    }
}

/// One assessment tab: the session plus the highlighted question
pub struct AssessmentView {
    pub kind: Assessment,
    pub session: QuizSession,
    pub question: usize,
}

impl AssessmentView {
    fn new(kind: Assessment) -> Self {
        AssessmentView {
            kind,
            session: QuizSession::new(kind.bank()),
            question: 0,
        }
    }
}

pub struct CatalogData {
    pub experiments: Vec<Experiment>,
    pub institutes: Vec<Institute>,
    pub disciplines: Vec<Discipline>,
}

impl CatalogData {
    pub fn institute_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.institutes
            .iter()
            .find(|i| i.id == id)
            .map_or(id, |i| i.name.as_str())
    }

    pub fn discipline_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.disciplines
            .iter()
            .find(|d| d.id == id)
            .map_or(id, |d| d.name.as_str())
    }
}

#[derive(Default)]
pub struct CatalogView {
    /// `None` while the first fetch is in flight
    pub data: Option<CatalogData>,
    pub selected: usize,
    /// Typing edits the search query
    pub searching: bool,
    pub detail: Option<Experiment>,
    pending: Option<oneshot::Receiver<CatalogData>>,
    pending_detail: Option<oneshot::Receiver<Option<Experiment>>>,
}

impl CatalogView {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_loading_detail(&self) -> bool {
        self.pending_detail.is_some()
    }
}

/// The main application state
pub struct App {
    pub tab: Tab,
    pub prefs: PreferenceStore,

    pub player: StepPlayer,

    pub practice: PracticeSession,
    /// Left index of the pair selected for swapping
    pub practice_cursor: usize,

    pub editor: Editor,
    pub grader: Grader,
    pub report: Option<GradeReport>,
    pub random_input: bool,

    pub assessments: [AssessmentView; 3],

    pub catalog: CatalogView,
    service: Arc<MockDataService>,

    pub assistant: Assistant,
    pub assistant_input: String,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(
        config: &VlabConfig,
        prefs: PreferenceStore,
        grader: Grader,
        service: Arc<MockDataService>,
    ) -> Self {
        let options = GeneratorOptions {
            early_exit: config.player.early_exit,
        };
        let mut app = App {
            tab: Tab::Demo,
            prefs,
            player: StepPlayer::with_options(
                config.player.demo_array.clone(),
                config.player.interval(),
                options,
            ),
            practice: PracticeSession::new(config.player.practice_array.clone()),
            practice_cursor: 0,
            editor: Editor::new(STARTER_CODE),
            grader,
            report: None,
            random_input: false,
            assessments: [
                AssessmentView::new(Assessment::Pretest),
                AssessmentView::new(Assessment::Quiz),
                AssessmentView::new(Assessment::Posttest),
            ],
            catalog: CatalogView::default(),
            service,
            assistant: Assistant::new(),
            assistant_input: String::new(),
            should_quit: false,
            status_message: String::from("Ready! Press Space to watch bubble sort."),
        };
        app.load_catalog();
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if let Some(step) = self.player.tick(Instant::now()) {
                self.status_message = if self.player.is_finished() {
                    "Playback complete".to_string()
                } else {
                    format!("Playing... {}", step)
                };
            }

            self.poll_catalog();

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        self.save_prefs();
        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let theme = theme_for(self.prefs.theme());
        let size = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
            size,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        panes::render_tab_bar(frame, chunks[0], self.tab, theme);

        match self.tab {
            Tab::Demo => panes::render_demo(frame, chunks[1], &self.player, theme),
            Tab::Practice => panes::render_practice(
                frame,
                chunks[1],
                &self.practice,
                self.practice_cursor,
                theme,
            ),
            Tab::Exercise => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(chunks[1]);
                panes::render_editor(frame, columns[0], &mut self.editor, theme);
                panes::render_report(
                    frame,
                    columns[1],
                    self.report.as_ref(),
                    self.random_input,
                    theme,
                );
            }
            Tab::Pretest | Tab::Quiz | Tab::Posttest => {
                if let Some(view) = self.assessment_view(self.tab) {
                    panes::render_assessment(frame, chunks[1], view, theme);
                }
            }
            Tab::Catalog => {
                panes::render_catalog(frame, chunks[1], &self.catalog, &self.prefs, theme)
            }
            Tab::Assistant => panes::render_assistant(
                frame,
                chunks[1],
                &self.assistant,
                &self.assistant_input,
                theme,
            ),
        }

        panes::render_status_bar(
            frame,
            chunks[2],
            &self.status_message,
            self.key_hints(),
            self.badge(),
            theme,
        );
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        match self.tab {
            Tab::Demo => &[
                ("⎵", "play"),
                ("→", "step"),
                ("r", "reset"),
                ("e", "early exit"),
                ("g", "new array"),
            ],
            Tab::Practice => &[
                ("←/→", "select"),
                ("↵", "swap"),
                ("h", "hint"),
                ("r", "reset"),
                ("g", "new array"),
            ],
            Tab::Exercise => &[
                ("^R", "run tests"),
                ("^T", "random input"),
                ("^N", "starter code"),
            ],
            Tab::Pretest | Tab::Quiz | Tab::Posttest => &[
                ("↑/↓", "question"),
                ("←/→", "answer"),
                ("↵", "submit"),
                ("r", "retry"),
            ],
            Tab::Catalog if self.catalog.searching => &[("↵/esc", "done")],
            Tab::Catalog => &[
                ("/", "search"),
                ("s", "star"),
                ("f", "tab"),
                ("i/d", "filter"),
                ("c", "clear"),
                ("↵", "details"),
            ],
            Tab::Assistant => &[("↵", "ask"), ("esc", "clear")],
        }
    }

    fn badge(&self) -> Option<panes::Badge> {
        match self.tab {
            Tab::Demo if self.player.is_playing() => Some(panes::Badge::Playing),
            Tab::Demo if self.player.is_finished() => Some(panes::Badge::Done),
            Tab::Practice if self.practice.is_complete() => Some(panes::Badge::Done),
            Tab::Exercise => match &self.report {
                Some(report) if report.passed() => Some(panes::Badge::Passed),
                Some(_) => Some(panes::Badge::Failed),
                None => None,
            },
            Tab::Catalog if self.catalog.is_loading() => Some(panes::Badge::Loading),
            _ => None,
        }
    }

    /// Whether plain character keys go to a text field
    fn accepts_text(&self) -> bool {
        match self.tab {
            Tab::Exercise | Tab::Assistant => true,
            Tab::Catalog => self.catalog.searching,
            _ => false,
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global keys
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.switch_tab(self.tab.next());
                return;
            }
            KeyCode::BackTab => {
                self.switch_tab(self.tab.prev());
                return;
            }
            KeyCode::F(n) if (1..=8).contains(&n) => {
                self.switch_tab(Tab::ALL[usize::from(n - 1)]);
                return;
            }
            KeyCode::Char('q') if !self.accepts_text() => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('t') if !self.accepts_text() => {
                let theme = self.prefs.toggle_theme();
                self.status_message = format!("Theme: {:?}", theme);
                self.save_prefs();
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Demo => self.handle_demo_key(key),
            Tab::Practice => self.handle_practice_key(key),
            Tab::Exercise => self.handle_exercise_key(key, ctrl),
            Tab::Pretest | Tab::Quiz | Tab::Posttest => self.handle_assessment_key(key),
            Tab::Catalog => self.handle_catalog_key(key),
            Tab::Assistant => self.handle_assistant_key(key),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        // Autoplay only runs while the demo is visible
        if self.tab == Tab::Demo && tab != Tab::Demo {
            self.player.pause();
        }
        self.tab = tab;
        self.status_message = tab.title().to_string();
    }

    fn handle_demo_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => match self.player.toggle() {
                Ok(true) => self.status_message = "Playing...".to_string(),
                Ok(false) => self.status_message = "Paused".to_string(),
                Err(e) => self.status_message = format!("Cannot play: {}", e),
            },
            KeyCode::Right | KeyCode::Char('n') => match self.player.step_forward() {
                Ok(step) => self.status_message = format!("Stepped: {}", step),
                Err(e) => self.status_message = format!("Cannot step: {}", e),
            },
            KeyCode::Char('r') => {
                self.player.reset();
                self.status_message = "Restarted from the original array".to_string();
            }
            KeyCode::Char('e') => {
                let early_exit = !self.player.options().early_exit;
                self.player.set_options(GeneratorOptions { early_exit });
                self.status_message = format!(
                    "Early exit {} ({} steps)",
                    if early_exit { "on" } else { "off" },
                    self.player.steps().len()
                );
            }
            KeyCode::Char('g') => {
                let values = self.grader.random_input();
                self.status_message = format!("New array: {:?}", values);
                self.player.load(values);
            }
            _ => {}
        }
    }

    fn handle_practice_key(&mut self, key: KeyEvent) {
        let last_pair = self.practice.array().len().saturating_sub(2);
        match key.code {
            KeyCode::Left => self.practice_cursor = self.practice_cursor.saturating_sub(1),
            KeyCode::Right => self.practice_cursor = (self.practice_cursor + 1).min(last_pair),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let (i, j) = (self.practice_cursor, self.practice_cursor + 1);
                self.status_message = match self.practice.attempt_swap(i, j) {
                    Ok(SwapFeedback::Correct { complete: true }) => {
                        "Correct! The array is sorted.".to_string()
                    }
                    Ok(SwapFeedback::Correct { complete: false }) => {
                        format!("Correct! Swapped positions {} and {}", i, j)
                    }
                    Ok(SwapFeedback::Incorrect { .. }) => {
                        "Not quite: that is not the swap bubble sort makes next".to_string()
                    }
                    Err(e) => e.to_string(),
                };
            }
            KeyCode::Char('h') => {
                self.status_message = match self.practice.hint() {
                    Some((i, j)) => {
                        self.practice_cursor = i;
                        format!("Hint: swap positions {} and {}", i, j)
                    }
                    None => "Nothing left to swap".to_string(),
                };
            }
            KeyCode::Char('r') => {
                self.practice.reset();
                self.practice_cursor = 0;
                self.status_message = "Practice restarted".to_string();
            }
            KeyCode::Char('g') => {
                self.practice = PracticeSession::new(self.grader.random_input());
                self.practice_cursor = 0;
                self.status_message = "New practice array".to_string();
            }
            _ => {}
        }
    }

    fn handle_exercise_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl {
            match key.code {
                KeyCode::Char('r') => self.run_grader(),
                KeyCode::Char('t') => {
                    self.random_input = !self.random_input;
                    self.status_message = if self.random_input {
                        "Tests use a fresh random array".to_string()
                    } else {
                        "Tests use the fixed array".to_string()
                    };
                }
                KeyCode::Char('n') => {
                    self.editor.set_text(STARTER_CODE);
                    self.report = None;
                    self.status_message = "Editor reset to the starter code".to_string();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => self.editor.insert_char(c),
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => {}
        }
    }

    fn run_grader(&mut self) {
        let input = if self.random_input {
            TestInput::Random
        } else {
            TestInput::default()
        };
        let report = self.grader.grade(&self.editor.text(), input);
        self.status_message = report.outcome.to_string();
        self.report = Some(report);
    }

    fn assessment_view(&self, tab: Tab) -> Option<&AssessmentView> {
        let kind = tab.assessment()?;
        self.assessments.iter().find(|v| v.kind == kind)
    }

    fn assessment_view_mut(&mut self, tab: Tab) -> Option<&mut AssessmentView> {
        let kind = tab.assessment()?;
        self.assessments.iter_mut().find(|v| v.kind == kind)
    }

    fn handle_assessment_key(&mut self, key: KeyEvent) {
        let Some(view) = self.assessment_view_mut(self.tab) else {
            return;
        };
        let total = view.session.questions().len();
        let mut message = None;

        match key.code {
            KeyCode::Up => view.question = view.question.saturating_sub(1),
            KeyCode::Down => view.question = (view.question + 1).min(total.saturating_sub(1)),
            KeyCode::Left | KeyCode::Right | KeyCode::Char('1'..='9') => {
                let options = view.session.questions()[view.question].options.len();
                let current = view.session.selection(view.question);
                let option = match key.code {
                    KeyCode::Char(c) => c.to_digit(10).map_or(0, |d| d as usize - 1),
                    KeyCode::Left => current.map_or(0, |o| (o + options - 1) % options),
                    _ => current.map_or(0, |o| (o + 1) % options),
                };
                if let Err(e) = view.session.select(view.question, option) {
                    message = Some(e.to_string());
                }
            }
            KeyCode::Enter => {
                message = Some(match view.session.submit() {
                    Ok(score) => format!("{}: you scored {}/{}", view.kind.title(), score, total),
                    Err(e) => e.to_string(),
                });
            }
            KeyCode::Char('r') => {
                view.session.reset();
                view.question = 0;
                message = Some(format!("{} cleared", view.kind.title()));
            }
            _ => {}
        }

        if let Some(message) = message {
            self.status_message = message;
        }
    }

    fn load_catalog(&mut self) {
        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let (experiments, institutes, disciplines) = tokio::join!(
                service.experiments(),
                service.institutes(),
                service.disciplines()
            );
            // The receiver is gone if the app quit first
            let _ = tx.send(CatalogData {
                experiments,
                institutes,
                disciplines,
            });
        });
        self.catalog.pending = Some(rx);
        self.catalog.detail = None;
    }

    fn load_detail(&mut self, id: String) {
        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let _ = tx.send(service.experiment(&id).await);
        });
        self.catalog.pending_detail = Some(rx);
    }

    /// Pick up finished catalogue fetches
    fn poll_catalog(&mut self) {
        if let Some(rx) = self.catalog.pending.as_mut() {
            match rx.try_recv() {
                Ok(data) => {
                    tracing::debug!(experiments = data.experiments.len(), "catalogue loaded");
                    self.catalog.data = Some(data);
                    self.catalog.pending = None;
                    self.catalog.selected = 0;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => self.catalog.pending = None,
            }
        }
        if let Some(rx) = self.catalog.pending_detail.as_mut() {
            match rx.try_recv() {
                Ok(detail) => {
                    self.catalog.detail = detail;
                    self.catalog.pending_detail = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => self.catalog.pending_detail = None,
            }
        }
    }

    /// Ids of the experiments currently listed, in display order
    fn visible_ids(&self) -> Vec<String> {
        panes::visible_experiments(&self.catalog, &self.prefs)
            .into_iter()
            .map(|e| e.id.clone())
            .collect()
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        if self.catalog.searching {
            let mut filters = self.prefs.filters().clone();
            match key.code {
                KeyCode::Char(c) => filters.query.push(c),
                KeyCode::Backspace => {
                    filters.query.pop();
                }
                KeyCode::Enter | KeyCode::Esc => self.catalog.searching = false,
                _ => {}
            }
            self.prefs.set_filters(filters);
            self.catalog.selected = 0;
            return;
        }

        let ids = self.visible_ids();
        let selected_id = ids.get(self.catalog.selected).cloned();

        match key.code {
            KeyCode::Up => self.catalog.selected = self.catalog.selected.saturating_sub(1),
            KeyCode::Down => {
                self.catalog.selected = (self.catalog.selected + 1).min(ids.len().saturating_sub(1))
            }
            KeyCode::Char('/') => {
                self.catalog.searching = true;
                self.status_message = "Type to search experiments".to_string();
            }
            KeyCode::Char('s') => {
                if let Some(id) = selected_id {
                    let starred = self.prefs.toggle_star(&id);
                    self.status_message = format!(
                        "{} {}",
                        if starred { "Starred" } else { "Unstarred" },
                        id
                    );
                }
            }
            KeyCode::Char('f') => {
                let tab = self.prefs.active_tab().next();
                self.prefs.set_active_tab(tab);
                self.catalog.selected = 0;
                self.status_message = format!("Showing: {}", tab);
            }
            KeyCode::Char('i') | KeyCode::Char('d') => {
                let Some(experiment) = selected_id.and_then(|id| {
                    self.catalog
                        .data
                        .as_ref()
                        .and_then(|d| d.experiments.iter().find(|e| e.id == id))
                        .cloned()
                }) else {
                    return;
                };
                let mut filters = self.prefs.filters().clone();
                let on = if key.code == KeyCode::Char('i') {
                    filters.toggle_institute(&experiment.institute)
                } else {
                    filters.toggle_discipline(&experiment.discipline)
                };
                self.status_message = format!(
                    "Filter {} {}",
                    if on { "added:" } else { "removed:" },
                    if key.code == KeyCode::Char('i') {
                        &experiment.institute
                    } else {
                        &experiment.discipline
                    }
                );
                self.prefs.set_filters(filters);
                self.catalog.selected = 0;
            }
            KeyCode::Char('c') => {
                let mut filters = self.prefs.filters().clone();
                filters.clear();
                self.prefs.set_filters(filters);
                self.catalog.selected = 0;
                self.status_message = "Filters cleared".to_string();
            }
            KeyCode::Enter => {
                if let Some(id) = selected_id {
                    self.load_detail(id);
                }
            }
            KeyCode::Char('R') => {
                self.load_catalog();
                self.status_message = "Reloading experiments...".to_string();
            }
            _ => {}
        }
        self.save_prefs();
    }

    fn handle_assistant_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.assistant_input.push(c),
            KeyCode::Backspace => {
                self.assistant_input.pop();
            }
            KeyCode::Esc => self.assistant_input.clear(),
            KeyCode::Enter if !self.assistant_input.trim().is_empty() => {
                let question = std::mem::take(&mut self.assistant_input);
                self.assistant.ask(&question);
            }
            _ => {}
        }
    }

    fn save_prefs(&mut self) {
        if let Err(e) = self.prefs.save_if_dirty() {
            tracing::warn!("{}", e);
            self.status_message = format!("Could not save preferences: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockDelays;
    use crate::grader::GraderConfig;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let prefs = PreferenceStore::load(dir.path().join("prefs.json"));
        let service = Arc::new(MockDataService::new(MockDelays::none(), 6, Some(1)));
        App::new(
            &VlabConfig::default(),
            prefs,
            Grader::with_seed(GraderConfig::default(), 1),
            service,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Assistant.next(), Tab::Demo);
        assert_eq!(Tab::Demo.prev(), Tab::Assistant);
        assert_eq!(Tab::Quiz.index(), 4);
    }

    #[tokio::test]
    async fn test_manual_step_refused_while_playing() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.player.is_playing());
        press(&mut app, KeyCode::Right);
        assert!(app.status_message.starts_with("Cannot step"));
        assert_eq!(app.player.cursor(), 0);

        // Leaving the demo pauses playback
        press(&mut app, KeyCode::Tab);
        assert!(!app.player.is_playing());
    }

    #[tokio::test]
    async fn test_typing_q_in_editor_does_not_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Exercise);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert!(app.editor.text().starts_with('q'));
    }

    #[tokio::test]
    async fn test_theme_toggle_is_saved() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Char('t'));
        assert!(!app.prefs.is_dirty());
        let reloaded = PreferenceStore::load(dir.path().join("prefs.json"));
        assert_eq!(reloaded.theme(), crate::prefs::ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_quiz_submit_blocked_until_complete() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Quiz);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert!(app.status_message.starts_with("answer every question"));
        assert_eq!(app.assessments[1].session.score(), None);
    }
}
