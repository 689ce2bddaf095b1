mod ui;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use mathdrill::{
    answers::Verdict,
    config::{Config, ConfigStore, FileConfigStore},
    curriculum::{Curriculum, Lesson},
    generator::{DrillGenerator, QuizSource},
    history::{Attempt, HistoryDb},
    progress::{FileProgressStore, Progress, ProgressStore},
    quiz::{QuizData, QuizMode},
    runtime::{AppEvent, CrosstermEventSource},
    session::{Identity, Phase, QuizSession},
    status::{self, LessonStatus},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

/// terminal math assessment tui with timed exams, free practice, and gated lesson progression
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal math assessment TUI: timed exams with auto-submit, free practice with instant feedback, and a gated lesson chain unlocked by your best scores."
)]
pub struct Cli {
    /// start in practice mode: untimed, ungated, nothing recorded
    #[clap(short, long)]
    practice: bool,

    /// assessment countdown in seconds
    #[clap(short = 'd', long)]
    duration_secs: Option<u32>,

    /// fixed seed for deterministic paper generation
    #[clap(long)]
    seed: Option<u64>,

    /// disable instant feedback in practice mode
    #[clap(long)]
    no_instant_feedback: bool,

    /// number of multiple-choice questions in part 1
    #[clap(long)]
    choice_questions: Option<usize>,

    /// number of true/false groups in part 2
    #[clap(long)]
    statement_groups: Option<usize>,

    /// number of short-answer questions in part 3
    #[clap(long)]
    fill_questions: Option<usize>,
}

impl Cli {
    /// Flags override whatever the config file carries.
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(secs) = self.duration_secs {
            cfg.duration_secs = secs;
        }
        if self.no_instant_feedback {
            cfg.instant_feedback = false;
        }
        if let Some(n) = self.choice_questions {
            cfg.choice_questions = n;
        }
        if let Some(n) = self.statement_groups {
            cfg.statement_groups = n;
        }
        if let Some(n) = self.fill_questions {
            cfg.fill_questions = n;
        }
    }

    fn mode(&self) -> QuizMode {
        if self.practice {
            QuizMode::Practice
        } else {
            QuizMode::Assessment
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Intro,
    Quiz,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub selected: usize,
    pub scroll_offset: usize,
    /// Recoverable conditions (generation failure, locked lesson) shown on
    /// the dashboard until the next action.
    pub notice: Option<String>,
}

/// The identity form filled in before a session starts.
#[derive(Debug, Default)]
pub struct IntroForm {
    pub name: String,
    pub class_name: String,
    pub school: String,
    pub focus: usize,
}

impl IntroForm {
    pub const FIELDS: usize = 3;

    pub fn identity(&self) -> Identity {
        Identity::new(
            self.name.trim(),
            self.class_name.trim(),
            self.school.trim(),
        )
    }

    pub fn field(&self, idx: usize) -> &str {
        match idx {
            0 => &self.name,
            1 => &self.class_name,
            _ => &self.school,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.class_name,
            _ => &mut self.school,
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS;
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS;
    }
}

/// One addressable item on the quiz screen, in paper order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Choice(u32),
    Statement { group: u32, statement: u32 },
    Fill(u32),
}

/// Flattened cursor order: part 1, then every statement of part 2, then
/// part 3.
pub fn item_list(quiz: &QuizData) -> Vec<Item> {
    let mut items = Vec::new();
    for q in &quiz.part1 {
        items.push(Item::Choice(q.id));
    }
    for g in &quiz.part2 {
        for s in &g.statements {
            items.push(Item::Statement {
                group: g.id,
                statement: s.id,
            });
        }
    }
    for q in &quiz.part3 {
        items.push(Item::Fill(q.id));
    }
    items
}

#[derive(Debug, Default)]
pub struct QuizView {
    pub cursor: usize,
    pub scroll_offset: usize,
    pub confirm_open: bool,
}

pub struct App {
    pub config: Config,
    pub mode: QuizMode,
    pub seed: Option<u64>,
    pub curriculum: Curriculum,
    pub progress: Progress,
    pub screen: Screen,
    pub dashboard: DashboardState,
    pub intro: IntroForm,
    pub quiz_view: QuizView,
    pub session: Option<QuizSession>,
    pub current_lesson: Option<Lesson>,
    pub history: Option<HistoryDb>,
    store: Box<dyn ProgressStore>,
}

impl App {
    pub fn new(
        config: Config,
        mode: QuizMode,
        seed: Option<u64>,
        store: Box<dyn ProgressStore>,
        history: Option<HistoryDb>,
    ) -> Self {
        let progress = store.load();
        Self {
            config,
            mode,
            seed,
            curriculum: Curriculum::bundled(),
            progress,
            screen: Screen::Dashboard,
            dashboard: DashboardState::default(),
            intro: IntroForm::default(),
            quiz_view: QuizView::default(),
            session: None,
            current_lesson: None,
            history,
            store,
        }
    }

    pub fn selected_lesson(&self) -> Option<&Lesson> {
        self.curriculum.flattened().nth(self.dashboard.selected)
    }

    pub fn status_of(&self, lesson_id: &str) -> LessonStatus {
        status::resolve(lesson_id, self.mode, &self.progress, &self.curriculum)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        match self.screen {
            Screen::Dashboard => self.dashboard_key(key.code),
            Screen::Intro => self.intro_key(key.code),
            Screen::Quiz => self.quiz_key(key.code),
            Screen::Results => self.results_key(key.code),
        }
    }

    /// Clock advance from the event loop. Returns whether the screen needs
    /// a redraw: always after an auto-submit, every second while a timed
    /// session is on the quiz screen, and never otherwise.
    pub fn on_tick(&mut self) -> bool {
        let Some(session) = &mut self.session else {
            return false;
        };
        if session.on_tick().is_some() {
            self.screen = Screen::Results;
            return true;
        }
        self.screen == Screen::Quiz
            && session.phase() == Phase::Running
            && session.remaining_secs().is_some()
    }

    fn dashboard_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Up => {
                self.dashboard.selected = self.dashboard.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let last = self.curriculum.lesson_count().saturating_sub(1);
                if self.dashboard.selected < last {
                    self.dashboard.selected += 1;
                }
            }
            KeyCode::Char('m') => {
                self.mode = match self.mode {
                    QuizMode::Assessment => QuizMode::Practice,
                    QuizMode::Practice => QuizMode::Assessment,
                };
                self.dashboard.notice = None;
            }
            KeyCode::Enter => self.start_selected_lesson(),
            _ => {}
        }
        Control::Continue
    }

    /// Builds a paper and a session for the selected lesson. Any failure
    /// leaves lesson status unchanged and surfaces as a dashboard notice.
    fn start_selected_lesson(&mut self) {
        self.dashboard.notice = None;
        let Some(lesson) = self.selected_lesson().cloned() else {
            return;
        };
        if !self.status_of(&lesson.id).is_startable() {
            self.dashboard.notice = Some(format!(
                "{} is locked: score {:.1} or better on the previous lesson first",
                lesson.id,
                status::PASS_MARK
            ));
            return;
        }

        let generator = match self.seed {
            Some(seed) => DrillGenerator::with_seed(self.config.paper_shape(), seed),
            None => DrillGenerator::new(self.config.paper_shape()),
        };
        let quiz = match generator.generate(&lesson.title, &self.config.course_label) {
            Ok(quiz) => quiz,
            Err(e) => {
                self.dashboard.notice = Some(format!("could not prepare a paper ({e}), try again"));
                return;
            }
        };

        match QuizSession::new(
            quiz,
            self.mode,
            self.config.duration_secs,
            self.config.instant_feedback,
        ) {
            Ok(session) => {
                self.session = Some(session);
                self.current_lesson = Some(lesson);
                self.intro = IntroForm::default();
                self.quiz_view = QuizView::default();
                self.screen = Screen::Intro;
            }
            Err(e) => {
                self.dashboard.notice = Some(format!("rejected paper ({e}), try again"));
            }
        }
    }

    fn intro_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Esc => self.abandon_session(),
            KeyCode::Tab | KeyCode::Down => self.intro.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.intro.focus_prev(),
            KeyCode::Backspace => {
                self.intro.field_mut().pop();
            }
            KeyCode::Enter => {
                if self.intro.identity().is_complete() {
                    self.begin_session();
                } else {
                    self.intro.focus_next();
                }
            }
            KeyCode::Char(c) => self.intro.field_mut().push(c),
            _ => {}
        }
        Control::Continue
    }

    fn begin_session(&mut self) {
        let identity = self.intro.identity();
        if let Some(session) = &mut self.session {
            if session.begin(identity).is_ok() {
                self.screen = Screen::Quiz;
            }
        }
    }

    fn quiz_key(&mut self, code: KeyCode) -> Control {
        let Some(session) = &mut self.session else {
            self.screen = Screen::Dashboard;
            return Control::Continue;
        };

        if self.quiz_view.confirm_open {
            match code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.quiz_view.confirm_open = false;
                    if let Ok(Some(_)) = session.submit(true) {
                        self.screen = Screen::Results;
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    // Declined: the session keeps running.
                    let _ = session.submit(false);
                    self.quiz_view.confirm_open = false;
                }
                _ => {}
            }
            return Control::Continue;
        }

        let count = item_list(session.quiz()).len();

        if session.phase() == Phase::Submitted {
            // Review: navigation only.
            match code {
                KeyCode::Esc | KeyCode::Enter => self.screen = Screen::Results,
                KeyCode::Up => self.quiz_view.cursor = self.quiz_view.cursor.saturating_sub(1),
                KeyCode::Down => {
                    self.quiz_view.cursor = (self.quiz_view.cursor + 1).min(count.saturating_sub(1))
                }
                _ => {}
            }
            return Control::Continue;
        }

        match code {
            KeyCode::Esc => self.quiz_view.confirm_open = true,
            KeyCode::Up => self.quiz_view.cursor = self.quiz_view.cursor.saturating_sub(1),
            KeyCode::Down => {
                self.quiz_view.cursor = (self.quiz_view.cursor + 1).min(count.saturating_sub(1))
            }
            _ => {
                let item = item_list(session.quiz())
                    .get(self.quiz_view.cursor)
                    .copied();
                if let Some(item) = item {
                    Self::answer_key(session, item, code);
                }
            }
        }
        Control::Continue
    }

    /// Routes one key to the current item's setter. Rejected mutations
    /// (locked items, terminal phase) leave the sheet untouched, so the
    /// errors are dropped here rather than surfaced.
    fn answer_key(session: &mut QuizSession, item: Item, code: KeyCode) {
        match item {
            Item::Choice(id) => {
                if let KeyCode::Char(c @ '1'..='4') = code {
                    let _ = session.select_choice(id, c as usize - '1' as usize);
                }
            }
            Item::Statement { group, statement } => match code {
                KeyCode::Char('t') => {
                    let _ = session.judge_statement(group, statement, Verdict::True);
                }
                KeyCode::Char('f') => {
                    let _ = session.judge_statement(group, statement, Verdict::False);
                }
                _ => {}
            },
            Item::Fill(id) => match code {
                KeyCode::Char('c') => {
                    let _ = session.reveal_answer(id);
                }
                KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '-' | '.' | ',' | '/') => {
                    let mut text = session.sheet().fill(id).unwrap_or_default().to_string();
                    text.push(c);
                    let _ = session.fill_answer(id, text);
                }
                KeyCode::Backspace => {
                    let mut text = session.sheet().fill(id).unwrap_or_default().to_string();
                    text.pop();
                    let _ = session.fill_answer(id, text);
                }
                _ => {}
            },
        }
    }

    fn results_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Char('r') => {
                self.quiz_view.cursor = 0;
                self.quiz_view.scroll_offset = 0;
                self.screen = Screen::Quiz;
            }
            KeyCode::Enter | KeyCode::Esc => self.finish_session(),
            _ => {}
        }
        Control::Continue
    }

    /// Leaving the results screen hands the finished score to the stores
    /// and discards the session. Practice scores are ephemeral.
    fn finish_session(&mut self) {
        if let (Some(session), Some(lesson)) = (&self.session, &self.current_lesson) {
            if session.mode() == QuizMode::Assessment {
                if let Some(score) = session.final_score() {
                    if self.progress.record(&lesson.id, score.value()) {
                        if let Err(e) = self.store.save(&self.progress) {
                            log::warn!("progress not saved: {e}");
                        }
                    }
                    if let Some(history) = &self.history {
                        let attempt = Attempt {
                            lesson_id: lesson.id.clone(),
                            mode: session.mode().to_string(),
                            score: score.value(),
                            elapsed_secs: session.elapsed_secs(),
                            timestamp: Local::now(),
                        };
                        if let Err(e) = history.record_attempt(&attempt) {
                            log::warn!("attempt not recorded: {e}");
                        }
                    }
                }
            }
        }
        self.abandon_session();
    }

    fn abandon_session(&mut self) {
        self.session = None;
        self.current_lesson = None;
        self.screen = Screen::Dashboard;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply_to(&mut config);

    let history = match HistoryDb::new() {
        Ok(db) => Some(db),
        Err(e) => {
            log::warn!("attempt history unavailable: {e}");
            None
        }
    };

    let mut app = App::new(
        config,
        cli.mode(),
        cli.seed,
        Box::new(FileProgressStore::new()),
        history,
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();

    terminal.draw(|f| ui::draw(app, f))?;
    loop {
        match events.recv()? {
            AppEvent::Tick => {
                if app.on_tick() {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            AppEvent::Key(key) => match app.handle_key(key) {
                Control::Quit => break,
                Control::Continue => {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdrill::progress::FileProgressStore;
    use tempfile::{tempdir, TempDir};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(mode: QuizMode) -> (App, TempDir) {
        let dir = tempdir().unwrap();
        let store = FileProgressStore::with_path(dir.path().join("progress.json"));
        let mut config = Config::default();
        // Small papers keep the flow tests fast to drive by key.
        config.choice_questions = 2;
        config.statement_groups = 1;
        config.fill_questions = 1;
        config.duration_secs = 60;
        let app = App::new(config, mode, Some(7), Box::new(store), None);
        (app, dir)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn fill_intro_and_begin(app: &mut App) {
        type_str(app, "An");
        app.handle_key(key(KeyCode::Tab));
        type_str(app, "7A");
        app.handle_key(key(KeyCode::Tab));
        type_str(app, "Riverside");
        app.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn cli_default_values() {
        let cli = Cli::parse_from(["mathdrill"]);
        assert!(!cli.practice);
        assert_eq!(cli.duration_secs, None);
        assert_eq!(cli.seed, None);
        assert!(!cli.no_instant_feedback);
        assert_eq!(cli.mode(), QuizMode::Assessment);
    }

    #[test]
    fn cli_practice_flag_selects_mode() {
        let cli = Cli::parse_from(["mathdrill", "--practice"]);
        assert_eq!(cli.mode(), QuizMode::Practice);
        let cli = Cli::parse_from(["mathdrill", "-p"]);
        assert_eq!(cli.mode(), QuizMode::Practice);
    }

    #[test]
    fn cli_flags_win_over_file_config() {
        let cli = Cli::parse_from([
            "mathdrill",
            "-d",
            "900",
            "--no-instant-feedback",
            "--choice-questions",
            "6",
            "--statement-groups",
            "2",
            "--fill-questions",
            "3",
        ]);
        let mut cfg = Config::default();
        cli.apply_to(&mut cfg);
        assert_eq!(cfg.duration_secs, 900);
        assert!(!cfg.instant_feedback);
        assert_eq!(cfg.choice_questions, 6);
        assert_eq!(cfg.statement_groups, 2);
        assert_eq!(cfg.fill_questions, 3);
    }

    #[test]
    fn cli_untouched_flags_keep_file_config() {
        let cli = Cli::parse_from(["mathdrill"]);
        let mut cfg = Config::default();
        cfg.duration_secs = 123;
        cli.apply_to(&mut cfg);
        assert_eq!(cfg.duration_secs, 123);
        assert!(cfg.instant_feedback);
    }

    #[test]
    fn intro_form_cycles_focus_and_builds_identity() {
        let mut form = IntroForm::default();
        assert_eq!(form.focus, 0);
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, 2);
        form.focus_next();
        assert_eq!(form.focus, 0);
        form.focus_prev();
        assert_eq!(form.focus, 2);

        form.name = " An ".into();
        form.class_name = "7A".into();
        form.school = "Riverside".into();
        let identity = form.identity();
        assert_eq!(identity.name, "An");
        assert!(identity.is_complete());
    }

    #[test]
    fn item_list_follows_paper_order() {
        let quiz = DrillGenerator::with_seed(
            mathdrill::generator::PaperShape {
                choice_questions: 2,
                statement_groups: 1,
                fill_questions: 1,
            },
            1,
        )
        .generate("Integers", "Grade 7")
        .unwrap();

        let items = item_list(&quiz);
        assert_eq!(items.len(), 2 + 4 + 1);
        assert_eq!(items[0], Item::Choice(1));
        assert_eq!(items[1], Item::Choice(2));
        assert_eq!(
            items[2],
            Item::Statement {
                group: 1,
                statement: 1
            }
        );
        assert_eq!(items[6], Item::Fill(1));
    }

    #[test]
    fn app_starts_on_the_dashboard() {
        let (app, _dir) = test_app(QuizMode::Assessment);
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.session.is_none());
        assert!(app.progress.is_empty());
    }

    #[test]
    fn dashboard_selection_stays_in_bounds() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.dashboard.selected, 0);
        for _ in 0..500 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.dashboard.selected, app.curriculum.lesson_count() - 1);
    }

    #[test]
    fn mode_toggle_from_the_dashboard() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.mode, QuizMode::Practice);
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.mode, QuizMode::Assessment);
    }

    #[test]
    fn starting_an_unlocked_lesson_opens_the_intro_form() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Intro);
        assert!(app.session.is_some());
        assert_eq!(app.current_lesson.as_ref().unwrap().id, "l1.1");
    }

    #[test]
    fn starting_a_locked_lesson_is_refused_with_a_notice() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Down)); // l1.2, gated on l1.1
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.session.is_none());
        assert!(app.dashboard.notice.as_ref().unwrap().contains("locked"));
    }

    #[test]
    fn practice_mode_starts_any_lesson() {
        let (mut app, _dir) = test_app(QuizMode::Practice);
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Down));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Intro);
    }

    #[test]
    fn incomplete_identity_stays_on_the_form() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Enter));
        type_str(&mut app, "An");
        app.handle_key(key(KeyCode::Enter)); // class missing: advances focus
        assert_eq!(app.screen, Screen::Intro);
        assert_eq!(app.intro.focus, 1);
    }

    #[test]
    fn escape_from_the_intro_discards_the_session() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.session.is_none());
        assert!(app.current_lesson.is_none());
    }

    #[test]
    fn full_assessment_flow_records_the_best_score() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);
        assert_eq!(app.screen, Screen::Quiz);

        // Answer the first multiple-choice question correctly by key.
        let correct = {
            let quiz = app.session.as_ref().unwrap().quiz();
            quiz.part1[0].correct_answer_index
        };
        app.handle_key(key(KeyCode::Char((b'1' + correct as u8) as char)));

        // Decline the confirmation once, then submit for real.
        app.handle_key(key(KeyCode::Esc));
        assert!(app.quiz_view.confirm_open);
        app.handle_key(key(KeyCode::Char('n')));
        assert!(!app.quiz_view.confirm_open);
        assert_eq!(app.screen, Screen::Quiz);

        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.screen, Screen::Results);

        let score = app.session.as_ref().unwrap().final_score().unwrap();
        assert_eq!(score.value(), 0.25);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.session.is_none());
        assert_eq!(app.progress.best("l1.1"), Some(0.25));
    }

    #[test]
    fn practice_scores_are_never_recorded() {
        let (mut app, _dir) = test_app(QuizMode::Practice);
        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.screen, Screen::Results);
        app.handle_key(key(KeyCode::Enter));
        assert!(app.progress.is_empty());
    }

    #[test]
    fn review_walks_back_into_the_submitted_paper() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.screen, Screen::Results);

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.screen, Screen::Quiz);
        // Mutation keys are dead in review.
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.session.as_ref().unwrap().sheet().choice(1), None);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.quiz_view.cursor, 1);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Results);
    }

    #[test]
    fn fill_typing_builds_and_edits_the_answer() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);

        // Cursor to the single fill item: 2 choices + 4 statements before it.
        for _ in 0..6 {
            app.handle_key(key(KeyCode::Down));
        }
        type_str(&mut app, "-2.5");
        assert_eq!(app.session.as_ref().unwrap().sheet().fill(1), Some("-2.5"));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.session.as_ref().unwrap().sheet().fill(1), Some("-2."));
        // Letters other than commands are ignored on fill items.
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.session.as_ref().unwrap().sheet().fill(1), Some("-2."));
    }

    #[test]
    fn statement_keys_set_verdicts() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down)); // first statement of group 1
        app.handle_key(key(KeyCode::Char('t')));
        let sheet_verdict = app
            .session
            .as_ref()
            .unwrap()
            .sheet()
            .verdict(mathdrill::answers::StatementKey::new(1, 1));
        assert_eq!(sheet_verdict, Some(Verdict::True));
    }

    #[test]
    fn expiry_auto_submits_and_lands_on_results() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        app.config.duration_secs = 2;
        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);

        assert!(app.on_tick()); // countdown redraw
        assert!(app.on_tick()); // expiry
        assert_eq!(app.screen, Screen::Results);
        assert_eq!(app.session.as_ref().unwrap().phase(), Phase::Submitted);

        // Ticks after submission neither redraw nor mutate.
        assert!(!app.on_tick());
        assert_eq!(app.screen, Screen::Results);
    }

    #[test]
    fn ticks_are_inert_in_practice_mode() {
        let (mut app, _dir) = test_app(QuizMode::Practice);
        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);
        assert!(!app.on_tick());
        assert_eq!(app.session.as_ref().unwrap().phase(), Phase::Running);
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let (mut app, _dir) = test_app(QuizMode::Assessment);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), Control::Quit);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.handle_key(ctrl_c), Control::Quit);
    }

    #[test]
    fn ui_renders_every_screen_without_panicking() {
        use ratatui::backend::TestBackend;

        let (mut app, _dir) = test_app(QuizMode::Assessment);
        let backend = TestBackend::new(100, 32);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("l1.1"));

        app.handle_key(key(KeyCode::Enter));
        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();

        fill_intro_and_begin(&mut app);
        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();

        app.handle_key(key(KeyCode::Esc)); // confirm modal
        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();
        app.handle_key(key(KeyCode::Char('y')));
        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();

        app.handle_key(key(KeyCode::Char('r'))); // review
        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();
    }

    #[test]
    fn ui_renders_on_a_tiny_terminal() {
        use ratatui::backend::TestBackend;

        let (mut app, _dir) = test_app(QuizMode::Practice);
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();

        app.handle_key(key(KeyCode::Enter));
        fill_intro_and_begin(&mut app);
        terminal.draw(|f| ui::draw(&mut app, f)).unwrap();
    }
}
