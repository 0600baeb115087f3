mod app;
mod config;
mod drill;
mod event;
mod generator;
mod logging;
mod session;
mod source;
mod speech;
mod ui;

rust_i18n::i18n!("locales", fallback = "en");

use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use app::{App, AppScreen, SettingsField};
use config::Config;
use drill::DrillKind;
use event::{AppEvent, EventHandler};
use generator::{GeminiClient, GenerationJob, Orchestrator};
use source::SourceText;
use ui::components::answer_card::{AnswerCard, AnswerDrill};
use ui::components::drill_list::DrillList;
use ui::components::drill_tabs::DrillTabs;
use ui::components::input_field::InputField;
use ui::components::integration_card::IntegrationCard;
use ui::components::menu::MenuAction;
use ui::components::substitution_card::SubstitutionCard;
use ui::components::toast::ToastView;
use ui::components::word_picker::WordPickerView;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::InputResult;

#[derive(Parser)]
#[command(
    name = "fsidrill",
    version,
    about = "Turn English text into FSI-style pattern drills for Korean learners"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (en, ko)")]
    locale: Option<String>,

    #[arg(long, help = "API key for this run only (not saved)")]
    api_key: Option<String>,

    #[arg(short, long, help = "Generate drills from a .txt or .md file")]
    file: Option<PathBuf>,

    #[arg(long, help = "Generate drills from this text", conflicts_with = "file")]
    text: Option<String>,

    #[arg(short, long, help = "Start with the bundled sample drills", conflicts_with_all = ["file", "text"])]
    sample: bool,

    #[arg(long, help = "Print the drill set as JSON instead of starting the UI")]
    json: bool,
}

impl Cli {
    fn source(&self) -> Result<Option<SourceText>> {
        if let Some(path) = &self.file {
            let source = SourceText::from_file(&app::expand_home(&path.to_string_lossy()))?;
            return Ok(Some(source));
        }
        if let Some(text) = &self.text {
            return Ok(Some(SourceText::inline(text)?));
        }
        Ok(None)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging() {
        if cli.json {
            eprintln!("logging disabled: {e:#}");
        }
    }

    let config_path = Config::config_path();
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read config, using defaults");
        Config::default()
    });
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }
    config.normalize();

    if cli.json {
        return print_json(&cli, config);
    }

    let source = cli.source()?;
    let mut app = App::new(config, Some(config_path));
    if let Some(key) = cli.api_key.clone() {
        app.override_api_key(key);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    if cli.sample {
        app.start_sample();
    } else if let Some(source) = source {
        if let Some(job) = app.request_generation(source) {
            spawn_generation(&app, &events, job);
        }
    }

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Headless mode: generate (or load the sample) and print the set.
fn print_json(cli: &Cli, config: Config) -> Result<()> {
    let set = if cli.sample {
        drill::sample::load_sample().context("bundled sample drills are unavailable")?
    } else {
        let Some(source) = cli.source()? else {
            bail!("--json needs --file, --text or --sample");
        };
        let mut settings = config.generation_settings();
        if let Some(key) = &cli.api_key {
            settings.api_key = key.clone();
        }
        let mut orchestrator = Orchestrator::new(settings);
        orchestrator.generate(&source, &GeminiClient::new())?
    };
    println!("{}", serde_json::to_string_pretty(&set)?);
    Ok(())
}

fn spawn_generation(app: &App, events: &EventHandler, job: GenerationJob) {
    let client = app.client();
    let tx = events.sender();
    thread::spawn(move || {
        let outcome = job.run(client.as_ref());
        let _ = tx.send(AppEvent::Generation(outcome));
    });
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                if let Some(job) = handle_key(app, key) {
                    spawn_generation(app, events, job);
                }
            }
            AppEvent::Paste(text) => handle_paste(app, &text),
            AppEvent::Generation(outcome) => app.finish_generation(outcome),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Option<GenerationJob> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    app.dismiss_toast();

    match app.screen {
        AppScreen::Home => {
            handle_home_key(app, key);
            None
        }
        AppScreen::OpenFile | AppScreen::PasteText => handle_source_key(app, key),
        AppScreen::Generating => None,
        AppScreen::Drills => {
            handle_drills_key(app, key);
            None
        }
        AppScreen::Settings => {
            handle_settings_key(app, key);
            None
        }
    }
}

fn handle_paste(app: &mut App, text: &str) {
    let accepts_paste = match app.screen {
        AppScreen::OpenFile | AppScreen::PasteText | AppScreen::Settings => true,
        AppScreen::Drills => app.is_editing_answer(),
        _ => false,
    };
    if accepts_paste {
        if let Some(input) = app.input.as_mut() {
            input.insert_str(text);
        }
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            app.activate_menu(action);
        }
        KeyCode::Char(ch) => {
            if let Some(action) = MenuAction::from_key(ch) {
                app.activate_menu(action);
            }
        }
        _ => {}
    }
}

fn handle_source_key(app: &mut App, key: KeyEvent) -> Option<GenerationJob> {
    let result = app.input.as_mut()?.handle(key);
    match result {
        InputResult::Continue => {
            app.input_error = None;
            None
        }
        InputResult::Cancel => {
            app.go_home();
            None
        }
        InputResult::Submit => {
            if app.screen == AppScreen::OpenFile {
                app.submit_file_path()
            } else {
                app.submit_pasted_text()
            }
        }
    }
}

fn handle_drills_key(app: &mut App, key: KeyEvent) {
    if let Some(picker) = app.picker.as_mut() {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => picker.prev(),
            KeyCode::Down | KeyCode::Char('j') => picker.next(),
            KeyCode::Enter => app.apply_picker(),
            KeyCode::Esc => app.picker = None,
            _ => {}
        }
        return;
    }

    if app.is_editing_answer() {
        let Some(input) = app.input.as_mut() else {
            return;
        };
        match input.handle(key) {
            InputResult::Submit => {
                app.submit_answer();
            }
            InputResult::Cancel => app.stop_answer_edit(),
            InputResult::Continue => {}
        }
        return;
    }

    let Some(tab) = app.session.as_ref().map(|s| s.tab()) else {
        app.go_home();
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.go_home();
            return;
        }
        KeyCode::Char('n') => {
            app.new_session();
            return;
        }
        KeyCode::Char('p') => {
            app.speak_current();
            return;
        }
        KeyCode::Char(ch @ '1'..='5') => {
            let index = ch as usize - '1' as usize;
            app.select_tab(DrillKind::ALL[index]);
            return;
        }
        _ => {}
    }

    let Some(session) = app.session.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab => session.next_tab(),
        KeyCode::BackTab => session.prev_tab(),
        KeyCode::Down | KeyCode::Char('j') => session.next_drill(),
        KeyCode::Up | KeyCode::Char('k') => session.prev_drill(),
        KeyCode::Char('r') => session.reset_current(),
        _ => match tab {
            DrillKind::Substitution => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    if let Some(sub) = session.current_substitution() {
                        sub.focus_prev();
                    }
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    if let Some(sub) = session.current_substitution() {
                        sub.focus_next();
                    }
                }
                KeyCode::Enter => app.open_picker(),
                _ => {}
            },
            DrillKind::Response | DrillKind::Transformation | DrillKind::Expansion => {
                match key.code {
                    KeyCode::Char('i') | KeyCode::Enter => app.start_answer_edit(),
                    KeyCode::Char('v') => session.toggle_reveal(),
                    _ => {}
                }
            }
            DrillKind::Integration => match key.code {
                KeyCode::Left | KeyCode::Char('h') => session.prev_turn(),
                KeyCode::Right | KeyCode::Char('l') => session.next_turn(),
                _ => {}
            },
        },
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    if let Some(input) = app.input.as_mut() {
        match input.handle(key) {
            InputResult::Submit => app.settings_commit_edit(),
            InputResult::Cancel => app.settings_cancel_edit(),
            InputResult::Continue => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.save_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
        KeyCode::Enter => app.settings_activate(),
        KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::OpenFile => render_source_input(
            frame,
            app,
            t!("open_file.title").to_string(),
            t!("open_file.hint").to_string(),
        ),
        AppScreen::PasteText => render_source_input(
            frame,
            app,
            t!("paste.title").to_string(),
            t!("paste.hint").to_string(),
        ),
        AppScreen::Generating => render_generating(frame, app),
        AppScreen::Drills => render_drills(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }

    if let Some(toast) = &app.toast {
        let view = ToastView::new(toast, app.theme);
        let toast_area = view.area(area);
        frame.render_widget(view, toast_area);
    }
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, hints: &[&str], area: Rect) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " fsidrill ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " FSI Pattern Drills · FSI 패턴 드릴 ",
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(60, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let hint = t!("menu.hint").to_string();
    render_footer(frame, app, &[hint.as_str()], layout[2]);
}

fn render_source_input(frame: &mut ratatui::Frame, app: &App, title: String, hint: String) {
    let area = ui::layout::centered_rect(70, 30, frame.area());
    if let Some(input) = &app.input {
        let field = InputField::new(title, input, hint, app.theme).error(app.input_error.clone());
        frame.render_widget(field, area);
    }
}

fn render_generating(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(50, 30, frame.area());

    let block = Block::bordered()
        .title(format!(" {} ", t!("generating.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let source = app.generating_source.as_deref().unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            t!("generating.body", source = source).to_string(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            t!("generating.wait").to_string(),
            Style::default().fg(colors.text_dim()),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, frame.buffer_mut());
}

fn drill_hints(app: &App, tab: DrillKind) -> Vec<String> {
    if app.picker.is_some() {
        return vec![t!("picker.hint").to_string()];
    }
    if app.is_editing_answer() {
        return vec![t!("drills.hint_editing").to_string()];
    }
    let card_hint = match tab {
        DrillKind::Substitution => t!("drills.hint_substitution"),
        DrillKind::Response | DrillKind::Transformation | DrillKind::Expansion => {
            t!("drills.hint_answer")
        }
        DrillKind::Integration => t!("drills.hint_integration"),
    };
    vec![card_hint.to_string(), t!("drills.hint_nav").to_string()]
}

fn render_drills(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = &app.session else {
        return;
    };
    let area = frame.area();
    let colors = &app.theme.colors;
    let set = session.set();

    let hints = drill_hints(app, session.tab());
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let footer_height = pack_hint_lines(&hint_refs, area.width as usize).len().max(1) as u16;
    let app_layout = AppLayout::new(area, footer_height);

    let header_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", set.title),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", set.title_korean),
                Style::default().fg(colors.korean()),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {}", set.description),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            format!(" {}", set.description_korean),
            Style::default().fg(colors.korean()),
        )),
    ];
    Paragraph::new(header_lines)
        .style(Style::default().bg(colors.header_bg()))
        .render(app_layout.header, frame.buffer_mut());

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(app_layout.main);

    frame.render_widget(DrillTabs::new(set, session.tab(), app.theme), main[0]);

    let index = session.selected();
    let total = set.count(session.tab());
    let position = (index + 1, total);
    let card_area = main[1];

    let rendered = match session.tab() {
        DrillKind::Substitution => set
            .substitution
            .get(index)
            .zip(session.substitutions.get(index))
            .map(|(drill, state)| {
                frame.render_widget(
                    SubstitutionCard::new(drill, state, position, app.theme),
                    card_area,
                );
            }),
        DrillKind::Response => set
            .response
            .get(index)
            .zip(session.responses.get(index))
            .map(|(drill, state)| {
                let card = AnswerCard::new(
                    AnswerDrill::Response(drill),
                    state,
                    app.input.as_ref(),
                    position,
                    app.theme,
                );
                frame.render_widget(card, card_area);
            }),
        DrillKind::Transformation => set
            .transformation
            .get(index)
            .zip(session.transformations.get(index))
            .map(|(drill, state)| {
                let card = AnswerCard::new(
                    AnswerDrill::Transformation(drill),
                    state,
                    app.input.as_ref(),
                    position,
                    app.theme,
                );
                frame.render_widget(card, card_area);
            }),
        DrillKind::Expansion => set
            .expansion
            .get(index)
            .zip(session.expansions.get(index))
            .map(|(drill, state)| {
                let card = AnswerCard::new(
                    AnswerDrill::Expansion(drill),
                    state,
                    app.input.as_ref(),
                    position,
                    app.theme,
                );
                frame.render_widget(card, card_area);
            }),
        DrillKind::Integration => set.integration.get(index).map(|drill| {
            let turn = session.current_turn().unwrap_or(0);
            frame.render_widget(
                IntegrationCard::new(drill, turn, position, app.theme),
                card_area,
            );
        }),
    };

    if rendered.is_none() {
        let empty = Paragraph::new(Line::from(Span::styled(
            t!("drills.empty").to_string(),
            Style::default().fg(colors.text_dim()),
        )))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(colors.border())));
        frame.render_widget(empty, card_area);
    }

    if let Some(sidebar) = app_layout.sidebar {
        frame.render_widget(DrillList::new(session, app.theme), sidebar);
    }

    if let Some(picker) = &app.picker {
        let view = WordPickerView::new(picker, app.theme);
        let height = view.height().min(card_area.height);
        let width = card_area.width.clamp(20, 40).min(card_area.width);
        let popup = Rect::new(
            card_area.x + (card_area.width - width) / 2,
            card_area.y + (card_area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(view, popup);
    }

    render_footer(frame, app, &hint_refs, app_layout.footer);
}

fn settings_value(app: &App, field: SettingsField) -> String {
    match field {
        SettingsField::ApiKey => {
            if app.config.has_api_key() {
                "•".repeat(app.config.api_key.chars().count().min(24))
            } else {
                t!("settings.not_set").to_string()
            }
        }
        SettingsField::Model => app.config.model.clone(),
        SettingsField::Theme => app.config.theme.clone(),
        SettingsField::Locale => match app.config.locale.as_str() {
            "ko" => "한국어 (ko)".to_string(),
            _ => "English (en)".to_string(),
        },
        SettingsField::Speech => {
            if app.config.speech_enabled {
                t!("settings.enabled").to_string()
            } else {
                t!("settings.disabled").to_string()
            }
        }
    }
}

fn settings_label(field: SettingsField) -> String {
    match field {
        SettingsField::ApiKey => t!("settings.api_key"),
        SettingsField::Model => t!("settings.model"),
        SettingsField::Theme => t!("settings.theme"),
        SettingsField::Locale => t!("settings.locale"),
        SettingsField::Speech => t!("settings.speech"),
    }
    .to_string()
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields = SettingsField::ALL;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
        let value_style = Style::default().fg(if is_selected {
            colors.interactive()
        } else {
            colors.text_dim()
        });

        let value_line = match (&app.input, is_selected) {
            (Some(input), true) => {
                let mut line = ui::components::input_field::input_line(input, app.theme);
                line.spans.insert(0, Span::raw("    "));
                line
            }
            _ if field.is_text() => Line::from(Span::styled(
                format!("    {}", settings_value(app, *field)),
                value_style,
            )),
            _ => Line::from(Span::styled(
                format!("    < {} >", settings_value(app, *field)),
                value_style,
            )),
        };

        let lines = vec![
            Line::from(Span::styled(
                format!("{indicator}{}:", settings_label(*field)),
                label_style,
            )),
            value_line,
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let hint = if app.input.is_some() {
        t!("settings.hint_editing")
    } else {
        t!("settings.hint")
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        format!("  {hint}"),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
