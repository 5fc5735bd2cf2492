use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use chalk::app::{App, AppScreen};
use chalk::config::Config;
use chalk::drawing::{PointerEvent, PointerKind};
use chalk::event::{AppEvent, EventHandler};
use chalk::gateway::{GatewayClient, HttpBackend};
use chalk::logging;
use chalk::practice::{PracticeMode, SequenceKind};
use chalk::speech::Announcer;
use chalk::store::session_store::SessionStore;
use chalk::ui;
use chalk::ui::components::canvas_view::CanvasView;
use chalk::ui::components::feedback_panel::FeedbackPanel;
use chalk::ui::components::info_page::{self, InfoPage};
use chalk::ui::components::menu::{Menu, MenuItem};
use chalk::ui::layout::{AppLayout, PracticeLayout};
use chalk::ui::theme::Theme;

type ChalkApp = App<GatewayClient, Announcer>;

const PRACTICE_KEYS: &str =
    " [Left/Right] Move  [Enter] Check  [x] Clear  [c] Coach  [f/r] Repeat  [Esc] Modes ";

#[derive(Parser)]
#[command(name = "chalk", version, about = "Handwriting practice with spoken feedback")]
struct Cli {
    #[arg(long, help = "Backend base URL (overrides config and CHALK_API_URL)")]
    api_url: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Disable spoken feedback")]
    mute: bool,

    #[arg(short, long, help = "Log debug output")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = logging::init(cli.verbose);

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("using default configuration: {e}");
        Config::default()
    });
    if let Some(ref url) = cli.api_url {
        config.override_api_url(url);
    }
    if cli.mute {
        config.speech_enabled = false;
    }
    let theme_name = cli.theme.clone().unwrap_or_else(|| config.theme.clone());
    let theme = Theme::load(&theme_name).unwrap_or_else(|| {
        log::warn!(
            "unknown theme {theme_name}, falling back to default (available: {})",
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let store = match SessionStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("session storage unavailable: {e}");
            None
        }
    };

    let events = EventHandler::new(Duration::from_millis(100));
    let backend = HttpBackend::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    log::info!("backend at {}", config.api_url);
    let gateway = GatewayClient::new(Arc::new(backend), events.sender());
    let speaker = Announcer::from_config(&config);
    if !speaker.is_available() {
        config.speech_enabled = false;
    }

    let mut app = App::new(config, theme, store, gateway, speaker);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    if let Err(e) = log_file {
        eprintln!("Logging was disabled: {e}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChalkApp,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Gateway(reply) => app.handle_reply(reply),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut ChalkApp, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.dismiss_alert() {
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::About | AppScreen::Contact => handle_info_key(app, key),
    }
}

fn handle_home_key(app: &mut ChalkApp, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => app.proceed_from_home(),
        KeyCode::Char('p') => app.start_practice(),
        KeyCode::Char('a') => app.go_to_about(),
        KeyCode::Char('c') => app.go_to_contact(),
        _ => {}
    }
}

fn handle_info_key(app: &mut ChalkApp, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => app.go_home(),
        _ => {}
    }
}

fn handle_practice_key(app: &mut ChalkApp, key: KeyEvent) {
    let Some(ref mut practice) = app.practice else {
        app.go_home();
        return;
    };

    if !practice.is_practicing() {
        match key.code {
            KeyCode::Char('1') | KeyCode::Char('l') => app.choose_mode(SequenceKind::Letters),
            KeyCode::Char('2') | KeyCode::Char('n') => app.choose_mode(SequenceKind::Numbers),
            KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Right | KeyCode::Char('l') => practice.advance(),
        KeyCode::Left | KeyCode::Char('h') => practice.retreat(),
        KeyCode::Char('x') | KeyCode::Backspace | KeyCode::Delete => app.clear_canvas(),
        KeyCode::Enter | KeyCode::Char(' ') => app.check_drawing(),
        KeyCode::Char('?') | KeyCode::Char('c') => app.request_hint(),
        KeyCode::Char('f') => practice.replay_last_feedback(),
        KeyCode::Char('r') => practice.replay_last_hint(),
        KeyCode::Esc => practice.exit_to_selection(),
        _ => {}
    }
}

fn handle_mouse(app: &mut ChalkApp, mouse: MouseEvent) {
    if app.screen != AppScreen::Practice || app.alert.is_some() {
        return;
    }
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
        MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
        MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
        _ => return,
    };
    app.handle_pointer(PointerEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
    });
}

fn render(frame: &mut ratatui::Frame, app: &ChalkApp) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::About => render_info(frame, app, "About", info_page::ABOUT),
        AppScreen::Contact => render_info(frame, app, "Contact", info_page::CONTACT),
    }

    if let Some(ref alert) = app.alert {
        render_alert(frame, app, alert);
    }
}

fn render_header(
    frame: &mut ratatui::Frame,
    app: &ChalkApp,
    area: ratatui::layout::Rect,
    info: &str,
) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " chalk ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(
    frame: &mut ratatui::Frame,
    app: &ChalkApp,
    area: ratatui::layout::Rect,
    text: &str,
) {
    let footer = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.colors.muted()),
    )));
    frame.render_widget(footer, area);
}

fn render_home(frame: &mut ratatui::Frame, app: &ChalkApp) {
    let layout = AppLayout::new(frame.area());
    let speech = if app.config.speech_enabled { "" } else { " | muted" };
    render_header(
        frame,
        app,
        layout.header,
        &format!("| {}{speech}", app.config.api_url),
    );

    let items = app
        .language_options()
        .into_iter()
        .map(|l| MenuItem::new("", l, ""))
        .collect();
    let message = if app.home.loading {
        Some("Loading...")
    } else {
        app.home.error.as_deref()
    };
    let menu = Menu::new("Chalk", "Choose a language to practice", items, app.theme)
        .selected(app.home.selected)
        .message(message);
    let menu_area = ui::layout::centered_rect(40, 70, layout.main);
    frame.render_widget(&menu, menu_area);

    render_footer(
        frame,
        app,
        layout.footer,
        " [Up/Down] Choose  [Enter] Start  [p] Resume  [a] About  [c] Contact  [q] Quit ",
    );
}

fn render_info(
    frame: &mut ratatui::Frame,
    app: &ChalkApp,
    title: &str,
    sections: &[info_page::InfoSection],
) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &format!("| {title}"));
    let page = InfoPage {
        title,
        sections,
        theme: app.theme,
    };
    frame.render_widget(page, ui::layout::centered_rect(60, 80, layout.main));
    render_footer(frame, app, layout.footer, " [Esc] Back to Home ");
}

fn render_practice(frame: &mut ratatui::Frame, app: &ChalkApp) {
    let Some(ref practice) = app.practice else {
        return;
    };
    let layout = AppLayout::new(frame.area());
    render_header(
        frame,
        app,
        layout.header,
        &format!("| {} | {}", practice.language(), practice.mode().title()),
    );

    if practice.mode() == PracticeMode::SelectingMode {
        app.canvas.set(None);
        let items = vec![
            MenuItem::new(
                "1",
                "Letters",
                practice.letter_label().unwrap_or_default(),
            ),
            MenuItem::new(
                "2",
                "Numbers",
                practice.digit_label().unwrap_or_default(),
            ),
        ];
        let menu = Menu::new(
            practice.language(),
            "What would you like to practice?",
            items,
            app.theme,
        );
        frame.render_widget(&menu, ui::layout::centered_rect(40, 50, layout.main));
        render_footer(
            frame,
            app,
            layout.footer,
            " [1] Letters  [2] Numbers  [Esc] Change language ",
        );
        return;
    }

    let areas = PracticeLayout::new(layout.main);
    let canvas_block = Block::bordered()
        .title(" Draw here ")
        .border_style(Style::default().fg(app.theme.colors.border_focused()));
    let canvas_inner = canvas_block.inner(areas.canvas);
    frame.render_widget(canvas_block, areas.canvas);

    let viewport = CanvasView::fit(canvas_inner, practice.surface());
    CanvasView::new(practice.surface(), app.theme).render_in(&viewport, frame.buffer_mut());
    app.canvas.set(Some(viewport));

    let panel = FeedbackPanel {
        character: practice.current_character().unwrap_or_default(),
        position: (practice.index(), practice.sequence_len()),
        matched: (practice.history().matched_count(), practice.history().len()),
        feedback: practice.feedback(),
        hint: practice.hint(),
        checking: practice.is_checking(),
        hinting: practice.is_hinting(),
        theme: app.theme,
    };
    frame.render_widget(panel, areas.panel);

    let footer = match app.status {
        Some(ref status) => format!(" {status}"),
        None => PRACTICE_KEYS.to_string(),
    };
    render_footer(frame, app, layout.footer, &footer);
}

fn render_alert(frame: &mut ratatui::Frame, app: &ChalkApp, message: &str) {
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(30, 20, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(" Notice ")
        .border_style(Style::default().fg(colors.warning()))
        .style(Style::default().bg(colors.bg()));
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(colors.fg()))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(colors.muted()),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
