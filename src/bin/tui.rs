//! Supermeow TUI (Terminal User Interface)
//!
//! A terminal-based browser for an archived chat community.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use supermeow::api::ArchiveClient;
use supermeow::routes::Route;
use supermeow::settings::Settings;
use supermeow::tui::{ui::ui, App, Fetcher, Pane, Screen};

/// Lines moved by PgUp/PgDn
const PAGE_SCROLL: usize = 10;

/// Lines moved by the mouse wheel
const WHEEL_SCROLL: usize = 3;

/// Browse an archived chat community in the terminal
#[derive(Debug, Parser)]
#[command(name = "supermeow-tui", version, about)]
struct Cli {
    /// Settings file (JSON); created with defaults by --save-config
    #[arg(long, default_value = "supermeow.json")]
    config: PathBuf,

    /// Archive API base URL, overriding the settings file
    #[arg(long)]
    api_url: Option<String>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,

    /// Start route, e.g. /guild/general.db/channel/announcements
    route: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)
        .and_then(|s| s.with_overrides(cli.api_url.clone()))
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;
    if cli.save_config {
        settings.save(&cli.config)?;
    }
    supermeow::init_logging(&settings)?;

    let route: Route = match &cli.route {
        Some(path) => path.parse()?,
        None => Route::Home,
    };

    tracing::info!("Starting against {} at {}", settings.api_base_url, route);

    let client = ArchiveClient::from_settings(&settings)?;
    let (fetcher, outcomes) = Fetcher::new(client, tokio::runtime::Handle::current());
    let mut app = App::new(fetcher, outcomes);
    app.start(route);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let res = tokio::task::block_in_place(|| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("TUI exited with error: {}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        // Apply finished requests before drawing so the frame shows them
        app.poll_fetches();

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => handle_key(app, key.code, key.modifiers),
                Event::Mouse(mouse) if app.current_screen == Screen::ChannelView => {
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.scroll_messages_up(WHEEL_SCROLL),
                        MouseEventKind::ScrollDown => app.scroll_messages_down(WHEEL_SCROLL),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.current_screen {
        Screen::ChannelView if app.channel_view.searching => match code {
            KeyCode::Enter | KeyCode::Esc => app.channel_view.stop_search(),
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.search_clear(),
            KeyCode::Char(c) if !c.is_control() => app.search_push(c),
            KeyCode::Backspace => app.search_backspace(),
            _ => {}
        },
        Screen::ChannelView => match code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Esc => app.search_clear(),
            KeyCode::Tab => app.channel_view.focus_next(),
            KeyCode::BackTab => app.channel_view.focus_previous(),
            KeyCode::Char('/') => app.channel_view.start_search(),
            KeyCode::Char('r') => app.retry(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Enter => app.select(),
            KeyCode::PageUp => app.scroll_messages_up(PAGE_SCROLL),
            KeyCode::PageDown => app.scroll_messages_down(PAGE_SCROLL),
            KeyCode::Home if app.channel_view.focus == Pane::Messages => {
                app.scroll_messages_up(usize::MAX)
            }
            KeyCode::End if app.channel_view.focus == Pane::Messages => {
                app.feed.scroll_to_bottom()
            }
            _ => {}
        },
        Screen::UserProfile => match code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => app.back_to_channel_view(),
            KeyCode::Char('r') => {
                if let Some(screen) = &app.user_profile_screen {
                    let user_id = screen.user_id.clone();
                    app.open_user_profile(user_id);
                }
            }
            _ => {}
        },
    }
}
