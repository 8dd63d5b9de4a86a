use hotmenu::app;
use hotmenu::cli;
use hotmenu::config;
use hotmenu::events;
use hotmenu::input;
use hotmenu::menu;
use hotmenu::platform;
use hotmenu::shell;
use hotmenu::site;
use hotmenu::tui;

use app::{AppConfig, AppState};
use clap::Parser;
use cli::Cli;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use events::{AppEvent, EventHandler};
use input::{Action, InputContext};
use menu::{CachePolicy, RootMenu, Selection, Session};
use platform::PlatformInfo;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(250);

fn setup_verbose_logging() -> Result<()> {
    let state_dir = dirs_next_or_fallback();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "hotmenu v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn dirs_next_or_fallback() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        PathBuf::from(state).join("hotmenu")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("hotmenu")
    } else {
        PathBuf::from("/tmp/hotmenu")
    }
}

fn load_menu(args: &Cli, platform: PlatformInfo, policy: CachePolicy) -> Result<RootMenu> {
    match config::locate(args.file.as_deref()) {
        Some(path) => Ok(config::load(&path, platform, policy)?),
        None => {
            tracing::debug!("no menu file found, using built-in site menu");
            Ok(site::menu(platform, policy))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let platform = platform::probe_system();
    let policy = if args.cache_submenus {
        CachePolicy::Once
    } else {
        CachePolicy::Rebuild
    };
    let root = load_menu(&args, platform, policy)?;

    if args.print {
        print!("{}", menu::outline::render_root(&root)?);
        return Ok(());
    }

    let mut session = Session::open(&root)?;

    if let Some(keys) = &args.select {
        let path: Vec<&str> = keys.split_whitespace().collect();
        return match session.walk(path.as_slice())? {
            Selection::Run(command) => {
                println!("{command}");
                Ok(())
            }
            Selection::Entered => Err(eyre!("'{keys}' does not end on a command")),
            Selection::Unknown => Err(eyre!("No menu item for keys '{keys}'")),
        };
    }

    if let Some(dir) = &args.chdir {
        if !dir.is_dir() {
            return Err(eyre!("Not a directory: {}", dir.display()));
        }
    }

    let mut state = AppState::new(
        session,
        AppConfig {
            platform,
            workdir: args.chdir.clone(),
        },
    );

    // Setup terminal with panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(root.title()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut state).await;

    // Restore terminal
    suspend(&mut terminal)?;

    result
}

async fn run_app(terminal: &mut Tui, state: &mut AppState) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    loop {
        terminal.draw(|f| tui::render::render(f, state))?;
        state.prune_error();

        let Some(event) = events.next().await else {
            return Ok(());
        };

        let command = match event {
            AppEvent::Key(key) => {
                let ctx = InputContext {
                    has_error: state.error_message().is_some(),
                    at_root: state.session.depth() == 0,
                    quit_key_free: state.quit_key_free(),
                    pending: !state.pending.is_empty(),
                };
                match input::map_key(key, &ctx) {
                    Action::Quit => {
                        state.should_quit = true;
                        None
                    }
                    Action::DismissError => {
                        state.clear_error();
                        None
                    }
                    Action::ClearPending => {
                        state.clear_pending();
                        None
                    }
                    Action::Back => {
                        state.go_back();
                        None
                    }
                    Action::MoveUp => {
                        state.move_cursor_up();
                        None
                    }
                    Action::MoveDown => {
                        state.move_cursor_down();
                        None
                    }
                    Action::Activate => state.activate_current(),
                    Action::Type(c) => state.type_char(c),
                    Action::None => None,
                }
            }
            AppEvent::Tick => None,
            AppEvent::Error(e) => {
                state.set_error(e);
                None
            }
        };

        if let Some(command) = command {
            // the child process owns the terminal until it exits
            events.stop();
            run_command(terminal, state, &command).await?;
            events = EventHandler::new(TICK_RATE);
        }

        if state.should_quit {
            events.stop();
            return Ok(());
        }
    }
}

async fn run_command(terminal: &mut Tui, state: &mut AppState, command: &str) -> Result<()> {
    suspend(terminal)?;
    println!("$ {command}");

    let (outcome, success) = match shell::run(command, state.config.workdir.as_deref()).await {
        Ok(status) => (shell::describe_status(status), status.success()),
        Err(e) => (e.to_string(), false),
    };

    println!("\n[{outcome}] press Enter to return to the menu");
    let mut line = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;

    resume(terminal)?;
    state.record_run(command.to_string(), outcome, success);
    Ok(())
}

fn suspend(terminal: &mut Tui) -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn resume(terminal: &mut Tui) -> Result<()> {
    terminal::enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}
