// Native binary for dexterm - terminal catalog viewer

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    path::Path,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use dexterm::{
    api::ApiClient,
    app::{App, InputMode},
    config::load,
    favorites::{FavoritesStore, KvStore, MemoryKv, SqliteKv},
    fetcher::{run_fetcher, FetchRequest},
    router::Route,
    types::AppEvent,
    ui,
};

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn open_favorites(path: &Path) -> Box<dyn KvStore + Send> {
    match SqliteKv::open(path) {
        Ok(kv) => Box::new(kv),
        Err(e) => {
            log::error!("[favorites] cannot open {}: {e}; favorites will not persist", path.display());
            Box::new(MemoryKv::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    init_logging(&cfg.log_file)?;
    cfg.log_summary();

    let client = ApiClient::new(cfg.api_base_url.clone(), Duration::from_millis(cfg.http_timeout_ms));
    let favorites = FavoritesStore::open(open_favorites(&cfg.favorites_db_path));

    // channels
    let (event_tx, event_rx) = unbounded_channel::<AppEvent>();
    let (fetch_tx, fetch_rx) = unbounded_channel::<FetchRequest>();
    let fetcher = tokio::spawn(run_fetcher(client, fetch_rx, event_tx));

    let mut app = App::new(&cfg, favorites, fetch_tx);

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Example: ./dexterm dexterm://types/Feu
    app.start(cfg.start_route.as_deref());

    let result = run_loop(&mut app, &mut terminal, event_rx).await;

    // cleanup
    fetcher.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    log::info!("dexterm exiting");
    result
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k);
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }
        app.sync_favorites();

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, k: KeyEvent) {
    match app.input_mode() {
        InputMode::Filter => {
            match k.code {
                KeyCode::Char(c) => app.filter_add_char(c),
                KeyCode::Backspace => app.filter_backspace(),
                KeyCode::Enter => app.apply_filter(),
                KeyCode::Esc => app.cancel_filter(),
                _ => {}
            }
            return;
        }
        InputMode::Search => {
            match k.code {
                KeyCode::Char(c) => app.search_add_char(c),
                KeyCode::Backspace => app.search_backspace(),
                KeyCode::Enter => app.search_submit(),
                KeyCode::Up => app.search_up(),
                KeyCode::Down => app.search_down(),
                KeyCode::Esc => app.close_search(),
                _ => {}
            }
            return;
        }
        InputMode::ConfirmClear => {
            match k.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_clear_favorites(),
                KeyCode::Char('n') | KeyCode::Esc => app.cancel_clear_favorites(),
                _ => {}
            }
            return;
        }
        InputMode::Normal => {}
    }

    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.quit(),
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => app.start_search(),
        (KeyCode::Char('1'), _) => app.navigate(Route::Home),
        (KeyCode::Char('2'), _) => app.navigate(Route::Types),
        (KeyCode::Char('3'), _) => app.navigate(Route::Favorites),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.down(),
        (KeyCode::Enter, _) => app.enter(),
        (KeyCode::Esc, _) | (KeyCode::Backspace, _) => app.back(),
        (KeyCode::Char('*'), _) | (KeyCode::Char('f'), _) => app.toggle_favorite_selected(),
        (KeyCode::Char('s'), _) => app.cycle_sort(),
        (KeyCode::Char('m'), _) => app.load_more(),
        (KeyCode::Char('r'), _) => app.retry(),
        (KeyCode::Char('/'), _) => app.start_filter(),
        (KeyCode::Char('t'), _) => app.cycle_category(),
        (KeyCode::Char('g'), _) => app.cycle_generation(),
        (KeyCode::Char('c'), _) => app.clear_filter(),
        (KeyCode::Char('X'), _) => app.request_clear_favorites(),
        _ => {}
    }
}
