mod app;
mod config;
mod deck;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use deck::Deck;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "kokoro")]
#[command(version = "0.1.0")]
#[command(about = "A terminal-friendly reflection card deck")]
struct Args {
    /// Print one draw as JSON and exit (for scripts)
    #[arg(long)]
    draw: bool,

    /// Print the full card pool as JSON and exit
    #[arg(long)]
    list: bool,

    /// Use a specific deck file instead of the configured one
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Cards per draw (overrides the configured draw size)
    #[arg(short, long)]
    count: Option<usize>,

    /// Seed the random source for reproducible draws
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(count) = args.count {
        anyhow::ensure!(count > 0, "--count must be at least 1");
        config.draw_size = count;
    }

    let deck = Deck::load(args.deck.as_deref(), config.deck_path.as_deref())?;

    // Handle CLI-only commands
    if args.list {
        return print_deck(&deck);
    }

    if args.draw {
        return print_draw(&deck, config.draw_size, args.seed);
    }

    // Run TUI
    run_tui(deck, config, args.seed)
}

fn print_deck(deck: &Deck) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(deck.cards())?);
    Ok(())
}

fn print_draw(deck: &Deck, count: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let cards = deck::sampler::sample(deck.cards(), count, &mut rng)?;
    println!("{}", serde_json::to_string_pretty(&cards)?);
    Ok(())
}

fn run_tui(deck: Deck, config: AppConfig, seed: Option<u64>) -> Result<()> {
    ui::init_theme(Theme::load(&config.theme));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(deck, config, seed);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c')
                            if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                        {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        app.tick();
    }
}
