use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use match_three::config::AppConfig;
use match_three::events::GameEvent;
use match_three::save::PrefsStore;
use match_three::session::{GameSession, SettleReport};

/// Run a headless match-3 simulation: fill a board, perform random swaps,
/// and settle after each one.
#[derive(Parser)]
#[command(name = "simulate", about = "Run a headless match-3 simulation")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of random swap attempts
    #[arg(long, default_value_t = 200)]
    swaps: usize,

    /// Override board width
    #[arg(long)]
    width: Option<usize>,

    /// Override board height
    #[arg(long)]
    height: Option<usize>,

    /// Save session progress to the configured preference file on exit
    #[arg(long)]
    save: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(width) = cli.width {
        config.board.width = width;
    }
    if let Some(height) = cli.height {
        config.board.height = height;
    }
    config.validate().context("validating configuration")?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut session = GameSession::from_config(&config, StdRng::seed_from_u64(seed));
    let mut picker = StdRng::seed_from_u64(seed.wrapping_add(1));

    // Observe clears through the event bus; cross-checked against the
    // report totals at the end.
    let observed_pieces = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&observed_pieces);
    session.events_mut().subscribe(move |event, _| {
        if let GameEvent::MatchesCleared { pieces, .. } = event {
            *sink.borrow_mut() += pieces;
        }
    });

    session.fill_board();
    let opening = session.settle();

    let mut total = opening;
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for _ in 0..cli.swaps {
        let a = (
            picker.random_range(0..config.board.width),
            picker.random_range(0..config.board.height),
        );
        let b = if picker.random_range(0..2) == 0 {
            (a.0 + 1, a.1)
        } else {
            (a.0, a.1 + 1)
        };

        match session.try_swap(a, b) {
            Ok(()) => {
                accepted += 1;
                let report = session.settle();
                total = merge(total, report);
            }
            Err(_) => rejected += 1,
        }
    }

    println!("seed:            {seed}");
    println!(
        "board:           {}x{}",
        config.board.width, config.board.height
    );
    println!("swaps accepted:  {accepted}");
    println!("swaps rejected:  {rejected}");
    println!("cascades:        {}", total.cascades);
    println!("pieces cleared:  {}", total.pieces_cleared);
    println!("gold earned:     {}", total.gold_earned);
    println!("gold balance:    {}", session.gold());

    ensure!(
        *observed_pieces.borrow() == total.pieces_cleared,
        "event bus saw {} cleared pieces but settle reports total {}",
        *observed_pieces.borrow(),
        total.pieces_cleared
    );

    if cli.save {
        let store = PrefsStore::new(&config.save.path);
        let mut prefs = store
            .load()
            .with_context(|| format!("loading prefs from {}", store.path().display()))?;
        session.write_prefs(&mut prefs);
        store
            .save(&prefs)
            .with_context(|| format!("saving prefs to {}", store.path().display()))?;
        println!("saved progress to {}", store.path().display());
    }

    Ok(())
}

fn merge(a: SettleReport, b: SettleReport) -> SettleReport {
    SettleReport {
        cascades: a.cascades + b.cascades,
        pieces_cleared: a.pieces_cleared + b.pieces_cleared,
        gold_earned: a.gold_earned + b.gold_earned,
    }
}
