//! Goban: a Go engine with life-and-death analysis and alpha-beta search.
//!
//! ## Usage
//!
//! - `goban` - Show a demo
//! - `goban demo` - Search one position and print the analysis
//! - `goban self-play` - Play a full game, search against search
//! - `goban replay ";B[ee];W[de]"` - Replay a move list and score it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goban_engine::board::Board;
use goban_engine::config::GameConfig;
use goban_engine::game::{GameSession, Outcome};
use goban_engine::location::Location;
use goban_engine::player::{RandomPlayer, SearchPlayer, Strategy};
use goban_engine::search::Searcher;

/// Goban: a Go engine built on group health analysis
#[derive(Parser)]
#[command(name = "goban")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board size
    #[arg(long, global = true)]
    size: Option<usize>,

    /// Search depth in plies
    #[arg(long, global = true)]
    depth: Option<u8>,

    /// Time budget per move in milliseconds (0 = unlimited)
    #[arg(long, global = true)]
    time_ms: Option<u64>,

    /// Handicap stones for black
    #[arg(long, global = true)]
    handicap: Option<usize>,

    /// Search threads (0 = one per core)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one position and print the analysis
    Demo,
    /// Play a complete game
    SelfPlay {
        /// Let white play random moves instead of searching
        #[arg(long)]
        random_white: bool,
        /// Stop after this many moves
        #[arg(long)]
        max_moves: Option<usize>,
    },
    /// Replay a move list such as ";B[ee];W[de];B[]" and score the result
    Replay {
        moves: String,
    },
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(size) = self.size {
            config.board.size = size;
        }
        if let Some(handicap) = self.handicap {
            config.board.handicap = handicap;
        }
        if let Some(depth) = self.depth {
            config.search.depth = depth;
        }
        if let Some(time_ms) = self.time_ms {
            config.search.time_budget_ms = time_ms;
        }
        if let Some(threads) = self.threads {
            config.search.threads = threads;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.game_config()?;
    match cli.command {
        Some(Commands::SelfPlay {
            random_white,
            max_moves,
        }) => run_self_play(&config, random_white, max_moves),
        Some(Commands::Replay { moves }) => run_replay(&config, &moves),
        Some(Commands::Demo) | None => run_demo(&config),
    }
}

fn run_demo(config: &GameConfig) -> Result<()> {
    println!("Goban: life-and-death driven Go engine\n");

    let mut board = Board::with_config(&config.board);
    let size = board.size() as u8;
    let opening = [
        Location::new(3, 3),
        Location::new(size - 2, size - 2),
        Location::new(size.div_ceil(2), size.div_ceil(2)),
    ];
    for loc in opening {
        if board.is_legal(loc, board.to_move()) {
            board
                .play(loc)
                .with_context(|| format!("demo move {loc} rejected"))?;
        }
    }
    println!("{board}");

    let searcher = Searcher::new(config.search.clone(), config.weights);
    let result = searcher.search(&board);
    println!("{} to move plays {}", board.to_move(), result.action);
    println!(
        "value {:.2}, depth {}, {} nodes, cache {}/{} hits, {:?}",
        result.value,
        result.stats.depth,
        result.stats.nodes,
        result.stats.cache_hits,
        result.stats.cache_hits + result.stats.cache_misses,
        result.stats.elapsed,
    );
    println!("territory difference: {}", board.territory_difference());
    Ok(())
}

fn run_self_play(config: &GameConfig, random_white: bool, max_moves: Option<usize>) -> Result<()> {
    let black: Box<dyn Strategy> = Box::new(SearchPlayer::new(config.search.clone(), config.weights));
    let white: Box<dyn Strategy> = if random_white {
        Box::new(RandomPlayer::new())
    } else {
        Box::new(SearchPlayer::new(config.search.clone(), config.weights))
    };

    let mut game = GameSession::new(&config.board, black, white)?;
    if let Some(limit) = max_moves {
        game = game.with_max_moves(limit);
    }
    let outcome = game.play_out().context("self-play aborted")?;

    println!("{}", game.board());
    println!("{}", game.board().record_text());
    print_outcome(outcome);
    Ok(())
}

fn run_replay(config: &GameConfig, moves: &str) -> Result<()> {
    let mut board = Board::with_config(&config.board);
    board.replay_text(moves).context("replay failed")?;
    println!("{board}");
    if board.is_game_over() {
        println!("final score (black - white): {}", board.update_territory_at_end_of_game());
    } else {
        println!("territory difference: {}", board.territory_difference());
        println!("{} to move", board.to_move());
    }
    Ok(())
}

fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Scored(score) if score > 0 => println!("Black wins by {score}"),
        Outcome::Scored(score) if score < 0 => println!("White wins by {}", -score),
        Outcome::Scored(_) => println!("Jigo"),
        Outcome::Resignation { winner } => println!("{winner} wins by resignation"),
        Outcome::Unfinished => println!("Game stopped before the end"),
    }
}
