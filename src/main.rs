//! Minesight CLI
//!
//! Usage:
//!   minesight --replay ticks.jsonl            # Replay recorded observations
//!   minesight                                 # Read observations from stdin
//!   minesight --serve                         # HTTP API server
//!   minesight --recovery --loss 100 --mines 3 --gems 3 --bankroll 2000
//!   minesight --replay ticks.jsonl --json     # JSON output

use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use minesight::core::{
    format_amount, run_server, split_warning, InMemoryRepository, JsonFileRepository, PatternRepository,
    RecoveryCalculator, RoundTracker,
};
use minesight::logging::init_tracing;
use minesight::types::{Observation, RenderModel};
use minesight::{DEFAULT_GEM_GOAL, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "minesight",
    version = VERSION,
    about = "Minesight - session stats, tile suggestions and recovery sizing for Mines",
    long_about = "Minesight tracks Mines rounds from a stream of page observations.\n\n\
                  Each observation is one JSON object per line (camelCase keys such as\n\
                  revealedPositions, payoutAvailable, mineRevealedAvailable, minePosition,\n\
                  currentMineCount, currentBetAmount, bankrollAmount).\n\n\
                  Modes:\n  \
                  --replay FILE  Replay a JSON-lines file ('-' for stdin)\n  \
                  --serve        HTTP API server mode\n  \
                  --recovery     One-shot recovery bet calculation\n\n\
                  States:\n  \
                  IDLE          - Board armed, no reveal yet\n  \
                  IN_PROGRESS   - Tiles being revealed\n  \
                  RESOLVED_WIN  - Cashed out, waiting for the board to clear\n  \
                  RESOLVED_LOSS - Hit a mine, waiting for the board to clear"
)]
struct Args {
    /// JSON-lines observation file, '-' for stdin
    #[arg(short, long)]
    replay: Option<String>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, env = "MINESIGHT_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,

    /// Where learned tile analysis is stored
    #[arg(long, env = "MINESIGHT_STATE", default_value = "./minesight-state.json")]
    state_file: String,

    /// Keep everything in memory
    #[arg(long)]
    no_persist: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show suggestions, insights and recovery after each resolution
    #[arg(long)]
    verbose: bool,

    /// tracing filter directive
    #[arg(long, env = "MINESIGHT_LOG", default_value = "warn")]
    log_level: String,

    /// Recovery gem goal (2-5)
    #[arg(long, default_value_t = DEFAULT_GEM_GOAL)]
    gem_goal: u32,

    /// One-shot recovery calculation
    #[arg(long)]
    recovery: bool,

    /// Cumulative loss to recover
    #[arg(long, requires = "recovery")]
    loss: Option<f64>,

    /// Mines on the board
    #[arg(long, requires = "recovery", default_value_t = 3)]
    mines: u32,

    /// Gem goal for the recovery round
    #[arg(long, requires = "recovery")]
    gems: Option<u32>,

    /// Bankroll for the 10% cap (0 = unknown, no cap)
    #[arg(long, requires = "recovery", default_value_t = 0.0)]
    bankroll: f64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if args.recovery {
        run_recovery(&args);
    } else if args.serve {
        run_serve(&args).await;
    } else {
        let source = args.replay.clone().unwrap_or_else(|| "-".to_string());
        run_replay(&source, &args);
    }
}

fn build_repository(args: &Args) -> Box<dyn PatternRepository> {
    if args.no_persist {
        Box::new(InMemoryRepository::new())
    } else {
        Box::new(JsonFileRepository::new(&args.state_file))
    }
}

/// One-shot recovery calculation
fn run_recovery(args: &Args) {
    let Some(loss) = args.loss.filter(|l| l.is_finite() && *l >= 0.0) else {
        eprintln!("--recovery needs --loss <amount> (>= 0)");
        std::process::exit(2);
    };
    let gems = args.gems.unwrap_or(args.gem_goal);
    let plan = RecoveryCalculator::new().compute(loss, args.mines, gems, args.bankroll);

    if args.json {
        match serde_json::to_string_pretty(&plan) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode plan: {}", e),
        }
        return;
    }

    println!("Multiplier:   {:.2}x (profit {:.2}x)", plan.multiplier, plan.profit_multiplier);
    println!("Bet amount:   {:.2}", plan.bet_amount);
    println!("Expected win: {:.2}", plan.expected_win());
    match split_warning(&plan) {
        Some(warning) => println!("⚠ {}", warning),
        None => println!("Single round"),
    }
}

/// Replay observations from a file or stdin
fn run_replay(source: &str, args: &Args) {
    let reader: Box<dyn BufRead> = if source == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        match File::open(source) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("Cannot open {}: {}", source, e);
                std::process::exit(1);
            }
        }
    };

    let mut tracker = RoundTracker::new(build_repository(args));
    tracker.set_gem_goal(args.gem_goal);

    if !args.json {
        print_header(source, args.no_color);
    }

    let mut stdout = io::stdout();
    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.to_ascii_lowercase().as_str() {
            "quit" | "exit" => break,
            "reset" => {
                tracker.reset_session();
                println!("Session reset");
                continue;
            }
            "reset analysis" => {
                tracker.reset_analysis();
                println!("Analysis reset");
                continue;
            }
            _ => {}
        }

        let obs: Observation = match serde_json::from_str(line) {
            Ok(obs) => obs,
            Err(e) => {
                eprintln!("line {}: not an observation: {}", line_no + 1, e);
                continue;
            }
        };

        let model = tracker.on_tick(&obs);
        print_model(&model, args);
        let _ = stdout.flush();
    }

    if !tracker.flush() {
        eprintln!("Warning: analysis could not be saved");
    }
    if !args.json {
        print_summary(&tracker, args.no_color);
    }
}

fn print_model(model: &RenderModel, args: &Args) {
    if args.json {
        match serde_json::to_string(model) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode render model: {}", e),
        }
        return;
    }

    if args.no_color {
        println!("{}", model.to_parseable_string());
    } else {
        println!("{}", model.to_terminal_string());
    }

    if args.verbose && model.reason.is_resolution() {
        print_verbose(model);
    }
}

/// Suggestions, insights and recovery after a resolution
fn print_verbose(model: &RenderModel) {
    println!("┌──────────────────────────────────────");
    for line in model.suggestions.reasoning.lines() {
        println!("│ {}", line);
    }
    if model.exclusion.ready {
        let tiles: Vec<String> = model
            .exclusion
            .tiles
            .iter()
            .map(|t| t.position.number().to_string())
            .collect();
        println!("│ Unplayed recently: {}", tiles.join(", "));
    } else {
        println!("│ Play a few games for exclusion suggestions");
    }
    for line in &model.insights.lines {
        println!("│ {}", line);
    }
    if let Some(plan) = model.recovery.plan {
        println!(
            "│ Recovery: loss {} → bet {} for {} gems",
            format_amount(model.recovery.cumulative_loss, &model.currency),
            format_amount(plan.bet_amount, &model.currency),
            model.recovery.gem_goal,
        );
        if let Some(warning) = &model.recovery.split_warning {
            println!("│ ⚠ {}", warning);
        }
        if model.recovery.exhausted {
            println!("│ ⚠ {} recovery attempts used", model.recovery.attempts);
        }
    }
    println!("└──────────────────────────────────────");
}

/// Print header
fn print_header(source: &str, no_color: bool) {
    let label = if source == "-" { "stdin" } else { source };
    if no_color {
        println!("========================================");
        println!("  Minesight v{} - replay {}", VERSION, label);
        println!("========================================");
    } else {
        println!("\x1b[1m💎 Minesight v{} - replay {}\x1b[0m", VERSION, label);
    }
    println!();
}

fn print_summary(tracker: &RoundTracker, no_color: bool) {
    let stats = tracker.popup_stats();
    let ledger = &tracker.context().ledger;
    let currency = &tracker.context().currency;
    let (bold, reset) = if no_color { ("", "") } else { ("\x1b[1m", "\x1b[0m") };
    println!();
    println!(
        "{}Rounds: {} | W/L: {}/{} | Win rate: {:.1}% | Profit: {}{}",
        bold,
        stats.total_rounds,
        stats.wins,
        stats.losses,
        stats.win_rate,
        format_amount(ledger.profit(), currency),
        reset
    );
}

/// Run HTTP API server
async fn run_serve(args: &Args) {
    println!();
    println!("💎 Minesight API Server v{}", VERSION);
    println!();

    let mut tracker = RoundTracker::new(build_repository(args));
    tracker.set_gem_goal(args.gem_goal);
    if let Err(e) = run_server(&args.addr, tracker).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
