use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use draft_sim::display::output::{
    display_ai_action, display_data_summary, display_draft, display_error, display_help,
    display_info, display_prediction, display_recommendations, display_success,
};
use draft_sim::input::{parse_command, parse_pick_spec, split_names, Command};
use draft_sim::{
    load_oracle, logging, Config, DraftData, GameController, GameMode, ScoringConfig, Side,
    WinProbabilityOracle,
};

#[derive(Parser, Debug)]
#[command(name = "draft_sim")]
#[command(about = "Simulate champion drafts and get AI pick recommendations", long_about = None)]
struct Args {
    /// Directory holding the champion, synergy and matchup CSV files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON logistic model (default: built-in heuristic)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive draft
    Play {
        #[arg(long, value_enum, default_value = "user-vs-ai")]
        mode: GameMode,

        /// Side you draft for (default: blue)
        #[arg(long, default_value = "blue")]
        side: Side,

        /// Number of recommendations to show (default: 5)
        #[arg(short, long)]
        top_n: Option<usize>,
    },

    /// Score candidates for a scripted draft position
    Recommend {
        /// Bans in draft order, comma separated
        #[arg(long, default_value = "")]
        bans: String,

        /// Blue picks as Name[:ROLE], comma separated, in pick order
        #[arg(long, default_value = "")]
        blue: String,

        /// Red picks as Name[:ROLE], comma separated, in pick order
        #[arg(long, default_value = "")]
        red: String,

        /// Side to recommend for (default: the side on the clock)
        #[arg(long)]
        side: Option<Side>,

        #[arg(short, long)]
        top_n: Option<usize>,
    },

    /// Let the AI draft both sides
    Simulate {
        /// Write the finished draft to the history directory
        #[arg(long)]
        export: bool,
    },

    /// Summarize the loaded data
    Info,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(model) = args.model {
        config.model_path = Some(model);
    }

    let mut scoring = ScoringConfig::default();
    let top_n = match &args.command {
        Commands::Play { top_n, .. } | Commands::Recommend { top_n, .. } => *top_n,
        _ => None,
    };
    if let Some(n) = top_n {
        scoring.top_n = n;
    }

    display_info(&format!("Loading data from {}", config.data_dir.display()));
    let data = DraftData::load(&config.data_dir, scoring)
        .with_context(|| format!("cannot start with data in {}", config.data_dir.display()))?;
    let oracle = load_oracle(config.model_path.as_deref())?;

    match args.command {
        Commands::Play { mode, side, .. } => play(&data, oracle.as_ref(), &config, mode, side),
        Commands::Recommend {
            bans,
            blue,
            red,
            side,
            ..
        } => recommend(&data, oracle.as_ref(), &bans, &blue, &red, side),
        Commands::Simulate { export } => simulate(&data, oracle.as_ref(), &config, export),
        Commands::Info => {
            display_data_summary(&data.directory.summary(), &data.meta.global(), oracle.name());
            Ok(())
        }
    }
}

fn play(
    data: &DraftData,
    oracle: &dyn WinProbabilityOracle,
    config: &Config,
    mode: GameMode,
    side: Side,
) -> Result<()> {
    let mut game = GameController::new(data, oracle, mode, side);
    display_success(&format!("New draft ({:?}), you are {}", mode, side));
    display_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut announced = false;

    loop {
        while game.is_ai_turn() {
            match game.ai_turn() {
                Some(action) => display_ai_action(&action),
                None => bail!("the AI found no legal action"),
            }
        }

        if game.is_complete() && !announced {
            display_draft(&game.snapshot(), &game.turn_info());
            display_prediction(&game.winner_prediction());
            display_info("Draft complete. 'export' to save it, 'quit' to leave.");
            announced = true;
        } else if !game.is_complete() {
            display_draft(&game.snapshot(), &game.turn_info());
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                display_error(&e.to_string());
                continue;
            }
        };

        let outcome = match command {
            Command::Ban(name) => game.user_ban(&name).map(|entry| {
                display_success(&format!("{} banned {}", entry.side, entry.champion_name))
            }),
            Command::Pick { name, role } => game.user_pick(&name, role).map(|entry| {
                let role = entry.role.map(|r| r.to_string()).unwrap_or_default();
                display_success(&format!(
                    "{} picked {} ({})",
                    entry.side, entry.champion_name, role
                ))
            }),
            Command::Recommend => {
                if let Some(side) = game.state().current_side() {
                    display_recommendations(&game.recommendations(Some(side)), side);
                }
                Ok(())
            }
            Command::Ai => {
                match game.ai_turn() {
                    Some(action) => display_ai_action(&action),
                    None => display_info("Nothing to do, the draft is complete"),
                }
                Ok(())
            }
            Command::Status => Ok(()),
            Command::Export => game.export().write_to(&config.output_dir).map(|path| {
                display_success(&format!("Draft saved to {}", path.display()))
            }),
            Command::Help => {
                display_help();
                Ok(())
            }
            Command::Quit => return Ok(()),
        };

        if let Err(e) = outcome {
            display_error(&e.to_string());
        }
    }
}

fn recommend(
    data: &DraftData,
    oracle: &dyn WinProbabilityOracle,
    bans: &str,
    blue: &str,
    red: &str,
    side: Option<Side>,
) -> Result<()> {
    let mut game = GameController::new(data, oracle, GameMode::UserVsUser, Side::Blue);

    for name in split_names(bans) {
        game.user_ban(&name)
            .with_context(|| format!("ban '{}'", name))?;
    }

    let mut blue: Vec<_> = split_names(blue).into_iter().rev().collect();
    let mut red: Vec<_> = split_names(red).into_iter().rev().collect();
    while !blue.is_empty() || !red.is_empty() {
        let Some(turn) = game.state().current_side() else {
            bail!("more picks given than the draft allows");
        };
        let queue = match turn {
            Side::Blue => &mut blue,
            Side::Red => &mut red,
        };
        let Some(spec) = queue.pop() else {
            bail!("pick order needs a {} pick next", turn);
        };
        let (name, role) = parse_pick_spec(&spec)?;
        game.user_pick(&name, role)
            .with_context(|| format!("{} pick '{}'", turn, spec))?;
    }

    display_draft(&game.snapshot(), &game.turn_info());
    match side.or_else(|| game.state().current_side()) {
        Some(side) => display_recommendations(&game.recommendations(Some(side)), side),
        None => display_prediction(&game.winner_prediction()),
    }
    Ok(())
}

fn simulate(
    data: &DraftData,
    oracle: &dyn WinProbabilityOracle,
    config: &Config,
    export: bool,
) -> Result<()> {
    let mut game = GameController::new(data, oracle, GameMode::AiVsAi, Side::Blue);
    let order = game.state().turn_order();
    let turns = (order.total_bans() + order.total_picks()) as u64;

    let pb = ProgressBar::new(turns);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Drafting");

    let mut actions = Vec::new();
    while !game.is_complete() {
        match game.ai_turn() {
            Some(action) => {
                pb.set_message(format!("{} {}", action.side, action.kind));
                actions.push(action);
                pb.inc(1);
            }
            None => {
                pb.abandon();
                bail!("the AI found no legal action");
            }
        }
    }
    pb.finish_with_message("✓ Draft complete");

    for action in &actions {
        display_ai_action(action);
    }
    display_draft(&game.snapshot(), &game.turn_info());
    display_prediction(&game.winner_prediction());

    if export {
        let path = game.export().write_to(&config.output_dir)?;
        display_success(&format!("Draft saved to {}", path.display()));
    }
    Ok(())
}
