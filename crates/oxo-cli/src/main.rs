use std::{
    io::{self, BufRead as _, Write as _},
    path::PathBuf,
    sync::mpsc,
};

use anyhow::Context as _;
use clap::Parser;
use oxo_engine::Mark;
use oxo_game::{GameController, GameEvent, GamePreferences};
use tracing::debug;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board side length (odd, 3 to 11)
    #[arg(short, long)]
    size: Option<usize>,
    /// Side the human plays against the computer
    #[arg(long, value_parser = parse_side)]
    side: Option<Mark>,
    /// Two humans share the terminal instead of playing the computer
    #[arg(long)]
    two_player: bool,
    /// JSON preferences file; command-line flags take precedence
    #[arg(long)]
    prefs: Option<PathBuf>,
    /// Log filter, overridden by RUST_LOG when set
    #[arg(long, default_value = "warn")]
    log_filter: String,
}

/// What the game reports back to the terminal loop.
enum UiMsg {
    Move(Mark, usize, usize),
    End(GameEvent),
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let preferences = load_preferences(&args)?;
    debug!(?preferences, two_player = args.two_player, "starting game");

    let mut controller = if args.two_player {
        GameController::two_player(&preferences)
    } else {
        GameController::single_player(&preferences)
    };

    let (tx, rx) = mpsc::channel();
    let move_tx = tx.clone();
    controller.add_move_handler(move |mark, row, column| {
        let _ = move_tx.send(UiMsg::Move(mark, row, column));
    });
    controller.add_game_listener(move |event| {
        let _ = tx.send(UiMsg::End(event));
    });

    run_game(&controller, &rx)?;
    controller.close();
    Ok(())
}

fn load_preferences(args: &Args) -> anyhow::Result<GamePreferences> {
    let mut preferences = match &args.prefs {
        Some(path) => GamePreferences::from_json_file(path)
            .with_context(|| format!("cannot load preferences from {}", path.display()))?,
        None => GamePreferences::default(),
    };
    if let Some(size) = args.size {
        preferences.set_board_size(size)?;
    }
    if let Some(side) = args.side {
        preferences.set_human_side(side)?;
    }
    Ok(preferences)
}

/// Drives the game to completion: prompts whenever a human holds the turn,
/// otherwise blocks until the game reports a move or its end.
fn run_game(controller: &GameController, rx: &mpsc::Receiver<UiMsg>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if let Some(human) = controller.awaited_human() {
            render(controller)?;
            if !prompt_and_play(controller, &mut lines, human.mark())? {
                // Stdin closed mid-game.
                return Ok(());
            }
        }
        match rx.recv() {
            Ok(UiMsg::Move(mark, row, column)) => println!("{mark} plays ({row}, {column})"),
            Ok(UiMsg::End(event)) => {
                render(controller)?;
                announce(&event);
                return Ok(());
            }
            Err(_) => return Ok(()),
        }
    }
}

/// Reads moves until one is accepted. Returns `false` on end of input.
fn prompt_and_play(
    controller: &GameController,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    mark: Mark,
) -> anyhow::Result<bool> {
    loop {
        print!("{mark} to move (row column): ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(false);
        };
        let Some((row, column)) = parse_square(&line?) else {
            println!("enter two numbers, e.g. `0 2`");
            continue;
        };
        match controller.play_at(row, column) {
            Ok(()) => return Ok(true),
            Err(err) => println!("{err}"),
        }
    }
}

fn parse_square(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let column = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((row, column))
}

fn parse_side(value: &str) -> Result<Mark, String> {
    let mark: Mark = value.parse().map_err(|_| format!("invalid side: {value}"))?;
    if mark.is_empty() {
        return Err("the human side must be O or X".into());
    }
    Ok(mark)
}

fn render(controller: &GameController) -> anyhow::Result<()> {
    let side = controller.board_size();
    let mut out = String::new();
    for row in 0..side {
        for column in 0..side {
            out.push(' ');
            out.push_str(&controller.state(row, column)?.to_string());
        }
        out.push('\n');
    }
    print!("{out}");
    Ok(())
}

fn announce(event: &GameEvent) {
    match event {
        GameEvent::Won { winner, line } => {
            println!("{winner} wins on {} {}", line.kind, line.index);
        }
        GameEvent::Drawn => println!("it's a draw"),
        GameEvent::Cancelled => println!("game cancelled"),
    }
}
