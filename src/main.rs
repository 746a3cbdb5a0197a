// src/main.rs
use click_chess::config::{Config, DEFAULT_SNAPSHOT_FILENAME};
use click_chess::{handle_click, ClickOutcome, Color, GameState, GameStatus, Snapshot, Square};
use lazy_static::lazy_static;
use regex::Regex;
use std::env;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};

lazy_static! {
    // One square ("e2") or two in a row ("e2 e4", "e2e4"), which counts as two clicks.
    static ref CLICK_RE: Regex = Regex::new(r"^(?i)([a-h][1-8])(?:\s*([a-h][1-8]))?$").unwrap();
    static ref SAVE_RE: Regex = Regex::new(r"^(?i)save(?:\s+(\S+))?$").unwrap();
}

#[derive(Debug, PartialEq, Eq)]
enum UserInput {
    Clicks(Vec<Square>),
    Command(Command),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    New,
    Status,
    History,
    Save(Option<String>),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
struct InputError(String);

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised input '{}' (type 'help' for commands)", self.0)
    }
}

impl Error for InputError {}

fn parse_user_input(input: &str) -> Result<UserInput, InputError> {
    let trimmed = input.trim();

    if let Some(caps) = CLICK_RE.captures(trimmed) {
        let clicks = caps
            .iter()
            .skip(1)
            .flatten()
            .filter_map(|m| m.as_str().to_ascii_lowercase().parse::<Square>().ok())
            .collect();
        return Ok(UserInput::Clicks(clicks));
    }
    if let Some(caps) = SAVE_RE.captures(trimmed) {
        let filename = caps.get(1).map(|m| m.as_str().to_string());
        return Ok(UserInput::Command(Command::Save(filename)));
    }

    let command = match trimmed.to_lowercase().as_str() {
        "new" | "reset" => Command::New,
        "status" => Command::Status,
        "history" => Command::History,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(InputError(trimmed.to_string())),
    };
    Ok(UserInput::Command(command))
}

fn render_board(game: &GameState, marked: &[Square], config: &Config) -> String {
    let mut out = String::new();
    if config.show_coordinates {
        out.push_str("   a  b  c  d  e  f  g  h\n");
    }
    for rank in (0..8u8).rev() {
        if config.show_coordinates {
            out.push_str(&format!("{} ", rank + 1));
        }
        for file in 0..8u8 {
            let sq = Square::new(file, rank);
            let symbol = game.board.get(sq).map_or('.', |p| p.symbol());
            let mark = if config.mark_selectable && marked.contains(&sq) { '*' } else { ' ' };
            out.push_str(&format!("{}{} ", symbol, mark));
        }
        if config.show_coordinates {
            out.push_str(&format!("{}", rank + 1));
        }
        out.push('\n');
    }
    if config.show_coordinates {
        out.push_str("   a  b  c  d  e  f  g  h\n");
    }
    out
}

fn status_line(game: &GameState) -> String {
    let counts = format!(
        "White pieces: {}  Black pieces: {}",
        game.player(Color::White).pieces,
        game.player(Color::Black).pieces
    );
    let status = match game.status() {
        GameStatus::Ongoing => format!("{:?} to move.", game.active_color()),
        GameStatus::Check(color) => format!("{:?} is in check! {:?} to move.", color, game.active_color()),
        GameStatus::Checkmate { winner, loser } => format!("Checkmate: {:?} wins, {:?} is mated.", winner, loser),
        GameStatus::Stalemate => "Stalemate: no legal move and no check.".to_string(),
    };
    format!("{}\n{}", counts, status)
}

fn print_history(game: &GameState) {
    if game.history.is_empty() {
        println!("No moves yet.");
        return;
    }
    for (i, pair) in game.history.chunks(2).enumerate() {
        let white = pair[0].to_algebraic_string();
        let black = pair.get(1).map(|r| r.to_algebraic_string()).unwrap_or_default();
        println!("{:>3}. {:<10} {}", i + 1, white, black);
    }
}

fn save_snapshot(game: &GameState, filename: &str) {
    match Snapshot::of(game).save_to_file(filename) {
        Ok(()) => println!("Game saved to '{}'.", filename),
        Err(e) => eprintln!("Error saving game: {}", e),
    }
}

fn load_config(args: &[String]) -> Result<Config, Box<dyn Error>> {
    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args.get(i + 1).ok_or("--config needs a file name")?;
            log::info!("loading configuration from {}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };
    if config.snapshot_file != DEFAULT_SNAPSHOT_FILENAME {
        log::debug!("snapshot file overridden: {}", config.snapshot_file);
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let config = load_config(&args)?;

    let mut game = GameState::new();
    let mut marked = game.selectable_pieces();

    println!("==============================");
    println!("|      Click Chess (CLI)     |");
    println!("==============================");
    print_help(&config);

    'game_loop: loop {
        println!("------------------------------------------");
        print!("{}", render_board(&game, &marked, &config));
        println!("{}", status_line(&game));

        match game.active_player().selection() {
            Some((from, _)) => print!("\nSelected {}. Click a destination, or {} again to cancel: ", from, from),
            None if game.is_over() => print!("\nGame over. Type 'new', 'save' or 'quit': "),
            None => print!("\n{:?}, click a piece: ", game.active_color()),
        }
        io::stdout().flush()?;

        let mut input_line = String::new();
        match io::stdin().read_line(&mut input_line) {
            Ok(0) => {
                println!("\nEnd of input detected. Quitting.");
                break 'game_loop;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue 'game_loop;
            }
        }
        if input_line.trim().is_empty() {
            continue 'game_loop;
        }

        match parse_user_input(&input_line) {
            Ok(UserInput::Clicks(clicks)) => {
                for sq in clicks {
                    match handle_click(&mut game, sq) {
                        Ok(ClickOutcome::Moved { record, selectable }) => {
                            println!("Played {}", record.to_algebraic_string());
                            marked = selectable;
                        }
                        Ok(outcome) => marked = outcome.selectable().to_vec(),
                        Err(e) => {
                            println!("Error: {}", e);
                            break;
                        }
                    }
                }
            }
            Ok(UserInput::Command(command)) => match command {
                Command::New => {
                    game.reset();
                    marked = game.selectable_pieces();
                    println!("New game started.");
                }
                Command::Status => println!("{:#?}", game.status()),
                Command::History => print_history(&game),
                Command::Save(filename) => {
                    let filename = filename.unwrap_or_else(|| config.snapshot_file.clone());
                    save_snapshot(&game, &filename);
                }
                Command::Help => print_help(&config),
                Command::Quit => {
                    println!("Exiting game.");
                    break 'game_loop;
                }
            },
            Err(e) => println!("Input Error: {}", e),
        }
    }

    println!("\nGame session finished.");
    Ok(())
}

fn print_help(config: &Config) {
    println!("\nAvailable Commands:");
    println!("  <square>       Click a square (e.g. e2). Click a piece, then its destination.");
    println!("                 Clicking the selected piece again cancels the selection.");
    println!("  <sq> <sq>      Two clicks at once (e.g. e2 e4 or e2e4).");
    if config.mark_selectable {
        println!("                 Squares you may click next are marked with '*'.");
    }
    println!("  history        Show the moves played so far.");
    println!("  status         Show check / checkmate / stalemate status.");
    println!("  save [file]    Save a JSON snapshot (default: {}).", config.snapshot_file);
    println!("  new            Start a new game.");
    println!("  help           Show this help message.");
    println!("  quit / exit    Exit the game.");
    println!();
}
