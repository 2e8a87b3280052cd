#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::must_use_candidate,
    // clippy::restriction,
    // clippy::pedantic
)]
// now allow a few rules which are denied by the above statement
// --> they are ridiculous and not necessary
#![allow(
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::fallible_impl_from
)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]

use std::error::Error;
use std::io::{self, BufRead, Write};

use clap::Parser;
use connect_l_rs::{Config, Gameboard, GameboardError, Player, Scheduler, SearchError, configure};

#[derive(Debug, Parser)]
#[command(name = "connect-l-cli", about = "Play connect-L against the computer")]
struct Args {
    /// Number of columns
    #[arg(long, default_value_t = 7)]
    width: usize,

    /// Number of rows. Even heights use the minmax engine, odd heights the
    /// threat-counting engine
    #[arg(long, default_value_t = 6)]
    height: usize,

    /// Discs in a row needed to win
    #[arg(long, default_value_t = 4)]
    line_length: usize,

    /// Search depth of the computer's first move
    #[arg(long, default_value_t = 4)]
    depth: usize,

    /// The computer plays first
    #[arg(long)]
    cpu_first: bool,

    /// Do not raise the depth after quick searches
    #[arg(long)]
    fixed_depth: bool,

    /// Two human players, no computer
    #[arg(long, conflicts_with = "cpu_first")]
    two_players: bool,

    /// Clear the terminal before every board instead of keeping the history
    #[arg(long)]
    clear_screen: bool,
}

/// Reads a column (1-based on screen). Returns `None` at end of input.
fn read_column(input: &mut impl BufRead, board: &Gameboard) -> io::Result<Option<usize>> {
    loop {
        {
            print!("Choose your move (column): ");
            for col in board.legal_columns().map(|x| x + 1) {
                print!("{col},");
            }
            println!();
            io::stdout().flush()?;
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<usize>() {
            // adapt to index
            Ok(col) if col > 0 => return Ok(Some(col - 1)),
            _ => println!("'{}' is not a column", line.trim()),
        }
    }
}

/// Asks whether to start another game. Returns `false` at end of input.
fn read_play_again(input: &mut impl BufRead) -> io::Result<bool> {
    loop {
        println!("Play again? [y/n]");
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim() {
            "y" | "Y" => return Ok(true),
            "n" | "N" => return Ok(false),
            _ => {}
        }
    }
}

fn clear_screen() {
    print!("{esc}[2J{esc}[1;1H", esc = 27 as char);
}

/// Plays one game. Returns `false` if the input ended mid-game.
fn play_game(
    args: &Args,
    config: &Config,
    computer: Option<Player>,
    input: &mut impl BufRead,
) -> Result<bool, Box<dyn Error>> {
    let mut scheduler = Scheduler::new(config);
    let mut board = Gameboard::new(config.geometry());

    println!(
        "Let's play connect-{} on a {}x{} board.",
        args.line_length, args.width, args.height
    );
    loop {
        if args.clear_screen {
            clear_screen();
        }
        println!("----------------");
        println!("{board}");
        println!();

        if board.is_full() {
            println!("Gameover: draw");
            return Ok(true);
        }

        let current_player = board.player_to_move();
        if Some(current_player) == computer {
            let turn = match scheduler.choose(&board) {
                Ok(turn) => turn,
                Err(SearchError::NoLegalMove) => {
                    println!("Gameover: draw");
                    return Ok(true);
                }
            };
            println!(
                "Computer chose column {} (depth {}, {:.2}s)",
                turn.column + 1,
                turn.depth,
                turn.elapsed.as_secs_f32()
            );
            board.apply(turn.column)?;
        } else {
            println!("{} to move", current_player.symbol());
            let Some(col) = read_column(input, &board)? else {
                return Ok(false);
            };
            match board.apply(col) {
                Ok(_) => {}
                Err(GameboardError::ColumnFull(_) | GameboardError::InvalidColumn(_)) => {
                    println!("Column {} is not available, try again", col + 1);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if board.last_move_wins() {
            if args.clear_screen {
                clear_screen();
            }
            println!("----------------");
            println!("{board}");
            match computer {
                Some(player) if player == current_player => println!("Computer won!"),
                Some(_) => println!("You won!"),
                None => println!("{} won!", current_player.symbol()),
            }
            return Ok(true);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = configure(args.width, args.height, args.line_length, args.depth)?
        .with_adaptive_depth(!args.fixed_depth);
    let computer = match (args.two_players, args.cpu_first) {
        (true, _) => None,
        (false, true) => Some(Player::Player1),
        (false, false) => Some(Player::Player2),
    };

    let mut input = io::stdin().lock();
    while play_game(&args, &config, computer, &mut input)? && read_play_again(&mut input)? {}
    println!("Bye");

    Ok(())
}
