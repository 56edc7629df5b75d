use std::io::BufRead;

use ansi_term::{Colour, Style};
use anyhow::{bail, Context, Result};
use chessboard_ui::{
    candidate_squares, initial_piece_at, initial_side_at, square_label, BoardLayout, Logger,
    MoveRecord, PieceType, Side, Square, SquareColor, Store,
};
use clap::{Parser, Subcommand};

const INSTRUCTIONS: &str = "\
    Enter one move per line as 3 space-separated words:\n    \
      <piece> <from> <to>\n      \
      For pieces: king, queen, bishop, rook, knight or pawn.\n      \
      For squares: a file A-H followed by a rank 1-8, in either case.\n  \
      Example: \n    \
        - the opening move 1. e4 would be entered as \"pawn E2 E4\".\n\
";

/// Arguments to the board app
#[derive(Parser, Debug)]
#[command(
    name = "Chessboard - Board App",
    about = "Terminal companion to the chessboard UI helpers."
)]
struct Cli {
    /// How much to log, from 0 (nothing) to 10 (everything)
    #[arg(short, long, default_value = "0")]
    verbosity: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the starting position
    Board {
        /// Don't colour the squares
        #[arg(short, long)]
        plain: bool,
    },
    /// List the on-board squares a knight or king could move to
    Candidates { piece: PieceType, square: String },
    /// Print the pixel position of a square for a board layout
    Position {
        square: String,
        /// Side length of a square in pixels
        #[arg(short, long, default_value = "50")]
        size: f64,
        /// Padding around the board in pixels
        #[arg(short, long, default_value = "0")]
        padding: f64,
    },
    /// Read moves from stdin, alternating sides from white, and print the
    /// move history
    Replay {
        /// Whether to suppress the instructions and the per-move output
        #[arg(short, long)]
        quiet: bool,
    },
}

fn piece_char(label: &str) -> char {
    let Some(piece) = initial_piece_at(label) else {
        return ' ';
    };
    let c = match piece {
        PieceType::Pawn => 'P',
        _ => piece.letter().chars().next().unwrap_or('?'),
    };
    match initial_side_at(label) {
        Some(Side::Black) => c.to_ascii_lowercase(),
        _ => c,
    }
}

fn print_board(plain: bool) -> Result<()> {
    for row in 0..8 {
        let mut line = String::new();
        for col in 0..8 {
            let label = square_label(row, col)?;
            let cell = format!(" {} ", piece_char(&label));
            if plain {
                line.push_str(&cell);
                continue;
            }
            let background = match Square::new(row, col)?.color() {
                SquareColor::Light => Colour::RGB(240, 217, 181),
                SquareColor::Dark => Colour::RGB(181, 136, 99),
            };
            let style = Style::new().on(background).fg(Colour::Black);
            line.push_str(&style.paint(cell).to_string());
        }
        println!("{} {}", 8 - row, line);
    }
    println!("   A  B  C  D  E  F  G  H");
    Ok(())
}

fn parse_move(line: &str) -> Result<MoveRecord> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    let [piece, from, to] = words[..] else {
        bail!("expected 3 words, got {}", words.len());
    };
    Ok(MoveRecord::new(
        piece.parse()?,
        Square::from_label(from)?,
        Square::from_label(to)?,
    ))
}

fn replay(logger: Logger, quiet: bool) -> Result<()> {
    if !quiet {
        println!("{}", INSTRUCTIONS);
    }
    let mut store = Store::new(logger);
    for (i, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let mv = parse_move(&line).with_context(|| format!("line {}: {:?}", i + 1, line))?;
        if !quiet {
            println!("{} played {}", store.turn(), mv.notation());
        }
        store.complete_move(mv);
    }
    for (turn, white, black) in store.history().notation_rows() {
        println!("{}. {} {}", turn, white, black);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = Logger::new(cli.verbosity);

    match cli.command {
        Command::Board { plain } => print_board(plain)?,
        Command::Candidates { piece, square } => {
            let from = Square::from_label(&square)?;
            let labels = candidate_squares(piece, from)
                .into_iter()
                .map(|sq| sq.label())
                .collect::<Vec<_>>();
            if labels.is_empty() {
                logger.log(1, &format!("{} has no offset table", piece));
            }
            println!("{}", labels.join(" "));
        }
        Command::Position {
            square,
            size,
            padding,
        } => {
            let sq = Square::from_label(&square)?;
            let layout = BoardLayout::square(size, padding)?;
            let point = layout.position(sq.row(), sq.col());
            println!("{} {}", point.x, point.y);
        }
        Command::Replay { quiet } => replay(logger, quiet)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let mv = parse_move("knight b1  c3").unwrap();
        assert_eq!(mv.notation(), "nb1c3");
        assert!(parse_move("knight b1").is_err());
        assert!(parse_move("knight b1 c3 d5").is_err());
        assert!(parse_move("unicorn b1 c3").is_err());
    }

    #[test]
    fn test_piece_chars() {
        assert_eq!(piece_char("E1"), 'K');
        assert_eq!(piece_char("E8"), 'k');
        assert_eq!(piece_char("A2"), 'P');
        assert_eq!(piece_char("B8"), 'n');
        assert_eq!(piece_char("E4"), ' ');
    }
}
