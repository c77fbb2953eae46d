//! Terminal game: reads moves from a line-based input and prints the board.

use crate::engine::EngineFactory;
use crate::game::{BoardView, TurnOrchestrator};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, instrument};

fn show(out: &mut impl Write, view: &BoardView) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", view.board())?;
    writeln!(out, "Score: {}", view.score())
}

/// Plays games until the input ends or the player types `quit`.
///
/// Besides move text, `undo` takes back the last exchange and `new` starts
/// over with a fresh engine.
#[instrument(skip_all, fields(think_time_ms = think_time.as_millis() as u64))]
pub fn run(
    input: impl BufRead,
    mut out: impl Write,
    factory: EngineFactory,
    think_time: Duration,
) -> std::io::Result<()> {
    let mut game = TurnOrchestrator::new(factory(), think_time);
    show(&mut out, &game.view())?;
    write!(out, "Your move: ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let command = line.trim();
        debug!(command, "Terminal input");
        match command {
            "" => {}
            "quit" | "exit" | "q" => break,
            "new" => {
                game.reset(factory());
                writeln!(out, "New game started. Your turn.")?;
                show(&mut out, &game.view())?;
            }
            "undo" => match game.undo() {
                Ok(view) => {
                    writeln!(out, "Undo successful. Your turn.")?;
                    show(&mut out, &view)?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
            text => match game.play(text) {
                Ok(report) => {
                    if let Some(reply) = report.engine_move() {
                        writeln!(out, "AI move: {reply}")?;
                    }
                    show(&mut out, report.view())?;
                    writeln!(out, "{}", report.message())?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
        }
        write!(out, "Your move: ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}
