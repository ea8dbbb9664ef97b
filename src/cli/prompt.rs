//! Line-oriented prompt for `lsq explore`.
//!
//! Each accepted command changes one knob on a [`Session`], which refits
//! immediately; the new fit is then printed and plotted.
//!
//! Commands:
//! - `noise <sigma>`, `seed <n>`, `degree <d>`, `affine`, `loss <sum|absolute|squared>`
//! - `show`, `help`, `q`

use std::io::{BufRead, Write};

use clap::ValueEnum;

use crate::app::session::Session;
use crate::domain::LossKind;
use crate::error::AppError;

/// A parsed prompt line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromptCommand {
    Noise(f64),
    Seed(u64),
    Degree(usize),
    Affine,
    Loss(LossKind),
    Show,
    Help,
    Quit,
}

const HELP: &str = "commands: noise <sigma> | seed <n> | degree <d> | affine | loss <sum|absolute|squared> | show | q";

/// Parse one line; `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<PromptCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("Too many arguments for '{head}'."));
    }

    let need = |what: &str| arg.ok_or_else(|| format!("'{head}' needs {what}."));
    let cmd = match head.to_ascii_lowercase().as_str() {
        "noise" | "sigma" => {
            let v = need("a standard deviation")?;
            PromptCommand::Noise(v.parse().map_err(|_| format!("Invalid noise: '{v}'."))?)
        }
        "seed" => {
            let v = need("an integer")?;
            PromptCommand::Seed(v.parse().map_err(|_| format!("Invalid seed: '{v}'."))?)
        }
        "degree" | "d" => {
            let v = need("a degree")?;
            PromptCommand::Degree(v.parse().map_err(|_| format!("Invalid degree: '{v}'."))?)
        }
        "loss" => {
            let v = need("a loss name")?;
            PromptCommand::Loss(LossKind::from_str(v, true).map_err(|_| format!("Unknown loss: '{v}'."))?)
        }
        "affine" => PromptCommand::Affine,
        "show" => PromptCommand::Show,
        "help" | "?" => PromptCommand::Help,
        "q" | "quit" | "exit" => PromptCommand::Quit,
        other => return Err(format!("Unknown command: '{other}'. Type 'help'.")),
    };
    Ok(Some(cmd))
}

/// Run the prompt until `q` or end of input.
///
/// Refit failures are printed and leave the session unchanged.
pub fn run_prompt<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut out: W,
    width: usize,
    height: usize,
) -> Result<(), AppError> {
    let io_err = |e: std::io::Error| AppError::new(2, format!("Prompt I/O failed: {e}"));

    writeln!(out, "{HELP}").map_err(io_err)?;
    write!(out, "{}", session.render(width, height)).map_err(io_err)?;

    loop {
        write!(out, "lsq> ").map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let mut line = String::new();
        let bytes = input.read_line(&mut line).map_err(io_err)?;
        if bytes == 0 {
            writeln!(out).map_err(io_err)?;
            return Ok(());
        }

        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{msg}").map_err(io_err)?;
                continue;
            }
        };

        let refit = match cmd {
            PromptCommand::Quit => return Ok(()),
            PromptCommand::Help => {
                writeln!(out, "{HELP}").map_err(io_err)?;
                continue;
            }
            PromptCommand::Show => Ok(()),
            PromptCommand::Noise(sigma) => session.set_noise(sigma),
            PromptCommand::Seed(seed) => session.set_seed(seed),
            PromptCommand::Degree(degree) => session.set_degree(degree),
            PromptCommand::Affine => session.set_affine(),
            PromptCommand::Loss(loss) => session.set_loss(loss),
        };

        match refit {
            Ok(()) => write!(out, "{}", session.render(width, height)).map_err(io_err)?,
            Err(e) => writeln!(out, "error: {e}").map_err(io_err)?,
        }
    }
}
