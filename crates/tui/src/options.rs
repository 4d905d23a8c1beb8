use std::path::PathBuf;

use anyhow::{Context, Result, bail};

pub const USAGE: &str = "\
Usage: vantage [--config <file.json>] [--cell-width <px>] [--cell-height <px>]

Shows how the current terminal classifies as a display. Resize the window
to see the debounced snapshot follow the live one. Keys: o = orientation
change, q = quit. Set RUST_LOG=vantage_core=debug and redirect stderr to
capture logs.";

/// Pixel size assumed for one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub cell: CellSize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Options),
    Help,
}

pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--cell-width" => options.cell.width = pixel_arg(&arg, args.next())?,
            "--cell-height" => options.cell.height = pixel_arg(&arg, args.next())?,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(Command::Run(options))
}

fn pixel_arg(flag: &str, value: Option<String>) -> Result<u32> {
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    let px: u32 = value
        .parse()
        .with_context(|| format!("{flag}: not a number: {value}"))?;
    if px == 0 {
        bail!("{flag} must be at least 1");
    }
    Ok(px)
}
