/// Command line flags mapped onto `Options`

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use matrix_engine::matrix::{AppKind, Options, DEFAULT_SWAP_TIME};

/// Digital rain renderer, as a window or as the desktop wallpaper.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "matrix", version, about)]
pub struct Cli {
    /// Render as the desktop wallpaper
    #[arg(short = 'w', long = "wallpaper")]
    pub wallpaper: bool,

    /// Windowed mode instead of fullscreen
    #[arg(short = 'm', long = "windowed")]
    pub windowed: bool,

    /// Window width; implies windowed mode
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height; implies windowed mode
    #[arg(long)]
    pub height: Option<u32>,

    /// Visual to run: matrix, triangle or debug
    #[arg(long, default_value_t = AppKind::Matrix)]
    pub app: AppKind,

    /// Background image for the rainbow rain
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Seconds between previous-frame rotations
    #[arg(long = "swap-time", default_value_t = DEFAULT_SWAP_TIME, value_parser = parse_swap_time)]
    pub swap_time: f32,

    /// Throttle the whole loop to the swap time
    #[arg(long = "loop-with-swap", default_value_t = true, action = ArgAction::Set)]
    pub loop_with_swap: bool,

    /// Log debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

/// Seconds as a finite, non-negative number
fn parse_swap_time(value: &str) -> Result<f32, String> {
    let seconds: f32 = value.parse().map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("'{}' must be a finite number of seconds >= 0", value));
    }
    Ok(seconds)
}

impl Cli {
    pub fn to_options(&self) -> Options {
        let defaults = Options::default();
        let windowed = self.windowed || self.width.is_some() || self.height.is_some();
        Options {
            wallpaper_mode: self.wallpaper,
            fullscreen: !windowed,
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            app: self.app,
            image_path: self.image.clone(),
            swap_time: self.swap_time,
            loop_with_swap: self.loop_with_swap,
            ..defaults
        }
    }
}

/// What `main` does after parsing
#[derive(Debug)]
pub enum ParseOutcome {
    Run(Cli),
    /// Help or version was printed
    Exit,
    /// Rejected arguments; help was printed
    Invalid,
}

pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => ParseOutcome::Run(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            ParseOutcome::Exit
        }
        Err(e) => {
            let _ = e.print();
            eprintln!();
            let _ = Cli::command().print_help();
            ParseOutcome::Invalid
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
