use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::params::{ParamUpdate, TransformParams, DEFAULT_MIDPOINT};

/// Shift, invert and brighten a palette of colours, then rewrite them in text.
#[derive(Parser, Debug)]
#[command(name = "recolour", version, about)]
pub struct Args {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transform colours given on the command line
    Transform {
        /// Colours to transform; the first is the hue anchor
        #[arg(required = true, value_name = "COLOUR")]
        colours: Vec<String>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// List the distinct hex colours found in text
    Extract {
        /// Read from this file instead of stdin
        file: Option<PathBuf>,
    },

    /// Rewrite every palette colour in text with its transformed value
    Convert {
        /// Read from this file instead of stdin
        file: Option<PathBuf>,

        /// Palette colour (repeatable); defaults to every colour in the text
        #[arg(short, long = "colour", value_name = "COLOUR")]
        colours: Vec<String>,

        /// Write the converted text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Launch the interactive TUI (default)
    Tui {
        /// Initial palette
        #[arg(value_name = "COLOUR")]
        colours: Vec<String>,

        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Transform parameters shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Push lightness toward white (positive) or black (negative)
    #[arg(
        short,
        long,
        default_value_t = 0,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(-100..=100)
    )]
    pub brightness: i32,

    /// Rotate hues so the first colour lands on this hue (degrees)
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub hue: Option<f32>,

    /// Mirror lightness around MIDPOINT percent (written `--invert=30`)
    #[arg(
        long,
        value_name = "MIDPOINT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "50"
    )]
    pub invert: Option<f32>,
}

impl ParamArgs {
    pub fn to_params(&self) -> TransformParams {
        let mut params = TransformParams::default().with(ParamUpdate::Brightness(self.brightness));
        if let Some(hue) = self.hue {
            params.apply(ParamUpdate::HueShiftEnabled(true));
            params.apply(ParamUpdate::HueShiftTarget(hue));
        }
        params.apply(ParamUpdate::InvertEnabled(self.invert.is_some()));
        params.apply(ParamUpdate::InvertMidpoint(
            self.invert.unwrap_or(DEFAULT_MIDPOINT),
        ));
        params
    }
}
