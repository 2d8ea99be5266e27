use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use recolour::app::App;
use recolour::cli::{Args, Command, ParamArgs};
use recolour::pipeline::{extract, substitute, transform};
use recolour::store::Palette;

fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = matches!(args.command, None | Some(Command::Tui { .. }));
    init_logging(args.verbose, args.log_file.as_deref(), interactive)?;

    match args.command {
        Some(Command::Transform { colours, params }) => run_transform(&colours, &params),
        Some(Command::Extract { file }) => run_extract(file.as_deref()),
        Some(Command::Convert {
            file,
            colours,
            output,
            params,
        }) => run_convert(file.as_deref(), &colours, output.as_deref(), &params),
        Some(Command::Tui { colours, params }) => run_tui(&colours, &params),
        None => run_tui(&[], &ParamArgs::default()),
    }
}

/// Log to stderr for one-shot commands. The TUI owns the terminal, so it only
/// logs when a file is given.
fn init_logging(verbose: bool, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if interactive => {}
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn palette_from(colours: &[String]) -> Palette {
    colours
        .iter()
        .fold(Palette::new(), |palette, colour| palette.add(colour.as_str()))
}

fn read_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run_transform(colours: &[String], params: &ParamArgs) -> Result<()> {
    let input = palette_from(colours);
    let output = transform(&params.to_params(), &input)?;

    let mut stdout = io::stdout().lock();
    for (from, to) in input.iter().zip(output.iter()) {
        writeln!(stdout, "{} {}", from.value, to.value)?;
    }
    Ok(())
}

fn run_extract(file: Option<&Path>) -> Result<()> {
    let text = read_text(file)?;
    let palette = extract(&text);

    let mut stdout = io::stdout().lock();
    for entry in &palette {
        writeln!(stdout, "{}", entry.value)?;
    }
    Ok(())
}

fn run_convert(
    file: Option<&Path>,
    colours: &[String],
    output: Option<&Path>,
    params: &ParamArgs,
) -> Result<()> {
    let text = read_text(file)?;
    let input = if colours.is_empty() {
        debug!("no palette given, using the colours in the text");
        extract(&text)
    } else {
        palette_from(colours)
    };
    let transformed = transform(&params.to_params(), &input)?;
    let converted = substitute(&text, &input, &transformed)?;

    match output {
        Some(path) => {
            fs::write(path, converted)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(colours = input.len(), path = %path.display(), "wrote converted text");
        }
        None => io::stdout().lock().write_all(converted.as_bytes())?,
    }
    Ok(())
}

fn run_tui(colours: &[String], params: &ParamArgs) -> Result<()> {
    let mut app = App::with_state(Palette::new(), params.to_params())?;
    for colour in colours {
        app.add_colour(colour)
            .with_context(|| format!("invalid starting colour {colour}"))?;
    }
    recolour::tui::run(app)
}
