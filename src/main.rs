use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pendulograph::{viewer, Animation, Canvas, ImmediateScheduler, RunSummary, SimulationConfig};

fn build_cli() -> Command {
    Command::new("pendulograph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Draw the path traced by a spherical pendulum")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Load parameters from a JSON file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("field")
                .short('f')
                .long("field")
                .value_name("NAME=VALUE")
                .help("Override one parameter, e.g. -f r=800 -f color1=#ff0000")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Render headless and write the drawing as PNG instead of opening a window")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("max-frames")
                .long("max-frames")
                .value_name("N")
                .help("Stop a headless run after N frames")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .value_name("FILE")
                .help("Write the effective parameters as JSON")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase logging verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Split `NAME=VALUE` overrides into a field map.
fn parse_fields<'a>(pairs: impl Iterator<Item = &'a String>) -> Result<HashMap<String, String>> {
    let mut fields = HashMap::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("field override `{pair}` is not of the form NAME=VALUE");
        };
        fields.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(fields)
}

fn load_config(matches: &clap::ArgMatches) -> Result<SimulationConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(pairs) = matches.get_many::<String>("field") {
        let fields = parse_fields(pairs)?;
        config
            .apply_fields(&fields)
            .context("invalid field override")?;
    }

    Ok(config)
}

fn render_headless(
    animation: &mut Animation,
    output: &Path,
    max_frames: Option<u64>,
) -> Result<RunSummary> {
    let (width, height) = animation.environment().geometry.pixel_size();
    let mut canvas = Canvas::new(width, height);
    let mut scheduler = match max_frames {
        Some(limit) => ImmediateScheduler::with_limit(limit),
        None => ImmediateScheduler::new(),
    };

    let summary = animation.run(&mut canvas, &mut scheduler)?;
    canvas
        .save_png(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), "drawing saved");

    Ok(summary)
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"), matches.get_flag("quiet"));

    let config = load_config(&matches)?;

    if let Some(path) = matches.get_one::<PathBuf>("write-config") {
        config
            .save(path)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!(path = %path.display(), "config written");
    }

    let mut animation = Animation::new(&config).context("configuration rejected")?;

    let summary = match matches.get_one::<PathBuf>("output") {
        Some(output) => {
            render_headless(&mut animation, output, matches.get_one::<u64>("max-frames").copied())?
        }
        // winit's platform errors are not guaranteed Send + Sync.
        None => viewer::run(animation).map_err(|e| anyhow!("viewer failed: {e}"))?,
    };

    info!(
        frames = summary.frames,
        elapsed = summary.elapsed,
        angle = summary.pendulum.angle,
        energy_drift = summary.energy_drift,
        cancelled = summary.cancelled,
        "run complete"
    );

    Ok(())
}
