mod script;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use desktop_runtime::{AppRegistry, ConfigError, DesktopRuntime, NoopHost, WmConfig};
use platform_host::ManualClock;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::script::{replay, summarize, Script, ScriptError};

#[derive(Parser, Debug)]
#[command(
    name = "desktop-sim",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays scripted pointer and window events against the desktop window manager"
)]
struct Cli {
    /// Window-manager tuning file (TOML). Defaults apply when omitted.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON replay script. Read from stdin when omitted.
    #[arg(short = 's', long = "script", value_name = "PATH")]
    script: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long = "width", value_name = "PX", default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels, taskbar included.
    #[arg(long = "height", value_name = "PX", default_value_t = 800.0)]
    height: f64,
}

#[derive(Debug, Error)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read script {path}: {source}")]
    ReadScript {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to write summary: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let config = match &cli.config {
        Some(path) => WmConfig::load(path)?,
        None => WmConfig::default(),
    };
    let script = Script::from_json(&read_script(cli.script.as_ref())?)?;

    let clock = ManualClock::new(0);
    let mut runtime = DesktopRuntime::new(
        AppRegistry::builtin(),
        config,
        clock.clone(),
        NoopHost,
        cli.width,
        cli.height,
    );
    replay(&mut runtime, &clock, &script)?;

    println!("{}", serde_json::to_string_pretty(&summarize(&runtime))?);
    Ok(())
}

fn read_script(path: Option<&PathBuf>) -> Result<String, SimError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| SimError::ReadScript {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .map_err(|source| SimError::ReadScript {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(body)
        }
    }
}
