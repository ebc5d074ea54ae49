use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use missile_control::command::Session;
use missile_control::config::{ConfigError, Settings};

/// Projectile landing calculator driven by text commands.
///
/// Commands: MISSILE INIT <x>, <y> | DEGREE <delta> | UP <distance> <timestamp> |
/// LAUNCH <velocity> | LANDING_POSITION | PLOT [path] | q
#[derive(Debug, Parser)]
#[command(version)]
struct CliArgs {
    /// File with one command per line; stdin when omitted
    script: Option<PathBuf>,

    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gravitational acceleration in m/s^2, overriding the settings file
    #[arg(short, long)]
    gravity: Option<f64>,

    /// Do not print the banner or prompts
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not read {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

fn load_settings(args: &CliArgs) -> Result<Settings, ConfigError> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(gravity) = args.gravity {
        settings.gravity_mps2 = gravity;
        settings.validate()?;
    }
    Ok(settings)
}

fn run() -> Result<(), AppError> {
    let args = CliArgs::parse();
    let settings = load_settings(&args)?;
    log::debug!("settings: {settings:?}");

    let stdout = io::stdout();
    match &args.script {
        Some(path) => {
            let file = File::open(path).map_err(|source| AppError::Script {
                path: path.clone(),
                source,
            })?;
            Session::new(settings)
                .quiet(true)
                .run(BufReader::new(file), stdout.lock())?;
        }
        None => {
            Session::new(settings)
                .quiet(args.quiet)
                .run(io::stdin().lock(), stdout.lock())?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn gravity_flag_overrides_default() {
        let args = CliArgs::parse_from(["missile_control", "--gravity", "1.62", "-q"]);
        let settings = load_settings(&args).expect("valid settings");
        assert_eq!(settings.gravity_mps2, 1.62);
        assert!(args.quiet);
        assert_eq!(args.script, None);
    }

    #[test]
    fn gravity_flag_is_validated() {
        let args = CliArgs::parse_from(["missile_control", "--gravity=-9.81"]);
        assert!(matches!(
            load_settings(&args),
            Err(ConfigError::InvalidGravity(_))
        ));
    }
}
