//! Text command dispatcher around [`TrajectoryModel`].
//!
//! One line is one command:
//!
//! ```text
//! MISSILE INIT 0, 0
//! DEGREE +45
//! UP 5 1
//! LAUNCH 14
//! LANDING_POSITION
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::Settings;
use crate::core::missile::{MissileError, Point, TrajectoryModel};
use crate::plot::{self, PlotError};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Init { x: f64, y: f64 },
    Degree(f64),
    Up { distance: f64, timestamp: f64 },
    Launch(f64),
    LandingPosition,
    Plot(Option<PathBuf>),
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Incorrect format detected\nCorrect format : {usage}\nExample : {example}")]
    IncorrectFormat {
        usage: &'static str,
        example: &'static str,
    },
    #[error("Unknown command: {0}")]
    Unknown(String),
}

const INIT_FORMAT: CommandError = CommandError::IncorrectFormat {
    usage: "MISSILE INIT (x-coordinate), (y-coordinate)",
    example: "MISSILE INIT 0, 0",
};
const DEGREE_FORMAT: CommandError = CommandError::IncorrectFormat {
    usage: "DEGREE (sign)(magnitude)",
    example: "DEGREE +45",
};
const UP_FORMAT: CommandError = CommandError::IncorrectFormat {
    usage: "UP (shift_distance) (timestamp)",
    example: "UP 5 45",
};
const LAUNCH_FORMAT: CommandError = CommandError::IncorrectFormat {
    usage: "LAUNCH (initial_velocity)",
    example: "LAUNCH 45",
};
const PLOT_FORMAT: CommandError = CommandError::IncorrectFormat {
    usage: "PLOT [output-path]",
    example: "PLOT flight.svg",
};

fn parse_number(value: &str, format: &CommandError) -> Result<f64, CommandError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format.clone()),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Ok(Command::Quit);
        };

        match name {
            "q" => Ok(Command::Quit),
            "MISSILE" => match args {
                ["INIT", x, y] => Ok(Command::Init {
                    x: parse_number(&x.replace(',', ""), &INIT_FORMAT)?,
                    y: parse_number(y, &INIT_FORMAT)?,
                }),
                _ => Err(INIT_FORMAT),
            },
            "DEGREE" => match args {
                [delta] => Ok(Command::Degree(parse_number(delta, &DEGREE_FORMAT)?)),
                _ => Err(DEGREE_FORMAT),
            },
            "UP" => match args {
                [distance, timestamp] => {
                    let distance = parse_number(distance, &UP_FORMAT)?;
                    let timestamp = parse_number(timestamp, &UP_FORMAT)?;
                    if timestamp < 0.0 {
                        return Err(UP_FORMAT);
                    }
                    Ok(Command::Up {
                        distance,
                        timestamp,
                    })
                }
                _ => Err(UP_FORMAT),
            },
            "LAUNCH" => match args {
                [velocity] => {
                    let velocity = parse_number(velocity, &LAUNCH_FORMAT)?;
                    if velocity < 0.0 {
                        return Err(LAUNCH_FORMAT);
                    }
                    Ok(Command::Launch(velocity))
                }
                _ => Err(LAUNCH_FORMAT),
            },
            "LANDING_POSITION" => Ok(Command::LandingPosition),
            "PLOT" => match args {
                [] => Ok(Command::Plot(None)),
                [path] => Ok(Command::Plot(Some(PathBuf::from(path)))),
                _ => Err(PLOT_FORMAT),
            },
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Missile(#[from] MissileError),
    #[error(transparent)]
    Plot(#[from] PlotError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Success,
    Landing(Point),
    Plotted(PathBuf),
    Quit,
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Success => write!(f, "Success"),
            Reply::Landing(point) => write!(f, "{point}"),
            Reply::Plotted(path) => write!(f, "Trajectory written to {}", path.display()),
            Reply::Quit => Ok(()),
        }
    }
}

/// The model plus the settings needed to drive it from text commands.
pub struct Session {
    model: TrajectoryModel,
    settings: Settings,
    quiet: bool,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            model: TrajectoryModel::new(settings.gravity_mps2),
            settings,
            quiet: false,
        }
    }

    /// Suppresses the banner and the prompt.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn model(&self) -> &TrajectoryModel {
        &self.model
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, SessionError> {
        match command {
            Command::Init { x, y } => self.model.set_initial_position(x, y)?,
            Command::Degree(delta) => self.model.increase_angle(delta)?,
            Command::Up {
                distance,
                timestamp,
            } => self.model.register_up_shift(distance, timestamp)?,
            Command::Launch(velocity) => self.model.launch(velocity)?,
            Command::LandingPosition => {
                return Ok(Reply::Landing(self.model.landing_position()?));
            }
            Command::Plot(path) => {
                let points = self.model.flight_path(self.settings.plot.samples)?;
                let path = path.unwrap_or_else(|| plot::default_plot_path(&self.settings.plot));
                plot::render_flight_path(&path, &points, &self.settings.plot)?;
                return Ok(Reply::Plotted(path));
            }
            Command::Quit => return Ok(Reply::Quit),
        }
        Ok(Reply::Success)
    }

    pub fn execute_line(&mut self, line: &str) -> Result<Reply, SessionError> {
        let command = Command::parse(line)?;
        log::debug!("executing {command:?}");
        self.execute(command)
    }

    /// Reads commands until `q`, an empty line, end of input, or (by default)
    /// a printed landing position. Command failures are reported and the
    /// loop carries on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        if !self.quiet {
            writeln!(output, "Enter 'q' to quit")?;
        }

        let mut lines = input.lines();
        loop {
            if !self.quiet {
                write!(output, "Command:")?;
                output.flush()?;
            }

            let Some(line) = lines.next().transpose()? else {
                break;
            };

            match self.execute_line(&line) {
                Ok(Reply::Quit) => break,
                Ok(reply @ Reply::Landing(_)) => {
                    writeln!(output, "{reply}")?;
                    if self.settings.exit_after_landing {
                        break;
                    }
                }
                Ok(reply) => writeln!(output, "{reply}")?,
                Err(err) => {
                    log::debug!("command {line:?} failed: {err:?}");
                    writeln!(output, "{err}")?;
                }
            }
        }

        output.flush()
    }
}
