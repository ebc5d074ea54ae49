//! Launch state machine for a single missile.
//!
//! A [`TrajectoryModel`] is configured (position, angle, up-shifts), launched
//! exactly once, and then only queried. Every configuration call after launch
//! fails with [`MissileError::PostLaunchMutation`].

use crate::core::ballistics::{
    self, EARTH_GRAVITY_MPS2, FlightError, LaunchState, ShiftedFlight,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LaunchRejection {
    #[error("Missile has not been initialized")]
    NotInitialized,
    #[error("Launch angle greater than or equal to 180 is not supported")]
    AngleTooLarge,
    #[error("Launch angle equal to 0 is not supported")]
    ZeroAngle,
    #[error("Negative y-coordinate is not supported")]
    NegativeY,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MissileError {
    #[error("This operation cannot be performed after launch")]
    PostLaunchMutation,
    #[error(transparent)]
    LaunchValidation(#[from] LaunchRejection),
    #[error("Missile has not been launched")]
    NotLaunched,
    #[error(transparent)]
    Flight(#[from] FlightError),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", float_repr(self.x), float_repr(self.y))
    }
}

/// Shortest round-trip text for a float, with exponent notation below 1e-4
/// and from 1e16 upwards, written as `1e+16` and `1.5e-07`.
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return format!("{value:?}");
    }

    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => scientific,
    }
}

/// Up-shifts keyed by timestamp, kept sorted ascending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpShifts {
    entries: Vec<(f64, f64)>,
}

impl UpShifts {
    pub fn insert(&mut self, timestamp: f64, distance: f64) {
        // Adding 0.0 folds -0.0 into 0.0 so both land on the same key.
        let timestamp = timestamp + 0.0;
        match self
            .entries
            .binary_search_by(|(t, _)| t.total_cmp(&timestamp))
        {
            Ok(index) => self.entries[index].1 = distance,
            Err(index) => self.entries.insert(index, (timestamp, distance)),
        }
    }

    pub fn get(&self, timestamp: f64) -> Option<f64> {
        let timestamp = timestamp + 0.0;
        self.entries
            .binary_search_by(|(t, _)| t.total_cmp(&timestamp))
            .ok()
            .map(|index| self.entries[index].1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(timestamp, distance)` pairs in ascending timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Launch {
    velocity_mps: f64,
    state: LaunchState,
}

#[derive(Clone, Debug)]
pub struct TrajectoryModel {
    gravity: f64,
    angle_deg: f64,
    initial_position: Option<Position>,
    up_shifts: UpShifts,
    launch: Option<Launch>,
}

impl Default for TrajectoryModel {
    fn default() -> Self {
        Self::new(EARTH_GRAVITY_MPS2)
    }
}

impl TrajectoryModel {
    pub fn new(gravity: f64) -> Self {
        Self {
            gravity,
            angle_deg: 0.0,
            initial_position: None,
            up_shifts: UpShifts::default(),
            launch: None,
        }
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn initial_position(&self) -> Option<Position> {
        self.initial_position
    }

    pub fn up_shifts(&self) -> &UpShifts {
        &self.up_shifts
    }

    pub fn is_launched(&self) -> bool {
        self.launch.is_some()
    }

    pub fn launch_velocity(&self) -> Option<f64> {
        self.launch.map(|launch| launch.velocity_mps)
    }

    fn ensure_pre_launch(&self) -> Result<(), MissileError> {
        if self.is_launched() {
            return Err(MissileError::PostLaunchMutation);
        }
        Ok(())
    }

    pub fn set_initial_position(&mut self, x: f64, y: f64) -> Result<(), MissileError> {
        self.ensure_pre_launch()?;
        self.initial_position = Some(Position { x, y });
        log::debug!("initial position set to ({x}, {y})");
        Ok(())
    }

    pub fn increase_angle(&mut self, delta_deg: f64) -> Result<(), MissileError> {
        self.ensure_pre_launch()?;
        self.angle_deg = normalize_angle(self.angle_deg + delta_deg);
        log::debug!("launch angle is now {} deg", self.angle_deg);
        Ok(())
    }

    pub fn register_up_shift(&mut self, distance: f64, timestamp: f64) -> Result<(), MissileError> {
        self.ensure_pre_launch()?;
        self.up_shifts.insert(timestamp, distance);
        log::debug!("up-shift of {distance} m registered at t={timestamp} s");
        Ok(())
    }

    pub fn launch(&mut self, velocity_mps: f64) -> Result<(), MissileError> {
        self.ensure_pre_launch()?;
        let position = self.validate_launch()?;

        let (vx, vy) = ballistics::velocity_components(velocity_mps, self.angle_deg);
        self.launch = Some(Launch {
            velocity_mps,
            state: LaunchState {
                x0: position.x,
                y0: position.y,
                vx,
                vy,
                gravity: self.gravity,
            },
        });
        log::info!(
            "launched at {velocity_mps} m/s, {} deg (vx={vx:.4}, vy={vy:.4})",
            self.angle_deg
        );
        Ok(())
    }

    fn validate_launch(&self) -> Result<Position, LaunchRejection> {
        let position = self.initial_position.ok_or(LaunchRejection::NotInitialized)?;
        if self.angle_deg >= 180.0 {
            return Err(LaunchRejection::AngleTooLarge);
        }
        if self.angle_deg == 0.0 {
            return Err(LaunchRejection::ZeroAngle);
        }
        if position.y < 0.0 {
            return Err(LaunchRejection::NegativeY);
        }
        Ok(position)
    }

    fn launch_state(&self) -> Result<&LaunchState, MissileError> {
        self.launch
            .as_ref()
            .map(|launch| &launch.state)
            .ok_or(MissileError::NotLaunched)
    }

    /// Horizontal flight distance from the launch point to touchdown.
    pub fn flight_range(&self) -> Result<f64, MissileError> {
        let launch = self.launch_state()?;
        let range = if self.up_shifts.is_empty() {
            ballistics::ballistic_range(launch)?
        } else {
            ballistics::shifted_range(launch, self.up_shifts.iter())?
        };
        Ok(range)
    }

    pub fn landing_position(&self) -> Result<Point, MissileError> {
        let launch = self.launch_state()?;
        let range = self.flight_range()?;
        Ok(Point {
            x: ballistics::round_to_centimetres(launch.x0 + range),
            y: 0.0,
        })
    }

    pub fn shifted_flight(&self) -> Result<ShiftedFlight, MissileError> {
        let launch = self.launch_state()?;
        Ok(ballistics::integrate_up_shifts(launch, self.up_shifts.iter()))
    }

    /// Sampled `(x, y)` path of the launched missile, for plotting.
    pub fn flight_path(&self, samples: usize) -> Result<Vec<(f64, f64)>, MissileError> {
        let launch = self.launch_state()?;
        let flight = self.shifted_flight()?;
        Ok(ballistics::sample_trajectory(launch, &flight, samples)?)
    }
}

/// Folds any angle into `[0, 360)`.
pub fn normalize_angle(angle_deg: f64) -> f64 {
    // `+ 0.0` turns a -0.0 remainder into 0.0.
    let wrapped = angle_deg.rem_euclid(360.0) + 0.0;
    // Tiny negative inputs round up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
