pub const EARTH_GRAVITY_MPS2: f64 = 9.81;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FlightError {
    #[error("No real landing time: vy^2 + 2*g*y is negative ({discriminant}).")]
    NoRealLanding { discriminant: f64 },
}

/// Everything the kinematics needs once the missile has left the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchState {
    pub x0: f64,
    pub y0: f64,
    pub vx: f64,
    pub vy: f64,
    pub gravity: f64,
}

impl LaunchState {
    /// Vertical velocity at `time_s` seconds after launch.
    pub fn vertical_velocity_at(&self, time_s: f64) -> f64 {
        self.vy - self.gravity * time_s
    }
}

/// A shift that was applied during integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedShift {
    pub time_s: f64,
    pub height_before_m: f64,
    pub height_after_m: f64,
}

/// Where up-shift integration left the missile: the last shift instant and
/// the altitude right after it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftedFlight {
    pub time_elapsed_s: f64,
    pub y_coordinate_m: f64,
    pub applied: Vec<AppliedShift>,
}

pub fn velocity_components(speed_mps: f64, angle_deg: f64) -> (f64, f64) {
    let theta = angle_deg.to_radians();
    (speed_mps * theta.cos(), speed_mps * theta.sin())
}

/// Altitude after free flight of `dt_s` seconds from height `y_m` with
/// vertical velocity `vy_mps`.
pub fn height_after(y_m: f64, vy_mps: f64, dt_s: f64, gravity: f64) -> f64 {
    vy_mps * dt_s - 0.5 * gravity * dt_s * dt_s + y_m
}

/// Positive root of `y + vy*t - g*t^2/2 = 0`.
pub fn landing_time(y_m: f64, vy_mps: f64, gravity: f64) -> Result<f64, FlightError> {
    let discriminant = vy_mps * vy_mps + 2.0 * gravity * y_m;
    if discriminant < 0.0 {
        return Err(FlightError::NoRealLanding { discriminant });
    }
    Ok((vy_mps + discriminant.sqrt()) / gravity)
}

/// Closed-form range without any shifts. Ground launches use `2*vx*vy/g`.
pub fn ballistic_range(launch: &LaunchState) -> Result<f64, FlightError> {
    if launch.y0 == 0.0 {
        return Ok(2.0 * launch.vx * launch.vy / launch.gravity);
    }
    Ok(launch.vx * landing_time(launch.y0, launch.vy, launch.gravity)?)
}

/// Walks the shifts in ascending time order, stopping at the first one the
/// missile would not live to see.
pub fn integrate_up_shifts<I>(launch: &LaunchState, shifts: I) -> ShiftedFlight
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut flight = ShiftedFlight {
        time_elapsed_s: 0.0,
        y_coordinate_m: launch.y0,
        applied: Vec::new(),
    };

    for (timestamp, distance) in shifts {
        let vy = launch.vertical_velocity_at(flight.time_elapsed_s);
        let flight_time = timestamp - flight.time_elapsed_s;
        let y_at_t = height_after(flight.y_coordinate_m, vy, flight_time, launch.gravity);
        if y_at_t < 0.0 {
            log::debug!("missile lands before the shift at t={timestamp}; ignoring the rest");
            break;
        }

        flight.time_elapsed_s = timestamp;
        flight.y_coordinate_m = y_at_t + distance;
        flight.applied.push(AppliedShift {
            time_s: timestamp,
            height_before_m: y_at_t,
            height_after_m: flight.y_coordinate_m,
        });
    }

    flight
}

/// Total time aloft once the shifts have been integrated.
pub fn shifted_flight_time(launch: &LaunchState, flight: &ShiftedFlight) -> Result<f64, FlightError> {
    let vy = launch.vertical_velocity_at(flight.time_elapsed_s);
    Ok(flight.time_elapsed_s + landing_time(flight.y_coordinate_m, vy, launch.gravity)?)
}

pub fn shifted_range<I>(launch: &LaunchState, shifts: I) -> Result<f64, FlightError>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let flight = integrate_up_shifts(launch, shifts);
    Ok(launch.vx * shifted_flight_time(launch, &flight)?)
}

/// Rounds the exact binary value to two decimals, ties to even.
pub fn round_to_centimetres(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Samples the flight path from launch to touchdown. Each applied shift adds
/// a vertical jump, so the path stays continuous when drawn as a line.
pub fn sample_trajectory(
    launch: &LaunchState,
    flight: &ShiftedFlight,
    samples: usize,
) -> Result<Vec<(f64, f64)>, FlightError> {
    let total_time = shifted_flight_time(launch, flight)?;
    let sample_count = samples.max(2);
    let mut shifts = flight.applied.iter().peekable();
    let mut points = Vec::with_capacity(sample_count + 1 + 2 * flight.applied.len());

    // Start time and height of the segment after the latest applied shift.
    let mut segment_start = 0.0;
    let mut segment_y = launch.y0;

    for i in 0..=sample_count {
        let t = (i as f64 * total_time) / sample_count as f64;

        while let Some(shift) = shifts.next_if(|shift| shift.time_s <= t) {
            let x = launch.x0 + launch.vx * shift.time_s;
            points.push((x, shift.height_before_m));
            points.push((x, shift.height_after_m));
            segment_start = shift.time_s;
            segment_y = shift.height_after_m;
        }

        let vy = launch.vertical_velocity_at(segment_start);
        let y = height_after(segment_y, vy, t - segment_start, launch.gravity);
        points.push((launch.x0 + launch.vx * t, y.max(0.0)));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn launch_45(x0: f64, y0: f64) -> LaunchState {
        let (vx, vy) = velocity_components(200f64.sqrt(), 45.0);
        LaunchState {
            x0,
            y0,
            vx,
            vy,
            gravity: EARTH_GRAVITY_MPS2,
        }
    }

    #[test]
    fn ground_launch_uses_symmetric_range() {
        let range = ballistic_range(&launch_45(0.0, 0.0)).expect("range should exist");
        assert_abs_diff_eq!(range, 200.0 / 9.81, epsilon = 1e-9);
    }

    #[test]
    fn elevated_launch_uses_general_formula() {
        let range = ballistic_range(&launch_45(0.0, 10.0)).expect("range should exist");
        assert_abs_diff_eq!(range, 27.7374739, epsilon = 1e-6);
    }

    #[test]
    fn shift_after_touchdown_is_ignored() {
        let launch = launch_45(0.0, 10.0);
        let flight = integrate_up_shifts(&launch, [(5.0, 100.0)]);

        assert!(flight.applied.is_empty());
        assert_eq!(flight.time_elapsed_s, 0.0);
        assert_eq!(flight.y_coordinate_m, 10.0);
        assert_eq!(
            shifted_range(&launch, [(5.0, 100.0)]).expect("range should exist"),
            ballistic_range(&launch).expect("range should exist")
        );
    }

    #[test]
    fn mid_flight_shift_boosts_altitude() {
        let launch = launch_45(0.0, 0.0);
        let flight = integrate_up_shifts(&launch, [(1.0, 5.0)]);

        let y_at_t = launch.vy - 0.5 * EARTH_GRAVITY_MPS2;
        assert_eq!(flight.time_elapsed_s, 1.0);
        assert_abs_diff_eq!(flight.y_coordinate_m, y_at_t + 5.0, epsilon = 1e-12);

        let range = shifted_range(&launch, [(1.0, 5.0)]).expect("range should exist");
        assert_abs_diff_eq!(range, 24.5410807, epsilon = 1e-6);
    }

    #[test]
    fn later_shifts_are_dropped_after_a_miss() {
        let launch = launch_45(0.0, 0.0);
        let flight = integrate_up_shifts(&launch, [(1.0, 5.0), (30.0, 50.0), (31.0, 50.0)]);

        assert_eq!(flight.applied.len(), 1);
        assert_eq!(flight.time_elapsed_s, 1.0);
    }

    #[test]
    fn sinking_below_ground_has_no_landing_time() {
        let launch = launch_45(0.0, 0.0);
        let err = shifted_range(&launch, [(1.0, -500.0)]).expect_err("should not land");
        assert!(matches!(err, FlightError::NoRealLanding { .. }));
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_centimetres(20.387359836901123), 20.39);
        assert_eq!(round_to_centimetres(-3.14159), -3.14);
    }

    #[test]
    fn rounding_follows_the_stored_value() {
        // 2.675 is stored as 2.67499999..., 10.125 is an exact tie.
        assert_eq!(round_to_centimetres(2.675), 2.67);
        assert_eq!(round_to_centimetres(10.125), 10.12);
        assert_eq!(round_to_centimetres(0.375), 0.38);
    }

    #[test]
    fn sampled_path_starts_at_launch_and_ends_on_ground() {
        let launch = launch_45(2.0, 0.0);
        let flight = integrate_up_shifts(&launch, [(1.0, 5.0)]);
        let points = sample_trajectory(&launch, &flight, 50).expect("path should exist");

        assert_eq!(points.first(), Some(&(2.0, 0.0)));
        let (last_x, last_y) = *points.last().expect("path is never empty");
        assert_abs_diff_eq!(last_x, 2.0 + 24.5410807, epsilon = 1e-6);
        assert_abs_diff_eq!(last_y, 0.0, epsilon = 1e-9);
        // 51 samples plus the two points of the jump.
        assert_eq!(points.len(), 53);
        assert!(points.iter().any(|&(_, y)| y > flight.applied[0].height_before_m));
    }
}
