pub const DISTANCE_TO_HEIGHT_RATIO: f64 = 2.0; // x:y data window ratio

const X_PADDING_RATIO: f64 = 0.06;
const Y_PADDING_RATIO: f64 = 0.10;

/// Data-space rectangle a flight path is drawn in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// Pads the path's bounding box and stretches one axis so the window keeps a
/// fixed distance-to-height ratio. The ground line `y = 0` is always included.
pub fn fixed_ratio_window(points: &[(f64, f64)]) -> AxisWindow {
    let x_min = points.iter().map(|&(x, _)| x).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|&(x, _)| x).fold(f64::NEG_INFINITY, f64::max);
    let y_max = points.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let x_min = if x_min.is_finite() { x_min } else { 0.0 };
    let raw_x_span = if x_max.is_finite() { x_max - x_min } else { 0.0 };

    let x_pad = raw_x_span.max(1.0) * X_PADDING_RATIO;
    let y_pad = y_max.max(1.0) * Y_PADDING_RATIO;

    let mut x_span = (raw_x_span + 2.0 * x_pad).max(1.0);
    let mut y_span = (y_max + y_pad).max(1.0);

    if x_span / y_span < DISTANCE_TO_HEIGHT_RATIO {
        x_span = y_span * DISTANCE_TO_HEIGHT_RATIO;
    } else {
        y_span = x_span / DISTANCE_TO_HEIGHT_RATIO;
    }

    let x_centre = x_min + raw_x_span / 2.0;
    AxisWindow {
        x_min: x_centre - x_span / 2.0,
        x_max: x_centre + x_span / 2.0,
        y_max: y_span,
    }
}
