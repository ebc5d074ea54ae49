//! Flight path export with plotters.

use std::path::{Path, PathBuf};

use chrono::Local;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::config::PlotSettings;
use crate::core::window::fixed_ratio_window;

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Nothing to plot")]
    EmptyPath,
    #[error("could not create plot directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not render plot: {0}")]
    Render(String),
}

/// `trajectory_<timestamp>.png` inside the configured output directory.
pub fn default_plot_path(settings: &PlotSettings) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    settings.output_dir.join(format!("trajectory_{stamp}.png"))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Writes the path to `path`, as SVG when the extension says so and PNG
/// otherwise.
pub fn render_flight_path(
    path: &Path,
    points: &[(f64, f64)],
    settings: &PlotSettings,
) -> Result<(), PlotError> {
    if points.is_empty() {
        return Err(PlotError::EmptyPath);
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let size = (settings.width, settings.height);
    if is_svg(path) {
        draw(SVGBackend::new(path, size).into_drawing_area(), points)?;
    } else {
        draw(BitMapBackend::new(path, size).into_drawing_area(), points)?;
    }
    log::info!("flight path written to {}", path.display());
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
) -> Result<(), PlotError> {
    let render = |err: DrawingAreaErrorKind<DB::ErrorType>| PlotError::Render(err.to_string());
    let window = fixed_ratio_window(points);

    root.fill(&WHITE).map_err(render)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Missile trajectory", ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(window.x_min..window.x_max, 0.0..window.y_max)
        .map_err(render)?;

    chart
        .configure_mesh()
        .x_desc("Distance (m)")
        .y_desc("Height (m)")
        .draw()
        .map_err(render)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &RED))
        .map_err(render)?;

    if let Some(&landing) = points.last() {
        chart
            .draw_series(std::iter::once(Circle::new(landing, 4, BLUE.filled())))
            .map_err(render)?;
    }

    root.present().map_err(render)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_timestamped_png() {
        let settings = PlotSettings {
            output_dir: PathBuf::from("plots"),
            ..PlotSettings::default()
        };
        let path = default_plot_path(&settings);

        assert!(path.starts_with("plots"));
        let name = path.file_name().and_then(|n| n.to_str()).expect("utf-8 name");
        assert!(name.starts_with("trajectory_"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "trajectory_20260101_120000.png".len());
    }

    #[test]
    fn svg_is_picked_by_extension() {
        assert!(is_svg(Path::new("out/flight.svg")));
        assert!(is_svg(Path::new("FLIGHT.SVG")));
        assert!(!is_svg(Path::new("flight.png")));
        assert!(!is_svg(Path::new("flight")));
    }

    #[test]
    fn refuses_empty_path() {
        let err = render_flight_path(Path::new("unused.svg"), &[], &PlotSettings::default())
            .expect_err("nothing to draw");
        assert!(matches!(err, PlotError::EmptyPath));
    }
}
