//! Rendering of sweep results to SVG figures.
//!
//! Pure consumer of the matrices produced by [`crate::experiment`]; no
//! statistics are computed here beyond binning and sample means.

use plotters::prelude::*;
use plotters::style::FontDesc;
use std::error::Error as StdError;
use std::path::Path;
use tracing::{info, warn};

use crate::experiment::{FormSweep, RiskSweep};

/// Number of histogram bins per risk-weight panel.
const HISTOGRAM_BINS: usize = 20;

/// Returns `preferred` when the font backend can measure it, otherwise falls
/// back to sans-serif with a logged warning.
pub fn resolve_font(preferred: &str) -> &str {
    let probe: FontDesc<'_> = (preferred, 12).into_font();
    match probe.box_size("0") {
        Ok(_) => preferred,
        Err(e) => {
            warn!(font = preferred, error = %e, "font unavailable, using sans-serif");
            "sans-serif"
        }
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(1e-6);
    (min - pad, max + pad)
}

fn bin_counts(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    let width = (max - min) / bins as f64;
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        let i = (((v - min) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    counts
}

fn log_output(path: &Path) {
    info!(path = %path.display(), "writing figure");
}

/// Standard deviation vs risk weight, one line per variational form.
pub fn plot_form_std(
    sweep: &FormSweep,
    out_path: &Path,
    font: &str,
) -> Result<(), Box<dyn StdError>> {
    log_output(out_path);
    let root = SVGBackend::new(out_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(sweep.alphas.iter().copied());
    let (y_min, y_max) = padded_range(sweep.std.iter().copied());

    let mut chart = ChartBuilder::on(&root)
        .caption("Energy spread vs risk weight", (font, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("risk weight")
        .y_desc("standard deviation")
        .draw()?;

    for (i, form) in sweep.forms.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.9);
        let points: Vec<(f64, f64)> = sweep
            .alphas
            .iter()
            .enumerate()
            .map(|(j, &alpha)| (alpha, sweep.std[(i, j)]))
            .collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(form.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2)));
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, Palette99::pick(i).filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.4))
        .draw()?;
    root.present()?;
    Ok(())
}

/// Deviation from the nearest exact eigenvalue vs risk weight, one panel per
/// variational form. A faint line connects the points; each point is colored
/// by its nearest-eigenstate index, with one legend entry per distinct index.
pub fn plot_form_deviation(
    sweep: &FormSweep,
    out_path: &Path,
    font: &str,
) -> Result<(), Box<dyn StdError>> {
    log_output(out_path);
    let root = SVGBackend::new(out_path, (900, 400 * sweep.forms.len() as u32)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((sweep.forms.len(), 1));

    let (x_min, x_max) = padded_range(sweep.alphas.iter().copied());
    let (y_min, y_max) = padded_range(sweep.deviation.iter().copied());

    for (i, (form, panel)) in sweep.forms.iter().zip(panels.iter()).enumerate() {
        let mut chart = ChartBuilder::on(panel)
            .caption(
                format!("Deviation from nearest eigenvalue, {form}"),
                (font, 18),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc("risk weight")
            .y_desc("|E - E_exact|")
            .draw()?;

        let underlay: Vec<(f64, f64)> = sweep
            .alphas
            .iter()
            .enumerate()
            .map(|(j, &alpha)| (alpha, sweep.deviation[(i, j)]))
            .collect();
        chart.draw_series(LineSeries::new(underlay, BLACK.mix(0.25)))?;

        let mut seen = Vec::new();
        for (j, &alpha) in sweep.alphas.iter().enumerate() {
            let state = sweep.nearest_state[(i, j)];
            let color = Palette99::pick(state);
            let series = chart.draw_series(std::iter::once(Circle::new(
                (alpha, sweep.deviation[(i, j)]),
                4,
                color.filled(),
            )))?;
            if !seen.contains(&state) {
                seen.push(state);
                series
                    .label(format!("state {state}"))
                    .legend(move |(x, y)| Circle::new((x + 9, y), 4, color.filled()));
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK.mix(0.25))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// One histogram panel per risk weight, stacked with a shared x-range and a
/// vertical marker at the per-weight sample mean.
fn plot_stacked_histograms(
    alphas: &[f64],
    rows: &[Vec<f64>],
    caption: &str,
    x_label: &str,
    out_path: &Path,
    font: &str,
) -> Result<(), Box<dyn StdError>> {
    log_output(out_path);
    let root =
        SVGBackend::new(out_path, (900, 260 * alphas.len() as u32)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((alphas.len(), 1));

    let (x_min, x_max) = padded_range(rows.iter().flatten().copied());
    let bin_width = (x_max - x_min) / HISTOGRAM_BINS as f64;

    for (i, (&alpha, panel)) in alphas.iter().zip(panels.iter()).enumerate() {
        let counts = bin_counts(&rows[i], x_min, x_max, HISTOGRAM_BINS);
        let y_max = counts.iter().copied().max().unwrap_or(1).max(1) as f64 * 1.1;
        let mean = rows[i].iter().sum::<f64>() / rows[i].len().max(1) as f64;

        let bottom = i + 1 == alphas.len();
        let mut chart = ChartBuilder::on(panel)
            .caption(format!("{caption}, risk weight {alpha:.2}"), (font, 16))
            .margin(8)
            .x_label_area_size(if bottom { 40 } else { 20 })
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;
        let mut mesh = chart.configure_mesh();
        mesh.y_desc("count");
        if bottom {
            mesh.x_desc(x_label);
        }
        mesh.draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(b, &count)| {
            let x0 = x_min + b as f64 * bin_width;
            Rectangle::new(
                [(x0, 0.0), (x0 + bin_width, count as f64)],
                BLUE.mix(0.55).filled(),
            )
        }))?;

        chart.draw_series(std::iter::once(PathElement::new(
            vec![(mean, 0.0), (mean, y_max)],
            BLACK.stroke_width(2),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Renders the two risk-sweep figures: shifted energies and standard
/// deviations, one histogram panel per risk weight.
pub fn plot_risk_histograms(
    sweep: &RiskSweep,
    out_dir: &Path,
    font: &str,
) -> Result<(), Box<dyn StdError>> {
    let energies: Vec<Vec<f64>> = (0..sweep.alphas.len())
        .map(|i| {
            sweep
                .energy
                .row(i)
                .iter()
                .map(|&e| e + sweep.shift)
                .collect()
        })
        .collect();
    plot_stacked_histograms(
        &sweep.alphas,
        &energies,
        "Recovered energy",
        "energy (Hartree)",
        &out_dir.join("risk_energy_hist.svg"),
        font,
    )?;

    let stds: Vec<Vec<f64>> = (0..sweep.alphas.len())
        .map(|i| sweep.std.row(i).iter().copied().collect())
        .collect();
    plot_stacked_histograms(
        &sweep.alphas,
        &stds,
        "Energy spread",
        "standard deviation",
        &out_dir.join("risk_std_hist.svg"),
        font,
    )
}

/// Renders the two form-sweep figures into `out_dir`.
pub fn plot_form_sweep(
    sweep: &FormSweep,
    out_dir: &Path,
    font: &str,
) -> Result<(), Box<dyn StdError>> {
    plot_form_std(sweep, &out_dir.join("form_std.svg"), font)?;
    plot_form_deviation(sweep, &out_dir.join("form_deviation.svg"), font)
}
