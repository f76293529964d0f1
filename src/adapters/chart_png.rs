//! PNG chart rendering for the moving-averages plot.
//!
//! Close, 10-day SMA, and 50-day SMA as three overlaid polylines on a white
//! canvas with plain axis lines. Points are scaled manually; warmup slots in
//! the SMA columns are simply not drawn, so each SMA line starts where its
//! window fills.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::error::StocklensError;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;
const PADDING: f64 = 40.0;

pub fn render_moving_averages(
    path: &Path,
    ticker: &str,
    closes: &[f64],
    sma_10: &[Option<f64>],
    sma_50: &[Option<f64>],
) -> Result<(), StocklensError> {
    if closes.is_empty() {
        return Ok(());
    }

    let chart_err = |reason: String| StocklensError::Chart {
        ticker: ticker.to_string(),
        reason,
    };

    let mut all_values: Vec<f64> = closes.to_vec();
    all_values.extend(sma_10.iter().flatten());
    all_values.extend(sma_50.iter().flatten());

    let min_value = all_values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_value = all_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH as f64 - 2.0 * PADDING;
    let plot_height = HEIGHT as f64 - 2.0 * PADDING;

    let range = max_value - min_value;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if closes.len() > 1 {
        plot_width / (closes.len() - 1) as f64
    } else {
        0.0
    };

    let to_point = |i: usize, value: f64| {
        let x = PADDING + i as f64 * scale_x;
        let y = HEIGHT as f64 - PADDING - (value - min_value) * scale_y;
        (x as i32, y as i32)
    };

    let close_points: Vec<(i32, i32)> = closes
        .iter()
        .enumerate()
        .map(|(i, &v)| to_point(i, v))
        .collect();
    let sma_points = |series: &[Option<f64>]| -> Vec<(i32, i32)> {
        series
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|value| to_point(i, value)))
            .collect()
    };

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(e.to_string()))?;

    // Axis lines: left and bottom.
    let left = PADDING as i32;
    let bottom = (HEIGHT as f64 - PADDING) as i32;
    let right = (WIDTH as f64 - PADDING) as i32;
    let top = PADDING as i32;
    root.draw(&PathElement::new(vec![(left, top), (left, bottom)], &BLACK))
        .map_err(|e| chart_err(e.to_string()))?;
    root.draw(&PathElement::new(
        vec![(left, bottom), (right, bottom)],
        &BLACK,
    ))
    .map_err(|e| chart_err(e.to_string()))?;

    root.draw(&PathElement::new(close_points, BLUE.stroke_width(2)))
        .map_err(|e| chart_err(e.to_string()))?;
    root.draw(&PathElement::new(
        sma_points(sma_10),
        GREEN.stroke_width(2),
    ))
    .map_err(|e| chart_err(e.to_string()))?;
    root.draw(&PathElement::new(sma_points(sma_50), RED.stroke_width(2)))
        .map_err(|e| chart_err(e.to_string()))?;

    root.present().map_err(|e| chart_err(e.to_string()))?;
    Ok(())
}
