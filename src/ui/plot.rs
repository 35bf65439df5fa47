use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotBounds, PlotPoint, PlotPoints, PlotUi,
    Points, Text, VLine,
};

use crate::chart::{
    AxisKind, BarChartSpec, ChartBody, ColorLegend, LineSeries, ParallelSpec, ScatterSpec,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart view (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart in the central panel.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let Some(result) = state.current_chart() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open the market and coordinate tables  (File → Open…)");
        });
        return;
    };

    let spec = match result {
        Ok(spec) => spec,
        Err(e) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new(format!("Cannot draw '{}': {e}", state.chart)).color(Color32::RED));
            });
            return;
        }
    };

    ui.heading(&spec.title);
    match &spec.body {
        ChartBody::Scatter(ScatterSpec { legend: Some(legend), .. })
        | ChartBody::Parallel(ParallelSpec { legend: Some(legend), .. }) => {
            color_legend(ui, legend);
        }
        ChartBody::Scatter(_) | ChartBody::Parallel(_) => {}
        ChartBody::Bars(_) | ChartBody::Lines(_) => {}
    }
    ui.separator();

    let plot = Plot::new("chart_plot")
        .legend(Legend::default())
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    match &spec.body {
        ChartBody::Bars(bars) => {
            let plot = match bars.categories.clone() {
                Some(categories) => plot.x_axis_formatter(
                    move |mark: GridMark, _range: &RangeInclusive<f64>| category_tick(&categories, mark.value),
                ),
                None => plot,
            };
            plot.show(ui, |plot_ui| draw_bars(plot_ui, bars));
        }
        ChartBody::Lines(lines) => {
            plot.show(ui, |plot_ui| draw_lines(plot_ui, lines));
        }
        ChartBody::Scatter(scatter) => {
            plot.data_aspect(1.0)
                .show(ui, |plot_ui| draw_scatter(plot_ui, scatter));
        }
        ChartBody::Parallel(parallel) => {
            plot.show_axes(false)
                .show_grid(false)
                .show(ui, |plot_ui| draw_parallel(plot_ui, parallel));
        }
    }
}

fn color_legend(ui: &mut Ui, legend: &ColorLegend) {
    ui.label(format!(
        "Colour: {} ({} scale, {:.2} – {:.2})",
        legend.metric.label(),
        legend.scale,
        legend.min,
        legend.max
    ));
}

/// Tick label for a categorical axis: only integral positions get a name.
fn category_tick(categories: &[String], value: f64) -> String {
    if value.fract().abs() > f64::EPSILON || value < 0.0 {
        return String::new();
    }
    categories.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Per-body renderers
// ---------------------------------------------------------------------------

fn draw_bars(plot_ui: &mut PlotUi, spec: &BarChartSpec) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;

    for series in &spec.series {
        let bars: Vec<Bar> = series
            .bars
            .iter()
            .map(|b| {
                x_min = x_min.min(b.x);
                x_max = x_max.max(b.x);
                Bar::new(b.x, b.value)
                    .width(series.width)
                    .fill(series.color)
                    .name(&b.label)
            })
            .collect();
        plot_ui.bar_chart(BarChart::new(bars).name(&series.name).color(series.color));

        if spec.value_labels {
            for b in &series.bars {
                plot_ui.text(
                    Text::new(PlotPoint::new(b.x, b.value), format!("{}", b.value as i64))
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        }
    }

    if let Some((lo, hi)) = spec.y_range {
        if x_min.is_finite() && x_max.is_finite() {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min - 1.0, lo], [x_max + 1.0, hi]));
        }
    }
}

fn draw_lines(plot_ui: &mut PlotUi, lines: &[LineSeries]) {
    for series in lines {
        plot_ui.line(
            Line::new(PlotPoints::from(series.points.clone()))
                .name(&series.name)
                .color(series.color)
                .width(2.0),
        );
        plot_ui.points(
            Points::new(PlotPoints::from(series.points.clone()))
                .color(series.color)
                .radius(3.0),
        );
    }
}

fn draw_scatter(plot_ui: &mut PlotUi, spec: &ScatterSpec) {
    for p in &spec.points {
        plot_ui.points(
            Points::new(PlotPoints::from(vec![[p.x, p.y]]))
                .name(&p.label)
                .color(p.color)
                .radius(p.radius)
                .filled(true),
        );
    }
}

/// Parallel axes at x = 0, 1, 2, …; every value is placed at its
/// normalised position along its own axis.
fn draw_parallel(plot_ui: &mut PlotUi, spec: &ParallelSpec) {
    for (i, axis) in spec.axes.iter().enumerate() {
        let x = i as f64;
        plot_ui.vline(VLine::new(x).color(Color32::GRAY).width(1.0));
        plot_ui.text(
            Text::new(PlotPoint::new(x, 1.08), RichText::new(&axis.label).strong())
                .anchor(Align2::CENTER_BOTTOM),
        );
        match &axis.kind {
            AxisKind::Numeric { min, max } => {
                plot_ui.text(
                    Text::new(PlotPoint::new(x, -0.04), format!("{min:.2}")).anchor(Align2::CENTER_TOP),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(x, 1.04), format!("{max:.2}")).anchor(Align2::CENTER_BOTTOM),
                );
            }
            AxisKind::Categorical(categories) => {
                for (j, name) in categories.iter().enumerate() {
                    let y = axis.position(j as f64);
                    plot_ui.text(
                        Text::new(PlotPoint::new(x - 0.02, y), name.as_str())
                            .anchor(Align2::RIGHT_CENTER),
                    );
                }
            }
        }
    }

    for line in &spec.lines {
        let points: Vec<[f64; 2]> = spec
            .axes
            .iter()
            .zip(&line.values)
            .enumerate()
            .map(|(i, (axis, &v))| [i as f64, axis.position(v)])
            .collect();
        plot_ui.line(
            Line::new(PlotPoints::from(points))
                .name(&line.label)
                .color(line.color)
                .width(2.0),
        );
    }
}
