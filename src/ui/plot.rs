use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::ColorMap;
use crate::figure::{Figure, PieSlice, Trace};
use crate::reactive::OutputId;
use crate::state::AppState;

const PIE_HEIGHT: f32 = 420.0;
const SEGMENTS_PER_TURN: f64 = 128.0;

// ---------------------------------------------------------------------------
// Chart slot
// ---------------------------------------------------------------------------

/// Draw whatever figure the binding layer last produced for `output`.
pub fn chart_slot(ui: &mut Ui, state: &AppState, output: OutputId) {
    let Some(figure) = state.dispatcher.figure(output) else {
        ui.label(RichText::new("Waiting for data…").weak());
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&figure.title);
    });

    let fallback = ColorMap::new(std::iter::empty());
    match &figure.trace {
        Trace::Pie { names, .. } => {
            let colors = state.palettes.for_column(names).unwrap_or(&fallback);
            pie_chart(ui, output.component_id(), figure, colors);
        }
        Trace::Scatter { color, .. } => {
            let colors = state.palettes.for_column(color).unwrap_or(&fallback);
            scatter_chart(ui, output.component_id(), figure, colors);
        }
    }
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// One drawable pie slice on the unit circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub fraction: f64,
    /// Centre followed by the arc, clockwise from 12 o'clock.
    pub outline: Vec<[f64; 2]>,
    /// Angle through the middle of the wedge.
    pub mid_angle: f64,
}

/// Lay out the slices as wedges; zero-valued slices take no space.
pub fn pie_wedges(slices: &[PieSlice]) -> Vec<Wedge> {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = FRAC_PI_2;
    let mut wedges = Vec::new();
    for slice in slices.iter().filter(|s| s.value > 0.0) {
        let fraction = slice.value / total;
        let sweep = fraction * TAU;
        let n = (fraction * SEGMENTS_PER_TURN).ceil().max(2.0) as usize;

        let mut outline = Vec::with_capacity(n + 2);
        outline.push([0.0, 0.0]);
        outline.extend((0..=n).map(|i| {
            let a = start - sweep * i as f64 / n as f64;
            [a.cos(), a.sin()]
        }));

        wedges.push(Wedge {
            label: slice.label.clone(),
            fraction,
            outline,
            mid_angle: start - sweep / 2.0,
        });
        start -= sweep;
    }
    wedges
}

fn pie_chart(ui: &mut Ui, id: &str, figure: &Figure, colors: &ColorMap) {
    let wedges = pie_wedges(figure.slices());
    if wedges.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new("No launches in the selected range").weak());
        });
    }

    let hover = figure.clone();
    Plot::new(id)
        .height(PIE_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.1)
        .include_y(1.1)
        .legend(Legend::default())
        .label_formatter(move |name: &str, _point: &PlotPoint| {
            match hover.slices().iter().find(|s| s.label == name) {
                Some(slice) => hover.hover_text(&slice.label, slice.value),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for wedge in &wedges {
                let color = colors.color_for(&wedge.label);
                let outline: PlotPoints = wedge.outline.iter().copied().collect();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .name(&wedge.label)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );

                let (x, y) = (0.65 * wedge.mid_angle.cos(), 0.65 * wedge.mid_angle.sin());
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(format!("{:.1}%", wedge.fraction * 100.0))
                            .color(Color32::WHITE),
                    )
                    .name(&wedge.label),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, id: &str, figure: &Figure, colors: &ColorMap) {
    let Trace::Scatter { x, y, .. } = &figure.trace else {
        return;
    };
    let (width, height) = figure
        .size
        .map(|s| (s.width, s.height))
        .unwrap_or((ui.available_width(), PIE_HEIGHT));

    let x_label = x.clone();
    let y_label = y.clone();

    ui.vertical_centered(|ui: &mut Ui| {
        Plot::new(id)
            .width(width.min(ui.available_width()))
            .height(height)
            .x_axis_label(x.as_str())
            .y_axis_label(y.as_str())
            .include_y(-0.2)
            .include_y(1.2)
            .include_x(0.0)
            .legend(Legend::default())
            .label_formatter(move |name: &str, value: &PlotPoint| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{name}\n{x_label}: {}\n{y_label}: {}", value.x, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for category in figure.categories() {
                    let points: PlotPoints = figure
                        .points()
                        .iter()
                        .filter(|p| p.category == category)
                        .map(|p| [p.x, p.y])
                        .collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(category)
                            .color(colors.color_for(category))
                            .radius(4.0)
                            .filled(true),
                    );
                }
            });
    });
}
