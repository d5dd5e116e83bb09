use serde::Serialize;

use crate::data::model::LaunchRecord;

// ---------------------------------------------------------------------------
// Figure – declarative description of one chart
// ---------------------------------------------------------------------------

/// A chart ready to be drawn: what kind, the data behind it, and how to label it.
///
/// Figures are rebuilt from scratch on every binding invocation; the UI only
/// keeps the latest one per output slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    /// Plotly-style hover template with `%{label}` / `%{value}` placeholders
    /// and `<br>` line breaks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<CanvasSize>,
    pub trace: Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Pie {
        /// Column the slices are named after.
        names: String,
        /// Column summed into slice values; `None` means row counts.
        #[serde(skip_serializing_if = "Option::is_none")]
        values: Option<String>,
        slices: Vec<PieSlice>,
    },
    Scatter {
        x: String,
        y: String,
        color: String,
        points: Vec<ScatterPoint>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

impl PieSlice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Colour group of the point.
    pub category: String,
}

impl ScatterPoint {
    pub fn new(x: f64, y: f64, category: impl Into<String>) -> Self {
        Self {
            x,
            y,
            category: category.into(),
        }
    }
}

impl Figure {
    pub fn pie(
        title: impl Into<String>,
        names: &str,
        values: Option<&str>,
        slices: Vec<PieSlice>,
    ) -> Self {
        Figure {
            title: title.into(),
            hover_template: None,
            size: None,
            trace: Trace::Pie {
                names: names.to_string(),
                values: values.map(str::to_string),
                slices,
            },
        }
    }

    pub fn scatter(
        title: impl Into<String>,
        x: &str,
        y: &str,
        color: &str,
        points: Vec<ScatterPoint>,
    ) -> Self {
        Figure {
            title: title.into(),
            hover_template: None,
            size: None,
            trace: Trace::Scatter {
                x: x.to_string(),
                y: y.to_string(),
                color: color.to_string(),
                points,
            },
        }
    }

    pub fn with_hover_template(mut self, template: &str) -> Self {
        self.hover_template = Some(template.to_string());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(CanvasSize { width, height });
        self
    }

    /// Pie slices; empty for other chart kinds.
    pub fn slices(&self) -> &[PieSlice] {
        match &self.trace {
            Trace::Pie { slices, .. } => slices,
            Trace::Scatter { .. } => &[],
        }
    }

    /// Scatter points; empty for other chart kinds.
    pub fn points(&self) -> &[ScatterPoint] {
        match &self.trace {
            Trace::Scatter { points, .. } => points,
            Trace::Pie { .. } => &[],
        }
    }

    /// Scatter colour groups in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in self.points() {
            if !seen.contains(&p.category.as_str()) {
                seen.push(&p.category);
            }
        }
        seen
    }

    /// Fill the hover template for one slice or point.
    pub fn hover_text(&self, label: &str, value: f64) -> String {
        match &self.hover_template {
            Some(t) => t
                .replace("%{label}", label)
                .replace("%{value}", &value.to_string())
                .replace("<br>", "\n"),
            None => format!("{label}: {value}"),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Aggregation helpers
// ---------------------------------------------------------------------------

/// Group rows by `key` (first-appearance order) and sum `value` per group.
pub fn sum_by<K, V>(rows: &[&LaunchRecord], key: K, value: V) -> Vec<PieSlice>
where
    K: Fn(&LaunchRecord) -> String,
    V: Fn(&LaunchRecord) -> f64,
{
    let mut slices: Vec<PieSlice> = Vec::new();
    for rec in rows {
        let label = key(rec);
        match slices.iter_mut().find(|s| s.label == label) {
            Some(slice) => slice.value += value(rec),
            None => slices.push(PieSlice::new(label, value(rec))),
        }
    }
    slices
}

/// Group rows by `key` (first-appearance order) and count rows per group.
pub fn count_by<K>(rows: &[&LaunchRecord], key: K) -> Vec<PieSlice>
where
    K: Fn(&LaunchRecord) -> String,
{
    sum_by(rows, key, |_| 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_by_keeps_zero_groups_in_first_seen_order() {
        let rows = [
            LaunchRecord::new("B", 1.0, 0, "FT"),
            LaunchRecord::new("A", 1.0, 1, "FT"),
            LaunchRecord::new("B", 1.0, 0, "FT"),
            LaunchRecord::new("A", 1.0, 1, "FT"),
        ];
        let refs: Vec<&LaunchRecord> = rows.iter().collect();
        let slices = sum_by(&refs, |r| r.launch_site.clone(), |r| r.class as f64);
        assert_eq!(
            slices,
            vec![PieSlice::new("B", 0.0), PieSlice::new("A", 2.0)]
        );

        let counts = count_by(&refs, |r| r.class.to_string());
        assert_eq!(counts[0], PieSlice::new("0", 2.0));
        assert_eq!(counts[1], PieSlice::new("1", 2.0));
    }

    #[test]
    fn hover_template_is_filled() {
        let fig = Figure::pie("t", "Launch Site", Some("class"), Vec::new())
            .with_hover_template("Site: %{label}<br>Count: %{value}");
        assert_eq!(fig.hover_text("KSC LC-39A", 10.0), "Site: KSC LC-39A\nCount: 10");

        let plain = Figure::pie("t", "class", None, Vec::new());
        assert_eq!(plain.hover_text("1", 2.5), "1: 2.5");
    }

    #[test]
    fn scatter_categories_and_json() {
        let points = vec![
            ScatterPoint::new(1.0, 0.0, "v1.1"),
            ScatterPoint::new(2.0, 1.0, "FT"),
            ScatterPoint::new(3.0, 1.0, "v1.1"),
        ];
        let fig = Figure::scatter(
            "s",
            "Payload Mass (kg)",
            "class",
            "Booster Version Category",
            points,
        )
        .with_size(1000.0, 500.0);
        assert_eq!(fig.categories(), vec!["v1.1", "FT"]);
        assert!(fig.slices().is_empty());

        let json: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
        assert_eq!(json["trace"]["type"], "scatter");
        assert_eq!(json["size"]["width"], 1000.0);
        assert_eq!(json["trace"]["points"].as_array().unwrap().len(), 3);
    }
}
