use crate::config::{DashboardConfig, SiteOption};
use crate::data::filter::{PayloadRange, Selection, SiteSelection};
use crate::data::model::Dataset;
use crate::reactive::{InputId, OutputId};

// ---------------------------------------------------------------------------
// Static description of the dashboard widgets
// ---------------------------------------------------------------------------

/// Everything the UI needs to draw its controls, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardLayout {
    pub title: String,
    pub site_dropdown: Dropdown,
    pub payload_slider: RangeSlider,
    /// Output slots in display order.
    pub outputs: [OutputId; 3],
}

impl DashboardLayout {
    pub fn new(config: &DashboardConfig, dataset: &Dataset) -> Self {
        let max = dataset.max_payload();
        let min = config.payload_lower_bound.min(max);
        Self {
            title: config.title.clone(),
            site_dropdown: Dropdown::new(&config.sites),
            payload_slider: RangeSlider::new(min, max),
            outputs: [
                OutputId::SuccessPieChart,
                OutputId::PayloadRangeLabel,
                OutputId::SuccessPayloadScatter,
            ],
        }
    }

    /// Control values before the user touches anything.
    pub fn default_selection(&self) -> Selection {
        Selection {
            site: self.site_dropdown.default.clone(),
            range: self.payload_slider.default,
        }
    }
}

// ---------------------------------------------------------------------------
// Site dropdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Dropdown {
    pub id: &'static str,
    /// "All Sites" first, then the configured sites.
    pub options: Vec<SiteOption>,
    pub placeholder: &'static str,
    pub default: SiteSelection,
}

impl Dropdown {
    pub const ALL_LABEL: &'static str = "All Sites";

    pub fn new(sites: &[SiteOption]) -> Self {
        let mut options = Vec::with_capacity(sites.len() + 1);
        options.push(SiteOption {
            label: Self::ALL_LABEL.to_string(),
            value: SiteSelection::ALL_VALUE.to_string(),
        });
        options.extend(sites.iter().cloned());
        Self {
            id: InputId::SiteDropdown.component_id(),
            options,
            placeholder: "Select a Launch Site",
            default: SiteSelection::All,
        }
    }

    /// Display label for a selection; falls back to the raw value.
    pub fn label_for<'a>(&'a self, selection: &'a SiteSelection) -> &'a str {
        let value = selection.value();
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
            .unwrap_or(value)
    }

    /// Options whose label or value contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&SiteOption> {
        let query = query.trim().to_lowercase();
        self.options
            .iter()
            .filter(|o| {
                query.is_empty()
                    || o.label.to_lowercase().contains(&query)
                    || o.value.to_lowercase().contains(&query)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Payload range slider
// ---------------------------------------------------------------------------

/// Which end of the range the user dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSlider {
    pub id: &'static str,
    pub min: f64,
    pub max: f64,
    /// Increment between positions; 0 means continuous.
    pub step: f64,
    /// Labelled tick positions.
    pub marks: Vec<f64>,
    pub default: PayloadRange,
}

impl RangeSlider {
    const STEPS: f64 = 100.0;
    const MARK_INTERVALS: f64 = 10.0;

    pub fn new(min: f64, max: f64) -> Self {
        Self {
            id: InputId::PayloadSlider.component_id(),
            min,
            max,
            step: (max - min) / Self::STEPS,
            marks: Self::marks(min, max),
            default: PayloadRange::new(min, max),
        }
    }

    /// Ticks every whole `(max - min) / 10` kg from `min` up to `max`.
    ///
    /// When that stride rounds down to zero the ticks are just the two ends,
    /// or a single tick if they coincide.
    fn marks(min: f64, max: f64) -> Vec<f64> {
        let stride = ((max - min) / Self::MARK_INTERVALS).floor();
        if stride < 1.0 {
            return if max > min { vec![min, max] } else { vec![min] };
        }
        (0u32..)
            .map(|k| min + f64::from(k) * stride)
            .take_while(|v| *v <= max)
            .collect()
    }

    /// Keep both handles inside the bounds and in order.  The handle that
    /// was not dragged is pushed along when the other one crosses it.
    pub fn clamp(&self, lo: f64, hi: f64, moved: Handle) -> PayloadRange {
        let lo = self.snap(lo);
        let hi = self.snap(hi);
        match moved {
            Handle::Low if lo > hi => PayloadRange::new(lo, lo),
            Handle::High if hi < lo => PayloadRange::new(hi, hi),
            _ => PayloadRange::new(lo, hi),
        }
    }

    /// Clean up a slider position: values within half a step of either end
    /// land exactly on it, others are rounded to the step's decimals.
    fn snap(&self, value: f64) -> f64 {
        let value = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return value;
        }
        let half = self.step / 2.0;
        if self.max - value < half {
            return self.max;
        }
        if value - self.min < half {
            return self.min;
        }
        let scale = 10f64.powi(decimals(self.step));
        ((value * scale).round() / scale).clamp(self.min, self.max)
    }
}

/// Number of decimal places needed to write `step` (at most 10).
fn decimals(step: f64) -> i32 {
    (0..10)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0)
        })
        .unwrap_or(10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;

    #[test]
    fn slider_follows_dataset_extremes() {
        let ds = Dataset::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 362.0, 1, "FT"),
            LaunchRecord::new("VAFB SLC-4E", 9600.0, 1, "B4"),
        ])
        .unwrap();
        let layout = DashboardLayout::new(&DashboardConfig::default(), &ds);
        let slider = &layout.payload_slider;
        assert_eq!((slider.min, slider.max), (0.0, 9600.0));
        assert_eq!(slider.step, 96.0);
        assert_eq!(slider.marks.len(), 11);
        assert_eq!(slider.marks[1], 960.0);
        assert_eq!(slider.marks.last(), Some(&9600.0));

        let sel = layout.default_selection();
        assert_eq!(sel.site, SiteSelection::All);
        assert_eq!(sel.range, PayloadRange::new(0.0, 9600.0));
        assert_eq!(layout.title, "SpaceX Launches");
    }

    #[test]
    fn marks_stop_at_whole_strides() {
        let slider = RangeSlider::new(0.0, 15600.5);
        assert_eq!(slider.marks.first(), Some(&0.0));
        assert_eq!(slider.marks.last(), Some(&15600.0));
        assert!(slider.marks.windows(2).all(|w| w[1] - w[0] == 1560.0));
    }

    #[test]
    fn degenerate_marks() {
        assert_eq!(RangeSlider::new(0.0, 5.0).marks, vec![0.0, 5.0]);
        let flat = RangeSlider::new(0.0, 0.0);
        assert_eq!(flat.marks, vec![0.0]);
        assert_eq!(flat.step, 0.0);
    }

    #[test]
    fn clamp_keeps_handles_ordered() {
        let slider = RangeSlider::new(0.0, 1000.0);
        assert_eq!(slider.clamp(200.0, 800.0, Handle::Low), PayloadRange::new(200.0, 800.0));
        assert_eq!(slider.clamp(900.0, 800.0, Handle::Low), PayloadRange::new(900.0, 900.0));
        assert_eq!(slider.clamp(200.0, 100.0, Handle::High), PayloadRange::new(100.0, 100.0));
        assert_eq!(slider.clamp(-5.0, 2000.0, Handle::High), PayloadRange::new(0.0, 1000.0));
    }

    #[test]
    fn clamp_reaches_bounds_with_inexact_steps() {
        let slider = RangeSlider::new(0.0, 15573.0);
        assert_eq!(slider.step, 155.73);

        // What a float step grid yields when dragged to either end.
        let range = slider.clamp(1e-12, 15572.999999999998, Handle::High);
        assert_eq!(range, PayloadRange::new(0.0, 15573.0));
        assert!(range.contains(slider.max));
        assert_eq!(
            crate::callbacks::update_payload_range(&range),
            "Payload Range (kg): 0 - 15573"
        );

        // Interior positions lose the float noise.
        let range = slider.clamp(155.73 * 3.0, 155.73 * 7.0, Handle::Low);
        assert_eq!(range, PayloadRange::new(467.19, 1090.11));
    }

    #[test]
    fn step_decimals() {
        assert_eq!(decimals(96.0), 0);
        assert_eq!(decimals(155.73), 2);
        assert_eq!(decimals(0.05), 2);
    }

    #[test]
    fn dropdown_options_and_search() {
        let dropdown = Dropdown::new(&DashboardConfig::default().sites);
        assert_eq!(dropdown.options.len(), 5);
        assert_eq!(dropdown.options[0].value, "ALL");
        assert_eq!(dropdown.label_for(&SiteSelection::All), "All Sites");
        assert_eq!(
            dropdown.label_for(&SiteSelection::from_value("KSC LC-39A")),
            "Kennedy Space Center LC-39A"
        );
        assert_eq!(dropdown.label_for(&SiteSelection::from_value("X")), "X");

        let hits: Vec<&str> = dropdown.search("slc").iter().map(|o| o.value.as_str()).collect();
        assert_eq!(hits, vec!["CCAFS SLC-40", "VAFB SLC-4E"]);
        assert_eq!(dropdown.search("  ").len(), 5);
    }
}
