use std::sync::Arc;

use crate::callbacks::register_callbacks;
use crate::color::Palettes;
use crate::config::DashboardConfig;
use crate::data::filter::{filter, Selection, SiteSelection};
use crate::data::model::{Dataset, LaunchRecord};
use crate::layout::{DashboardLayout, Handle};
use crate::reactive::{BindingError, Dispatcher, InputId, OutputId};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Launch table loaded at startup.
    pub dataset: Arc<Dataset>,

    /// Widget descriptions derived from config + dataset.
    pub layout: DashboardLayout,

    /// Current values of the dropdown and the payload slider.
    pub selection: Selection,

    /// Bindings and the latest value of every output.
    pub dispatcher: Dispatcher,

    /// Stable colours per site / booster / outcome.
    pub palettes: Palettes,

    /// Rows in the current selection (cached).
    pub visible_count: usize,

    /// Text typed into the dropdown's search box.
    pub site_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Wire the bindings and render every output once.
    pub fn new(dataset: Arc<Dataset>, config: &DashboardConfig) -> Result<Self, BindingError> {
        let layout = DashboardLayout::new(config, &dataset);
        let selection = layout.default_selection();

        let mut dispatcher = Dispatcher::new(Arc::clone(&dataset));
        register_callbacks(&mut dispatcher)?;
        dispatcher.fire_all(&selection);

        let mut state = Self {
            palettes: Palettes::for_dataset(&dataset),
            visible_count: 0,
            dataset,
            layout,
            selection,
            dispatcher,
            site_query: String::new(),
            status_message: None,
        };
        state.visible_count = state.visible_records().len();
        Ok(state)
    }

    /// Dropdown changed.
    pub fn select_site(&mut self, site: SiteSelection) {
        if self.selection.site == site {
            return;
        }
        log::debug!("site-dropdown -> {site}");
        self.selection.site = site;
        self.dispatcher.notify(InputId::SiteDropdown);
        self.refresh();
    }

    /// One of the slider handles moved.
    pub fn set_payload_range(&mut self, lo: f64, hi: f64, moved: Handle) {
        let range = self.layout.payload_slider.clamp(lo, hi, moved);
        if self.selection.range == range {
            return;
        }
        log::debug!("payload-slider -> [{}, {}]", range.lo, range.hi);
        self.selection.range = range;
        self.dispatcher.notify(InputId::PayloadSlider);
        self.refresh();
    }

    /// Run pending bindings and recompute the cached row count.
    fn refresh(&mut self) {
        if !self.dispatcher.has_pending() {
            return;
        }
        if self.dispatcher.process(&self.selection) > 0 {
            self.visible_count = self.visible_records().len();
        }
    }

    /// Launches matching the current selection.
    pub fn visible_records(&self) -> Vec<&LaunchRecord> {
        filter(&self.dataset, &self.selection.site, &self.selection.range)
    }

    /// JSON description of a chart output, for the clipboard.
    pub fn figure_json(&mut self, output: OutputId) -> Option<String> {
        let figure = self.dispatcher.figure(output)?;
        match figure.to_json() {
            Ok(json) => {
                self.status_message = None;
                Some(json)
            }
            Err(e) => {
                log::error!("Failed to serialize {output}: {e}");
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let ds = Dataset::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, 1, "v1.0"),
            LaunchRecord::new("CCAFS LC-40", 2000.0, 0, "FT"),
            LaunchRecord::new("KSC LC-39A", 1000.0, 1, "FT"),
        ])
        .unwrap();
        AppState::new(Arc::new(ds), &DashboardConfig::default()).unwrap()
    }

    #[test]
    fn initial_render_covers_all_outputs() {
        let s = state();
        assert_eq!(s.visible_count, 3);
        assert_eq!(
            s.dispatcher.text(OutputId::PayloadRangeLabel),
            Some("Payload Range (kg): 0 - 2000")
        );
        let pie = s.dispatcher.figure(OutputId::SuccessPieChart).unwrap();
        assert_eq!(pie.title, "Launch Success by Site");
        assert_eq!(pie.slices().len(), 2);
    }

    #[test]
    fn site_change_rebuilds_charts_only() {
        let mut s = state();
        s.select_site(SiteSelection::from_value("KSC LC-39A"));
        assert_eq!(s.visible_count, 1);
        assert_eq!(
            s.dispatcher.figure(OutputId::SuccessPieChart).unwrap().title,
            "Success for Site KSC LC-39A"
        );
        assert_eq!(
            s.dispatcher.figure(OutputId::SuccessPayloadScatter).unwrap().title,
            "Payload Mass vs Success for KSC LC-39A"
        );
        assert_eq!(
            s.dispatcher.text(OutputId::PayloadRangeLabel),
            Some("Payload Range (kg): 0 - 2000")
        );
    }

    #[test]
    fn range_change_updates_label_and_charts() {
        let mut s = state();
        s.set_payload_range(600.0, 2000.0, Handle::Low);
        assert_eq!(s.selection.range.lo, 600.0);
        assert_eq!(
            s.dispatcher.text(OutputId::PayloadRangeLabel),
            Some("Payload Range (kg): 600 - 2000")
        );
        assert_eq!(s.visible_count, 2);
        assert_eq!(
            s.dispatcher.figure(OutputId::SuccessPayloadScatter).unwrap().points().len(),
            2
        );

        // Dragging the high handle below the low one collapses the window.
        s.set_payload_range(600.0, 100.0, Handle::High);
        assert_eq!(s.selection.range.lo, 100.0);
        assert_eq!(s.selection.range.hi, 100.0);
        assert_eq!(s.visible_count, 0);
        assert!(s.dispatcher.figure(OutputId::SuccessPieChart).unwrap().slices().is_empty());
    }

    #[test]
    fn figure_json_for_chart_outputs_only() {
        let mut s = state();
        let json = s.figure_json(OutputId::SuccessPieChart).unwrap();
        assert!(json.contains("Launch Success by Site"));
        assert!(s.figure_json(OutputId::PayloadRangeLabel).is_none());
    }
}
