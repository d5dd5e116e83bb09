use eframe::egui::{self, ScrollArea, Ui};

use crate::reactive::OutputId;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpacexDashApp {
    pub state: AppState,
}

impl SpacexDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SpacexDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: controls and output slots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::header(ui, &self.state);
                    panels::site_dropdown(ui, &mut self.state);
                    ui.add_space(8.0);

                    let outputs = self.state.layout.outputs;
                    for output in outputs {
                        match output {
                            OutputId::PayloadRangeLabel => {
                                panels::payload_controls(ui, &mut self.state)
                            }
                            OutputId::SuccessPieChart | OutputId::SuccessPayloadScatter => {
                                plot::chart_slot(ui, &self.state, output)
                            }
                        }
                        ui.add_space(12.0);
                    }

                    panels::launches_table(ui, &self.state);
                });
        });
    }
}
