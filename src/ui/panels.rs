use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::SiteSelection;
use crate::data::model::{COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE, COL_PAYLOAD_MASS};
use crate::layout::Handle;
use crate::reactive::OutputId;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Figure", |ui: &mut Ui| {
            for (label, output) in [
                ("Copy pie chart JSON", OutputId::SuccessPieChart),
                ("Copy scatter chart JSON", OutputId::SuccessPayloadScatter),
            ] {
                if ui.button(label).clicked() {
                    if let Some(json) = state.figure_json(output) {
                        ui.ctx().copy_text(json);
                        log::info!("Copied {output} figure to clipboard");
                    }
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches loaded, {} in selection",
            state.dataset.len(),
            state.visible_count
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Dashboard controls
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(&state.layout.title)
                .size(32.0)
                .color(Color32::from_rgb(0x30, 0x2f, 0x2f))
                .strong(),
        );
    });
    ui.add_space(8.0);
}

/// Searchable launch-site dropdown.
pub fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let dropdown = &state.layout.site_dropdown;
    let id = dropdown.id;
    let placeholder = dropdown.placeholder;
    let selected_text = dropdown.label_for(&state.selection.site).to_string();

    let mut picked: Option<SiteSelection> = None;
    ui.vertical_centered(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected_text)
            .width(ui.available_width() * 0.75)
            .show_ui(ui, |ui: &mut Ui| {
                ui.add(egui::TextEdit::singleline(&mut state.site_query).hint_text(placeholder));
                let current = state.selection.site.value();
                for option in state.layout.site_dropdown.search(&state.site_query) {
                    if ui
                        .selectable_label(option.value == current, &option.label)
                        .clicked()
                    {
                        picked = Some(SiteSelection::from_value(&option.value));
                    }
                }
            });
    });

    if let Some(site) = picked {
        state.site_query.clear();
        state.select_site(site);
    }
}

/// Range label plus the two slider handles and their tick marks.
pub fn payload_controls(ui: &mut Ui, state: &mut AppState) {
    if let Some(label) = state.dispatcher.text(OutputId::PayloadRangeLabel) {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(
                RichText::new(label)
                    .size(16.0)
                    .color(Color32::from_rgb(0x30, 0x2f, 0x2f))
                    .strong(),
            );
        });
    }

    let slider = state.layout.payload_slider.clone();
    let mut lo = state.selection.range.lo;
    let mut hi = state.selection.range.hi;
    let mut moved = None;

    ui.push_id(slider.id, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            let width = ui.available_width() * 0.59;
            ui.spacing_mut().slider_width = width;

            let low = egui::Slider::new(&mut lo, slider.min..=slider.max)
                .step_by(slider.step)
                .text("From");
            if ui.add(low).changed() {
                moved = Some(Handle::Low);
            }
            let high = egui::Slider::new(&mut hi, slider.min..=slider.max)
                .step_by(slider.step)
                .text("To");
            if ui.add(high).changed() {
                moved = Some(Handle::High);
            }

            // Tick labels under the sliders.
            let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 14.0), Sense::hover());
            let span = slider.max - slider.min;
            for mark in &slider.marks {
                let t = if span > 0.0 { (mark - slider.min) / span } else { 0.0 };
                let x = rect.left() + t as f32 * rect.width();
                ui.painter().text(
                    egui::pos2(x, rect.top()),
                    Align2::CENTER_TOP,
                    mark.to_string(),
                    FontId::proportional(10.0),
                    ui.visuals().weak_text_color(),
                );
            }
        });
    });

    if let Some(handle) = moved {
        state.set_payload_range(lo, hi, handle);
    }
}

// ---------------------------------------------------------------------------
// Launch table
// ---------------------------------------------------------------------------

/// Collapsible table of the launches behind the charts.
pub fn launches_table(ui: &mut Ui, state: &AppState) {
    let header_text = format!(
        "Launches in selection  ({}/{})",
        state.visible_count,
        state.dataset.len()
    );

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("launches_table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            // Only filtered while the table is open.
            let records = state.visible_records();
            ui.push_id("launches_table_body", |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .max_scroll_height(240.0)
                    .column(Column::auto().at_least(160.0))
                    .column(Column::auto().at_least(120.0))
                    .column(Column::auto().at_least(60.0))
                    .column(Column::remainder())
                    .header(20.0, |mut header| {
                        for title in [
                            COL_LAUNCH_SITE,
                            COL_PAYLOAD_MASS,
                            COL_CLASS,
                            COL_BOOSTER_CATEGORY,
                        ] {
                            header.col(|ui: &mut Ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, records.len(), |mut row| {
                            let rec = records[row.index()];
                            row.col(|ui: &mut Ui| {
                                ui.label(&rec.launch_site);
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(rec.payload_mass_kg.to_string());
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(rec.class.to_string());
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(&rec.booster_version_category);
                            });
                        });
                    });
            });
        });
}
