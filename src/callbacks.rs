use crate::data::filter::{filter, PayloadRange, SiteSelection};
use crate::data::model::{
    Dataset, COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE, COL_PAYLOAD_MASS,
};
use crate::figure::{count_by, sum_by, Figure, ScatterPoint};
use crate::reactive::{BindingError, Dispatcher, InputId, OutputId, OutputValue};

pub const SCATTER_WIDTH: f32 = 1000.0;
pub const SCATTER_HEIGHT: f32 = 500.0;

// ---------------------------------------------------------------------------
// Binding functions
// ---------------------------------------------------------------------------

/// Text shown above the payload slider.
pub fn update_payload_range(range: &PayloadRange) -> String {
    format!("Payload Range (kg): {} - {}", range.lo, range.hi)
}

/// Success pie chart.
///
/// For all sites, each slice is the *sum* of `class` per site, i.e. the number
/// of successful launches, not a success rate.
pub fn update_pie_chart(dataset: &Dataset, site: &SiteSelection, range: &PayloadRange) -> Figure {
    match site {
        SiteSelection::All => {
            let rows = filter(dataset, &SiteSelection::All, range);
            let slices = sum_by(&rows, |r| r.launch_site.clone(), |r| f64::from(r.class));
            Figure::pie("Launch Success by Site", COL_LAUNCH_SITE, Some(COL_CLASS), slices)
                .with_hover_template("Site: %{label}<br>Count: %{value}")
        }
        SiteSelection::Site(name) => {
            let rows = filter(dataset, site, range);
            let slices = count_by(&rows, |r| r.class.to_string());
            Figure::pie(format!("Success for Site {name}"), COL_CLASS, None, slices)
                .with_hover_template("Outcome: %{label}<br>Count: %{value}")
        }
    }
}

/// Payload mass against outcome, coloured by booster category.
pub fn update_scatter_plot(
    dataset: &Dataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Figure {
    let title = match site {
        SiteSelection::All => "Payload Mass vs Success".to_string(),
        SiteSelection::Site(name) => format!("Payload Mass vs Success for {name}"),
    };
    let points = filter(dataset, site, range)
        .into_iter()
        .map(|r| {
            ScatterPoint::new(
                r.payload_mass_kg,
                f64::from(r.class),
                r.booster_version_category.as_str(),
            )
        })
        .collect();

    Figure::scatter(title, COL_PAYLOAD_MASS, COL_CLASS, COL_BOOSTER_CATEGORY, points)
        .with_size(SCATTER_WIDTH, SCATTER_HEIGHT)
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Register the dashboard's three bindings.
pub fn register_callbacks(dispatcher: &mut Dispatcher) -> Result<(), BindingError> {
    dispatcher.register(
        OutputId::PayloadRangeLabel,
        &[InputId::PayloadSlider],
        |_, sel| OutputValue::Text(update_payload_range(&sel.range)),
    )?;
    dispatcher.register(
        OutputId::SuccessPieChart,
        &[InputId::SiteDropdown, InputId::PayloadSlider],
        |ds, sel| OutputValue::Figure(update_pie_chart(ds, &sel.site, &sel.range)),
    )?;
    dispatcher.register(
        OutputId::SuccessPayloadScatter,
        &[InputId::SiteDropdown, InputId::PayloadSlider],
        |ds, sel| OutputValue::Figure(update_scatter_plot(ds, &sel.site, &sel.range)),
    )?;
    Ok(())
}
