//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and rendering functions for
//! presenting management plans, label positions and site summaries.

use tabled::{Table, Tabled};

use geojson::FeatureCollection;
use ustorp_core::centroid::vertex_centroid;
use ustorp_core::properties::{NVKLASS, OBJEKTID, PropertyValueExt, property_label};
use ustorp_core::site::SiteMap;
use ustorp_core::style::nvklass_color;
use ustorp_core::types::ManagementPlan;

/// Table row for a labelled plan field.
#[derive(Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Table row for a planned action.
#[derive(Tabled)]
pub struct ActionRow {
    #[tabled(rename = "Action")]
    pub action: String,
    #[tabled(rename = "Cost 20 years")]
    pub cost_20_years: String,
    #[tabled(rename = "Cost / year")]
    pub cost_per_year: String,
    #[tabled(rename = "Cost / ha / year")]
    pub cost_per_hectare_year: String,
}

/// Table row for the label position of a habitat feature.
#[derive(Tabled)]
pub struct LabelRow {
    /// `Objektid`, or `N/A` when absent
    #[tabled(rename = "Objektid")]
    pub area: String,
    #[tabled(rename = "Nvklass")]
    pub nvklass: String,
    #[tabled(rename = "Color")]
    pub color: String,
    #[tabled(rename = "Lat")]
    pub lat: String,
    #[tabled(rename = "Lng")]
    pub lng: String,
}

/// Table row summarising one loaded layer.
#[derive(Tabled)]
pub struct LayerRow {
    #[tabled(rename = "Layer")]
    pub layer: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Features")]
    pub features: String,
}

fn show(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Renders a management plan as field, action and economics tables.
#[must_use]
pub fn render_plan(plan: &ManagementPlan) -> String {
    let fields = [
        ("Title", &plan.title),
        ("Current biotope", &plan.current_biotope),
        ("Target biotope", &plan.target_biotope),
        ("Timeline", &plan.timeline),
        ("NVI biotope", &plan.nvi_value),
        ("Area (ha)", &plan.area),
        ("Natural value class", &plan.natural_value_class),
        ("Summary", &plan.management_summary),
    ]
    .into_iter()
    .map(|(label, value)| FieldRow {
        label: label.to_string(),
        value: show(value),
    });

    let mut output = Table::new(fields).to_string();

    if !plan.actions.is_empty() {
        output.push_str("\n\n=== Actions ===\n");
        let actions = plan.actions.iter().map(|a| ActionRow {
            action: a.action.clone(),
            cost_20_years: show(&a.cost_20_years),
            cost_per_year: show(&a.cost_per_year),
            cost_per_hectare_year: show(&a.cost_per_hectare_year),
        });
        output.push_str(&Table::new(actions).to_string());
    }

    output.push_str("\n\n=== Economics ===\n");
    let economics = [
        ("Total cost", &plan.economics.total_cost),
        ("Total income", &plan.economics.total_income),
        ("Net result", &plan.economics.net_result),
    ]
    .into_iter()
    .map(|(label, value)| FieldRow {
        label: label.to_string(),
        value: show(value),
    });
    output.push_str(&Table::new(economics).to_string());
    output
}

/// Label rows for every feature of a habitat layer, in feature order.
#[must_use]
pub fn label_rows(habitat: &FeatureCollection) -> Vec<LabelRow> {
    habitat
        .features
        .iter()
        .map(|feature| {
            let center = feature
                .geometry
                .as_ref()
                .map(|geometry| vertex_centroid(&geometry.value))
                .unwrap_or_default();
            LabelRow {
                area: feature
                    .property(OBJEKTID)
                    .map_or_else(|| "N/A".to_string(), PropertyValueExt::display_text),
                nvklass: feature
                    .property(NVKLASS)
                    .map_or_else(|| "N/A".to_string(), PropertyValueExt::display_text),
                color: nvklass_color(feature.property(NVKLASS)).to_string(),
                lat: format!("{:.6}", center.lat),
                lng: format!("{:.6}", center.lng),
            }
        })
        .collect()
}

/// Renders the label positions of a habitat layer.
#[must_use]
pub fn render_labels(habitat: &FeatureCollection) -> String {
    Table::new(label_rows(habitat)).to_string()
}

fn layer_row(layer: &str, collection: Option<&FeatureCollection>) -> LayerRow {
    LayerRow {
        layer: layer.to_string(),
        status: if collection.is_some() { "loaded" } else { "missing" }.to_string(),
        features: collection.map_or_else(|| "-".to_string(), |c| c.features.len().to_string()),
    }
}

/// Renders a summary of a loaded site.
#[must_use]
pub fn render_site(site: &SiteMap) -> String {
    let layers = [
        layer_row("Property borders", site.property.as_ref()),
        layer_row("Habitat (WGS84)", site.habitat.as_ref()),
    ];

    let mut output = format!(
        "Map view: center {}, zoom {}\n\n",
        site.view.center, site.view.zoom
    );
    output.push_str(&Table::new(layers).to_string());

    if let Some(property) = &site.property {
        let names: Vec<String> = property.features.iter().map(property_label).collect();
        output.push_str(&format!("\n\nProperties: {}", names.join(", ")));
    }
    output.push_str(&format!(
        "\n\nManagement plans: {}\nAnnotated areas: {}",
        site.plans.len(),
        site.annotations.len()
    ));
    output
}
