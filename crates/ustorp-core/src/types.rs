//! Data types shared by the site transformations.
//!
//! This module defines the management-plan record produced by the plan parser,
//! the `(lat, lng)` pair consumed by the map display layer, and the numeric
//! area identifier joining habitat polygons to their plans.

use std::fmt;

use serde::Serialize;

/// Management plan for one habitat area.
///
/// Every field defaults to empty. The parser never fails, it only leaves
/// fields unpopulated when the source document lacks them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementPlan {
    /// Plan title (first row, second column)
    pub title: String,
    /// Biotope currently present in the area
    pub current_biotope: String,
    /// Biotope the management aims for
    pub target_biotope: String,
    /// Time horizon of the plan
    pub timeline: String,
    /// Natural value biotope from the NVI survey
    pub nvi_value: String,
    /// Area in hectares, as written in the source
    pub area: String,
    /// Natural value class
    pub natural_value_class: String,
    /// Free-text management summary
    pub management_summary: String,
    /// Planned actions in declaration order
    pub actions: Vec<PlanAction>,
    /// Economic summary of the plan
    pub economics: PlanEconomics,
}

/// A planned management action and its cost columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAction {
    /// Action description
    pub action: String,
    /// Cost over twenty years
    #[serde(rename = "cost20Years")]
    pub cost_20_years: String,
    /// Yearly cost
    pub cost_per_year: String,
    /// Yearly cost per hectare
    pub cost_per_hectare_year: String,
}

/// Totals extracted from the economics rows of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEconomics {
    pub total_cost: String,
    pub total_income: String,
    pub net_result: String,
}

/// Geographic position in `(latitude, longitude)` order.
///
/// GeoJSON stores `(longitude, latitude)`; the map display layer expects the
/// reversed order, so label positions are handed over as `LatLng`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Numeric habitat area identifier taken from the `Objektid` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AreaId(pub u64);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_serializes_with_camel_case_names() {
        let plan = ManagementPlan {
            current_biotope: "Betesmark".to_string(),
            actions: vec![PlanAction {
                action: "Röjning".to_string(),
                cost_20_years: "1000".to_string(),
                ..PlanAction::default()
            }],
            ..ManagementPlan::default()
        };

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["currentBiotope"], "Betesmark");
        assert_eq!(json["actions"][0]["cost20Years"], "1000");
        assert_eq!(json["actions"][0]["costPerHectareYear"], "");
        assert_eq!(json["economics"]["netResult"], "");
    }

    #[test]
    fn test_latlng_display() {
        assert_eq!(LatLng::new(57.538, 15.182).to_string(), "(57.538000, 15.182000)");
    }

    #[test]
    fn test_area_id_orders_numerically() {
        let mut ids = vec![AreaId(10), AreaId(2), AreaId(33)];
        ids.sort();
        assert_eq!(ids, vec![AreaId(2), AreaId(10), AreaId(33)]);
        assert_eq!(AreaId(7).to_string(), "7");
    }
}
