//! Site configuration: where the map documents live and how the map opens.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::style::{MAX_ZOOM, MapView};
use crate::types::AreaId;

/// Placeholder replaced by the area identifier in plan paths.
pub const AREA_ID_PLACEHOLDER: &str = "{id}";

/// Locations of the site documents, relative to `data_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Directory the document paths are resolved against
    pub data_dir: PathBuf,
    /// Property-boundary GeoJSON
    pub property_path: String,
    /// Habitat survey GeoJSON in SWEREF99 TM
    pub habitat_path: String,
    /// Path of a management plan, containing `{id}`
    pub plan_path_template: String,
    pub view: MapView,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            property_path: "ustorp_property_borders.json".to_string(),
            habitat_path: "nvi_habitat.geojson".to_string(),
            plan_path_template: format!("plans/{AREA_ID_PLACEHOLDER}.csv"),
            view: MapView::default(),
        }
    }
}

impl SiteConfig {
    /// Default configuration rooted at `data_dir`.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Checks the configuration for values the loader cannot work with.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a path is empty, the plan template lacks
    /// the `{id}` placeholder, or the zoom level is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                option: "data-dir".to_string(),
            });
        }
        for (option, path) in [
            ("property-path", &self.property_path),
            ("habitat-path", &self.habitat_path),
        ] {
            if path.trim().is_empty() {
                return Err(ConfigError::MissingRequired {
                    option: option.to_string(),
                });
            }
        }
        if !self.plan_path_template.contains(AREA_ID_PLACEHOLDER) {
            return Err(ConfigError::InvalidOption {
                option: "plan-template".to_string(),
                message: format!(
                    "'{}' does not contain the {AREA_ID_PLACEHOLDER} placeholder",
                    self.plan_path_template
                ),
            });
        }
        if self.view.zoom > MAX_ZOOM {
            return Err(ConfigError::InvalidOption {
                option: "zoom".to_string(),
                message: format!("{} is above the maximum of {MAX_ZOOM}", self.view.zoom),
            });
        }
        Ok(())
    }

    /// Path of the management plan for an area.
    #[must_use]
    pub fn plan_path(&self, id: AreaId) -> String {
        self.plan_path_template
            .replace(AREA_ID_PLACEHOLDER, &id.to_string())
    }
}
