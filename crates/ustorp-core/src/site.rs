//! Loading the site map: layers, management plans and area annotations.
//!
//! The map combines three kinds of documents, each of which may fail on its
//! own without taking the rest of the map down:
//!
//! - the property boundaries, used as they are,
//! - the habitat survey, reprojected from SWEREF99 TM to WGS84,
//! - one management plan per numeric `Objektid` of the survey.
//!
//! A failed layer is logged and left out. A missing plan is not an error at
//! all; the area simply gets no annotation. Nothing is retried.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use futures::future::join_all;
use geojson::{FeatureCollection, GeoJson};
use log::{debug, info, warn};
use serde::Serialize;

use crate::centroid::{FALLBACK, vertex_centroid};
use crate::config::SiteConfig;
use crate::error::{FormatError, IoError, Result};
use crate::plan::parse_management_plan;
use crate::properties::{NVKLASS, OBJEKTID, PropertyValueExt, popup_rows};
use crate::reproject::reproject_feature_collection;
use crate::source::DocumentSource;
use crate::style::{LayerStyle, MapView, PROPERTY_STYLE, habitat_style};
use crate::types::{AreaId, LatLng, ManagementPlan};

/// Everything the map display needs, as far as it could be loaded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMap {
    pub view: MapView,
    pub property_style: LayerStyle,
    /// Property boundaries, if they loaded
    pub property: Option<FeatureCollection>,
    /// Habitat polygons in WGS84, if they loaded
    pub habitat: Option<FeatureCollection>,
    /// Management plans by area
    pub plans: BTreeMap<AreaId, ManagementPlan>,
    /// One entry per habitat polygon that has a plan
    pub annotations: Vec<AreaAnnotation>,
}

/// A habitat polygon joined with its management plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaAnnotation {
    pub area_id: AreaId,
    /// Approximate label anchor, see [`vertex_centroid`]
    pub label_position: LatLng,
    /// Polygon style, filled by natural value class
    #[serde(flatten)]
    pub style: LayerStyle,
    /// Popup label/value rows from the survey attributes
    pub popup: Vec<(String, String)>,
    pub plan: ManagementPlan,
}

/// Parses a document that must hold a GeoJSON `FeatureCollection`.
///
/// # Errors
///
/// Returns a [`FormatError`] if the text is not GeoJSON or is a bare
/// feature or geometry.
pub fn parse_feature_collection(text: &str, path: &str) -> Result<FeatureCollection> {
    let geojson = GeoJson::from_str(text).map_err(|err| FormatError::Parse {
        format: "GeoJSON".to_string(),
        path: path.to_string(),
        message: err.to_string(),
    })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        other => {
            let found = match other {
                GeoJson::Feature(_) => "Feature",
                _ => "Geometry",
            };
            Err(FormatError::UnexpectedKind {
                path: path.to_string(),
                expected: "FeatureCollection".to_string(),
                found: found.to_string(),
            }
            .into())
        },
    }
}

async fn fetch_required(source: &dyn DocumentSource, path: &str) -> Result<String> {
    source
        .fetch(path)
        .await?
        .ok_or_else(|| IoError::NotFound { path: path.into() }.into())
}

/// Loads the property boundaries as they are.
///
/// # Errors
///
/// Returns an error if the document is missing, unreadable or not a
/// feature collection.
pub async fn load_property_layer(
    source: &dyn DocumentSource,
    path: &str,
) -> Result<FeatureCollection> {
    let text = fetch_required(source, path).await?;
    let collection = parse_feature_collection(&text, path)?;
    info!(
        "Loaded {} property feature(s) from {path}",
        collection.features.len()
    );
    Ok(collection)
}

/// Loads the habitat survey and reprojects it to WGS84.
///
/// # Errors
///
/// Returns an error if the document is missing, unreadable or not a
/// feature collection.
pub async fn load_habitat_layer(
    source: &dyn DocumentSource,
    path: &str,
) -> Result<FeatureCollection> {
    let text = fetch_required(source, path).await?;
    let collection = reproject_feature_collection(parse_feature_collection(&text, path)?);
    info!(
        "Loaded and reprojected {} habitat feature(s) from {path}",
        collection.features.len()
    );
    Ok(collection)
}

/// Distinct numeric `Objektid` values of a habitat layer, ascending.
///
/// Features whose identifier is missing or not numeric are skipped.
#[must_use]
pub fn area_ids(habitat: &FeatureCollection) -> Vec<AreaId> {
    habitat
        .features
        .iter()
        .filter_map(|feature| feature.property(OBJEKTID)?.as_area_id())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fetches and parses the management plan of every area, concurrently.
///
/// Areas without a plan document are left out silently; areas whose fetch
/// fails are logged and left out.
pub async fn load_management_plans(
    source: &dyn DocumentSource,
    config: &SiteConfig,
    ids: &[AreaId],
) -> BTreeMap<AreaId, ManagementPlan> {
    let fetches = ids.iter().map(|&id| async move {
        let path = config.plan_path(id);
        (id, path.clone(), source.fetch(&path).await)
    });

    let mut plans = BTreeMap::new();
    for (id, path, outcome) in join_all(fetches).await {
        match outcome {
            Ok(Some(text)) => {
                plans.insert(id, parse_management_plan(&text));
            },
            Ok(None) => debug!("No management plan for area {id} at {path}"),
            Err(err) => warn!("Skipping management plan for area {id}: {err}"),
        }
    }

    info!(
        "Loaded {} management plan(s) for {} area(s)",
        plans.len(),
        ids.len()
    );
    plans
}

/// Joins habitat polygons with their plans, one annotation per polygon.
#[must_use]
pub fn annotate_areas(
    habitat: &FeatureCollection,
    plans: &BTreeMap<AreaId, ManagementPlan>,
) -> Vec<AreaAnnotation> {
    habitat
        .features
        .iter()
        .filter_map(|feature| {
            let area_id = feature.property(OBJEKTID)?.as_area_id()?;
            let plan = plans.get(&area_id)?;
            let label_position = feature
                .geometry
                .as_ref()
                .map_or(FALLBACK, |geometry| {
                    vertex_centroid(&geometry.value)
                });
            Some(AreaAnnotation {
                area_id,
                label_position,
                style: habitat_style(feature.property(NVKLASS)),
                popup: feature.properties.as_ref().map(popup_rows).unwrap_or_default(),
                plan: plan.clone(),
            })
        })
        .collect()
}

/// Loads every site document, degrading layer by layer.
///
/// Never fails; whatever could not be loaded is absent from the result.
pub async fn load_site(source: &dyn DocumentSource, config: &SiteConfig) -> SiteMap {
    let (property, habitat) = futures::join!(
        load_property_layer(source, &config.property_path),
        load_habitat_layer(source, &config.habitat_path),
    );

    let property = property
        .inspect_err(|err| warn!("Error loading property borders: {err}"))
        .ok();
    let habitat = habitat
        .inspect_err(|err| warn!("Error loading habitat layer: {err}"))
        .ok();

    let (plans, annotations) = match &habitat {
        Some(habitat) => {
            let plans = load_management_plans(source, config, &area_ids(habitat)).await;
            let annotations = annotate_areas(habitat, &plans);
            (plans, annotations)
        },
        None => (BTreeMap::new(), Vec::new()),
    };

    SiteMap {
        view: config.view,
        property_style: PROPERTY_STYLE,
        property,
        habitat,
        plans,
        annotations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::error::SiteError;

    /// In-memory source recording the paths it was asked for.
    #[derive(Default)]
    struct MemorySource {
        documents: HashMap<String, String>,
        failing: Vec<String>,
        requests: Mutex<Vec<String>>,
    }

    impl MemorySource {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.documents.insert(path.to_string(), text.to_string());
            self
        }

        fn failing(mut self, path: &str) -> Self {
            self.failing.push(path.to_string());
            self
        }
    }

    #[async_trait]
    impl DocumentSource for MemorySource {
        async fn fetch(&self, path: &str) -> Result<Option<String>> {
            self.requests.lock().unwrap().push(path.to_string());
            if self.failing.iter().any(|p| p == path) {
                return Err(SiteError::Other(anyhow::anyhow!("HTTP 500 for {path}")));
            }
            Ok(self.documents.get(path).cloned())
        }
    }

    const HABITAT: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "Objektid": 1, "Nvklass": 2 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [510000.0, 6377000.0],
                        [510000.0, 6377200.0],
                        [510200.0, 6377200.0],
                        [510200.0, 6377000.0]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": { "Objektid": "2", "Nvklass": "4" },
                "geometry": { "type": "Point", "coordinates": [510896.072, 6377290.755] }
            },
            {
                "type": "Feature",
                "properties": { "Objektid": 1, "Nvklass": 2 },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "Objektid": "okänd" },
                "geometry": null
            }
        ]
    }"#;

    const BORDERS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Ustorp 1:4" },
                "geometry": { "type": "Point", "coordinates": [15.182, 57.538] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection_rejects_other_kinds() {
        let err = parse_feature_collection(
            r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#,
            "borders.json",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SiteError::Format(FormatError::UnexpectedKind { ref found, .. }) if found == "Geometry"
        ));

        let err = parse_feature_collection("not json", "borders.json").unwrap_err();
        assert!(matches!(err, SiteError::Format(FormatError::Parse { .. })));
    }

    #[test]
    fn test_area_ids_are_distinct_and_sorted() {
        let habitat = parse_feature_collection(HABITAT, "habitat").unwrap();
        assert_eq!(area_ids(&habitat), vec![AreaId(1), AreaId(2)]);
    }

    #[tokio::test]
    async fn test_habitat_layer_is_reprojected() {
        let source = MemorySource::default().with("nvi.geojson", HABITAT);
        let habitat = load_habitat_layer(&source, "nvi.geojson").await.unwrap();

        let geojson::Value::Point(position) = &habitat.features[1]
            .geometry
            .as_ref()
            .unwrap()
            .value
        else {
            panic!("expected a Point");
        };
        assert!((position[0] - 15.182).abs() < 1e-6);
        assert!((position[1] - 57.538).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_layer_is_not_found() {
        let source = MemorySource::default();
        let err = load_property_layer(&source, "borders.json")
            .await
            .unwrap_err();
        assert!(matches!(err, SiteError::Io(IoError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_plans_skip_missing_and_failing_documents() {
        let source = MemorySource::default()
            .with("plans/1.csv", "Plan,Hagen\nTidslinje,20 år")
            .failing("plans/3.csv");
        let config = SiteConfig::default();

        let plans =
            load_management_plans(&source, &config, &[AreaId(1), AreaId(2), AreaId(3)]).await;

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[&AreaId(1)].title, "Hagen");
        assert_eq!(plans[&AreaId(1)].timeline, "20 år");

        let mut requests = source.requests.lock().unwrap().clone();
        requests.sort();
        assert_eq!(requests, vec!["plans/1.csv", "plans/2.csv", "plans/3.csv"]);
    }

    #[tokio::test]
    async fn test_load_site_joins_plans_to_areas() {
        let source = MemorySource::default()
            .with("ustorp_property_borders.json", BORDERS)
            .with("nvi_habitat.geojson", HABITAT)
            .with("plans/1.csv", "Plan,Hagen\nStängsling,x,,100,5,1");
        let site = load_site(&source, &SiteConfig::default()).await;

        assert_eq!(site.property.as_ref().map(|p| p.features.len()), Some(1));
        assert_eq!(site.habitat.as_ref().map(|h| h.features.len()), Some(4));
        assert_eq!(site.plans.len(), 1);

        // Two polygons share area 1; the geometry-less one falls back to (0, 0).
        assert_eq!(site.annotations.len(), 2);
        let first = &site.annotations[0];
        assert_eq!(first.area_id, AreaId(1));
        assert_eq!(first.style.fill_color, "#238b45");
        assert_eq!(first.plan.actions.len(), 1);
        assert!(first.popup.contains(&("Nvklass".to_string(), "2".to_string())));
        assert!((first.label_position.lat - 57.5).abs() < 0.1);
        assert!((first.label_position.lng - 15.17).abs() < 0.1);
        assert_eq!(site.annotations[1].label_position, LatLng::new(0.0, 0.0));
    }

    #[tokio::test]
    async fn test_load_site_degrades_per_layer() {
        let source = MemorySource::default()
            .with("nvi_habitat.geojson", "{ broken")
            .failing("ustorp_property_borders.json");
        let site = load_site(&source, &SiteConfig::default()).await;

        assert!(site.property.is_none());
        assert!(site.habitat.is_none());
        assert!(site.plans.is_empty());
        assert!(site.annotations.is_empty());
        assert_eq!(site.view, MapView::default());
    }

    #[tokio::test]
    async fn test_property_layer_survives_missing_habitat() {
        let source = MemorySource::default().with("ustorp_property_borders.json", BORDERS);
        let site = load_site(&source, &SiteConfig::default()).await;

        assert!(site.property.is_some());
        assert!(site.habitat.is_none());
    }
}
