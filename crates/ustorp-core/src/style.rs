//! Map styling constants and the Nvklass colour scale.
//!
//! Styles are plain data, registered once by whichever display layer consumes
//! them. Nothing here holds global state.

use geojson::JsonValue;
use serde::Serialize;

use crate::types::LatLng;

/// Fill colours for natural value classes 1 (highest) to 4.
pub const NVKLASS_COLORS: [&str; 4] = ["#005a32", "#238b45", "#41ab5d", "#a1d99b"];

/// Fill colour for a missing or unrecognised natural value class.
pub const NVKLASS_FALLBACK_COLOR: &str = "#e5f5e0";

/// Maps an `Nvklass` property to its fill colour, darkest green for class 1.
///
/// Accepts the class as a JSON number or string. Anything other than exactly
/// 1, 2, 3 or 4 (null, absent, `5`, `"unknown"`, `" 1"`) gets
/// [`NVKLASS_FALLBACK_COLOR`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use ustorp_core::style::nvklass_color;
///
/// assert_eq!(nvklass_color(Some(&json!(1))), "#005a32");
/// assert_eq!(nvklass_color(Some(&json!("4"))), "#a1d99b");
/// assert_eq!(nvklass_color(None), "#e5f5e0");
/// ```
#[must_use]
pub fn nvklass_color(nvklass: Option<&JsonValue>) -> &'static str {
    let class = match nvklass {
        Some(JsonValue::Number(number)) => number
            .as_f64()
            .filter(|value| value.fract() == 0.0 && (1.0..=4.0).contains(value))
            .map(|value| value as usize),
        Some(JsonValue::String(text)) => match text.as_str() {
            "1" => Some(1),
            "2" => Some(2),
            "3" => Some(3),
            "4" => Some(4),
            _ => None,
        },
        _ => None,
    };

    class.map_or(NVKLASS_FALLBACK_COLOR, |class| NVKLASS_COLORS[class - 1])
}

/// Path style of a GeoJSON overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    /// Stroke colour
    pub color: &'static str,
    /// Stroke width in pixels
    pub weight: u32,
}

/// Property boundary overlay: faint fill, thick red border.
pub const PROPERTY_STYLE: LayerStyle = LayerStyle {
    fill_color: "#3388ff",
    fill_opacity: 0.1,
    color: "#ff0000",
    weight: 3,
};

/// Style of one habitat polygon, filled by its natural value class.
#[must_use]
pub fn habitat_style(nvklass: Option<&JsonValue>) -> LayerStyle {
    LayerStyle {
        fill_color: nvklass_color(nvklass),
        fill_opacity: 0.5,
        color: "#225522",
        weight: 2,
    }
}

/// Initial map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

/// Highest zoom level offered by the base layers.
pub const MAX_ZOOM: u8 = 22;

impl Default for MapView {
    /// Centred on Ustorp.
    fn default() -> Self {
        Self {
            center: LatLng::new(57.538, 15.182),
            zoom: 14,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documented_classes() {
        let expected = [
            (json!(1), "#005a32"),
            (json!("1"), "#005a32"),
            (json!(2), "#238b45"),
            (json!("2"), "#238b45"),
            (json!(3), "#41ab5d"),
            (json!("3"), "#41ab5d"),
            (json!(4), "#a1d99b"),
            (json!("4"), "#a1d99b"),
        ];
        for (value, color) in &expected {
            assert_eq!(nvklass_color(Some(value)), *color, "class {value}");
        }
    }

    #[test]
    fn test_float_encoded_class() {
        assert_eq!(nvklass_color(Some(&json!(2.0))), "#238b45");
        assert_eq!(nvklass_color(Some(&json!(2.5))), NVKLASS_FALLBACK_COLOR);
    }

    #[test]
    fn test_fallback_color() {
        let others = [
            json!(null),
            json!(0),
            json!(5),
            json!(-1),
            json!("unknown"),
            json!("5"),
            json!(" 1"),
            json!("1.0"),
            json!(true),
            json!([1]),
        ];
        for value in &others {
            assert_eq!(nvklass_color(Some(value)), NVKLASS_FALLBACK_COLOR, "{value}");
        }
        assert_eq!(nvklass_color(None), NVKLASS_FALLBACK_COLOR);
    }

    #[test]
    fn test_habitat_style_uses_class_color() {
        let style = habitat_style(Some(&json!(1)));
        assert_eq!(style.fill_color, "#005a32");
        assert_eq!(style.color, "#225522");
        assert_eq!(style.weight, 2);
    }

    #[test]
    fn test_style_serializes_for_leaflet() {
        let json = serde_json::to_value(PROPERTY_STYLE).unwrap();
        assert_eq!(json["fillColor"], "#3388ff");
        assert_eq!(json["weight"], 3);
    }

    #[test]
    fn test_default_view_centres_on_ustorp() {
        let view = MapView::default();
        assert_eq!(view.center, LatLng::new(57.538, 15.182));
        assert_eq!(view.zoom, 14);
    }
}
