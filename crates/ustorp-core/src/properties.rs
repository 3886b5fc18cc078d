//! Helpers for reading and presenting feature properties.
//!
//! Habitat features carry their survey attributes as loosely typed JSON:
//! the same attribute may arrive as a number in one export and as a string
//! in the next. This module provides the conversions used to join and
//! display those attributes.

use geojson::{Feature, JsonObject, JsonValue};

use crate::types::AreaId;

/// Property holding the habitat area identifier.
pub const OBJEKTID: &str = "Objektid";

/// Property holding the natural value class.
pub const NVKLASS: &str = "Nvklass";

/// Property holding the name of a property-boundary feature.
pub const PROPERTY_NAME: &str = "name";

/// Text shown for null property values.
pub const MISSING_VALUE: &str = "N/A";

/// Popup text for property features without a name.
pub const UNNAMED_PROPERTY: &str = "No name available";

/// Extension trait for interpreting loosely typed property values.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use ustorp_core::properties::PropertyValueExt;
/// use ustorp_core::types::AreaId;
///
/// assert_eq!(json!(42).as_area_id(), Some(AreaId(42)));
/// assert_eq!(json!("42").as_area_id(), Some(AreaId(42)));
/// assert_eq!(json!("A-42").as_area_id(), None);
/// assert_eq!(json!(null).display_text(), "N/A");
/// ```
pub trait PropertyValueExt {
    /// Numeric area identifier, if the value is a non-negative integer or a
    /// string holding one.
    fn as_area_id(&self) -> Option<AreaId>;

    /// Text for display in a popup.
    fn display_text(&self) -> String;
}

impl PropertyValueExt for JsonValue {
    fn as_area_id(&self) -> Option<AreaId> {
        let id = match self {
            JsonValue::Number(number) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(value))
                    .map(|value| value as u64)
            }),
            JsonValue::String(text) => text.trim().parse().ok(),
            _ => None,
        };
        id.map(AreaId)
    }

    fn display_text(&self) -> String {
        match self {
            JsonValue::Null => MISSING_VALUE.to_string(),
            JsonValue::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Turns a snake_case attribute name into a popup label.
///
/// Each `_`-separated word gets an upper-case first letter and lower-case
/// rest.
///
/// # Examples
///
/// ```
/// use ustorp_core::properties::format_property_name;
///
/// assert_eq!(format_property_name("area_HA"), "Area Ha");
/// assert_eq!(format_property_name("Nvklass"), "Nvklass");
/// ```
#[must_use]
pub fn format_property_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Label/value rows of a habitat popup, in document order.
#[must_use]
pub fn popup_rows(properties: &JsonObject) -> Vec<(String, String)> {
    properties
        .iter()
        .map(|(key, value)| (format_property_name(key), value.display_text()))
        .collect()
}

/// Popup title of a property-boundary feature.
#[must_use]
pub fn property_label(feature: &Feature) -> String {
    feature
        .property(PROPERTY_NAME)
        .filter(|value| !matches!(value, JsonValue::Null))
        .map(JsonValue::display_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNNAMED_PROPERTY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_area_id_from_numbers() {
        assert_eq!(json!(7).as_area_id(), Some(AreaId(7)));
        assert_eq!(json!(7.0).as_area_id(), Some(AreaId(7)));
        assert_eq!(json!(7.5).as_area_id(), None);
        assert_eq!(json!(-7).as_area_id(), None);
    }

    #[test]
    fn test_area_id_from_strings() {
        assert_eq!(json!("7").as_area_id(), Some(AreaId(7)));
        assert_eq!(json!(" 7 ").as_area_id(), Some(AreaId(7)));
        assert_eq!(json!("").as_area_id(), None);
        assert_eq!(json!("7b").as_area_id(), None);
    }

    #[test]
    fn test_area_id_from_other_values() {
        assert_eq!(json!(null).as_area_id(), None);
        assert_eq!(json!(true).as_area_id(), None);
        assert_eq!(json!([7]).as_area_id(), None);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(json!(null).display_text(), "N/A");
        assert_eq!(json!("Ädellövskog").display_text(), "Ädellövskog");
        assert_eq!(json!(12.5).display_text(), "12.5");
        assert_eq!(json!(3).display_text(), "3");
        assert_eq!(json!(false).display_text(), "false");
    }

    #[test]
    fn test_format_property_name() {
        assert_eq!(format_property_name("biotop_typ"), "Biotop Typ");
        assert_eq!(format_property_name("AREAL_HA"), "Areal Ha");
        assert_eq!(format_property_name("objektid"), "Objektid");
        assert_eq!(format_property_name("ä_ö"), "Ä Ö");
        assert_eq!(format_property_name("a__b"), "A  B");
        assert_eq!(format_property_name(""), "");
    }

    #[test]
    fn test_popup_rows() {
        let mut properties = JsonObject::new();
        properties.insert("Objektid".to_string(), json!(4711));
        properties.insert("natur_klass".to_string(), json!(null));

        let rows = popup_rows(&properties);
        assert_eq!(
            rows,
            vec![
                ("Objektid".to_string(), "4711".to_string()),
                ("Natur Klass".to_string(), "N/A".to_string()),
            ]
        );
    }

    #[test]
    fn test_popup_rows_keep_document_order() {
        let properties: JsonObject =
            serde_json::from_str(r#"{"Objektid": 1, "Nvklass": 2, "Areal": 3}"#).unwrap();

        let names: Vec<String> = popup_rows(&properties)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["Objektid", "Nvklass", "Areal"]);
    }

    #[test]
    fn test_property_label() {
        let mut feature = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert_eq!(property_label(&feature), "No name available");

        feature.set_property(PROPERTY_NAME, JsonValue::Null);
        assert_eq!(property_label(&feature), "No name available");

        feature.set_property(PROPERTY_NAME, "Ustorp 1:4");
        assert_eq!(property_label(&feature), "Ustorp 1:4");
    }
}
