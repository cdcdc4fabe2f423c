// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing element data structures.
//!
//! An element is one vector shape or content item placed on a page. The
//! shape-specific payload lives in [`ElementKind`], a tagged union keyed on
//! the `type` field; geometric fields are individually optional so that a
//! partially-shaped element can still be stored and simply skipped when
//! rendered.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A 2D point in page coordinates, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Fill pattern for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
    #[serde(other)]
    Other,
}

/// Decoration drawn at the end of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    Arrow,
    Triangle,
    Bar,
    Dot,
    #[serde(other)]
    Other,
}

/// Font family of a text element.
///
/// Written as `"sans-serif"` or `"serif"`. Numeric family codes are also
/// read: `1` is sans-serif and any other code is serif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
}

impl<'de> Deserialize<'de> for FontFamily {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(u64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(1) => Ok(Self::SansSerif),
            Repr::Code(_) => Ok(Self::Serif),
            Repr::Name(name) => match name.as_str() {
                "sans-serif" => Ok(Self::SansSerif),
                "serif" => Ok(Self::Serif),
                other => Err(de::Error::unknown_variant(other, &["sans-serif", "serif"])),
            },
        }
    }
}

/// Shape-specific part of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Diamond,
    Line {
        #[serde(default)]
        points: Vec<Point>,
    },
    Arrow {
        #[serde(default)]
        points: Vec<Point>,
        #[serde(
            rename = "endArrowhead",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        end_arrowhead: Option<Arrowhead>,
    },
    Freedraw {
        #[serde(default)]
        points: Vec<Point>,
    },
    Text {
        #[serde(default)]
        text: String,
        #[serde(rename = "fontSize", default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(rename = "fontFamily", default)]
        font_family: FontFamily,
    },
    Image {
        #[serde(rename = "fileId", default, skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
    },
    /// Any element type this application does not know how to draw. The
    /// stored type tag is kept so the element is written back unchanged.
    #[serde(skip)]
    Unknown { tag: String },
}

impl ElementKind {
    const KNOWN_TYPES: [&'static str; 8] = [
        "rectangle",
        "ellipse",
        "diamond",
        "line",
        "arrow",
        "freedraw",
        "text",
        "image",
    ];

    /// Read the kind from an element's fields, keyed on `type`.
    fn from_fields(fields: &Map<String, Value>) -> serde_json::Result<Self> {
        match fields.get("type").and_then(Value::as_str) {
            Some(tag) if Self::KNOWN_TYPES.contains(&tag) => {
                serde_json::from_value(Value::Object(fields.clone()))
            }
            Some(tag) => Ok(Self::Unknown {
                tag: tag.to_string(),
            }),
            None => Err(de::Error::missing_field("type")),
        }
    }

    /// Fields owned by this kind, besides `type`.
    fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Line { .. } | Self::Freedraw { .. } => &["points"],
            Self::Arrow { .. } => &["points", "endArrowhead"],
            Self::Text { .. } => &["text", "fontSize", "fontFamily"],
            Self::Image { .. } => &["fileId"],
            _ => &[],
        }
    }

    /// Write the kind's fields, including `type`, into `fields`.
    fn write_fields(&self, fields: &mut Map<String, Value>) {
        match self {
            Self::Unknown { tag } => {
                fields.insert("type".to_string(), Value::String(tag.clone()));
            }
            known => {
                if let Ok(Value::Object(values)) = serde_json::to_value(known) {
                    fields.extend(values);
                }
            }
        }
    }

    /// Lowercase name of the element type.
    pub fn name(&self) -> &str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Diamond => "diamond",
            Self::Line { .. } => "line",
            Self::Arrow { .. } => "arrow",
            Self::Freedraw { .. } => "freedraw",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Unknown { tag } => tag,
        }
    }
}

fn default_background() -> String {
    "transparent".to_string()
}

/// Wire form of the fields common to every element.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommonFields {
    #[serde(default)]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke_color: Option<String>,
    #[serde(default = "default_background")]
    background_color: String,
    #[serde(default)]
    fill_style: FillStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke_width: Option<f64>,
    #[serde(default)]
    is_deleted: bool,
}

impl CommonFields {
    const NAMES: [&'static str; 10] = [
        "id",
        "x",
        "y",
        "width",
        "height",
        "strokeColor",
        "backgroundColor",
        "fillStyle",
        "strokeWidth",
        "isDeleted",
    ];
}

/// A vector shape placed on a page.
///
/// Fields this application does not model (rotation, roughness, bindings,
/// and so on) are kept in `extra` and written back as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub stroke_color: Option<String>,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: Option<f64>,
    pub is_deleted: bool,
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Element {
    type Error = serde_json::Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let kind = ElementKind::from_fields(&fields)?;
        let common: CommonFields = serde_json::from_value(Value::Object(fields.clone()))?;

        // Whatever is left over, including explicit nulls, is carried as-is.
        for name in std::iter::once(&"type")
            .chain(CommonFields::NAMES.iter())
            .chain(kind.field_names())
        {
            if fields.get(*name).is_some_and(|v| !v.is_null()) {
                fields.remove(*name);
            }
        }

        Ok(Self {
            id: common.id,
            kind,
            x: common.x,
            y: common.y,
            width: common.width,
            height: common.height,
            stroke_color: common.stroke_color,
            background_color: common.background_color,
            fill_style: common.fill_style,
            stroke_width: common.stroke_width,
            is_deleted: common.is_deleted,
            extra: fields,
        })
    }
}

impl From<Element> for Map<String, Value> {
    fn from(element: Element) -> Self {
        let mut fields = element.extra;
        element.kind.write_fields(&mut fields);
        let common = CommonFields {
            id: element.id,
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
            stroke_color: element.stroke_color,
            background_color: element.background_color,
            fill_style: element.fill_style,
            stroke_width: element.stroke_width,
            is_deleted: element.is_deleted,
        };
        if let Ok(Value::Object(values)) = serde_json::to_value(common) {
            fields.extend(values);
        }
        fields
    }
}

impl Element {
    /// Create a new element with a fresh id and default styling.
    pub fn new(kind: ElementKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            stroke_color: Some("#1e1e1e".to_string()),
            background_color: default_background(),
            fill_style: FillStyle::default(),
            stroke_width: Some(2.0),
            is_deleted: false,
            extra: Map::new(),
        }
    }

    /// The element origin, if both coordinates are present and finite.
    pub fn origin(&self) -> Option<Point> {
        let point = Point::new(self.x?, self.y?);
        point.is_finite().then_some(point)
    }

    /// The element bounding box `(x, y, width, height)`, if every field is
    /// present and finite.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let origin = self.origin()?;
        let (width, height) = (self.width?, self.height?);
        if !(width.is_finite() && height.is_finite()) {
            return None;
        }
        Some((origin.x, origin.y, width, height))
    }

    /// Points of line-like elements, relative to the element origin.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.kind {
            ElementKind::Line { points }
            | ElementKind::Arrow { points, .. }
            | ElementKind::Freedraw { points } => Some(points),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_rectangle() {
        let json = r##"{"id":"a","type":"rectangle","x":1,"y":2,"width":3,"height":4,
            "strokeColor":"#ff0000","backgroundColor":"#00ff00","fillStyle":"solid",
            "strokeWidth":2,"isDeleted":false}"##;
        let element: Element = serde_json::from_str(json).unwrap();

        assert_eq!(element.kind, ElementKind::Rectangle);
        assert_eq!(element.bounds(), Some((1.0, 2.0, 3.0, 4.0)));
        assert_eq!(element.fill_style, FillStyle::Solid);
        assert_eq!(element.stroke_color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_deserialize_arrow_with_points() {
        let json = r#"{"id":"b","type":"arrow","x":10,"y":10,"width":50,"height":0,
            "points":[[0,0],[50,0]],"endArrowhead":"arrow"}"#;
        let element: Element = serde_json::from_str(json).unwrap();

        match &element.kind {
            ElementKind::Arrow {
                points,
                end_arrowhead,
            } => {
                assert_eq!(points.len(), 2);
                assert_eq!(points[1], Point::new(50.0, 0.0));
                assert_eq!(*end_arrowhead, Some(Arrowhead::Arrow));
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(element.background_color, "transparent");
    }

    #[test]
    fn test_unknown_type_and_missing_fields() {
        let json = r#"{"id":"c","type":"frame","x":5}"#;
        let element: Element = serde_json::from_str(json).unwrap();

        assert_eq!(
            element.kind,
            ElementKind::Unknown {
                tag: "frame".to_string()
            }
        );
        assert_eq!(element.kind.name(), "frame");
        assert_eq!(element.bounds(), None);
        assert!(element.points().is_none());
    }

    #[test]
    fn test_missing_type_is_an_error() {
        assert!(serde_json::from_str::<Element>(r#"{"id":"d","x":1}"#).is_err());
    }

    #[test]
    fn test_unmodelled_fields_survive_a_roundtrip() {
        let json = r##"{"id":"f","type":"frame","name":"Frame 1","angle":0.5,
            "roughness":1,"x":0.0,"y":0.0,"width":10.0,"height":10.0,"strokeColor":"#000000",
            "backgroundColor":"transparent","fillStyle":"hachure","strokeWidth":1.0,
            "isDeleted":false,"groupIds":["g1"],"boundElements":null}"##;
        let original: Value = serde_json::from_str(json).unwrap();

        let element: Element = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(element.extra["name"], "Frame 1");
        assert_eq!(serde_json::to_value(&element).unwrap(), original);
    }

    #[test]
    fn test_known_kind_keeps_extra_fields_without_duplicates() {
        let json = r#"{"id":"g","type":"arrow","x":0,"y":0,"points":[[0,0],[5,5]],
            "endArrowhead":null,"startArrowhead":"bar","roundness":{"type":2}}"#;
        let mut element: Element = serde_json::from_str(json).unwrap();
        assert!(element.extra.contains_key("startArrowhead"));
        assert!(!element.extra.contains_key("points"));

        if let ElementKind::Arrow { end_arrowhead, .. } = &mut element.kind {
            *end_arrowhead = Some(Arrowhead::Arrow);
        }
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "arrow");
        assert_eq!(value["endArrowhead"], "arrow");
        assert_eq!(value["roundness"]["type"], 2);
        assert_eq!(value["points"][1][0], 5.0);
    }

    #[test]
    fn test_numeric_font_family_codes() {
        let text = |family: &str| {
            let json = format!(r#"{{"id":"t","type":"text","text":"hi","fontFamily":{}}}"#, family);
            match serde_json::from_str::<Element>(&json).unwrap().kind {
                ElementKind::Text { font_family, .. } => font_family,
                other => panic!("unexpected kind {:?}", other),
            }
        };
        assert_eq!(text("1"), FontFamily::SansSerif);
        assert_eq!(text("2"), FontFamily::Serif);
        assert_eq!(text("3"), FontFamily::Serif);
        assert_eq!(text(r#""serif""#), FontFamily::Serif);
        assert!(serde_json::from_str::<Element>(
            r#"{"id":"t","type":"text","fontFamily":"comic"}"#
        )
        .is_err());
    }

    #[test]
    fn test_serialized_shape_is_camel_case_and_tagged() {
        let element = Element::new(
            ElementKind::Text {
                text: "hi".to_string(),
                font_size: Some(16.0),
                font_family: FontFamily::Serif,
            },
            0.0,
            0.0,
            10.0,
            10.0,
        );
        let value = serde_json::to_value(&element).unwrap();

        assert_eq!(value["type"], "text");
        assert_eq!(value["fontSize"], 16.0);
        assert_eq!(value["fontFamily"], "serif");
        assert_eq!(value["isDeleted"], false);
        assert!(value.get("strokeColor").is_some());
    }
}
