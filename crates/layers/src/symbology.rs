use serde_json::{Map, Value};

use crate::layer::{
    CRATER_FILL, CRATER_GLOW, CRATER_LINE, FIREBALL_FILL, FIREBALL_LINE, IMPACT_POINT,
    SHOCKWAVE_FILL, SHOCKWAVE_LINE,
};

/// Resting `circle-radius` of the impact point (px).
pub const IMPACT_POINT_RADIUS_PX: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintValue {
    Color(&'static str),
    Number(f64),
}

impl PaintValue {
    pub fn to_json(&self) -> Value {
        match self {
            PaintValue::Color(c) => Value::from(*c),
            PaintValue::Number(n) => Value::from(*n),
        }
    }
}

/// Ordered paint properties of one layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paint {
    pub properties: Vec<(&'static str, PaintValue)>,
}

impl Paint {
    pub fn color(mut self, key: &'static str, color: &'static str) -> Self {
        self.properties.push((key, PaintValue::Color(color)));
        self
    }

    pub fn number(mut self, key: &'static str, value: f64) -> Self {
        self.properties.push((key, PaintValue::Number(value)));
        self
    }

    pub fn get(&self, key: &str) -> Option<&PaintValue> {
        self.properties.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

/// Paint of a stack layer; empty for unknown ids.
pub fn paint_for(layer_id: &str) -> Paint {
    let paint = Paint::default();
    match layer_id {
        SHOCKWAVE_FILL => paint
            .color("fill-color", "#ff4500")
            .number("fill-opacity", 0.08),
        SHOCKWAVE_LINE => paint
            .color("line-color", "#ff4500")
            .number("line-width", 1.0)
            .number("line-opacity", 0.3),
        FIREBALL_FILL => paint
            .color("fill-color", "#ff8c00")
            .number("fill-opacity", 0.25),
        FIREBALL_LINE => paint
            .color("line-color", "#ff6600")
            .number("line-width", 1.5)
            .number("line-opacity", 0.5),
        CRATER_GLOW => paint
            .color("line-color", "#ffaa00ff")
            .number("line-width", 8.0)
            .number("line-blur", 6.0)
            .number("line-opacity", 0.6),
        CRATER_FILL => paint
            .color("fill-color", "#1a1a1a")
            .number("fill-opacity", 0.92),
        CRATER_LINE => paint
            .color("line-color", "#d4a574")
            .number("line-width", 2.5),
        IMPACT_POINT => paint
            .number("circle-radius", IMPACT_POINT_RADIUS_PX)
            .color("circle-color", "#ffffff")
            .color("circle-stroke-color", "#ff0000")
            .number("circle-stroke-width", 2.0)
            .number("circle-opacity", 0.95),
        _ => paint,
    }
}
