use crate::symbology::{Paint, paint_for};

pub const SHOCKWAVE_FILL: &str = "shockwave-fill";
pub const SHOCKWAVE_LINE: &str = "shockwave-line";
pub const FIREBALL_FILL: &str = "fireball-fill";
pub const FIREBALL_LINE: &str = "fireball-line";
pub const CRATER_GLOW: &str = "crater-glow";
pub const CRATER_FILL: &str = "crater-fill";
pub const CRATER_LINE: &str = "crater-line";
pub const IMPACT_POINT: &str = "impact-point";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Fill,
    Line,
    Circle,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Fill => "fill",
            LayerKind::Line => "line",
            LayerKind::Circle => "circle",
        }
    }
}

/// Footprint a GeoJSON source is built from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SourceShape {
    Shockwave,
    Fireball,
    Crater,
    ImpactPoint,
}

/// Static description of one overlay layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerDef {
    pub id: &'static str,
    pub kind: LayerKind,
    pub source: &'static str,
}

impl LayerDef {
    pub fn paint(&self) -> Paint {
        paint_for(self.id)
    }
}

/// Overlay layers, back to front.
pub static LAYER_STACK: [LayerDef; 8] = [
    LayerDef { id: SHOCKWAVE_FILL, kind: LayerKind::Fill, source: SHOCKWAVE_FILL },
    LayerDef { id: SHOCKWAVE_LINE, kind: LayerKind::Line, source: SHOCKWAVE_FILL },
    LayerDef { id: FIREBALL_FILL, kind: LayerKind::Fill, source: FIREBALL_FILL },
    LayerDef { id: FIREBALL_LINE, kind: LayerKind::Line, source: FIREBALL_FILL },
    LayerDef { id: CRATER_GLOW, kind: LayerKind::Line, source: CRATER_GLOW },
    LayerDef { id: CRATER_FILL, kind: LayerKind::Fill, source: CRATER_FILL },
    LayerDef { id: CRATER_LINE, kind: LayerKind::Line, source: CRATER_FILL },
    LayerDef { id: IMPACT_POINT, kind: LayerKind::Circle, source: IMPACT_POINT },
];

/// Overlay sources in the order they are added.
pub static SOURCE_STACK: [(&str, SourceShape); 5] = [
    (SHOCKWAVE_FILL, SourceShape::Shockwave),
    (FIREBALL_FILL, SourceShape::Fireball),
    (CRATER_GLOW, SourceShape::Crater),
    (CRATER_FILL, SourceShape::Crater),
    (IMPACT_POINT, SourceShape::ImpactPoint),
];

/// Layers drawing from `source`, back to front.
pub fn layers_for_source(source: &str) -> impl Iterator<Item = &'static LayerDef> + '_ {
    LAYER_STACK.iter().filter(move |l| l.source == source)
}

#[cfg(test)]
mod tests {
    use super::{LAYER_STACK, SOURCE_STACK, layers_for_source};

    #[test]
    fn every_layer_has_a_source_added_before_it() {
        for (i, layer) in LAYER_STACK.iter().enumerate() {
            let source_pos = SOURCE_STACK
                .iter()
                .position(|(id, _)| *id == layer.source)
                .expect("layer source is declared");
            // Sources precede any layer of a later source in the stack.
            for earlier in &LAYER_STACK[..i] {
                let earlier_pos = SOURCE_STACK
                    .iter()
                    .position(|(id, _)| *id == earlier.source)
                    .expect("declared");
                assert!(earlier_pos <= source_pos);
            }
        }
    }

    #[test]
    fn every_source_is_used() {
        for (id, _) in SOURCE_STACK.iter() {
            assert!(layers_for_source(id).next().is_some(), "{id} unused");
        }
    }

    #[test]
    fn crater_fill_feeds_two_layers() {
        let ids: Vec<_> = layers_for_source("crater-fill").map(|l| l.id).collect();
        assert_eq!(ids, vec!["crater-fill", "crater-line"]);
    }
}
