use foundation::math::LatLon;
use parking_lot::Mutex;
use serde_json::Value;

use crate::layer::LayerDef;
use crate::symbology::PaintValue;

/// Error reported by a map surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceError {
    pub message: String,
}

impl SurfaceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SurfaceError {}

/// The 2D map the overlays are drawn on.
///
/// Mirrors a style-based web map: GeoJSON sources and layers addressed by
/// string id. A source cannot be removed while a layer still uses it, and a
/// layer cannot be added before its source.
pub trait MapSurface: Send + Sync {
    fn has_source(&self, id: &str) -> bool;
    fn has_layer(&self, id: &str) -> bool;
    fn add_source(&self, id: &str, data: Value) -> Result<(), SurfaceError>;
    fn remove_source(&self, id: &str) -> Result<(), SurfaceError>;
    fn add_layer(&self, layer: &LayerDef) -> Result<(), SurfaceError>;
    fn remove_layer(&self, id: &str) -> Result<(), SurfaceError>;
    fn set_paint_property(
        &self,
        layer_id: &str,
        property: &str,
        value: PaintValue,
    ) -> Result<(), SurfaceError>;
    /// Animated camera move.
    fn fly_to(&self, center: LatLon, zoom: f64);
    /// Places the selected-site marker, or removes it with `None`.
    fn set_site_marker(&self, site: Option<LatLon>);
}

/// One mutating call observed by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AddSource(String),
    RemoveSource(String),
    AddLayer(String),
    RemoveLayer(String),
    SetPaint {
        layer: String,
        property: String,
        value: PaintValue,
    },
    FlyTo {
        center: LatLon,
        zoom: f64,
    },
    SetMarker(Option<LatLon>),
}

#[derive(Debug, Default)]
struct SurfaceState {
    sources: Vec<(String, Value)>,
    layers: Vec<(LayerDef, Vec<(String, PaintValue)>)>,
    marker: Option<LatLon>,
    ops: Vec<SurfaceOp>,
}

/// In-memory map surface enforcing the same id rules as a real map.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer ids in draw order (back to front).
    pub fn layer_ids(&self) -> Vec<String> {
        let state = self.state.lock();
        state.layers.iter().map(|(l, _)| l.id.to_string()).collect()
    }

    pub fn source_ids(&self) -> Vec<String> {
        let state = self.state.lock();
        state.sources.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn source_data(&self, id: &str) -> Option<Value> {
        let state = self.state.lock();
        state
            .sources
            .iter()
            .find(|(s, _)| s == id)
            .map(|(_, data)| data.clone())
    }

    /// Latest value set for `property` through `set_paint_property`.
    pub fn paint_override(&self, layer_id: &str, property: &str) -> Option<PaintValue> {
        let state = self.state.lock();
        let (_, overrides) = state.layers.iter().find(|(l, _)| l.id == layer_id)?;
        overrides
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
    }

    pub fn marker(&self) -> Option<LatLon> {
        self.state.lock().marker
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.state.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.lock().ops.clear();
    }
}

impl MapSurface for MemorySurface {
    fn has_source(&self, id: &str) -> bool {
        self.state.lock().sources.iter().any(|(s, _)| s == id)
    }

    fn has_layer(&self, id: &str) -> bool {
        self.state.lock().layers.iter().any(|(l, _)| l.id == id)
    }

    fn add_source(&self, id: &str, data: Value) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        if state.sources.iter().any(|(s, _)| s == id) {
            return Err(SurfaceError::new(format!("source {id} already exists")));
        }
        state.sources.push((id.to_string(), data));
        state.ops.push(SurfaceOp::AddSource(id.to_string()));
        Ok(())
    }

    fn remove_source(&self, id: &str) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        if let Some((layer, _)) = state.layers.iter().find(|(l, _)| l.source == id) {
            return Err(SurfaceError::new(format!(
                "source {id} is still used by layer {}",
                layer.id
            )));
        }
        let before = state.sources.len();
        state.sources.retain(|(s, _)| s != id);
        if state.sources.len() == before {
            return Err(SurfaceError::new(format!("no source {id}")));
        }
        state.ops.push(SurfaceOp::RemoveSource(id.to_string()));
        Ok(())
    }

    fn add_layer(&self, layer: &LayerDef) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        if state.layers.iter().any(|(l, _)| l.id == layer.id) {
            return Err(SurfaceError::new(format!("layer {} already exists", layer.id)));
        }
        if !state.sources.iter().any(|(s, _)| s == layer.source) {
            return Err(SurfaceError::new(format!(
                "layer {} references missing source {}",
                layer.id, layer.source
            )));
        }
        state.layers.push((*layer, Vec::new()));
        state.ops.push(SurfaceOp::AddLayer(layer.id.to_string()));
        Ok(())
    }

    fn remove_layer(&self, id: &str) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        let before = state.layers.len();
        state.layers.retain(|(l, _)| l.id != id);
        if state.layers.len() == before {
            return Err(SurfaceError::new(format!("no layer {id}")));
        }
        state.ops.push(SurfaceOp::RemoveLayer(id.to_string()));
        Ok(())
    }

    fn set_paint_property(
        &self,
        layer_id: &str,
        property: &str,
        value: PaintValue,
    ) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        let Some((_, overrides)) = state.layers.iter_mut().find(|(l, _)| l.id == layer_id) else {
            return Err(SurfaceError::new(format!("no layer {layer_id}")));
        };
        overrides.push((property.to_string(), value.clone()));
        state.ops.push(SurfaceOp::SetPaint {
            layer: layer_id.to_string(),
            property: property.to_string(),
            value,
        });
        Ok(())
    }

    fn fly_to(&self, center: LatLon, zoom: f64) {
        self.state.lock().ops.push(SurfaceOp::FlyTo { center, zoom });
    }

    fn set_site_marker(&self, site: Option<LatLon>) {
        let mut state = self.state.lock();
        state.marker = site;
        state.ops.push(SurfaceOp::SetMarker(site));
    }
}

#[cfg(test)]
mod tests {
    use super::{MapSurface, MemorySurface};
    use crate::layer::LAYER_STACK;
    use serde_json::json;

    #[test]
    fn layer_needs_its_source() {
        let surface = MemorySurface::new();
        let layer = &LAYER_STACK[0];
        assert!(surface.add_layer(layer).is_err());
        surface.add_source(layer.source, json!({})).expect("source");
        surface.add_layer(layer).expect("layer");
        assert!(surface.add_layer(layer).is_err());
    }

    #[test]
    fn source_in_use_cannot_be_removed() {
        let surface = MemorySurface::new();
        let layer = &LAYER_STACK[0];
        surface.add_source(layer.source, json!({})).expect("source");
        surface.add_layer(layer).expect("layer");
        assert!(surface.remove_source(layer.source).is_err());
        surface.remove_layer(layer.id).expect("remove layer");
        surface.remove_source(layer.source).expect("remove source");
        assert!(!surface.has_source(layer.source));
    }

    #[test]
    fn marker_is_replaced_and_cleared() {
        let surface = MemorySurface::new();
        let a = foundation::math::LatLon::new(1.0, 2.0);
        surface.set_site_marker(Some(a));
        assert_eq!(surface.marker(), Some(a));
        surface.set_site_marker(None);
        assert_eq!(surface.marker(), None);
    }
}
