use std::sync::Arc;
use std::time::Duration;

use foundation::math::LatLon;
use runtime::AnimationLease;
use tracing::{debug, warn};

use crate::footprint::{FootprintRadii, source_data};
use crate::layer::{LAYER_STACK, SOURCE_STACK};
use crate::pulse::{DEFAULT_PULSE_INTERVAL, start_pulse};
use crate::surface::{MapSurface, SurfaceError};

/// What is currently drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayGeneration {
    /// Increases by one per successful draw.
    pub number: u64,
    pub site: LatLon,
    pub radii: FootprintRadii,
}

/// Owns the impact overlay on a map surface.
///
/// At most one generation is drawn. A new draw cancels the previous pulse and
/// removes every known layer and source before adding anything.
pub struct OverlayController {
    surface: Arc<dyn MapSurface>,
    pulse_interval: Duration,
    pulse: Option<AnimationLease>,
    current: Option<OverlayGeneration>,
    drawn: u64,
}

impl OverlayController {
    pub fn new(surface: Arc<dyn MapSurface>) -> Self {
        Self::with_pulse_interval(surface, DEFAULT_PULSE_INTERVAL)
    }

    pub fn with_pulse_interval(surface: Arc<dyn MapSurface>, pulse_interval: Duration) -> Self {
        Self {
            surface,
            pulse_interval,
            pulse: None,
            current: None,
            drawn: 0,
        }
    }

    pub fn surface(&self) -> &Arc<dyn MapSurface> {
        &self.surface
    }

    pub fn current(&self) -> Option<&OverlayGeneration> {
        self.current.as_ref()
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse.as_ref().is_some_and(AnimationLease::is_active)
    }

    /// Replaces the drawn generation with footprints around `site`.
    ///
    /// Must run inside a tokio runtime (the pulse is a spawned task). On a
    /// surface error the partial generation is removed again.
    pub fn draw_overlay(
        &mut self,
        site: LatLon,
        radii: FootprintRadii,
    ) -> Result<&OverlayGeneration, SurfaceError> {
        self.clear()?;

        if let Err(e) = self.add_generation(site, &radii) {
            warn!("overlay draw at {site} failed: {e}");
            self.clear()?;
            return Err(e);
        }

        self.drawn += 1;
        self.pulse = Some(start_pulse(Arc::clone(&self.surface), self.pulse_interval));
        debug!(
            "overlay generation {} drawn at {site} (crater {:.3} km)",
            self.drawn, radii.crater_km
        );
        Ok(self.current.insert(OverlayGeneration {
            number: self.drawn,
            site,
            radii,
        }))
    }

    /// Cancels the impact-point pulse. Layers and sources stay drawn.
    pub fn stop_pulse(&mut self) {
        if let Some(mut pulse) = self.pulse.take() {
            pulse.stop();
        }
    }

    /// Cancels the pulse and removes every overlay layer and source that exists.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        self.stop_pulse();
        self.current = None;

        for layer in LAYER_STACK.iter().rev() {
            if self.surface.has_layer(layer.id) {
                self.surface.remove_layer(layer.id)?;
            }
        }
        for (id, _) in SOURCE_STACK.iter() {
            if self.surface.has_source(id) {
                self.surface.remove_source(id)?;
            }
        }
        Ok(())
    }

    fn add_generation(&self, site: LatLon, radii: &FootprintRadii) -> Result<(), SurfaceError> {
        for (source_id, shape) in SOURCE_STACK.iter() {
            self.surface
                .add_source(source_id, source_data(*shape, site, radii))?;
            for layer in LAYER_STACK.iter().filter(|l| l.source == *source_id) {
                self.surface.add_layer(layer)?;
            }
        }
        Ok(())
    }
}
