use std::sync::Arc;
use std::time::Duration;

use runtime::{AnimationLease, TickControl};
use tracing::{debug, warn};

use crate::layer::IMPACT_POINT;
use crate::surface::MapSurface;
use crate::symbology::{IMPACT_POINT_RADIUS_PX, PaintValue};

pub const PULSE_MIN_RADIUS_PX: f64 = IMPACT_POINT_RADIUS_PX;
pub const PULSE_MAX_RADIUS_PX: f64 = 8.0;
pub const PULSE_STEP_PX: f64 = 0.5;
pub const DEFAULT_PULSE_INTERVAL: Duration = Duration::from_millis(80);

/// Triangle-wave radius of the impact-point marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PulseState {
    pub radius_px: f64,
    rising: bool,
}

impl Default for PulseState {
    fn default() -> Self {
        Self {
            radius_px: PULSE_MIN_RADIUS_PX,
            rising: true,
        }
    }
}

impl PulseState {
    /// Steps once and returns the new radius; turns around at either bound.
    pub fn advance(&mut self) -> f64 {
        let step = if self.rising { PULSE_STEP_PX } else { -PULSE_STEP_PX };
        self.radius_px = (self.radius_px + step).clamp(PULSE_MIN_RADIUS_PX, PULSE_MAX_RADIUS_PX);
        if self.radius_px >= PULSE_MAX_RADIUS_PX {
            self.rising = false;
        }
        if self.radius_px <= PULSE_MIN_RADIUS_PX {
            self.rising = true;
        }
        self.radius_px
    }
}

/// Starts pulsing the impact point. The loop ends itself once the layer is
/// gone from `surface`.
pub fn start_pulse(surface: Arc<dyn MapSurface>, period: Duration) -> AnimationLease {
    let mut state = PulseState::default();
    AnimationLease::start("impact-pulse", period, move |_frame| {
        let radius = state.advance();
        if !surface.has_layer(IMPACT_POINT) {
            debug!("impact point removed; pulse ends");
            return TickControl::Stop;
        }
        if let Err(e) =
            surface.set_paint_property(IMPACT_POINT, "circle-radius", PaintValue::Number(radius))
        {
            warn!("pulse update failed: {e}");
            return TickControl::Stop;
        }
        TickControl::Continue
    })
}
