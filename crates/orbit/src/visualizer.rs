use std::sync::Arc;
use std::time::Duration;

use runtime::{AnimationLease, TickControl};
use tracing::{debug, info, warn};

use crate::backend::{
    ASTEROID, CameraId, EARTH, ObjectId, PathLine, RendererId, SUN, SUN_GLOW, SceneBackend,
    SceneError, SceneId,
};
use crate::camera::Camera3D;
use crate::elements::{
    ANGLE_STEP, ORBIT_PATH_STEPS, OrbitEllipse, OrbitParameters, earth_path, earth_position,
};
use crate::summary::OrbitSummary;

/// Roughly one display refresh.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// The resources of one running preview. Created together, released together.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OrbitHandles {
    pub scene: SceneId,
    pub camera: CameraId,
    pub renderer: RendererId,
    pub earth: ObjectId,
    pub asteroid: ObjectId,
}

struct ActiveOrbit {
    handles: OrbitHandles,
    summary: OrbitSummary,
    frames: AnimationLease,
}

/// Runs at most one orbit preview at a time.
pub struct OrbitVisualizer {
    backend: Arc<dyn SceneBackend>,
    frame_interval: Duration,
    active: Option<ActiveOrbit>,
}

impl OrbitVisualizer {
    pub fn new(backend: Arc<dyn SceneBackend>) -> Self {
        Self::with_frame_interval(backend, DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_frame_interval(backend: Arc<dyn SceneBackend>, frame_interval: Duration) -> Self {
        Self {
            backend,
            frame_interval,
            active: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn handles(&self) -> Option<OrbitHandles> {
        self.active.as_ref().map(|a| a.handles)
    }

    pub fn summary(&self) -> Option<&OrbitSummary> {
        self.active.as_ref().map(|a| &a.summary)
    }

    /// Starts a preview for `summary`, releasing any running one first.
    ///
    /// Must run inside a tokio runtime. If building the new scene fails,
    /// whatever was created for it is released and nothing stays active.
    pub fn open(&mut self, summary: OrbitSummary) -> Result<OrbitHandles, SceneError> {
        self.stop();

        let ellipse = OrbitEllipse::from_parameters(&summary.orbit);
        let handles = build_scene(self.backend.as_ref(), &ellipse)?;
        let frames = start_frames(
            Arc::clone(&self.backend),
            handles,
            ellipse,
            self.frame_interval,
        );

        info!(
            "orbit preview opened for {} (a={:.3} AU, e={:.3}, i={:.2})",
            summary.title,
            summary.orbit.semi_major_axis_au,
            summary.orbit.eccentricity,
            summary.orbit.inclination_deg
        );
        self.active = Some(ActiveOrbit {
            handles,
            summary,
            frames,
        });
        Ok(handles)
    }

    /// Convenience for [`OrbitVisualizer::open`] from bare parameters.
    pub fn open_parameters(
        &mut self,
        title: impl Into<String>,
        orbit: OrbitParameters,
    ) -> Result<OrbitHandles, SceneError> {
        self.open(OrbitSummary {
            title: title.into(),
            diameter_km: 0.0,
            velocity_km_s: 0.0,
            miss_distance_km: 0.0,
            approach: None,
            orbit,
        })
    }

    /// Stops the animation and releases renderer, camera and scene. No-op
    /// when nothing is running.
    pub fn stop(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        active.frames.stop();
        release(self.backend.as_ref(), &active.handles);
        debug!("orbit preview for {} released", active.summary.title);
    }
}

impl Drop for OrbitVisualizer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn build_scene(
    backend: &dyn SceneBackend,
    ellipse: &OrbitEllipse,
) -> Result<OrbitHandles, SceneError> {
    let scene = backend.create_scene()?;
    let camera = match backend.create_camera(Camera3D::preview()) {
        Ok(camera) => camera,
        Err(e) => {
            backend.dispose_scene(scene);
            return Err(e);
        }
    };
    let renderer = match backend.create_renderer() {
        Ok(renderer) => renderer,
        Err(e) => {
            backend.dispose_camera(camera);
            backend.dispose_scene(scene);
            return Err(e);
        }
    };

    let populate = || -> Result<(ObjectId, ObjectId), SceneError> {
        backend.add_body(scene, &SUN)?;
        backend.add_body(scene, &SUN_GLOW)?;
        let earth = backend.add_body(scene, &EARTH)?;
        backend.add_path(
            scene,
            &PathLine {
                points: earth_path(),
                color: 0x4444ff,
                opacity: 0.3,
            },
        )?;
        backend.add_path(
            scene,
            &PathLine {
                points: ellipse.path(ORBIT_PATH_STEPS),
                color: 0xff6600,
                opacity: 1.0,
            },
        )?;
        let asteroid = backend.add_body(scene, &ASTEROID)?;
        Ok((earth, asteroid))
    };

    match populate() {
        Ok((earth, asteroid)) => Ok(OrbitHandles {
            scene,
            camera,
            renderer,
            earth,
            asteroid,
        }),
        Err(e) => {
            backend.dispose_renderer(renderer);
            backend.dispose_camera(camera);
            backend.dispose_scene(scene);
            Err(e)
        }
    }
}

fn release(backend: &dyn SceneBackend, handles: &OrbitHandles) {
    backend.dispose_renderer(handles.renderer);
    backend.dispose_camera(handles.camera);
    backend.dispose_scene(handles.scene);
}

fn start_frames(
    backend: Arc<dyn SceneBackend>,
    handles: OrbitHandles,
    ellipse: OrbitEllipse,
    interval: Duration,
) -> AnimationLease {
    let mut camera = Camera3D::preview();
    AnimationLease::start("orbit-preview", interval, move |frame| {
        let angle = (frame.index + 1) as f64 * ANGLE_STEP;
        camera = camera.orbiting(angle);

        let step = backend
            .set_position(handles.asteroid, ellipse.point_at(angle))
            .and_then(|()| backend.set_position(handles.earth, earth_position(angle)))
            .and_then(|()| backend.update_camera(handles.camera, camera))
            .and_then(|()| backend.render(handles.renderer, handles.scene, handles.camera));

        match step {
            Ok(()) => TickControl::Continue,
            Err(e) => {
                warn!("orbit frame {} failed: {e}", frame.index);
                TickControl::Stop
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::OrbitVisualizer;
    use crate::elements::OrbitParameters;
    use crate::memory::{MemoryScene, Resource};
    use std::sync::Arc;
    use std::time::Duration;

    fn visualizer(backend: &Arc<MemoryScene>) -> OrbitVisualizer {
        OrbitVisualizer::with_frame_interval(backend.clone(), Duration::from_millis(16))
    }

    #[tokio::test(start_paused = true)]
    async fn renders_until_stopped() {
        let backend = Arc::new(MemoryScene::new());
        let mut vis = visualizer(&backend);
        vis.open_parameters("Eros", OrbitParameters::default())
            .expect("open");
        assert_eq!(backend.live_counts(), (1, 1, 1));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(backend.renders(), 3);

        vis.stop();
        assert_eq!(backend.live_counts(), (0, 0, 0));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(backend.renders(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_twice_is_a_no_op() {
        let backend = Arc::new(MemoryScene::new());
        let mut vis = visualizer(&backend);
        vis.open_parameters("A", OrbitParameters::default())
            .expect("open");
        vis.stop();
        vis.stop();
        assert_eq!(
            backend.disposed(),
            vec![Resource::Renderer, Resource::Camera, Resource::Scene]
        );
        assert!(!vis.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_open_releases_the_previous_preview() {
        let backend = Arc::new(MemoryScene::new());
        let mut vis = visualizer(&backend);
        vis.open_parameters("first", OrbitParameters::default())
            .expect("open");

        backend.fail_create(Some(Resource::Renderer));
        assert!(vis
            .open_parameters("second", OrbitParameters::default())
            .is_err());
        assert!(!vis.is_running());
        assert_eq!(backend.live_counts(), (0, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn render_failure_ends_the_loop_but_keeps_resources_until_stop() {
        let backend = Arc::new(MemoryScene::new());
        let mut vis = visualizer(&backend);
        vis.open_parameters("A", OrbitParameters::default())
            .expect("open");
        backend.fail_render(true);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(backend.renders(), 0);
        assert_eq!(backend.live_counts(), (1, 1, 1));
        vis.stop();
        assert_eq!(backend.live_counts(), (0, 0, 0));
    }
}
