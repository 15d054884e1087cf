use foundation::Handle;
use foundation::math::Vec3;

use crate::camera::Camera3D;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SceneId(pub Handle);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CameraId(pub Handle);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RendererId(pub Handle);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(pub Handle);

/// Error reported by a 3D substrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneError {
    pub message: String,
}

impl SceneError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SceneError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Sun,
    SunGlow,
    Earth,
    Asteroid,
}

/// Sphere added to a preview scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    pub kind: BodyKind,
    pub radius: f64,
    /// `0xRRGGBB`.
    pub color: u32,
    pub opacity: f32,
    pub position: Vec3,
}

pub const SUN: Body = Body {
    kind: BodyKind::Sun,
    radius: 1.0,
    color: 0xffaa00,
    opacity: 1.0,
    position: Vec3::ZERO,
};

pub const SUN_GLOW: Body = Body {
    kind: BodyKind::SunGlow,
    radius: 1.3,
    color: 0xffaa00,
    opacity: 0.3,
    position: Vec3::ZERO,
};

pub const EARTH: Body = Body {
    kind: BodyKind::Earth,
    radius: 0.5,
    color: 0x2233ff,
    opacity: 1.0,
    position: Vec3::new(5.0, 0.0, 0.0),
};

pub const ASTEROID: Body = Body {
    kind: BodyKind::Asteroid,
    radius: 0.3,
    color: 0xaaaaaa,
    opacity: 1.0,
    position: Vec3::ZERO,
};

/// Polyline added to a preview scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PathLine {
    pub points: Vec<Vec3>,
    pub color: u32,
    pub opacity: f32,
}

/// The 3D substrate the preview renders through.
///
/// Scene, camera and renderer are separate resources; each must be disposed
/// exactly once. Disposing an unknown id is a no-op.
pub trait SceneBackend: Send + Sync {
    fn create_scene(&self) -> Result<SceneId, SceneError>;
    fn create_camera(&self, camera: Camera3D) -> Result<CameraId, SceneError>;
    fn create_renderer(&self) -> Result<RendererId, SceneError>;

    fn add_body(&self, scene: SceneId, body: &Body) -> Result<ObjectId, SceneError>;
    fn add_path(&self, scene: SceneId, path: &PathLine) -> Result<ObjectId, SceneError>;
    fn set_position(&self, object: ObjectId, position: Vec3) -> Result<(), SceneError>;
    fn update_camera(&self, camera: CameraId, state: Camera3D) -> Result<(), SceneError>;
    fn render(
        &self,
        renderer: RendererId,
        scene: SceneId,
        camera: CameraId,
    ) -> Result<(), SceneError>;

    fn dispose_renderer(&self, renderer: RendererId);
    fn dispose_camera(&self, camera: CameraId);
    fn dispose_scene(&self, scene: SceneId);
}
