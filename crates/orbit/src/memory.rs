//! Headless [`SceneBackend`] that tracks resources instead of drawing.

use std::collections::{HashMap, HashSet};

use foundation::Handle;
use foundation::math::Vec3;
use parking_lot::Mutex;

use crate::backend::{
    Body, CameraId, ObjectId, PathLine, RendererId, SceneBackend, SceneError, SceneId,
};
use crate::camera::Camera3D;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Scene,
    Camera,
    Renderer,
}

#[derive(Debug, Default)]
struct SceneState {
    next_index: u32,
    scenes: HashSet<Handle>,
    cameras: HashMap<Handle, Camera3D>,
    renderers: HashSet<Handle>,
    objects: HashMap<Handle, (Handle, Vec3)>,
    bodies: Vec<Body>,
    paths: Vec<PathLine>,
    renders: u64,
    disposed: Vec<Resource>,
    fail_create: Option<Resource>,
    fail_render: bool,
}

impl SceneState {
    fn mint(&mut self) -> Handle {
        let handle = Handle::new(self.next_index, 0);
        self.next_index += 1;
        handle
    }
}

#[derive(Debug, Default)]
pub struct MemoryScene {
    state: Mutex<SceneState>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later creation of `resource` fail until cleared with `None`.
    pub fn fail_create(&self, resource: Option<Resource>) {
        self.state.lock().fail_create = resource;
    }

    pub fn fail_render(&self, fail: bool) {
        self.state.lock().fail_render = fail;
    }

    /// `(scenes, cameras, renderers)` currently alive.
    pub fn live_counts(&self) -> (usize, usize, usize) {
        let state = self.state.lock();
        (state.scenes.len(), state.cameras.len(), state.renderers.len())
    }

    pub fn renders(&self) -> u64 {
        self.state.lock().renders
    }

    /// Disposal calls in the order they happened.
    pub fn disposed(&self) -> Vec<Resource> {
        self.state.lock().disposed.clone()
    }

    /// Every body ever added, in order.
    pub fn bodies(&self) -> Vec<Body> {
        self.state.lock().bodies.clone()
    }

    pub fn paths(&self) -> Vec<PathLine> {
        self.state.lock().paths.clone()
    }

    pub fn position(&self, object: ObjectId) -> Option<Vec3> {
        self.state.lock().objects.get(&object.0).map(|(_, p)| *p)
    }

    pub fn camera(&self, camera: CameraId) -> Option<Camera3D> {
        self.state.lock().cameras.get(&camera.0).copied()
    }

    fn check_create(state: &SceneState, resource: Resource) -> Result<(), SceneError> {
        if state.fail_create == Some(resource) {
            return Err(SceneError::new(format!("cannot create {resource:?}")));
        }
        Ok(())
    }
}

impl SceneBackend for MemoryScene {
    fn create_scene(&self) -> Result<SceneId, SceneError> {
        let mut state = self.state.lock();
        Self::check_create(&state, Resource::Scene)?;
        let handle = state.mint();
        state.scenes.insert(handle);
        Ok(SceneId(handle))
    }

    fn create_camera(&self, camera: Camera3D) -> Result<CameraId, SceneError> {
        let mut state = self.state.lock();
        Self::check_create(&state, Resource::Camera)?;
        let handle = state.mint();
        state.cameras.insert(handle, camera);
        Ok(CameraId(handle))
    }

    fn create_renderer(&self) -> Result<RendererId, SceneError> {
        let mut state = self.state.lock();
        Self::check_create(&state, Resource::Renderer)?;
        let handle = state.mint();
        state.renderers.insert(handle);
        Ok(RendererId(handle))
    }

    fn add_body(&self, scene: SceneId, body: &Body) -> Result<ObjectId, SceneError> {
        let mut state = self.state.lock();
        if !state.scenes.contains(&scene.0) {
            return Err(SceneError::new("unknown scene"));
        }
        let handle = state.mint();
        state.objects.insert(handle, (scene.0, body.position));
        state.bodies.push(*body);
        Ok(ObjectId(handle))
    }

    fn add_path(&self, scene: SceneId, path: &PathLine) -> Result<ObjectId, SceneError> {
        let mut state = self.state.lock();
        if !state.scenes.contains(&scene.0) {
            return Err(SceneError::new("unknown scene"));
        }
        let handle = state.mint();
        state.objects.insert(handle, (scene.0, Vec3::ZERO));
        state.paths.push(path.clone());
        Ok(ObjectId(handle))
    }

    fn set_position(&self, object: ObjectId, position: Vec3) -> Result<(), SceneError> {
        let mut state = self.state.lock();
        match state.objects.get_mut(&object.0) {
            Some((_, p)) => {
                *p = position;
                Ok(())
            }
            None => Err(SceneError::new("unknown object")),
        }
    }

    fn update_camera(&self, camera: CameraId, update: Camera3D) -> Result<(), SceneError> {
        let mut state = self.state.lock();
        match state.cameras.get_mut(&camera.0) {
            Some(c) => {
                *c = update;
                Ok(())
            }
            None => Err(SceneError::new("unknown camera")),
        }
    }

    fn render(
        &self,
        renderer: RendererId,
        scene: SceneId,
        camera: CameraId,
    ) -> Result<(), SceneError> {
        let mut state = self.state.lock();
        if state.fail_render {
            return Err(SceneError::new("render failed"));
        }
        if !state.renderers.contains(&renderer.0)
            || !state.scenes.contains(&scene.0)
            || !state.cameras.contains_key(&camera.0)
        {
            return Err(SceneError::new("render with released resources"));
        }
        state.renders += 1;
        Ok(())
    }

    fn dispose_renderer(&self, renderer: RendererId) {
        let mut state = self.state.lock();
        if state.renderers.remove(&renderer.0) {
            state.disposed.push(Resource::Renderer);
        }
    }

    fn dispose_camera(&self, camera: CameraId) {
        let mut state = self.state.lock();
        if state.cameras.remove(&camera.0).is_some() {
            state.disposed.push(Resource::Camera);
        }
    }

    fn dispose_scene(&self, scene: SceneId) {
        let mut state = self.state.lock();
        if state.scenes.remove(&scene.0) {
            state.objects.retain(|_, (owner, _)| *owner != scene.0);
            state.disposed.push(Resource::Scene);
        }
    }
}
