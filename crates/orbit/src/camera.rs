use foundation::math::Vec3;

/// Where the preview camera starts before the first frame.
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 10.0, 20.0);

/// Horizontal distance of the orbiting camera from the Sun.
pub const CAMERA_ORBIT_RADIUS: f64 = 20.0;

/// Camera azimuth advance relative to the asteroid's anomaly.
pub const CAMERA_AZIMUTH_RATIO: f64 = 0.1;

pub const CAMERA_FOV_Y_DEG: f64 = 45.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera3D {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_rad: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target,
            fov_y_rad,
            near,
            far,
        }
    }

    /// Initial preview camera, looking at the Sun.
    pub fn preview() -> Self {
        Self::look_at(
            CAMERA_START,
            Vec3::ZERO,
            CAMERA_FOV_Y_DEG.to_radians(),
            0.1,
            1000.0,
        )
    }

    /// The preview camera after the asteroid has advanced to `angle`.
    ///
    /// Height stays at its starting value; only the azimuth moves.
    pub fn orbiting(self, angle: f64) -> Self {
        let azimuth = angle * CAMERA_AZIMUTH_RATIO;
        Self {
            position: Vec3::new(
                azimuth.cos() * CAMERA_ORBIT_RADIUS,
                self.position.y,
                azimuth.sin() * CAMERA_ORBIT_RADIUS,
            ),
            target: Vec3::ZERO,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CAMERA_START, Camera3D};
    use foundation::math::Vec3;

    #[test]
    fn preview_looks_at_the_sun() {
        let cam = Camera3D::preview();
        assert_eq!(cam.position, CAMERA_START);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn orbiting_keeps_radius_and_height() {
        let cam = Camera3D::preview().orbiting(3.0);
        let horizontal = (cam.position.x.powi(2) + cam.position.z.powi(2)).sqrt();
        assert!((horizontal - 20.0).abs() < 1e-9);
        assert_eq!(cam.position.y, 10.0);
        assert!((cam.position.x - 0.3f64.cos() * 20.0).abs() < 1e-12);
    }
}
