use glam::{Mat4, Quat, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
/// How far the cube sits in front of the camera.
pub const CAMERA_DISTANCE: f32 = 5.0;

const EPSILON: f32 = 1e-6;

/// Perspective projection for a viewport of the given aspect (width / height).
pub fn projection_matrix(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
}

/// Rotation axis and angle of `q`.
///
/// The axis is `xyz / sin(angle / 2)` and is not normalized, so a non-unit
/// quaternion yields a non-unit axis. Near-zero rotations report +X.
pub fn axis_angle(q: Quat) -> (Vec3, f32) {
    let angle = q.w.acos() * 2.0;
    let s = (angle / 2.0).sin();
    if s > EPSILON {
        (Vec3::new(q.x, q.y, q.z) / s, angle)
    } else {
        (Vec3::X, angle)
    }
}

/// Map a sensor East-North-Up axis into view space.
///
/// X (right) <- X (east), Y (up) <- Z (up), Z (towards viewer) <- -Y (north).
pub fn enu_to_view(axis: Vec3) -> Vec3 {
    Vec3::new(axis.x, axis.z, -axis.y)
}

/// View-space rotation axis and angle for a sensor orientation.
///
/// With `invert` the quaternion is conjugated before extraction, which
/// reverses the apparent rotation while the angle stays the same.
pub fn orientation_rotation(orientation: Quat, invert: bool) -> (Vec3, f32) {
    let q = if invert {
        orientation.conjugate()
    } else {
        orientation
    };
    let (axis, angle) = axis_angle(q);
    (enu_to_view(axis), angle)
}

/// Model-view matrix: pull the camera back, then apply the orientation.
pub fn model_view_matrix(orientation: Quat, invert: bool) -> Mat4 {
    model_view_with(orientation, invert, rotate)
}

/// [`model_view_matrix`] with the rotate step supplied by the caller.
pub fn model_view_with<F>(orientation: Quat, invert: bool, rotate_step: F) -> Mat4
where
    F: FnOnce(Mat4, Vec3, f32) -> Mat4,
{
    let translated = Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE));
    let (axis, angle) = orientation_rotation(orientation, invert);
    rotate_step(translated, axis, angle)
}

/// Post-multiply `m` by a rotation of `angle` around `axis`.
/// Degenerate axes leave `m` unchanged.
pub fn rotate(m: Mat4, axis: Vec3, angle: f32) -> Mat4 {
    let len = axis.length();
    if len < EPSILON {
        return m;
    }
    m * Mat4::from_axis_angle(axis / len, angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn identity_has_zero_angle() {
        let (axis, angle) = axis_angle(Quat::IDENTITY);
        assert_eq!(axis, Vec3::X);
        assert_eq!(angle, 0.0);
        assert_eq!(
            model_view_matrix(Quat::IDENTITY, false),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
        );
    }

    #[test]
    fn axis_angle_of_known_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.6, 0.8), 1.2);
        let (axis, angle) = axis_angle(q);
        assert!((angle - 1.2).abs() < 1e-5);
        assert!(approx(axis, Vec3::new(0.0, 0.6, 0.8)));
    }

    #[test]
    fn remap_moves_up_to_y_and_north_to_minus_z() {
        assert_eq!(enu_to_view(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 3.0, -2.0));
        assert_eq!(enu_to_view(Vec3::Z), Vec3::Y);
        assert_eq!(enu_to_view(Vec3::Y), Vec3::NEG_Z);
    }

    #[test]
    fn rotate_step_receives_remapped_axis() {
        let q = Quat::from_axis_angle(Vec3::new(0.48, 0.6, 0.64), 0.9);
        let (ax, _) = axis_angle(q);

        let mut recorded = None;
        model_view_with(q, false, |m, axis, angle| {
            recorded = Some((axis, angle));
            m
        });

        let (axis, angle) = recorded.unwrap();
        assert!(approx(axis, Vec3::new(ax.x, ax.z, -ax.y)));
        assert!((angle - 0.9).abs() < 1e-5);
    }

    #[test]
    fn invert_reverses_direction_with_same_angle() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let (axis, angle) = orientation_rotation(q, false);
        let (inv_axis, inv_angle) = orientation_rotation(q, true);

        assert!((angle - inv_angle).abs() < 1e-6);
        assert!(approx(inv_axis, -axis));

        // A quarter turn about sensor up spins the cube about view +Y.
        assert!(approx(axis, Vec3::Y));
    }

    #[test]
    fn invert_twice_is_no_invert() {
        let q = Quat::from_xyzw(0.1, -0.4, 0.3, 0.85);
        let original = q;

        assert_eq!(
            orientation_rotation(q.conjugate(), true),
            orientation_rotation(q, false)
        );
        assert_eq!(
            model_view_matrix(q.conjugate(), true),
            model_view_matrix(q, false)
        );
        assert_eq!(q, original);
    }

    #[test]
    fn non_unit_quaternion_still_renders() {
        // Partially updated state: only w has moved.
        let q = Quat::from_xyzw(0.0, 0.0, 0.0, 0.5);
        let (axis, angle) = axis_angle(q);
        assert!(angle > 0.0);
        assert_eq!(axis, Vec3::ZERO);
        // Zero-length axis: the rotate step is skipped.
        assert_eq!(
            model_view_matrix(q, false),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
        );
    }

    #[test]
    fn projection_maps_near_and_far_planes() {
        let p = projection_matrix(1.0);
        let near = p.project_point3(Vec3::new(0.0, 0.0, -Z_NEAR));
        let far = p.project_point3(Vec3::new(0.0, 0.0, -Z_FAR));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }
}
