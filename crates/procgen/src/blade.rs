//! A single grass blade: where it sits on the placement sphere and the
//! five-vertex mesh built around that spot.
//!
//! Blade layout (seen from the front, `up` pointing to the top of the page):
//!
//! ```text
//!            4 (tip)
//!           / \
//!     3 ---+---+--- 2      mid pair, half the base width, at half height
//!      \   |   |   /
//!       1 -+---+- 0        base pair, full width, on the sphere
//! ```
//!
//! Vertices are emitted as bottom-left, bottom-right, top-right, top-left, tip.

use crate::field::{remap, GrassFieldConfig};
use glam::{Vec2, Vec3};
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Vertices per blade.
pub const BLADE_VERTEX_COUNT: usize = 5;
/// Indices per blade (three triangles).
pub const BLADE_INDEX_COUNT: usize = 9;

/// Triangle list for one blade, relative to the blade's first vertex.
pub const BLADE_INDICES: [u32; BLADE_INDEX_COUNT] = [0, 1, 2, 2, 4, 3, 3, 0, 2];

pub const BASE_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
pub const MID_COLOR: [f32; 3] = [0.5, 0.5, 0.5];
pub const TIP_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Per-vertex colours in emission order. The grass shader reads this gradient
/// as the height along the blade (0 at the root, 1 at the tip), so it must
/// never depend on the random draws.
pub const BLADE_COLORS: [[f32; 3]; BLADE_VERTEX_COUNT] =
    [BASE_COLOR, BASE_COLOR, MID_COLOR, MID_COLOR, TIP_COLOR];

/// Horizontal unit direction for an angle around the world Y axis.
/// Angle 0 faces -Z.
pub fn yaw_direction(angle: f32) -> Vec3 {
    Vec3::new(angle.sin(), 0.0, -angle.cos())
}

/// Placement and shape parameters for one blade. Computed, consumed, dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BladeSpec {
    /// Root of the blade on the placement sphere.
    pub center: Vec3,
    /// Outward unit normal at `center`; the blade's local up.
    pub normal: Vec3,
    /// Facing angle in [0, 2π).
    pub yaw: f32,
    /// Direction the tip leans, in [0, 2π). Drawn independently of `yaw`.
    pub tip_bend: f32,
    /// Full blade height, in [base_height, base_height + height_variation).
    pub height: f32,
    /// Texture coordinate shared by all five vertices.
    pub uv: Vec2,
}

impl BladeSpec {
    /// Draw a blade placement from `rng`.
    ///
    /// The centre uses a plain spherical-coordinate draw (`theta` over the
    /// full turn, `phi` over half a turn). That is not area-uniform: blades
    /// bunch up around the ±Z poles.
    pub fn sample<R: Rng + ?Sized>(config: &GrassFieldConfig, rng: &mut R) -> Self {
        let radius = config.radius();

        let theta = rng.gen_range(0.0..TAU);
        let phi = rng.gen_range(0.0..PI);
        let center = Vec3::new(
            radius * theta.sin() * phi.cos(),
            radius * theta.sin() * phi.sin(),
            radius * theta.cos(),
        );
        let normal = center.normalize();

        // Unclamped; stays within [0, 1] up to rounding.
        let uv = Vec2::new(
            remap(center.x, -radius, radius, 0.0, 1.0),
            remap(center.y, -radius, radius, 0.0, 1.0),
        );

        let height = config.base_height + rng.gen::<f32>() * config.height_variation;
        let yaw = rng.gen_range(0.0..TAU);
        let tip_bend = rng.gen_range(0.0..TAU);

        Self {
            center,
            normal,
            yaw,
            tip_bend,
            height,
            uv,
        }
    }

    /// Local orientation frame for this blade.
    pub fn frame(&self) -> BladeFrame {
        BladeFrame::new(self.normal, self.yaw)
    }
}

/// Orthonormal basis `{right, forward, up}` oriented to the placement surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BladeFrame {
    pub right: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl BladeFrame {
    /// Build a frame around `up` facing `yaw`.
    ///
    /// When `up` is parallel to the yaw direction the cross product vanishes
    /// and `right`/`forward` collapse to zero, producing a zero-width blade
    /// instead of NaNs.
    pub fn new(up: Vec3, yaw: f32) -> Self {
        let right = up.cross(yaw_direction(yaw)).normalize_or_zero();
        let forward = right.cross(up).normalize_or_zero();
        Self { right, forward, up }
    }
}

/// The five positioned vertices of one blade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BladeMesh {
    pub positions: [Vec3; BLADE_VERTEX_COUNT],
    pub uv: Vec2,
}

impl BladeMesh {
    /// Shape a blade of the given base `width` around `spec`.
    ///
    /// The mid pair sits at half height and half width. The tip sits at full
    /// height, pushed `tip_offset` along the world-horizontal bend direction.
    pub fn build(spec: &BladeSpec, width: f32, tip_offset: f32) -> Self {
        let frame = spec.frame();
        let half_base = width * 0.5;
        let half_mid = width * 0.25;
        let mid_lift = frame.up * (spec.height * 0.5);

        let bottom_left = spec.center + frame.right * half_base;
        let bottom_right = spec.center - frame.right * half_base;
        let top_left = spec.center + frame.right * half_mid + mid_lift;
        let top_right = spec.center - frame.right * half_mid + mid_lift;
        let tip = spec.center + yaw_direction(spec.tip_bend) * tip_offset + frame.up * spec.height;

        Self {
            positions: [bottom_left, bottom_right, top_right, top_left, tip],
            uv: spec.uv,
        }
    }

    /// Vertex colours, identical for every blade.
    pub fn colors(&self) -> &'static [[f32; 3]; BLADE_VERTEX_COUNT] {
        &BLADE_COLORS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn config() -> GrassFieldConfig {
        GrassFieldConfig {
            blade_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn sampled_normal_is_unit_center_direction() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let spec = BladeSpec::sample(&config(), &mut rng);
            assert!((spec.normal.length() - 1.0).abs() < 1e-6);
            assert!((spec.center.normalize() - spec.normal).length() < 1e-6);
            assert!((spec.center.length() - config().radius()).abs() < 1e-4);
        }
    }

    #[test]
    fn sampled_uv_remaps_center_x_and_y() {
        let cfg = config();
        let radius = cfg.radius();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let spec = BladeSpec::sample(&cfg, &mut rng);
            let expected = Vec2::new(
                remap(spec.center.x, -radius, radius, 0.0, 1.0),
                remap(spec.center.y, -radius, radius, 0.0, 1.0),
            );
            assert_eq!(spec.uv, expected);
            assert!(spec.uv.x > -1e-5 && spec.uv.x < 1.0 + 1e-5);
            assert!(spec.uv.y > -1e-5 && spec.uv.y < 1.0 + 1e-5);
        }
    }

    #[test]
    fn sampled_angles_and_height_in_range() {
        let cfg = GrassFieldConfig {
            base_height: 2.0,
            height_variation: 0.5,
            ..config()
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let spec = BladeSpec::sample(&cfg, &mut rng);
            assert!((0.0..TAU).contains(&spec.yaw));
            assert!((0.0..TAU).contains(&spec.tip_bend));
            assert!(spec.height >= 2.0 && spec.height < 2.5, "height {}", spec.height);
        }
    }

    #[test]
    fn yaw_and_tip_bend_are_independent_draws() {
        let mut rng = StdRng::seed_from_u64(3);
        let differing = (0..100)
            .map(|_| BladeSpec::sample(&config(), &mut rng))
            .filter(|s| s.yaw != s.tip_bend)
            .count();
        assert_eq!(differing, 100);
    }

    #[test]
    fn zero_height_variation_gives_base_height() {
        let cfg = GrassFieldConfig {
            height_variation: 0.0,
            ..config()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let spec = BladeSpec::sample(&cfg, &mut rng);
        assert_eq!(spec.height, cfg.base_height);
    }

    #[test]
    fn frame_is_orthonormal() {
        let up = Vec3::new(0.3, 0.8, -0.2).normalize();
        let frame = BladeFrame::new(up, 1.2);
        assert!((frame.right.length() - 1.0).abs() < 1e-5);
        assert!((frame.forward.length() - 1.0).abs() < 1e-5);
        assert!(frame.right.dot(frame.up).abs() < 1e-5);
        assert!(frame.forward.dot(frame.up).abs() < 1e-5);
        assert!(frame.right.dot(frame.forward).abs() < 1e-5);
    }

    #[test]
    fn frame_degenerates_to_zero_when_up_matches_yaw() {
        // yaw 0 faces -Z
        let frame = BladeFrame::new(Vec3::NEG_Z, 0.0);
        assert_eq!(frame.right, Vec3::ZERO);
        assert_eq!(frame.forward, Vec3::ZERO);
        assert!(!frame.up.is_nan());
    }

    #[test]
    fn blade_mesh_shape() {
        let spec = BladeSpec {
            center: Vec3::new(0.0, 15.0, 0.0),
            normal: Vec3::Y,
            yaw: 0.0,
            tip_bend: std::f32::consts::FRAC_PI_2,
            height: 2.0,
            uv: Vec2::new(0.5, 1.0),
        };
        let mesh = BladeMesh::build(&spec, 0.2, 0.1);
        let frame = spec.frame();
        // up × (0,0,-1) with up = +Y gives -X
        assert!((frame.right - Vec3::NEG_X).length() < 1e-6);

        let [bl, br, tr, tl, tip] = mesh.positions;
        assert!((bl - Vec3::new(-0.1, 15.0, 0.0)).length() < 1e-6);
        assert!((br - Vec3::new(0.1, 15.0, 0.0)).length() < 1e-6);
        assert!((tl - Vec3::new(-0.05, 16.0, 0.0)).length() < 1e-6);
        assert!((tr - Vec3::new(0.05, 16.0, 0.0)).length() < 1e-6);
        // bend of π/2 points along +X
        assert!((tip - Vec3::new(0.1, 17.0, 0.0)).length() < 1e-5);
        assert_eq!(mesh.uv, spec.uv);
    }

    #[test]
    fn blade_colors_are_fixed_gradient() {
        let mut rng = StdRng::seed_from_u64(1);
        let spec = BladeSpec::sample(&config(), &mut rng);
        let mesh = BladeMesh::build(&spec, 0.05, 0.1);
        assert_eq!(
            mesh.colors(),
            &[[0.0; 3], [0.0; 3], [0.5; 3], [0.5; 3], [1.0; 3]]
        );
    }
}
