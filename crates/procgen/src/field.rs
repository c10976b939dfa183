//! Grass field generation.
//!
//! Builds every blade once into flat, pre-sized attribute arrays. The result
//! is handed to the renderer for a single upload and never touched again.

use crate::blade::{BladeMesh, BladeSpec, BLADE_COLORS, BLADE_INDEX_COUNT, BLADE_INDICES, BLADE_VERTEX_COUNT};
use crate::error::ConfigurationError;
use glam::Vec3;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Largest blade count whose index count (and so every vertex index) still
/// fits in a `u32` draw range.
pub const MAX_BLADES: u32 = u32::MAX / BLADE_INDEX_COUNT as u32;

/// Linear remap of `value` from `[old_min, old_max]` to `[new_min, new_max]`.
/// No clamping; a zero-width source range divides by zero.
pub fn remap(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    ((value - old_min) * (new_max - new_min)) / (old_max - old_min) + new_min
}

/// Parameters for the grass field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassFieldConfig {
    /// Number of blades.
    pub blade_count: u32,
    /// Extent of the field; blades sit on a sphere of radius `plane_size / 2`.
    pub plane_size: f32,
    /// Width of a blade at its root.
    pub blade_width: f32,
    /// Minimum blade height.
    pub base_height: f32,
    /// Random extra height, drawn uniformly from [0, height_variation).
    pub height_variation: f32,
    /// Horizontal displacement of the tip.
    pub tip_offset: f32,
}

impl Default for GrassFieldConfig {
    fn default() -> Self {
        Self {
            blade_count: 1_000_000,
            plane_size: 30.0,
            blade_width: 0.05,
            base_height: 1.0,
            height_variation: 1.0,
            tip_offset: 0.1,
        }
    }
}

impl GrassFieldConfig {
    /// Radius of the placement sphere.
    pub fn radius(&self) -> f32 {
        self.plane_size / 2.0
    }

    pub fn vertex_count(&self) -> usize {
        self.blade_count as usize * BLADE_VERTEX_COUNT
    }

    pub fn index_count(&self) -> usize {
        self.blade_count as usize * BLADE_INDEX_COUNT
    }

    /// Check every builder precondition. NaN fails all of them.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.blade_count == 0 {
            return Err(ConfigurationError::ZeroBlades);
        }
        if self.blade_count > MAX_BLADES {
            return Err(ConfigurationError::TooManyBlades {
                count: self.blade_count,
                max: MAX_BLADES,
            });
        }
        for (name, value) in [
            ("plane size", self.plane_size),
            ("blade width", self.blade_width),
            ("base height", self.base_height),
            ("tip offset", self.tip_offset),
        ] {
            if !(value > 0.0) {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        if !(self.height_variation >= 0.0) {
            return Err(ConfigurationError::NegativeHeightVariation(self.height_variation));
        }
        Ok(())
    }
}

/// Flat vertex and index data for the whole field.
///
/// Attributes live in parallel arrays: 3 floats of position, 2 of uv and 3 of
/// colour per vertex. Blade `i` owns vertices `5i..5i+5` and indices
/// `9i..9i+9`. The buffer is read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBuffer {
    positions: Vec<f32>,
    uvs: Vec<f32>,
    colors: Vec<f32>,
    indices: Vec<u32>,
}

impl FieldBuffer {
    fn with_capacity(blade_count: usize) -> Self {
        let vertices = blade_count * BLADE_VERTEX_COUNT;
        Self {
            positions: Vec::with_capacity(vertices * 3),
            uvs: Vec::with_capacity(vertices * 2),
            colors: Vec::with_capacity(vertices * 3),
            indices: Vec::with_capacity(blade_count * BLADE_INDEX_COUNT),
        }
    }

    fn push_blade(&mut self, blade: &BladeMesh) {
        // Checked against MAX_BLADES during validation.
        let offset = self.vertex_count() as u32;

        for (position, color) in blade.positions.iter().zip(BLADE_COLORS.iter()) {
            self.positions.extend_from_slice(&position.to_array());
            self.uvs.extend_from_slice(&blade.uv.to_array());
            self.colors.extend_from_slice(color);
        }
        self.indices.extend(BLADE_INDICES.iter().map(|i| offset + i));
    }

    /// Generate a field, seeding the random source when `seed` is given.
    pub fn generate(config: &GrassFieldConfig, seed: Option<u64>) -> Result<Self, ConfigurationError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        build_field(config, &mut rng)
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn blade_count(&self) -> usize {
        self.indices.len() / BLADE_INDEX_COUNT
    }

    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Smooth per-vertex normals, 3 floats per vertex.
    ///
    /// Face normals are accumulated unnormalised (so larger triangles weigh
    /// more) and normalised per vertex. Vertices touched only by degenerate
    /// triangles get a zero normal.
    pub fn vertex_normals(&self) -> Vec<f32> {
        let mut accumulated = vec![Vec3::ZERO; self.vertex_count()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            let (pa, pb, pc) = (self.position(a), self.position(b), self.position(c));
            let face = (pc - pb).cross(pa - pb);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        accumulated
            .into_iter()
            .flat_map(|n| n.normalize_or_zero().to_array())
            .collect()
    }
}

/// Build the grass field, drawing every random value from `rng`.
///
/// Fails before allocating anything when `config` breaks a precondition.
pub fn build_field<R: Rng + ?Sized>(
    config: &GrassFieldConfig,
    rng: &mut R,
) -> Result<FieldBuffer, ConfigurationError> {
    config.validate()?;

    let started = Instant::now();
    log::info!(
        "Generating grass field: {} blades on a sphere of radius {}",
        config.blade_count,
        config.radius()
    );

    let mut field = FieldBuffer::with_capacity(config.blade_count as usize);
    for _ in 0..config.blade_count {
        let spec = BladeSpec::sample(config, rng);
        let blade = BladeMesh::build(&spec, config.blade_width, config.tip_offset);
        field.push_blade(&blade);
    }

    debug_assert_eq!(field.vertex_count(), config.vertex_count());
    debug_assert_eq!(field.indices.len(), config.index_count());

    log::info!(
        "Grass field ready: {} vertices, {} indices in {:.2?}",
        field.vertex_count(),
        field.indices.len(),
        started.elapsed()
    );

    Ok(field)
}
