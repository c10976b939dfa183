//! Procedural stand-in textures for the ground sphere and the grass blades.
//! Used when an image on disk is missing or fails to decode.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use rand::prelude::*;

/// RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn from_rgb(color: Vec3) -> Self {
        let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
        Self {
            r: c.x as u8,
            g: c.y as u8,
            b: c.z as u8,
            a: 255,
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Generated RGBA8 image, row-major.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

impl TextureData {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel { r: 0, g: 0, b: 0, a: 255 }; (width * height) as usize],
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = pixel;
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }
}

/// Noise-driven texture generator.
pub struct TextureGenerator {
    perlin: Perlin,
}

impl TextureGenerator {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            perlin: Perlin::new(rng.gen()),
        }
    }

    /// Patchy soil with grass tufts, for the ground sphere.
    pub fn generate_ground(&self, width: u32, height: u32) -> TextureData {
        let soil = Vec3::new(0.32, 0.24, 0.15);
        let moss = Vec3::new(0.22, 0.36, 0.12);
        let mut texture = TextureData::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let u = x as f64 / width as f64;
                let v = y as f64 / height as f64;

                let patches = self.fbm(u * 6.0, v * 6.0, 4);
                let grain = self.fbm(u * 48.0, v * 48.0, 2);

                let blend = smooth_step(0.35, 0.65, patches) as f32;
                let color = soil.lerp(moss, blend) * (0.85 + grain as f32 * 0.3);
                texture.set_pixel(x, y, Pixel::from_rgb(color));
            }
        }

        texture
    }

    /// Sun-bleached meadow greens, sampled per blade by its field uv.
    pub fn generate_grass(&self, width: u32, height: u32) -> TextureData {
        let deep = Vec3::new(0.10, 0.40, 0.05);
        let light = Vec3::new(0.45, 0.65, 0.15);
        let dry = Vec3::new(0.62, 0.58, 0.28);
        let mut texture = TextureData::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let u = x as f64 / width as f64;
                let v = y as f64 / height as f64;

                let lush = self.fbm(u * 4.0, v * 4.0, 4);
                let dryness = smooth_step(0.6, 0.8, self.fbm(u * 2.0 + 17.0, v * 2.0 + 17.0, 3));

                let color = deep.lerp(light, lush as f32).lerp(dry, dryness as f32);
                texture.set_pixel(x, y, Pixel::from_rgb(color));
            }
        }

        texture
    }

    /// Fractal noise in [0, 1).
    fn fbm(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 0.5;
        let mut frequency = 1.0;

        for _ in 0..octaves {
            value += amplitude * (self.perlin.get([x * frequency, y * frequency]) * 0.5 + 0.5);
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        value
    }
}

fn smooth_step(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
