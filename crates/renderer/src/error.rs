//! Errors reported while setting up GPU resources.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    /// The device cannot hold a buffer this large.
    #[error("{label} needs {size} bytes but the device allows at most {limit}")]
    BufferTooLarge {
        label: &'static str,
        size: u64,
        limit: u64,
    },
    /// A pipeline failed validation, usually because the shader source does
    /// not compile or its bindings do not match the layout.
    #[error("failed to create {label}: {message}")]
    Pipeline { label: &'static str, message: String },
    #[error("failed to load texture {path:?}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Reject `size` bytes if the device cannot allocate a buffer that large.
pub fn check_buffer_size(device: &wgpu::Device, label: &'static str, size: u64) -> Result<(), RendererError> {
    ensure_fits(label, size, device.limits().max_buffer_size)
}

fn ensure_fits(label: &'static str, size: u64, limit: u64) -> Result<(), RendererError> {
    if size > limit {
        return Err(RendererError::BufferTooLarge { label, size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_at_limit_fits() {
        assert!(ensure_fits("Grass Vertex Buffer", 256, 256).is_ok());
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        let err = ensure_fits("Grass Vertex Buffer", 257, 256).unwrap_err();
        assert!(matches!(err, RendererError::BufferTooLarge { size: 257, limit: 256, .. }));
        assert_eq!(
            err.to_string(),
            "Grass Vertex Buffer needs 257 bytes but the device allows at most 256"
        );
    }
}
