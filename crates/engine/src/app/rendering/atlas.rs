use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::info;

use crate::world::{TileId, EMPTY_TILE};

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to open tileset image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode tileset image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("tile size must be non-zero, got {tile_width}x{tile_height}")]
    ZeroTileSize { tile_width: u32, tile_height: u32 },
    #[error("tileset image {width}x{height} is smaller than one {tile_width}x{tile_height} tile")]
    TooSmall {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },
    #[error("rgba buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
}

/// Tileset image sliced into a grid of equally sized cells.
///
/// Tile id `n` (1-based, `0` is empty) lives at column `(n - 1) % columns`,
/// row `(n - 1) / columns`.
pub struct TileAtlas {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    tile_width: u32,
    tile_height: u32,
    columns: u32,
    rows: u32,
}

impl TileAtlas {
    pub fn load(path: &Path, tile_width: u32, tile_height: u32) -> Result<Self, AtlasError> {
        let reader = ImageReader::open(path).map_err(|source| AtlasError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| AtlasError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgba8();
        let atlas = Self::from_rgba(
            image.width(),
            image.height(),
            image.into_raw(),
            tile_width,
            tile_height,
        )?;
        info!(
            path = %path.display(),
            columns = atlas.columns,
            rows = atlas.rows,
            tile_width,
            tile_height,
            "atlas_loaded"
        );
        Ok(atlas)
    }

    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, AtlasError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(AtlasError::ZeroTileSize {
                tile_width,
                tile_height,
            });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(AtlasError::BufferLength {
                expected,
                actual: rgba.len(),
            });
        }
        let columns = width / tile_width;
        let rows = height / tile_height;
        if columns == 0 || rows == 0 {
            return Err(AtlasError::TooSmall {
                width,
                height,
                tile_width,
                tile_height,
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
            tile_width,
            tile_height,
            columns,
            rows,
        })
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.tile_origin(tile).is_some()
    }

    /// Top-left pixel of `tile` inside the image.
    pub fn tile_origin(&self, tile: TileId) -> Option<(u32, u32)> {
        if tile == EMPTY_TILE || tile > self.tile_count() {
            return None;
        }
        let index = tile - 1;
        Some((
            (index % self.columns) * self.tile_width,
            (index / self.columns) * self.tile_height,
        ))
    }

    pub(crate) fn sample(&self, tile: TileId, local_x: u32, local_y: u32) -> Option<[u8; 4]> {
        if local_x >= self.tile_width || local_y >= self.tile_height {
            return None;
        }
        let (origin_x, origin_y) = self.tile_origin(tile)?;
        let x = origin_x + local_x;
        let y = origin_y + local_y;
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(color)
    }
}

impl std::fmt::Debug for TileAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileAtlas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tile_width", &self.tile_width)
            .field("tile_height", &self.tile_height)
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .finish()
    }
}
