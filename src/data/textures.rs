use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use futures::future::join_all;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::domain::weather::ParticleKind;

pub const DEFAULT_TEXTURE_DIR: &str = "assets/textures";

const PLACEHOLDER_SIZE: u32 = 16;
const PLACEHOLDER_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Rain,
    Snow,
    Cloud,
    /// Loaded for a future storm effect; nothing draws it yet.
    Lightning,
}

impl TextureKey {
    pub const ALL: [TextureKey; 4] = [
        TextureKey::Rain,
        TextureKey::Snow,
        TextureKey::Cloud,
        TextureKey::Lightning,
    ];

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            TextureKey::Rain => "trace_01.png",
            TextureKey::Snow => "star_09.png",
            TextureKey::Cloud => "smoke_08.png",
            TextureKey::Lightning => "spark_05.png",
        }
    }
}

impl From<ParticleKind> for TextureKey {
    fn from(kind: ParticleKind) -> Self {
        match kind {
            ParticleKind::Rain => TextureKey::Rain,
            ParticleKind::Snow => TextureKey::Snow,
            ParticleKind::Cloud => TextureKey::Cloud,
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("reading texture {path} failed")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding texture {path} failed")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    Loaded(PathBuf),
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbaImage,
    source: TextureSource,
}

impl Texture {
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            image: RgbaImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_PIXEL),
            source: TextureSource::Placeholder,
        }
    }

    #[must_use]
    pub fn from_image(image: RgbaImage, path: PathBuf) -> Self {
        Self {
            image,
            source: TextureSource::Loaded(path),
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.image.width() as f32
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.image.height() as f32
    }

    #[must_use]
    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.source == TextureSource::Placeholder
    }

    /// Samples the texel under normalized coordinates `u`, `v` in `0.0..=1.0`.
    #[must_use]
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return [0, 0, 0, 0];
        }
        let px = ((u.clamp(0.0, 1.0) * w as f32) as u32).min(w - 1);
        let py = ((v.clamp(0.0, 1.0) * h as f32) as u32).min(h - 1);
        self.image.get_pixel(px, py).0
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    textures: HashMap<TextureKey, Texture>,
}

impl TextureSet {
    /// Set with a placeholder for every key.
    #[must_use]
    pub fn placeholders() -> Self {
        let mut set = Self::default();
        for key in TextureKey::ALL {
            set.insert(key, Texture::placeholder());
        }
        set
    }

    pub fn insert(&mut self, key: TextureKey, texture: Texture) {
        self.textures.insert(key, texture);
    }

    #[must_use]
    pub fn get(&self, key: TextureKey) -> Option<&Texture> {
        self.textures.get(&key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.textures
            .values()
            .filter(|texture| texture.is_placeholder())
            .count()
    }
}

/// Loads every particle texture from `base`.
///
/// Failures never escape: a key that cannot be read or decoded gets a
/// placeholder, and an unresolvable `base` yields placeholders for all keys.
/// Must complete before any effect is started.
pub async fn load_textures(base: &Path) -> TextureSet {
    let root = match tokio::fs::canonicalize(base).await {
        Ok(root) => root,
        Err(err) => {
            log::error!(
                "texture directory {} unavailable ({err}), using placeholders",
                base.display()
            );
            return TextureSet::placeholders();
        }
    };

    let loads = TextureKey::ALL.into_iter().map(|key| {
        let path = root.join(key.file_name());
        async move {
            log::debug!("loading texture {}", path.display());
            (key, load_texture(path).await)
        }
    });

    let mut set = TextureSet::default();
    for (key, result) in join_all(loads).await {
        let texture = result.unwrap_or_else(|err| {
            log::warn!("{err}: {}, using placeholder", error_chain(&err));
            Texture::placeholder()
        });
        set.insert(key, texture);
    }

    log::info!(
        "textures ready ({} loaded, {} placeholders)",
        set.len() - set.placeholder_count(),
        set.placeholder_count()
    );
    set
}

async fn load_texture(path: PathBuf) -> Result<Texture, TextureError> {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(source) => return Err(TextureError::Read { path, source }),
    };
    match image::load_from_memory(&bytes) {
        Ok(decoded) => Ok(Texture::from_image(decoded.to_rgba8(), path)),
        Err(source) => Err(TextureError::Decode { path, source }),
    }
}

fn error_chain(err: &TextureError) -> String {
    match err {
        TextureError::Read { source, .. } => source.to_string(),
        TextureError::Decode { source, .. } => source.to_string(),
    }
}
