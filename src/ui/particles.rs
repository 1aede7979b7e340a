use std::f32::consts::TAU;

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;

use crate::{
    data::textures::{TextureKey, TextureSet},
    domain::weather::{Effect, ParticleKind, map_condition_to_effect},
    ui::surface::RenderSurface,
};

/// Row just above the visible top where falling particles enter.
pub const SPAWN_Y: f32 = -20.0;
/// Snowflake spin per frame, in radians.
pub const SNOW_SPIN: f32 = 0.01;

const SNOW_DRIFT: (f32, f32) = (-0.5, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FxError {
    #[error("no texture loaded for {0} particles")]
    MissingTexture(ParticleKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub count: usize,
    pub alpha: f32,
    pub scale: f32,
    /// Half-open range the per-particle speed is drawn from.
    pub speed: (f32, f32),
}

impl EffectParams {
    #[must_use]
    pub fn for_kind(kind: ParticleKind) -> Self {
        match kind {
            ParticleKind::Rain => Self {
                count: 100,
                alpha: 0.5,
                scale: 0.2,
                speed: (15.0, 25.0),
            },
            ParticleKind::Snow => Self {
                count: 50,
                alpha: 0.8,
                scale: 0.15,
                speed: (2.0, 4.0),
            },
            ParticleKind::Cloud => Self {
                count: 5,
                alpha: 0.6,
                scale: 1.5,
                speed: (0.5, 1.0),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Rain,
    Snow { drift: f32, rotation: f32 },
    Cloud,
}

impl Motion {
    #[must_use]
    pub fn kind(self) -> ParticleKind {
        match self {
            Motion::Rain => ParticleKind::Rain,
            Motion::Snow { .. } => ParticleKind::Snow,
            Motion::Cloud => ParticleKind::Cloud,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Distance per frame: downward for rain and snow, rightward for clouds.
    pub fall_speed: f32,
    pub motion: Motion,
}

impl Particle {
    #[must_use]
    pub fn kind(&self) -> ParticleKind {
        self.motion.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectSession {
    pub kind: ParticleKind,
    pub count: usize,
    pub running: bool,
}

#[derive(Debug)]
pub struct ParticleEngine {
    textures: TextureSet,
    surface: RenderSurface,
    session: Option<EffectSession>,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleEngine {
    pub fn new(textures: TextureSet, surface: RenderSurface) -> Self {
        Self::with_rng(textures, surface, StdRng::from_os_rng())
    }

    pub fn with_seed(textures: TextureSet, surface: RenderSurface, seed: u64) -> Self {
        Self::with_rng(textures, surface, StdRng::seed_from_u64(seed))
    }

    fn with_rng(textures: TextureSet, surface: RenderSurface, rng: StdRng) -> Self {
        Self {
            textures,
            surface,
            session: None,
            particles: Vec::new(),
            rng,
        }
    }

    pub fn install_textures(&mut self, textures: TextureSet) {
        self.textures = textures;
    }

    #[must_use]
    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    #[must_use]
    pub fn surface(&self) -> RenderSurface {
        self.surface
    }

    /// Re-fits the surface to the viewport. The running effect keeps going;
    /// recycle bounds pick up the new size on the next frame.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        if self.surface.resize(columns, rows) {
            log::debug!("particle surface resized to {columns}x{rows}");
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<EffectSession> {
        self.session
    }

    /// Parameters of the session kind, kept after a clear.
    #[must_use]
    pub fn params(&self) -> Option<EffectParams> {
        self.session.map(|session| EffectParams::for_kind(session.kind))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session.is_some_and(|session| session.running)
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn start_rain(&mut self) -> Result<(), FxError> {
        self.start_effect(ParticleKind::Rain)
    }

    pub fn start_snow(&mut self) -> Result<(), FxError> {
        self.start_effect(ParticleKind::Snow)
    }

    pub fn start_cloudy(&mut self) -> Result<(), FxError> {
        self.start_effect(ParticleKind::Cloud)
    }

    pub fn clear_effects(&mut self) {
        if let Some(session) = self.session.as_mut().filter(|session| session.running) {
            log::info!("clearing {} effect", session.kind);
            session.running = false;
        }
        self.particles.clear();
    }

    /// Maps a provider condition to an effect and switches to it.
    pub fn apply_weather_effects(&mut self, condition: &str) -> Result<Effect, FxError> {
        let effect = map_condition_to_effect(condition);
        log::info!("condition {condition:?} selects {effect}");
        match effect.particle_kind() {
            Some(kind) => self.start_effect(kind)?,
            None => self.clear_effects(),
        }
        Ok(effect)
    }

    /// Replaces the running batch with a fresh one of `kind`.
    ///
    /// The texture check happens first, so a failed start leaves the previous
    /// effect running.
    fn start_effect(&mut self, kind: ParticleKind) -> Result<(), FxError> {
        let sprite_width = self
            .sprite_width(kind)
            .ok_or(FxError::MissingTexture(kind))?;
        let params = EffectParams::for_kind(kind);

        self.clear_effects();
        self.particles.reserve(params.count);
        for _ in 0..params.count {
            let particle = spawn_particle(kind, params, sprite_width, self.surface, &mut self.rng);
            self.particles.push(particle);
        }
        self.session = Some(EffectSession {
            kind,
            count: params.count,
            running: true,
        });
        log::info!("started {kind} effect with {} particles", params.count);
        Ok(())
    }

    /// Advances every particle by one animation frame.
    pub fn update(&mut self) {
        let Some(session) = self.session.filter(|session| session.running) else {
            return;
        };
        let sprite_width = self.sprite_width(session.kind).unwrap_or_default();
        let width = self.surface.width();
        let height = self.surface.height();

        for particle in &mut self.particles {
            step_particle(particle, width, height, sprite_width, &mut self.rng);
        }
    }

    fn sprite_width(&self, kind: ParticleKind) -> Option<f32> {
        let scale = EffectParams::for_kind(kind).scale;
        self.textures
            .get(TextureKey::from(kind))
            .map(|texture| texture.width() * scale)
    }
}

fn spawn_particle(
    kind: ParticleKind,
    params: EffectParams,
    sprite_width: f32,
    surface: RenderSurface,
    rng: &mut impl Rng,
) -> Particle {
    let fall_speed = uniform(rng, params.speed.0, params.speed.1);
    match kind {
        ParticleKind::Rain => Particle {
            x: uniform(rng, 0.0, surface.width()),
            y: SPAWN_Y,
            fall_speed,
            motion: Motion::Rain,
        },
        ParticleKind::Snow => Particle {
            x: uniform(rng, 0.0, surface.width()),
            y: SPAWN_Y,
            fall_speed,
            motion: Motion::Snow {
                drift: uniform(rng, SNOW_DRIFT.0, SNOW_DRIFT.1),
                rotation: 0.0,
            },
        },
        ParticleKind::Cloud => Particle {
            x: -sprite_width,
            y: uniform(rng, 0.0, surface.height() / 3.0),
            fall_speed,
            motion: Motion::Cloud,
        },
    }
}

fn step_particle(
    particle: &mut Particle,
    width: f32,
    height: f32,
    sprite_width: f32,
    rng: &mut impl Rng,
) {
    let Particle {
        x,
        y,
        fall_speed,
        motion,
    } = particle;

    match motion {
        Motion::Rain => {
            *y += *fall_speed;
        }
        Motion::Snow { drift, rotation } => {
            *y += *fall_speed;
            *x += *drift;
            *rotation = (*rotation + SNOW_SPIN).rem_euclid(TAU);
        }
        Motion::Cloud => {
            *x += *fall_speed;
            if *x > width {
                *x = -sprite_width;
                *y = uniform(rng, 0.0, height / 3.0);
            }
            return;
        }
    }

    if *y > height {
        *x = uniform(rng, 0.0, width);
        *y = SPAWN_Y;
    }
}

/// Uniform draw from `[low, high)`, collapsing to `low` on an empty or
/// unbounded range.
fn uniform(rng: &mut impl Rng, low: f32, high: f32) -> f32 {
    if high.is_finite() && high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}
