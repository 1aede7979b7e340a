use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Rain,
    Snow,
    Cloud,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Rain,
    Snow,
    Cloud,
}

impl Effect {
    /// Particle kind driven by this effect, `None` for a clear sky.
    #[must_use]
    pub fn particle_kind(self) -> Option<ParticleKind> {
        match self {
            Effect::Rain => Some(ParticleKind::Rain),
            Effect::Snow => Some(ParticleKind::Snow),
            Effect::Cloud => Some(ParticleKind::Cloud),
            Effect::Clear => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Effect::Rain => "Rain",
            Effect::Snow => "Snow",
            Effect::Cloud => "Cloudy",
            Effect::Clear => "Clear",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParticleKind::Rain => "rain",
            ParticleKind::Snow => "snow",
            ParticleKind::Cloud => "cloud",
        })
    }
}

/// Maps a provider condition name ("Rain", "light drizzle", "Clouds", ...)
/// to the particle effect to run. Unrecognized names fall back to `Clear`.
#[must_use]
pub fn map_condition_to_effect(condition: &str) -> Effect {
    let condition = condition.trim().to_lowercase();
    if condition.contains("rain") || condition.contains("drizzle") {
        Effect::Rain
    } else if condition.contains("snow") {
        Effect::Snow
    } else if condition.contains("clear") {
        Effect::Clear
    } else if condition.contains("cloud") || condition == "overcast" {
        Effect::Cloud
    } else {
        Effect::Clear
    }
}
