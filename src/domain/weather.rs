mod conditions;

pub use conditions::{Effect, ParticleKind, map_condition_to_effect};
