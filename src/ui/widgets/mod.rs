pub mod hud;
pub mod prompt;
