pub mod fade;
pub mod hud;
pub mod menu;
