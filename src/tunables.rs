//! demo‑only tunables (camera & tile colouring)

pub const CAMERA_PAN_SPEED: f32 = 600.0;

/// -------- colour‑variation --------
pub const COLOR_NOISE_SCALE: f64   = 0.05;
pub const COLOR_VARIATION_LEVELS: i32 = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.2;
