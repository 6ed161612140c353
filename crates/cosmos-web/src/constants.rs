// DOM wiring and sprite-renderer tuning constants

// Element ids expected in index.html
pub const SCENE_CANVAS_ID: &str = "scene-canvas";
pub const OVERLAY_CANVAS_ID: &str = "visualizer-canvas";
pub const OVERLAY_CONTAINER_ID: &str = "visualizer-container";
pub const AUDIO_ELEMENT_ID: &str = "audio-player";
pub const PLAY_BUTTON_ID: &str = "play-button";
pub const HEADING_ID: &str = "heading";

pub const PLAY_LABEL: &str = "Play Music";
pub const PAUSE_LABEL: &str = "Pause Music";
pub const AUDIO_FAILED_LABEL: &str = "Audio Unavailable";

// URL query key that forces a device class (`?quality=mobile`)
pub const QUALITY_QUERY_KEY: &str = "quality";

// Translucent wash drawn under the overlay bars each frame
pub const OVERLAY_BACKGROUND: &str = "rgba(0, 0, 0, 0.2)";

// Sprite sizing: world units per unit of the entity's own size parameter
pub const STAR_SPRITE_SCALE: f32 = 0.6;
pub const PARTICLE_SPRITE_SCALE: f32 = 2.0;
pub const CRYSTAL_SPRITE_SCALE: f32 = 1.4;
pub const ASTEROID_SPRITE_SCALE: f32 = 1.2;
pub const BAR_SPRITE_WIDTH: f32 = 0.45;
pub const SHIP_SPRITE_SCALE: f32 = 2.4;
pub const LIGHT_SPRITE_BASE: f32 = 1.5;
pub const LIGHT_SPRITE_PER_INTENSITY: f32 = 0.08;
pub const LIGHT_SPRITE_ALPHA: f32 = 0.12;

// Wormhole tunnels are tori of radius 4 and tube 2
pub const WORMHOLE_SPRITE_EXTENT: f32 = 12.0;

// Sound plane is a 60 x 40 sheet sampled on a sprite grid
pub const SOUND_PLANE_HALF_WIDTH: f32 = 30.0;
pub const SOUND_PLANE_HALF_DEPTH: f32 = 20.0;
pub const SOUND_PLANE_GRID_X: usize = 48;
pub const SOUND_PLANE_GRID_Y: usize = 32;
pub const SOUND_PLANE_SPRITE: f32 = 0.7;

// Sprites drawn per lightning segment
pub const LIGHTNING_SPRITES_PER_SEGMENT: usize = 6;
pub const LIGHTNING_SPRITE: f32 = 0.25;

// Background when no skybox has been pushed yet
pub const CLEAR_COLOR: [f64; 3] = [0.0, 0.0, 0.02];
