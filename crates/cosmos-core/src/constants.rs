// Shared audio/visual tuning constants used by the core pipeline and the web frontend.

// Spectrum normalization (analyser dB output -> 0..1)
pub const DB_FLOOR: f32 = -100.0; // dB value mapped to 0.0
pub const DB_RANGE: f32 = 100.0; // dB span mapped onto 0..1
pub const ANALYSER_SMOOTHING: f64 = 0.85; // analyser temporal smoothing

// Analysis resolution (FFT size; bin count is half of this)
pub const FFT_SIZE_DESKTOP: u32 = 2048;
pub const FFT_SIZE_MOBILE: u32 = 512;

// Beat detection
pub const BEAT_THRESHOLD: f32 = 0.5; // bass energy needed to fire
pub const BEAT_REFRACTORY_SEC: f64 = 0.3; // minimum spacing between beats

// Device classification
pub const MOBILE_MAX_VIEWPORT_WIDTH: u32 = 768;
pub const MOBILE_UA_PATTERNS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

// Frame pacing
pub const REFERENCE_FPS: f32 = 60.0; // per-frame increments are tuned for this rate
pub const MAX_DELTA_PHASE: f32 = 4.0; // clamp after tab switches / long stalls

// Starfield
pub const STAR_RESPAWN_Z: f32 = -150.0;
pub const STAR_RESPAWN_RADIUS: f32 = 150.0;
pub const STAR_TREBLE_SPEED_GAIN: f32 = 2.0;

// Visualizer bars
pub const BAR_RING_RADIUS: f32 = 12.0;
pub const BAR_MIN_HEIGHT: f32 = 0.1;
pub const BAR_HEIGHT_GAIN: f32 = 5.0;
pub const BAR_HUE_DRIFT: f32 = 0.05;

// Crystals
pub const CRYSTAL_AUDIO_BOOST: f32 = 3.0;
pub const CRYSTAL_ORBIT_BREATH: f32 = 0.2;
pub const CRYSTAL_ORBIT_CENTER: [f32; 3] = [0.0, 2.0, 0.0];

// Wormholes
pub const WORMHOLE_PULSE_STEP: f32 = 0.05; // pulse progress per frame
pub const WORMHOLE_TREBLE_SCALE: f32 = 0.5;
pub const WORMHOLE_LIGHT_IDLE: f32 = 2.0;
pub const WORMHOLE_LIGHT_PULSE: f32 = 5.0;

// Lightning
pub const LIGHTNING_SEGMENTS: usize = 10;
pub const LIGHTNING_MAX_OFFSET: f32 = 2.0;
pub const LIGHTNING_DECAY: f32 = 0.05; // life lost per frame

// Energy waves
pub const ENERGY_WAVE_INITIAL_SCALE: f32 = 0.1;
pub const ENERGY_WAVE_PROGRESS_RATE: f32 = 0.01; // progress = speed * rate per frame
pub const ENERGY_WAVE_MAX_OPACITY: f32 = 0.7;

// Burst particles
pub const BURST_ORIGIN: [f32; 3] = [0.0, 1.0, 0.0];
pub const BURST_GRAVITY: f32 = 0.001;
pub const BURST_FLOOR_Y: f32 = -5.0;

// Sound-wave plane
pub const SOUND_PLANE_BUCKETS: usize = 128;
pub const SOUND_PLANE_GAIN: f32 = 2.0; // amplify downsampled spectrum for visibility
pub const SOUND_PLANE_BASE_AMPLITUDE: f32 = 2.0;
pub const SOUND_PLANE_LEVEL_AMPLITUDE: f32 = 8.0;
pub const SOUND_PLANE_Y: f32 = -15.0;

// Ship (loaded model) and thrusters
pub const SHIP_REST_POSITION: [f32; 3] = [0.0, 1.05, -1.0];
pub const SHIP_SCALE: f32 = 0.5;
pub const SHIP_FOLLOW_RATE: f32 = 0.02;
pub const THRUSTER_RESPAWN_Z: f32 = -2.0;

// Scene camera
pub const CAMERA_EYE: [f32; 3] = [4.0, 5.0, 11.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 1.0, 0.0];
pub const CAMERA_FOVY_DEG: f32 = 45.0;
pub const CAMERA_ZNEAR: f32 = 1.0;
pub const CAMERA_ZFAR: f32 = 1000.0;

// 2D overlay
pub const OVERLAY_SATURATION: f32 = 0.8;
pub const OVERLAY_LIGHTNESS: f32 = 0.5;
