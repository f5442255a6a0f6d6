//! Scene constants
//!
//! Everything here is tuned by eye. With the `configurable` feature a few of them
//! can be overridden at runtime through the API; in release they are fixed.

use crate::draw::Color;

// Tree
pub const DEFAULT_FOLIAGE_COUNT: u32 = 1300;
pub const DEFAULT_LIGHT_COUNT: u32 = 20;
pub const TREE_HEIGHT: f64 = 6.0;
pub const MAX_RADIUS: f64 = 3.2;
pub const DEFAULT_BLOOM_STRENGTH: f64 = 0.45;
pub const FOLIAGE_HEIGHT_EXPONENT: f64 = 0.6;
pub const FOLIAGE_JITTER: f64 = 0.08;
pub const LIGHT_JITTER: f64 = 0.06;
pub const SILHOUETTE_STEPS: usize = 40;
pub const SILHOUETTE_RADIUS_SCALE: f64 = 0.9;
pub const SILHOUETTE_COLOR: Color = Color::rgba(4.0, 40.0, 18.0, 0.14);

pub const LIGHT_PALETTE: [Color; 3] = [
    Color::rgb(255.0, 80.0, 60.0),
    Color::rgb(255.0, 210.0, 80.0),
    Color::rgb(80.0, 150.0, 255.0),
];

// Star
pub const STAR_LIFT: f64 = 0.6;
pub const STAR_POINTS: usize = 5;
pub const STAR_INNER_RATIO: f64 = 0.45;
pub const NARROW_VIEWPORT: f64 = 560.0;
pub const STAR_HALO_NARROW: f64 = 26.0;
pub const STAR_HALO_WIDE: f64 = 40.0;
pub const STAR_CORE_NARROW: f64 = 10.0;
pub const STAR_CORE_WIDE: f64 = 16.0;

// Camera
pub const CAMERA_FOCAL: f64 = 6.0;
pub const CAMERA_OFFSET: f64 = 2.0;
pub const PIXELS_PER_UNIT: f64 = 110.0;
pub const DEFAULT_AUTO_ROTATE_SPEED: f64 = 0.18;
pub const DRAG_SENSITIVITY: f64 = 0.006;
pub const SMOOTHING_RATE: f64 = 5.0;
pub const SMOOTHING_MAX_BLEND: f64 = 0.25;

// Snow
pub const DEFAULT_SNOW_COUNT: u32 = 140;
pub const SNOW_MIN_RADIUS: f64 = 1.0;
pub const SNOW_RADIUS_RANGE: f64 = 3.2;
pub const SNOW_MIN_SPEED: f64 = 30.0;
pub const SNOW_SPEED_RANGE: f64 = 60.0;
pub const SNOW_DRIFT_RANGE: f64 = 10.0;
pub const SNOW_SWAY_FACTOR: f64 = 0.12;
pub const SNOW_MIN_ALPHA: f64 = 0.6;
pub const SNOW_ALPHA_RANGE: f64 = 0.35;
pub const SNOW_SPAWN_BAND: f64 = 120.0;
pub const SNOW_RECYCLE_BAND: f64 = 40.0;
pub const SNOW_SPAWN_MARGIN: f64 = 8.0;

// Confetti
pub const CONFETTI_PALETTE: [Color; 6] = [
    Color::rgb(255.0, 77.0, 79.0),
    Color::rgb(255.0, 216.0, 107.0),
    Color::rgb(124.0, 195.0, 255.0),
    Color::rgb(255.0, 154.0, 214.0),
    Color::rgb(152.0, 255.0, 179.0),
    Color::rgb(255.0, 210.0, 163.0),
];
pub const CONFETTI_GRAVITY: f64 = 0.06;
pub const CONFETTI_DAMPING: f64 = 0.995;
pub const CONFETTI_MIN_TTL_MS: f64 = 4000.0;
pub const CONFETTI_TTL_RANGE_MS: f64 = 2000.0;
pub const CONFETTI_MIN_SPEED: f64 = 1.0;
pub const CONFETTI_SPEED_RANGE: f64 = 3.6;
pub const CONFETTI_MIN_SIZE: f64 = 6.0;
pub const CONFETTI_SIZE_RANGE: f64 = 8.0;
pub const CONFETTI_SCATTER_X: f64 = 40.0;
pub const CONFETTI_SCATTER_Y: f64 = 24.0;

// Celebration
pub const CELEBRATION_BURST: usize = 220;
pub const CELEBRATION_FOLLOW_UP: usize = 120;
pub const CELEBRATION_FOLLOW_UP_DELAY_MS: f64 = 800.0;
pub const CELEBRATION_FOLLOW_UP_LIFT: f64 = 20.0;
pub const CELEBRATION_AUTO_CLOSE_MS: f64 = 9000.0;
pub const MANUAL_BURST: usize = 180;
pub const MANUAL_FOLLOW_UP: usize = 100;
pub const MANUAL_FOLLOW_UP_DELAY_MS: f64 = 500.0;
pub const MANUAL_FOLLOW_UP_SPREAD: f64 = 60.0;
pub const DEFAULT_CELEBRATION_NAME: &str = "my dear";
pub const DEFAULT_CELEBRATION_MESSAGE: &str =
    "Have a wonderful day, full of love and sweet moments. With all my affection.";

// Countdown
pub const COUNTDOWN_INTERVAL_MS: u32 = 1000;
pub const TARGET_MONTH: u32 = 11; // December, zero based
pub const TARGET_DAY: u32 = 25;
pub const DEFAULT_TEST_TARGET_HOUR: u32 = 23;
pub const DEFAULT_TEST_TARGET_MINUTE: u32 = 10;

// Surfaces
pub const DEFAULT_SNOW_CANVAS_ID: &str = "snow-canvas";
pub const DEFAULT_CONFETTI_CANVAS_ID: &str = "confetti-canvas";

// Feature flag
pub const RUNTIME_CONFIGURABLE: bool = cfg!(feature = "configurable");
