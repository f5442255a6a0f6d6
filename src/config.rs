//! Scene configuration

use crate::constants::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub foliage_count: u32,
    pub light_count: u32,
    pub bloom_strength: f64,
    pub auto_rotate_speed: f64,
    pub snow_count: u32,
    /// Persisted by the page; the scene only reads the initial value.
    pub snow_enabled: bool,

    /// Counts down to today at `test_target_hour:test_target_minute` instead of Dec 25.
    pub test_mode: bool,
    pub test_target_hour: u32,
    pub test_target_minute: u32,

    #[wasm_bindgen(getter_with_clone)]
    pub snow_canvas_id: String,

    #[wasm_bindgen(getter_with_clone)]
    pub confetti_canvas_id: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            foliage_count: DEFAULT_FOLIAGE_COUNT,
            light_count: DEFAULT_LIGHT_COUNT,
            bloom_strength: DEFAULT_BLOOM_STRENGTH,
            auto_rotate_speed: DEFAULT_AUTO_ROTATE_SPEED,
            snow_count: DEFAULT_SNOW_COUNT,
            snow_enabled: true,
            test_mode: false,
            test_target_hour: DEFAULT_TEST_TARGET_HOUR,
            test_target_minute: DEFAULT_TEST_TARGET_MINUTE,
            snow_canvas_id: DEFAULT_SNOW_CANVAS_ID.into(),
            confetti_canvas_id: DEFAULT_CONFETTI_CANVAS_ID.into(),
        }
    }
}

#[wasm_bindgen]
impl TreeConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeConfig {
    /// Reads overrides from a plain JS object. A bare number sets the foliage count;
    /// anything else that is not an object yields the defaults.
    pub fn from_js(value: JsValue) -> Self {
        let mut config = Self::default();

        if !value.is_object() {
            if let Some(count) = value.as_f64() {
                config.foliage_count = count as u32;
            }
            return config;
        }

        let get = |key: &str| js_sys::Reflect::get(&value, &key.into()).ok();

        macro_rules! extract {
            ($field:ident, $key:expr, $ty:ty) => {
                if let Some(num) = get($key).and_then(|v| v.as_f64()) {
                    config.$field = num as $ty;
                }
            };
        }

        extract!(foliage_count, "foliageCount", u32);
        extract!(light_count, "lightCount", u32);
        extract!(bloom_strength, "bloomStrength", f64);
        extract!(auto_rotate_speed, "autoRotateSpeed", f64);
        extract!(snow_count, "snowCount", u32);
        extract!(test_target_hour, "testTargetHour", u32);
        extract!(test_target_minute, "testTargetMinute", u32);

        if let Some(enabled) = get("snowEnabled").and_then(|v| v.as_bool()) {
            config.snow_enabled = enabled;
        }
        if let Some(test) = get("testMode").and_then(|v| v.as_bool()) {
            config.test_mode = test;
        }
        if let Some(id) = get("snowCanvasId").and_then(|v| v.as_string()) {
            config.snow_canvas_id = id;
        }
        if let Some(id) = get("confettiCanvasId").and_then(|v| v.as_string()) {
            config.confetti_canvas_id = id;
        }

        config.test_target_hour = config.test_target_hour.min(23);
        config.test_target_minute = config.test_target_minute.min(59);
        config
    }
}
