//! Canvas 2D rendering module

use std::f64::consts::TAU;

use js_sys::Date;
use wasm_bindgen::prelude::*;
use web_sys::{console, CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::celebration::CelebrationSignal;
use crate::config::TreeConfig;
use crate::constants::*;
use crate::draw::DrawCommand;
use crate::pipeline::{Scene, Surfaces};
use crate::random::JsRandom;

struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    fn lookup(document: &Document, id: &str) -> Result<Option<Self>, JsValue> {
        let Some(element) = document.get_element_by_id(id) else {
            return Ok(None);
        };
        let canvas: HtmlCanvasElement = element.dyn_into()?;
        let ctx = match canvas.get_context("2d")? {
            Some(ctx) => ctx.dyn_into::<CanvasRenderingContext2d>()?,
            None => return Ok(None),
        };
        Ok(Some(Self { canvas, ctx }))
    }

    /// Overlays are optional: an id that resolves to something other than a
    /// canvas only switches that overlay off.
    fn lookup_overlay(document: &Document, id: &str) -> Option<Self> {
        match Self::lookup(document, id) {
            Ok(surface) => surface,
            Err(err) => {
                console::warn_2(
                    &format!("[Pinelight] #{id} is not a usable canvas:").into(),
                    &err,
                );
                None
            }
        }
    }

    fn resize(&self, width: f64, height: f64, dpr: f64) -> Result<(), JsValue> {
        self.canvas.set_width((width * dpr).floor() as u32);
        self.canvas.set_height((height * dpr).floor() as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{width}px"))?;
        style.set_property("height", &format!("{height}px"))?;
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
    }

    /// Clears in CSS pixels (the transform already carries the pixel ratio) and
    /// replays `cmds`.
    fn repaint(&self, width: f64, height: f64, cmds: &[DrawCommand]) -> Result<(), JsValue> {
        self.ctx.clear_rect(0.0, 0.0, width, height);
        replay(&self.ctx, cmds)
    }
}

fn set_ctx_property(
    ctx: &CanvasRenderingContext2d,
    key: &str,
    value: &JsValue,
) -> Result<(), JsValue> {
    js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str(key), value).map(|_| ())
}

fn set_fill(ctx: &CanvasRenderingContext2d, css: &str) -> Result<(), JsValue> {
    set_ctx_property(ctx, "fillStyle", &JsValue::from_str(css))
}

fn replay(ctx: &CanvasRenderingContext2d, cmds: &[DrawCommand]) -> Result<(), JsValue> {
    for cmd in cmds {
        match cmd {
            DrawCommand::FillPolygon { points, color } => {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                ctx.set_global_composite_operation("source-over")?;
                set_fill(ctx, &color.to_string())?;
                ctx.begin_path();
                ctx.move_to(first.0, first.1);
                for &(x, y) in rest {
                    ctx.line_to(x, y);
                }
                ctx.close_path();
                ctx.fill();
            }
            DrawCommand::FillCircle {
                x,
                y,
                radius,
                color,
                blend,
            } => {
                ctx.set_global_composite_operation(blend.composite_operation())?;
                set_fill(ctx, &color.to_string())?;
                ctx.begin_path();
                ctx.arc(*x, *y, *radius, 0.0, TAU)?;
                ctx.fill();
            }
            DrawCommand::RadialGlow {
                x,
                y,
                radius,
                stops,
                blend,
            } => {
                let gradient = ctx.create_radial_gradient(*x, *y, 0.0, *x, *y, *radius)?;
                for stop in stops {
                    gradient.add_color_stop(stop.offset as f32, &stop.color.to_string())?;
                }
                ctx.set_global_composite_operation(blend.composite_operation())?;
                set_ctx_property(ctx, "fillStyle", gradient.as_ref())?;
                ctx.begin_path();
                ctx.arc(*x, *y, *radius, 0.0, TAU)?;
                ctx.fill();
            }
            DrawCommand::BlurredCircle {
                x,
                y,
                radius,
                blur,
                color,
                blend,
            } => {
                ctx.save();
                set_ctx_property(ctx, "filter", &JsValue::from_str(&format!("blur({blur}px)")))?;
                ctx.set_global_composite_operation(blend.composite_operation())?;
                set_fill(ctx, &color.to_string())?;
                ctx.begin_path();
                ctx.arc(*x, *y, *radius, 0.0, TAU)?;
                ctx.fill();
                ctx.restore();
            }
            DrawCommand::FillRotatedRect {
                x,
                y,
                width,
                height,
                rotation,
                color,
            } => {
                ctx.save();
                ctx.set_global_composite_operation("source-over")?;
                ctx.translate(*x, *y)?;
                ctx.rotate(*rotation)?;
                set_fill(ctx, &color.to_string())?;
                ctx.fill_rect(-width / 2.0, -height / 2.0, *width, *height);
                ctx.restore();
            }
        }
    }
    ctx.set_global_composite_operation("source-over")
}

/// Viewport in CSS pixels and the device pixel ratio (never below 1).
fn viewport(window: &Window) -> Result<(f64, f64, f64), JsValue> {
    let width = window.inner_width()?.as_f64().ok_or("Invalid innerWidth")?;
    let height = window.inner_height()?.as_f64().ok_or("Invalid innerHeight")?;
    Ok((width, height, window.device_pixel_ratio().max(1.0)))
}

/// Next Dec 25 00:00 local time, or the test-mode time of day (today, else tomorrow).
fn countdown_target_ms(config: &TreeConfig) -> f64 {
    let now = Date::new_0();
    let year = now.get_full_year();

    if config.test_mode {
        let target = Date::new_with_year_month_day_hr_min_sec(
            year,
            now.get_month() as i32,
            now.get_date() as i32,
            config.test_target_hour as i32,
            config.test_target_minute as i32,
            0,
        );
        if now.get_time() > target.get_time() {
            target.set_date(target.get_date() + 1);
        }
        return target.get_time();
    }

    let year = if now.get_month() == TARGET_MONTH && now.get_date() > TARGET_DAY {
        year + 1
    } else {
        year
    };
    Date::new_with_year_month_day(year, TARGET_MONTH as i32, TARGET_DAY as i32).get_time()
}

#[wasm_bindgen]
pub struct RenderResult {
    pub fps: u32,
    pub time: f64,
    pub rotation: f64,
    pub snow_count: u32,
    pub confetti_count: u32,
}

/// Countdown digits, already formatted for display.
#[wasm_bindgen(getter_with_clone)]
pub struct CountdownDisplay {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    /// The target has been reached (celebrating or already celebrated).
    pub finished: bool,
}

/// `kind` is `"start"` or `"end"`; name and message are empty for `"end"`.
#[wasm_bindgen(getter_with_clone)]
pub struct CelebrationInfo {
    pub kind: String,
    pub name: String,
    pub message: String,
}

impl From<CelebrationSignal> for CelebrationInfo {
    fn from(signal: CelebrationSignal) -> Self {
        match signal {
            CelebrationSignal::Started { name, message } => Self {
                kind: "start".into(),
                name,
                message,
            },
            CelebrationSignal::Ended => Self {
                kind: "end".into(),
                name: String::new(),
                message: String::new(),
            },
        }
    }
}

#[wasm_bindgen]
pub struct ChristmasTree {
    window: Window,
    main: Surface,
    snow: Option<Surface>,
    confetti: Option<Surface>,
    scene: Scene<JsRandom>,
    config: TreeConfig,

    frame_count: u32,
    fps_last_time: f64,
    current_fps: u32,
    time: f64,
}

#[wasm_bindgen]
impl ChristmasTree {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_val: JsValue) -> Result<ChristmasTree, JsValue> {
        console::log_1(&"[Pinelight] Initializing WASM module...".into());

        let config = TreeConfig::from_js(config_val);

        let window = web_sys::window().ok_or("Failed to get window")?;
        let document = window.document().ok_or("Failed to get document")?;

        let main = Surface::lookup(&document, canvas_id)?.ok_or("Canvas not found")?;
        let snow = Surface::lookup_overlay(&document, &config.snow_canvas_id);
        let confetti = Surface::lookup_overlay(&document, &config.confetti_canvas_id);

        let (width, height, _) = viewport(&window)?;
        let mut scene = Scene::new(JsRandom, &config, width, height, countdown_target_ms(&config));
        scene.set_surfaces(Surfaces {
            snow: snow.is_some(),
            confetti: confetti.is_some(),
        });

        let mut tree = Self {
            window,
            main,
            snow,
            confetti,
            scene,
            config,
            frame_count: 0,
            fps_last_time: 0.0,
            current_fps: 0,
            time: 0.0,
        };
        tree.resize()?;

        console::log_1(
            &format!(
                "[Pinelight] Initialized: {} foliage, {} lights, snow {}",
                tree.scene.tree().foliage.len(),
                tree.scene.tree().lights.len(),
                if tree.scene.snow_enabled() { "on" } else { "off" },
            )
            .into(),
        );
        Ok(tree)
    }

    /// Resizes all three canvases together to the window and pixel ratio.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        let (width, height, dpr) = viewport(&self.window)?;
        for surface in [Some(&self.main), self.snow.as_ref(), self.confetti.as_ref()]
            .into_iter()
            .flatten()
        {
            surface.resize(width, height, dpr)?;
        }
        self.scene.set_viewport(width, height);
        Ok(())
    }

    /// One animation tick; `current_time` is the `requestAnimationFrame` timestamp.
    pub fn render(&mut self, current_time: f64) -> RenderResult {
        self.frame_count += 1;
        if current_time - self.fps_last_time >= 1000.0 {
            self.current_fps = self.frame_count;
            self.frame_count = 0;
            self.fps_last_time = current_time;
        }
        self.time = current_time * 0.001;

        let (width, height) = self.scene.viewport();
        let frame = self.scene.advance_frame(current_time);

        let mut painted = self.main.repaint(width, height, frame.tree);
        if let (Some(surface), Some(cmds)) = (&self.snow, frame.snow) {
            painted = painted.and_then(|_| surface.repaint(width, height, cmds));
        }
        if let (Some(surface), Some(cmds)) = (&self.confetti, frame.confetti) {
            painted = painted.and_then(|_| surface.repaint(width, height, cmds));
        }
        if let Err(err) = painted {
            console::warn_2(&"[Pinelight] Frame dropped:".into(), &err);
        }

        RenderResult {
            fps: self.current_fps,
            time: self.time,
            rotation: self.scene.rotation(),
            snow_count: self.scene.snow().particles.len() as u32,
            confetti_count: self.scene.confetti().len() as u32,
        }
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.scene.pointer_down(x);
    }

    pub fn pointer_move(&mut self, x: f64) {
        self.scene.pointer_move(x);
    }

    pub fn pointer_up(&mut self) {
        self.scene.pointer_up();
    }

    /// Returns the new state so the page can persist it.
    pub fn toggle_snow(&mut self) -> bool {
        self.scene.toggle_snow()
    }

    pub fn set_snow_enabled(&mut self, enabled: bool) {
        self.scene.set_snow_enabled(enabled);
    }

    pub fn is_snow_enabled(&self) -> bool {
        self.scene.snow_enabled()
    }

    /// Manual celebrate button. Empty strings fall back to the default greeting.
    pub fn celebrate(&mut self, name: &str, message: &str) -> bool {
        let name = if name.is_empty() { DEFAULT_CELEBRATION_NAME } else { name };
        let message = if message.is_empty() {
            DEFAULT_CELEBRATION_MESSAGE
        } else {
            message
        };
        self.scene.trigger_celebration(name, message)
    }

    /// Close button, backdrop click or Escape.
    pub fn close_celebration(&mut self) -> bool {
        let closed = self.scene.close_celebration();
        if closed {
            if let Some(surface) = &self.confetti {
                let (width, height) = self.scene.viewport();
                surface.ctx.clear_rect(0.0, 0.0, width, height);
            }
        }
        closed
    }

    pub fn is_celebrating(&self) -> bool {
        self.scene.is_celebrating()
    }

    /// "More confetti" button.
    pub fn burst_confetti(&mut self) {
        self.scene.burst_confetti();
    }

    pub fn poll_signal(&mut self) -> Option<CelebrationInfo> {
        self.scene.poll_signal().map(CelebrationInfo::from)
    }

    /// Call once per second.
    pub fn tick_countdown(&mut self) -> CountdownDisplay {
        self.tick_countdown_at(Date::now())
    }

    pub fn tick_countdown_at(&mut self, now_ms: f64) -> CountdownDisplay {
        let tick = self.scene.tick_countdown(now_ms);
        CountdownDisplay {
            days: tick.units.days_text(),
            hours: tick.units.hours_text(),
            minutes: tick.units.minutes_text(),
            seconds: tick.units.seconds_text(),
            finished: tick.phase != crate::countdown::CountdownPhase::Counting,
        }
    }

    pub fn countdown_target(&self) -> f64 {
        self.scene.countdown().target_ms()
    }

    #[cfg(feature = "configurable")]
    pub fn set_bloom_strength(&mut self, value: f64) {
        self.config.bloom_strength = value;
        self.scene.set_bloom_strength(value);
    }

    #[cfg(feature = "configurable")]
    pub fn set_auto_rotate_speed(&mut self, value: f64) {
        self.config.auto_rotate_speed = value;
        self.scene.set_auto_rotate_speed(value);
    }

    #[cfg(feature = "configurable")]
    pub fn set_foliage_count(&mut self, count: u32) {
        self.config.foliage_count = count;
        self.scene
            .regenerate(count as usize, self.config.light_count as usize);
        console::log_1(&format!("[Pinelight] Regenerated with {count} foliage particles").into());
    }

    pub fn get_fps(&self) -> u32 {
        self.current_fps
    }
    pub fn get_time(&self) -> f64 {
        self.time
    }
    pub fn get_rotation(&self) -> f64 {
        self.scene.rotation()
    }
    pub fn get_config(&self) -> TreeConfig {
        self.config.clone()
    }
    pub fn is_configurable(&self) -> bool {
        RUNTIME_CONFIGURABLE
    }
}
