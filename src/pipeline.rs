//! Per-frame scene pipeline
//!
//! `Scene` owns every piece of mutable state (camera, particle systems, latch,
//! countdown, deferred actions) and turns one frame timestamp into draw lists for the
//! tree surface and the two overlays. It never touches the DOM.

use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::camera::CameraController;
use crate::celebration::{Celebration, CelebrationSignal};
use crate::config::TreeConfig;
use crate::confetti::ConfettiSystem;
use crate::constants::*;
use crate::countdown::{Countdown, CountdownTick};
use crate::draw::{Blend, Color, DrawCommand, GradientStop};
use crate::projection::{depth_sort, Projector};
use crate::random::RandomSource;
use crate::scene::{FoliageParticle, LightParticle, Tree};
use crate::schedule::{Deferred, Scheduler};
use crate::snow::SnowSystem;

/// Which overlay surfaces exist. A missing overlay turns its subsystem off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surfaces {
    pub snow: bool,
    pub confetti: bool,
}

impl Default for Surfaces {
    fn default() -> Self {
        Self {
            snow: true,
            confetti: true,
        }
    }
}

/// Draw lists for one frame. An overlay set to `None` must be left untouched;
/// `Some` means clear it, then replay the commands (possibly none).
#[derive(Debug)]
pub struct Frame<'a> {
    pub tree: &'a [DrawCommand],
    pub snow: Option<&'a [DrawCommand]>,
    pub confetti: Option<&'a [DrawCommand]>,
}

pub struct Scene<R: RandomSource> {
    rng: R,
    tree: Tree,
    camera: CameraController,
    snow: SnowSystem,
    confetti: ConfettiSystem,
    scheduler: Scheduler,
    celebration: Celebration,
    countdown: Countdown,
    signals: VecDeque<CelebrationSignal>,

    projector: Projector,
    surfaces: Surfaces,
    bloom_strength: f64,

    clock_ms: f64,
    last_frame_ms: Option<f64>,

    foliage_order: Vec<usize>,
    light_order: Vec<usize>,
    tree_cmds: Vec<DrawCommand>,
    snow_cmds: Vec<DrawCommand>,
    confetti_cmds: Vec<DrawCommand>,
    snow_needs_clear: bool,
    confetti_needs_clear: bool,
}

impl<R: RandomSource> Scene<R> {
    /// Generates the tree and prepares (but does not spawn) the overlays.
    /// `width`/`height` are the viewport in CSS pixels.
    pub fn new(mut rng: R, config: &TreeConfig, width: f64, height: f64, target_ms: f64) -> Self {
        let tree = Tree::generate(
            &mut rng,
            config.foliage_count as usize,
            config.light_count as usize,
        );
        console_log!(
            "[Pinelight] Tree generated: {} foliage, {} lights",
            tree.foliage.len(),
            tree.lights.len()
        );

        let mut scene = Self {
            rng,
            tree,
            camera: CameraController::new(config.auto_rotate_speed),
            snow: SnowSystem::new(config.snow_count as usize, config.snow_enabled),
            confetti: ConfettiSystem::new(),
            scheduler: Scheduler::new(),
            celebration: Celebration::new(),
            countdown: Countdown::new(target_ms),
            signals: VecDeque::new(),
            projector: Projector::new(width, height),
            surfaces: Surfaces::default(),
            bloom_strength: config.bloom_strength,
            clock_ms: 0.0,
            last_frame_ms: None,
            foliage_order: Vec::new(),
            light_order: Vec::new(),
            tree_cmds: Vec::new(),
            snow_cmds: Vec::new(),
            confetti_cmds: Vec::new(),
            snow_needs_clear: false,
            confetti_needs_clear: false,
        };
        scene.snow.ensure_populated(&mut scene.rng, width, height);
        scene
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn rotation(&self) -> f64 {
        self.camera.current
    }

    pub fn snow(&self) -> &SnowSystem {
        &self.snow
    }

    pub fn confetti(&self) -> &ConfettiSystem {
        &self.confetti
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration.is_launched()
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.projector.width, self.projector.height)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.projector.width = width;
        self.projector.height = height;
    }

    pub fn set_surfaces(&mut self, surfaces: Surfaces) {
        if !surfaces.snow && self.surfaces.snow {
            console_warn!("[Pinelight] No snow overlay, snow disabled");
            self.snow.particles.clear();
        }
        if !surfaces.confetti && self.surfaces.confetti {
            console_warn!("[Pinelight] No confetti overlay, confetti disabled");
            self.confetti.clear();
        }
        self.surfaces = surfaces;
    }

    pub fn set_bloom_strength(&mut self, value: f64) {
        self.bloom_strength = value;
    }

    pub fn set_auto_rotate_speed(&mut self, value: f64) {
        self.camera.auto_rotate_speed = value;
    }

    pub fn regenerate(&mut self, foliage: usize, lights: usize) {
        self.tree.regenerate(&mut self.rng, foliage, lights);
    }

    // Input

    pub fn pointer_down(&mut self, x: f64) {
        self.camera.pointer_down(x);
    }

    pub fn pointer_move(&mut self, x: f64) {
        self.camera.pointer_move(x);
    }

    pub fn pointer_up(&mut self) {
        self.camera.pointer_up();
    }

    pub fn drag_by(&mut self, dx: f64) {
        self.camera.drag_by(dx);
    }

    pub fn snow_enabled(&self) -> bool {
        self.snow.is_enabled()
    }

    pub fn set_snow_enabled(&mut self, enabled: bool) {
        if self.snow.is_enabled() && !enabled {
            self.snow_needs_clear = true;
        }
        self.snow.set_enabled(enabled);
        if self.surfaces.snow {
            let (w, h) = self.viewport();
            self.snow.ensure_populated(&mut self.rng, w, h);
        }
    }

    /// Flips snow on or off and returns the new state, for the page to persist.
    pub fn toggle_snow(&mut self) -> bool {
        self.set_snow_enabled(!self.snow.is_enabled());
        self.snow.is_enabled()
    }

    // Celebration

    /// Opens the celebration unless it is already running. Returns whether it started.
    pub fn trigger_celebration(&mut self, name: &str, message: &str) -> bool {
        let center = self.center();
        if !self.celebration.trigger(&mut self.scheduler, center) {
            return false;
        }
        self.spawn_confetti(CELEBRATION_BURST, Some(center));
        self.signals.push_back(CelebrationSignal::Started {
            name: name.to_owned(),
            message: message.to_owned(),
        });
        console_log!("[Pinelight] Celebration started");
        true
    }

    /// Closes the celebration early or on timeout. Returns whether one was open.
    pub fn close_celebration(&mut self) -> bool {
        if !self.celebration.close(&mut self.scheduler) {
            return false;
        }
        self.confetti.clear();
        self.confetti_needs_clear = true;
        self.countdown.finish_celebration();
        self.signals.push_back(CelebrationSignal::Ended);
        console_log!("[Pinelight] Celebration closed");
        true
    }

    /// Manual "more confetti": a burst at the center and a smaller one shortly after.
    pub fn burst_confetti(&mut self) {
        let (cx, cy) = self.center();
        self.spawn_confetti(MANUAL_BURST, Some((cx, cy)));
        let x = cx + self.rng.centered(MANUAL_FOLLOW_UP_SPREAD);
        self.scheduler.schedule(
            MANUAL_FOLLOW_UP_DELAY_MS,
            Deferred::ConfettiBurst {
                amount: MANUAL_FOLLOW_UP,
                x,
                y: cy - CELEBRATION_FOLLOW_UP_LIFT,
            },
        );
    }

    pub fn spawn_confetti(&mut self, amount: usize, origin: Option<(f64, f64)>) {
        if !self.surfaces.confetti {
            return;
        }
        let (w, h) = self.viewport();
        self.confetti.spawn(&mut self.rng, amount, origin, w, h);
    }

    pub fn poll_signal(&mut self) -> Option<CelebrationSignal> {
        self.signals.pop_front()
    }

    /// One-second countdown tick on the wall clock. Crossing zero launches the
    /// celebration with the default greeting.
    pub fn tick_countdown(&mut self, now_ms: f64) -> CountdownTick {
        let tick = self.countdown.tick(now_ms);
        if tick.reached {
            self.trigger_celebration(DEFAULT_CELEBRATION_NAME, DEFAULT_CELEBRATION_MESSAGE);
        }
        tick
    }

    fn center(&self) -> (f64, f64) {
        (self.projector.width / 2.0, self.projector.height / 2.0)
    }

    // Frame

    /// Advances every system to `now_ms` (frame clock) and builds the draw lists.
    pub fn advance_frame(&mut self, now_ms: f64) -> Frame<'_> {
        let dt_ms = self.last_frame_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);
        self.clock_ms = now_ms;
        let dt = dt_ms / 1000.0;
        let time = now_ms * 0.001;

        self.scheduler.stamp(now_ms);
        self.run_deferred();

        let rotation = self.camera.advance(dt);
        self.build_tree(rotation, time);

        let snow = self.build_snow(dt, time);
        let confetti = self.build_confetti(dt_ms);

        Frame {
            tree: &self.tree_cmds,
            snow: snow.then_some(self.snow_cmds.as_slice()),
            confetti: confetti.then_some(self.confetti_cmds.as_slice()),
        }
    }

    fn run_deferred(&mut self) {
        for (handle, action) in self.scheduler.take_due(self.clock_ms) {
            self.celebration.timer_fired(handle);
            match action {
                Deferred::ConfettiBurst { amount, x, y } => {
                    self.spawn_confetti(amount, Some((x, y)))
                }
                Deferred::CloseCelebration => {
                    self.close_celebration();
                }
            }
        }
    }

    fn build_tree(&mut self, rotation: f64, time: f64) {
        self.tree_cmds.clear();

        depth_sort(
            self.tree.foliage.iter().map(|p| &p.pos),
            rotation,
            &mut self.foliage_order,
        );
        depth_sort(
            self.tree.lights.iter().map(|l| &l.pos),
            rotation,
            &mut self.light_order,
        );

        draw_silhouette(&mut self.tree_cmds, &self.projector, rotation);
        for &i in &self.foliage_order {
            draw_foliage(
                &mut self.tree_cmds,
                &self.projector,
                rotation,
                &self.tree.foliage[i],
                time,
                self.bloom_strength,
            );
        }
        for &i in &self.light_order {
            draw_light(&mut self.tree_cmds, &self.projector, rotation, &self.tree.lights[i]);
        }
        draw_star(&mut self.tree_cmds, &self.projector, rotation, time);
    }

    fn build_snow(&mut self, dt: f64, time: f64) -> bool {
        if !self.surfaces.snow {
            return false;
        }
        let (w, h) = self.viewport();
        self.snow.ensure_populated(&mut self.rng, w, h);

        self.snow_cmds.clear();
        if !self.snow.is_enabled() || self.snow.particles.is_empty() {
            return std::mem::take(&mut self.snow_needs_clear);
        }
        self.snow_needs_clear = false;
        self.snow.update(&mut self.rng, dt, time, w, h);
        self.snow.draw(&mut self.snow_cmds);
        true
    }

    fn build_confetti(&mut self, dt_ms: f64) -> bool {
        self.confetti_cmds.clear();
        if !self.surfaces.confetti || self.confetti.is_empty() {
            return std::mem::take(&mut self.confetti_needs_clear);
        }
        self.confetti_needs_clear = false;
        self.confetti.update(dt_ms);
        self.confetti.draw(&mut self.confetti_cmds);
        true
    }
}

fn draw_silhouette(out: &mut Vec<DrawCommand>, projector: &Projector, rotation: f64) {
    let points: Vec<(f64, f64)> = Tree::silhouette_outline()
        .filter_map(|p| projector.project_visible(p, rotation))
        .map(|p| (p.sx, p.sy))
        .collect();
    if points.len() >= 3 {
        out.push(DrawCommand::FillPolygon {
            points,
            color: SILHOUETTE_COLOR,
        });
    }
}

fn draw_foliage(
    out: &mut Vec<DrawCommand>,
    projector: &Projector,
    rotation: f64,
    p: &FoliageParticle,
    time: f64,
    bloom_strength: f64,
) {
    let Some(proj) = projector.project_visible(p.pos, rotation) else {
        return;
    };
    let size = (p.size * proj.scale * 6.0).max(0.8);
    let alpha = (p.brightness_at(time) * bloom_strength * 0.85).min(1.0);
    let c = p.base_color;

    out.push(DrawCommand::RadialGlow {
        x: proj.sx,
        y: proj.sy,
        radius: size,
        stops: [
            GradientStop::new(0.0, c.with_alpha(alpha)),
            GradientStop::new(0.2, c.with_alpha(alpha * 0.55)),
            GradientStop::new(1.0, c.with_alpha(0.0)),
        ],
        blend: Blend::Additive,
    });
    out.push(DrawCommand::FillCircle {
        x: proj.sx,
        y: proj.sy,
        radius: (size * 0.25).max(0.8),
        color: c.shade(0.6).with_alpha((0.6 * alpha + 0.2).min(1.0)),
        blend: Blend::Additive,
    });
}

fn draw_light(out: &mut Vec<DrawCommand>, projector: &Projector, rotation: f64, l: &LightParticle) {
    let Some(proj) = projector.project_visible(l.pos, rotation) else {
        return;
    };
    let base = (l.size * proj.scale * 5.0).max(0.6);

    out.push(DrawCommand::BlurredCircle {
        x: proj.sx,
        y: proj.sy,
        radius: base * 1.6,
        blur: (base * 1.8).max(2.0),
        color: l.color.with_alpha(0.28),
        blend: Blend::Additive,
    });
    out.push(DrawCommand::FillCircle {
        x: proj.sx,
        y: proj.sy,
        radius: (base * 0.45).max(0.9),
        color: l.color.with_alpha(1.0),
        blend: Blend::Normal,
    });
    // faint offset shadow
    let offset = (base * 0.12).max(0.5);
    out.push(DrawCommand::FillCircle {
        x: proj.sx + offset,
        y: proj.sy + offset,
        radius: (base * 0.6).max(0.95),
        color: Color::BLACK.with_alpha(0.09),
        blend: Blend::Normal,
    });
}

/// Five-pointed star centered on (cx, cy), first point facing up, alternating outer
/// and inner vertices.
pub fn star_polygon(cx: f64, cy: f64, radius: f64) -> Vec<(f64, f64)> {
    let inner = radius * STAR_INNER_RATIO;
    let step = TAU / STAR_POINTS as f64;
    (0..STAR_POINTS)
        .flat_map(|i| {
            let a = i as f64 * step - FRAC_PI_2;
            let b = a + PI / STAR_POINTS as f64;
            [
                (cx + a.cos() * radius, cy + a.sin() * radius),
                (cx + b.cos() * inner, cy + b.sin() * inner),
            ]
        })
        .collect()
}

fn draw_star(out: &mut Vec<DrawCommand>, projector: &Projector, rotation: f64, time: f64) {
    let Some(proj) = projector.project_visible(Tree::star_position(), rotation) else {
        return;
    };
    let narrow = projector.width < NARROW_VIEWPORT;
    let (base_halo, base_core) = if narrow {
        (STAR_HALO_NARROW, STAR_CORE_NARROW)
    } else {
        (STAR_HALO_WIDE, STAR_CORE_WIDE)
    };

    let pulse = 0.85 + 0.25 * (time * 2.6).sin().abs();
    let halo_radius = base_halo * (0.9 + 0.15 * (time * 1.6).sin());
    let halo_alpha = 0.55 * pulse;

    out.push(DrawCommand::RadialGlow {
        x: proj.sx,
        y: proj.sy,
        radius: halo_radius,
        stops: [
            GradientStop::new(0.0, Color::rgba(255.0, 244.0, 180.0, halo_alpha)),
            GradientStop::new(0.25, Color::rgba(255.0, 200.0, 80.0, (halo_alpha * 0.65).min(0.5))),
            GradientStop::new(1.0, Color::rgba(255.0, 160.0, 50.0, 0.0)),
        ],
        blend: Blend::Additive,
    });

    let r = base_core * (0.9 + 0.18 * (time * 3.0).sin().abs());
    out.push(DrawCommand::FillPolygon {
        points: star_polygon(proj.sx, proj.sy, r),
        color: Color::rgba(255.0, 245.0, 200.0, 0.98),
    });

    out.push(DrawCommand::FillCircle {
        x: proj.sx,
        y: proj.sy - r * 0.6,
        radius: (r * 0.22).max(1.2),
        color: Color::rgba(255.0, 250.0, 210.0, 0.35 * 0.5 * pulse),
        blend: Blend::Normal,
    });
}
