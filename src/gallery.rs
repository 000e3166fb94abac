//! Page shell: one live effect, the menu overlay and the footer label.
//!
//! Chrome is drawn on [`Target::Overlay`] so it never leaks into the effect's persistent
//! screen. Hit-testing and drawing share [`MenuLayout`], so what is drawn is what is clicked.

use kurbo::{RoundedRect, Shape};

use crate::config::SessionConfig;
use crate::effects::{
    Effect, EffectId, EffectInfo, EffectKind, LayoutCtx, Theme, Tick, create_effect,
};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect, Vec2, Viewport};
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{Baseline, FontSpec, PassSpec, StrokeStyle, TextAlign, TextOp};
use crate::scene::painter::Painter;
use crate::text::typeset::Typesetter;

const INSET: f64 = 24.0;
const BUTTON: f64 = 40.0;
const GRID_TOP: f64 = 96.0;
const GRID_GAP: f64 = 16.0;
const GRID_MAX_W: f64 = 1152.0;
const TILE_H: f64 = 76.0;
const COLLECTION: &str = "TIME IMPRESSION COLLECTION";

/// Where the chrome sits for a given viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuLayout {
    pub button: Rect,
    /// One tile per catalog page, in catalog order.
    pub tiles: Vec<(EffectId, Rect)>,
}

impl MenuLayout {
    pub fn new(viewport: Viewport) -> Self {
        let w = viewport.w();
        let button = Rect::new(w - INSET - BUTTON, INSET, w - INSET, INSET + BUTTON);
        let cols: usize = if w < 768.0 {
            2
        } else if w < 1024.0 {
            3
        } else {
            4
        };
        let grid_w = (w - INSET * 2.0).min(GRID_MAX_W);
        let left = (w - grid_w) / 2.0;
        let tile_w = (grid_w - GRID_GAP * (cols - 1) as f64) / cols as f64;
        let tiles = crate::effects::catalog()
            .iter()
            .enumerate()
            .map(|(i, info)| {
                let (col, row) = ((i % cols) as f64, (i / cols) as f64);
                let x = left + col * (tile_w + GRID_GAP);
                let y = GRID_TOP + row * (TILE_H + GRID_GAP);
                (info.id, Rect::new(x, y, x + tile_w, y + TILE_H))
            })
            .collect();
        Self { button, tiles }
    }

    pub fn tile_at(&self, p: Point) -> Option<EffectId> {
        self.tiles
            .iter()
            .find(|(_, r)| r.contains(p))
            .map(|(id, _)| *id)
    }
}

/// The interactive gallery: routes input, steps and draws the current page.
pub struct Gallery {
    viewport: Viewport,
    seed: u64,
    background: Option<Color>,
    current: EffectId,
    effect: Box<dyn Effect>,
    pointer: PointerState,
    generation: u64,
    ticks: u64,
    menu_open: bool,
    /// The press that hit the chrome; its release must not reach the effect either.
    chrome_press: bool,
    layout: MenuLayout,
    /// Persistent render surfaces are stale and must be cleared before the next frame.
    surfaces_stale: bool,
}

impl Gallery {
    /// Build the gallery on `config.page` and lay it out. `typesetter` is only borrowed
    /// for layout; the renderer owns the one used for drawing.
    pub fn new(config: &SessionConfig, typesetter: &mut dyn Typesetter) -> Self {
        let viewport = config.viewport();
        let mut gallery = Self {
            viewport,
            seed: config.seed,
            background: config.background.map(|c| c.0),
            current: config.page,
            effect: create_effect(config.page),
            pointer: PointerState::new(viewport),
            generation: 0,
            ticks: 0,
            menu_open: false,
            chrome_press: false,
            layout: MenuLayout::new(viewport),
            surfaces_stale: true,
        };
        gallery.rebuild(typesetter);
        gallery
    }

    pub fn current(&self) -> EffectId {
        self.current
    }

    pub fn info(&self) -> &'static EffectInfo {
        self.current.info()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn pointer_state(&self) -> &PointerState {
        &self.pointer
    }

    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    pub fn status(&self) -> Option<String> {
        self.effect.status()
    }

    /// Page background, unless the configuration pins one.
    pub fn background(&self) -> Color {
        self.background.unwrap_or(self.info().background)
    }

    /// Switch pages. A page always opens on its first generation.
    pub fn select(&mut self, id: EffectId, typesetter: &mut dyn Typesetter) {
        tracing::debug!(from = %self.current, to = %id, "page switch");
        self.menu_open = false;
        self.current = id;
        self.effect = create_effect(id);
        self.generation = 0;
        self.rebuild(typesetter);
    }

    /// Rebuild the current page with a fresh random stream.
    pub fn restart(&mut self, typesetter: &mut dyn Typesetter) {
        self.generation += 1;
        self.rebuild(typesetter);
    }

    pub fn resize(&mut self, viewport: Viewport, typesetter: &mut dyn Typesetter) {
        self.viewport = viewport;
        self.layout = MenuLayout::new(viewport);
        self.pointer = PointerState::new(viewport);
        self.rebuild(typesetter);
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// True once after every rebuild; the caller clears its persistent surfaces.
    pub fn take_stale_surfaces(&mut self) -> bool {
        std::mem::take(&mut self.surfaces_stale)
    }

    fn rebuild(&mut self, typesetter: &mut dyn Typesetter) {
        let mut ctx = LayoutCtx::new(self.viewport, typesetter, self.seed, self.generation);
        self.effect.reset(&mut ctx);
        self.ticks = 0;
        self.surfaces_stale = true;
        tracing::debug!(page = %self.current, generation = self.generation, "effect reset");
    }

    /// Route one input event: chrome first, then the effect.
    pub fn pointer(&mut self, event: &PointerEvent, typesetter: &mut dyn Typesetter) {
        match *event {
            PointerEvent::Down { x, y, .. } => {
                let at = Point::new(x, y);
                if self.layout.button.contains(at) {
                    self.toggle_menu();
                    self.chrome_press = true;
                    self.track(at);
                    return;
                }
                if self.menu_open {
                    if let Some(id) = self.layout.tile_at(at) {
                        self.select(id, typesetter);
                    }
                    self.chrome_press = true;
                    self.track(at);
                    return;
                }
            }
            PointerEvent::Up { x, y } if self.chrome_press => {
                self.chrome_press = false;
                self.track(Point::new(x, y));
                return;
            }
            _ => {}
        }
        if self.menu_open {
            if let Some(at) = event.position() {
                self.track(at);
            }
            return;
        }
        self.pointer.apply(event);
        self.effect.pointer(event, &self.pointer);
    }

    /// Follow the pointer without pressing, so velocity stays continuous behind the chrome.
    fn track(&mut self, at: Point) {
        self.pointer.apply(&PointerEvent::Move { x: at.x, y: at.y });
    }

    /// One 60 Hz step. The effect is frozen while the menu covers it.
    #[tracing::instrument(skip(self), fields(page = %self.current))]
    pub fn step(&mut self) {
        if !self.menu_open {
            self.effect.step(&Tick::nth(self.ticks), &self.pointer);
            self.ticks += 1;
        }
        self.pointer.settle();
    }

    pub fn draw(&self, painter: &mut Painter) {
        self.effect.draw(painter);
        painter.pass(PassSpec::overlay(), |p| self.draw_chrome(p));
    }

    fn draw_chrome(&self, p: &mut Painter) {
        let info = self.info();
        let ink = match info.theme {
            Theme::Dark => Color::WHITE,
            Theme::Light => Color::BLACK,
        };
        if self.menu_open {
            self.draw_menu(p);
            self.draw_close(p);
            return;
        }

        let footer = format!("{} / {}", info.label, info.desc);
        p.text(
            TextOp::new(
                footer,
                Point::new(INSET, self.viewport.h() - INSET),
                FontSpec::serif(12.0),
            )
            .color(ink.with_alpha(0.2)),
        );
        if let Some(status) = self.status() {
            p.text(
                TextOp::new(
                    status,
                    Point::new(INSET, INSET + BUTTON / 2.0),
                    FontSpec::mono(11.0),
                )
                .baseline(Baseline::Middle)
                .letter_spacing(2.0)
                .color(ink.with_alpha(0.4)),
            );
        }

        let c = self.layout.button.center();
        let style = StrokeStyle::round(2.0);
        for dy in [-7.0, 0.0, 7.0] {
            p.stroke_line(
                Point::new(c.x - 9.0, c.y + dy),
                Point::new(c.x + 9.0, c.y + dy),
                ink,
                style,
            );
        }
    }

    fn draw_close(&self, p: &mut Painter) {
        let c = self.layout.button.center();
        let style = StrokeStyle::round(2.0);
        let ink = Color::WHITE.with_alpha(0.7);
        let (a, b) = (Vec2::new(10.0, 10.0), Vec2::new(10.0, -10.0));
        p.stroke_line(c - a, c + a, ink, style);
        p.stroke_line(c - b, c + b, ink, style);
    }

    fn draw_menu(&self, p: &mut Painter) {
        p.fill_rect(self.viewport.rect(), Color::BLACK.with_alpha(0.95));
        for &(id, rect) in &self.layout.tiles {
            let info = id.info();
            let active = id == self.current;
            let shape = RoundedRect::from_rect(rect, 12.0).to_path(0.1);
            let (fill, border, title, desc) = if active {
                (Color::WHITE, Color::WHITE, Color::BLACK, Color::hex(0x6b7280))
            } else {
                (
                    Color::WHITE.with_alpha(0.05),
                    Color::WHITE.with_alpha(0.1),
                    Color::WHITE,
                    Color::hex(0x9ca3af),
                )
            };
            p.fill_path(shape.clone(), fill);
            p.stroke_path(shape, border, StrokeStyle::new(1.0));

            let title_size = if self.viewport.is_compact() { 14.0 } else { 18.0 };
            let at = Point::new(rect.x0 + 16.0, rect.y0 + 16.0);
            p.text(
                TextOp::new(info.label, at, FontSpec::serif(title_size).bold())
                    .baseline(Baseline::Top)
                    .letter_spacing(1.0)
                    .color(title),
            );
            let caption = Point::new(at.x, rect.y1 - 16.0);
            p.text(
                TextOp::new(info.desc.to_uppercase(), caption, FontSpec::sans(10.0))
                    .letter_spacing(1.5)
                    .color(desc),
            );
            if info.kind == EffectKind::Volumetric {
                let tag = Rect::new(rect.x1 - 44.0, rect.y0 + 16.0, rect.x1 - 16.0, rect.y0 + 32.0);
                let tag_ink = if active {
                    Color::BLACK
                } else {
                    Color::WHITE.with_alpha(0.5)
                };
                let outline = RoundedRect::from_rect(tag, 3.0).to_path(0.1);
                p.stroke_path(outline, tag_ink, StrokeStyle::new(1.0));
                p.text(
                    TextOp::new("3D", tag.center(), FontSpec::sans(10.0))
                        .centered()
                        .color(tag_ink),
                );
            }
        }
        p.text(
            TextOp::new(
                COLLECTION,
                Point::new(self.viewport.w() / 2.0, self.viewport.h() - INSET),
                FontSpec::serif(12.0),
            )
            .align(TextAlign::Center)
            .letter_spacing(3.6)
            .color(Color::WHITE.with_alpha(0.2)),
        );
    }
}

#[cfg(test)]
#[path = "../tests/unit/gallery.rs"]
mod tests;
