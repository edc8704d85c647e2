//! The interactive globe: scene state, per-frame drawing and the event loop.

use crate::canvas::{BrailleCanvas, Dot};
use crate::cities::{self, Marker};
use crate::colors::{fade, ACCENT, SPHERE};
use crate::config::GlobeConfig;
use crate::error::Result;
use crate::geo::{BorderBuilder, BorderClass, BorderLine, BorderLoader, BorderStatus, GeoPoint};
use crate::interaction::{self, card_visible, HoverEvent, HoverState, ScreenMarker, CARD_LAYOUT};
use crate::overlay;
use crate::terminal::Terminal;
use crate::view::{OrbitView, ScreenPoint, Viewport};
use crate::visibility::ScrollTracker;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::Color;
use glam::{Mat3, Vec3};
use std::time::Instant;
use tracing::{debug, info};

const HELP: &str = "\
GLOBE
─────────────────────
mouse    Hover a city
drag     Rotate
wheel    Scroll
j/k      Scroll down/up
PgDn/PgUp  Scroll a page
Home     Back to top
arrows   Rotate
+/-      Zoom in/out
0        Reset zoom
space    Pause
?        Toggle help
q/Esc    Quit";

const SPHERE_OPACITY: f32 = 0.95;
const ATMOSPHERE_OPACITY: f32 = 0.08;
const ATMOSPHERE_RADIUS: f32 = 1.02;
const GRID_OPACITY: f32 = 0.15;
const GRID_RADIUS: f32 = 1.0;
/// Pulse ring radius in dots at scale 1.
const PULSE_DOTS: f32 = 3.0;
/// Rows scrolled per wheel notch or j/k press.
const SCROLL_STEP: f32 = 2.0;
const ORBIT_STEP: f32 = 0.05;

// Dot layers, lowest first.
const LAYER_GRID: u8 = 1;
const LAYER_ATMOSPHERE: u8 = 2;
const LAYER_PULSE: u8 = 6;
const LAYER_MARKER: u8 = 7;

fn border_layer(class: BorderClass) -> u8 {
    match class {
        BorderClass::Continent => 3,
        BorderClass::Detailed => 4,
        BorderClass::Highlighted => 5,
    }
}

/// Latitude circles every 20° and meridians every 30°, sampled every 10°.
pub fn graticule() -> Vec<Vec<Vec3>> {
    let mut lines = Vec::new();
    for lat in (-80..=80).step_by(20) {
        lines.push(
            (-180..=180)
                .step_by(10)
                .map(|lng| GeoPoint::new(lat as f32, lng as f32).to_vec3(GRID_RADIUS))
                .collect(),
        );
    }
    for lng in (-180..180).step_by(30) {
        lines.push(
            (-90..=90)
                .step_by(10)
                .map(|lat| GeoPoint::new(lat as f32, lng as f32).to_vec3(GRID_RADIUS))
                .collect(),
        );
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Everything the render loop owns between frames.
pub struct GlobeScene {
    view: OrbitView,
    elapsed: f32,
    paused: bool,
    show_help: bool,
    grid: Vec<Vec<Vec3>>,
    borders: Vec<BorderLine>,
    loader: BorderLoader,
    hover: HoverState,
    scroll: ScrollTracker,
    drag_from: Option<(u16, u16)>,
    /// Last pointer cell while hovering is live. Cleared by a button press.
    pointer: Option<(u16, u16)>,
    canvas: BrailleCanvas,
    screen_markers: Vec<ScreenMarker>,
}

impl GlobeScene {
    pub fn new(view: OrbitView, loader: BorderLoader) -> Self {
        Self {
            view,
            elapsed: 0.0,
            paused: false,
            show_help: false,
            grid: graticule(),
            borders: Vec::new(),
            loader,
            hover: HoverState::default(),
            scroll: ScrollTracker::new(),
            drag_from: None,
            pointer: None,
            canvas: BrailleCanvas::new(0, 0),
            screen_markers: Vec::new(),
        }
    }

    /// Start with border lines already built.
    pub fn with_borders(mut self, borders: Vec<BorderLine>) -> Self {
        self.borders = borders;
        self
    }

    #[cfg(test)]
    pub fn view(&self) -> &OrbitView {
        &self.view
    }

    #[cfg(test)]
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollTracker {
        &mut self.scroll
    }

    #[cfg(test)]
    pub fn visibility(&self) -> f32 {
        self.scroll.factor()
    }

    /// Marker positions from the last drawn frame.
    #[cfg(test)]
    pub fn screen_markers(&self) -> &[ScreenMarker] {
        &self.screen_markers
    }

    pub fn border_status(&self) -> BorderStatus {
        match self.loader.status() {
            BorderStatus::Disabled if !self.borders.is_empty() => BorderStatus::Ready(self.borders.len()),
            status => status,
        }
    }

    pub fn handle_event(&mut self, event: Event, size: (u16, u16)) -> Control {
        match event {
            Event::Key(key) => return self.handle_key(key, size),
            Event::Mouse(mouse) => self.handle_mouse(mouse, size),
            Event::Resize(..) => self.scroll.invalidate(),
            _ => {}
        }
        Control::Continue
    }

    fn handle_key(&mut self, key: KeyEvent, size: (u16, u16)) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        let page = (size.1 / 2).max(1) as f32;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Control::Quit,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Char('j') => self.scroll.scroll_by(SCROLL_STEP),
            KeyCode::Char('k') => self.scroll.scroll_by(-SCROLL_STEP),
            KeyCode::PageDown => self.scroll.scroll_by(page),
            KeyCode::PageUp => self.scroll.scroll_by(-page),
            KeyCode::Home => self.scroll.scroll_to(0.0),
            KeyCode::Left => self.view.orbit(ORBIT_STEP, 0.0),
            KeyCode::Right => self.view.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Up => self.view.orbit(0.0, ORBIT_STEP),
            KeyCode::Down => self.view.orbit(0.0, -ORBIT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.view.zoom_by(1.2),
            KeyCode::Char('-') | KeyCode::Char('_') => self.view.zoom_by(1.0 / 1.2),
            KeyCode::Char('0') => self.view.reset_zoom(),
            _ => {}
        }
        Control::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, size: (u16, u16)) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                self.pointer = Some((col, row));
                self.refresh_hover();
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_from = Some((col, row));
                self.pointer = None;
                if self.hover.clear().is_some() {
                    debug!("hover leave");
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x0, y0)) = self.drag_from {
                    self.view.drag(col as i32 - x0 as i32, row as i32 - y0 as i32, size.1);
                }
                self.drag_from = Some((col, row));
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_from = None,
            MouseEventKind::ScrollDown => self.scroll.scroll_by(SCROLL_STEP),
            MouseEventKind::ScrollUp => self.scroll.scroll_by(-SCROLL_STEP),
            _ => {}
        }
    }

    /// Re-run the hit test at the pointer against the current marker positions.
    fn refresh_hover(&mut self) {
        let Some((col, row)) = self.pointer else {
            return;
        };
        let hit = interaction::hit_test(&self.screen_markers, col, row);
        match self.hover.update(hit, col, row) {
            Some(HoverEvent::Enter { city, x, y }) => debug!(city = city.key, x, y, "hover enter"),
            Some(HoverEvent::Leave) => debug!("hover leave"),
            None => {}
        }
    }

    /// Advance one frame: pick up border data, settle the scroll fade, animate.
    pub fn step(&mut self, rows: u16, dt: f32) {
        if let Some(lines) = self.loader.poll() {
            self.borders = lines;
        }
        self.scroll.on_frame(rows as f32);
        if !self.paused {
            self.view.advance();
            self.elapsed += dt;
        }
    }

    pub fn draw(&mut self, term: &mut Terminal) {
        let (cols, rows) = term.size();
        term.clear();
        if self.canvas.size() != (cols as usize * 2, rows as usize * 4) {
            self.canvas = BrailleCanvas::new(cols, rows);
        } else {
            self.canvas.clear();
        }

        let vis = self.scroll.factor();
        let viewport = Viewport::new(cols, rows, self.view.zoom);
        let transform = self.view.transform();

        self.draw_sphere(term, &viewport, vis);
        self.draw_atmosphere(&viewport, vis);
        self.draw_grid(&viewport, &transform, vis);
        self.draw_borders(&viewport, &transform, vis);
        self.draw_markers(&viewport, &transform, vis);
        self.canvas.blit(term);

        if let Some(city) = self.hover.active() {
            if card_visible(vis) {
                let (x, y) = self.hover.pointer();
                let (left, top) =
                    interaction::place_card((x as i32, y as i32), (cols as i32, rows as i32), CARD_LAYOUT);
                overlay::render_city_card(term, city, left, top, CARD_LAYOUT);
            }
        }

        self.draw_status(term);
        if self.show_help {
            overlay::render_help_overlay(term, HELP);
        }
    }

    fn draw_sphere(&self, term: &mut Terminal, viewport: &Viewport, vis: f32) {
        let Some(bg) = fade(SPHERE, SPHERE_OPACITY * vis) else {
            return;
        };
        let rx = viewport.radius;
        let ry = viewport.radius * 0.5;
        if rx <= 0.0 {
            return;
        }
        for y in 0..viewport.rows {
            for x in 0..viewport.cols {
                let dx = (x as f32 + 0.5 - viewport.center_x) / rx;
                let dy = (y as f32 + 0.5 - viewport.center_y) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    term.set_bg(x as i32, y as i32, Some(bg));
                }
            }
        }
    }

    fn draw_atmosphere(&mut self, viewport: &Viewport, vis: f32) {
        let Some(color) = fade(ACCENT, ATMOSPHERE_OPACITY * vis) else {
            return;
        };
        // One cell is 2x4 dots, so the squashed globe is round in dot space.
        let dot = Dot { layer: LAYER_ATMOSPHERE, color, bold: false };
        self.canvas.ring(
            viewport.center_x * 2.0,
            viewport.center_y * 4.0,
            viewport.radius * 2.0 * ATMOSPHERE_RADIUS,
            dot,
        );
    }

    fn draw_grid(&mut self, viewport: &Viewport, transform: &Mat3, vis: f32) {
        let Some(color) = fade(ACCENT, GRID_OPACITY * vis) else {
            return;
        };
        let dot = Dot { layer: LAYER_GRID, color, bold: false };
        for line in &self.grid {
            polyline(&mut self.canvas, viewport, transform, line, dot, 1);
        }
    }

    fn draw_borders(&mut self, viewport: &Viewport, transform: &Mat3, vis: f32) {
        for line in &self.borders {
            let style = line.class.style();
            let Some(color) = fade(style.color, style.opacity * vis) else {
                continue;
            };
            let dot = Dot {
                layer: border_layer(line.class),
                color,
                bold: line.class == BorderClass::Highlighted,
            };
            polyline(&mut self.canvas, viewport, transform, &line.points, dot, style.width);
        }
    }

    fn draw_markers(&mut self, viewport: &Viewport, transform: &Mat3, vis: f32) {
        self.screen_markers.clear();
        let marker_color = fade(ACCENT, vis);

        for Marker { city, position, pulse } in cities::markers(self.elapsed, vis) {
            let Some(point) = viewport.project(transform, position) else {
                continue;
            };
            self.screen_markers.push(ScreenMarker { city, x: point.x, y: point.y });
            let (dx, dy) = point.dot();

            if let Some(pulse) = pulse {
                if let Some(color) = fade(ACCENT, pulse.opacity) {
                    let dot = Dot { layer: LAYER_PULSE, color, bold: false };
                    self.canvas.ring(dx as f32, dy as f32, PULSE_DOTS * pulse.scale, dot);
                }
            }
            if let Some(color) = marker_color {
                let dot = Dot { layer: LAYER_MARKER, color, bold: city.current };
                self.canvas.diamond(dx, dy, 1, dot);
            }
        }
        // Markers move under a still pointer when the globe turns or zooms.
        self.refresh_hover();
    }

    fn draw_status(&self, term: &mut Terminal) {
        let (cols, rows) = term.size();
        if rows == 0 {
            return;
        }
        let y = rows as i32 - 1;
        let grey = Some(Color::DarkGrey);

        let mut left = match self.border_status() {
            BorderStatus::Loading => "loading borders...".to_string(),
            BorderStatus::Unavailable => "borders unavailable".to_string(),
            BorderStatus::Ready(_) | BorderStatus::Disabled => String::new(),
        };
        if self.paused {
            if !left.is_empty() {
                left.push_str("  ");
            }
            left.push_str("paused");
        }
        term.set_str(1, y, &left, grey, false);

        let hint = "? help";
        term.set_str(cols as i32 - hint.len() as i32 - 1, y, hint, grey, false);
    }
}

/// Draw a polyline, skipping segments with a back-facing end.
fn polyline(canvas: &mut BrailleCanvas, viewport: &Viewport, transform: &Mat3, points: &[Vec3], dot: Dot, width: u8) {
    let mut prev: Option<ScreenPoint> = None;
    for &p in points {
        let current = viewport.project(transform, p);
        if let (Some(a), Some(b)) = (prev, current) {
            let (x0, y0) = a.dot();
            let (x1, y1) = b.dot();
            canvas.line(x0, y0, x1, y1, dot);
            if width > 1 {
                canvas.line(x0 + 1, y0, x1 + 1, y1, dot);
            }
        }
        prev = current;
    }
}

/// Run the interactive globe until the user quits.
pub fn run(term: &mut Terminal, config: &GlobeConfig) -> Result<()> {
    let loader = if config.fetch_borders {
        BorderLoader::spawn(config.sources.clone(), BorderBuilder::default())
    } else {
        BorderLoader::disabled()
    };
    let mut view = OrbitView::new();
    if let Some(tilt) = config.tilt {
        view = view.with_tilt(tilt);
    }
    let mut scene = GlobeScene::new(view, loader);
    info!(
        fetch_borders = config.fetch_borders,
        frame_step = config.time_step as f64,
        home = cities::current().map_or("none", |c| c.name),
        "globe started"
    );

    let (mut prev_w, mut prev_h) = term.size();
    let mut last_frame = Instant::now();

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            scene.scroll_mut().invalidate();
            prev_w = width;
            prev_h = height;
        }

        while let Some(event) = term.next_event()? {
            if scene.handle_event(event, (width, height)) == Control::Quit {
                info!("globe closed");
                return Ok(());
            }
        }

        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();
        scene.step(height, dt);
        scene.draw(term);
        term.render()?;
        term.sleep(config.time_step);
    }
}

/// Render a single frame into an offscreen buffer.
pub fn render_still(cols: u16, rows: u16, scroll: f32, borders: Vec<BorderLine>) -> Terminal {
    let mut term = Terminal::offscreen(cols, rows);
    let mut scene = GlobeScene::new(OrbitView::new(), BorderLoader::disabled()).with_borders(borders);
    scene.scroll_mut().scroll_to(scroll);
    scene.step(rows, 0.0);
    scene.draw(&mut term);
    term
}
