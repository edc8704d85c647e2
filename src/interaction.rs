//! Pointer hover over city markers and hover card placement

use crate::cities::City;

/// Below this visibility the hover card is suppressed.
pub const CARD_MIN_VISIBILITY: f32 = 0.1;

/// Hit radius around a marker, in cells (rows count double).
pub const HIT_RADIUS: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverEvent {
    Enter { city: &'static City, x: u16, y: u16 },
    Leave,
}

/// Which city the pointer is over, if any, and where the pointer is.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverState {
    active: Option<&'static City>,
    pointer: (u16, u16),
}

impl HoverState {
    pub fn active(&self) -> Option<&'static City> {
        self.active
    }

    pub fn pointer(&self) -> (u16, u16) {
        self.pointer
    }

    /// Feed the marker under the pointer. Emits an event when the active city changes.
    pub fn update(&mut self, hit: Option<&'static City>, x: u16, y: u16) -> Option<HoverEvent> {
        let previous = self.active.map(|c| c.key);
        match hit {
            Some(city) => {
                self.pointer = (x, y);
                self.active = Some(city);
                (previous != Some(city.key)).then_some(HoverEvent::Enter { city, x, y })
            }
            None => {
                self.active = None;
                previous.map(|_| HoverEvent::Leave)
            }
        }
    }

    pub fn clear(&mut self) -> Option<HoverEvent> {
        self.active.take().map(|_| HoverEvent::Leave)
    }
}

/// A marker's position on screen, in fractional cells.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMarker {
    pub city: &'static City,
    pub x: f32,
    pub y: f32,
}

/// Marker under the pointer cell, nearest first. Ties go to the later marker,
/// which is the one drawn on top.
pub fn hit_test(markers: &[ScreenMarker], col: u16, row: u16) -> Option<&'static City> {
    let px = col as f32 + 0.5;
    let py = row as f32 + 0.5;

    let mut best: Option<(&'static City, f32)> = None;
    for m in markers {
        let dx = m.x - px;
        let dy = (m.y - py) * 2.0;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > HIT_RADIUS {
            continue;
        }
        if best.map_or(true, |(_, d)| dist <= d) {
            best = Some((m.city, dist));
        }
    }
    best.map(|(city, _)| city)
}

/// Fixed card size and edge padding, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub width: i32,
    pub height: i32,
    pub padding: i32,
}

pub const CARD_LAYOUT: CardLayout = CardLayout { width: 46, height: 14, padding: 2 };

/// Top-left corner of the hover card for a pointer position.
///
/// Prefers the left of the cursor, flips right when there is no room, then
/// clamps into the viewport. A viewport smaller than the card pins it to 0.
pub fn place_card(cursor: (i32, i32), viewport: (i32, i32), layout: CardLayout) -> (i32, i32) {
    let (x, y) = cursor;
    let (vw, vh) = viewport;
    let CardLayout { width, height, padding } = layout;

    let mut left = x - width - padding;
    let mut top = y - height / 2;

    if left < padding {
        left = x + padding;
    }
    if left + width > vw - padding {
        left = vw - width - padding;
    }
    if top < padding {
        top = padding;
    }
    if top + height > vh - padding {
        top = vh - height - padding;
    }

    (left.max(0), top.max(0))
}

pub fn card_visible(visibility: f32) -> bool {
    visibility > CARD_MIN_VISIBILITY
}
