//! Braille sub-cell canvas: 2x4 dots per terminal cell, layered colours.

use crate::terminal::Terminal;
use crossterm::style::Color;

/// A lit dot. Higher layers win the colour of a shared cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub layer: u8,
    pub color: Color,
    pub bold: bool,
}

// (row, col) offsets inside a cell, in braille bit order
const DOT_OFFSETS: [(usize, usize); 8] = [
    (0, 0), (1, 0), (2, 0),
    (0, 1), (1, 1), (2, 1),
    (3, 0), (3, 1),
];

pub struct BrailleCanvas {
    width: usize,
    height: usize,
    dots: Vec<Option<Dot>>,
}

impl BrailleCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let width = cols as usize * 2;
        let height = rows as usize * 4;
        Self { width, height, dots: vec![None; width * height] }
    }

    /// Size in dots.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.dots.iter_mut().for_each(|d| *d = None);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<Dot> {
        self.index(x, y).and_then(|i| self.dots[i])
    }

    /// Light a dot unless a higher layer already owns it.
    pub fn plot(&mut self, x: i32, y: i32, dot: Dot) {
        if let Some(i) = self.index(x, y) {
            match self.dots[i] {
                Some(existing) if existing.layer > dot.layer => {}
                _ => self.dots[i] = Some(dot),
            }
        }
    }

    /// Bresenham line between two dot positions, inclusive.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, dot: Dot) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.plot(x, y, dot);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled diamond of the given radius around a dot.
    pub fn diamond(&mut self, cx: i32, cy: i32, radius: i32, dot: Dot) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() + dy.abs() <= radius {
                    self.plot(cx + dx, cy + dy, dot);
                }
            }
        }
    }

    /// Ring outline, with dots spaced roughly one apart.
    pub fn ring(&mut self, cx: f32, cy: f32, radius: f32, dot: Dot) {
        let steps = ((radius * std::f32::consts::TAU).ceil() as usize).max(8);
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.plot((cx + radius * a.cos()).round() as i32, (cy + radius * a.sin()).round() as i32, dot);
        }
    }

    /// Write braille characters into the terminal buffer. Empty cells are left alone.
    pub fn blit(&self, term: &mut Terminal) {
        let cols = self.width / 2;
        let rows = self.height / 4;
        for cy in 0..rows {
            for cx in 0..cols {
                let mut bits: u32 = 0;
                let mut top: Option<Dot> = None;
                for (bit, &(oy, ox)) in DOT_OFFSETS.iter().enumerate() {
                    let i = (cy * 4 + oy) * self.width + cx * 2 + ox;
                    if let Some(dot) = self.dots[i] {
                        bits |= 1 << bit;
                        if top.map_or(true, |t| dot.layer >= t.layer) {
                            top = Some(dot);
                        }
                    }
                }
                if let Some(dot) = top {
                    let ch = char::from_u32(0x2800 + bits).unwrap_or(' ');
                    term.set(cx as i32, cy as i32, ch, Some(dot.color), dot.bold);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(layer: u8) -> Dot {
        Dot { layer, color: Color::Rgb { r: layer, g: 0, b: 0 }, bold: false }
    }

    #[test]
    fn higher_layer_wins() {
        let mut c = BrailleCanvas::new(2, 2);
        c.plot(1, 1, dot(3));
        c.plot(1, 1, dot(1));
        assert_eq!(c.get(1, 1).map(|d| d.layer), Some(3));
        c.plot(1, 1, dot(5));
        assert_eq!(c.get(1, 1).map(|d| d.layer), Some(5));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut c = BrailleCanvas::new(1, 1);
        c.plot(-1, 0, dot(1));
        c.plot(2, 0, dot(1));
        c.plot(0, 4, dot(1));
        assert!(c.dots.iter().all(Option::is_none));
    }

    #[test]
    fn line_hits_both_ends() {
        let mut c = BrailleCanvas::new(10, 10);
        c.line(0, 0, 13, 7, dot(1));
        assert!(c.get(0, 0).is_some());
        assert!(c.get(13, 7).is_some());
        c.line(5, 30, 5, 20, dot(1));
        for y in 20..=30 {
            assert!(c.get(5, y).is_some());
        }
    }

    #[test]
    fn blit_builds_braille_glyphs() {
        let mut c = BrailleCanvas::new(2, 1);
        c.plot(0, 0, dot(1));
        c.plot(1, 3, dot(2));
        let mut term = Terminal::offscreen(2, 1);
        c.blit(&mut term);
        let cell = term.cell(0, 0).unwrap();
        assert_eq!(cell.ch, char::from_u32(0x2800 + 0x01 + 0x80).unwrap());
        assert_eq!(cell.fg, Some(Color::Rgb { r: 2, g: 0, b: 0 }));
        assert_eq!(term.cell(1, 0).unwrap().ch, ' ');
    }

    #[test]
    fn full_cell_is_all_dots() {
        let mut c = BrailleCanvas::new(1, 1);
        for y in 0..4 {
            for x in 0..2 {
                c.plot(x, y, dot(1));
            }
        }
        let mut term = Terminal::offscreen(1, 1);
        c.blit(&mut term);
        assert_eq!(term.cell(0, 0).unwrap().ch, '\u{28FF}');
    }

    #[test]
    fn clear_empties_everything() {
        let mut c = BrailleCanvas::new(2, 2);
        c.diamond(2, 3, 2, dot(1));
        c.clear();
        assert!(c.dots.iter().all(Option::is_none));
    }
}
