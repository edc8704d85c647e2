//! Scroll-linked fade of the whole globe

/// The globe is fully transparent once scrolled this fraction of the viewport.
pub const FADE_END_RATIO: f32 = 0.8;

/// Opacity multiplier for a scroll offset, in `[0, 1]`.
pub fn visibility_factor(scroll_y: f32, viewport_h: f32) -> f32 {
    let fade_end = viewport_h * FADE_END_RATIO;
    if fade_end <= 0.0 {
        return if scroll_y > 0.0 { 0.0 } else { 1.0 };
    }
    (1.0 - scroll_y / fade_end).clamp(0.0, 1.0)
}

/// Virtual page scroll with a once-per-frame recompute of the fade.
///
/// Scroll events only move the offset. The factor is recomputed in
/// [`ScrollTracker::on_frame`], so a burst of wheel events costs one update.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    scroll_y: f32,
    factor: f32,
    pending: bool,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self { scroll_y: 0.0, factor: 1.0, pending: false }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_y = (self.scroll_y + delta).max(0.0);
        self.pending = true;
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
        self.pending = true;
    }

    /// Viewport changed size: the same offset now means a different fade.
    pub fn invalidate(&mut self) {
        self.pending = true;
    }

    #[cfg(test)]
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Last computed factor.
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Apply any pending scroll. Scrolling stops one viewport down.
    pub fn on_frame(&mut self, viewport_h: f32) -> f32 {
        if self.pending {
            self.scroll_y = self.scroll_y.min(viewport_h.max(0.0));
            self.factor = visibility_factor(self.scroll_y, viewport_h);
            self.pending = false;
        }
        self.factor
    }
}
