//! Host-side view of the vector display.

use super::analog::{ALG_MAX_X, ALG_MAX_Y};
use super::vectors::Vector;

/// Number of intensity levels the Z sample-and-hold can produce.
pub const VECTREX_COLORS: u32 = 128;

/// A segment in host pixel coordinates.  `color` is an 8-bit brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLine {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub color: u8,
}

/// Receives one render pass at a time.
pub trait Renderer {
    fn draw(&mut self, line: ScreenLine);
    fn end_frame(&mut self);
}

/// Maps logical screen units onto a host window, preserving aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    scaling: i64,
    x_offset: i64,
    y_offset: i64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let sclx = ALG_MAX_X / width as i64;
        let scly = ALG_MAX_Y / height as i64;
        let scaling = sclx.max(scly).max(1);

        Self {
            width,
            height,
            scaling,
            x_offset: (width as i64 - ALG_MAX_X / scaling) / 2,
            y_offset: (height as i64 - ALG_MAX_Y / scaling) / 2,
        }
    }

    pub fn scaling(&self) -> i64 {
        self.scaling
    }

    pub fn offset(&self) -> (i64, i64) {
        (self.x_offset, self.y_offset)
    }

    pub fn project(&self, v: &Vector) -> ScreenLine {
        let x = |c: i64| (self.x_offset + c / self.scaling) as i32;
        let y = |c: i64| (self.y_offset + c / self.scaling) as i32;
        ScreenLine {
            x0: x(v.x0),
            y0: y(v.y0),
            x1: x(v.x1),
            y1: y(v.y1),
            color: (v.color as u32 * 256 / VECTREX_COLORS).min(255) as u8,
        }
    }
}

/// Logical units, one to one.
impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: ALG_MAX_X as u32,
            height: ALG_MAX_Y as u32,
            scaling: 1,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

/// Renderer that buffers lines and keeps each finished pass.
#[derive(Debug, Default)]
pub struct LineCollector {
    current: Vec<ScreenLine>,
    frames: Vec<Vec<ScreenLine>>,
}

impl LineCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed passes, oldest first, draining the collector.
    pub fn take_frames(&mut self) -> Vec<Vec<ScreenLine>> {
        std::mem::take(&mut self.frames)
    }

    pub fn frames(&self) -> &[Vec<ScreenLine>] {
        &self.frames
    }
}

impl Renderer for LineCollector {
    fn draw(&mut self, line: ScreenLine) {
        self.current.push(line);
    }

    fn end_frame(&mut self) {
        self.frames.push(std::mem::take(&mut self.current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_fits_taller_axis() {
        let vp = Viewport::new(330, 410);
        assert_eq!(vp.scaling(), 100);
        assert_eq!(vp.offset(), (0, 0));

        let wide = Viewport::new(660, 410);
        assert_eq!(wide.scaling(), 100);
        assert_eq!(wide.offset(), (165, 0));
    }

    #[test]
    fn test_degenerate_window_guarded() {
        let vp = Viewport::new(0, 0);
        assert_eq!((vp.width, vp.height), (1, 1));
        assert_eq!(vp.scaling(), 41000);

        let huge = Viewport::new(100_000, 100_000);
        assert_eq!(huge.scaling(), 1);
    }

    #[test]
    fn test_project_scales_and_expands_colour() {
        let vp = Viewport::new(3300, 4100);
        let line = vp.project(&Vector { x0: 16500, y0: 20500, x1: 16550, y1: 20500, color: 64 });
        assert_eq!(line, ScreenLine { x0: 1650, y0: 2050, x1: 1655, y1: 2050, color: 128 });

        let bright = vp.project(&Vector { color: 127, ..Default::default() });
        assert_eq!(bright.color, 254);
    }

    #[test]
    fn test_default_is_identity() {
        let vp = Viewport::default();
        let line = vp.project(&Vector { x0: 1, y0: 2, x1: 32999, y1: 40999, color: 0 });
        assert_eq!((line.x0, line.y0, line.x1, line.y1), (1, 2, 32999, 40999));
    }

    #[test]
    fn test_collector_groups_passes() {
        let mut c = LineCollector::new();
        c.draw(ScreenLine::default());
        c.end_frame();
        c.end_frame();
        assert_eq!(c.frames().len(), 2);
        assert_eq!(c.take_frames()[0].len(), 1);
        assert!(c.frames().is_empty());
    }
}
