//! Playable field bounds derived from the viewport

use glam::Vec2;

use crate::consts::{MIN_VIEWPORT_H, MIN_VIEWPORT_W};

/// Field borders in cell coordinates (y grows downward).
///
/// `top`/`bottom` are the wall rows, `left`/`right` the goal columns. The
/// ball lives strictly between the walls and scores on reaching a goal column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGeometry {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    /// Column of the dotted center line
    pub mid_x: i32,
}

impl FieldGeometry {
    /// Lay out the field for a `width` x `height` viewport.
    ///
    /// Two rows are kept for the score line above, one column of margin on
    /// the left and two on the right. Viewports below the minimum are laid
    /// out as if they were the minimum.
    pub fn from_viewport(width: u16, height: u16) -> Self {
        let w = width.max(MIN_VIEWPORT_W) as i32;
        let h = height.max(MIN_VIEWPORT_H) as i32;
        Self {
            top: 2,
            bottom: h - 2,
            left: 2,
            right: w - 3,
            mid_x: w / 2,
        }
    }

    /// Highest row the ball may occupy
    pub fn ball_min_y(&self) -> f32 {
        (self.top + 1) as f32
    }

    /// Lowest row the ball may occupy
    pub fn ball_max_y(&self) -> f32 {
        (self.bottom - 1) as f32
    }

    /// Serve point (integer cell at the middle of the field)
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            ((self.left + self.right) / 2) as f32,
            ((self.top + self.bottom) / 2) as f32,
        )
    }

    /// Vertical middle, the CPU's resting target
    pub fn center_y(&self) -> f32 {
        self.center().y
    }

    /// Allowed paddle center range for a paddle with the given half length
    pub fn paddle_range(&self, half_len: u32) -> (f32, f32) {
        let half = half_len as f32;
        let min = self.top as f32 + 1.0 + half;
        let max = self.bottom as f32 - 1.0 - half;
        // Degenerate fields pin the paddle to the middle
        if min > max {
            let mid = self.center_y();
            (mid, mid)
        } else {
            (min, max)
        }
    }

    /// Paddle lanes (columns) for the left and right paddles
    pub fn paddle_lanes(&self) -> (i32, i32) {
        (self.left + 2, self.right - 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_viewport() {
        let f = FieldGeometry::from_viewport(80, 24);
        assert_eq!(f.top, 2);
        assert_eq!(f.bottom, 22);
        assert_eq!(f.left, 2);
        assert_eq!(f.right, 77);
        assert_eq!(f.mid_x, 40);
        assert_eq!(f.center(), Vec2::new(39.0, 12.0));
        assert_eq!(f.paddle_lanes(), (4, 75));
    }

    #[test]
    fn test_paddle_range() {
        let f = FieldGeometry::from_viewport(80, 24);
        assert_eq!(f.paddle_range(2), (5.0, 19.0));
    }

    #[test]
    fn test_tiny_viewport_is_clamped() {
        let f = FieldGeometry::from_viewport(10, 3);
        assert_eq!(f, FieldGeometry::from_viewport(MIN_VIEWPORT_W, MIN_VIEWPORT_H));
        let (min, max) = f.paddle_range(2);
        assert!(min <= max);
    }
}
