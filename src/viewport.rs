// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! 3D viewport setup.
//!
//! Before each frame the renderer needs the canvas half extents and a per
//! axis scale that makes pixels square for the screen's aspect ratio. All
//! values are 16.16 fixed point.

/// A 16.16 fixed-point value.
pub(crate) type Fix = i32;

pub(crate) const F1_0: Fix = 0x10000;

fn fixmuldiv(a: Fix, b: i64, c: i64) -> Fix {
    (i64::from(a) * b / c.max(1)) as Fix
}

fn fixdiv(a: Fix, b: Fix) -> Fix {
    ((i64::from(a) << 16) / i64::from(b).max(1)) as Fix
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FixVector {
    pub(crate) x: Fix,
    pub(crate) y: Fix,
    pub(crate) z: Fix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) canvas_width: u16,
    pub(crate) canvas_height: u16,
    pub(crate) canv_w2: Fix,
    pub(crate) canv_h2: Fix,
    pub(crate) window_scale: FixVector,
}

/// Screen aspect as stored with the screen mode: the pixel aspect of a
/// `width`x`height` mode shown on an `aspect_x:aspect_y` display.
pub(crate) fn screen_aspect(width: u16, height: u16, aspect_x: u16, aspect_y: u16) -> Fix {
    let num = i64::from(width) * i64::from(aspect_y);
    let den = i64::from(height) * i64::from(aspect_x);
    ((num << 16) / den.max(1)) as Fix
}

/// Computes the viewport for a canvas. The axis that would otherwise
/// stretch is scaled down; z is never scaled.
pub(crate) fn start_frame(canvas_width: u16, canvas_height: u16, aspect: Fix) -> Viewport {
    let s = fixmuldiv(aspect, i64::from(canvas_height), i64::from(canvas_width));

    let (x, y) = if s <= F1_0 { (s, F1_0) } else { (F1_0, fixdiv(F1_0, s)) };

    Viewport {
        canvas_width,
        canvas_height,
        canv_w2: Fix::from(canvas_width) << 15,
        canv_h2: Fix::from(canvas_height) << 15,
        window_scale: FixVector { x, y, z: F1_0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_extents_are_fixed_point() {
        let viewport = start_frame(640, 480, screen_aspect(640, 480, 4, 3));

        assert_eq!(viewport.canv_w2, 320 << 16);
        assert_eq!(viewport.canv_h2, 240 << 16);
    }

    #[test]
    fn square_pixels_need_no_scaling() {
        let aspect = screen_aspect(640, 480, 4, 3);
        assert_eq!(aspect, F1_0);

        let viewport = start_frame(480, 480, aspect);
        assert_eq!(viewport.window_scale, FixVector { x: F1_0, y: F1_0, z: F1_0 });
    }

    #[test]
    fn wide_canvas_scales_x() {
        let viewport = start_frame(640, 480, F1_0);

        assert_eq!(viewport.window_scale.x, F1_0 * 3 / 4);
        assert_eq!(viewport.window_scale.y, F1_0);
    }

    #[test]
    fn tall_canvas_scales_y() {
        let viewport = start_frame(320, 640, F1_0);

        assert_eq!(viewport.window_scale.x, F1_0);
        assert_eq!(viewport.window_scale.y, F1_0 / 2);
        assert_eq!(viewport.window_scale.z, F1_0);
    }

    #[test]
    fn empty_canvas_does_not_divide_by_zero() {
        let viewport = start_frame(0, 0, F1_0);
        assert_eq!(viewport.window_scale.z, F1_0);
    }
}
