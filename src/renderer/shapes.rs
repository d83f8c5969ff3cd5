//! Triangle-list builders for 2D primitives
//!
//! Every function appends to an output buffer instead of returning a fresh
//! `Vec`, so a whole frame is built into one allocation.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::Color;

fn tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: Color) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled triangle
pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: Color) {
    tri(out, a, b, c, color);
}

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: Color) {
    gradient_rect(out, x, y, w, h, color, color);
}

/// Rectangle shaded from `top` to `bottom`
pub fn gradient_rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let (x2, y2) = (x + w, y + h);
    out.push(Vertex::new(x, y, top));
    out.push(Vertex::new(x2, y, top));
    out.push(Vertex::new(x, y2, bottom));
    out.push(Vertex::new(x2, y, top));
    out.push(Vertex::new(x2, y2, bottom));
    out.push(Vertex::new(x, y2, bottom));
}

/// Thick line segment with square ends
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: Color) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    tri(out, a + perp, a - perp, b + perp, color);
    tri(out, b + perp, a - perp, b - perp, color);
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color, segments: u32) {
    if radius <= 0.0 {
        return;
    }
    let segments = segments.max(3);
    for i in 0..segments {
        let t1 = (i as f32 / segments as f32) * TAU;
        let t2 = ((i + 1) as f32 / segments as f32) * TAU;
        tri(
            out,
            center,
            center + Vec2::new(t1.cos(), t1.sin()) * radius,
            center + Vec2::new(t2.cos(), t2.sin()) * radius,
            color,
        );
    }
}

/// Band between two radii, limited to `[start, end]` radians
#[allow(clippy::too_many_arguments)]
pub fn arc(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    start: f32,
    end: f32,
    color: Color,
    segments: u32,
) {
    let segments = segments.max(1);
    let span = end - start;
    for i in 0..segments {
        let t1 = start + span * (i as f32 / segments as f32);
        let t2 = start + span * ((i + 1) as f32 / segments as f32);
        let (d1, d2) = (Vec2::new(t1.cos(), t1.sin()), Vec2::new(t2.cos(), t2.sin()));
        let (i1, o1) = (center + d1 * inner_radius, center + d1 * outer_radius);
        let (i2, o2) = (center + d2 * inner_radius, center + d2 * outer_radius);
        tri(out, i1, o1, i2, color);
        tri(out, i2, o1, o2, color);
    }
}

/// Hollow circle
pub fn ring(out: &mut Vec<Vertex>, center: Vec2, inner_radius: f32, outer_radius: f32, color: Color, segments: u32) {
    arc(out, center, inner_radius, outer_radius, 0.0, TAU, color, segments);
}

/// Fill the area between a polyline and a horizontal baseline below it
pub fn fill_to_baseline(out: &mut Vec<Vertex>, points: &[Vec2], baseline: f32, color: Color) {
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (a_base, b_base) = (Vec2::new(a.x, baseline), Vec2::new(b.x, baseline));
        tri(out, a, b, a_base, color);
        tri(out, b, b_base, a_base, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_vertex_counts() {
        let mut out = Vec::new();
        rect(&mut out, 0.0, 0.0, 10.0, 10.0, RED);
        assert_eq!(out.len(), 6);

        out.clear();
        circle(&mut out, Vec2::ZERO, 5.0, RED, 12);
        assert_eq!(out.len(), 36);

        out.clear();
        ring(&mut out, Vec2::ZERO, 4.0, 5.0, RED, 10);
        assert_eq!(out.len(), 60);

        out.clear();
        let hills = [Vec2::new(0.0, 10.0), Vec2::new(10.0, 5.0), Vec2::new(20.0, 8.0)];
        fill_to_baseline(&mut out, &hills, 100.0, RED);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn test_degenerate_shapes_emit_nothing() {
        let mut out = Vec::new();
        rect(&mut out, 0.0, 0.0, 0.0, 10.0, RED);
        line(&mut out, Vec2::ONE, Vec2::ONE, 3.0, RED);
        circle(&mut out, Vec2::ZERO, 0.0, RED, 8);
        fill_to_baseline(&mut out, &[Vec2::ZERO], 10.0, RED);
        assert!(out.is_empty());
    }

    #[test]
    fn test_line_has_requested_width() {
        let mut out = Vec::new();
        line(&mut out, Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0, RED);
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        let max = ys.iter().cloned().fold(f32::MIN, f32::max);
        let min = ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((max - min - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_gradient_rect_colors() {
        let mut out = Vec::new();
        let blue = [0.0, 0.0, 1.0, 1.0];
        gradient_rect(&mut out, 0.0, 0.0, 10.0, 10.0, RED, blue);
        for v in &out {
            let expected = if v.position[1] == 0.0 { RED } else { blue };
            assert_eq!(v.color, expected);
        }
    }
}
