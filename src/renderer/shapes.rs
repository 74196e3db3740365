//! Shape generation for 2D primitives
//!
//! Everything becomes a plain triangle list in logical screen space.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::draw::DrawCommand;
use super::vertex::Vertex;
use crate::Color;
use crate::sim::Rect;

/// Fan segments for a curve of the given radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.75) as u32).clamp(8, 48)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a filled axis-aligned ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + radii * Vec2::new(theta1.cos(), theta1.sin()), color));
        vertices.push(Vertex::at(center + radii * Vec2::new(theta2.cos(), theta2.sin()), color));
    }

    vertices
}

/// Filled polygon, fanned from its centroid
///
/// Exact for convex and star-shaped outlines, which is all the scene draws.
pub fn polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;

    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, &p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::at(centroid, color));
        vertices.push(Vertex::at(p1, color));
        vertices.push(Vertex::at(p2, color));
    }
    vertices
}

/// Two triangles covering `rect`
pub fn rect(rect: Rect, color: Color) -> Vec<Vertex> {
    let tl = Vec2::new(rect.x, rect.y);
    let tr = Vec2::new(rect.right(), rect.y);
    let bl = Vec2::new(rect.x, rect.bottom());
    let br = Vec2::new(rect.right(), rect.bottom());
    quad(tl, tr, br, bl, color)
}

fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color) -> Vec<Vertex> {
    [a, b, c, c, d, a].iter().map(|&p| Vertex::at(p, color)).collect()
}

/// Outline of a rounded rectangle, clockwise on screen
///
/// Always returns `4 * (per_corner + 1)` points so inner and outer paths
/// can be stitched together.
pub fn rounded_path(rect: Rect, radius: f32, per_corner: u32) -> Vec<Vec2> {
    let r = radius.clamp(0.0, rect.w.min(rect.h) / 2.0);
    let corners = [
        (Vec2::new(rect.x + r, rect.y + r), PI),
        (Vec2::new(rect.right() - r, rect.y + r), PI + FRAC_PI_2),
        (Vec2::new(rect.right() - r, rect.bottom() - r), 0.0),
        (Vec2::new(rect.x + r, rect.bottom() - r), FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(4 * (per_corner as usize + 1));
    for (center, start) in corners {
        for i in 0..=per_corner {
            let theta = start + FRAC_PI_2 * i as f32 / per_corner as f32;
            points.push(center + r * Vec2::new(theta.cos(), theta.sin()));
        }
    }
    points
}

/// Filled rectangle with rounded corners
pub fn rounded_rect(bounds: Rect, radius: f32, color: Color) -> Vec<Vertex> {
    if radius <= 0.0 {
        return rect(bounds, color);
    }
    // Rounded rectangles are convex, so the centroid fan is exact
    polygon(&rounded_path(bounds, radius, segments_for(radius) / 4 + 2), color)
}

/// Border of `width` pixels drawn inside `bounds`
pub fn rounded_outline(bounds: Rect, radius: f32, width: f32, color: Color) -> Vec<Vertex> {
    let width = width.clamp(0.0, bounds.w.min(bounds.h) / 2.0);
    if width <= 0.0 {
        return Vec::new();
    }
    let per_corner = segments_for(radius) / 4 + 2;
    let inner_bounds = Rect::new(
        bounds.x + width,
        bounds.y + width,
        bounds.w - 2.0 * width,
        bounds.h - 2.0 * width,
    );
    let outer = rounded_path(bounds, radius, per_corner);
    let inner = rounded_path(inner_bounds, (radius - width).max(0.0), per_corner);

    let mut vertices = Vec::with_capacity(outer.len() * 6);
    for i in 0..outer.len() {
        let j = (i + 1) % outer.len();
        vertices.extend(quad(outer[i], outer[j], inner[j], inner[i], color));
    }
    vertices
}

/// Thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(from + perp, to + perp, to - perp, from - perp, color)
}

/// Triangulate a recorded frame
///
/// Text is skipped; fonts are drawn by the host.
pub fn tessellate(commands: &[DrawCommand]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for command in commands {
        match command {
            DrawCommand::Rect {
                rect,
                color,
                radius,
                outline: None,
            } => vertices.extend(rounded_rect(*rect, *radius, *color)),
            DrawCommand::Rect {
                rect,
                color,
                radius,
                outline: Some(width),
            } => vertices.extend(rounded_outline(*rect, *radius, *width, *color)),
            DrawCommand::Circle { center, radius, color } => {
                vertices.extend(circle(*center, *radius, *color, segments_for(*radius)));
            }
            DrawCommand::Ellipse { bounds, color } => {
                let radii = Vec2::new(bounds.w, bounds.h) / 2.0;
                let segments = segments_for(radii.max_element());
                vertices.extend(ellipse(bounds.center(), radii, *color, segments));
            }
            DrawCommand::Polygon { points, color } => vertices.extend(polygon(points, *color)),
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => vertices.extend(line(*from, *to, *width, *color)),
            DrawCommand::Text { .. } => {}
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::renderer::draw::{DrawList, Surface, TextAnchor};
    use approx::assert_relative_eq;

    fn area(vertices: &[Vertex]) -> f32 {
        vertices
            .chunks_exact(3)
            .map(|t| {
                let a = Vec2::from(t[0].position);
                let b = Vec2::from(t[1].position);
                let c = Vec2::from(t[2].position);
                (b - a).perp_dot(c - a).abs() / 2.0
            })
            .sum()
    }

    fn inside(vertices: &[Vertex], bounds: Rect) -> bool {
        vertices.iter().all(|v| {
            let [x, y] = v.position;
            x >= bounds.x - 1e-3
                && x <= bounds.right() + 1e-3
                && y >= bounds.y - 1e-3
                && y <= bounds.bottom() + 1e-3
        })
    }

    #[test]
    fn test_circle_fan() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, colors::GOLD, 16);
        assert_eq!(verts.len(), 48);
        assert_eq!(verts[0].color, colors::GOLD.to_f32());
        assert_relative_eq!(area(&verts), PI * 25.0, max_relative = 0.05);
    }

    #[test]
    fn test_rect_area() {
        let verts = rect(Rect::new(5.0, 5.0, 20.0, 10.0), colors::RED);
        assert_eq!(verts.len(), 6);
        assert_relative_eq!(area(&verts), 200.0, max_relative = 1e-5);
    }

    #[test]
    fn test_rounded_rect_cuts_corners() {
        let bounds = Rect::new(540.0, 410.0, 200.0, 60.0);
        let verts = rounded_rect(bounds, 12.0, colors::BLUE);
        assert!(inside(&verts, bounds));
        let expected = 200.0 * 60.0 - (4.0 - PI) * 144.0;
        assert_relative_eq!(area(&verts), expected, max_relative = 0.01);
    }

    #[test]
    fn test_outline_band() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let verts = rounded_outline(bounds, 12.0, 2.0, colors::WHITE);
        assert!(inside(&verts, bounds));
        // Roughly perimeter x width
        assert_relative_eq!(area(&verts), 2.0 * 2.0 * 146.0, max_relative = 0.15);
    }

    #[test]
    fn test_rounded_path_point_count() {
        let bounds = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert_eq!(rounded_path(bounds, 12.0, 5).len(), 24);
        assert_eq!(rounded_path(bounds, 0.0, 5).len(), 24);
    }

    #[test]
    fn test_line_width() {
        let verts = line(Vec2::new(0.0, 620.0), Vec2::new(1280.0, 620.0), 4.0, colors::GREEN);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| (v.position[1] - 620.0).abs() <= 2.0 + 1e-4));
        assert!(line(Vec2::ONE, Vec2::ONE, 4.0, colors::GREEN).is_empty());
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(polygon(&[Vec2::ZERO, Vec2::ONE], colors::PURPLE).is_empty());
        let tri = polygon(&[Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)], colors::PURPLE);
        assert_relative_eq!(area(&tri), 8.0, max_relative = 1e-5);
    }

    #[test]
    fn test_tessellate_skips_text() {
        let mut list = DrawList::new();
        list.text("GHOST RUN", Vec2::new(640.0, 240.0), 80.0, colors::WHITE, TextAnchor::Center);
        assert!(tessellate(list.commands()).is_empty());

        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), colors::BLACK);
        list.ellipse(Rect::new(0.0, 0.0, 100.0, 50.0), colors::WHITE);
        let verts = tessellate(list.commands());
        assert_eq!(verts.len(), 6 + 3 * segments_for(50.0) as usize);
    }
}
