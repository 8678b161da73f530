//! Shape rasterization primitives for pixel-perfect rendering.
//!
//! These functions convert geometric shapes into integer cell coordinates.
//! Coordinates are `(x, y)` pairs where x is the column and y is the row.
//!
//! All rasterizers return an ordered `Vec` in the order the algorithm walks
//! the shape, with duplicates removed (the first occurrence wins). Callers
//! that draw a preview and later commit the same gesture therefore paint
//! identical cells in an identical order.

use std::collections::HashSet;

/// Bounds used to clip rasterized points: `(cols, rows)`.
pub type Bounds = (i32, i32);

/// Deduplicate a set of points, keeping the first occurrence of each.
///
/// # Examples
///
/// ```
/// use pixelpad::shapes::rasterize_points;
///
/// let pixels = rasterize_points(&[(0, 0), (1, 1), (0, 0)]);
/// assert_eq!(pixels, vec![(0, 0), (1, 1)]);
/// ```
pub fn rasterize_points(points: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let mut seen = HashSet::with_capacity(points.len());
    points.iter().copied().filter(|p| seen.insert(*p)).collect()
}

/// Rasterize a line using Bresenham's line algorithm.
///
/// When the error term allows it, both axes step together, so a perfect
/// diagonal produces one cell per column. The walk always ends exactly on
/// `p1` and never visits a cell twice.
///
/// # Examples
///
/// ```
/// use pixelpad::shapes::rasterize_line;
///
/// assert_eq!(rasterize_line((0, 0), (3, 3)), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
/// assert_eq!(rasterize_line((2, 0), (0, 0)), vec![(2, 0), (1, 0), (0, 0)]);
/// ```
pub fn rasterize_line(p0: (i32, i32), p1: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut pixels = Vec::with_capacity((dx.max(dy) + 1) as usize);
    loop {
        pixels.push((x0, y0));

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }

    pixels
}

/// Rasterize the outline of the axis-aligned box spanned by two corners.
///
/// The corners may be given in any order. The top and bottom rows are
/// emitted in full (interleaved, column by column), then the left and right
/// cells of every interior row. Degenerate one-row or one-column boxes do not
/// repeat cells.
///
/// # Examples
///
/// ```
/// use pixelpad::shapes::rasterize_rect_outline;
///
/// let pixels = rasterize_rect_outline((1, 1), (4, 4));
/// assert_eq!(pixels.len(), 12);
/// assert!(!pixels.contains(&(2, 2)));
/// ```
pub fn rasterize_rect_outline(p0: (i32, i32), p1: (i32, i32)) -> Vec<(i32, i32)> {
    let (min_x, max_x) = (p0.0.min(p1.0), p0.0.max(p1.0));
    let (min_y, max_y) = (p0.1.min(p1.1), p0.1.max(p1.1));

    let mut pixels = Vec::new();
    for x in min_x..=max_x {
        pixels.push((x, min_y));
        if max_y != min_y {
            pixels.push((x, max_y));
        }
    }
    for y in (min_y + 1)..max_y {
        pixels.push((min_x, y));
        if max_x != min_x {
            pixels.push((max_x, y));
        }
    }

    pixels
}

/// Radius of a circle dragged from `center` to `edge`: the Euclidean
/// distance rounded to the nearest cell.
pub fn circle_radius(center: (i32, i32), edge: (i32, i32)) -> i32 {
    let dx = f64::from(edge.0 - center.0);
    let dy = f64::from(edge.1 - center.1);
    dx.hypot(dy).round() as i32
}

/// Rasterize a circle outline using the midpoint circle algorithm.
///
/// The radius is the rounded distance from `center` to `edge`. A radius of
/// zero yields just the center. Otherwise one octant is walked and mirrored
/// into all eight; cells are deduplicated and, when `bounds` is given,
/// clipped to `[0, cols) x [0, rows)`.
///
/// # Examples
///
/// ```
/// use pixelpad::shapes::rasterize_circle;
///
/// assert_eq!(rasterize_circle((5, 5), (5, 5), None), vec![(5, 5)]);
/// let ring = rasterize_circle((5, 5), (7, 5), None);
/// assert!(ring.contains(&(7, 5)) && ring.contains(&(5, 3)));
/// assert!(!ring.contains(&(5, 5)));
/// ```
pub fn rasterize_circle(
    center: (i32, i32),
    edge: (i32, i32),
    bounds: Option<Bounds>,
) -> Vec<(i32, i32)> {
    let (cx, cy) = center;
    let radius = circle_radius(center, edge);

    let mut points = Vec::new();
    if radius == 0 {
        points.push(center);
    } else {
        let mut x = radius;
        let mut y = 0;
        let mut d = 1 - radius;

        while x >= y {
            points.extend_from_slice(&[
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ]);

            y += 1;
            if d <= 0 {
                d += 2 * y + 1;
            } else {
                x -= 1;
                d += 2 * (y - x) + 1;
            }
        }
    }

    let mut pixels = rasterize_points(&points);
    if let Some(bounds) = bounds {
        pixels.retain(|&p| in_bounds(p, bounds));
    }
    pixels
}

/// Whether a point lies inside `[0, cols) x [0, rows)`.
pub fn in_bounds((x, y): (i32, i32), (cols, rows): Bounds) -> bool {
    x >= 0 && x < cols && y >= 0 && y < rows
}
