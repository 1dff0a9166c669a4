use egui::{Pos2, Rect, Vec2};

use super::Axis;

/// Calculate distance from a point to a line segment (useful for stroke hit testing)
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

pub(crate) fn scale_point(point: Pos2, origin: Pos2, fx: f32, fy: f32) -> Pos2 {
    Pos2::new(
        origin.x + (point.x - origin.x) * fx,
        origin.y + (point.y - origin.y) * fy,
    )
}

/// Rotates `point` around `center`. Positive angles turn clockwise on screen (y points down).
pub(crate) fn rotate_point(point: Pos2, center: Pos2, angle: f32) -> Pos2 {
    let (sin, cos) = angle.sin_cos();
    let d = point - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

pub(crate) fn reflect_point(point: Pos2, axis: Axis, coordinate: f32) -> Pos2 {
    match axis {
        Axis::Vertical => Pos2::new(2.0 * coordinate - point.x, point.y),
        Axis::Horizontal => Pos2::new(point.x, 2.0 * coordinate - point.y),
    }
}

/// Scales a frame about `origin`. Negative factors flip the frame but keep it well formed.
pub(crate) fn scale_frame(rect: Rect, origin: Pos2, fx: f32, fy: f32) -> Rect {
    Rect::from_two_pos(
        scale_point(rect.min, origin, fx, fy),
        scale_point(rect.max, origin, fx, fy),
    )
}

/// Moves the frame's center around the pivot; the frame keeps its size
pub(crate) fn rotate_frame(rect: Rect, pivot: Pos2, angle: f32) -> Rect {
    Rect::from_center_size(rotate_point(rect.center(), pivot, angle), rect.size())
}

pub(crate) fn reflect_frame(rect: Rect, axis: Axis, coordinate: f32) -> Rect {
    Rect::from_center_size(reflect_point(rect.center(), axis, coordinate), rect.size())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_line_segment(Pos2::new(5.0, 3.0), Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-5);

        // Beyond the end of the segment the distance is measured to the end point
        let d = distance_to_line_segment(Pos2::new(13.0, 4.0), Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_reflect_twice_is_identity() {
        let p = Pos2::new(3.0, 7.0);
        let once = reflect_point(p, Axis::Vertical, 10.0);
        assert_eq!(once, Pos2::new(17.0, 7.0));
        assert_eq!(reflect_point(once, Axis::Vertical, 10.0), p);
    }
}
