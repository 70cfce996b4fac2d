//! Point-cloud helpers.
//!
//! The fit operates on caller-owned `&[Point3<f64>]` slices; nothing in the
//! crate takes ownership of or mutates the cloud. These helpers compute the
//! handful of aggregate quantities the driver needs.

use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box of a point cloud.
///
/// Returns `None` for an empty cloud.
pub fn bounds(points: &[Point3<f64>]) -> Option<(Point3<f64>, Point3<f64>)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }
    Some((min, max))
}

/// Per-axis extents of a bounding box.
pub fn extents(bounds: &(Point3<f64>, Point3<f64>)) -> Vector3<f64> {
    bounds.1 - bounds.0
}

/// Arithmetic mean of the points.
///
/// Returns `None` for an empty cloud.
pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let mut sum = Vector3::zeros();
    for p in points {
        sum += p.coords;
    }
    Some(Point3::from(sum / points.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_empty() {
        assert!(bounds(&[]).is_none());
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_bounds_and_extents() {
        let points = vec![
            Point3::new(-1.0, 2.0, 0.5),
            Point3::new(3.0, -4.0, 0.5),
            Point3::new(0.0, 0.0, 2.5),
        ];
        let bb = bounds(&points).unwrap();
        assert_eq!(bb.0, Point3::new(-1.0, -4.0, 0.5));
        assert_eq!(bb.1, Point3::new(3.0, 2.0, 2.5));

        let e = extents(&bb);
        assert_relative_eq!(e.x, 4.0);
        assert_relative_eq!(e.y, 6.0);
        assert_relative_eq!(e.z, 2.0);
    }

    #[test]
    fn test_centroid() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 4.0, -2.0),
        ];
        let c = centroid(&points).unwrap();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 2.0);
        assert_relative_eq!(c.z, -1.0);
    }
}
