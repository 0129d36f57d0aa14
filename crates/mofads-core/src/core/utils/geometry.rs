use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

const PARALLEL_TOLERANCE: f64 = 1e-6;

/// The shape of a set of points, as seen from the spread around their centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointCloudShape {
    /// All points lie (within tolerance) on a single position.
    Point,
    /// All points lie on a line with the given unit direction.
    Linear(Vector3<f64>),
    /// All points lie in a plane with the given unit normal.
    Planar(Vector3<f64>),
    /// The points span all three dimensions.
    Volumetric,
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Returns a unit vector orthogonal to `direction`.
///
/// The axis is `direction × ẑ`; when `direction` is parallel to ẑ the x axis is used
/// instead, giving `direction × x̂`. `direction` must be a unit vector.
pub fn orthogonal_axis(direction: &Vector3<f64>) -> Vector3<f64> {
    let candidate = direction.cross(&Vector3::z());
    if candidate.norm() > PARALLEL_TOLERANCE {
        candidate.normalize()
    } else {
        direction.cross(&Vector3::x()).normalize()
    }
}

/// Flips `v` so that its first significant component (z, then x, then y) is positive.
pub fn canonical_sign(v: Vector3<f64>) -> Vector3<f64> {
    for component in [v.z, v.x, v.y] {
        if component.abs() > PARALLEL_TOLERANCE {
            return if component < 0.0 { -v } else { v };
        }
    }
    v
}

/// Classifies the spread of `points` around their centroid.
///
/// The classification uses the eigenvalues of the covariance matrix: an eigenvalue below
/// `tolerance` times the largest one counts as a flat dimension.
pub fn classify_shape(points: &[Point3<f64>], tolerance: f64) -> PointCloudShape {
    let Some(center) = centroid(points) else {
        return PointCloudShape::Point;
    };

    let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p - center;
        acc + d * d.transpose()
    }) / points.len() as f64;

    let eigen = SymmetricEigen::new(covariance);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let smallest = eigen.eigenvalues[order[0]].max(0.0);
    let middle = eigen.eigenvalues[order[1]].max(0.0);
    let largest = eigen.eigenvalues[order[2]].max(0.0);

    if largest <= f64::EPSILON {
        return PointCloudShape::Point;
    }
    let threshold = tolerance * largest;
    let column = |i: usize| -> Vector3<f64> { eigen.eigenvectors.column(i).into_owned().normalize() };

    if middle <= threshold {
        PointCloudShape::Linear(column(order[2]))
    } else if smallest <= threshold {
        PointCloudShape::Planar(column(order[0]))
    } else {
        PointCloudShape::Volumetric
    }
}

pub fn is_finite_point(p: &Point3<f64>) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

pub fn is_finite_vector(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}
