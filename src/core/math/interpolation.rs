use nalgebra::{Point2, Vector3};

/// Calculates the screen-space barycentric coordinates (alpha, beta, gamma) of
/// point `p` with respect to triangle (v1, v2, v3) from signed-area ratios.
///
/// No degeneracy check is made: a zero-area triangle yields NaN or infinite
/// weights, which callers reject with [`is_finite_barycentric`].
///
/// # Returns
/// A Vector3 where:
/// - x: alpha (weight for v1)
/// - y: beta  (weight for v2)
/// - z: gamma (weight for v3)
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Vector3<f32> {
    let a_minus_b = v1 - v2;
    let b_minus_c = v2 - v3;
    let c_minus_a = v3 - v1;

    let alpha = ((p.x - v2.x) * b_minus_c.y - (p.y - v2.y) * b_minus_c.x)
        / (a_minus_b.x * b_minus_c.y - a_minus_b.y * b_minus_c.x);
    let beta = ((p.x - v3.x) * c_minus_a.y - (p.y - v3.y) * c_minus_a.x)
        / (b_minus_c.x * c_minus_a.y - b_minus_c.y * c_minus_a.x);
    let gamma = 1.0 - alpha - beta;

    Vector3::new(alpha, beta, gamma)
}

#[inline(always)]
pub fn is_finite_barycentric(bary: &Vector3<f32>) -> bool {
    bary.x.is_finite() && bary.y.is_finite() && bary.z.is_finite()
}

/// Point-in-triangle test by edge cross products.
///
/// For every edge the z-component of `(v_i - p) x (v_i - v_{i+1})` is taken;
/// the point is inside when all three agree in sign (zero counts for both),
/// so either winding order is accepted.
#[inline]
pub fn is_inside_triangle(p: Point2<f32>, triangle: &[Point2<f32>; 3]) -> bool {
    let mut cross_z = [0.0f32; 3];
    for i in 0..3 {
        let to_vertex = triangle[i] - p;
        let edge = triangle[i] - triangle[(i + 1) % 3];
        cross_z[i] = to_vertex.x * edge.y - to_vertex.y * edge.x;
    }

    cross_z.iter().all(|&c| c >= 0.0) || cross_z.iter().all(|&c| c <= 0.0)
}

/// Converts screen-space barycentrics into perspective-correct (view-space)
/// barycentrics.
///
/// `w1..w3` are the clip-space w of each vertex, i.e. their view-space depth:
///   1 / z_view = alpha / w1 + beta / w2 + gamma / w3
///   alpha' = alpha * z_view / w1, ...
#[inline]
pub fn perspective_correct_barycentric(bary: &Vector3<f32>, w1: f32, w2: f32, w3: f32) -> Vector3<f32> {
    let z_view = 1.0 / (bary.x / w1 + bary.y / w2 + bary.z / w3);
    Vector3::new(
        bary.x * z_view / w1,
        bary.y * z_view / w2,
        bary.z * z_view / w3,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> [Point2<f32>; 3] {
        [
            Point2::new(10.0, 10.0),
            Point2::new(50.0, 10.0),
            Point2::new(30.0, 50.0),
        ]
    }

    #[test]
    fn test_barycentric_vertices() {
        let t = tri();
        let b = barycentric_coordinates(t[1], t[0], t[1], t[2]);
        assert!((b - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_barycentric_sums_to_one() {
        let t = tri();
        let b = barycentric_coordinates(Point2::new(31.0, 22.5), t[0], t[1], t[2]);
        assert!((b.x + b.y + b.z - 1.0).abs() < 1e-5);
        assert!(b.x > 0.0 && b.y > 0.0 && b.z > 0.0);
    }

    #[test]
    fn test_barycentric_degenerate_is_not_finite() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 1.0);
        let c = Point2::new(2.0, 2.0);
        let bary = barycentric_coordinates(Point2::new(0.5, 0.2), a, b, c);
        assert!(!is_finite_barycentric(&bary));
    }

    #[test]
    fn test_inside_either_winding() {
        let t = tri();
        let reversed = [t[2], t[1], t[0]];
        let p = Point2::new(30.5, 20.5);
        assert!(is_inside_triangle(p, &t));
        assert!(is_inside_triangle(p, &reversed));
        assert!(!is_inside_triangle(Point2::new(0.5, 0.5), &t));
    }

    #[test]
    fn test_inside_on_edge() {
        let t = tri();
        assert!(is_inside_triangle(Point2::new(30.0, 10.0), &t));
    }

    #[test]
    fn test_perspective_correction_equal_w_is_identity() {
        let b = Vector3::new(0.2, 0.3, 0.5);
        let c = perspective_correct_barycentric(&b, 4.0, 4.0, 4.0);
        assert!((b - c).norm() < 1e-6);
    }

    #[test]
    fn test_perspective_correction_favours_near_vertex() {
        // Screen midpoint of an edge whose ends sit at depth 1 and 3 lies at a
        // quarter of the way in view space.
        let b = Vector3::new(0.5, 0.5, 0.0);
        let c = perspective_correct_barycentric(&b, 1.0, 3.0, 1.0);
        assert!((c.x - 0.75).abs() < 1e-5);
        assert!((c.y - 0.25).abs() < 1e-5);
    }
}
