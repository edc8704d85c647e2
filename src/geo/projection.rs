//! Geographic to Cartesian projection onto the globe sphere

use glam::Vec3;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f32,
    pub lng: f32,
}

impl GeoPoint {
    pub const fn new(lat: f32, lng: f32) -> Self {
        Self { lat, lng }
    }

    /// Project onto a sphere of the given radius.
    #[inline]
    pub fn to_vec3(self, radius: f32) -> Vec3 {
        lat_lng_to_vec3(self.lat, self.lng, radius)
    }
}

/// Convert latitude/longitude (degrees) to a point on a sphere centred at the origin.
///
/// The north pole maps to `(0, radius, 0)`. `(0, 0)` maps to `(radius, 0, 0)` and
/// longitude increases toward `-z`. Out-of-range input is not an error, it just
/// lands somewhere on the sphere.
#[inline]
pub fn lat_lng_to_vec3(lat: f32, lng: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lng + 180.0).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn projected_points_lie_on_sphere() {
        for radius in [1.0_f32, 1.01, 2.5] {
            for lat in (-90..=90).step_by(15) {
                for lng in (-180..=180).step_by(20) {
                    let p = lat_lng_to_vec3(lat as f32, lng as f32, radius);
                    assert!(
                        (p.length() - radius).abs() < EPS,
                        "({lat}, {lng}) at r={radius} has length {}",
                        p.length()
                    );
                }
            }
        }
    }

    #[test]
    fn north_pole_is_up_for_any_longitude() {
        for lng in [-180.0_f32, -97.3, 0.0, 45.0, 179.9] {
            let p = lat_lng_to_vec3(90.0, lng, 2.0);
            assert!(p.x.abs() < EPS);
            assert!((p.y - 2.0).abs() < EPS);
            assert!(p.z.abs() < EPS);
        }
    }

    #[test]
    fn south_pole_is_down() {
        let p = GeoPoint::new(-90.0, 12.0).to_vec3(1.0);
        assert!((p.y + 1.0).abs() < EPS);
    }

    #[test]
    fn null_island_is_on_positive_x() {
        let p = lat_lng_to_vec3(0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn east_is_negative_z() {
        let p = lat_lng_to_vec3(0.0, 90.0, 1.0);
        assert!(p.x.abs() < EPS);
        assert!((p.z + 1.0).abs() < EPS);
    }

    #[test]
    fn out_of_range_input_stays_finite() {
        let p = lat_lng_to_vec3(135.0, 400.0, 1.0);
        assert!(p.is_finite());
        assert!((p.length() - 1.0).abs() < EPS);
    }
}
