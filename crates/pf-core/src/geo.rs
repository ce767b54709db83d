//! Node coordinates.
//!
//! Only used to derive a link's physical length when the network source
//! gives endpoints but no length.

/// WGS-84 latitude and longitude in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

const EARTH_RADIUS_M: f64 = 6_371_008.8;

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// This point moved by the given number of degrees.
    #[inline]
    pub fn offset(self, d_lat: f32, d_lon: f32) -> Self {
        Self { lat: self.lat + d_lat, lon: self.lon + d_lon }
    }

    /// Great-circle distance in metres (haversine, evaluated in `f64`).
    pub fn distance_m(self, other: GeoPoint) -> f32 {
        let (phi1, phi2) = ((self.lat as f64).to_radians(), (other.lat as f64).to_radians());
        let half_dphi = (phi2 - phi1) / 2.0;
        let half_dlambda = ((other.lon - self.lon) as f64).to_radians() / 2.0;

        let h = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
        (2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()) as f32
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}
