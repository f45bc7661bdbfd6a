/*
    Argus, attitude program planning for agile Earth observation
    Copyright (C) 2024 The Argus Developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{GeodeticPoint, AU_KM};
use crate::utils::between_0_tau;
use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

/// Julian date of the J2000 reference epoch.
const JD_J2000: f64 = 2_451_545.0;

/// Returns the Greenwich mean sidereal angle in radians at the provided epoch.
///
/// IAU 1982 series truncated to the terms that matter below the millisecond
/// of time; UT1 is approximated by UTC.
pub fn gmst_rad(epoch: Epoch) -> f64 {
    let jd = epoch.to_jde_utc_days();
    let d = jd - JD_J2000;
    let t = d / 36_525.0;
    let gmst_deg =
        280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t - t * t * t / 38_710_000.0;
    between_0_tau(gmst_deg.to_radians())
}

/// Rotation matrix about the Z axis by the provided angle in radians.
pub fn rot_z(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Rotates an Earth-fixed position into EME2000 at the provided epoch.
pub fn itrf_to_eme2000(r_itrf_km: &Vector3<f64>, epoch: Epoch) -> Vector3<f64> {
    rot_z(gmst_rad(epoch)) * r_itrf_km
}

/// Rotates an EME2000 position into the Earth-fixed frame at the provided epoch.
pub fn eme2000_to_itrf(r_eme_km: &Vector3<f64>, epoch: Epoch) -> Vector3<f64> {
    rot_z(-gmst_rad(epoch)) * r_eme_km
}

/// Low-precision analytic Sun ephemeris.
///
/// Accurate to roughly 0.01 deg in ecliptic longitude over a few decades
/// around J2000, which is ample for illumination and glare geometry.
pub struct Sun;

impl Sun {
    /// Sun position in EME2000, in km, at the provided epoch.
    pub fn position_eme2000_km(epoch: Epoch) -> Vector3<f64> {
        let d = epoch.to_jde_utc_days() - JD_J2000;
        // Mean longitude and mean anomaly of the Sun, in degrees
        let l = (280.460 + 0.985_647_4 * d) % 360.0;
        let g = ((357.528 + 0.985_600_3 * d) % 360.0).to_radians();
        // Ecliptic longitude with the two dominant equation-of-center terms
        let lambda = (l + 1.915 * g.sin() + 0.020 * (2.0 * g).sin()).to_radians();
        // Distance in astronomical units
        let r = 1.000_14 - 0.016_71 * g.cos() - 0.000_14 * (2.0 * g).cos();
        // Obliquity of the ecliptic
        let epsilon = (23.439 - 0.000_000_4 * d).to_radians();

        let x = r * lambda.cos();
        let y = r * lambda.sin() * epsilon.cos();
        let z = r * lambda.sin() * epsilon.sin();

        Vector3::new(x * AU_KM, y * AU_KM, z * AU_KM)
    }

    /// Unit vector from the Earth center toward the Sun in EME2000.
    pub fn direction_eme2000(epoch: Epoch) -> Vector3<f64> {
        Self::position_eme2000_km(epoch).normalize()
    }
}

/// One-axis ellipsoid Earth model: equatorial radius and flattening.
///
/// The mission uses a spherical Earth (flattening 0), but the geodetic
/// machinery supports a flattened geoid so that WGS84 site coordinates can be
/// used unchanged.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OneAxisEllipsoid {
    /// in km
    pub equatorial_radius_km: f64,
    /// no unit
    pub flattening: f64,
}

impl OneAxisEllipsoid {
    pub fn new(equatorial_radius_km: f64, flattening: f64) -> Self {
        Self {
            equatorial_radius_km,
            flattening,
        }
    }

    /// Earth-fixed position of a geodetic point, in km.
    ///
    /// Reference: G. Xu and Y. Xu, "GPS", DOI 10.1007/978-3-662-50367-6_2,
    /// 2016, page 144.
    pub fn geodetic_to_itrf_km(&self, point: &GeodeticPoint) -> Vector3<f64> {
        let e2 = 2.0 * self.flattening - self.flattening.powi(2);
        let (sin_long, cos_long) = point.longitude_deg.to_radians().sin_cos();
        let (sin_lat, cos_lat) = point.latitude_deg.to_radians().sin_cos();
        let c_body = self.equatorial_radius_km / (1.0 - e2 * sin_lat.powi(2)).sqrt();
        let s_body = (self.equatorial_radius_km * (1.0 - self.flattening).powi(2))
            / (1.0 - e2 * sin_lat.powi(2)).sqrt();
        let ri = (c_body + point.height_km) * cos_lat * cos_long;
        let rj = (c_body + point.height_km) * cos_lat * sin_long;
        let rk = (s_body + point.height_km) * sin_lat;
        Vector3::new(ri, rj, rk)
    }

    /// EME2000 position of a geodetic point at the provided epoch, in km.
    pub fn geodetic_to_eme2000_km(&self, point: &GeodeticPoint, epoch: Epoch) -> Vector3<f64> {
        itrf_to_eme2000(&self.geodetic_to_itrf_km(point), epoch)
    }

    /// Returns whether the line of sight between the two provided positions
    /// (same frame, in km) is clear of this body, modeled as a sphere of the
    /// equatorial radius centered at the origin.
    ///
    /// Source: Algorithm 35 of Vallado, 4th edition, page 308.
    pub fn line_of_sight(&self, observed_km: &Vector3<f64>, observer_km: &Vector3<f64>) -> bool {
        if observed_km == observer_km {
            return true;
        }

        let r1sq = observed_km.dot(observed_km);
        let r2sq = observer_km.dot(observer_km);
        let r1dotr2 = observed_km.dot(observer_km);

        let tau = (r1sq - r1dotr2) / (r1sq + r2sq - 2.0 * r1dotr2);
        !(0.0..=1.0).contains(&tau)
            || (1.0 - tau) * r1sq + r1dotr2 * tau > self.equatorial_radius_km.powi(2)
    }
}
