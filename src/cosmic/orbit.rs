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

use super::bodies::{gmst_rad, rot_z, OneAxisEllipsoid};
use super::{Frame, GeodeticPoint, EARTH_ANGULAR_VELOCITY_RAD_S, EARTH_MU_KM3_S2};
use crate::utils::between_0_360;
use hifitime::{Duration, Epoch, Unit};
use nalgebra::Vector3;
use std::f64::consts::PI;
use std::fmt;

/// If an orbit has an eccentricity below the following value, it is considered circular
pub const ECC_EPSILON: f64 = 1e-11;

/// Orbit defines an orbital state
///
/// Unless noted otherwise, algorithms are from GMAT 2016a StateConversionUtil.
/// Regardless of the constructor used, this struct stores all the state
/// information in Cartesian coordinates as these are always non singular.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    /// in km
    pub x_km: f64,
    /// in km
    pub y_km: f64,
    /// in km
    pub z_km: f64,
    /// in km/s
    pub vx_km_s: f64,
    /// in km/s
    pub vy_km_s: f64,
    /// in km/s
    pub vz_km_s: f64,
    pub epoch: Epoch,
    pub frame: Frame,
}

impl Orbit {
    /// Creates a new Orbit in the provided frame at the provided Epoch.
    ///
    /// **Units:** km, km, km, km/s, km/s, km/s
    #[allow(clippy::too_many_arguments)]
    pub fn cartesian(
        x_km: f64,
        y_km: f64,
        z_km: f64,
        vx_km_s: f64,
        vy_km_s: f64,
        vz_km_s: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        Self {
            x_km,
            y_km,
            z_km,
            vx_km_s,
            vy_km_s,
            vz_km_s,
            epoch,
            frame,
        }
    }

    /// Creates a new Orbit in EME2000 from the Keplerian orbital elements.
    ///
    /// **Units:** km, none, degrees, degrees, degrees, degrees
    ///
    /// WARNING: This function will panic on the singularities of the
    /// conversion (parabolic orbits). The state is stored in Cartesian
    /// coordinates as they are non-singular; expect rounding on the order of
    /// 1e-12 when reading the elements back.
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian(
        sma_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        assert!(
            frame.is_inertial(),
            "Keplerian elements are only defined in the inertial frame"
        );
        let ecc = if ecc < 0.0 {
            warn!("eccentricity cannot be negative: sign of eccentricity changed");
            -ecc
        } else {
            ecc
        };
        if (1.0 - ecc).abs() < f64::EPSILON {
            panic!("parabolic orbits have ill-defined Keplerian orbital elements");
        }
        // Algorithm from GMAT's StateConversionUtil::ComputeKeplToCart
        let inc = inc_deg.to_radians();
        let raan = raan_deg.to_radians();
        let aop = aop_deg.to_radians();
        let ta = ta_deg.to_radians();
        let p = sma_km * (1.0 - ecc.powi(2));
        if p.abs() < f64::EPSILON {
            panic!("semilatus rectum ~= 0.0: parabolic orbit");
        }
        let radius = p / (1.0 + ecc * ta.cos());
        let (sin_aop_ta, cos_aop_ta) = (aop + ta).sin_cos();
        let (sin_inc, cos_inc) = inc.sin_cos();
        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_aop, cos_aop) = aop.sin_cos();
        let x = radius * (cos_aop_ta * cos_raan - cos_inc * sin_aop_ta * sin_raan);
        let y = radius * (cos_aop_ta * sin_raan + cos_inc * sin_aop_ta * cos_raan);
        let z = radius * sin_aop_ta * sin_inc;
        let sqrt_gm_p = (EARTH_MU_KM3_S2 / p).sqrt();
        let cos_ta_ecc = ta.cos() + ecc;
        let sin_ta = ta.sin();

        let vx = sqrt_gm_p * cos_ta_ecc * (-sin_aop * cos_raan - cos_inc * sin_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * cos_raan - cos_inc * sin_raan * sin_aop);
        let vy = sqrt_gm_p * cos_ta_ecc * (-sin_aop * sin_raan + cos_inc * cos_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * sin_raan + cos_inc * cos_raan * sin_aop);
        let vz = sqrt_gm_p * (cos_ta_ecc * sin_inc * cos_aop - sin_ta * sin_inc * sin_aop);

        Self::cartesian(x, y, z, vx, vy, vz, epoch, frame)
    }

    /// Creates a new Orbit from the provided semi-major axis altitude in km
    /// above the provided ellipsoid's equatorial radius.
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian_altitude(
        sma_altitude_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
        earth: &OneAxisEllipsoid,
    ) -> Self {
        Self::keplerian(
            sma_altitude_km + earth.equatorial_radius_km,
            ecc,
            inc_deg,
            raan_deg,
            aop_deg,
            ta_deg,
            epoch,
            Frame::EME2000,
        )
    }

    /// Creates the Earth-fixed state of a geodetic point: zero ITRF velocity.
    pub fn from_geodesic(point: &GeodeticPoint, earth: &OneAxisEllipsoid, epoch: Epoch) -> Self {
        let r = earth.geodetic_to_itrf_km(point);
        Self::cartesian(r.x, r.y, r.z, 0.0, 0.0, 0.0, epoch, Frame::ITRF)
    }

    /// Returns the radius vector of this Orbit in [km, km, km]
    pub fn radius(&self) -> Vector3<f64> {
        Vector3::new(self.x_km, self.y_km, self.z_km)
    }

    /// Returns the velocity vector of this Orbit in [km/s, km/s, km/s]
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.vx_km_s, self.vy_km_s, self.vz_km_s)
    }

    /// Returns the magnitude of the radius vector in km
    pub fn rmag(&self) -> f64 {
        self.radius().norm()
    }

    /// Returns the magnitude of the velocity vector in km/s
    pub fn vmag(&self) -> f64 {
        self.velocity().norm()
    }

    /// Returns the unit vector in the direction of the state radius
    pub fn r_hat(&self) -> Vector3<f64> {
        self.radius() / self.rmag()
    }

    /// Returns the orbital momentum vector
    pub fn hvec(&self) -> Vector3<f64> {
        self.radius().cross(&self.velocity())
    }

    /// Returns the norm of the orbital momentum
    pub fn hmag(&self) -> f64 {
        self.hvec().norm()
    }

    /// Returns the specific mechanical energy in km^2/s^2
    pub fn energy(&self) -> f64 {
        self.assert_inertial("orbital energy");
        self.vmag().powi(2) / 2.0 - EARTH_MU_KM3_S2 / self.rmag()
    }

    /// Returns the semi-major axis in km
    pub fn sma(&self) -> f64 {
        -EARTH_MU_KM3_S2 / (2.0 * self.energy())
    }

    /// Returns the eccentricity vector (no unit)
    pub fn evec(&self) -> Vector3<f64> {
        self.assert_inertial("eccentricity");
        let r = self.radius();
        let v = self.velocity();
        ((v.norm().powi(2) - EARTH_MU_KM3_S2 / r.norm()) * r - (r.dot(&v)) * v) / EARTH_MU_KM3_S2
    }

    /// Returns the eccentricity (no unit)
    pub fn ecc(&self) -> f64 {
        self.evec().norm()
    }

    /// Returns the inclination in degrees
    pub fn inc(&self) -> f64 {
        self.assert_inertial("inclination");
        (self.hvec()[2] / self.hmag()).acos().to_degrees()
    }

    /// Returns the right ascension of the ascending node in degrees
    pub fn raan(&self) -> f64 {
        self.assert_inertial("RAAN");
        let n = Vector3::new(0.0, 0.0, 1.0).cross(&self.hvec());
        let cos_raan = n[0] / n.norm();
        let raan = cos_raan.acos();
        if raan.is_nan() {
            if cos_raan > 1.0 {
                180.0
            } else {
                0.0
            }
        } else if n[1] < 0.0 {
            (2.0 * PI - raan).to_degrees()
        } else {
            raan.to_degrees()
        }
    }

    /// Returns the argument of periapsis in degrees
    pub fn aop(&self) -> f64 {
        self.assert_inertial("argument of periapsis");
        let n = Vector3::new(0.0, 0.0, 1.0).cross(&self.hvec());
        let cos_aop = n.dot(&self.evec()) / (n.norm() * self.ecc());
        let aop = cos_aop.acos();
        if aop.is_nan() {
            if cos_aop > 1.0 {
                180.0
            } else {
                0.0
            }
        } else if self.evec()[2] < 0.0 {
            (2.0 * PI - aop).to_degrees()
        } else {
            aop.to_degrees()
        }
    }

    /// Returns the true anomaly in degrees between 0 and 360.0
    ///
    /// NOTE: The true anomaly is ill defined for a circular orbit; the value
    /// returned then hinges on rounding in the eccentricity vector.
    pub fn ta(&self) -> f64 {
        self.assert_inertial("true anomaly");
        if self.ecc() < ECC_EPSILON {
            warn!(
                "true anomaly ill-defined for circular orbit (e = {})",
                self.ecc()
            );
        }
        let cos_nu = self.evec().dot(&self.radius()) / (self.ecc() * self.rmag());
        let ta = cos_nu.acos();
        if ta.is_nan() {
            if cos_nu > 1.0 {
                180.0
            } else {
                0.0
            }
        } else if self.radius().dot(&self.velocity()) < 0.0 {
            (2.0 * PI - ta).to_degrees()
        } else {
            ta.to_degrees()
        }
    }

    /// Returns the eccentric anomaly in degrees
    ///
    /// This is a conversion from GMAT's StateConversionUtil::TrueToEccentricAnomaly
    pub fn ea(&self) -> f64 {
        let (sin_ta, cos_ta) = self.ta().to_radians().sin_cos();
        let ecc_cos_ta = self.ecc() * cos_ta;
        let sin_ea = ((1.0 - self.ecc().powi(2)).sqrt() * sin_ta) / (1.0 + ecc_cos_ta);
        let cos_ea = (self.ecc() + cos_ta) / (1.0 + ecc_cos_ta);
        sin_ea.atan2(cos_ea).to_degrees()
    }

    /// Returns the mean anomaly in degrees
    ///
    /// This is a conversion from GMAT's StateConversionUtil::TrueToMeanAnomaly
    pub fn ma(&self) -> f64 {
        between_0_360(
            (self.ea().to_radians() - self.ecc() * self.ea().to_radians().sin()).to_degrees(),
        )
    }

    /// Returns the period of this orbit
    pub fn period(&self) -> Duration {
        2.0 * PI * (self.sma().powi(3) / EARTH_MU_KM3_S2).sqrt() * Unit::Second
    }

    /// Returns this state rotated into EME2000.
    ///
    /// The velocity picks up the frame transport term ω × r when leaving the
    /// rotating frame.
    pub fn to_eme2000(&self) -> Self {
        match self.frame {
            Frame::EME2000 => *self,
            Frame::ITRF => {
                let dcm = rot_z(gmst_rad(self.epoch));
                let r = dcm * self.radius();
                let omega = Vector3::new(0.0, 0.0, EARTH_ANGULAR_VELOCITY_RAD_S);
                let v = dcm * self.velocity() + omega.cross(&r);
                Self::cartesian(r.x, r.y, r.z, v.x, v.y, v.z, self.epoch, Frame::EME2000)
            }
        }
    }

    /// Returns this state rotated into the Earth-fixed frame.
    pub fn to_itrf(&self) -> Self {
        match self.frame {
            Frame::ITRF => *self,
            Frame::EME2000 => {
                let dcm = rot_z(-gmst_rad(self.epoch));
                let omega = Vector3::new(0.0, 0.0, EARTH_ANGULAR_VELOCITY_RAD_S);
                let r = dcm * self.radius();
                let v = dcm * (self.velocity() - omega.cross(&self.radius()));
                Self::cartesian(r.x, r.y, r.z, v.x, v.y, v.z, self.epoch, Frame::ITRF)
            }
        }
    }

    fn assert_inertial(&self, what: &str) {
        assert!(
            self.frame.is_inertial(),
            "{what} is not defined in the {} frame",
            self.frame
        );
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} position = [{:.3}, {:.3}, {:.3}] km, velocity = [{:.6}, {:.6}, {:.6}] km/s",
            self.frame,
            self.epoch,
            self.x_km,
            self.y_km,
            self.z_km,
            self.vx_km_s,
            self.vy_km_s,
            self.vz_km_s
        )
    }
}
