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

use super::{pointing_orientation, AttitudeLaw};
use crate::cosmic::{GeodeticPoint, OneAxisEllipsoid, Orbit};
use nalgebra::UnitQuaternion;
use std::fmt;

/// The default law: sensor boresight on the sub-satellite point.
#[derive(Copy, Clone, Debug, Default)]
pub struct NadirPointing;

impl AttitudeLaw for NadirPointing {
    fn orientation(&self, orbit: &Orbit) -> UnitQuaternion<f64> {
        pointing_orientation(&(-orbit.r_hat()), &orbit.velocity())
    }
}

impl fmt::Display for NadirPointing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NadirPointing")
    }
}

/// Observation law: sensor boresight on a fixed ground target.
#[derive(Copy, Clone, Debug)]
pub struct TargetGroundPointing {
    pub earth: OneAxisEllipsoid,
    pub target: GeodeticPoint,
}

impl TargetGroundPointing {
    pub fn new(earth: OneAxisEllipsoid, target: GeodeticPoint) -> Self {
        Self { earth, target }
    }
}

impl AttitudeLaw for TargetGroundPointing {
    fn orientation(&self, orbit: &Orbit) -> UnitQuaternion<f64> {
        let target_eme = self.earth.geodetic_to_eme2000_km(&self.target, orbit.epoch);
        let pointing = target_eme - orbit.radius();
        pointing_orientation(&pointing, &orbit.velocity())
    }
}

impl fmt::Display for TargetGroundPointing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetGroundPointing{}", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::{Frame, EARTH_EQUATORIAL_RADIUS_KM};
    use crate::propagators::KeplerianPropagator;
    use approx::assert_relative_eq;
    use hifitime::Epoch;
    use std::sync::Arc;

    fn leo() -> Orbit {
        let epoch = Epoch::from_gregorian_utc(2024, 6, 21, 0, 0, 0, 0);
        Orbit::keplerian(
            EARTH_EQUATORIAL_RADIUS_KM + 694.0,
            1e-4,
            98.2,
            90.0,
            0.0,
            0.0,
            epoch,
            Frame::EME2000,
        )
    }

    #[test]
    fn nadir_boresight_is_opposite_the_radius() {
        let orbit = leo();
        let q = NadirPointing.orientation(&orbit);
        let boresight = q.inverse() * nalgebra::Vector3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(boresight.dot(&(-orbit.r_hat())), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn nadir_spin_matches_the_orbit_rate() {
        let orbit = leo();
        let prop = KeplerianPropagator::new(orbit, Arc::new(NadirPointing)).unwrap();
        let att = NadirPointing.attitude(&prop, orbit.epoch).unwrap();
        let orbit_rate = std::f64::consts::TAU / orbit.period().to_seconds();
        assert_relative_eq!(att.spin_rad_s.norm(), orbit_rate, max_relative = 1e-3);
    }

    #[test]
    fn target_pointing_from_zenith_matches_nadir_direction() {
        let orbit = leo();
        // Build a target at the sub-satellite point: the commanded boresight
        // then coincides with the nadir direction.
        let earth = OneAxisEllipsoid::new(EARTH_EQUATORIAL_RADIUS_KM, 0.0);
        let sub_sat = orbit.to_itrf();
        let lat = (sub_sat.z_km / sub_sat.rmag()).asin().to_degrees();
        let lon = sub_sat.y_km.atan2(sub_sat.x_km).to_degrees();
        let law = TargetGroundPointing::new(earth, GeodeticPoint::new(lat, lon, 0.0));
        let q_target = law.orientation(&orbit);
        let q_nadir = NadirPointing.orientation(&orbit);
        assert_relative_eq!(q_target.angle_to(&q_nadir), 0.0, epsilon = 1e-6);
    }
}
