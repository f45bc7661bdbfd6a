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

use super::Orbit;
use crate::attitude::Attitude;
use hifitime::{Duration, Unit};
use std::fmt;

/// The mission satellite: initial orbit, sensor aperture and agility model.
///
/// The agility model turns an angular separation into the wall-clock duration
/// of the corresponding rest-to-rest slew, following a bounded rate profile:
/// spin up at the maximum angular acceleration, optionally cruise at the
/// maximum spin rate, spin down.
#[derive(Clone, Debug)]
pub struct Satellite {
    pub name: String,
    pub initial_orbit: Orbit,
    /// Sensor half-aperture, i.e. the maximum allowed depointing from nadir,
    /// in degrees
    pub pointing_capacity_deg: f64,
    /// Maximum spin rate, in rad/s
    pub max_spin_rate_rad_s: f64,
    /// Maximum angular acceleration, in rad/s^2
    pub max_spin_acceleration_rad_s2: f64,
}

impl Satellite {
    pub fn new(
        name: &str,
        initial_orbit: Orbit,
        pointing_capacity_deg: f64,
        max_spin_rate_rad_s: f64,
        max_spin_acceleration_rad_s2: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            initial_orbit,
            pointing_capacity_deg,
            max_spin_rate_rad_s,
            max_spin_acceleration_rad_s2,
        }
    }

    /// Duration of a rest-to-rest slew through the provided angular
    /// separation, in radians.
    ///
    /// Below `ω²/α` the profile is triangular (the maximum rate is never
    /// reached); above, it is trapezoidal with a constant-rate cruise. The
    /// result is zero at zero separation and monotone nondecreasing.
    pub fn slew_duration(&self, separation_rad: f64) -> Duration {
        let theta = separation_rad.abs();
        let omega = self.max_spin_rate_rad_s;
        let alpha = self.max_spin_acceleration_rad_s2;
        let seconds = if theta <= omega.powi(2) / alpha {
            2.0 * (theta / alpha).sqrt()
        } else {
            omega / alpha + theta / omega
        };
        seconds * Unit::Second
    }

    /// Duration of the slew between two attitudes, from the geodesic rotation
    /// angle separating their orientations.
    pub fn slew_duration_between(&self, from: &Attitude, to: &Attitude) -> Duration {
        self.slew_duration(from.separation_rad(to))
    }

    /// Worst-case slew: rest-to-rest across the full sensor field of regard,
    /// i.e. twice the pointing capacity.
    pub fn max_slew_duration(&self) -> Duration {
        self.slew_duration(2.0 * self.pointing_capacity_deg.to_radians())
    }
}

impl fmt::Display for Satellite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (capacity {:.1} deg, max rate {:.3} deg/s, max accel {:.3} deg/s^2)",
            self.name,
            self.pointing_capacity_deg,
            self.max_spin_rate_rad_s.to_degrees(),
            self.max_spin_acceleration_rad_s2.to_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::{Frame, EARTH_EQUATORIAL_RADIUS_KM};
    use approx::assert_relative_eq;
    use hifitime::Epoch;

    fn test_sat() -> Satellite {
        let epoch = Epoch::from_gregorian_utc(2024, 6, 21, 0, 0, 0, 0);
        let orbit = Orbit::keplerian(
            EARTH_EQUATORIAL_RADIUS_KM + 694.0,
            1e-4,
            98.2,
            90.0,
            0.0,
            0.0,
            epoch,
            Frame::EME2000,
        );
        Satellite::new(
            "Argus 1",
            orbit,
            30.0,
            2.0_f64.to_radians(),
            1.0_f64.to_radians(),
        )
    }

    #[test]
    fn slew_of_zero_separation_is_zero() {
        assert_eq!(test_sat().slew_duration(0.0), Duration::ZERO);
    }

    #[test]
    fn slew_duration_is_monotone() {
        let sat = test_sat();
        let mut prev = Duration::ZERO;
        for i in 1..=360 {
            let theta = (i as f64).to_radians();
            let d = sat.slew_duration(theta);
            assert!(d >= prev, "slew duration not monotone at {i} deg");
            prev = d;
        }
    }

    #[test]
    fn profile_is_continuous_at_the_cruise_boundary() {
        let sat = test_sat();
        let omega = sat.max_spin_rate_rad_s;
        let alpha = sat.max_spin_acceleration_rad_s2;
        let boundary = omega.powi(2) / alpha;
        let triangular = sat.slew_duration(boundary - 1e-9);
        let trapezoidal = sat.slew_duration(boundary + 1e-9);
        assert_relative_eq!(
            triangular.to_seconds(),
            trapezoidal.to_seconds(),
            max_relative = 1e-6
        );
        // At the boundary, both expressions evaluate to 2 ω / α
        assert_relative_eq!(
            sat.slew_duration(boundary).to_seconds(),
            2.0 * omega / alpha,
            max_relative = 1e-12
        );
    }

    #[test]
    fn max_slew_spans_the_field_of_regard() {
        let sat = test_sat();
        assert_eq!(
            sat.max_slew_duration(),
            sat.slew_duration(2.0 * sat.pointing_capacity_deg.to_radians())
        );
        // 60 deg at 2 deg/s max rate with 1 deg/s^2 acceleration: 2 s of
        // ramps plus 30 s of cruise
        assert_relative_eq!(
            sat.max_slew_duration().to_seconds(),
            32.0,
            max_relative = 1e-12
        );
    }
}
