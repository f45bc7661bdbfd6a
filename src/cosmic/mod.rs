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

use serde_derive::{Deserialize, Serialize};
use std::fmt;

pub mod bodies;
mod orbit;
mod satellite;

pub use self::bodies::{OneAxisEllipsoid, Sun};
pub use self::orbit::Orbit;
pub use self::satellite::Satellite;

/// WGS84 Earth equatorial radius, in km
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.137;

/// WGS84 Earth gravitational parameter, in km^3/s^2
pub const EARTH_MU_KM3_S2: f64 = 398_600.441_8;

/// WGS84 Earth flattening (no unit)
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Earth rotation rate, in rad/s
pub const EARTH_ANGULAR_VELOCITY_RAD_S: f64 = 7.292_115_146_706_979e-5;

/// Astronomical unit, in km
pub const AU_KM: f64 = 149_597_870.7;

/// The two reference frames of the mission context.
///
/// EME2000 is the inertial frame in which orbits and attitudes are expressed;
/// ITRF is the Earth-fixed frame carrying the ground sites. The rotation
/// between the two is the Greenwich mean sidereal angle about the Z axis
/// (precession and nutation are neglected, consistent with the spherical
/// Earth model used by the mission).
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    /// Earth mean equator and equinox of J2000, the mission inertial frame
    EME2000,
    /// International terrestrial reference frame, fixed to the rotating Earth
    ITRF,
}

impl Frame {
    pub fn is_inertial(&self) -> bool {
        matches!(self, Frame::EME2000)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A geodetic point on the Earth ellipsoid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    /// in degrees
    pub latitude_deg: f64,
    /// in degrees
    pub longitude_deg: f64,
    /// in km
    pub height_km: f64,
}

impl GeodeticPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_km: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            height_km,
        }
    }
}

impl fmt::Display for GeodeticPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(lat {:.4} deg, long {:.4} deg, h {:.3} km)",
            self.latitude_deg, self.longitude_deg, self.height_km
        )
    }
}
