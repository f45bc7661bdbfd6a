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

use crate::cosmic::Orbit;
use crate::propagators::{KeplerianPropagator, PropagationError};
use hifitime::{Epoch, Unit};
use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use std::fmt;

mod laws;
mod legs;

pub use self::laws::{NadirPointing, TargetGroundPointing};
pub use self::legs::{AttitudeLeg, ConstantSpinSlew, LegKind, LegProgram};

/// Time step of the finite difference used to estimate the spin of a law.
const SPIN_STEP_S: f64 = 0.5;

/// The orientation and spin of the satellite body frame relative to EME2000
/// at a given instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attitude {
    pub epoch: Epoch,
    /// Rotation taking EME2000 coordinates into body coordinates
    pub inertial_to_body: UnitQuaternion<f64>,
    /// Spin vector of the maneuver or law, in rad/s
    pub spin_rad_s: Vector3<f64>,
}

impl Attitude {
    /// The geodesic rotation angle between the orientations of two attitudes,
    /// in radians.
    pub fn separation_rad(&self, other: &Attitude) -> f64 {
        self.inertial_to_body.angle_to(&other.inertial_to_body)
    }

    /// The body boresight (-Z axis) expressed in EME2000.
    pub fn boresight_eme2000(&self) -> Vector3<f64> {
        self.inertial_to_body.inverse() * Vector3::new(0.0, 0.0, -1.0)
    }
}

impl fmt::Display for Attitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.inertial_to_body.as_ref();
        write!(
            f,
            "{} q = [{:.6} {:.6} {:.6} {:.6}] spin = {:.4} deg/s",
            self.epoch,
            q.w,
            q.i,
            q.j,
            q.k,
            self.spin_rad_s.norm().to_degrees()
        )
    }
}

/// An attitude law maps any orbital state to a body orientation.
///
/// Laws are valid at any time in theory; legs restrict them to an interval.
pub trait AttitudeLaw: fmt::Display + Send + Sync {
    /// The inertial-to-body rotation commanded at the provided orbital state.
    fn orientation(&self, orbit: &Orbit) -> UnitQuaternion<f64>;

    /// Evaluates the full attitude at the provided epoch, estimating the spin
    /// by finite difference of the commanded orientation.
    fn attitude(
        &self,
        propagator: &KeplerianPropagator,
        epoch: Epoch,
    ) -> Result<Attitude, PropagationError> {
        let q0 = self.orientation(&propagator.orbit_at(epoch)?);
        let q1 = self.orientation(&propagator.orbit_at(epoch + SPIN_STEP_S * Unit::Second)?);
        let spin_rad_s = (q1 * q0.inverse()).scaled_axis() / SPIN_STEP_S;
        Ok(Attitude {
            epoch,
            inertial_to_body: q0,
            spin_rad_s,
        })
    }
}

/// Builds the inertial-to-body rotation placing the body -Z axis (the sensor
/// boresight) on the provided pointing direction, with the body +X axis as
/// close as possible to the provided velocity.
///
/// This reproduces the axis mapping of the reference library's ground
/// pointing laws (boresight on MINUS_K, PLUS_I toward the velocity).
pub(crate) fn pointing_orientation(
    pointing_dir: &Vector3<f64>,
    velocity: &Vector3<f64>,
) -> UnitQuaternion<f64> {
    let z_body = -pointing_dir.normalize();
    let x_raw = velocity - velocity.dot(&z_body) * z_body;
    let x_body = if x_raw.norm() > 1e-9 {
        x_raw.normalize()
    } else {
        // Velocity along the boresight: any perpendicular completes the triad
        let helper = if z_body.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };
        (helper - helper.dot(&z_body) * z_body).normalize()
    };
    let y_body = z_body.cross(&x_body);
    let body_to_inertial = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
        x_body, y_body, z_body,
    ]));
    UnitQuaternion::from_rotation_matrix(&body_to_inertial).inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pointing_orientation_places_boresight() {
        let dir = Vector3::new(0.0, 0.0, -1.0);
        let vel = Vector3::new(7.5, 0.0, 0.0);
        let q = pointing_orientation(&dir, &vel);
        // The body -Z axis, mapped back to inertial, is the pointing direction
        let boresight = q.inverse() * Vector3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(boresight.dot(&dir), 1.0, max_relative = 1e-12);
        // The body +X axis is along the velocity
        let x_inertial = q.inverse() * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(
            x_inertial.dot(&vel.normalize()),
            1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn pointing_orientation_degenerate_velocity() {
        let dir = Vector3::new(1.0, 0.0, 0.0);
        // Velocity along the boresight direction does not break the triad
        let q = pointing_orientation(&dir, &Vector3::new(-3.0, 0.0, 0.0));
        let boresight = q.inverse() * Vector3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(boresight.dot(&dir), 1.0, max_relative = 1e-12);
    }
}
