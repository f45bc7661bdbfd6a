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

use super::{Attitude, AttitudeLaw};
use crate::md::timeline::DateInterval;
use crate::propagators::{KeplerianPropagator, PropagationError};
use hifitime::{Duration, Epoch};
use nalgebra::{UnitQuaternion, Vector3};
use std::fmt;
use std::sync::Arc;

/// A constant spin maneuver between two attitudes: fixed rotation axis,
/// fixed rate, boundary attitudes stored.
#[derive(Clone, Debug)]
pub struct ConstantSpinSlew {
    pub start: Attitude,
    pub end: Attitude,
}

impl ConstantSpinSlew {
    pub fn new(start: Attitude, end: Attitude) -> Self {
        debug_assert!(end.epoch > start.epoch, "a slew must move forward in time");
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end.epoch - self.start.epoch
    }

    /// The fixed rotation taking the start orientation onto the end one.
    fn delta(&self) -> UnitQuaternion<f64> {
        self.end.inertial_to_body * self.start.inertial_to_body.inverse()
    }

    /// Spin vector of the maneuver, in rad/s.
    pub fn spin_rad_s(&self) -> Vector3<f64> {
        self.delta().scaled_axis() / self.duration().to_seconds()
    }

    /// Orientation at the provided epoch, clamped to the maneuver interval.
    pub fn orientation_at(&self, epoch: Epoch) -> UnitQuaternion<f64> {
        let total = self.duration().to_seconds();
        let tau = ((epoch - self.start.epoch).to_seconds() / total).clamp(0.0, 1.0);
        self.delta().powf(tau) * self.start.inertial_to_body
    }

    /// Full attitude at the provided epoch.
    pub fn attitude_at(&self, epoch: Epoch) -> Attitude {
        Attitude {
            epoch,
            inertial_to_body: self.orientation_at(epoch),
            spin_rad_s: self.spin_rad_s(),
        }
    }
}

/// The nature of an attitude leg.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LegKind {
    NadirLaw,
    ObservationLaw,
    Slew,
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// What a leg flies: a law restricted to the leg interval, or a stored slew.
#[derive(Clone)]
pub enum LegProgram {
    Law(Arc<dyn AttitudeLaw>),
    Slew(ConstantSpinSlew),
}

/// A named time-bounded piece of the attitude program.
#[derive(Clone)]
pub struct AttitudeLeg {
    pub name: String,
    pub interval: DateInterval,
    pub kind: LegKind,
    pub program: LegProgram,
}

impl AttitudeLeg {
    /// A leg flying the provided law over the provided interval.
    pub fn from_law(
        name: impl Into<String>,
        interval: DateInterval,
        kind: LegKind,
        law: Arc<dyn AttitudeLaw>,
    ) -> Self {
        debug_assert!(kind != LegKind::Slew, "slew legs store their attitudes");
        Self {
            name: name.into(),
            interval,
            kind,
            program: LegProgram::Law(law),
        }
    }

    /// A slew leg between two attitudes; the interval comes from the
    /// boundary attitude epochs.
    pub fn from_slew(name: impl Into<String>, slew: ConstantSpinSlew) -> Self {
        let interval = DateInterval::new(slew.start.epoch, slew.end.epoch);
        Self {
            name: name.into(),
            interval,
            kind: LegKind::Slew,
            program: LegProgram::Slew(slew),
        }
    }

    pub fn start(&self) -> Epoch {
        self.interval.start()
    }

    pub fn end(&self) -> Epoch {
        self.interval.end()
    }

    pub fn duration(&self) -> Duration {
        self.interval.duration()
    }

    /// Attitude flown at the provided epoch.
    pub fn attitude_at(
        &self,
        propagator: &KeplerianPropagator,
        epoch: Epoch,
    ) -> Result<Attitude, PropagationError> {
        match &self.program {
            LegProgram::Law(law) => law.attitude(propagator, epoch),
            LegProgram::Slew(slew) => Ok(slew.attitude_at(epoch)),
        }
    }

    /// The attitudes at both ends of the leg: stored for slews, evaluated at
    /// the interval endpoints for laws.
    pub fn boundary_attitudes(
        &self,
        propagator: &KeplerianPropagator,
    ) -> Result<(Attitude, Attitude), PropagationError> {
        match &self.program {
            LegProgram::Slew(slew) => Ok((slew.start, slew.end)),
            LegProgram::Law(law) => Ok((
                law.attitude(propagator, self.interval.start())?,
                law.attitude(propagator, self.interval.end())?,
            )),
        }
    }
}

impl fmt::Display for AttitudeLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.name, self.kind, self.interval)
    }
}

impl fmt::Debug for AttitudeLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::Unit;
    use std::f64::consts::FRAC_PI_2;

    fn attitude(epoch: Epoch, q: UnitQuaternion<f64>) -> Attitude {
        Attitude {
            epoch,
            inertial_to_body: q,
            spin_rad_s: Vector3::zeros(),
        }
    }

    #[test]
    fn constant_spin_slew_halves_the_angle_at_midpoint() {
        let t0 = Epoch::from_gregorian_utc(2024, 6, 21, 0, 0, 0, 0);
        let t1 = t0 + 30.0 * Unit::Second;
        let q0 = UnitQuaternion::identity();
        let q1 = UnitQuaternion::from_scaled_axis(Vector3::new(0.0, FRAC_PI_2, 0.0));
        let slew = ConstantSpinSlew::new(attitude(t0, q0), attitude(t1, q1));

        let mid = slew.orientation_at(t0 + 15.0 * Unit::Second);
        assert_relative_eq!(mid.angle_to(&q0), FRAC_PI_2 / 2.0, max_relative = 1e-9);
        assert_relative_eq!(mid.angle_to(&q1), FRAC_PI_2 / 2.0, max_relative = 1e-9);

        // Endpoints are honored and queries clamp to the interval
        assert_relative_eq!(slew.orientation_at(t1).angle_to(&q1), 0.0, epsilon = 1e-6);
        assert_relative_eq!(
            slew.orientation_at(t1 + 5.0 * Unit::Second).angle_to(&q1),
            0.0,
            epsilon = 1e-6
        );

        // The spin rate is the total angle over the total duration
        assert_relative_eq!(
            slew.spin_rad_s().norm(),
            FRAC_PI_2 / 30.0,
            max_relative = 1e-12
        );
    }
}
