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

use super::{
    BackwardsPropagationSnafu, EphemerisNotGeneratedSnafu, OutsideEphemerisSnafu,
    PropagationError, UnsupportedOrbitSnafu, MAX_CHECK_S, THRESHOLD_EVENTS_S,
};
use crate::attitude::{Attitude, AttitudeLaw};
use crate::cosmic::{Orbit, EARTH_MU_KM3_S2};
use crate::md::events::{CodedEvent, CodedEventsLogger, CodingEventDetector};
use crate::md::timeline::DateInterval;
use crate::utils::between_0_tau;
use hifitime::{Epoch, Unit};
use snafu::prelude::*;
use std::sync::Arc;

/// Convergence tolerance of the Kepler equation solver, in radians.
const KEPLER_TOL_RAD: f64 = 1e-12;
/// Maximum iterations of the Kepler equation solver.
const KEPLER_MAX_ITER: usize = 50;

/// Mean Keplerian elements frozen at the initial state, so that the analytic
/// advance does not re-derive them at every queried epoch.
#[derive(Copy, Clone, Debug)]
struct MeanElements {
    sma_km: f64,
    ecc: f64,
    inc_deg: f64,
    raan_deg: f64,
    aop_deg: f64,
    ma0_rad: f64,
    mean_motion_rad_s: f64,
}

/// Analytical two-body propagator carrying an attitude law and coded event
/// detectors.
///
/// Propagation is exact for the two-body problem: the state at any epoch
/// comes from advancing the mean anomaly and solving the Kepler equation, so
/// there is no integration error to control. `propagate` runs the event
/// detection sweep: every registered detector is sampled on the checking
/// grid, each sign change is refined by bisection down to the convergence
/// threshold, and the corresponding coded events are recorded by one logger
/// per detector ("continue" semantics: detection never stops propagation).
pub struct KeplerianPropagator {
    pub initial_orbit: Orbit,
    attitude_law: Arc<dyn AttitudeLaw>,
    detectors: Vec<CodingEventDetector>,
    elements: MeanElements,
    ephemeris_mode: bool,
    propagated: Option<DateInterval>,
}

impl KeplerianPropagator {
    /// Builds a propagator from an initial inertial state and an attitude law.
    pub fn new(
        initial_orbit: Orbit,
        attitude_law: Arc<dyn AttitudeLaw>,
    ) -> Result<Self, PropagationError> {
        let ecc = initial_orbit.ecc();
        ensure!(ecc < 1.0, UnsupportedOrbitSnafu { ecc });
        let sma_km = initial_orbit.sma();
        let elements = MeanElements {
            sma_km,
            ecc,
            inc_deg: initial_orbit.inc(),
            raan_deg: initial_orbit.raan(),
            aop_deg: initial_orbit.aop(),
            ma0_rad: initial_orbit.ma().to_radians(),
            mean_motion_rad_s: (EARTH_MU_KM3_S2 / sma_km.powi(3)).sqrt(),
        };
        Ok(Self {
            initial_orbit,
            attitude_law,
            detectors: Vec::new(),
            elements,
            ephemeris_mode: false,
            propagated: None,
        })
    }

    pub fn attitude_law(&self) -> &Arc<dyn AttitudeLaw> {
        &self.attitude_law
    }

    /// Registers a coded event detector for the next propagation.
    pub fn add_event_detector(&mut self, detector: CodingEventDetector) {
        self.detectors.push(detector);
    }

    /// Requests the generation of a bounded ephemeris on the next propagation.
    pub fn set_ephemeris_mode(&mut self) {
        self.ephemeris_mode = true;
    }

    /// The exact two-body state at the provided epoch.
    pub fn orbit_at(&self, epoch: Epoch) -> Result<Orbit, PropagationError> {
        let el = &self.elements;
        let dt_s = (epoch - self.initial_orbit.epoch).to_seconds();
        let mean_anomaly = between_0_tau(el.ma0_rad + el.mean_motion_rad_s * dt_s);
        let ecc_anomaly = solve_kepler(mean_anomaly, el.ecc)?;
        let ta_rad = 2.0
            * ((1.0 + el.ecc).sqrt() * (ecc_anomaly / 2.0).sin())
                .atan2((1.0 - el.ecc).sqrt() * (ecc_anomaly / 2.0).cos());
        Ok(Orbit::keplerian(
            el.sma_km,
            el.ecc,
            el.inc_deg,
            el.raan_deg,
            el.aop_deg,
            ta_rad.to_degrees(),
            epoch,
            self.initial_orbit.frame,
        ))
    }

    /// The attitude commanded by the attached law at the provided epoch.
    pub fn attitude_at(&self, epoch: Epoch) -> Result<Attitude, PropagationError> {
        self.attitude_law.attitude(self, epoch)
    }

    /// Propagates from the initial state until the provided epoch, driving
    /// all registered detectors, and returns one event logger per detector in
    /// registration order.
    pub fn propagate(
        &mut self,
        end: Epoch,
    ) -> Result<Vec<CodedEventsLogger>, PropagationError> {
        let start = self.initial_orbit.epoch;
        ensure!(end >= start, BackwardsPropagationSnafu { epoch: end });

        let mut loggers: Vec<CodedEventsLogger> = self
            .detectors
            .iter()
            .map(|d| CodedEventsLogger::new(d.code()))
            .collect();

        let initial = self.orbit_at(start)?;
        let mut prev_active: Vec<bool> = self
            .detectors
            .iter()
            .map(|d| d.is_active(&initial))
            .collect();
        for (logger, active) in loggers.iter_mut().zip(&prev_active) {
            logger.set_initially_active(*active);
        }

        let mut t = start;
        while t < end {
            let mut t_next = t + MAX_CHECK_S * Unit::Second;
            if t_next > end {
                t_next = end;
            }
            let orbit_next = self.orbit_at(t_next)?;
            for (idx, detector) in self.detectors.iter().enumerate() {
                let active = detector.is_active(&orbit_next);
                if active != prev_active[idx] {
                    let crossing = self.refine_crossing(detector, t, t_next, active)?;
                    trace!(
                        "{} {} at {crossing}",
                        if active { "start of" } else { "end of" },
                        detector.code()
                    );
                    loggers[idx].record(CodedEvent::new(detector.code(), crossing, active));
                    prev_active[idx] = active;
                }
            }
            t = t_next;
        }

        self.propagated = Some(DateInterval::new(start, end));
        Ok(loggers)
    }

    /// Bisects the sign change of a detector between two check epochs down to
    /// the convergence threshold, returning the first epoch on the new side.
    fn refine_crossing(
        &self,
        detector: &CodingEventDetector,
        mut lo: Epoch,
        mut hi: Epoch,
        active_hi: bool,
    ) -> Result<Epoch, PropagationError> {
        while (hi - lo).to_seconds() > THRESHOLD_EVENTS_S {
            let mid = lo + (hi - lo) * 0.5;
            if detector.is_active(&self.orbit_at(mid)?) == active_hi {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(hi)
    }

    /// The ephemeris generated by the last propagation.
    pub fn generated_ephemeris(&self) -> Result<BoundedEphemeris, PropagationError> {
        ensure!(self.ephemeris_mode, EphemerisNotGeneratedSnafu);
        let interval = self.propagated.context(EphemerisNotGeneratedSnafu)?;
        Ok(BoundedEphemeris {
            propagator: Self::new(self.initial_orbit, self.attitude_law.clone())?,
            interval,
        })
    }
}

/// A propagation replay bounded to the propagated interval.
///
/// Since the two-body advance is analytic, the ephemeris does not store
/// samples: it re-evaluates the exact state, and only enforces the validity
/// bounds expected from a generated ephemeris.
pub struct BoundedEphemeris {
    propagator: KeplerianPropagator,
    interval: DateInterval,
}

impl BoundedEphemeris {
    pub fn interval(&self) -> DateInterval {
        self.interval
    }

    pub fn orbit_at(&self, epoch: Epoch) -> Result<Orbit, PropagationError> {
        ensure!(
            self.interval.contains_epoch(epoch),
            OutsideEphemerisSnafu {
                epoch,
                start: self.interval.start(),
                end: self.interval.end(),
            }
        );
        self.propagator.orbit_at(epoch)
    }

    pub fn attitude_at(&self, epoch: Epoch) -> Result<Attitude, PropagationError> {
        ensure!(
            self.interval.contains_epoch(epoch),
            OutsideEphemerisSnafu {
                epoch,
                start: self.interval.start(),
                end: self.interval.end(),
            }
        );
        self.propagator.attitude_at(epoch)
    }
}

/// Newton iteration on the Kepler equation E - e sin E = M.
fn solve_kepler(mean_anomaly_rad: f64, ecc: f64) -> Result<f64, PropagationError> {
    let mut ecc_anomaly = if ecc < 0.8 {
        mean_anomaly_rad
    } else {
        std::f64::consts::PI
    };
    for _ in 0..KEPLER_MAX_ITER {
        let delta = (ecc_anomaly - ecc * ecc_anomaly.sin() - mean_anomaly_rad)
            / (1.0 - ecc * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < KEPLER_TOL_RAD {
            return Ok(ecc_anomaly);
        }
    }
    Err(PropagationError::KeplerDivergence {
        iterations: KEPLER_MAX_ITER,
        mean_anomaly_rad,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attitude::NadirPointing;
    use crate::cosmic::{Frame, EARTH_EQUATORIAL_RADIUS_KM};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

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

    fn propagator() -> KeplerianPropagator {
        KeplerianPropagator::new(leo(), Arc::new(NadirPointing)).unwrap()
    }

    #[test]
    fn kepler_solver_honors_the_equation() {
        for &ecc in &[0.0, 1e-4, 0.1, 0.7, 0.95] {
            for i in 0..12 {
                let m = i as f64 * 0.5;
                let e = solve_kepler(m, ecc).unwrap();
                assert_abs_diff_eq!(e - ecc * e.sin(), m, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn state_at_initial_epoch_matches() {
        let prop = propagator();
        let orbit = prop.orbit_at(leo().epoch).unwrap();
        assert_relative_eq!(orbit.rmag(), leo().rmag(), max_relative = 1e-9);
        // Element extraction for a near-circular orbit costs a few meters of
        // reconstruction offset
        assert_abs_diff_eq!(
            (orbit.radius() - leo().radius()).norm(),
            0.0,
            epsilon = 1e-2
        );
    }

    #[test]
    fn one_period_closes_the_orbit() {
        let prop = propagator();
        let initial = leo();
        let after = prop.orbit_at(initial.epoch + initial.period()).unwrap();
        assert_abs_diff_eq!(
            (after.radius() - initial.radius()).norm(),
            0.0,
            epsilon = 1e-2
        );
    }

    #[test]
    fn energy_is_conserved() {
        let prop = propagator();
        let initial = leo();
        let later = prop.orbit_at(initial.epoch + 2.0 * Unit::Hour).unwrap();
        assert_relative_eq!(later.energy(), initial.energy(), max_relative = 1e-10);
    }

    #[test]
    fn hyperbolic_orbits_are_rejected() {
        let epoch = Epoch::from_gregorian_utc(2024, 6, 21, 0, 0, 0, 0);
        let hyperbolic = Orbit::cartesian(8_000.0, 0.0, 0.0, 0.0, 12.0, 0.0, epoch, Frame::EME2000);
        assert!(KeplerianPropagator::new(hyperbolic, Arc::new(NadirPointing)).is_err());
    }

    #[test]
    fn ephemeris_is_bounded() {
        let mut prop = propagator();
        let start = leo().epoch;
        let end = start + 1.0 * Unit::Hour;
        prop.set_ephemeris_mode();
        prop.propagate(end).unwrap();
        let ephem = prop.generated_ephemeris().unwrap();
        assert!(ephem.orbit_at(start + 30.0 * Unit::Minute).is_ok());
        assert!(ephem.orbit_at(end + 1.0 * Unit::Second).is_err());
    }
}
