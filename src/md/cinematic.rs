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

//! Cinematic plan assembly and validation.
//!
//! The cinematic plan is the strict chronological sequence of attitude legs
//! covering the whole mission horizon without gap nor overlap: nadir laws,
//! observation laws and constant spin slews between them.

use super::schedule::ObservationPlan;
use super::site::Site;
use super::timeline::DateInterval;
use super::{NonContiguousLegSnafu, PlanningError, PlanningPropagationSnafu};
use crate::attitude::{
    Attitude, AttitudeLaw, AttitudeLeg, ConstantSpinSlew, LegKind, LegProgram, NadirPointing,
};
use crate::cosmic::{Orbit, Satellite};
use crate::propagators::{KeplerianPropagator, PropagationError};
use hifitime::Epoch;
use nalgebra::UnitQuaternion;
use snafu::prelude::*;
use std::fmt;
use std::sync::Arc;

/// A chronological attitude leg sequence with exact endpoint sharing.
#[derive(Clone, Default)]
pub struct StrictLegSequence {
    legs: Vec<AttitudeLeg>,
}

impl StrictLegSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a leg; its start must coincide exactly with the end of the
    /// last leg already in the sequence.
    pub fn push(&mut self, leg: AttitudeLeg) -> Result<(), PlanningError> {
        if let Some(last) = self.legs.last() {
            ensure!(
                last.end() == leg.start(),
                NonContiguousLegSnafu {
                    name: leg.name.clone(),
                    expected: last.end(),
                    found: leg.start(),
                }
            );
        }
        self.legs.push(leg);
        Ok(())
    }

    pub fn legs(&self) -> &[AttitudeLeg] {
        &self.legs
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// The union of the leg intervals; None for an empty sequence. By
    /// construction the union has no hole.
    pub fn interval(&self) -> Option<DateInterval> {
        match (self.legs.first(), self.legs.last()) {
            (Some(first), Some(last)) => Some(DateInterval::new(first.start(), last.end())),
            _ => None,
        }
    }

    /// Whether the sequence covers the provided horizon exactly.
    pub fn covers(&self, horizon: DateInterval) -> bool {
        self.interval() == Some(horizon)
    }

    fn leg_at(&self, epoch: Epoch) -> Option<&AttitudeLeg> {
        self.legs
            .iter()
            .find(|leg| leg.interval.contains_epoch(epoch))
    }
}

/// The sequence is itself an attitude law: at any epoch it commands the
/// attitude of the active leg, clamping to the boundary legs outside of its
/// span. This is what lets a propagator replay the whole cinematic plan for
/// the attitude ephemeris output.
impl AttitudeLaw for StrictLegSequence {
    fn orientation(&self, orbit: &Orbit) -> UnitQuaternion<f64> {
        let leg = self
            .leg_at(orbit.epoch)
            .or_else(|| match self.legs.first() {
                Some(first) if orbit.epoch < first.start() => Some(first),
                _ => self.legs.last(),
            })
            .expect("empty cinematic plan cannot provide an attitude");
        match &leg.program {
            LegProgram::Law(law) => law.orientation(orbit),
            LegProgram::Slew(slew) => slew.orientation_at(orbit.epoch),
        }
    }
}

impl fmt::Display for StrictLegSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cinematic plan ({} legs):", self.len())?;
        for leg in &self.legs {
            writeln!(f, "  {leg}")?;
        }
        Ok(())
    }
}

/// Assembles the cinematic plan from the observation plan.
///
/// The sequence is: initial nadir law, slew to the first observation, then
/// for each pair of consecutive observations either a single direct slew or,
/// when the gap exceeds twice the worst-case slew, a slew out to nadir, an
/// intermediate nadir law and a slew back in; finally a slew to nadir and
/// the closing nadir law until the end of the horizon. All slews at the
/// nadir boundaries are allotted the worst-case slew duration.
pub fn compute_cinematic_plan(
    observation_plan: &ObservationPlan,
    horizon: DateInterval,
    satellite: &Satellite,
    propagator: &KeplerianPropagator,
) -> Result<StrictLegSequence, PlanningError> {
    let nadir: Arc<dyn AttitudeLaw> = Arc::new(NadirPointing);
    let max_slew = satellite.max_slew_duration();
    let mut plan = StrictLegSequence::new();

    let mut observations: Vec<(&Site, &AttitudeLeg)> = observation_plan
        .iter()
        .map(|(site, leg)| (site, leg))
        .collect();
    observations.sort_by_key(|(_, leg)| leg.start());

    if observations.is_empty() {
        plan.push(AttitudeLeg::from_law(
            "Nadir_Law_1",
            horizon,
            LegKind::NadirLaw,
            nadir,
        ))?;
        return Ok(plan);
    }

    let nadir_attitude = |epoch: Epoch| -> Result<Attitude, PropagationError> {
        NadirPointing.attitude(propagator, epoch)
    };

    // Lead-in: nadir law then slew to the first observation
    let (first_site, first_leg) = observations[0];
    let first_start = first_leg.start();
    let first_att = first_leg
        .attitude_at(propagator, first_start)
        .context(PlanningPropagationSnafu)?;
    let slew_in_start = first_start - max_slew;
    if slew_in_start > horizon.start() {
        plan.push(AttitudeLeg::from_law(
            "Nadir_Law_1",
            DateInterval::new(horizon.start(), slew_in_start),
            LegKind::NadirLaw,
            nadir.clone(),
        ))?;
        let from = nadir_attitude(slew_in_start).context(PlanningPropagationSnafu)?;
        plan.push(AttitudeLeg::from_slew(
            format!("Slew_Nadir_to_{}", first_site.name),
            ConstantSpinSlew::new(from, first_att),
        ))?;
    } else if first_start > horizon.start() {
        warn!(
            "first observation at {first_start} leaves less than a worst-case slew after the horizon start"
        );
        let from = nadir_attitude(horizon.start()).context(PlanningPropagationSnafu)?;
        plan.push(AttitudeLeg::from_slew(
            format!("Slew_Nadir_to_{}", first_site.name),
            ConstantSpinSlew::new(from, first_att),
        ))?;
    }

    for (index, (site, obs_leg)) in observations.iter().enumerate() {
        plan.push((*obs_leg).clone())?;

        let obs_end = obs_leg.end();
        let end_att = obs_leg
            .attitude_at(propagator, obs_end)
            .context(PlanningPropagationSnafu)?;

        if let Some((next_site, next_leg)) = observations.get(index + 1) {
            let next_start = next_leg.start();
            let next_att = next_leg
                .attitude_at(propagator, next_start)
                .context(PlanningPropagationSnafu)?;
            let gap = next_start - obs_end;
            if gap.to_seconds() > 2.0 * max_slew.to_seconds() {
                // Enough time to rest at nadir between the two observations
                let rest_start = obs_end + max_slew;
                let rest_end = next_start - max_slew;
                let rest_start_att =
                    nadir_attitude(rest_start).context(PlanningPropagationSnafu)?;
                let rest_end_att = nadir_attitude(rest_end).context(PlanningPropagationSnafu)?;
                plan.push(AttitudeLeg::from_slew(
                    format!("Slew_{}_to_NadirInter", site.name),
                    ConstantSpinSlew::new(end_att, rest_start_att),
                ))?;
                plan.push(AttitudeLeg::from_law(
                    "Nadir_Law_Inter",
                    DateInterval::new(rest_start, rest_end),
                    LegKind::NadirLaw,
                    nadir.clone(),
                ))?;
                plan.push(AttitudeLeg::from_slew(
                    format!("Slew_NadirInter_to_{}", next_site.name),
                    ConstantSpinSlew::new(rest_end_att, next_att),
                ))?;
            } else {
                plan.push(AttitudeLeg::from_slew(
                    format!("Slew_{}_to_{}", site.name, next_site.name),
                    ConstantSpinSlew::new(end_att, next_att),
                ))?;
            }
        } else {
            // Tail: slew back to nadir then hold it until the horizon end
            let nadir2_start = obs_end + max_slew;
            if nadir2_start < horizon.end() {
                let to = nadir_attitude(nadir2_start).context(PlanningPropagationSnafu)?;
                plan.push(AttitudeLeg::from_slew(
                    format!("Slew_{}_to_Nadir", site.name),
                    ConstantSpinSlew::new(end_att, to),
                ))?;
                plan.push(AttitudeLeg::from_law(
                    "Nadir_Law_2",
                    DateInterval::new(nadir2_start, horizon.end()),
                    LegKind::NadirLaw,
                    nadir.clone(),
                ))?;
            } else if obs_end < horizon.end() {
                warn!(
                    "last observation at {obs_end} leaves less than a worst-case slew before the horizon end"
                );
                let to = nadir_attitude(horizon.end()).context(PlanningPropagationSnafu)?;
                plan.push(AttitudeLeg::from_slew(
                    format!("Slew_{}_to_Nadir", site.name),
                    ConstantSpinSlew::new(end_att, to),
                ))?;
            }
        }
    }

    Ok(plan)
}

/// Walks the cinematic plan and checks every slew: its wall-clock duration
/// must strictly exceed the theoretical duration between its boundary
/// attitudes. Returns the overall verdict; each violation is logged.
pub fn check_cinematic_plan(
    plan: &StrictLegSequence,
    satellite: &Satellite,
    propagator: &KeplerianPropagator,
) -> Result<bool, PropagationError> {
    let mut valid = true;
    for leg in plan.legs() {
        let (start_att, end_att) = leg.boundary_attitudes(propagator)?;
        if leg.kind == LegKind::Slew {
            let theoretical = satellite.slew_duration_between(&start_att, &end_att);
            if leg.duration() > theoretical {
                debug!("{leg}: feasible ({} needed)", theoretical);
            } else {
                valid = false;
                warn!(
                    "{leg}: cinematically infeasible, needs {} but only has {}",
                    theoretical,
                    leg.duration()
                );
            }
        } else {
            debug!("{leg}");
        }
    }
    info!("==== Is the cinematic plan valid? => {valid} ====");
    Ok(valid)
}

/// Sum of the scores of the distinct sites of the observation plan.
pub fn final_score(observation_plan: &ObservationPlan) -> f64 {
    observation_plan.keys().map(|site| site.score).sum()
}
