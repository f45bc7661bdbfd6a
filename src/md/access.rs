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

//! Per-target access computation.
//!
//! For each site, three coded detectors are registered on a fresh propagator
//! (each site owns its propagator so that detector state never leaks across
//! targets), the orbit is propagated once across the horizon, and the three
//! phenomenon timelines are merged and refined into the site access timeline.

use super::events::{CodingEventDetector, SensorVisibility, SunIncidence, SunPhase};
use super::site::Site;
use super::timeline::{DateInterval, Timeline};
use crate::attitude::NadirPointing;
use crate::cosmic::{OneAxisEllipsoid, Satellite};
use crate::propagators::{KeplerianPropagator, PropagationError};
use hifitime::{Duration, Unit};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Phenomenon code of the raw sensor visibility windows.
pub const VISIBILITY: &str = "Visibility";
/// Phenomenon code of the raw solar illumination windows.
pub const SUN_INCIDENCE: &str = "SunIncidence";
/// Phenomenon code of the raw glare-free windows.
pub const NON_GLARE: &str = "NonGlare";
/// Intermediate code of the visible-and-lit combination.
pub const VISIBILITY_AND_SUN: &str = "Visibility & SunIncidence";
/// Code of the fully validated access windows.
pub const ACCESS: &str = "Visibility & SunIncidence & NonGlare";

/// The access plan: one refined access timeline per site.
pub type AccessPlan = HashMap<Site, Timeline>;

/// Observation constraint thresholds fed to the three detectors.
#[derive(Copy, Clone, Debug)]
pub struct AccessConstraints {
    /// in degrees
    pub max_sun_incidence_deg: f64,
    /// in degrees
    pub max_sun_phase_deg: f64,
    /// in seconds
    pub integration_time_s: f64,
}

impl AccessConstraints {
    pub fn integration_time(&self) -> Duration {
        self.integration_time_s * Unit::Second
    }
}

/// Computes the access plan for all provided sites.
///
/// Sites are processed in parallel, each worker owning its propagator,
/// detectors and loggers; the plan inserts are serialized once every worker
/// has returned. A per-site propagation failure drops that site from the
/// plan with a diagnostic instead of aborting the run.
pub fn compute_access_plan(
    satellite: &Satellite,
    earth: &OneAxisEllipsoid,
    horizon: DateInterval,
    constraints: &AccessConstraints,
    sites: &[Site],
) -> AccessPlan {
    let results: Vec<(Site, Result<Timeline, PropagationError>)> = sites
        .par_iter()
        .map(|site| {
            let timeline = site_access_timeline(satellite, earth, horizon, constraints, site);
            (site.clone(), timeline)
        })
        .collect();

    let mut plan = AccessPlan::with_capacity(results.len());
    for (site, result) in results {
        match result {
            Ok(timeline) => {
                debug!("access timeline of {site}:\n{timeline}");
                plan.insert(site, timeline);
            }
            Err(err) => {
                error!("dropping {site} from the access plan: {err}");
            }
        }
    }
    plan
}

/// Computes the refined access timeline of a single site.
///
/// The three constraint timelines are merged into one, combined with two AND
/// passes, reduced to the combined code, and finally stripped of any window
/// that would not fit a full observation (strictly, so that every surviving
/// window is strictly longer than the integration time).
pub fn site_access_timeline(
    satellite: &Satellite,
    earth: &OneAxisEllipsoid,
    horizon: DateInterval,
    constraints: &AccessConstraints,
    site: &Site,
) -> Result<Timeline, PropagationError> {
    let mut propagator =
        KeplerianPropagator::new(satellite.initial_orbit, Arc::new(NadirPointing))?;

    propagator.add_event_detector(CodingEventDetector::new(
        VISIBILITY,
        Box::new(SensorVisibility::new(
            *earth,
            &site.point,
            satellite.pointing_capacity_deg,
        )),
    ));
    propagator.add_event_detector(CodingEventDetector::new(
        SUN_INCIDENCE,
        Box::new(SunIncidence::new(
            *earth,
            &site.point,
            constraints.max_sun_incidence_deg,
        )),
    ));
    propagator.add_event_detector(CodingEventDetector::new(
        NON_GLARE,
        Box::new(SunPhase::new(
            *earth,
            &site.point,
            constraints.max_sun_phase_deg,
        )),
    ));

    let loggers = propagator.propagate(horizon.end())?;

    let mut timeline = Timeline::new(horizon);
    for logger in &loggers {
        for phenomenon in logger.phenomena(horizon) {
            timeline.add_phenomenon(phenomenon);
        }
    }

    timeline.apply_and(VISIBILITY, SUN_INCIDENCE, VISIBILITY_AND_SUN);
    timeline.apply_and(VISIBILITY_AND_SUN, NON_GLARE, ACCESS);
    timeline.filter_by_code(ACCESS, true);
    timeline.filter_by_min_duration(ACCESS, constraints.integration_time(), true);

    Ok(timeline)
}
