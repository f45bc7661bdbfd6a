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

//! Greedy, score-prioritized observation scheduling.
//!
//! Targets are taken by descending score and receive at most one observation
//! of fixed integration duration, placed first-fit inside their access
//! windows. Every committed reservation is suffixed with the worst-case slew
//! duration as a guard band, so that any plan accepted here also satisfies
//! the downstream cinematic constraint without re-checking pair-wise slews.

use super::access::{AccessPlan, ACCESS};
use super::site::Site;
use super::timeline::DateInterval;
use crate::attitude::{AttitudeLeg, LegKind, TargetGroundPointing};
use crate::cosmic::{OneAxisEllipsoid, Satellite};
use hifitime::{Duration, Epoch};
use std::collections::HashMap;
use std::sync::Arc;

/// The observation plan: at most one observation leg per site.
pub type ObservationPlan = HashMap<Site, AttitudeLeg>;

/// A committed observation slot: the observation itself plus the guard band.
#[derive(Clone, Debug)]
struct Reservation {
    start: Epoch,
    /// End of the guarded slot: start + integration time + max slew duration
    end: Epoch,
    site: Site,
}

impl Reservation {
    fn guarded_interval(&self) -> DateInterval {
        DateInterval::new(self.start, self.end)
    }
}

/// Computes the observation plan from the access plan.
///
/// `sites` is the mission site list in catalogue order; it is re-sorted here
/// by descending score with a stable sort, so equally scored targets keep
/// their catalogue order. A target whose access windows are all too short or
/// too contended is skipped with a diagnostic.
pub fn compute_observation_plan(
    satellite: &Satellite,
    earth: &OneAxisEllipsoid,
    access_plan: &AccessPlan,
    sites: &[Site],
    integration_time: Duration,
) -> ObservationPlan {
    let max_slew = satellite.max_slew_duration();

    let mut by_score: Vec<&Site> = sites.iter().collect();
    by_score.sort_by(|a, b| Site::cmp_by_descending_score(a, b));

    let mut reservations: Vec<Reservation> = Vec::new();
    for site in by_score {
        let timeline = match access_plan.get(site) {
            Some(timeline) if !timeline.is_empty() => timeline,
            _ => {
                debug!("{} has no access window, skipping", site.name);
                continue;
            }
        };

        let mut placed = false;
        for window in timeline.phenomena_of(ACCESS) {
            if let Some(start) =
                try_place(&window.timespan, &reservations, integration_time, max_slew)
            {
                reservations.push(Reservation {
                    start,
                    end: start + integration_time + max_slew,
                    site: site.clone(),
                });
                placed = true;
                break;
            }
        }
        if !placed {
            warn!(
                "{} has {} access window(s) but none could be scheduled",
                site.name,
                timeline.len()
            );
        }
    }

    reservations.sort_by_key(|r| r.start);

    let mut plan = ObservationPlan::with_capacity(reservations.len());
    for reservation in reservations {
        let law = TargetGroundPointing::new(*earth, reservation.site.point);
        let leg = AttitudeLeg::from_law(
            format!("OBS_{}", reservation.site.name),
            DateInterval::new(reservation.start, reservation.start + integration_time),
            LegKind::ObservationLaw,
            Arc::new(law),
        );
        info!("scheduled {}", leg);
        plan.insert(reservation.site, leg);
    }
    plan
}

/// First-fit placement of one observation inside an access window.
///
/// Walks the committed reservations whose guarded slot overlaps the window,
/// in chronological order, and returns the first start date such that the
/// observation fits inside the window and its guarded slot reaches the next
/// reservation at the earliest when that reservation starts: before the
/// first overlapping reservation, between two consecutive ones, or after the
/// last one.
fn try_place(
    window: &DateInterval,
    reservations: &[Reservation],
    integration_time: Duration,
    max_slew: Duration,
) -> Option<Epoch> {
    let fits_window = |start: Epoch| start + integration_time <= window.end();

    let mut overlapping: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.guarded_interval().overlaps(window))
        .collect();
    overlapping.sort_by_key(|r| r.start);

    if overlapping.is_empty() {
        // Note: only the observation itself must fit; the guard band may
        // spill past the window since it protects the slew away from it.
        return fits_window(window.start()).then_some(window.start());
    }

    let guarded = integration_time + max_slew;

    // Before the first overlapping reservation
    if window.start() + guarded <= overlapping[0].start && fits_window(window.start()) {
        return Some(window.start());
    }

    // Between consecutive reservations, then after the last one
    for pair in overlapping.windows(2) {
        let candidate = pair[0].end;
        if candidate + guarded <= pair[1].start && fits_window(candidate) {
            return Some(candidate);
        }
    }

    let candidate = overlapping[overlapping.len() - 1].end;
    if fits_window(candidate) {
        return Some(candidate);
    }

    None
}
