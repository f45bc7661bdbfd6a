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

use crate::attitude::NadirPointing;
use crate::cosmic::{OneAxisEllipsoid, Orbit, Satellite, EARTH_EQUATORIAL_RADIUS_KM};
use crate::errors::{ConfigSnafu, PlanningSnafu, PropagationSnafu, VisualizationSnafu};
use crate::io::config::MissionConfig;
use crate::io::{sites as sites_io, vts};
use crate::propagators::{KeplerianPropagator, PropagationError};
use crate::MissionError;
use hifitime::{Duration, Epoch, Unit};
use snafu::prelude::*;
use std::fmt;
use std::sync::Arc;

pub mod access;
pub mod cinematic;
pub mod events;
pub mod schedule;
mod site;
pub mod timeline;

pub use self::access::{AccessConstraints, AccessPlan};
pub use self::cinematic::StrictLegSequence;
pub use self::schedule::ObservationPlan;
pub use self::site::Site;

use self::timeline::DateInterval;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PlanningError {
    #[snafu(display(
        "leg {name} starts at {found} but the sequence ends at {expected}: a cinematic plan has no gap"
    ))]
    NonContiguousLeg {
        name: String,
        expected: Epoch,
        found: Epoch,
    },

    #[snafu(display("propagation failed while assembling the plan: {source}"))]
    PlanningPropagation { source: PropagationError },

    #[snafu(display("the cinematic plan must be computed first"))]
    PlanNotComputed,

    #[snafu(display("the cinematic plan must be checked before computing the score"))]
    PlanNotChecked,

    #[snafu(display("the cinematic plan violates the agility model, no score"))]
    CinematicViolation,
}

/// The context of one Earth-observation mission run.
///
/// The mission owns the physical context, the satellite, the site list and
/// the three plans. Each plan is written exactly once by its compute method
/// and read-only afterwards; the intended call order is access, observation,
/// cinematic, check, score.
pub struct Mission {
    name: String,
    config: MissionConfig,
    horizon: DateInterval,
    earth: OneAxisEllipsoid,
    satellite: Satellite,
    sites: Vec<Site>,
    access_plan: AccessPlan,
    observation_plan: ObservationPlan,
    cinematic_plan: StrictLegSequence,
    validity: Option<bool>,
}

impl Mission {
    /// Builds the mission context and loads the top `number_of_sites` ranking
    /// targets from the configured catalogue.
    pub fn new(
        name: &str,
        number_of_sites: usize,
        config: MissionConfig,
    ) -> Result<Self, MissionError> {
        let catalogue = sites_io::read_sites(&config.sites_file).context(ConfigSnafu)?;
        let sites =
            sites_io::top_ranking_sites(catalogue, number_of_sites).context(ConfigSnafu)?;
        Self::from_sites(name, sites, config)
    }

    /// Builds the mission context over an explicit site list.
    pub fn from_sites(
        name: &str,
        sites: Vec<Site>,
        config: MissionConfig,
    ) -> Result<Self, MissionError> {
        let horizon = config.horizon().context(ConfigSnafu)?;

        // Spherical Earth model (f = 0), like the reference mission
        let earth = OneAxisEllipsoid::new(EARTH_EQUATORIAL_RADIUS_KM, 0.0);

        let initial_orbit = Orbit::keplerian_altitude(
            config.altitude_km,
            config.eccentricity,
            config.inclination_deg,
            config.ascending_node_deg,
            0.0,
            0.0,
            horizon.start(),
            &earth,
        );
        let satellite = Satellite::new(
            &config.satellite_name,
            initial_orbit,
            config.pointing_capacity_deg,
            config.max_spin_rate_deg_s.to_radians(),
            config.max_spin_acceleration_deg_s2.to_radians(),
        );

        info!(
            "mission {name}: {} site(s) over {horizon}, satellite {satellite}",
            sites.len()
        );

        Ok(Self {
            name: name.to_string(),
            config,
            horizon,
            earth,
            satellite,
            sites,
            access_plan: AccessPlan::new(),
            observation_plan: ObservationPlan::new(),
            cinematic_plan: StrictLegSequence::new(),
            validity: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn horizon(&self) -> DateInterval {
        self.horizon
    }

    pub fn earth(&self) -> &OneAxisEllipsoid {
        &self.earth
    }

    pub fn satellite(&self) -> &Satellite {
        &self.satellite
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn integration_time(&self) -> Duration {
        self.config.integration_time_s * Unit::Second
    }

    pub fn access_plan(&self) -> &AccessPlan {
        &self.access_plan
    }

    pub fn observation_plan(&self) -> &ObservationPlan {
        &self.observation_plan
    }

    pub fn cinematic_plan(&self) -> &StrictLegSequence {
        &self.cinematic_plan
    }

    /// A fresh propagator seeded from the satellite initial orbit and flying
    /// the default nadir law.
    ///
    /// Each planning stage re-instantiates its own propagator so that event
    /// detectors and loggers never leak from one stage to another.
    pub fn default_propagator(&self) -> Result<KeplerianPropagator, PropagationError> {
        KeplerianPropagator::new(self.satellite.initial_orbit, Arc::new(NadirPointing))
    }

    /// Computes the access plan: one refined access timeline per site.
    pub fn compute_access_plan(&mut self) -> &AccessPlan {
        let constraints = AccessConstraints {
            max_sun_incidence_deg: self.config.max_sun_incidence_deg,
            max_sun_phase_deg: self.config.max_sun_phase_deg,
            integration_time_s: self.config.integration_time_s,
        };
        self.access_plan = access::compute_access_plan(
            &self.satellite,
            &self.earth,
            self.horizon,
            &constraints,
            &self.sites,
        );
        &self.access_plan
    }

    /// Computes the observation plan from the access plan.
    pub fn compute_observation_plan(&mut self) -> &ObservationPlan {
        self.observation_plan = schedule::compute_observation_plan(
            &self.satellite,
            &self.earth,
            &self.access_plan,
            &self.sites,
            self.integration_time(),
        );
        &self.observation_plan
    }

    /// Assembles the cinematic plan from the observation plan.
    pub fn compute_cinematic_plan(&mut self) -> Result<&StrictLegSequence, MissionError> {
        let propagator = self.default_propagator().context(PropagationSnafu)?;
        self.cinematic_plan = cinematic::compute_cinematic_plan(
            &self.observation_plan,
            self.horizon,
            &self.satellite,
            &propagator,
        )
        .context(PlanningSnafu)?;
        Ok(&self.cinematic_plan)
    }

    /// Checks the cinematic plan against the agility model and remembers the
    /// verdict for the score computation.
    pub fn check_cinematic_plan(&mut self) -> Result<bool, MissionError> {
        let propagator = self.default_propagator().context(PropagationSnafu)?;
        let valid =
            cinematic::check_cinematic_plan(&self.cinematic_plan, &self.satellite, &propagator)
                .context(PropagationSnafu)?;
        self.validity = Some(valid);
        Ok(valid)
    }

    /// The mission score: sum of the distinct observed site scores. Only
    /// available once the cinematic plan has been checked valid.
    pub fn final_score(&self) -> Result<f64, MissionError> {
        match self.validity {
            Some(true) => Ok(cinematic::final_score(&self.observation_plan)),
            Some(false) => Err(PlanningError::CinematicViolation).context(PlanningSnafu),
            None => Err(PlanningError::PlanNotChecked).context(PlanningSnafu),
        }
    }

    /// Writes the VTS visualization files: the target sites POI, the orbit
    /// ephemeris OEM, the nadir-pointing attitude AEM (to visualize the
    /// access field of view), the cinematic plan attitude AEM, and the leg
    /// sequence MEM.
    pub fn generate_vts_visualization(&self) -> Result<(), MissionError> {
        if self.cinematic_plan.is_empty() {
            return Err(PlanningError::PlanNotComputed).context(PlanningSnafu);
        }

        let mut nadir_propagator = self.default_propagator().context(PropagationSnafu)?;
        nadir_propagator.set_ephemeris_mode();
        nadir_propagator
            .propagate(self.horizon.end())
            .context(PropagationSnafu)?;
        let nadir_ephemeris = nadir_propagator
            .generated_ephemeris()
            .context(PropagationSnafu)?;

        let mut plan_propagator = KeplerianPropagator::new(
            self.satellite.initial_orbit,
            Arc::new(self.cinematic_plan.clone()),
        )
        .context(PropagationSnafu)?;
        plan_propagator.set_ephemeris_mode();
        plan_propagator
            .propagate(self.horizon.end())
            .context(PropagationSnafu)?;
        let plan_ephemeris = plan_propagator
            .generated_ephemeris()
            .context(PropagationSnafu)?;

        info!("writing VTS outputs to {}", self.config.vts_directory);
        vts::write_all(
            &self.config.vts_directory,
            &self.sites,
            &nadir_ephemeris,
            &plan_ephemeris,
            &self.cinematic_plan,
        )
        .context(VisualizationSnafu)?;
        info!("VTS outputs written");
        Ok(())
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mission [name={}, horizon={}, satellite={}, {} site(s)]",
            self.name,
            self.horizon,
            self.satellite,
            self.sites.len()
        )
    }
}
