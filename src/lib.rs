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

/*! # argus

Argus plans the attitude program of an agile Earth-observation satellite over
a fixed mission horizon. Given a ranked list of ground targets, it computes
when each target is physically observable (visibility, solar illumination and
non-glare geometry over a propagated Keplerian orbit), schedules at most one
fixed-duration observation per target so as to maximize the collected score,
and assembles the continuous, cinematically feasible attitude timeline that
executes those observations, interleaved with nadir pointing and slews.
*/

/// Provides the space-time physical context: frames, orbits, the Earth
/// ellipsoid, an analytic Sun ephemeris, and the satellite agility model.
pub mod cosmic;

/// Provides the analytical Keplerian propagator, its event detection sweep,
/// and the bounded ephemeris used by the visualization writers.
pub mod propagators;

/// Attitude representation, pointing laws, constant spin slews, and attitude
/// legs.
pub mod attitude;

/// All of the mission planning tools: timelines, event detectors, the access
/// planner, the observation scheduler, and the cinematic plan assembler.
pub mod md;

/// Input/output needs of the library: mission configuration, the site
/// catalogue reader, and the VTS visualization writers.
pub mod io;

/// Utility functions shared by different modules.
pub mod utils;

mod errors;
pub use self::errors::MissionError;

#[macro_use]
extern crate log;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export of the nalgebra types used throughout argus
pub mod linalg {
    pub use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
}

/// A useful selection of re-exports for mission scripting
pub mod prelude {
    pub use crate::attitude::{Attitude, AttitudeLaw, AttitudeLeg, LegKind, NadirPointing};
    pub use crate::cosmic::{Frame, GeodeticPoint, OneAxisEllipsoid, Orbit, Satellite};
    pub use crate::io::config::MissionConfig;
    pub use crate::io::sites::{read_sites, top_ranking_sites};
    pub use crate::md::timeline::{DateInterval, Phenomenon, Timeline};
    pub use crate::md::{Mission, Site};
    pub use crate::propagators::KeplerianPropagator;
    pub use crate::time::{Duration, Epoch, Unit};
    pub use crate::MissionError;
}
