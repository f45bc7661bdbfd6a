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

use hifitime::Epoch;
use snafu::prelude::*;

mod kepler;

pub use self::kepler::{BoundedEphemeris, KeplerianPropagator};

/// Maximum checking interval (s) for the event detection during the orbit
/// propagation.
pub const MAX_CHECK_S: f64 = 120.0;

/// Default convergence threshold (s) for the event computation during the
/// orbit propagation.
pub const THRESHOLD_EVENTS_S: f64 = 1e-4;

#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum PropagationError {
    #[snafu(display("only elliptical orbits can be propagated (ecc = {ecc})"))]
    UnsupportedOrbit { ecc: f64 },

    #[snafu(display(
        "Kepler equation did not converge after {iterations} iterations (M = {mean_anomaly_rad} rad)"
    ))]
    KeplerDivergence {
        iterations: usize,
        mean_anomaly_rad: f64,
    },

    #[snafu(display("cannot propagate backwards: {epoch} is before the initial state"))]
    BackwardsPropagation { epoch: Epoch },

    #[snafu(display("{epoch} is outside of the ephemeris validity {start} .. {end}"))]
    OutsideEphemeris {
        epoch: Epoch,
        start: Epoch,
        end: Epoch,
    },

    #[snafu(display("the ephemeris must be generated by a propagation before being queried"))]
    EphemerisNotGenerated,
}
