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

use crate::io::ConfigError;
use crate::md::PlanningError;
use crate::propagators::PropagationError;
use snafu::prelude::*;

/// Represents all possible errors that can occur in the argus library.
///
/// Per-site propagation failures during access planning are isolated by the
/// access planner and never bubble up as a `MissionError`; a site with no
/// valid access window is not an error either, it is simply absent from the
/// plans.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MissionError {
    #[snafu(display("mission configuration error: {source}"))]
    Config { source: ConfigError },

    #[snafu(display("propagation failure: {source}"))]
    Propagation { source: PropagationError },

    #[snafu(display("planning error: {source}"))]
    Planning { source: PlanningError },

    #[snafu(display("could not write visualization files: {source}"))]
    Visualization { source: std::io::Error },
}
