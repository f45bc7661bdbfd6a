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

use snafu::prelude::*;

pub mod config;
pub mod sites;
pub mod vts;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("could not read {path}: {source}"))]
    FileUnreadable {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("could not parse the configuration: {source}"))]
    Parsing { source: serde_yaml::Error },

    #[snafu(display("could not read the site catalogue: {source}"))]
    Catalogue { source: csv::Error },

    #[snafu(display("malformed site record on line {line}: {reason}"))]
    MalformedSite { line: usize, reason: String },

    #[snafu(display("could not parse `{raw}` as an epoch"))]
    InvalidEpoch { raw: String },

    #[snafu(display("the mission horizon must end after it starts"))]
    InvalidHorizon,

    #[snafu(display("the site catalogue has {available} site(s), {requested} requested"))]
    NotEnoughSites { available: usize, requested: usize },
}
