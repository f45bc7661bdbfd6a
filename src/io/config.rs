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

use super::{ConfigError, FileUnreadableSnafu, InvalidEpochSnafu, ParsingSnafu};
use crate::md::timeline::DateInterval;
use hifitime::Epoch;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::path::Path;
use std::str::FromStr;

/// The mission constant bundle.
///
/// Defaults reproduce the reference mission: a Pleiades-like sun-synchronous
/// orbit observed over 24 hours. Any subset of the fields may be overridden
/// from a YAML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Mission horizon start, e.g. "2024-06-21T00:00:00 UTC"
    pub start_date: String,
    /// Mission horizon end
    pub end_date: String,
    pub satellite_name: String,
    /// Orbit altitude above the equatorial radius, in km
    pub altitude_km: f64,
    /// Orbit inclination, in degrees
    pub inclination_deg: f64,
    /// Right ascension of the ascending node, in degrees
    pub ascending_node_deg: f64,
    /// Mean eccentricity, no unit
    pub eccentricity: f64,
    /// Fixed observation duration, in seconds
    pub integration_time_s: f64,
    /// Maximum Sun incidence angle at the target for illumination, in degrees
    pub max_sun_incidence_deg: f64,
    /// Minimum Sun phase angle at the target against glare, in degrees
    pub max_sun_phase_deg: f64,
    /// Sensor half-aperture, in degrees
    pub pointing_capacity_deg: f64,
    /// Maximum spin rate of the satellite, in deg/s
    pub max_spin_rate_deg_s: f64,
    /// Maximum angular acceleration of the satellite, in deg/s^2
    pub max_spin_acceleration_deg_s2: f64,
    /// Path of the site catalogue CSV
    pub sites_file: String,
    /// Directory receiving the VTS visualization files
    pub vts_directory: String,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            start_date: "2024-06-21T00:00:00 UTC".to_string(),
            end_date: "2024-06-22T00:00:00 UTC".to_string(),
            satellite_name: "Argus 1".to_string(),
            altitude_km: 694.0,
            inclination_deg: 98.2,
            ascending_node_deg: 90.0,
            eccentricity: 1e-4,
            integration_time_s: 10.0,
            max_sun_incidence_deg: 75.0,
            max_sun_phase_deg: 90.0,
            pointing_capacity_deg: 30.0,
            max_spin_rate_deg_s: 2.0,
            max_spin_acceleration_deg_s2: 1.0,
            sites_file: "data/sites.csv".to_string(),
            vts_directory: "vts-output".to_string(),
        }
    }
}

impl MissionConfig {
    /// Loads a configuration from a YAML file; missing fields fall back to
    /// the defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).context(FileUnreadableSnafu {
            path: path.display().to_string(),
        })?;
        serde_yaml::from_str(&raw).context(ParsingSnafu)
    }

    pub fn start(&self) -> Result<Epoch, ConfigError> {
        parse_epoch(&self.start_date)
    }

    pub fn end(&self) -> Result<Epoch, ConfigError> {
        parse_epoch(&self.end_date)
    }

    /// The mission horizon, validated.
    pub fn horizon(&self) -> Result<DateInterval, ConfigError> {
        let start = self.start()?;
        let end = self.end()?;
        ensure!(start < end, super::InvalidHorizonSnafu);
        Ok(DateInterval::new(start, end))
    }
}

fn parse_epoch(raw: &str) -> Result<Epoch, ConfigError> {
    Epoch::from_str(raw.trim())
        .ok()
        .context(InvalidEpochSnafu { raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hifitime::Unit;

    #[test]
    fn default_horizon_is_one_day() {
        let config = MissionConfig::default();
        let horizon = config.horizon().unwrap();
        assert_eq!(horizon.duration(), 1.0 * Unit::Day);
    }

    #[test]
    fn partial_yaml_overrides_defaults() {
        let config: MissionConfig =
            serde_yaml::from_str("altitude_km: 500.0\nintegration_time_s: 25.0\n").unwrap();
        assert_eq!(config.altitude_km, 500.0);
        assert_eq!(config.integration_time_s, 25.0);
        // Untouched fields keep their defaults
        assert_eq!(config.inclination_deg, 98.2);
    }

    #[test]
    fn bad_epoch_is_rejected() {
        let mut config = MissionConfig::default();
        config.start_date = "not a date".to_string();
        assert!(config.horizon().is_err());
    }

    #[test]
    fn reversed_horizon_is_rejected() {
        let mut config = MissionConfig::default();
        config.start_date = "2024-06-23T00:00:00 UTC".to_string();
        assert!(matches!(
            config.horizon(),
            Err(ConfigError::InvalidHorizon)
        ));
    }
}
