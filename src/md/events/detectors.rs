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

use super::EventDetector;
use crate::cosmic::bodies::itrf_to_eme2000;
use crate::cosmic::{GeodeticPoint, OneAxisEllipsoid, Orbit, Sun};
use crate::utils::angle_between;
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Visibility of a ground site from the satellite sensor.
///
/// Active while the site sits inside the sensor cone (the boresight flies the
/// nadir direction during access scans) and the Earth does not mask the line
/// of sight. The masking branch only needs a correct sign, since the
/// propagator refines crossings by bisection on the sign of `g`.
pub struct SensorVisibility {
    earth: OneAxisEllipsoid,
    site_itrf_km: Vector3<f64>,
    half_aperture_rad: f64,
}

impl SensorVisibility {
    pub fn new(earth: OneAxisEllipsoid, site: &GeodeticPoint, half_aperture_deg: f64) -> Self {
        Self {
            earth,
            site_itrf_km: earth.geodetic_to_itrf_km(site),
            half_aperture_rad: half_aperture_deg.to_radians(),
        }
    }
}

impl EventDetector for SensorVisibility {
    fn g(&self, orbit: &Orbit) -> f64 {
        let site_eme = itrf_to_eme2000(&self.site_itrf_km, orbit.epoch);
        let sat = orbit.radius();
        if !self.earth.line_of_sight(&site_eme, &sat) {
            return -1.0;
        }
        let to_site = site_eme - sat;
        let boresight = -orbit.r_hat();
        self.half_aperture_rad - angle_between(&boresight, &to_site)
    }
}

/// Solar illumination of the site.
///
/// Measures the angle at the site between the direction to the Earth center
/// and the direction to the Sun; the site is usably lit while that angle
/// exceeds the supplement of the maximum incidence, i.e. while the Sun is
/// high enough above the local horizon.
pub struct SunIncidence {
    site_itrf_km: Vector3<f64>,
    threshold_rad: f64,
}

impl SunIncidence {
    pub fn new(earth: OneAxisEllipsoid, site: &GeodeticPoint, max_incidence_deg: f64) -> Self {
        Self {
            site_itrf_km: earth.geodetic_to_itrf_km(site),
            threshold_rad: PI - max_incidence_deg.to_radians(),
        }
    }
}

impl EventDetector for SunIncidence {
    fn g(&self, orbit: &Orbit) -> f64 {
        let site_eme = itrf_to_eme2000(&self.site_itrf_km, orbit.epoch);
        let to_center = -site_eme;
        let to_sun = Sun::position_eme2000_km(orbit.epoch) - site_eme;
        angle_between(&to_center, &to_sun) - self.threshold_rad
    }
}

/// Solar phase geometry at the site.
///
/// Measures the angle at the site between the direction to the Sun and the
/// direction to the satellite; the observation is glare-free while that
/// phase angle exceeds the configured threshold.
pub struct SunPhase {
    site_itrf_km: Vector3<f64>,
    min_phase_rad: f64,
}

impl SunPhase {
    pub fn new(earth: OneAxisEllipsoid, site: &GeodeticPoint, max_phase_deg: f64) -> Self {
        Self {
            site_itrf_km: earth.geodetic_to_itrf_km(site),
            min_phase_rad: max_phase_deg.to_radians(),
        }
    }
}

impl EventDetector for SunPhase {
    fn g(&self, orbit: &Orbit) -> f64 {
        let site_eme = itrf_to_eme2000(&self.site_itrf_km, orbit.epoch);
        let to_sun = Sun::position_eme2000_km(orbit.epoch) - site_eme;
        let to_sat = orbit.radius() - site_eme;
        angle_between(&to_sun, &to_sat) - self.min_phase_rad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::bodies::eme2000_to_itrf;
    use crate::cosmic::{Frame, EARTH_EQUATORIAL_RADIUS_KM};
    use hifitime::Epoch;

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc(2024, 6, 21, 12, 0, 0, 0)
    }

    fn earth() -> OneAxisEllipsoid {
        OneAxisEllipsoid::new(EARTH_EQUATORIAL_RADIUS_KM, 0.0)
    }

    /// A geodetic point whose Earth-fixed location matches the provided
    /// inertial direction at the test epoch (spherical Earth).
    fn site_under_direction(dir_eme: &Vector3<f64>) -> GeodeticPoint {
        let itrf = eme2000_to_itrf(&(dir_eme.normalize() * EARTH_EQUATORIAL_RADIUS_KM), epoch());
        let lat = (itrf.z / itrf.norm()).asin().to_degrees();
        let lon = itrf.y.atan2(itrf.x).to_degrees();
        GeodeticPoint::new(lat, lon, 0.0)
    }

    fn satellite_at(dir_eme: &Vector3<f64>) -> Orbit {
        let pos = dir_eme.normalize() * (EARTH_EQUATORIAL_RADIUS_KM + 694.0);
        Orbit::cartesian(pos.x, pos.y, pos.z, 0.0, 7.5, 0.0, epoch(), Frame::EME2000)
    }

    #[test]
    fn visibility_from_zenith_and_masked_from_the_far_side() {
        let dir = Vector3::new(1.0, 0.0, 0.0);
        let site = site_under_direction(&dir);
        let detector = SensorVisibility::new(earth(), &site, 30.0);

        let overhead = satellite_at(&dir);
        assert!(detector.g(&overhead) > 0.0);

        let far_side = satellite_at(&-dir);
        assert!(detector.g(&far_side) < 0.0);
    }

    #[test]
    fn visibility_respects_the_sensor_cone() {
        let dir = Vector3::new(1.0, 0.0, 0.0);
        let site = site_under_direction(&dir);
        // With a site at the sub-satellite point of a satellite displaced by
        // 45 deg of central angle, the off-nadir angle exceeds 60 deg
        let detector = SensorVisibility::new(earth(), &site, 30.0);
        let displaced = satellite_at(&Vector3::new(1.0, 1.0, 0.0));
        assert!(detector.g(&displaced) < 0.0);
    }

    #[test]
    fn sun_incidence_splits_day_from_night() {
        let sun_dir = Sun::direction_eme2000(epoch());
        let detector_day = SunIncidence::new(earth(), &site_under_direction(&sun_dir), 75.0);
        // The sub-solar site sees the Sun at zenith
        assert!(detector_day.g(&satellite_at(&sun_dir)) > 0.0);

        let detector_night = SunIncidence::new(earth(), &site_under_direction(&-sun_dir), 75.0);
        assert!(detector_night.g(&satellite_at(&-sun_dir)) < 0.0);
    }

    #[test]
    fn sun_phase_flags_glare() {
        let sun_dir = Sun::direction_eme2000(epoch());
        let site = site_under_direction(&sun_dir);
        let detector = SunPhase::new(earth(), &site, 30.0);

        // Satellite at the zenith of the sub-solar site: the Sun and the
        // satellite are aligned as seen from the site, which is glare
        assert!(detector.g(&satellite_at(&sun_dir)) < 0.0);

        // Move the satellite 60 deg of central angle away: the phase angle
        // opens well beyond the 30 deg threshold
        let ortho = sun_dir.cross(&Vector3::new(0.0, 0.0, 1.0)).normalize();
        let slanted = (sun_dir * 0.5 + ortho * 0.866).normalize();
        assert!(detector.g(&satellite_at(&slanted)) > 0.0);
    }
}
