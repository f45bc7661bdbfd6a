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

//! VTS visualization writers.
//!
//! Four CIC text emitters: the target sites POI, the trajectory OEM, the
//! attitude AEM and the cinematic leg sequence MEM. The trajectory and
//! attitude files sample a bounded ephemeris; the POI and MEM files are
//! direct dumps of the site list and the leg sequence.

use crate::md::cinematic::StrictLegSequence;
use crate::md::Site;
use crate::propagators::BoundedEphemeris;
use hifitime::{Epoch, Unit};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Trajectory sampling step, in seconds.
const OEM_STEP_S: f64 = 60.0;
/// Attitude sampling step, in seconds.
const AEM_STEP_S: f64 = 10.0;

/// Writes the four visualization files into the provided directory, which is
/// created if needed.
pub fn write_all(
    directory: &str,
    sites: &[Site],
    nadir_ephemeris: &BoundedEphemeris,
    plan_ephemeris: &BoundedEphemeris,
    plan: &StrictLegSequence,
) -> io::Result<()> {
    let dir = Path::new(directory);
    fs::create_dir_all(dir)?;

    generate_poi_file(&dir.join("Argus_Target_Sites_POI.txt"), sites)?;
    generate_oem_file(&dir.join("Argus_Satellite_Trajectory_OEM.txt"), nadir_ephemeris)?;
    generate_aem_file(&dir.join("Argus_Nadir_Pointing_AEM.txt"), nadir_ephemeris)?;
    generate_aem_file(&dir.join("Argus_Cinematic_Plan_AEM.txt"), plan_ephemeris)?;
    generate_leg_sequence_mem_file(&dir.join("Argus_Cinematic_Plan_Events_MEM.txt"), plan)?;
    Ok(())
}

/// Writes the points of interest file listing the mission target sites.
pub fn generate_poi_file(path: &PathBuf, sites: &[Site]) -> io::Result<()> {
    let mut writer = buffered(path)?;
    writeln!(writer, "CIC_POI_VERS = 1.0")?;
    writeln!(writer, "ORIGINATOR = ARGUS")?;
    writeln!(writer)?;
    for site in sites {
        writeln!(
            writer,
            "POINT = {} {:.6} {:.6} {:.3}",
            sanitized(&site.name),
            site.point.latitude_deg,
            site.point.longitude_deg,
            site.point.height_km * 1_000.0
        )?;
    }
    writer.flush()
}

/// Writes the CIC-OEM position/velocity ephemeris of the satellite.
pub fn generate_oem_file(path: &PathBuf, ephemeris: &BoundedEphemeris) -> io::Result<()> {
    let interval = ephemeris.interval();
    let mut writer = buffered(path)?;
    writeln!(writer, "CIC_OEM_VERS = 2.0")?;
    writeln!(writer, "CREATION_DATE = {}", interval.start())?;
    writeln!(writer, "ORIGINATOR = ARGUS")?;
    writeln!(writer)?;
    writeln!(writer, "META_START")?;
    writeln!(writer)?;
    writeln!(writer, "OBJECT_NAME = ARGUS")?;
    writeln!(writer, "OBJECT_ID = ARGUS")?;
    writeln!(writer, "CENTER_NAME = EARTH")?;
    writeln!(writer, "REF_FRAME = EME2000")?;
    writeln!(writer, "TIME_SYSTEM = UTC")?;
    writeln!(writer)?;
    writeln!(writer, "META_STOP")?;
    writeln!(writer)?;

    for epoch in sample_epochs(interval.start(), interval.end(), OEM_STEP_S) {
        let orbit = ephemeris.orbit_at(epoch).map_err(to_io)?;
        let (days, seconds) = mjd_split(epoch);
        writeln!(
            writer,
            "{days} {seconds:.3} {:.6} {:.6} {:.6} {:.9} {:.9} {:.9}",
            orbit.x_km, orbit.y_km, orbit.z_km, orbit.vx_km_s, orbit.vy_km_s, orbit.vz_km_s
        )?;
    }
    writer.flush()
}

/// Writes the CIC-AEM attitude quaternion ephemeris commanded by the
/// ephemeris attitude provider.
pub fn generate_aem_file(path: &PathBuf, ephemeris: &BoundedEphemeris) -> io::Result<()> {
    let interval = ephemeris.interval();
    let mut writer = buffered(path)?;
    writeln!(writer, "CIC_AEM_VERS = 1.0")?;
    writeln!(writer, "CREATION_DATE = {}", interval.start())?;
    writeln!(writer, "ORIGINATOR = ARGUS")?;
    writeln!(writer)?;
    writeln!(writer, "META_START")?;
    writeln!(writer)?;
    writeln!(writer, "OBJECT_NAME = ARGUS")?;
    writeln!(writer, "OBJECT_ID = ARGUS")?;
    writeln!(writer, "REF_FRAME_A = EME2000")?;
    writeln!(writer, "REF_FRAME_B = SC_BODY_1")?;
    writeln!(writer, "ATTITUDE_DIR = A2B")?;
    writeln!(writer, "TIME_SYSTEM = UTC")?;
    writeln!(writer, "ATTITUDE_TYPE = QUATERNION")?;
    writeln!(writer)?;
    writeln!(writer, "META_STOP")?;
    writeln!(writer)?;

    for epoch in sample_epochs(interval.start(), interval.end(), AEM_STEP_S) {
        let attitude = ephemeris.attitude_at(epoch).map_err(to_io)?;
        let q = attitude.inertial_to_body.as_ref();
        let (days, seconds) = mjd_split(epoch);
        writeln!(
            writer,
            "{days} {seconds:.3} {:.9} {:.9} {:.9} {:.9}",
            q.w, q.i, q.j, q.k
        )?;
    }
    writer.flush()
}

/// Writes the CIC-MEM file describing the cinematic plan as a sequence of
/// pointing modes.
pub fn generate_leg_sequence_mem_file(path: &PathBuf, plan: &StrictLegSequence) -> io::Result<()> {
    let mut writer = buffered(path)?;
    writeln!(writer, "CIC_MEM_VERS = 1.0")?;
    writeln!(writer, "ORIGINATOR = ARGUS")?;
    writeln!(writer)?;
    writeln!(writer, "META_START")?;
    writeln!(writer)?;
    writeln!(writer, "OBJECT_NAME = ARGUS")?;
    writeln!(writer, "OBJECT_ID = ARGUS")?;
    writeln!(writer, "USER_DEFINED_PROTOCOL = NONE")?;
    writeln!(writer, "USER_DEFINED_CONTENT = ATTITUDE_MODE")?;
    writeln!(writer, "TIME_SYSTEM = UTC")?;
    writeln!(writer)?;
    writeln!(writer, "META_STOP")?;
    writeln!(writer)?;

    for leg in plan.legs() {
        let (days, seconds) = mjd_split(leg.start());
        writeln!(writer, "{days} {seconds:.3} {}", sanitized(&leg.name))?;
    }
    writer.flush()
}

fn buffered(path: &PathBuf) -> io::Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn sanitized(name: &str) -> String {
    name.replace(' ', "_")
}

fn to_io(err: crate::propagators::PropagationError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

/// Inclusive sampling of [start, end]: every step, plus the exact end.
fn sample_epochs(start: Epoch, end: Epoch, step_s: f64) -> Vec<Epoch> {
    let mut epochs = Vec::new();
    let mut t = start;
    while t < end {
        epochs.push(t);
        t = t + step_s * Unit::Second;
    }
    epochs.push(end);
    epochs
}

/// Splits an epoch into integral modified Julian days (UTC) and the seconds
/// of day, the timestamp convention of the CIC files.
fn mjd_split(epoch: Epoch) -> (i64, f64) {
    let mjd = epoch.to_mjd_utc_days();
    let days = mjd.floor();
    let seconds = (mjd - days) * 86_400.0;
    (days as i64, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hifitime::Epoch;

    #[test]
    fn sampling_is_inclusive_of_both_ends() {
        let start = Epoch::from_gregorian_utc(2024, 6, 21, 0, 0, 0, 0);
        let end = start + 150.0 * Unit::Second;
        let epochs = sample_epochs(start, end, 60.0);
        assert_eq!(epochs.len(), 4);
        assert_eq!(epochs[0], start);
        assert_eq!(*epochs.last().unwrap(), end);
    }

    #[test]
    fn mjd_seconds_stay_in_a_day() {
        let epoch = Epoch::from_gregorian_utc(2024, 6, 21, 12, 30, 15, 0);
        let (_, seconds) = mjd_split(epoch);
        assert!((0.0..86_400.0).contains(&seconds));
        assert!((seconds - 45_015.0).abs() < 1.0);
    }
}
