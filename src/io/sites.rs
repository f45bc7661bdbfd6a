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

//! Site catalogue reader.
//!
//! The catalogue is a semicolon-separated CSV with a header line:
//! `ID;SCORE;NAME;COUNTRY;REGION;TYPE;LONGITUDE;LATITUDE;ALTITUDE`, with the
//! longitude and latitude in degrees and the altitude in meters.

use super::{CatalogueSnafu, ConfigError, FileUnreadableSnafu, MalformedSiteSnafu};
use crate::cosmic::GeodeticPoint;
use crate::md::Site;
use csv::ReaderBuilder;
use snafu::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const SCORE_COLUMN: usize = 1;
const NAME_COLUMN: usize = 2;
const LONGITUDE_COLUMN: usize = 6;
const LATITUDE_COLUMN: usize = 7;
const ALTITUDE_COLUMN: usize = 8;

/// Reads the site catalogue from the provided path.
pub fn read_sites<P: AsRef<Path>>(path: P) -> Result<Vec<Site>, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).context(FileUnreadableSnafu {
        path: path.display().to_string(),
    })?;
    read_sites_from(file)
}

/// Reads the site catalogue from any reader.
pub fn read_sites_from<R: Read>(reader: R) -> Result<Vec<Site>, ConfigError> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut sites = Vec::with_capacity(100);
    for (index, record) in csv_reader.records().enumerate() {
        let record = record.context(CatalogueSnafu)?;
        let line = index + 2;

        let name = get_field(&record, line, NAME_COLUMN, "name")?.to_string();
        let score = get_number(&record, line, SCORE_COLUMN, "score")?;
        let longitude_deg = get_number(&record, line, LONGITUDE_COLUMN, "longitude")?;
        let latitude_deg = get_number(&record, line, LATITUDE_COLUMN, "latitude")?;
        let altitude_m = get_number(&record, line, ALTITUDE_COLUMN, "altitude")?;

        sites.push(Site::new(
            name,
            score,
            GeodeticPoint::new(latitude_deg, longitude_deg, altitude_m / 1_000.0),
        ));
    }

    debug!("loaded {} site(s) from the catalogue", sites.len());
    Ok(sites)
}

fn get_field<'r>(
    record: &'r csv::StringRecord,
    line: usize,
    column: usize,
    what: &str,
) -> Result<&'r str, ConfigError> {
    record.get(column).context(MalformedSiteSnafu {
        line,
        reason: format!("missing {what} column"),
    })
}

fn get_number(
    record: &csv::StringRecord,
    line: usize,
    column: usize,
    what: &str,
) -> Result<f64, ConfigError> {
    get_field(record, line, column, what)?
        .parse::<f64>()
        .ok()
        .context(MalformedSiteSnafu {
            line,
            reason: format!("unparseable {what}"),
        })
}

/// Extracts the top `n` ranking sites, highest scores first; equal scores
/// keep their catalogue order.
pub fn top_ranking_sites(mut catalogue: Vec<Site>, n: usize) -> Result<Vec<Site>, ConfigError> {
    ensure!(
        catalogue.len() >= n,
        super::NotEnoughSitesSnafu {
            available: catalogue.len(),
            requested: n,
        }
    );
    catalogue.sort_by(Site::cmp_by_descending_score);
    catalogue.truncate(n);
    Ok(catalogue)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGUE: &str = "\
ID;SCORE;NAME;COUNTRY;REGION;TYPE;LONGITUDE;LATITUDE;ALTITUDE
1;10.0;Paris;France;Europe;City;2.3522;48.8566;35
2;42.5;Tokyo;Japan;Asia;City;139.6917;35.6895;40
3;10.0;Lyon;France;Europe;City;4.8357;45.7640;170
";

    #[test]
    fn reads_the_reference_format() {
        let sites = read_sites_from(CATALOGUE.as_bytes()).unwrap();
        assert_eq!(sites.len(), 3);
        let paris = &sites[0];
        assert_eq!(paris.name, "Paris");
        assert_eq!(paris.score, 10.0);
        assert_eq!(paris.point.latitude_deg, 48.8566);
        assert_eq!(paris.point.longitude_deg, 2.3522);
        assert_eq!(paris.point.height_km, 0.035);
    }

    #[test]
    fn rejects_malformed_scores() {
        let bad = "ID;SCORE;NAME;COUNTRY;REGION;TYPE;LONGITUDE;LATITUDE;ALTITUDE\n1;high;Paris;France;Europe;City;2.35;48.85;35\n";
        assert!(matches!(
            read_sites_from(bad.as_bytes()),
            Err(ConfigError::MalformedSite { line: 2, .. })
        ));
    }

    #[test]
    fn top_ranking_is_stable_for_ties() {
        let sites = read_sites_from(CATALOGUE.as_bytes()).unwrap();
        let top = top_ranking_sites(sites, 2).unwrap();
        assert_eq!(top[0].name, "Tokyo");
        // Paris ties with Lyon but comes first in the catalogue
        assert_eq!(top[1].name, "Paris");
    }

    #[test]
    fn refuses_to_overdraw_the_catalogue() {
        let sites = read_sites_from(CATALOGUE.as_bytes()).unwrap();
        assert!(matches!(
            top_ranking_sites(sites, 4),
            Err(ConfigError::NotEnoughSites {
                available: 3,
                requested: 4,
            })
        ));
    }
}
