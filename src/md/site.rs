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

use crate::cosmic::GeodeticPoint;
use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An observation target: name, score and geodetic location.
///
/// Sites are loaded once from the catalogue and read-only afterwards. The
/// name is the unique key of the catalogue, so identity, hashing and
/// equality all go through it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    /// Strictly positive observation reward
    pub score: f64,
    pub point: GeodeticPoint,
}

impl Site {
    pub fn new(name: impl Into<String>, score: f64, point: GeodeticPoint) -> Self {
        Self {
            name: name.into(),
            score,
            point,
        }
    }

    /// Comparator placing the highest scores first; equal scores keep their
    /// relative catalogue order when used with a stable sort.
    pub fn cmp_by_descending_score(a: &Site, b: &Site) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Site {}

impl Hash for Site {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (score {:.1}) {}", self.name, self.score, self.point)
    }
}
