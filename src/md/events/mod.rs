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

//! Coded event detection primitives.
//!
//! Each observation constraint is a black-box scalar switching function over
//! the orbital state: the constraint holds while the function is strictly
//! positive. The propagator samples detectors on its checking grid, refines
//! every sign change, and reports the crossings as [`CodedEvent`]s through a
//! [`CodedEventsLogger`].

use crate::cosmic::Orbit;
use hifitime::Epoch;
use std::fmt;

mod detectors;
mod logger;

pub use self::detectors::{SensorVisibility, SunIncidence, SunPhase};
pub use self::logger::CodedEventsLogger;

/// A timestamped phenomenon boundary: the start or the end of a coded
/// phenomenon.
#[derive(Clone, Debug, PartialEq)]
pub struct CodedEvent {
    pub code: String,
    pub epoch: Epoch,
    /// true marks the start of the phenomenon, false its end
    pub is_start: bool,
}

impl CodedEvent {
    pub fn new(code: &str, epoch: Epoch, is_start: bool) -> Self {
        Self {
            code: code.to_string(),
            epoch,
            is_start,
        }
    }
}

impl fmt::Display for CodedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} at {}",
            if self.is_start { "start" } else { "end" },
            self.code,
            self.epoch
        )
    }
}

/// A scalar switching function over the inertial orbital state.
///
/// The monitored phenomenon is active wherever `g` is strictly positive.
/// Detectors are evaluated as opaque root-finding targets: the propagator
/// only relies on the sign of `g`, so a detector may be discontinuous away
/// from its zero crossings (the visibility detector is, when the Earth masks
/// the line of sight).
pub trait EventDetector: Send + Sync {
    fn g(&self, orbit: &Orbit) -> f64;
}

/// Wraps a detector with the phenomenon code used for the emitted events.
pub struct CodingEventDetector {
    code: String,
    detector: Box<dyn EventDetector>,
}

impl CodingEventDetector {
    pub fn new(code: &str, detector: Box<dyn EventDetector>) -> Self {
        Self {
            code: code.to_string(),
            detector,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the monitored phenomenon holds at the provided state.
    pub fn is_active(&self, orbit: &Orbit) -> bool {
        self.detector.g(orbit) > 0.0
    }
}
