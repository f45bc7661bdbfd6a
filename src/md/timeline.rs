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

//! Labeled interval algebra over the mission horizon.
//!
//! A [`Timeline`] is an ordered multiset of [`Phenomenon`], each labeled with
//! a phenomenon code and spanning a [`DateInterval`]. The planner refines raw
//! detector timelines through AND combinations and filters until only the
//! validated access windows remain.

use super::events::CodedEvent;
use hifitime::{Duration, Epoch};
use std::fmt;

/// A closed interval of absolute dates, `start <= end`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DateInterval {
    start: Epoch,
    end: Epoch,
}

impl DateInterval {
    pub fn new(start: Epoch, end: Epoch) -> Self {
        assert!(start <= end, "interval start must not be after its end");
        Self { start, end }
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn end(&self) -> Epoch {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains_epoch(&self, epoch: Epoch) -> bool {
        self.start <= epoch && epoch <= self.end
    }

    pub fn contains(&self, other: &DateInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two intervals share a span of nonzero measure.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The common span of nonzero measure, if any.
    pub fn intersect(&self, other: &DateInterval) -> Option<DateInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(DateInterval::new(start, end))
        } else {
            None
        }
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.start, self.end)
    }
}

/// A time-bounded occurrence of a coded phenomenon, derived from the pair of
/// coded events opening and closing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Phenomenon {
    pub code: String,
    pub starting_event: CodedEvent,
    pub ending_event: CodedEvent,
    pub timespan: DateInterval,
}

impl Phenomenon {
    pub fn from_events(starting_event: CodedEvent, ending_event: CodedEvent) -> Self {
        let timespan = DateInterval::new(starting_event.epoch, ending_event.epoch);
        Self {
            code: starting_event.code.clone(),
            starting_event,
            ending_event,
            timespan,
        }
    }

    /// A phenomenon synthesized by the timeline algebra rather than detected:
    /// its boundary events carry the new code.
    pub fn from_interval(code: impl Into<String>, timespan: DateInterval) -> Self {
        let code = code.into();
        Self {
            starting_event: CodedEvent::new(&code, timespan.start(), true),
            ending_event: CodedEvent::new(&code, timespan.end(), false),
            code,
            timespan,
        }
    }

    pub fn duration(&self) -> Duration {
        self.timespan.duration()
    }
}

impl fmt::Display for Phenomenon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.code, self.timespan, self.duration())
    }
}

/// An ordered multiset of phenomena over a validity interval.
///
/// All operations mutate the timeline in place. Phenomena of a given code are
/// returned in chronological order of their start.
#[derive(Clone, Debug)]
pub struct Timeline {
    validity: DateInterval,
    phenomena: Vec<Phenomenon>,
}

impl Timeline {
    pub fn new(validity: DateInterval) -> Self {
        Self {
            validity,
            phenomena: Vec::new(),
        }
    }

    pub fn validity(&self) -> DateInterval {
        self.validity
    }

    pub fn is_empty(&self) -> bool {
        self.phenomena.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phenomena.len()
    }

    /// Appends a phenomenon; no deduplication. The phenomenon must lie within
    /// the validity interval.
    pub fn add_phenomenon(&mut self, phenomenon: Phenomenon) {
        debug_assert!(
            self.validity.contains(&phenomenon.timespan),
            "phenomenon outside of the timeline validity"
        );
        self.phenomena.push(phenomenon);
    }

    /// All phenomena, in insertion order.
    pub fn phenomena(&self) -> &[Phenomenon] {
        &self.phenomena
    }

    /// The phenomena of the provided code, in chronological order of start.
    pub fn phenomena_of(&self, code: &str) -> Vec<&Phenomenon> {
        let mut matching: Vec<&Phenomenon> =
            self.phenomena.iter().filter(|p| p.code == code).collect();
        matching.sort_by_key(|p| p.timespan.start());
        matching
    }

    fn intervals_of(&self, code: &str) -> Vec<DateInterval> {
        self.phenomena_of(code)
            .into_iter()
            .map(|p| p.timespan)
            .collect()
    }

    /// Inserts a phenomenon with `code_out` on every maximal interval where a
    /// phenomenon with `code_a` overlaps one with `code_b`. Input phenomena
    /// are preserved; any previous `code_out` phenomena are replaced, which
    /// makes the operation idempotent and commutative in its input codes.
    pub fn apply_and(&mut self, code_a: &str, code_b: &str, code_out: &str) {
        let of_a = self.intervals_of(code_a);
        let of_b = self.intervals_of(code_b);

        let mut cuts: Vec<DateInterval> = Vec::new();
        for ia in &of_a {
            for ib in &of_b {
                if let Some(cut) = ia.intersect(ib) {
                    cuts.push(cut);
                }
            }
        }
        cuts.sort_by_key(|iv| iv.start());

        // Coalesce overlapping or touching fragments into maximal intervals
        let mut merged: Vec<DateInterval> = Vec::new();
        for cut in cuts {
            match merged.last_mut() {
                Some(last) if cut.start() <= last.end() => {
                    if cut.end() > last.end() {
                        *last = DateInterval::new(last.start(), cut.end());
                    }
                }
                _ => merged.push(cut),
            }
        }

        self.phenomena.retain(|p| p.code != code_out);
        for interval in merged {
            self.phenomena
                .push(Phenomenon::from_interval(code_out, interval));
        }
    }

    /// Removes all phenomena whose code does (`keep_matching == false`) or
    /// does not (`keep_matching == true`) match the provided code.
    pub fn filter_by_code(&mut self, code: &str, keep_matching: bool) {
        self.phenomena.retain(|p| (p.code == code) == keep_matching);
    }

    /// Removes the phenomena of the provided code whose duration is below the
    /// threshold: `< min` when not strict, `<= min` when strict.
    pub fn filter_by_min_duration(&mut self, code: &str, min: Duration, strict: bool) {
        self.phenomena.retain(|p| {
            if p.code != code {
                return true;
            }
            if strict {
                p.duration() > min
            } else {
                p.duration() >= min
            }
        });
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "____ Timeline {} ____", self.validity)?;
        for phenomenon in &self.phenomena {
            writeln!(f, "  {phenomenon}")?;
        }
        write!(f, "_____________________")
    }
}
