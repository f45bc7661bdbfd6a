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

use super::CodedEvent;
use crate::md::timeline::{DateInterval, Phenomenon};

/// Records every coded event of one detector across a propagation, plus the
/// activity state at the sweep start so that phenomena already in progress at
/// the horizon boundary are clipped rather than lost.
#[derive(Clone, Debug, Default)]
pub struct CodedEventsLogger {
    code: String,
    initially_active: bool,
    events: Vec<CodedEvent>,
}

impl CodedEventsLogger {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            initially_active: false,
            events: Vec::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub(crate) fn set_initially_active(&mut self, active: bool) {
        self.initially_active = active;
    }

    pub(crate) fn record(&mut self, event: CodedEvent) {
        debug_assert_eq!(event.code, self.code);
        self.events.push(event);
    }

    pub fn events(&self) -> &[CodedEvent] {
        &self.events
    }

    /// Pairs the recorded events into phenomena over the provided validity
    /// interval.
    ///
    /// A phenomenon open at either end of the interval is clipped to the
    /// interval boundary: a leading end-event closes a phenomenon started at
    /// the validity start, and a trailing start-event opens one ended at the
    /// validity end. With no event at all, the detector state at the sweep
    /// start decides between an empty timeline and a single phenomenon
    /// spanning the whole validity.
    pub fn phenomena(&self, validity: DateInterval) -> Vec<Phenomenon> {
        let mut out = Vec::new();
        let mut pending_start: Option<CodedEvent> = if self.initially_active {
            Some(CodedEvent::new(&self.code, validity.start(), true))
        } else {
            None
        };

        for event in &self.events {
            if event.is_start {
                if pending_start.is_some() {
                    // Two consecutive starts: the sweep missed an end within
                    // one checking step. Keep the earliest start.
                    continue;
                }
                pending_start = Some(event.clone());
            } else if let Some(start) = pending_start.take() {
                out.push(Phenomenon::from_events(start, event.clone()));
            }
        }

        if let Some(start) = pending_start {
            let end = CodedEvent::new(&self.code, validity.end(), false);
            out.push(Phenomenon::from_events(start, end));
        }

        out
    }
}
