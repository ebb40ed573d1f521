//! Travel geometry baselines.
//!
//! Learns the reference closed/open angles and the maximum observed travel
//! from completed MOVE events. Timed-out moves are excluded since they stop
//! at arbitrary points.

use serde::{Deserialize, Serialize};

use crate::event::{Event, MoveRecord, MoveTarget};
use crate::stats::median;

/// Learned travel geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baselines {
    /// Median end angle of close moves
    pub closed: Option<f64>,
    /// Median end angle of open moves (informational)
    pub open: Option<f64>,
    /// Largest |end - start| seen on any completed move
    pub max_travel: Option<f64>,
    /// True iff `closed` and `max_travel` are both known
    pub learned: bool,
}

impl Baselines {
    /// Max travel usable as a divisor
    pub fn travel_reference(&self) -> Option<f64> {
        self.max_travel.filter(|t| *t > 0.0)
    }
}

/// Learn baselines from the event stream
pub fn learn_baselines(events: &[Event]) -> Baselines {
    let mut closed_vals = Vec::new();
    let mut open_vals = Vec::new();
    let mut travels = Vec::new();

    for mv in events.iter().filter_map(MoveRecord::from_event) {
        if mv.timed_out() {
            continue;
        }
        let (Some(travel), Some(end)) = (mv.travel(), mv.end_deg) else {
            continue;
        };

        travels.push(travel);
        match mv.target {
            MoveTarget::Closed => closed_vals.push(end),
            MoveTarget::Open => open_vals.push(end),
            MoveTarget::Other => {}
        }
    }

    let closed = median(&closed_vals);
    let max_travel = travels.iter().copied().reduce(f64::max);

    Baselines {
        closed,
        open: median(&open_vals),
        max_travel,
        learned: closed.is_some() && max_travel.is_some(),
    }
}
