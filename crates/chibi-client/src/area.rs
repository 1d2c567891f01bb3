//! Stage transition detection.

use crate::tables::areas;

/// What observing a stage code produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaObservation {
    /// First observation since attach; no previous stage to compare with
    Baseline(&'static str),
    /// Same stage as last time
    Unchanged,
    /// Player moved
    Changed {
        from: &'static str,
        to: &'static str,
    },
}

impl AreaObservation {
    /// Stage name to publish to trackers, if anything changed.
    pub const fn published_name(self) -> Option<&'static str> {
        match self {
            Self::Baseline(name) | Self::Changed { to: name, .. } => Some(name),
            Self::Unchanged => None,
        }
    }
}

/// Remembers the last observed stage name.
#[derive(Debug, Default)]
pub struct AreaNotifier {
    current: Option<&'static str>,
}

impl AreaNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn current(&self) -> Option<&'static str> {
        self.current
    }

    /// Forget the last stage; the next observation becomes a new baseline.
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn observe(&mut self, code: u32) -> AreaObservation {
        let name = areas::name_of(code);
        match self.current.replace(name) {
            None => AreaObservation::Baseline(name),
            Some(previous) if previous == name => AreaObservation::Unchanged,
            Some(previous) => AreaObservation::Changed {
                from: previous,
                to: name,
            },
        }
    }
}
