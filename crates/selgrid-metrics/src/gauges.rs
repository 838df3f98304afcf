//! The exporter's gauge set.

use selgrid_core::grid::UP;
use selgrid_core::{GaugeDesc, ScrapeResult};

/// Current value of every published gauge.
///
/// Holds the `up` gauge plus one value per gauge of the active grid API
/// variant, in exposition order. No history is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSet {
    up: f64,
    gauges: Vec<(&'static GaugeDesc, f64)>,
}

impl GaugeSet {
    /// A zeroed set for the given descriptors, with `up` at 0.
    pub fn new(descs: &'static [GaugeDesc]) -> Self {
        Self {
            up: 0.0,
            gauges: descs.iter().map(|d| (d, 0.0)).collect(),
        }
    }

    /// Zero every gauge except `up`.
    pub fn reset(&mut self) {
        for (_, value) in &mut self.gauges {
            *value = 0.0;
        }
    }

    pub fn set_up(&mut self, up: bool) {
        self.up = if up { 1.0 } else { 0.0 };
    }

    pub fn up(&self) -> f64 {
        self.up
    }

    /// Set a gauge by fully qualified name. Returns false if the set has no
    /// such gauge.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.gauges.iter_mut().find(|(d, _)| d.name == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Current value of a gauge. `up` is addressable by its name too.
    pub fn get(&self, name: &str) -> Option<f64> {
        if name == UP.name {
            return Some(self.up);
        }
        self.gauges
            .iter()
            .find(|(d, _)| d.name == name)
            .map(|(_, v)| *v)
    }

    /// Copy every value of a decoded hub response into the set.
    pub fn apply(&mut self, result: &ScrapeResult) {
        for (desc, value) in result.values() {
            self.set(desc.name, value);
        }
    }

    /// Variant gauges in exposition order, excluding `up`.
    pub fn iter(&self) -> impl Iterator<Item = (&'static GaugeDesc, f64)> + '_ {
        self.gauges.iter().map(|(d, v)| (*d, *v))
    }
}
