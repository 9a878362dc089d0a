//! System gauges driven by a bounded random walk.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Severity band of a gauge reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GaugeLevel {
    Healthy,
    Warning,
    Critical,
}

impl GaugeLevel {
    /// Above 80 is critical, above 60 is a warning
    pub fn for_value(value: f64) -> Self {
        if value > 80.0 {
            Self::Critical
        } else if value > 60.0 {
            Self::Warning
        } else {
            Self::Healthy
        }
    }
}

/// A percentage gauge that moves by at most `step / 2` per tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Gauge {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Full width of the random perturbation
    pub step: f64,
}

impl Gauge {
    /// Perturb by `(r - 0.5) * step` for `r` in `[0, 1)`, clamped to bounds
    pub fn next<R: Rng>(&self, rng: &mut R) -> Self {
        let r: f64 = rng.gen();
        Self {
            value: (self.value + (r - 0.5) * self.step).clamp(self.min, self.max),
            ..*self
        }
    }

    pub fn level(&self) -> GaugeLevel {
        GaugeLevel::for_value(self.value)
    }

    /// Value rounded for display
    pub fn percent(&self) -> u8 {
        self.value.round() as u8
    }
}

/// CPU, memory, disk and network gauges
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SystemMetrics {
    pub cpu: Gauge,
    pub memory: Gauge,
    pub disk: Gauge,
    pub network: Gauge,
}

impl SystemMetrics {
    /// Next state of every gauge
    pub fn next<R: Rng>(&self, rng: &mut R) -> Self {
        Self {
            cpu: self.cpu.next(rng),
            memory: self.memory.next(rng),
            disk: self.disk.next(rng),
            network: self.network.next(rng),
        }
    }

    /// Named gauges in display order
    pub fn gauges(&self) -> [(&'static str, &Gauge); 4] {
        [
            ("cpu", &self.cpu),
            ("memory", &self.memory),
            ("disk", &self.disk),
            ("network", &self.network),
        ]
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self {
            cpu: Gauge { value: 67.0, min: 30.0, max: 90.0, step: 10.0 },
            memory: Gauge { value: 54.0, min: 40.0, max: 85.0, step: 8.0 },
            disk: Gauge { value: 32.0, min: 20.0, max: 70.0, step: 5.0 },
            network: Gauge { value: 89.0, min: 50.0, max: 100.0, step: 15.0 },
        }
    }
}
