//! Process resource reporting around environment setup and predictions.

use std::fmt;

/// Point in the service lifecycle a resource sample is taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    EnvironmentSetup { packages: usize },
    Prediction { elements: usize },
}

impl fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorPhase::EnvironmentSetup { packages } => {
                write!(f, "Environment setup ({} packages)", packages)
            }
            MonitorPhase::Prediction { elements } => {
                write!(f, "Prediction ({} elements)", elements)
            }
        }
    }
}

#[cfg(feature = "cli")]
pub use enabled::{ResourceSample, SystemMonitor};

#[cfg(feature = "cli")]
mod enabled {
    use super::MonitorPhase;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use sysinfo::{Pid, RefreshKind, System};

    #[derive(Debug, Clone)]
    pub struct ResourceSample {
        pub cpu_usage: f32,
        pub memory_mb: u64,
        pub peak_memory_mb: u64,
        pub uptime: Duration,
    }

    pub struct SystemMonitor {
        system: Mutex<System>,
        pid: Option<Pid>,
        started: Instant,
        peak_memory_mb: AtomicU64,
        predictions: AtomicU64,
        enabled: bool,
    }

    impl SystemMonitor {
        pub fn new(enabled: bool) -> Self {
            let pid = match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("Cannot resolve current PID, monitoring disabled: {}", e);
                    None
                }
            };

            let system = if enabled {
                System::new_with_specifics(RefreshKind::everything())
            } else {
                System::new()
            };

            Self {
                system: Mutex::new(system),
                pid,
                started: Instant::now(),
                peak_memory_mb: AtomicU64::new(0),
                predictions: AtomicU64::new(0),
                enabled: enabled && pid.is_some(),
            }
        }

        pub fn sample(&self) -> Option<ResourceSample> {
            if !self.enabled {
                return None;
            }

            let mut system = self.system.lock().ok()?;
            system.refresh_all();
            let process = system.process(self.pid?)?;

            let memory_mb = process.memory() / 1024 / 1024;
            let previous = self.peak_memory_mb.fetch_max(memory_mb, Ordering::Relaxed);

            Some(ResourceSample {
                cpu_usage: process.cpu_usage(),
                memory_mb,
                peak_memory_mb: previous.max(memory_mb),
                uptime: self.started.elapsed(),
            })
        }

        pub fn record(&self, phase: MonitorPhase) {
            if let MonitorPhase::Prediction { .. } = phase {
                self.predictions.fetch_add(1, Ordering::Relaxed);
            }

            if let Some(sample) = self.sample() {
                tracing::info!(
                    "📊 {} - CPU: {:.1}%, RSS: {}MB, Peak RSS: {}MB, Uptime: {:?}",
                    phase,
                    sample.cpu_usage,
                    sample.memory_mb,
                    sample.peak_memory_mb,
                    sample.uptime
                );
            }
        }

        pub fn log_final_stats(&self) {
            if let Some(sample) = self.sample() {
                tracing::info!(
                    "📊 Served {} prediction(s) in {:?}, Peak RSS: {}MB",
                    self.predictions.load(Ordering::Relaxed),
                    sample.uptime,
                    sample.peak_memory_mb
                );
            }
        }

        pub fn is_enabled(&self) -> bool {
            self.enabled
        }

        pub fn predictions(&self) -> u64 {
            self.predictions.load(Ordering::Relaxed)
        }
    }

    impl Default for SystemMonitor {
        fn default() -> Self {
            Self::new(false)
        }
    }
}

// Lambda 建置不含 sysinfo
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn record(&self, _phase: MonitorPhase) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_labels() {
        assert_eq!(
            MonitorPhase::EnvironmentSetup { packages: 3 }.to_string(),
            "Environment setup (3 packages)"
        );
        assert_eq!(
            MonitorPhase::Prediction { elements: 4 }.to_string(),
            "Prediction (4 elements)"
        );
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_disabled_monitor_still_counts_predictions() {
        let monitor = SystemMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert!(monitor.sample().is_none());

        monitor.record(MonitorPhase::EnvironmentSetup { packages: 10 });
        monitor.record(MonitorPhase::Prediction { elements: 4 });
        monitor.record(MonitorPhase::Prediction { elements: 1 });
        assert_eq!(monitor.predictions(), 2);
    }
}
