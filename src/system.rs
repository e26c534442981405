//! Host facts and per-request system snapshots.
//!
//! Lookups go through the [`SystemFacts`] trait so handlers can be tested
//! against a fake host. A failed lookup is not an error: the snapshot carries
//! a placeholder instead.

use serde::Serialize;
use sysinfo::System;
use tracing::debug;

/// Placeholder for facts the host could not provide.
pub const UNKNOWN: &str = "unknown";

/// CPU count reported when the host cannot be queried.
pub const FALLBACK_CPU_COUNT: usize = 1;

/// Source of host facts.
pub trait SystemFacts: Send + Sync {
    /// Host name.
    fn hostname(&self) -> Option<String>;

    /// Number of logical CPUs.
    fn cpu_count(&self) -> Option<usize>;

    /// Operating system name, e.g. "Ubuntu".
    fn os_name(&self) -> Option<String>;

    /// Operating system version.
    fn os_version(&self) -> Option<String>;

    /// Kernel version.
    fn kernel_version(&self) -> Option<String>;
}

/// Facts read from the machine the process runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFacts;

impl SystemFacts for HostFacts {
    fn hostname(&self) -> Option<String> {
        System::host_name()
    }

    fn cpu_count(&self) -> Option<usize> {
        Some(num_cpus::get())
    }

    fn os_name(&self) -> Option<String> {
        System::name()
    }

    fn os_version(&self) -> Option<String> {
        System::os_version()
    }

    fn kernel_version(&self) -> Option<String> {
        System::kernel_version()
    }
}

/// System facts for the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemSnapshot {
    /// Host name, or "unknown".
    pub hostname: String,
    /// Logical CPU count, always positive.
    pub cpu_count: usize,
    /// Operating system name.
    pub platform: String,
    /// Operating system version.
    pub platform_version: String,
    /// CPU architecture the binary was built for.
    pub architecture: &'static str,
    /// Kernel version.
    pub kernel_version: String,
}

impl SystemSnapshot {
    /// Query `facts` and fill gaps with placeholders.
    pub fn collect(facts: &dyn SystemFacts) -> Self {
        Self {
            hostname: text_or_unknown("hostname", facts.hostname()),
            cpu_count: match facts.cpu_count() {
                Some(n) if n > 0 => n,
                other => {
                    debug!(reported = ?other, "cpu count unavailable, using fallback");
                    FALLBACK_CPU_COUNT
                }
            },
            platform: text_or_unknown("os_name", facts.os_name()),
            platform_version: text_or_unknown("os_version", facts.os_version()),
            architecture: std::env::consts::ARCH,
            kernel_version: text_or_unknown("kernel_version", facts.kernel_version()),
        }
    }
}

fn text_or_unknown(field: &'static str, value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            debug!(field, "host fact unavailable, using placeholder");
            UNKNOWN.to_string()
        }
    }
}
