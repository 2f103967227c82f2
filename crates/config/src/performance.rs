//! Pipeline performance knobs (spec §6 `performance.*` keys, §5 concurrency
//! model).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Fixed design constant; present as a config field for visibility, not
    /// because it is meant to be tuned (spec §3).
    #[serde(default = "default_wpm")]
    pub words_per_minute: u32,
    #[serde(default = "default_tolerance_pct")]
    pub tolerance_percent: f32,
    #[serde(default = "default_max_concurrent_agents")]
    pub max_concurrent_agents: usize,
    /// **[ADD]** Cross-job concurrency cap (spec §9 Open Question), not
    /// present in the distilled spec's key list but required to answer it.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
    /// Per-model-call timeout in seconds (spec §5).
    #[serde(default = "default_model_timeout_secs")]
    pub model_timeout_secs: u64,
}

fn default_wpm() -> u32 {
    150
}
fn default_tolerance_pct() -> f32 {
    5.0
}
fn default_max_concurrent_agents() -> usize {
    5
}
fn default_max_concurrent_jobs() -> usize {
    num_cpus::get()
}
fn default_model_timeout_secs() -> u64 {
    60
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            words_per_minute: default_wpm(),
            tolerance_percent: default_tolerance_pct(),
            max_concurrent_agents: default_max_concurrent_agents(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
            model_timeout_secs: default_model_timeout_secs(),
        }
    }
}

impl PerformanceConfig {
    /// Soft wall-clock budget for a job, used only for user-facing ETA
    /// (spec §5: "12x durationMin seconds").
    pub fn soft_wall_clock_budget_secs(duration_min: u32) -> u64 {
        duration_min as u64 * 12
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let perf = PerformanceConfig::default();
        assert_eq!(perf.words_per_minute, 150);
        assert_eq!(perf.tolerance_percent, 5.0);
        assert_eq!(perf.max_concurrent_agents, 5);
    }

    #[test]
    fn max_concurrent_jobs_defaults_to_cpu_count() {
        let perf = PerformanceConfig::default();
        assert_eq!(perf.max_concurrent_jobs, num_cpus::get());
    }

    #[test]
    fn soft_wall_clock_budget_scales_with_duration() {
        assert_eq!(PerformanceConfig::soft_wall_clock_budget_secs(5), 60);
    }
}
