use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Default heap capacity reserved up front by a new scheduler.
pub const DEFAULT_CAPACITY: usize = 64;

/// Largest capacity a scheduler will reserve up front. The heap still grows
/// past this on demand.
pub const MAX_CAPACITY: usize = 1 << 20;

// ── Env lookup helpers ────────────────────────────────────────

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = non_empty(lookup(&prefixed)) {
            return Some(v);
        }
    }
    non_empty(lookup(key))
}

/// Parse a profiled key, warning and falling back to `default` on bad input.
fn profiled_parse<F, T>(lookup: &F, profile: &str, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match profiled_opt(lookup, profile, key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "Invalid config value, using default");
                default
            }
        },
        None => default,
    }
}

// ── Duplicate policy ──────────────────────────────────────────

/// What the scheduler does when a task is added under an identifier that is
/// already resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Refuse the add and leave the resident task untouched.
    #[default]
    Reject,
    /// Treat the add as a priority change on the resident task.
    Overwrite,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(CoreError::InvalidSetting {
                key: "duplicate_policy".to_string(),
                value: other.to_string(),
                reason: "expected `reject` or `overwrite`".to_string(),
            }),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub scheduler: SchedulerSettings,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TASKHEAP_PROFILE`. When set (e.g. `BENCH`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. The profile itself is read
    /// through the same lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = non_empty(lookup("TASKHEAP_PROFILE")).unwrap_or_default();
        Self::from_lookup_profiled(&profile, lookup)
    }

    fn from_lookup_profiled<F>(profile: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let p = profile.to_uppercase();
        Self {
            scheduler: SchedulerSettings::from_lookup_profiled(&lookup, &p),
            profile: p,
        }
    }

    /// Build config from a dotenv-formatted file without touching the
    /// process environment.
    pub fn from_dotenv_file(path: &Path) -> Result<Self, CoreError> {
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Ok(Self::from_lookup(|key| vars.get(key).cloned()))
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  scheduler:   duplicate_policy={}, capacity={}",
            self.scheduler.duplicate_policy,
            self.scheduler.capacity
        );
    }
}

// ── Scheduler ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    pub duplicate_policy: DuplicatePolicy,
    /// Number of heap slots reserved up front.
    pub capacity: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SchedulerSettings {
    fn from_lookup_profiled<F>(lookup: &F, p: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut capacity = profiled_parse(lookup, p, "TASKHEAP_CAPACITY", DEFAULT_CAPACITY);
        if capacity > MAX_CAPACITY {
            tracing::warn!(capacity, max = MAX_CAPACITY, "TASKHEAP_CAPACITY too large, using default");
            capacity = DEFAULT_CAPACITY;
        }
        Self {
            duplicate_policy: profiled_parse(
                lookup,
                p,
                "TASKHEAP_DUPLICATE_POLICY",
                DuplicatePolicy::default(),
            ),
            capacity,
        }
    }

    /// Check the settings are usable. Capacity must not exceed
    /// [`MAX_CAPACITY`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.capacity > MAX_CAPACITY {
            return Err(CoreError::InvalidSetting {
                key: "capacity".to_string(),
                value: self.capacity.to_string(),
                reason: format!("must be at most {MAX_CAPACITY}"),
            });
        }
        Ok(())
    }

    /// Capacity to reserve up front, clamped to [`MAX_CAPACITY`].
    pub fn reserved_capacity(&self) -> usize {
        self.capacity.min(MAX_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.profile_label(), "default");
        assert_eq!(config.scheduler.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.scheduler.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn reads_unprefixed_keys() {
        let config = Config::from_lookup(lookup_from(&[
            ("TASKHEAP_DUPLICATE_POLICY", "overwrite"),
            ("TASKHEAP_CAPACITY", "128"),
        ]));
        assert_eq!(config.scheduler.duplicate_policy, DuplicatePolicy::Overwrite);
        assert_eq!(config.scheduler.capacity, 128);
    }

    #[test]
    fn profile_prefix_wins_over_plain_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("TASKHEAP_PROFILE", "bench"),
            ("TASKHEAP_CAPACITY", "16"),
            ("BENCH_TASKHEAP_CAPACITY", "4096"),
        ]));
        assert_eq!(config.profile, "BENCH");
        assert_eq!(config.profile_label(), "BENCH");
        assert_eq!(config.scheduler.capacity, 4096);
    }

    #[test]
    fn profile_falls_back_to_plain_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("TASKHEAP_PROFILE", "bench"),
            ("TASKHEAP_DUPLICATE_POLICY", "overwrite"),
        ]));
        assert_eq!(config.scheduler.duplicate_policy, DuplicatePolicy::Overwrite);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("TASKHEAP_DUPLICATE_POLICY", "ignore"),
            ("TASKHEAP_CAPACITY", "lots"),
        ]));
        assert_eq!(config.scheduler, SchedulerSettings::default());
    }

    #[test]
    fn empty_values_are_unset() {
        let config = Config::from_lookup(lookup_from(&[("TASKHEAP_CAPACITY", "")]));
        assert_eq!(config.scheduler.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn duplicate_policy_parsing() {
        assert_eq!("Reject".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Reject);
        assert_eq!(" OVERWRITE ".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Overwrite);
        assert!("keep-both".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::Overwrite.to_string(), "overwrite");
    }

    #[test]
    fn duplicate_policy_serde_is_lowercase() {
        let json = serde_json::to_string(&DuplicatePolicy::Overwrite).unwrap();
        assert_eq!(json, "\"overwrite\"");
        let back: DuplicatePolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(back, DuplicatePolicy::Reject);
    }

    #[test]
    fn loads_from_dotenv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# scheduler settings").unwrap();
        writeln!(file, "TASKHEAP_PROFILE=ci").unwrap();
        writeln!(file, "CI_TASKHEAP_DUPLICATE_POLICY=overwrite").unwrap();
        writeln!(file, "TASKHEAP_CAPACITY=8").unwrap();
        file.flush().unwrap();

        let config = Config::from_dotenv_file(file.path()).unwrap();
        assert_eq!(config.profile, "CI");
        assert_eq!(config.scheduler.duplicate_policy, DuplicatePolicy::Overwrite);
        assert_eq!(config.scheduler.capacity, 8);
    }

    #[test]
    fn missing_dotenv_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_dotenv_file(&dir.path().join("absent.env"));
        assert!(result.is_err());
    }

    #[test]
    fn oversized_capacity_from_env_falls_back() {
        let huge = usize::MAX.to_string();
        let config = Config::from_lookup(lookup_from(&[("TASKHEAP_CAPACITY", huge.as_str())]));
        assert_eq!(config.scheduler.capacity, DEFAULT_CAPACITY);
        assert!(config.scheduler.validate().is_ok());
    }

    #[test]
    fn validate_rejects_oversized_capacity() {
        let settings = SchedulerSettings {
            capacity: usize::MAX,
            ..SchedulerSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidSetting { ref key, .. } if key == "capacity"));
        assert_eq!(settings.reserved_capacity(), MAX_CAPACITY);

        let at_limit = SchedulerSettings {
            capacity: MAX_CAPACITY,
            ..SchedulerSettings::default()
        };
        assert!(at_limit.validate().is_ok());
        assert_eq!(at_limit.reserved_capacity(), MAX_CAPACITY);
    }
}
