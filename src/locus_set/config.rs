use serde::{Deserialize, Serialize};

use crate::with_field_fn;

/// Environment variable providing the default for
/// [`LocusSetConfig::check_interval`].
pub const CHECK_INTERVAL_ENV: &str = "SVLOCUS_CHECK_INTERVAL";

/// Runtime options of a [`LocusSet`](crate::LocusSet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusSetConfig {
    /// Run the full consistency check after every `n`-th merge.
    pub check_interval: Option<usize>,
    /// Run the full consistency check after loading a snapshot. The index
    /// is rebuilt and checked for overlaps regardless.
    pub verify_on_load: bool,
}

impl Default for LocusSetConfig {
    fn default() -> Self {
        let check_interval = std::env::var(CHECK_INTERVAL_ENV)
            .ok()
            .and_then(|str| str.parse::<usize>().ok())
            .filter(|n| *n > 0);
        Self {
            check_interval,
            verify_on_load: true,
        }
    }
}

impl LocusSetConfig {
    with_field_fn!(check_interval, Option<usize>);
    with_field_fn!(verify_on_load, bool);

    /// Whether the merge with the given ordinal (1-based) is followed by a
    /// consistency check.
    pub fn should_check(
        &self,
        merge_count: usize,
    ) -> bool {
        match self.check_interval {
            Some(n) if n > 0 => merge_count % n == 0,
            _ => false,
        }
    }
}
