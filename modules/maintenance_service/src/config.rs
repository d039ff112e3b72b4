//! Configuration for the maintenance service module

use serde::{Deserialize, Serialize};

/// Maintenance service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum length of a lookup description
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,

    /// Maximum length of a note or note comment
    #[serde(default = "default_max_note_length")]
    pub max_note_length: usize,

    /// Report period (days, ending today) when no dates are given
    #[serde(default = "default_report_days")]
    pub default_report_days: u32,

    /// Prefix of every exported report title
    #[serde(default = "default_report_title_prefix")]
    pub report_title_prefix: String,

    /// Refuse jobs dated after today
    #[serde(default = "default_true")]
    pub reject_future_job_dates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_description_length: default_max_description_length(),
            max_note_length: default_max_note_length(),
            default_report_days: default_report_days(),
            report_title_prefix: default_report_title_prefix(),
            reject_future_job_dates: true,
        }
    }
}

fn default_max_description_length() -> usize {
    100
}

fn default_max_note_length() -> usize {
    2000
}

fn default_report_days() -> u32 {
    30
}

fn default_report_title_prefix() -> String {
    "MineTrack".to_string()
}

fn default_true() -> bool {
    true
}
