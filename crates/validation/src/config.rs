//! Tunable thresholds for the validators.
//!
//! Defaults match the documented contracts; deployments may override them
//! through `CLUBHUB_*` environment variables without changing any function
//! signature.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: String, value: String },

    #[error("inconsistent limits: {0}")]
    Inconsistent(String),
}

/// Length bounds are inclusive and counted in characters. Time offsets are
/// in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_email_len: usize,
    pub min_password_len: usize,
    pub min_student_id_digits: usize,
    pub max_student_id_digits: usize,
    pub min_full_name_len: usize,
    pub max_full_name_len: usize,
    pub min_club_name_len: usize,
    pub max_club_name_len: usize,
    pub min_description_len: usize,
    pub max_description_len: usize,
    pub min_event_name_len: usize,
    pub max_event_name_len: usize,
    pub min_report_title_len: usize,
    pub max_report_title_len: usize,
    pub max_page_size: i64,
    /// New events must start at least this far in the future.
    pub event_lead_minutes: i64,
    /// Registration closes this long before the event starts.
    pub registration_cutoff_minutes: i64,
    pub attendance_open_minutes_before: i64,
    pub attendance_close_minutes_after: i64,
}

impl ValidationLimits {
    pub const DEFAULT: ValidationLimits = ValidationLimits {
        max_email_len: 254,
        min_password_len: 8,
        min_student_id_digits: 8,
        max_student_id_digits: 10,
        min_full_name_len: 2,
        max_full_name_len: 100,
        min_club_name_len: 3,
        max_club_name_len: 100,
        min_description_len: 10,
        max_description_len: 1000,
        min_event_name_len: 3,
        max_event_name_len: 200,
        min_report_title_len: 5,
        max_report_title_len: 200,
        max_page_size: 100,
        event_lead_minutes: 60,
        registration_cutoff_minutes: 60,
        attendance_open_minutes_before: 60,
        attendance_close_minutes_after: 24 * 60,
    };

    /// Defaults, overridden by any `CLUBHUB_<FIELD>` variable that is set
    /// (e.g. `CLUBHUB_MAX_PAGE_SIZE=50`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut limits = Self::DEFAULT;

        macro_rules! overrides {
            ($($field:ident => $var:literal),* $(,)?) => {
                $( override_field(&lookup, $var, &mut limits.$field)?; )*
            };
        }

        overrides! {
            max_email_len => "CLUBHUB_MAX_EMAIL_LEN",
            min_password_len => "CLUBHUB_MIN_PASSWORD_LEN",
            min_student_id_digits => "CLUBHUB_MIN_STUDENT_ID_DIGITS",
            max_student_id_digits => "CLUBHUB_MAX_STUDENT_ID_DIGITS",
            min_full_name_len => "CLUBHUB_MIN_FULL_NAME_LEN",
            max_full_name_len => "CLUBHUB_MAX_FULL_NAME_LEN",
            min_club_name_len => "CLUBHUB_MIN_CLUB_NAME_LEN",
            max_club_name_len => "CLUBHUB_MAX_CLUB_NAME_LEN",
            min_description_len => "CLUBHUB_MIN_DESCRIPTION_LEN",
            max_description_len => "CLUBHUB_MAX_DESCRIPTION_LEN",
            min_event_name_len => "CLUBHUB_MIN_EVENT_NAME_LEN",
            max_event_name_len => "CLUBHUB_MAX_EVENT_NAME_LEN",
            min_report_title_len => "CLUBHUB_MIN_REPORT_TITLE_LEN",
            max_report_title_len => "CLUBHUB_MAX_REPORT_TITLE_LEN",
            max_page_size => "CLUBHUB_MAX_PAGE_SIZE",
            event_lead_minutes => "CLUBHUB_EVENT_LEAD_MINUTES",
            registration_cutoff_minutes => "CLUBHUB_REGISTRATION_CUTOFF_MINUTES",
            attendance_open_minutes_before => "CLUBHUB_ATTENDANCE_OPEN_MINUTES_BEFORE",
            attendance_close_minutes_after => "CLUBHUB_ATTENDANCE_CLOSE_MINUTES_AFTER",
        }

        limits.validate()?;
        Ok(limits)
    }

    /// Reject limit sets no input could satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            ("student id digits", self.min_student_id_digits, self.max_student_id_digits),
            ("full name", self.min_full_name_len, self.max_full_name_len),
            ("club name", self.min_club_name_len, self.max_club_name_len),
            ("description", self.min_description_len, self.max_description_len),
            ("event name", self.min_event_name_len, self.max_event_name_len),
            ("report title", self.min_report_title_len, self.max_report_title_len),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(ConfigError::Inconsistent(format!(
                    "{name}: minimum {min} exceeds maximum {max}"
                )));
            }
        }

        if self.max_page_size <= 0 {
            return Err(ConfigError::Inconsistent("max page size must be positive".into()));
        }

        let offsets = [
            self.event_lead_minutes,
            self.registration_cutoff_minutes,
            self.attendance_open_minutes_before,
            self.attendance_close_minutes_after,
        ];
        if offsets.iter().any(|m| *m < 0) {
            return Err(ConfigError::Inconsistent("time offsets must not be negative".into()));
        }

        Ok(())
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn override_field<F, T>(lookup: &F, var: &str, field: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(var) else {
        return Ok(());
    };

    *field = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        value: raw.clone(),
    })?;
    tracing::debug!(var, value = %raw.trim(), "validation limit overridden");
    Ok(())
}
