//! Field-level predicates.
//!
//! [`ValidationGate`] carries the limits; the free functions use
//! [`ValidationLimits::DEFAULT`].

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ValidationLimits;

// Compiled once. A pattern that fails to compile leaves `None`, which makes
// the matching predicate answer `false`.
static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .ok()
});

static SEMESTER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(Spring|Summer|Fall) [0-9]{4}$").ok());

fn is_match(pattern: &Lazy<Option<Regex>>, s: &str) -> bool {
    let compiled: &Option<Regex> = pattern;
    compiled.as_ref().is_some_and(|re| re.is_match(s))
}

fn char_len_within(s: &str, min: usize, max: usize) -> bool {
    let len = s.chars().count();
    (min..=max).contains(&len)
}

/// Non-blank text whose length, padding included, is within `[min, max]`.
fn text_within(s: &str, min: usize, max: usize) -> bool {
    !s.trim().is_empty() && char_len_within(s, min, max)
}

fn minutes(n: i64) -> Option<Duration> {
    Duration::try_minutes(n)
}

/// Validators bound to a set of limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationGate {
    limits: ValidationLimits,
}

impl ValidationGate {
    pub const DEFAULT: ValidationGate = ValidationGate::new(ValidationLimits::DEFAULT);

    pub const fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    pub fn is_valid_email(&self, s: &str) -> bool {
        !s.is_empty() && s.len() <= self.limits.max_email_len && is_match(&EMAIL, s)
    }

    pub fn is_valid_student_id(&self, s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit())
            && (self.limits.min_student_id_digits..=self.limits.max_student_id_digits)
                .contains(&s.len())
    }

    /// At least the minimum length, with an uppercase letter, a lowercase
    /// letter, a digit and a symbol (anything that is neither a word
    /// character nor whitespace).
    pub fn is_valid_password(&self, s: &str) -> bool {
        if s.chars().count() < self.limits.min_password_len {
            return false;
        }

        let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = s.chars().any(|c| c.is_ascii_digit());
        let has_symbol = s
            .chars()
            .any(|c| !c.is_alphanumeric() && c != '_' && !c.is_whitespace());

        has_upper && has_lower && has_digit && has_symbol
    }

    /// Letters, spaces, hyphens and apostrophes only.
    pub fn is_valid_full_name(&self, s: &str) -> bool {
        text_within(
            s,
            self.limits.min_full_name_len,
            self.limits.max_full_name_len,
        ) && s
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
    }

    pub fn is_valid_club_name(&self, s: &str) -> bool {
        text_within(s, self.limits.min_club_name_len, self.limits.max_club_name_len)
    }

    pub fn is_valid_description(&self, s: &str) -> bool {
        text_within(
            s,
            self.limits.min_description_len,
            self.limits.max_description_len,
        )
    }

    pub fn is_valid_event_name(&self, s: &str) -> bool {
        text_within(s, self.limits.min_event_name_len, self.limits.max_event_name_len)
    }

    /// New events must start at least the configured lead time after `now`.
    pub fn is_valid_event_date_at(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        minutes(self.limits.event_lead_minutes)
            .and_then(|lead| now.checked_add_signed(lead))
            .is_some_and(|earliest| date >= earliest)
    }

    pub fn is_valid_event_date(&self, date: DateTime<Utc>) -> bool {
        self.is_valid_event_date_at(date, Utc::now())
    }

    /// Registration is open until the cut-off before the event starts.
    pub fn can_register_for_event(
        &self,
        event_date: DateTime<Utc>,
        registration_date: DateTime<Utc>,
    ) -> bool {
        minutes(self.limits.registration_cutoff_minutes)
            .and_then(|cutoff| event_date.checked_sub_signed(cutoff))
            .is_some_and(|closes| registration_date <= closes)
    }

    /// Attendance may be taken from shortly before the start until a day after.
    pub fn can_mark_attendance(
        &self,
        event_date: DateTime<Utc>,
        attendance_date: DateTime<Utc>,
    ) -> bool {
        let opens = minutes(self.limits.attendance_open_minutes_before)
            .and_then(|before| event_date.checked_sub_signed(before));
        let closes = minutes(self.limits.attendance_close_minutes_after)
            .and_then(|after| event_date.checked_add_signed(after));

        match (opens, closes) {
            (Some(opens), Some(closes)) => opens <= attendance_date && attendance_date <= closes,
            _ => false,
        }
    }

    pub fn is_valid_report_title(&self, s: &str) -> bool {
        text_within(
            s,
            self.limits.min_report_title_len,
            self.limits.max_report_title_len,
        )
    }

    /// `Spring 2025`, `Summer 2025` or `Fall 2025`.
    pub fn is_valid_semester(&self, s: &str) -> bool {
        is_match(&SEMESTER, s)
    }

    pub fn is_valid_pagination_parameters(&self, page: i64, page_size: i64) -> bool {
        page > 0 && page_size > 0 && page_size <= self.limits.max_page_size
    }

    /// An open-ended range (either bound missing) is always valid.
    pub fn is_valid_date_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }

    /// Phone numbers are optional. When present: an optional leading `+`,
    /// then 7 to 15 digits, with spaces or hyphens allowed between them.
    pub fn is_valid_phone(&self, s: &str) -> bool {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return true;
        }

        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if !body.starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
        {
            return false;
        }

        let digits = body.chars().filter(char::is_ascii_digit).count();
        (7..=15).contains(&digits)
    }
}

pub fn is_valid_email(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_email(s)
}

pub fn is_valid_student_id(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_student_id(s)
}

pub fn is_valid_password(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_password(s)
}

pub fn is_valid_full_name(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_full_name(s)
}

pub fn is_valid_club_name(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_club_name(s)
}

pub fn is_valid_description(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_description(s)
}

pub fn is_valid_event_name(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_event_name(s)
}

pub fn is_valid_event_date(date: DateTime<Utc>) -> bool {
    ValidationGate::DEFAULT.is_valid_event_date(date)
}

pub fn is_valid_event_date_at(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    ValidationGate::DEFAULT.is_valid_event_date_at(date, now)
}

pub fn can_register_for_event(event_date: DateTime<Utc>, registration_date: DateTime<Utc>) -> bool {
    ValidationGate::DEFAULT.can_register_for_event(event_date, registration_date)
}

pub fn can_mark_attendance(event_date: DateTime<Utc>, attendance_date: DateTime<Utc>) -> bool {
    ValidationGate::DEFAULT.can_mark_attendance(event_date, attendance_date)
}

pub fn is_valid_report_title(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_report_title(s)
}

pub fn is_valid_semester(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_semester(s)
}

pub fn is_valid_pagination_parameters(page: i64, page_size: i64) -> bool {
    ValidationGate::DEFAULT.is_valid_pagination_parameters(page, page_size)
}

pub fn is_valid_date_range(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    ValidationGate::DEFAULT.is_valid_date_range(from, to)
}

pub fn is_valid_phone(s: &str) -> bool {
    ValidationGate::DEFAULT.is_valid_phone(s)
}
