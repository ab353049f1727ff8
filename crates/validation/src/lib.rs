//! `clubhub-validation` — structural field validators.
//!
//! Checked before any policy decision: a request carrying a malformed email
//! or an event dated in the past never reaches the role rules. Every
//! predicate answers `bool` and never panics.

pub mod config;
pub mod form;
pub mod gate;

pub use config::{ConfigError, ValidationLimits};
pub use form::{FieldError, validate_new_event, validate_new_user};
pub use gate::{
    ValidationGate, can_mark_attendance, can_register_for_event, is_valid_club_name,
    is_valid_date_range, is_valid_description, is_valid_email, is_valid_event_date,
    is_valid_event_date_at, is_valid_event_name, is_valid_full_name,
    is_valid_pagination_parameters, is_valid_password, is_valid_phone, is_valid_report_title,
    is_valid_semester, is_valid_student_id,
};
