//! `clubhub-policy` command implementations.
//!
//! ```text
//! clubhub-policy decide                   < request.json
//! clubhub-policy validate <field> <value>...
//! clubhub-policy roles <role>
//! ```

use std::io::{Read, Write};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};

use clubhub_auth::{Decision, DecisionRequest, Role, evaluate};
use clubhub_validation::{ValidationGate, ValidationLimits};

pub const USAGE: &str = "usage: clubhub-policy <decide | validate <field> <value>... | roles <role>>";

pub fn run<R: Read, W: Write>(
    args: &[String],
    mut input: R,
    mut output: W,
    limits: ValidationLimits,
) -> anyhow::Result<()> {
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    match command.as_str() {
        "decide" => {
            let mut raw = String::new();
            input
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            let decision = decide_json(&raw, Utc::now());
            serde_json::to_writer(&mut output, &decision)?;
            writeln!(output)?;
        }
        "validate" => {
            let gate = ValidationGate::new(limits);
            let Some((field, values)) = rest.split_first() else {
                bail!(USAGE);
            };
            let valid = validate_field(&gate, field, values, Utc::now())?;
            writeln!(output, "{valid}")?;
        }
        "roles" => {
            let Some(role) = rest.first() else {
                bail!(USAGE);
            };
            let role: Role = role.parse()?;
            serde_json::to_writer(&mut output, &role.assignable_roles())?;
            writeln!(output)?;
        }
        other => bail!("unknown command '{other}'\n{USAGE}"),
    }

    Ok(())
}

/// Decide a JSON request. Unreadable JSON is a denial, not an error.
pub fn decide_json(raw: &str, now: DateTime<Utc>) -> Decision {
    match serde_json::from_str::<DecisionRequest>(raw) {
        Ok(request) => evaluate(&request, now),
        Err(err) => {
            tracing::debug!(error = %err, "unreadable decision request");
            Decision::malformed(format!("invalid request json: {err}"))
        }
    }
}

/// Run one named validator. Unknown fields are usage errors; bad values
/// simply validate to `false`.
pub fn validate_field(
    gate: &ValidationGate,
    field: &str,
    values: &[String],
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let first = values.first().map(String::as_str).unwrap_or("");

    let valid = match field {
        "email" => gate.is_valid_email(first),
        "student-id" => gate.is_valid_student_id(first),
        "password" => gate.is_valid_password(first),
        "full-name" => gate.is_valid_full_name(&values.join(" ")),
        "club-name" => gate.is_valid_club_name(&values.join(" ")),
        "description" => gate.is_valid_description(&values.join(" ")),
        "event-name" => gate.is_valid_event_name(&values.join(" ")),
        "report-title" => gate.is_valid_report_title(&values.join(" ")),
        "semester" => gate.is_valid_semester(&values.join(" ")),
        "phone" => gate.is_valid_phone(&values.join(" ")),
        "event-date" => parse_date(first).is_some_and(|d| gate.is_valid_event_date_at(d, now)),
        "date-range" => {
            let from = values.first().map(|v| parse_date(v));
            let to = values.get(1).map(|v| parse_date(v));
            match (from, to) {
                // A bound that was given but did not parse is invalid.
                (Some(None), _) | (_, Some(None)) => false,
                (from, to) => gate.is_valid_date_range(from.flatten(), to.flatten()),
            }
        }
        "pagination" => {
            let page = values.first().and_then(|v| v.parse::<i64>().ok());
            let size = values.get(1).and_then(|v| v.parse::<i64>().ok());
            match (page, size) {
                (Some(page), Some(size)) => gate.is_valid_pagination_parameters(page, size),
                _ => false,
            }
        }
        other => bail!("unknown field '{other}'"),
    };

    Ok(valid)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
