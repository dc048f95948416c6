//! Derivation engine — computes dependent fields from what was supplied.
//!
//! Pure function over a [`ContractDraft`]: given workload and one salary
//! figure, fill in the rest (weekly hours, monthly hours, the other salary
//! representations). Runs after every successful extraction, before
//! validation, so the review block always shows a complete picture.
//!
//! Baseline assumptions: a 100% workload is 42 hours/week, a year has 52
//! working weeks, and an annual salary is 12 monthly salaries.

use crate::contract::{ContractDraft, ContractVersion};
use tracing::debug;

/// Full-time weekly hours at 100% workload.
const FULL_TIME_WEEKLY_HOURS: f64 = 42.0;

/// Working weeks per year.
const WEEKS_PER_YEAR: f64 = 52.0;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A supplied-and-nonzero numeric field. Zeroes are treated the same as
/// absent for derivation triggers (they still fail validation separately).
fn given(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x != 0.0)
}

/// Derive all dependent fields, returning a new draft.
///
/// Supplied values are never overwritten except where a version's rules say
/// otherwise (an hourly-rate contract keeps its stated monthly hours rather
/// than the workload-implied figure).
pub fn derive(draft: &ContractDraft) -> ContractDraft {
    let mut out = draft.clone();
    let version = draft.contract_version;

    // Hourly-rate contracts may state monthly hours instead of a workload
    // percentage; back-fill the percentage from the hours.
    if version == Some(ContractVersion::C)
        && given(out.workload_percentage).is_none()
        && let Some(month_hours) = given(out.hourly_workload_per_month)
    {
        let workload =
            month_hours * 12.0 / (FULL_TIME_WEEKLY_HOURS * WEEKS_PER_YEAR) * 100.0;
        out.workload_percentage = Some(round2(workload));
        debug!(month_hours, workload = out.workload_percentage, "derived workload from monthly hours");
    }

    // Workload → weekly hours → monthly hours. Unrounded intermediates feed
    // the next step; the draft stores the rounded figures.
    if let Some(workload) = given(out.workload_percentage) {
        let weekly = workload / 100.0 * FULL_TIME_WEEKLY_HOURS;
        out.weekly_working_hours = Some(round2(weekly));

        let keep_supplied_hours =
            version == Some(ContractVersion::C) && given(draft.hourly_workload_per_month).is_some();
        if !keep_supplied_hours {
            out.hourly_workload_per_month = Some(round2(weekly * WEEKS_PER_YEAR / 12.0));
        }
    }

    match version {
        Some(ContractVersion::A | ContractVersion::D | ContractVersion::A1) => {
            if let Some(annual) = given(out.annual_gross_salary) {
                let monthly = annual / 12.0;
                out.monthly_gross_salary = Some(round2(monthly));
                if let Some(month_hours) = given(out.hourly_workload_per_month) {
                    out.hourly_salary = Some(round2(monthly / month_hours));
                }
            }
        }
        Some(ContractVersion::B) => {
            if let Some(monthly) = given(out.monthly_gross_salary) {
                out.annual_gross_salary = Some(round2(monthly * 12.0));
                if let Some(month_hours) = given(out.hourly_workload_per_month) {
                    out.hourly_salary = Some(round2(monthly / month_hours));
                }
            }
        }
        Some(ContractVersion::C) => {
            if let (Some(hourly), Some(month_hours)) =
                (given(out.hourly_salary), given(out.hourly_workload_per_month))
            {
                let monthly = hourly * month_hours;
                out.monthly_gross_salary = Some(round2(monthly));
                out.annual_gross_salary = Some(round2(monthly * 12.0));
            }
        }
        None => {}
    }

    out
}
