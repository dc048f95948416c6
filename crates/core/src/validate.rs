//! Validation engine — pure checks over a derived draft.
//!
//! Returns a list of human-readable violation strings; an empty list means
//! the draft may proceed to the verification gate. Violations are phrased
//! for the model to relay back to the operator, so they name the field and
//! the expected shape.

use crate::contract::{AUTHORIZED_SIGNATORIES, ContractDraft, ContractVersion};
use tracing::debug;

/// Fields every contract version requires.
const COMMON_REQUIRED: [&str; 7] = [
    "full_name",
    "gender",
    "job_title",
    "start_date",
    "contract_signing_date",
    "company_representative",
    "worker_representative",
];

/// Validates drafts against required-field, range, signatory, and date rules.
pub struct Validator {
    signatories: Vec<String>,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            signatories: AUTHORIZED_SIGNATORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Validator {
    /// A validator with a custom signatory list (from configuration).
    pub fn with_signatories(signatories: Vec<String>) -> Self {
        if signatories.is_empty() {
            return Self::default();
        }
        Self { signatories }
    }

    /// Run all checks. Without a contract version nothing else can be
    /// judged, so that case short-circuits with a single violation.
    pub fn validate(&self, draft: &ContractDraft) -> Vec<String> {
        let Some(version) = draft.contract_version else {
            let violation = match &draft.unrecognized_version {
                Some(tag) => format!(
                    "Invalid contract_version: '{tag}'. Must be one of: A, B, C, D, A1"
                ),
                None => "Missing required field: contract_version. Must be one of: A, B, C, D, A1"
                    .to_string(),
            };
            return vec![violation];
        };

        let mut violations = Vec::new();

        for field in COMMON_REQUIRED {
            if draft.field_is_missing(field) {
                violations.push(format!("Missing required field: {field}"));
            }
        }
        for field in version.required_fields() {
            if draft.field_is_missing(field) {
                violations.push(format!(
                    "Missing required field for Version {version}: {field}"
                ));
            }
        }

        if let Some(gender) = draft.gender.as_deref() {
            let g = gender.trim().to_lowercase();
            if g != "male" && g != "female" {
                violations.push(format!(
                    "Invalid gender: '{gender}'. Must be 'male' or 'female'"
                ));
            }
        }

        self.check_signatory(
            "company representative",
            draft.company_representative.as_deref(),
            &mut violations,
        );
        self.check_signatory(
            "worker representative",
            draft.worker_representative.as_deref(),
            &mut violations,
        );

        if let Some(workload) = draft.workload_percentage
            && !(1.0..=100.0).contains(&workload)
        {
            violations.push(format!(
                "Invalid workload_percentage: {workload}. Must be between 1 and 100"
            ));
        }

        for (field, value) in [
            ("annual_gross_salary", draft.annual_gross_salary),
            ("monthly_gross_salary", draft.monthly_gross_salary),
            ("hourly_salary", draft.hourly_salary),
        ] {
            if let Some(v) = value
                && v <= 0.0
            {
                violations.push(format!("Invalid {field}: {v}. Must be positive"));
            }
        }

        // ISO dates compare correctly as strings.
        if let (Some(signing), Some(start)) =
            (draft.contract_signing_date.as_deref(), draft.start_date.as_deref())
            && signing > start
        {
            violations.push(format!(
                "Contract signing date ({signing}) must be on or before the start date ({start})"
            ));
        }

        if version == ContractVersion::B
            && let (Some(end), Some(start)) =
                (draft.end_date.as_deref(), draft.start_date.as_deref())
            && end <= start
        {
            violations.push(format!(
                "End date ({end}) must be after the start date ({start})"
            ));
        }

        if version.is_amendment()
            && let (Some(orig), Some(start)) = (
                draft.original_contract_starting_date.as_deref(),
                draft.start_date.as_deref(),
            )
            && orig > start
        {
            violations.push(format!(
                "Original contract start date ({orig}) must be on or before the new start date ({start})"
            ));
        }

        if !violations.is_empty() {
            debug!(count = violations.len(), version = %version, "draft failed validation");
        }
        violations
    }

    fn check_signatory(&self, label: &str, value: Option<&str>, violations: &mut Vec<String>) {
        let Some(name) = value.map(str::trim).filter(|s| !s.is_empty()) else {
            return;
        };
        // The field may carry titles or extra words, but it must contain a
        // full authorized name; fragments do not authorize.
        let lower = name.to_lowercase();
        let authorized = self
            .signatories
            .iter()
            .any(|s| lower.contains(&s.to_lowercase()));
        if !authorized {
            violations.push(format!(
                "Unauthorized {label}: '{name}'. Must be one of: {}",
                self.signatories.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractVersion;
    use crate::derive::derive;

    fn complete_draft_a() -> ContractDraft {
        ContractDraft {
            contract_version: Some(ContractVersion::A),
            full_name: Some("Jane Doe".into()),
            gender: Some("female".into()),
            job_title: Some("Software Engineer".into()),
            start_date: Some("2026-10-01".into()),
            contract_signing_date: Some("2026-09-15".into()),
            company_representative: Some("Matthias Pfister".into()),
            worker_representative: Some("Louisa Hugenschmidt".into()),
            workload_percentage: Some(80.0),
            annual_gross_salary: Some(96_000.0),
            ..ContractDraft::default()
        }
    }

    #[test]
    fn missing_version_short_circuits() {
        let violations = Validator::default().validate(&ContractDraft::default());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("Missing required field: contract_version"));
    }

    #[test]
    fn unknown_version_tag_is_echoed() {
        let draft = ContractDraft::from_value(&serde_json::json!({
            "contract_version": "Z",
            "full_name": "Jane Doe",
        }));
        let violations = Validator::default().validate(&draft);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("Invalid contract_version: 'Z'"));
        assert!(violations[0].contains("A, B, C, D, A1"));
    }

    #[test]
    fn complete_draft_passes() {
        let draft = derive(&complete_draft_a());
        assert!(Validator::default().validate(&draft).is_empty());
    }

    #[test]
    fn reports_missing_common_and_version_fields() {
        let draft = ContractDraft {
            contract_version: Some(ContractVersion::B),
            full_name: Some("Jane Doe".into()),
            ..ContractDraft::default()
        };
        let violations = Validator::default().validate(&draft);
        assert!(violations.iter().any(|v| v == "Missing required field: gender"));
        assert!(
            violations
                .iter()
                .any(|v| v == "Missing required field for Version B: end_date")
        );
        assert!(
            violations
                .iter()
                .any(|v| v == "Missing required field for Version B: monthly_gross_salary")
        );
    }

    #[test]
    fn rejects_unknown_gender() {
        let mut draft = complete_draft_a();
        draft.gender = Some("other".into());
        let violations = Validator::default().validate(&draft);
        assert!(violations.iter().any(|v| v.contains("Invalid gender: 'other'")));
    }

    #[test]
    fn gender_is_case_insensitive() {
        let mut draft = complete_draft_a();
        draft.gender = Some("Female".into());
        assert!(Validator::default().validate(&draft).is_empty());
    }

    #[test]
    fn rejects_unauthorized_signatory() {
        let mut draft = complete_draft_a();
        draft.company_representative = Some("John Smith".into());
        let violations = Validator::default().validate(&draft);
        assert!(
            violations
                .iter()
                .any(|v| v.contains("Unauthorized company representative: 'John Smith'"))
        );
        assert!(violations[0].contains("Matthias Pfister"));
    }

    #[test]
    fn signatory_field_must_contain_full_authorized_name() {
        let mut draft = complete_draft_a();
        draft.company_representative = Some("michael grass".into());
        draft.worker_representative = Some("Dr. Matthias Pfister".into());
        assert!(Validator::default().validate(&draft).is_empty());
    }

    #[test]
    fn signatory_name_fragments_are_rejected() {
        let mut draft = complete_draft_a();
        draft.company_representative = Some("Pfister".into());
        draft.worker_representative = Some("Claude".into());
        let violations = Validator::default().validate(&draft);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("Unauthorized company representative: 'Pfister'"));
        assert!(violations[1].contains("Unauthorized worker representative: 'Claude'"));
    }

    #[test]
    fn workload_must_be_in_range() {
        let mut draft = complete_draft_a();
        draft.workload_percentage = Some(120.0);
        let violations = Validator::default().validate(&draft);
        assert!(violations.iter().any(|v| v.contains("workload_percentage: 120")));

        draft.workload_percentage = Some(0.5);
        let violations = Validator::default().validate(&draft);
        assert!(violations.iter().any(|v| v.contains("between 1 and 100")));
    }

    #[test]
    fn workload_boundary_values() {
        let mut draft = complete_draft_a();
        for (value, valid) in [(0.0, false), (1.0, true), (100.0, true), (101.0, false)] {
            draft.workload_percentage = Some(value);
            let violations = Validator::default().validate(&draft);
            let flagged = violations.iter().any(|v| v.contains("workload_percentage"));
            assert_eq!(flagged, !valid, "workload {value}");
        }
    }

    #[test]
    fn salaries_must_be_positive() {
        let mut draft = complete_draft_a();
        draft.annual_gross_salary = Some(-1000.0);
        let violations = Validator::default().validate(&draft);
        assert!(
            violations
                .iter()
                .any(|v| v.contains("Invalid annual_gross_salary: -1000"))
        );
    }

    #[test]
    fn signing_after_start_is_flagged() {
        let mut draft = complete_draft_a();
        draft.contract_signing_date = Some("2026-10-15".into());
        let violations = Validator::default().validate(&draft);
        assert!(violations.iter().any(|v| v.contains("signing date")));
    }

    #[test]
    fn signing_on_start_date_is_allowed() {
        let mut draft = complete_draft_a();
        draft.contract_signing_date = Some("2026-10-01".into());
        assert!(Validator::default().validate(&draft).is_empty());
    }

    #[test]
    fn fixed_term_end_must_follow_start() {
        let mut draft = complete_draft_a();
        draft.contract_version = Some(ContractVersion::B);
        draft.monthly_gross_salary = Some(8_000.0);
        draft.end_date = Some("2026-10-01".into());
        let violations = Validator::default().validate(&draft);
        assert!(violations.iter().any(|v| v.contains("End date")));

        draft.end_date = Some("2027-09-30".into());
        assert!(Validator::default().validate(&draft).is_empty());
    }

    #[test]
    fn stray_end_date_is_ignored_outside_fixed_term() {
        let mut draft = complete_draft_a();
        draft.end_date = Some("2026-05-01".into());
        assert!(Validator::default().validate(&draft).is_empty());
    }

    #[test]
    fn amendment_original_start_must_precede_new_start() {
        let mut draft = complete_draft_a();
        draft.contract_version = Some(ContractVersion::D);
        draft.original_contract_starting_date = Some("2027-01-01".into());
        draft.original_contract_signing_date = Some("2026-12-01".into());
        let violations = Validator::default().validate(&draft);
        assert!(
            violations
                .iter()
                .any(|v| v.contains("Original contract start date"))
        );
    }

    #[test]
    fn custom_signatory_list() {
        let validator = Validator::with_signatories(vec!["Ada Lovelace".into()]);
        let mut draft = complete_draft_a();
        draft.company_representative = Some("Ada Lovelace".into());
        draft.worker_representative = Some("Ada Lovelace".into());
        assert!(validator.validate(&draft).is_empty());

        draft.company_representative = Some("Matthias Pfister".into());
        assert!(!validator.validate(&draft).is_empty());
    }
}
