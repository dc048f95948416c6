//! Employment-contract domain types.
//!
//! A [`ContractDraft`] accumulates fields over the course of one intake
//! conversation. Which fields are mandatory — and which derivation branch
//! applies — is decided by the [`ContractVersion`] tag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Signatories allowed to appear as company or worker representative.
pub const AUTHORIZED_SIGNATORIES: [&str; 5] = [
    "Matthias Pfister",
    "Louisa Hugenschmidt",
    "Michael Grass",
    "Claude Maurer",
    "Diana Trogrlić",
];

/// The closed set of supported contract scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractVersion {
    /// New employee, standard annual salary
    A,
    /// New employee, fixed term (requires an end date)
    B,
    /// New employee, hourly rate
    C,
    /// Existing employee, amendment
    D,
    /// Existing employee, amendment (alternate template)
    #[serde(rename = "A1")]
    A1,
}

impl ContractVersion {
    /// Parse a version tag, case-insensitively, tolerating whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "A1" => Some(Self::A1),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::A1 => "A1",
        }
    }

    /// Human-readable scenario name, shown in the review block.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::A => "New Employee (Standard)",
            Self::B => "New Employee (Fixed Term)",
            Self::C => "New Employee (Hourly Rate)",
            Self::D => "Existing Employee (Amendment)",
            Self::A1 => "Existing Employee (Amendment Alt.)",
        }
    }

    /// Amendment versions reference a prior original contract and finalize
    /// as an update rather than a create.
    pub fn is_amendment(&self) -> bool {
        matches!(self, Self::D | Self::A1)
    }

    /// Fields required by this version in addition to the common set.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::A => &["workload_percentage", "annual_gross_salary"],
            Self::B => &["end_date", "workload_percentage", "monthly_gross_salary"],
            Self::C => &["hourly_workload_per_month", "hourly_salary"],
            Self::D | Self::A1 => &[
                "workload_percentage",
                "annual_gross_salary",
                "original_contract_starting_date",
                "original_contract_signing_date",
            ],
        }
    }
}

impl std::fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The accumulating contract record for one intake session.
///
/// Every field is optional until the conversation supplies it. Dates are
/// normalized ISO `YYYY-MM-DD` strings; workload and compensation fields
/// are plain `f64` rounded to two decimals by the derivation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<ContractVersion>,

    /// A version tag that failed to parse, kept so validation can echo it.
    #[serde(skip)]
    pub unrecognized_version: Option<String>,

    // Identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    // Dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_signing_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_contract_starting_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_contract_signing_date: Option<String>,

    // Workload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_working_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_workload_per_month: Option<f64>,

    // Compensation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_gross_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_gross_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_salary: Option<f64>,

    // Signatories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_representative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_representative: Option<String>,
}

/// A non-empty, trimmed string field from a JSON object.
fn str_field(obj: &Value, key: &str) -> Option<String> {
    let s = obj.get(key)?.as_str()?.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// A numeric field from a JSON object, tolerating numbers-as-strings
/// ("50" alongside 50) since the payload comes out of free-form LLM text.
fn num_field(obj: &Value, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl ContractDraft {
    /// Build a draft leniently from an extracted JSON object.
    ///
    /// Missing, blank, or wrongly-typed fields are simply omitted — the
    /// validation engine reports what is actually missing.
    pub fn from_value(obj: &Value) -> Self {
        let version_raw = obj.get("contract_version").and_then(Value::as_str);
        let contract_version = version_raw.and_then(ContractVersion::parse);
        Self {
            contract_version,
            unrecognized_version: match contract_version {
                None => version_raw
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                Some(_) => None,
            },
            full_name: str_field(obj, "full_name"),
            gender: str_field(obj, "gender"),
            job_title: str_field(obj, "job_title"),
            start_date: str_field(obj, "start_date"),
            contract_signing_date: str_field(obj, "contract_signing_date"),
            end_date: str_field(obj, "end_date"),
            original_contract_starting_date: str_field(obj, "original_contract_starting_date"),
            original_contract_signing_date: str_field(obj, "original_contract_signing_date"),
            workload_percentage: num_field(obj, "workload_percentage"),
            weekly_working_hours: num_field(obj, "weekly_working_hours"),
            hourly_workload_per_month: num_field(obj, "hourly_workload_per_month"),
            annual_gross_salary: num_field(obj, "annual_gross_salary"),
            monthly_gross_salary: num_field(obj, "monthly_gross_salary"),
            hourly_salary: num_field(obj, "hourly_salary"),
            company_representative: str_field(obj, "company_representative"),
            worker_representative: str_field(obj, "worker_representative"),
        }
    }

    /// Whether a required field, addressed by its wire name, is absent.
    ///
    /// String fields count as absent when blank after trimming; numeric
    /// fields only when truly missing (a zero is present-but-invalid and is
    /// reported by the range/positivity checks instead).
    pub fn field_is_missing(&self, name: &str) -> bool {
        fn blank(s: &Option<String>) -> bool {
            s.as_deref().map(str::trim).unwrap_or("").is_empty()
        }
        match name {
            "contract_version" => self.contract_version.is_none(),
            "full_name" => blank(&self.full_name),
            "gender" => blank(&self.gender),
            "job_title" => blank(&self.job_title),
            "start_date" => blank(&self.start_date),
            "contract_signing_date" => blank(&self.contract_signing_date),
            "end_date" => blank(&self.end_date),
            "original_contract_starting_date" => blank(&self.original_contract_starting_date),
            "original_contract_signing_date" => blank(&self.original_contract_signing_date),
            "company_representative" => blank(&self.company_representative),
            "worker_representative" => blank(&self.worker_representative),
            "workload_percentage" => self.workload_percentage.is_none(),
            "weekly_working_hours" => self.weekly_working_hours.is_none(),
            "hourly_workload_per_month" => self.hourly_workload_per_month.is_none(),
            "annual_gross_salary" => self.annual_gross_salary.is_none(),
            "monthly_gross_salary" => self.monthly_gross_salary.is_none(),
            "hourly_salary" => self.hourly_salary.is_none(),
            _ => true,
        }
    }

    /// Plain-text review block shown at the human verification gate.
    pub fn summary(&self) -> String {
        fn s(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("—")
        }
        fn n(v: &Option<f64>) -> String {
            v.map_or_else(|| "—".to_string(), |x| format!("{x:.2}"))
        }

        let mut out = String::new();
        let line = "=".repeat(60);
        out.push_str(&format!("{line}\nCONTRACT DATA REVIEW\n{line}\n"));

        let version = self.contract_version;
        match version {
            Some(v) => out.push_str(&format!(
                "\nCONTRACT TYPE: Version {} - {}\n",
                v,
                v.display_name()
            )),
            None => out.push_str("\nCONTRACT TYPE: (not set)\n"),
        }

        out.push_str("\nEMPLOYEE:\n");
        out.push_str(&format!("   Name: {}\n", s(&self.full_name)));
        out.push_str(&format!("   Gender: {}\n", s(&self.gender)));
        out.push_str(&format!("   Title: {}\n", s(&self.job_title)));

        out.push_str("\nDATES:\n");
        out.push_str(&format!("   Start: {}\n", s(&self.start_date)));
        if version == Some(ContractVersion::B) {
            out.push_str(&format!("   End: {}\n", s(&self.end_date)));
        }
        out.push_str(&format!("   Signing: {}\n", s(&self.contract_signing_date)));

        if version.is_some_and(|v| v.is_amendment()) {
            out.push_str("\nORIGINAL CONTRACT:\n");
            out.push_str(&format!(
                "   Start: {}\n",
                s(&self.original_contract_starting_date)
            ));
            out.push_str(&format!(
                "   Signing: {}\n",
                s(&self.original_contract_signing_date)
            ));
        }

        out.push_str("\nWORKLOAD:\n");
        out.push_str(&format!(
            "   {}% ({} hrs/week)\n",
            n(&self.workload_percentage),
            n(&self.weekly_working_hours)
        ));

        out.push_str("\nSALARY (CHF):\n");
        if let Some(annual) = self.annual_gross_salary {
            out.push_str(&format!("   Annual: {annual:.2}\n"));
        }
        if let Some(monthly) = self.monthly_gross_salary {
            out.push_str(&format!("   Monthly: {monthly:.2}\n"));
        }
        if let Some(hourly) = self.hourly_salary {
            out.push_str(&format!("   Hourly: {hourly:.2}\n"));
        }

        out.push_str("\nSIGNATORIES:\n");
        out.push_str(&format!(
            "   Company: {}\n",
            s(&self.company_representative)
        ));
        out.push_str(&format!("   Worker: {}\n", s(&self.worker_representative)));
        out.push_str(&line);
        out
    }

    /// The flat field→value record emitted once a session finalizes.
    ///
    /// Version B adds the end date; amendment versions add both original
    /// contract dates. Absent fields are emitted as null.
    pub fn finalize(&self) -> serde_json::Map<String, Value> {
        fn sv(v: &Option<String>) -> Value {
            v.as_deref().map_or(Value::Null, |s| Value::String(s.to_string()))
        }
        fn nv(v: &Option<f64>) -> Value {
            v.and_then(|x| serde_json::Number::from_f64(x).map(Value::Number))
                .unwrap_or(Value::Null)
        }

        let mut record = serde_json::Map::new();
        record.insert(
            "contract_version".into(),
            self.contract_version
                .map_or(Value::Null, |v| Value::String(v.as_str().into())),
        );
        record.insert("full_name".into(), sv(&self.full_name));
        record.insert("gender".into(), sv(&self.gender));
        record.insert("job_title".into(), sv(&self.job_title));
        record.insert("start_date".into(), sv(&self.start_date));
        record.insert(
            "contract_signing_date".into(),
            sv(&self.contract_signing_date),
        );
        record.insert(
            "company_representative".into(),
            sv(&self.company_representative),
        );
        record.insert(
            "worker_representative".into(),
            sv(&self.worker_representative),
        );
        record.insert("workload_percentage".into(), nv(&self.workload_percentage));
        record.insert(
            "weekly_working_hours".into(),
            nv(&self.weekly_working_hours),
        );
        record.insert(
            "hourly_workload_per_month".into(),
            nv(&self.hourly_workload_per_month),
        );
        record.insert("annual_gross_salary".into(), nv(&self.annual_gross_salary));
        record.insert(
            "monthly_gross_salary".into(),
            nv(&self.monthly_gross_salary),
        );
        record.insert("hourly_salary".into(), nv(&self.hourly_salary));

        if self.contract_version == Some(ContractVersion::B) {
            record.insert("end_date".into(), sv(&self.end_date));
        }
        if self.contract_version.is_some_and(|v| v.is_amendment()) {
            record.insert(
                "original_contract_starting_date".into(),
                sv(&self.original_contract_starting_date),
            );
            record.insert(
                "original_contract_signing_date".into(),
                sv(&self.original_contract_signing_date),
            );
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_parse_is_case_insensitive() {
        assert_eq!(ContractVersion::parse(" a1 "), Some(ContractVersion::A1));
        assert_eq!(ContractVersion::parse("b"), Some(ContractVersion::B));
        assert_eq!(ContractVersion::parse("X"), None);
        assert_eq!(ContractVersion::parse(""), None);
    }

    #[test]
    fn amendment_versions() {
        assert!(ContractVersion::D.is_amendment());
        assert!(ContractVersion::A1.is_amendment());
        assert!(!ContractVersion::A.is_amendment());
        assert!(!ContractVersion::B.is_amendment());
        assert!(!ContractVersion::C.is_amendment());
    }

    #[test]
    fn required_fields_per_version() {
        assert_eq!(ContractVersion::C.required_fields().len(), 2);
        assert_eq!(ContractVersion::D.required_fields().len(), 4);
        assert_eq!(
            ContractVersion::D.required_fields(),
            ContractVersion::A1.required_fields()
        );
        assert!(
            ContractVersion::B
                .required_fields()
                .contains(&"end_date")
        );
    }

    #[test]
    fn from_value_tolerates_numbers_as_strings() {
        let draft = ContractDraft::from_value(&json!({
            "contract_version": "A",
            "full_name": "Jane Doe",
            "workload_percentage": "80",
            "annual_gross_salary": 96000.0,
        }));
        assert_eq!(draft.contract_version, Some(ContractVersion::A));
        assert_eq!(draft.workload_percentage, Some(80.0));
        assert_eq!(draft.annual_gross_salary, Some(96000.0));
    }

    #[test]
    fn from_value_drops_blank_strings() {
        let draft = ContractDraft::from_value(&json!({
            "full_name": "  ",
            "gender": "female",
        }));
        assert!(draft.full_name.is_none());
        assert_eq!(draft.gender.as_deref(), Some("female"));
    }

    #[test]
    fn from_value_keeps_unknown_version_tag_for_reporting() {
        let draft = ContractDraft::from_value(&json!({"contract_version": "Z"}));
        assert!(draft.contract_version.is_none());
        assert_eq!(draft.unrecognized_version.as_deref(), Some("Z"));

        let draft = ContractDraft::from_value(&json!({"contract_version": "a1"}));
        assert_eq!(draft.contract_version, Some(ContractVersion::A1));
        assert!(draft.unrecognized_version.is_none());
    }

    #[test]
    fn field_is_missing_treats_zero_as_present() {
        let draft = ContractDraft {
            workload_percentage: Some(0.0),
            ..ContractDraft::default()
        };
        assert!(!draft.field_is_missing("workload_percentage"));
        assert!(draft.field_is_missing("annual_gross_salary"));
    }

    #[test]
    fn summary_shows_end_date_only_for_version_b() {
        let mut draft = ContractDraft {
            contract_version: Some(ContractVersion::B),
            end_date: Some("2027-01-31".into()),
            ..ContractDraft::default()
        };
        assert!(draft.summary().contains("End: 2027-01-31"));

        draft.contract_version = Some(ContractVersion::A);
        assert!(!draft.summary().contains("End:"));
    }

    #[test]
    fn summary_shows_original_dates_for_amendments() {
        let draft = ContractDraft {
            contract_version: Some(ContractVersion::A1),
            original_contract_starting_date: Some("2020-03-01".into()),
            original_contract_signing_date: Some("2020-02-15".into()),
            ..ContractDraft::default()
        };
        let summary = draft.summary();
        assert!(summary.contains("ORIGINAL CONTRACT"));
        assert!(summary.contains("2020-03-01"));
    }

    #[test]
    fn finalize_varies_by_version() {
        let base = ContractDraft {
            full_name: Some("Jane Doe".into()),
            end_date: Some("2027-01-31".into()),
            original_contract_starting_date: Some("2020-03-01".into()),
            original_contract_signing_date: Some("2020-02-15".into()),
            ..ContractDraft::default()
        };

        let a = ContractDraft {
            contract_version: Some(ContractVersion::A),
            ..base.clone()
        };
        let record = a.finalize();
        assert!(!record.contains_key("end_date"));
        assert!(!record.contains_key("original_contract_starting_date"));

        let b = ContractDraft {
            contract_version: Some(ContractVersion::B),
            ..base.clone()
        };
        assert_eq!(b.finalize()["end_date"], json!("2027-01-31"));

        let d = ContractDraft {
            contract_version: Some(ContractVersion::D),
            ..base
        };
        let record = d.finalize();
        assert_eq!(
            record["original_contract_starting_date"],
            json!("2020-03-01")
        );
        assert_eq!(
            record["original_contract_signing_date"],
            json!("2020-02-15")
        );
    }

    #[test]
    fn finalize_emits_null_for_absent_fields() {
        let draft = ContractDraft {
            contract_version: Some(ContractVersion::A),
            ..ContractDraft::default()
        };
        let record = draft.finalize();
        assert_eq!(record["full_name"], Value::Null);
        assert_eq!(record["hourly_salary"], Value::Null);
    }
}
