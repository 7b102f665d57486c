//! Typed view of one scholarship application row.

use serde::{Deserialize, Serialize};

/// One row of the uploaded application table, in the full-pipeline schema.
///
/// Column names follow the dataset headers exactly. `Name` is identifying
/// data: it is carried for display but dropped before any value reaches the
/// feature pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Applicant name (identifying, never a feature)
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// What the scholarship money was spent on
    #[serde(rename = "Spent_On")]
    pub spent_on: String,

    /// Whether supporting documents were verified
    #[serde(rename = "Documents_Verified")]
    pub documents_verified: String,

    /// Enrollment status of the applicant
    #[serde(rename = "Enrollment_Status")]
    pub enrollment_status: String,

    /// Processing state of the application
    #[serde(rename = "Application_State")]
    pub application_state: String,

    /// Income claimed on the submitted certificate
    #[serde(rename = "Income_Certificate_Amount")]
    pub income_certificate_amount: f64,

    /// Income on record
    #[serde(rename = "Actual_Income")]
    pub actual_income: f64,

    /// Attendance percentage
    #[serde(rename = "Attendance")]
    pub attendance: f64,

    /// Disbursed scholarship amount
    #[serde(rename = "Scholarship_Amount")]
    pub scholarship_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_dataset_headers() {
        let json = r#"{
            "Name": "A. Student",
            "Spent_On": "Education",
            "Documents_Verified": "Yes",
            "Enrollment_Status": "Active",
            "Application_State": "Approved",
            "Income_Certificate_Amount": 5000.0,
            "Actual_Income": 50000.0,
            "Attendance": 90.0,
            "Scholarship_Amount": 10000.0
        }"#;

        let record: ApplicationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.spent_on, "Education");
        assert_eq!(record.actual_income, 50000.0);
        assert_eq!(record.name.as_deref(), Some("A. Student"));
    }

    #[test]
    fn test_name_is_optional() {
        let json = r#"{
            "Spent_On": "Medical",
            "Documents_Verified": "No",
            "Enrollment_Status": "Inactive",
            "Application_State": "Pending",
            "Income_Certificate_Amount": 8000.0,
            "Actual_Income": 12000.0,
            "Attendance": 40.0,
            "Scholarship_Amount": 15000.0
        }"#;

        let record: ApplicationRecord = serde_json::from_str(json).unwrap();
        assert!(record.name.is_none());
    }
}
