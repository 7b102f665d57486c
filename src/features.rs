//! Feature derivation for application scoring.
//!
//! This is the deterministic front half of the scoring pipeline: drop
//! identifying data, replace categorical strings with their learned codes,
//! compute the derived ratios and flags, then project onto the fixed
//! eleven-feature list the classifier was trained on. Feature order matches
//! the training pipeline exactly.

use crate::encoders::EncoderSet;
use crate::error::ScreenError;
use crate::table::ApplicationTable;
use crate::types::ApplicationRecord;
use serde::Deserialize;
use tracing::debug;

pub const COL_NAME: &str = "Name";
pub const COL_SPENT_ON: &str = "Spent_On";
pub const COL_DOCUMENTS_VERIFIED: &str = "Documents_Verified";
pub const COL_ENROLLMENT_STATUS: &str = "Enrollment_Status";
pub const COL_APPLICATION_STATE: &str = "Application_State";
pub const COL_INCOME_CERTIFICATE_AMOUNT: &str = "Income_Certificate_Amount";
pub const COL_ACTUAL_INCOME: &str = "Actual_Income";
pub const COL_ATTENDANCE: &str = "Attendance";
pub const COL_SCHOLARSHIP_AMOUNT: &str = "Scholarship_Amount";

/// The category whose code anchors `Non_Education_Spend`. The code is
/// resolved from the encoder at transform time, never hardcoded.
const EDUCATION_LABEL: &str = "Education";

/// Categorical columns replaced by learned integer codes.
pub const CATEGORICAL_COLUMNS: [&str; 4] = [
    COL_SPENT_ON,
    COL_DOCUMENTS_VERIFIED,
    COL_ENROLLMENT_STATUS,
    COL_APPLICATION_STATE,
];

/// Numeric input columns of the full-pipeline schema.
pub const NUMERIC_COLUMNS: [&str; 4] = [
    COL_INCOME_CERTIFICATE_AMOUNT,
    COL_ACTUAL_INCOME,
    COL_ATTENDANCE,
    COL_SCHOLARSHIP_AMOUNT,
];

/// Every column the full pipeline requires.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_SPENT_ON,
    COL_DOCUMENTS_VERIFIED,
    COL_ENROLLMENT_STATUS,
    COL_APPLICATION_STATE,
    COL_INCOME_CERTIFICATE_AMOUNT,
    COL_ACTUAL_INCOME,
    COL_ATTENDANCE,
    COL_SCHOLARSHIP_AMOUNT,
];

/// The eleven features the classifier scores, in training order.
pub const FEATURE_NAMES: [&str; 11] = [
    COL_INCOME_CERTIFICATE_AMOUNT,
    COL_ACTUAL_INCOME,
    COL_ATTENDANCE,
    COL_DOCUMENTS_VERIFIED,
    COL_ENROLLMENT_STATUS,
    COL_APPLICATION_STATE,
    COL_SCHOLARSHIP_AMOUNT,
    "Income_Ratio",
    "Low_Attendance",
    "Fake_Income_Claim",
    "Non_Education_Spend",
];

/// Which of the two scoring paths runs for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Feature engineering first, then the classifier scores the eleven
    /// engineered features.
    Full,
    /// The table (minus `Name`) goes to the classifier as-is.
    Raw,
}

impl PipelineMode {
    /// Deterministic schema detection: full mode when every required
    /// column is present, raw mode otherwise.
    pub fn detect(table: &ApplicationTable) -> Self {
        if REQUIRED_COLUMNS.iter().all(|c| table.has_column(c)) {
            PipelineMode::Full
        } else {
            PipelineMode::Raw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::Full => "full",
            PipelineMode::Raw => "raw",
        }
    }
}

/// One row's eleven model features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub income_certificate_amount: f64,
    pub actual_income: f64,
    pub attendance: f64,
    pub documents_verified: f64,
    pub enrollment_status: f64,
    pub application_state: f64,
    pub scholarship_amount: f64,
    pub income_ratio: f64,
    pub low_attendance: f64,
    pub fake_income_claim: f64,
    pub non_education_spend: f64,
}

impl FeatureVector {
    /// Build the feature vector for one typed record.
    pub fn from_record(
        record: &ApplicationRecord,
        encoders: &EncoderSet,
    ) -> Result<Self, ScreenError> {
        let spent_on = encoders.encode(COL_SPENT_ON, &record.spent_on)?;
        let documents_verified =
            encoders.encode(COL_DOCUMENTS_VERIFIED, &record.documents_verified)?;
        let enrollment_status =
            encoders.encode(COL_ENROLLMENT_STATUS, &record.enrollment_status)?;
        let application_state =
            encoders.encode(COL_APPLICATION_STATE, &record.application_state)?;
        let education_code = encoders.encode(COL_SPENT_ON, EDUCATION_LABEL)?;

        Ok(Self::from_parts(
            record.income_certificate_amount,
            record.actual_income,
            record.attendance,
            record.scholarship_amount,
            spent_on,
            documents_verified,
            enrollment_status,
            application_state,
            education_code,
        ))
    }

    /// Build from already-encoded categorical codes. Derived features are
    /// computed fresh here, in order: ratio, attendance flag, income-claim
    /// flag, spend flag.
    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        income_certificate_amount: f64,
        actual_income: f64,
        attendance: f64,
        scholarship_amount: f64,
        spent_on_code: i64,
        documents_verified_code: i64,
        enrollment_status_code: i64,
        application_state_code: i64,
        education_code: i64,
    ) -> Self {
        // The +1 offset keeps the ratio finite for zero recorded income.
        let income_ratio = income_certificate_amount / (actual_income + 1.0);
        let low_attendance = if attendance < 60.0 { 1.0 } else { 0.0 };
        let fake_income_claim = if income_certificate_amount < actual_income / 2.0 {
            1.0
        } else {
            0.0
        };
        let non_education_spend = if spent_on_code != education_code { 1.0 } else { 0.0 };

        Self {
            income_certificate_amount,
            actual_income,
            attendance,
            documents_verified: documents_verified_code as f64,
            enrollment_status: enrollment_status_code as f64,
            application_state: application_state_code as f64,
            scholarship_amount,
            income_ratio,
            low_attendance,
            fake_income_claim,
            non_education_spend,
        }
    }

    /// The vector in training order, ready for the classifier.
    pub fn to_vec(&self) -> Vec<f32> {
        vec![
            self.income_certificate_amount as f32,
            self.actual_income as f32,
            self.attendance as f32,
            self.documents_verified as f32,
            self.enrollment_status as f32,
            self.application_state as f32,
            self.scholarship_amount as f32,
            self.income_ratio as f32,
            self.low_attendance as f32,
            self.fake_income_claim as f32,
            self.non_education_spend as f32,
        ]
    }

    pub fn feature_count() -> usize {
        FEATURE_NAMES.len()
    }
}

/// Model-ready feature matrix: named columns, one f32 row per input row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    feature_names: Vec<String>,
    rows: Vec<Vec<f32>>,
}

impl FeatureMatrix {
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<f32>>) -> Self {
        Self {
            feature_names,
            rows,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }
}

/// Raw table → model-ready matrix transformation.
pub struct FeaturePipeline;

impl FeaturePipeline {
    pub fn new() -> Self {
        Self
    }

    /// Transform a table in the given mode.
    pub fn transform(
        &self,
        table: &ApplicationTable,
        encoders: &EncoderSet,
        mode: PipelineMode,
    ) -> Result<FeatureMatrix, ScreenError> {
        match mode {
            PipelineMode::Full => self.transform_full(table, encoders),
            PipelineMode::Raw => self.transform_raw(table),
        }
    }

    /// Full pipeline: drop `Name`, encode categoricals, derive the four
    /// engineered features, project onto the fixed eleven-feature list.
    /// Extra input columns never reach the matrix.
    pub fn transform_full(
        &self,
        table: &ApplicationTable,
        encoders: &EncoderSet,
    ) -> Result<FeatureMatrix, ScreenError> {
        let table = table.drop_column(COL_NAME);
        if table.is_empty() {
            return Err(ScreenError::EmptyTable);
        }

        let income_certificate = table.numeric_column(COL_INCOME_CERTIFICATE_AMOUNT)?;
        let actual_income = table.numeric_column(COL_ACTUAL_INCOME)?;
        let attendance = table.numeric_column(COL_ATTENDANCE)?;
        let scholarship = table.numeric_column(COL_SCHOLARSHIP_AMOUNT)?;

        let spent_on = self.encode_column(&table, encoders, COL_SPENT_ON)?;
        let documents_verified = self.encode_column(&table, encoders, COL_DOCUMENTS_VERIFIED)?;
        let enrollment_status = self.encode_column(&table, encoders, COL_ENROLLMENT_STATUS)?;
        let application_state = self.encode_column(&table, encoders, COL_APPLICATION_STATE)?;

        // Resolved once per transform from the fitted vocabulary.
        let education_code = encoders.encode(COL_SPENT_ON, EDUCATION_LABEL)?;

        let rows = (0..table.row_count())
            .map(|i| {
                FeatureVector::from_parts(
                    income_certificate[i],
                    actual_income[i],
                    attendance[i],
                    scholarship[i],
                    spent_on[i],
                    documents_verified[i],
                    enrollment_status[i],
                    application_state[i],
                    education_code,
                )
                .to_vec()
            })
            .collect();

        debug!(
            rows = table.row_count(),
            features = FEATURE_NAMES.len(),
            "Feature matrix built (full pipeline)"
        );

        Ok(FeatureMatrix::new(
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            rows,
        ))
    }

    /// Raw passthrough: no feature engineering. `Name` is still dropped
    /// (identifying data never reaches the model); every remaining column
    /// must parse as numeric.
    pub fn transform_raw(&self, table: &ApplicationTable) -> Result<FeatureMatrix, ScreenError> {
        let table = table.drop_column(COL_NAME);
        if table.is_empty() {
            return Err(ScreenError::EmptyTable);
        }

        let columns: Vec<Vec<f64>> = table
            .headers()
            .iter()
            .map(|name| table.numeric_column(name))
            .collect::<Result<_, _>>()?;

        let rows = (0..table.row_count())
            .map(|i| columns.iter().map(|col| col[i] as f32).collect())
            .collect();

        debug!(
            rows = table.row_count(),
            features = table.headers().len(),
            "Feature matrix built (raw passthrough)"
        );

        Ok(FeatureMatrix::new(table.headers().to_vec(), rows))
    }

    fn encode_column(
        &self,
        table: &ApplicationTable,
        encoders: &EncoderSet,
        column: &str,
    ) -> Result<Vec<i64>, ScreenError> {
        table
            .string_column(column)?
            .into_iter()
            .map(|value| encoders.encode(column, value))
            .collect()
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::CategoryEncoder;

    fn test_encoders() -> EncoderSet {
        EncoderSet::new(vec![
            CategoryEncoder::new(
                COL_SPENT_ON,
                vec![
                    "Education".to_string(),
                    "Medical".to_string(),
                    "Other".to_string(),
                ],
            ),
            CategoryEncoder::new(
                COL_DOCUMENTS_VERIFIED,
                vec!["No".to_string(), "Yes".to_string()],
            ),
            CategoryEncoder::new(
                COL_ENROLLMENT_STATUS,
                vec!["Active".to_string(), "Inactive".to_string()],
            ),
            CategoryEncoder::new(
                COL_APPLICATION_STATE,
                vec![
                    "Approved".to_string(),
                    "Pending".to_string(),
                    "Rejected".to_string(),
                ],
            ),
        ])
    }

    fn sample_record() -> ApplicationRecord {
        ApplicationRecord {
            name: None,
            spent_on: "Education".to_string(),
            documents_verified: "Yes".to_string(),
            enrollment_status: "Active".to_string(),
            application_state: "Approved".to_string(),
            income_certificate_amount: 5000.0,
            actual_income: 50000.0,
            attendance: 90.0,
            scholarship_amount: 10000.0,
        }
    }

    fn full_csv(with_name: bool) -> String {
        let mut csv = String::new();
        if with_name {
            csv.push_str("Name,");
        }
        csv.push_str(
            "Spent_On,Documents_Verified,Enrollment_Status,Application_State,\
             Income_Certificate_Amount,Actual_Income,Attendance,Scholarship_Amount\n",
        );
        if with_name {
            csv.push_str("A. Student,");
        }
        csv.push_str("Education,Yes,Active,Approved,5000,50000,90,10000\n");
        if with_name {
            csv.push_str("B. Student,");
        }
        csv.push_str("Medical,No,Inactive,Pending,8000,9000,40,15000\n");
        csv
    }

    fn table(csv: &str) -> ApplicationTable {
        ApplicationTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_feature_vector_sample_row() {
        let fv = FeatureVector::from_record(&sample_record(), &test_encoders()).unwrap();

        // 5000 / (50000 + 1)
        assert!((fv.income_ratio - 0.0999).abs() < 1e-3);
        assert_eq!(fv.low_attendance, 0.0);
        // 5000 < 25000
        assert_eq!(fv.fake_income_claim, 1.0);
        assert_eq!(fv.non_education_spend, 0.0);

        let vec = fv.to_vec();
        assert_eq!(vec.len(), FeatureVector::feature_count());
        assert_eq!(vec[0], 5000.0);
        assert_eq!(vec[6], 10000.0);
    }

    #[test]
    fn test_income_ratio_finite_for_zero_income() {
        let mut record = sample_record();
        record.actual_income = 0.0;
        let fv = FeatureVector::from_record(&record, &test_encoders()).unwrap();
        assert!(fv.income_ratio.is_finite());
        assert!(fv.income_ratio >= 0.0);
        assert_eq!(fv.income_ratio, 5000.0);
    }

    #[test]
    fn test_low_attendance_boundary() {
        let encoders = test_encoders();
        for (attendance, expected) in [(59.9, 1.0), (60.0, 0.0), (60.1, 0.0)] {
            let mut record = sample_record();
            record.attendance = attendance;
            let fv = FeatureVector::from_record(&record, &encoders).unwrap();
            assert_eq!(fv.low_attendance, expected, "attendance {attendance}");
        }
    }

    #[test]
    fn test_fake_income_claim_boundary() {
        let encoders = test_encoders();
        // Exactly half the actual income is not a fake claim.
        let mut record = sample_record();
        record.actual_income = 10000.0;
        record.income_certificate_amount = 5000.0;
        let fv = FeatureVector::from_record(&record, &encoders).unwrap();
        assert_eq!(fv.fake_income_claim, 0.0);

        record.income_certificate_amount = 4999.0;
        let fv = FeatureVector::from_record(&record, &encoders).unwrap();
        assert_eq!(fv.fake_income_claim, 1.0);
    }

    #[test]
    fn test_non_education_spend_uses_encoder_code() {
        let encoders = test_encoders();
        let mut record = sample_record();
        record.spent_on = "Medical".to_string();
        let fv = FeatureVector::from_record(&record, &encoders).unwrap();
        assert_eq!(fv.non_education_spend, 1.0);
    }

    #[test]
    fn test_unknown_category_is_hard_error() {
        let mut record = sample_record();
        record.spent_on = "Crypto".to_string();
        let err = FeatureVector::from_record(&record, &test_encoders()).unwrap_err();
        assert!(matches!(err, ScreenError::UnknownCategory { .. }));
    }

    #[test]
    fn test_transform_full_projects_eleven_features() {
        let pipeline = FeaturePipeline::new();
        let matrix = pipeline
            .transform_full(&table(&full_csv(true)), &test_encoders())
            .unwrap();

        assert_eq!(matrix.row_count(), 2);
        assert_eq!(matrix.feature_count(), 11);
        assert_eq!(matrix.feature_names(), &FEATURE_NAMES);

        // Second row: low attendance, non-education spend, claim not fake
        // (8000 >= 4500).
        let row = &matrix.rows()[1];
        assert_eq!(row[8], 1.0); // Low_Attendance
        assert_eq!(row[9], 0.0); // Fake_Income_Claim
        assert_eq!(row[10], 1.0); // Non_Education_Spend
    }

    #[test]
    fn test_name_drop_is_idempotent_for_features() {
        let pipeline = FeaturePipeline::new();
        let encoders = test_encoders();

        let with_name = pipeline
            .transform_full(&table(&full_csv(true)), &encoders)
            .unwrap();
        let without_name = pipeline
            .transform_full(&table(&full_csv(false)), &encoders)
            .unwrap();

        assert_eq!(with_name, without_name);
    }

    #[test]
    fn test_extra_columns_do_not_reach_the_matrix() {
        let csv = "Remarks,Spent_On,Documents_Verified,Enrollment_Status,Application_State,\
                   Income_Certificate_Amount,Actual_Income,Attendance,Scholarship_Amount\n\
                   urgent,Education,Yes,Active,Approved,5000,50000,90,10000\n";
        let pipeline = FeaturePipeline::new();
        let matrix = pipeline.transform_full(&table(csv), &test_encoders()).unwrap();
        assert_eq!(matrix.feature_count(), 11);
        assert!(!matrix.feature_names().iter().any(|n| n == "Remarks"));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Spent_On,Documents_Verified\nEducation,Yes\n";
        let pipeline = FeaturePipeline::new();
        let err = pipeline
            .transform_full(&table(csv), &test_encoders())
            .unwrap_err();
        assert!(matches!(err, ScreenError::MissingColumn { .. }));
    }

    #[test]
    fn test_transform_raw_skips_engineering() {
        let csv = "Name,f0,f1,f2\nA,1,2,3\nB,4,5,6\n";
        let pipeline = FeaturePipeline::new();
        let matrix = pipeline.transform_raw(&table(csv)).unwrap();

        assert_eq!(matrix.feature_names(), &["f0", "f1", "f2"]);
        assert_eq!(matrix.rows()[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(matrix.rows()[1], vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_transform_raw_rejects_non_numeric() {
        let csv = "f0,f1\n1,abc\n";
        let pipeline = FeaturePipeline::new();
        let err = pipeline.transform_raw(&table(csv)).unwrap_err();
        assert!(matches!(err, ScreenError::NonNumeric { .. }));
    }

    #[test]
    fn test_mode_detection() {
        assert_eq!(
            PipelineMode::detect(&table(&full_csv(true))),
            PipelineMode::Full
        );
        assert_eq!(
            PipelineMode::detect(&table("f0,f1\n1,2\n")),
            PipelineMode::Raw
        );
    }

    #[test]
    fn test_required_columns_are_categorical_plus_numeric() {
        let mut expected: Vec<&str> = CATEGORICAL_COLUMNS.to_vec();
        expected.extend(NUMERIC_COLUMNS);
        assert_eq!(REQUIRED_COLUMNS.to_vec(), expected);
    }

    #[test]
    fn test_empty_table() {
        let csv = "Spent_On,Documents_Verified,Enrollment_Status,Application_State,\
                   Income_Certificate_Amount,Actual_Income,Attendance,Scholarship_Amount\n";
        let pipeline = FeaturePipeline::new();
        let err = pipeline
            .transform_full(&table(csv), &test_encoders())
            .unwrap_err();
        assert!(matches!(err, ScreenError::EmptyTable));
    }
}
