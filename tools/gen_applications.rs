//! Test Application Generator
//!
//! Generates a synthetic scholarship-application CSV for exercising the
//! screener: mostly plausible rows plus a configurable share of
//! fraud-patterned rows.

use anyhow::Result;
use rand::Rng;
use tracing::info;

const HEADERS: [&str; 9] = [
    "Name",
    "Spent_On",
    "Documents_Verified",
    "Enrollment_Status",
    "Application_State",
    "Income_Certificate_Amount",
    "Actual_Income",
    "Attendance",
    "Scholarship_Amount",
];

/// Application row generator
struct ApplicationGenerator {
    rng: rand::rngs::ThreadRng,
    counter: u64,
}

impl ApplicationGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            counter: 0,
        }
    }

    /// Generate a plausible genuine application
    fn generate_genuine(&mut self) -> Vec<String> {
        self.counter += 1;
        let actual_income: f64 = self.rng.gen_range(20_000.0..80_000.0);
        // Certificate roughly agrees with the income on record.
        let certificate = actual_income * self.rng.gen_range(0.7..1.2);

        vec![
            format!("Applicant {:04}", self.counter),
            "Education".to_string(),
            "Yes".to_string(),
            "Active".to_string(),
            self.random_choice(&["Approved", "Pending"]).to_string(),
            format!("{:.0}", certificate),
            format!("{:.0}", actual_income),
            format!("{:.0}", self.rng.gen_range(65.0..100.0)),
            format!("{:.0}", self.rng.gen_range(5_000.0..20_000.0)),
        ]
    }

    /// Generate a fraud-patterned application
    fn generate_suspicious(&mut self) -> Vec<String> {
        self.counter += 1;
        let actual_income: f64 = self.rng.gen_range(40_000.0..120_000.0);
        // Certificate understates income by more than half.
        let certificate = actual_income * self.rng.gen_range(0.05..0.4);

        vec![
            format!("Applicant {:04}", self.counter),
            self.random_choice(&["Medical", "Other"]).to_string(),
            "No".to_string(),
            self.random_choice(&["Active", "Inactive"]).to_string(),
            "Pending".to_string(),
            format!("{:.0}", certificate),
            format!("{:.0}", actual_income),
            format!("{:.0}", self.rng.gen_range(20.0..55.0)),
            format!("{:.0}", self.rng.gen_range(15_000.0..40_000.0)),
        ]
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gen_applications=info".parse()?),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let output = args.get(1).map(|s| s.as_str()).unwrap_or("applications.csv");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.2);

    info!(
        output = %output,
        count = count,
        fraud_rate = fraud_rate,
        "Generating applications"
    );

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(HEADERS)?;

    let mut generator = ApplicationGenerator::new();
    let mut rng = rand::thread_rng();
    let mut genuine_count = 0u64;
    let mut suspicious_count = 0u64;

    for _ in 0..count {
        let row = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            genuine_count += 1;
            generator.generate_genuine()
        };
        writer.write_record(&row)?;
    }

    writer.flush()?;

    info!(
        "Completed! Wrote {} applications ({} genuine, {} suspicious) to {}",
        count, genuine_count, suspicious_count, output
    );

    Ok(())
}
