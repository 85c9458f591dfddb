//! Sample Form Submitter
//!
//! Generates survey submissions, sends them to the predictor over NATS
//! request/reply and logs each reply.

use empowerment_predictor::{
    encoding::CategoryEncoder,
    types::{EmpowermentLabel, FormSubmission, NumericField, PredictionResponse},
};
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Submission generator for exercising the predictor
struct SubmissionGenerator {
    rng: rand::rngs::ThreadRng,
    encoder: CategoryEncoder,
    submission_counter: u64,
}

impl SubmissionGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            encoder: CategoryEncoder::new(),
            submission_counter: 0,
        }
    }

    /// Generate a complete, in-range submission
    fn generate_complete(&mut self) -> FormSubmission {
        self.submission_counter += 1;

        let mut submission = FormSubmission::new()
            .with_numeric(
                NumericField::BusinessOwnership,
                self.rng.gen_range(0..1000) as f64,
            )
            .with_numeric(NumericField::EmploymentRates, self.rng.gen_range(0.0..=100.0))
            .with_numeric(NumericField::WomenInLeadership, self.rng.gen_range(0..=100) as f64)
            .with_numeric(NumericField::TariffRates, self.rng.gen_range(0.0..=40.0));

        for field in self.encoder.fields() {
            let option = &field.options[self.rng.gen_range(0..field.options.len())];
            submission = submission.with_category(&field.name, option);
        }

        submission.submission_id = Some(format!("form_{:08}", self.submission_counter));
        submission
    }

    /// Generate a submission the predictor should reject
    fn generate_incomplete(&mut self) -> FormSubmission {
        let mut submission = self.generate_complete();
        match self.rng.gen_range(0..3) {
            0 => submission.tariff_rates = None,
            1 => submission.employment_rates = Some(self.rng.gen_range(101.0..200.0)),
            _ => {
                let field = &self.encoder.fields()[self.rng.gen_range(0..self.encoder.len())];
                submission.categorical.insert(field.name.clone(), None);
            }
        }
        submission
    }
}

/// Running counts of the replies received
#[derive(Debug, Default)]
struct ReplyTally {
    empowered: u64,
    not_empowered: u64,
    rejected: u64,
}

impl ReplyTally {
    /// Count one reply; a failed request counts as rejected
    fn record(&mut self, submission_id: Option<&str>, reply: anyhow::Result<PredictionResponse>) {
        match reply {
            Ok(PredictionResponse::Ok(result)) => {
                match result.label {
                    EmpowermentLabel::Empowered => self.empowered += 1,
                    EmpowermentLabel::NotEmpowered => self.not_empowered += 1,
                }
                info!(
                    submission_id = %result.submission_id,
                    probability = result.probability,
                    "{}",
                    result.message
                );
            }
            Ok(PredictionResponse::Error {
                submission_id,
                kind,
                error,
            }) => {
                self.rejected += 1;
                warn!(submission_id = ?submission_id, kind = %kind, "{}", error);
            }
            Err(e) => {
                self.rejected += 1;
                warn!(submission_id = ?submission_id, error = %e, "Request failed");
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("submit_form=info".parse()?),
        )
        .init();

    info!("Starting Sample Form Submitter");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("empowerment.predict");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(20);
    let invalid_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        invalid_rate = invalid_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, invalid_rate, delay_ms).await;
        }
    };

    let mut generator = SubmissionGenerator::new();
    let mut rng = rand::thread_rng();

    let mut tally = ReplyTally::default();

    for _ in 0..count {
        let submission = if rng.gen_bool(invalid_rate) {
            generator.generate_incomplete()
        } else {
            generator.generate_complete()
        };

        let payload = serde_json::to_vec(&submission)?;
        let reply: anyhow::Result<PredictionResponse> = client
            .request(subject.to_string(), payload.into())
            .await
            .map_err(anyhow::Error::from)
            .and_then(|message| Ok(serde_json::from_slice(&message.payload)?));
        tally.record(submission.submission_id.as_deref(), reply);

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Sent {} submissions ({} empowered, {} not empowered, {} rejected)",
        count, tally.empowered, tally.not_empowered, tally.rejected
    );

    Ok(())
}

async fn run_dry_mode(count: u64, invalid_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = SubmissionGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let submission = if rng.gen_bool(invalid_rate) {
            generator.generate_incomplete()
        } else {
            generator.generate_complete()
        };

        let json = serde_json::to_string_pretty(&submission)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample submission {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use empowerment_predictor::PredictionResult;

    #[test]
    fn test_failed_requests_are_counted_not_fatal() {
        let mut tally = ReplyTally::default();

        tally.record(Some("form_1"), Err(anyhow::anyhow!("request timed out")));
        tally.record(
            Some("form_2"),
            Ok(PredictionResponse::Ok(PredictionResult::new(
                "form_2".to_string(),
                0.8,
                0.5,
                "logreg",
            ))),
        );
        tally.record(None, Err(anyhow::anyhow!("no responders")));

        assert_eq!(tally.rejected, 2);
        assert_eq!(tally.empowered, 1);
        assert_eq!(tally.not_empowered, 0);
    }

    #[test]
    fn test_generated_submissions_have_ids() {
        let mut generator = SubmissionGenerator::new();
        assert!(generator.generate_complete().submission_id.is_some());
        assert!(generator.generate_incomplete().submission_id.is_some());
    }
}
