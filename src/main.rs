//! Empowerment Predictor - Main Entry Point
//!
//! Answers form submissions arriving over NATS with a predicted label.
//! Submissions are handled concurrently up to the configured worker count.

use anyhow::Result;
use empowerment_predictor::{
    config::AppConfig,
    consumer::SubmissionConsumer,
    handler::PredictorFormHandler,
    logging,
    metrics::{MetricsReporter, PredictorMetrics},
    responder::PredictionResponder,
    types::PredictionResponse,
    workers::WorkerPool,
};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init(&config.logging)?;

    info!("Starting Empowerment Predictor");
    info!(model = %config.model.path, "Configuration loaded successfully");

    // Load the category table and model once for the process lifetime
    let handler = Arc::new(PredictorFormHandler::from_config(&config)?);
    info!(
        features = handler.extractor().feature_count(),
        model = %handler.engine().model_name(),
        threshold = handler.engine().threshold(),
        "Form handler initialized"
    );

    let metrics = Arc::new(PredictorMetrics::new());

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = SubmissionConsumer::new(
        client.clone(),
        &config.nats.request_subject,
        config.nats.queue_group.clone(),
    );
    let responder = PredictionResponder::new(client.clone());

    // Answer schema requests for the form renderer
    let mut schema_requests = consumer.subscribe_to(&config.nats.schema_subject()).await?;
    {
        let handler = handler.clone();
        let responder = responder.clone();
        tokio::spawn(async move {
            while let Some(message) = schema_requests.next().await {
                if let Err(e) = responder
                    .reply_schema(message.reply.as_ref(), handler.schema())
                    .await
                {
                    warn!(error = %e, "Failed to answer schema request");
                }
            }
        });
    }

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let num_workers = config.pipeline.workers;
    info!(
        "Listening on subject: {} with {} parallel workers",
        consumer.subject(),
        num_workers
    );

    let pool = WorkerPool::new(num_workers);
    let mut subscription = consumer.subscribe().await?;

    loop {
        let message = tokio::select! {
            message = subscription.next() => match message {
                Some(message) => message,
                None => {
                    warn!("Subscription closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        };

        let handler = handler.clone();
        let responder = responder.clone();
        let metrics = metrics.clone();

        pool.spawn(async move {
            let start_time = Instant::now();
            metrics.record_submission();

            let response = handler.handle_payload(&message.payload);
            let processing_time = start_time.elapsed();

            match &response {
                PredictionResponse::Ok(result) => {
                    metrics.record_prediction(processing_time, result);
                }
                PredictionResponse::Error { kind, .. } => {
                    metrics.record_rejection(processing_time, kind);
                }
            }

            if let Err(e) = responder.reply(message.reply.as_ref(), &response).await {
                error!(
                    subject = %message.subject,
                    error = %e,
                    "Failed to publish prediction reply"
                );
            }
        })
        .await?;
    }

    info!("Predictor shutting down...");
    if let Err(e) = subscription.unsubscribe().await {
        warn!(error = %e, "Failed to unsubscribe from submissions");
    }

    // Let accepted submissions get their replies before the final summary
    pool.drain().await?;
    if let Err(e) = client.flush().await {
        warn!(error = %e, "Failed to flush pending replies");
    }
    metrics.print_summary();

    Ok(())
}
