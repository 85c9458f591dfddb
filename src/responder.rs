//! Publishes prediction replies back to the requesting form

use crate::form::FormSchema;
use crate::types::PredictionResponse;
use anyhow::Result;
use async_nats::{Client, Subject};
use serde::Serialize;
use tracing::debug;

/// Sends replies to the inbox named in each request
#[derive(Clone)]
pub struct PredictionResponder {
    client: Client,
}

impl PredictionResponder {
    /// Create a new responder
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Reply to a submission with its prediction or error
    pub async fn reply(&self, reply_to: Option<&Subject>, response: &PredictionResponse) -> Result<()> {
        self.send(reply_to, response).await?;
        debug!(ok = response.is_ok(), "Published prediction reply");
        Ok(())
    }

    /// Reply to a schema request
    pub async fn reply_schema(&self, reply_to: Option<&Subject>, schema: &FormSchema) -> Result<()> {
        self.send(reply_to, schema).await
    }

    async fn send<T: Serialize>(&self, reply_to: Option<&Subject>, body: &T) -> Result<()> {
        let Some(subject) = reply_to else {
            anyhow::bail!("request carries no reply subject");
        };

        let payload = encode_reply(body)?;
        self.client.publish(subject.clone(), payload.into()).await?;
        Ok(())
    }
}

/// Serialize a reply body
pub fn encode_reply<T: Serialize>(body: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CategoryEncoder;
    use crate::error::PredictorError;

    #[test]
    fn test_encode_error_reply() {
        let response = PredictionResponse::from_error(
            None,
            &PredictorError::UnknownField("Weather".to_string()),
        );
        let bytes = encode_reply(&response).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "unknown_field");
        assert!(value.get("submission_id").is_none());
    }

    #[test]
    fn test_encode_schema_reply() {
        let schema = FormSchema::build(&CategoryEncoder::new());
        let bytes = encode_reply(&schema).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["title"], "Women Empowerment Predictor");
        assert_eq!(value["submit_label"], "Run Prediction");
        assert_eq!(value["numeric"].as_array().unwrap().len(), 4);
        assert_eq!(value["numeric"][0]["key"], "Business Ownership");
        assert!(value["numeric"][0].get("max").is_none());
        assert_eq!(value["numeric"][1]["max"], 100.0);
        assert_eq!(value["categorical"].as_array().unwrap().len(), 16);
        assert_eq!(value["categorical"][0]["key"], "Trade Flows");
    }
}
