//! HTTP ingestion submitter
//!
//! Posts `{"course_details": <record>, "worker_key": "<key>"}` to the catalog
//! service. 2xx is success, 401 is an authorization failure, anything else
//! is a rejection carrying the status code.

use crate::catalog::CourseDetailsRecord;
use crate::sink::traits::{IngestionSink, SinkError, SinkResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

/// Request body accepted by the `add-course-details` endpoint
#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    pub course_details: &'a CourseDetailsRecord,
    pub worker_key: &'a str,
}

/// Sink that delivers records to the catalog service over HTTP
pub struct HttpSink {
    client: Client,
    endpoint: String,
    worker_key: String,
}

impl HttpSink {
    pub fn new(client: Client, endpoint: impl Into<String>, worker_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            worker_key: worker_key.into(),
        }
    }
}

#[async_trait]
impl IngestionSink for HttpSink {
    async fn submit(&self, record: &CourseDetailsRecord) -> SinkResult<()> {
        let body = SubmitRequest {
            course_details: record,
            worker_key: &self.worker_key,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!("Submitted {} ({})", record.global_id, status.as_u16());
            return Ok(());
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(SinkError::Unauthorized);
        }

        Err(SinkError::Rejected {
            status: status.as_u16(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_shape() {
        let record = CourseDetailsRecord {
            crn: "30001".to_string(),
            global_id: "F30001".to_string(),
            ..Default::default()
        };

        let body = SubmitRequest {
            course_details: &record,
            worker_key: "secret",
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["worker_key"], "secret");
        assert_eq!(value["course_details"]["global_id"], "F30001");
        assert_eq!(value["course_details"]["CRN"], "30001");
    }
}
