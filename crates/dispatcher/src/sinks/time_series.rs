//! TimeSeriesSink - InfluxDB v2 over HTTP
//!
//! Each write opens a scoped client, pings the backend, then posts one
//! line-protocol record per point. A failed point does not stop the batch.

use std::time::Duration;

use contracts::{
    batch_name, ContractError, DataPoint, DataSink, Direction, TimeSeriesConfig, WriteReport,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use tracing::{debug, instrument, warn};

use crate::sinks::line_protocol::encode_point;

/// Sink that writes points to an InfluxDB v2 bucket
pub struct TimeSeriesSink {
    name: String,
    config: TimeSeriesConfig,
    write_url: Url,
    ping_url: Url,
}

impl TimeSeriesSink {
    /// Create a new TimeSeriesSink
    ///
    /// Connection parameters are read once here; no request is made until
    /// the first write.
    pub fn new(name: impl Into<String>, config: TimeSeriesConfig) -> Result<Self, ContractError> {
        let name = name.into();
        let base = config.url.trim_end_matches('/');
        let parse = |suffix: &str| {
            Url::parse(&format!("{base}{suffix}")).map_err(|e| {
                ContractError::config_validation("sink.time_series.url", e.to_string())
            })
        };
        let write_url = parse("/api/v2/write")?;
        let ping_url = parse("/ping")?;

        Ok(Self {
            name,
            config,
            write_url,
            ping_url,
        })
    }

    pub fn config(&self) -> &TimeSeriesConfig {
        &self.config
    }

    fn open_client(&self) -> Result<Client, ContractError> {
        Client::builder()
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .build()
            .map_err(|e| ContractError::sink_connection(&self.name, e.to_string()))
    }

    async fn ping(&self, client: &Client) -> Result<(), ContractError> {
        client
            .get(self.ping_url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map(|_| ())
            .map_err(|e| ContractError::sink_connection(&self.name, e.to_string()))
    }

    async fn post_line(&self, client: &Client, line: String) -> Result<(), reqwest::Error> {
        let mut request = client
            .post(self.write_url.clone())
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line);
        if !self.config.token.is_empty() {
            request = request.header(AUTHORIZATION, format!("Token {}", self.config.token));
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }
}

impl DataSink for TimeSeriesSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "time_series_sink_write",
        skip(self, points),
        fields(sink = %self.name, points = points.len())
    )]
    async fn write(
        &self,
        points: &[DataPoint],
        scope: &str,
        direction: Direction,
    ) -> Result<WriteReport, ContractError> {
        let client = self.open_client()?;
        self.ping(&client).await?;

        let measurement = batch_name(scope, direction);
        let mut report = WriteReport::default();

        for point in points {
            let Some(line) = encode_point(&measurement, point) else {
                report.skipped += 1;
                continue;
            };
            match self.post_line(&client, line).await {
                Ok(()) => report.written += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        sink = %self.name,
                        measurement = %measurement,
                        field = %point.field,
                        error = %e,
                        "Point write failed"
                    );
                }
            }
        }

        debug!(
            sink = %self.name,
            measurement = %measurement,
            written = report.written,
            skipped = report.skipped,
            failed = report.failed,
            "Batch written"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FieldValue, Tags};
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(url: &str) -> TimeSeriesConfig {
        TimeSeriesConfig {
            url: url.to_string(),
            token: "secret".into(),
            org: "lab".into(),
            bucket: "calls".into(),
            timeout_ms: 2000,
        }
    }

    async fn mount_ping(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(204))
            .mount(server)
            .await;
    }

    fn pos_point(field: &str, value: i64) -> DataPoint {
        let mut tags = Tags::new();
        tags.insert("pos".into(), "1".into());
        DataPoint::new(tags, field, Some(FieldValue::Int(value)))
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(TimeSeriesSink::new("ts", config_for("not a url")).is_err());
    }

    #[tokio::test]
    async fn test_writes_one_record_per_point() {
        let server = MockServer::start().await;
        mount_ping(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .and(query_param("org", "lab"))
            .and(query_param("bucket", "calls"))
            .and(header("authorization", "Token secret"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&server)
            .await;

        let sink = TimeSeriesSink::new("ts", config_for(&server.uri())).unwrap();
        let points = vec![pos_point("x", 1), pos_point("y", 2)];
        let report = sink.write(&points, "move", Direction::In).await.unwrap();

        assert_eq!(report, WriteReport::all_written(2));
    }

    #[tokio::test]
    async fn test_record_uses_batch_measurement() {
        let server = MockServer::start().await;
        mount_ping(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .and(body_string("move_out,pos=1 x=1i"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let sink = TimeSeriesSink::new("ts", config_for(&server.uri())).unwrap();
        let report = sink
            .write(&[pos_point("x", 1)], "move", Direction::Out)
            .await
            .unwrap();
        assert_eq!(report.written, 1);
    }

    #[tokio::test]
    async fn test_skips_absent_and_composite_values() {
        let server = MockServer::start().await;
        mount_ping(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let sink = TimeSeriesSink::new("ts", config_for(&server.uri())).unwrap();
        let points = vec![
            DataPoint::new(Tags::new(), "missing", None),
            DataPoint::new(Tags::new(), "list", FieldValue::from_json(&json!([1, 2]))),
            pos_point("x", 1),
        ];
        let report = sink.write(&points, "mixed", Direction::In).await.unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_failed_point_does_not_stop_batch() {
        let server = MockServer::start().await;
        mount_ping(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .and(body_string("flaky_in,pos=1 x=1i"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .and(body_string("flaky_in,pos=1 y=2i"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let sink = TimeSeriesSink::new("ts", config_for(&server.uri())).unwrap();
        let points = vec![pos_point("x", 1), pos_point("y", 2)];
        let report = sink.write(&points, "flaky", Direction::In).await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.written, 1);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let sink = TimeSeriesSink::new("ts", config_for(&server.uri())).unwrap();
        let err = sink
            .write(&[pos_point("x", 1)], "down", Direction::In)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::SinkConnection { .. }));
    }
}
