//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（无需目录服务或 InfluxDB）

#[cfg(test)]
mod contract_tests {
    use contracts::{batch_name, Direction, SinkSelection};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_batch_names() {
        assert_eq!(batch_name("add", Direction::In), "add_in");
        assert_eq!(batch_name("add", Direction::Out), "add_out");
    }

    #[test]
    fn test_selection_names_round_trip() {
        for selection in [
            SinkSelection::Console,
            SinkSelection::FileTable,
            SinkSelection::TimeSeries,
        ] {
            assert_eq!(SinkSelection::from(selection.as_str()), selection);
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use capture::{CallInterceptor, CaptureMode, CaptureModes, Json};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::SinkSelection;
    use dispatcher::{
        ConsoleSink, DispatcherBuilder, FileTableSink, SelectionHandle, SinkDispatcher,
        CONSOLE_SINK_NAME, FILE_TABLE_SINK_NAME,
    };
    use registry::{DirectoryEntry, MockConnection, MockTransport, RegistryError, ServiceRegistry};
    use serde::Serialize;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DIRECTORY: &str = "localhost:50051";

    #[derive(Debug, Clone, Serialize)]
    struct Position {
        x: i64,
        y: i64,
    }

    #[derive(Debug, Clone, Serialize)]
    struct MoveRequest {
        pos: Position,
        name: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct MoveReply {
        ok: bool,
    }

    /// Client stub bound to one server connection
    struct RobotStub {
        connection: MockConnection,
    }

    impl RobotStub {
        async fn move_to(&self, _req: MoveRequest) -> Result<MoveReply, String> {
            if self.connection.address.is_empty() {
                return Err("no connection".into());
            }
            Ok(MoveReply { ok: true })
        }
    }

    fn config_toml(base_path: &std::path::Path, selection: &str, influx_url: &str) -> String {
        format!(
            r#"
[directory]
address = "{DIRECTORY}"

[sink]
selection = "{selection}"

[sink.file_table]
base_path = "{}"

[sink.time_series]
url = "{influx_url}"
token = "t"
"#,
            base_path.display()
        )
    }

    /// Directory lookup -> stub call -> capture -> table files
    #[tokio::test]
    async fn test_e2e_lookup_and_capture_to_tables() {
        let dir = tempdir().unwrap();
        let blueprint = ConfigLoader::load_from_str(
            &config_toml(dir.path(), "file-table", "http://localhost:8086"),
            ConfigFormat::Toml,
        )
        .unwrap();

        let transport = MockTransport::with_directory(
            DIRECTORY,
            [DirectoryEntry::new("robot", "10.0.0.5:9000")],
        );
        let mut registry = ServiceRegistry::new(transport);
        registry.connect(&blueprint.directory.address).await.unwrap();

        let (_connection, stub) = registry
            .lookup_and_connect("robot", |connection| RobotStub { connection })
            .await
            .unwrap();
        let stub = Arc::new(stub);

        let dispatcher = Arc::new(SinkDispatcher::from_config(&blueprint.sink).unwrap());
        let interceptor = CallInterceptor::new("move_to", CaptureModes::BOTH, dispatcher);
        let move_to = interceptor.wrap(move |Json(req): Json<MoveRequest>| {
            let stub = Arc::clone(&stub);
            async move { stub.move_to(req).await.map(Json) }
        });

        for x in 0..2 {
            let reply = move_to
                .call(Json(MoveRequest {
                    pos: Position { x, y: 2 },
                    name: "bot".into(),
                }))
                .await
                .unwrap();
            assert!(reply.0.ok);
        }

        let table_in = std::fs::read_to_string(dir.path().join("move_to_in.csv")).unwrap();
        assert_eq!(table_in, "tag_pos,x,y,name\n1,0,2,bot\n1,1,2,bot\n");
        let table_out = std::fs::read_to_string(dir.path().join("move_to_out.csv")).unwrap();
        assert_eq!(table_out, "ok\ntrue\ntrue\n");

        registry.close().await;
        registry.close().await;
        assert!(!registry.is_connected());
    }

    #[tokio::test]
    async fn test_e2e_lookup_missing_server() {
        let transport = MockTransport::with_directory(
            DIRECTORY,
            [DirectoryEntry::new("arduino", "10.0.0.5:9000")],
        );
        let mut registry = ServiceRegistry::new(transport);
        registry.connect(DIRECTORY).await.unwrap();

        let err = registry
            .lookup_and_connect("camera", |connection| RobotStub { connection })
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Server named camera not found");
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    /// Time-series sink through configuration, backend served by wiremock
    #[tokio::test]
    async fn test_e2e_time_series_from_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .respond_with(ResponseTemplate::new(204))
            .expect(3)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let blueprint = ConfigLoader::load_from_str(
            &config_toml(dir.path(), "time-series", &server.uri()),
            ConfigFormat::Toml,
        )
        .unwrap();
        let dispatcher = Arc::new(SinkDispatcher::from_config(&blueprint.sink).unwrap());
        let interceptor = CallInterceptor::new("report", [CaptureMode::In], Arc::clone(&dispatcher));
        let report = interceptor.wrap(|msg: serde_json::Value| async move { msg });

        // Three scalars, one list (skipped), one null (skipped)
        report
            .call_infallible(json!({
                "pos": {"x": 1, "y": 2},
                "name": "bot",
                "path": [1, 2, 3],
                "battery": null
            }))
            .await;

        let snapshot = dispatcher.metrics_snapshot();
        assert_eq!(snapshot.written_count, 3);
        assert_eq!(snapshot.skipped_count, 2);
        assert_eq!(snapshot.fallback_count, 0);
    }

    /// Unknown selection still surfaces every point
    #[tokio::test]
    async fn test_e2e_unknown_sink_prints() {
        let (console, buffer) = ConsoleSink::buffered(CONSOLE_SINK_NAME);
        let dispatcher = DispatcherBuilder::new(SelectionHandle::new(SinkSelection::from("kafka")))
            .console(console)
            .build();
        let interceptor = CallInterceptor::new("ping", [CaptureMode::In], Arc::new(dispatcher));
        let ping = interceptor.wrap(|msg: serde_json::Value| async move { msg });

        ping.call_infallible(json!({"seq": 7})).await;

        let lines = buffer.lines();
        assert!(lines.contains(&"Tags: {}, Field: seq, Value: 7".to_string()));
    }

    /// Switching the selection redirects the next call only
    #[tokio::test]
    async fn test_e2e_switch_sink_between_calls() {
        let dir = tempdir().unwrap();
        let (console, buffer) = ConsoleSink::buffered(CONSOLE_SINK_NAME);
        let selection = SelectionHandle::default();
        let dispatcher = DispatcherBuilder::new(selection.clone())
            .console(console)
            .file_table(FileTableSink::new(
                FILE_TABLE_SINK_NAME,
                contracts::FileTableConfig {
                    base_path: dir.path().to_path_buf(),
                },
            ))
            .build();
        let interceptor = CallInterceptor::new("tick", [CaptureMode::In], Arc::new(dispatcher));
        let tick = interceptor.wrap(|msg: serde_json::Value| async move { msg });

        tick.call_infallible(json!({"n": 1})).await;
        selection.set(SinkSelection::FileTable);
        tick.call_infallible(json!({"n": 2})).await;

        assert_eq!(buffer.lines(), vec!["[in] tick: Tags: {}, Field: n, Value: 1"]);
        let table = std::fs::read_to_string(dir.path().join("tick_in.csv")).unwrap();
        assert_eq!(table, "n\n2\n");
    }
}
