//! `demo` command implementation.
//!
//! Runs a few instrumented arithmetic calls so the configured sink can be
//! checked end to end without a directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use capture::{CallInterceptor, CaptureMode, CaptureModes, Json};
use dispatcher::SinkDispatcher;

use crate::cli::DemoArgs;
use crate::commands::{init_metrics, load_blueprint};

#[derive(Debug, Clone, Serialize)]
struct Operands {
    a: i64,
    b: i64,
}

#[derive(Debug, Clone, Serialize)]
struct Request {
    operands: Operands,
    label: String,
}

#[derive(Debug, Clone, Serialize)]
struct Outcome {
    result: i64,
}

fn request(label: &str, a: i64, b: i64) -> Json<Request> {
    Json(Request {
        operands: Operands { a, b },
        label: label.to_string(),
    })
}

/// Execute the `demo` command
pub async fn run_demo(args: &DemoArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    init_metrics(&args.config)?;

    let dispatcher = Arc::new(
        SinkDispatcher::from_config(&blueprint.sink).context("Failed to build sinks")?,
    );
    info!(sink = %blueprint.sink.selection, "Running demo calls");

    let add = CallInterceptor::new("add", [CaptureMode::In], Arc::clone(&dispatcher))
        .wrap(|Json(req): Json<Request>| async move {
            Json(Outcome {
                result: req.operands.a + req.operands.b,
            })
        });
    let multiply = CallInterceptor::new("multiply", CaptureModes::BOTH, Arc::clone(&dispatcher))
        .wrap(|Json(req): Json<Request>| async move {
            Json(Outcome {
                result: req.operands.a * req.operands.b,
            })
        });
    let subtract = CallInterceptor::new("subtract", CaptureModes::BOTH, Arc::clone(&dispatcher))
        .wrap(|Json(req): Json<Request>| async move {
            req.operands
                .a
                .checked_sub(req.operands.b)
                .map(|result| Json(Outcome { result }))
                .ok_or_else(|| anyhow::anyhow!("subtraction overflowed"))
        });

    let Json(sum) = add.call_infallible(request("add", args.a, args.b)).await;
    let Json(product) = multiply
        .call_infallible(request("multiply", args.a, args.b))
        .await;
    let Json(difference) = subtract
        .call(request("subtract", args.a, args.b))
        .await?;

    println!("add({}, {}) = {}", args.a, args.b, sum.result);
    println!("multiply({}, {}) = {}", args.a, args.b, product.result);
    println!("subtract({}, {}) = {}", args.a, args.b, difference.result);

    let snapshot = dispatcher.metrics_snapshot();
    info!(
        batches = snapshot.batch_count,
        written = snapshot.written_count,
        skipped = snapshot.skipped_count,
        failed = snapshot.failure_count,
        fallbacks = snapshot.fallback_count,
        "Demo finished"
    );
    Ok(())
}
