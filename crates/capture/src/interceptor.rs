//! CallInterceptor - captures a call's input and output as data points
//!
//! The wrapped function runs exactly once with its original input; capture
//! never changes its result or its error.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use contracts::{CaptureModes, DataPoint, Direction, StructuredMessage};
use dispatcher::SinkDispatcher;

use crate::flatten::flatten;

/// Instrumentation settings for one named call
#[derive(Clone)]
pub struct CallInterceptor {
    scope: Arc<str>,
    modes: CaptureModes,
    dispatcher: Arc<SinkDispatcher>,
}

impl CallInterceptor {
    /// Create an interceptor for calls named `scope`
    pub fn new(
        scope: impl Into<String>,
        modes: impl Into<CaptureModes>,
        dispatcher: Arc<SinkDispatcher>,
    ) -> Self {
        let scope: String = scope.into();
        Self {
            scope: Arc::from(scope),
            modes: modes.into(),
            dispatcher,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn modes(&self) -> CaptureModes {
        self.modes
    }

    /// Wrap `f` into an instrumented callable
    pub fn wrap<F>(&self, f: F) -> Instrumented<F> {
        Instrumented {
            interceptor: self.clone(),
            f,
        }
    }

    /// Flatten `message` and dispatch it as one batch
    ///
    /// A value with no structured view is logged and skipped.
    pub async fn capture<M>(&self, message: &M, direction: Direction)
    where
        M: StructuredMessage + ?Sized,
    {
        let Some(points) = self.collect(message, direction) else {
            return;
        };
        self.dispatch(points, direction).await;
    }

    fn collect<M>(&self, message: &M, direction: Direction) -> Option<Vec<DataPoint>>
    where
        M: StructuredMessage + ?Sized,
    {
        let Some(structured) = message.as_structured() else {
            warn!(
                scope = %self.scope,
                %direction,
                "[{direction}] {}: not a structured message",
                self.scope
            );
            observability::record_capture_degraded(&self.scope, direction);
            return None;
        };
        Some(flatten(&structured).points().collect())
    }

    #[instrument(
        name = "interceptor_dispatch",
        skip(self, points, direction),
        fields(scope = %self.scope, %direction, points = points.len())
    )]
    async fn dispatch(&self, points: Vec<DataPoint>, direction: Direction) {
        observability::record_points_captured(&self.scope, direction, points.len());
        self.dispatcher
            .dispatch(&points, &self.scope, direction)
            .await;
        debug!(scope = %self.scope, %direction, "Capture dispatched");
    }
}

/// A function wrapped by a [`CallInterceptor`]
#[derive(Clone)]
pub struct Instrumented<F> {
    interceptor: CallInterceptor,
    f: F,
}

impl<F> Instrumented<F> {
    pub fn interceptor(&self) -> &CallInterceptor {
        &self.interceptor
    }

    /// Call a fallible function
    ///
    /// The output is captured only when `f` returns `Ok`.
    pub async fn call<I, O, E, Fut>(&self, input: I) -> Result<O, E>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<O, E>>,
        I: StructuredMessage,
        O: StructuredMessage,
    {
        self.before(&input).await;
        let result = (self.f)(input).await;
        if let Ok(output) = &result {
            self.after(output).await;
        }
        result
    }

    /// Call a function that cannot fail
    pub async fn call_infallible<I, O, Fut>(&self, input: I) -> O
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = O>,
        I: StructuredMessage,
        O: StructuredMessage,
    {
        self.before(&input).await;
        let output = (self.f)(input).await;
        self.after(&output).await;
        output
    }

    async fn before<I: StructuredMessage>(&self, input: &I) {
        if self.interceptor.modes.input {
            self.interceptor.capture(input, Direction::In).await;
        }
    }

    async fn after<O: StructuredMessage>(&self, output: &O) {
        if self.interceptor.modes.output {
            self.interceptor.capture(output, Direction::Out).await;
        }
    }
}
