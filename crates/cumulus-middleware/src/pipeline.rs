//! Fixed-order enrichment pipeline.
//!
//! The dispatch layer runs the pipeline before calling a handler. Each
//! stage is invoked by a plain sequential call, so the order and the
//! point of failure are explicit.
//!
//! ## Pipeline Stages
//!
//! 1. **Tenant** - Scope the context to the session or routed tenant
//! 2. **Stack** - Resolve the stack identity
//! 3. **Resource** - Resolve the resource identity
//!
//! A handler declares how deep it needs to go with a [`Stage`]: a stack
//! handler runs stages 1-2, a resource handler runs all three.

use crate::enricher::Enricher;
use crate::stages::{ResourceStage, StackStage, TenantStage};
use cumulus_core::{ApiError, PathParams, RequestContext};
use std::fmt;
use std::sync::Arc;

/// A type-erased stage that can be stored in a vector.
pub type BoxedEnricher = Arc<dyn Enricher>;

/// Stage marker for compile-time ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: Tenant scoping
    Tenant = 1,
    /// Stage 2: Stack identity
    Stack = 2,
    /// Stage 3: Resource identity
    Resource = 3,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Stack => "stack",
            Self::Resource => "resource",
        }
    }

    /// Returns all stages in order.
    #[must_use]
    pub const fn all() -> [Stage; 3] {
        [Self::Tenant, Self::Stack, Self::Resource]
    }

    /// Returns the number of stages up to and including this one.
    #[must_use]
    pub const fn depth(self) -> usize {
        self as usize
    }
}

/// Failure of a single stage.
#[derive(Debug)]
pub struct StageFailure {
    /// Name of the stage that failed.
    pub stage: &'static str,
    /// The error it reported.
    pub error: ApiError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for StageFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<StageFailure> for ApiError {
    fn from(failure: StageFailure) -> Self {
        failure.error
    }
}

/// The fixed-order enrichment pipeline.
///
/// # Example
///
/// ```
/// use cumulus_core::{ApplicationUrl, PathParams, RequestContext};
/// use cumulus_middleware::{Pipeline, Stage};
///
/// let pipeline = Pipeline::through(Stage::Stack);
/// let params = PathParams::from_iter([
///     ("tenant_id", "t1"),
///     ("stack_name", "mystack"),
///     ("stack_id", "abc-123"),
/// ]);
///
/// let app = ApplicationUrl::parse("http://localhost:8004/v1/t1/").unwrap();
/// let ctx = pipeline.run(RequestContext::new(app), &params).unwrap();
/// assert_eq!(ctx.stack().unwrap().url_path(), "stacks/mystack/abc-123");
/// ```
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<BoxedEnricher>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Returns the standard pipeline running every stage up to `target`.
    #[must_use]
    pub fn through(target: Stage) -> Self {
        let all: [BoxedEnricher; 3] = [
            Arc::new(TenantStage::new()),
            Arc::new(StackStage::new()),
            Arc::new(ResourceStage::new()),
        ];
        Self {
            stages: all.into_iter().take(target.depth()).collect(),
        }
    }

    /// Runs every stage in order, stopping at the first failure.
    pub fn run(
        &self,
        mut ctx: RequestContext,
        params: &PathParams,
    ) -> Result<RequestContext, StageFailure> {
        let request_id = ctx.request_id();

        for stage in &self.stages {
            ctx = stage.enrich(ctx, params).map_err(|error| {
                if error.category().is_client_error() {
                    tracing::debug!(%request_id, stage = stage.name(), %error, "enrichment rejected");
                } else {
                    tracing::error!(%request_id, stage = stage.name(), %error, "enrichment failed");
                }
                metrics::counter!("cumulus_enrichment_failures_total", "stage" => stage.name())
                    .increment(1);
                StageFailure {
                    stage: stage.name(),
                    error,
                }
            })?;
        }

        Ok(ctx)
    }

    /// Returns the names of all stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a custom [`Pipeline`].
///
/// Stages run in the order they were added.
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedEnricher>,
}

impl PipelineBuilder {
    /// Creates a new, empty pipeline builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage.
    #[must_use]
    pub fn stage<E: Enricher>(mut self, enricher: E) -> Self {
        self.stages.push(Arc::new(enricher));
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enricher::FnEnricher;
    use cumulus_core::{ApplicationUrl, ErrorCategory};
    use std::sync::Mutex;

    fn ctx() -> RequestContext {
        RequestContext::new(ApplicationUrl::parse("http://localhost:8004/v1/t1/").unwrap())
    }

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::Tenant < Stage::Stack);
        assert!(Stage::Stack < Stage::Resource);
    }

    #[test]
    fn test_stage_names() {
        let names: Vec<_> = Stage::all().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["tenant", "stack", "resource"]);
    }

    #[test]
    fn test_through_selects_prefix() {
        assert_eq!(Pipeline::through(Stage::Tenant).stage_names(), vec!["tenant"]);
        assert_eq!(
            Pipeline::through(Stage::Stack).stage_names(),
            vec!["tenant", "stack"]
        );
        assert_eq!(
            Pipeline::through(Stage::Resource).stage_names(),
            vec!["tenant", "stack", "resource"]
        );
    }

    #[test]
    fn test_pipeline_executes_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (o1, o2) = (order.clone(), order.clone());

        let pipeline = Pipeline::builder()
            .stage(FnEnricher::new("first", move |ctx, _| {
                o1.lock().unwrap().push("first");
                Ok(ctx)
            }))
            .stage(FnEnricher::new("second", move |ctx, _| {
                o2.lock().unwrap().push("second");
                Ok(ctx)
            }))
            .build();

        pipeline.run(ctx(), &PathParams::new()).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_pipeline_stops_at_first_failure() {
        let reached = Arc::new(Mutex::new(false));
        let flag = reached.clone();

        let pipeline = Pipeline::builder()
            .stage(FnEnricher::new("broken", |_, _| Err(ApiError::forbidden("no"))))
            .stage(FnEnricher::new("after", move |ctx, _| {
                *flag.lock().unwrap() = true;
                Ok(ctx)
            }))
            .build();

        let failure = pipeline.run(ctx(), &PathParams::new()).unwrap_err();
        assert_eq!(failure.stage, "broken");
        assert_eq!(failure.error.category(), ErrorCategory::Forbidden);
        assert!(!*reached.lock().unwrap());
    }

    #[test]
    fn test_empty_pipeline_returns_context() {
        let pipeline = Pipeline::builder().build();
        let input = ctx();
        let id = input.request_id();
        let out = pipeline.run(input, &PathParams::new()).unwrap();
        assert_eq!(out.request_id(), id);
        assert_eq!(pipeline.stage_count(), 0);
    }

    #[test]
    fn test_failure_converts_to_api_error() {
        let failure = StageFailure {
            stage: "stack",
            error: ApiError::bad_request("stack_id must not be empty"),
        };
        assert_eq!(failure.to_string(), "stage stack failed: Bad request: stack_id must not be empty");
        let error: ApiError = failure.into();
        assert_eq!(error.category(), ErrorCategory::BadRequest);
    }
}
