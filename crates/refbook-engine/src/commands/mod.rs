//! Command orchestration layer.
//!
//! Query and command entry points plus their result types.

pub mod engine_command;
pub mod engine_query;
pub mod read_tools;

use refbook_core::{log_op_end, log_op_error, log_op_start};
use refbook_core_types::RequestContext;
use refbook_store::errors::Result;

/// Run one engine operation inside a request span, logging start, end and
/// failure with its duration. Errors are tagged with the request id.
pub(crate) fn instrumented<T>(
    op: &'static str,
    ctx: &RequestContext,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let span = tracing::info_span!(
        "engine",
        request_id = %ctx.request_id,
        trace_id = ctx.trace_id_str()
    );
    let _guard = span.enter();

    log_op_start!(op);
    let start = std::time::Instant::now();

    let result = f().map_err(|e| e.with_request_id(ctx.request_id.clone()));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!(op, duration_ms = elapsed),
        Err(e) => {
            let e_clone = e.clone();
            log_op_error!(op, e_clone, duration_ms = elapsed);
        }
    }
    result
}
