//! Runs the record source and the engine as two concurrent units of work.
//!
//! The two sides meet on a rendezvous channel: the source blocks on every
//! hand-off until the engine takes the record, so at most one record is in
//! flight. Either side failing closes the channel for the other. If the
//! engine stops, the source's next send fails. If the source stops, its
//! sender is dropped and the engine drains and returns.

use std::error::Error;
use std::sync::mpsc;
use std::thread;

use crate::diagnostic::DiagnosticSink;
use crate::engine::Engine;
use crate::error::PipelineError;
use crate::report::ValidationReport;
use crate::schema::Schema;
use crate::source::RecordSource;

/// Validate the records `source` reads against `schema`, sending findings and
/// progress to `sink`.
///
/// The source runs on the calling thread, the engine on a scoped thread that
/// borrows the schema.
///
/// # Errors
///
/// Returns [`PipelineError::Stream`] if a record fails to read, or
/// [`PipelineError::EngineStopped`] if the engine thread panicked.
pub fn run<I, E>(
    schema: &Schema,
    source: RecordSource<I>,
    sink: &dyn DiagnosticSink,
) -> Result<ValidationReport, PipelineError>
where
    I: Iterator<Item = Result<Vec<String>, E>>,
    E: Error + Send + Sync + 'static,
{
    let seed = source.seed();
    let engine = Engine::new(schema);

    thread::scope(|scope| {
        let (handoff, receiver) = mpsc::sync_channel(0);
        let consumer = scope.spawn(move || engine.drain(receiver, sink));

        let produced = source.forward(handoff, sink);
        let drained = consumer
            .join()
            .map_err(|_| PipelineError::EngineStopped);

        let source_stats = produced?;
        let engine_stats = drained?;
        Ok(ValidationReport::new(seed, source_stats, engine_stats))
    })
}
