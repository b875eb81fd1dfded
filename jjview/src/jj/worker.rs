//! Background thread that runs jj and parses its output.
//!
//! All communication is via channels: `JjRequest` in, `AppEvent::JjResult`
//! out. Parsing happens here as well so the UI loop only swaps finished
//! structures in.

use std::time::Instant;

use crossbeam_channel::Receiver;
use jjview_core::{assemble, parse_summary, segment};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::event::AppEvent;
use crate::jj::runner::{args, CommandRunner, RunnerError};
use crate::jj::types::{JjPayload, JjRequest, ListSource, PreviewTarget};

/// Entry point for the background thread.
///
/// Loops over incoming requests until the channel is closed (sender dropped)
/// or the UI loop has gone away. Requests that queued up while jj was busy
/// are coalesced first, see [`coalesce`].
pub fn jj_worker_loop<R: CommandRunner>(
    runner: R,
    rx: Receiver<JjRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    while let Ok(first) = rx.recv() {
        let mut batch = vec![first];
        batch.extend(rx.try_iter());
        for request in coalesce(batch) {
            let payload = handle_request(&runner, request);
            if event_tx.send(AppEvent::JjResult(Box::new(payload))).is_err() {
                return;
            }
        }
    }
    debug!("jj worker stopped");
}

/// Drops requests superseded by a later one in the same batch.
///
/// Only the newest preview and file summary matter since the UI discards
/// anything for a target it has moved away from. Listing requests are kept
/// in order, minus exact duplicates.
pub(crate) fn coalesce(batch: Vec<JjRequest>) -> Vec<JjRequest> {
    let last_preview = batch.iter().rposition(|r| matches!(r, JjRequest::LoadPreview(_)));
    let last_files = batch.iter().rposition(|r| matches!(r, JjRequest::LoadFiles { .. }));

    let mut kept: Vec<JjRequest> = Vec::with_capacity(batch.len());
    for (i, request) in batch.into_iter().enumerate() {
        let superseded = match request {
            JjRequest::LoadPreview(_) => Some(i) != last_preview,
            JjRequest::LoadFiles { .. } => Some(i) != last_files,
            _ => kept.contains(&request),
        };
        if !superseded {
            kept.push(request);
        }
    }
    kept
}

/// Runs one request through jj and the parsers.
pub(crate) fn handle_request<R: CommandRunner>(runner: &R, request: JjRequest) -> JjPayload {
    let kind = request.kind();
    let started = Instant::now();
    let result = match request {
        JjRequest::LoadLog { revset } => {
            run_list(runner, ListSource::Revisions, None, &args::log(revset.as_deref()))
        }
        JjRequest::LoadOpLog => run_list(runner, ListSource::Operations, None, &args::op_log()),
        JjRequest::LoadEvolog { revision } => {
            let args = args::evolog(&revision);
            run_list(runner, ListSource::Evolution, Some(revision.clone()), &args)
        }
        JjRequest::LoadPreview(target) => run_preview(runner, target),
        JjRequest::LoadFiles { revision } => {
            runner.run(&args::diff_summary(&revision)).map(|out| JjPayload::Files {
                files: parse_summary(&out),
                revision,
            })
        }
    };

    match result {
        Ok(payload) => {
            debug!(?kind, elapsed_ms = started.elapsed().as_millis() as u64, "jj request done");
            payload
        }
        Err(err) => {
            warn!(?kind, error = %err, "jj request failed");
            JjPayload::Failed { kind, message: err.to_string() }
        }
    }
}

fn run_list<R: CommandRunner>(
    runner: &R,
    source: ListSource,
    revision: Option<String>,
    args: &[&str],
) -> Result<JjPayload, RunnerError> {
    let out = runner.run(args)?;
    let assembled = assemble(&out, source.grammar());
    let lines = out.lines().map(str::to_owned).collect();
    Ok(JjPayload::List { source, revision, lines, assembled })
}

fn run_preview<R: CommandRunner>(
    runner: &R,
    target: PreviewTarget,
) -> Result<JjPayload, RunnerError> {
    let out = match &target {
        PreviewTarget::Change(revision) => runner.run(&args::show(revision))?,
        PreviewTarget::Operation(id) => runner.run(&args::op_show(id))?,
    };
    let hunks = segment(&out);
    let lines = out.lines().map(str::to_owned).collect();
    Ok(JjPayload::Preview { target, lines, hunks })
}
