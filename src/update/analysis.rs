//! Analysis scheduling and result handling
//!
//! Turns scheduler decisions into commands and applies worker results.

use crate::analysis::{
    AnalysisJob, AnalysisOutcome, AnalysisRequest, AnalysisResult, Schedule,
};
use crate::commands::Cmd;
use crate::events::ServiceEvent;
use crate::messages::AnalysisMsg;
use crate::model::{AnalysisService, DocumentId, OutlineState};

/// Handle analysis pipeline messages
pub fn update_analysis(service: &mut AnalysisService, msg: AnalysisMsg) -> Option<Cmd> {
    match msg {
        AnalysisMsg::DebounceElapsed { generation } => {
            if service.scheduler.on_timer(generation) {
                submit_active(service)
            } else {
                None
            }
        }

        AnalysisMsg::Rejected { document_id } => {
            tracing::debug!("Analysis of doc={} rejected, retrying later", document_id.0);
            arm(service.scheduler.on_rejected(document_id))
        }

        AnalysisMsg::Completed(result) => on_completed(service, result),
    }
}

fn arm(schedule: Schedule) -> Option<Cmd> {
    match schedule {
        Schedule::Arm { generation, delay } => Some(Cmd::DebouncedAnalysis {
            generation,
            delay_ms: delay.as_millis() as u64,
        }),
        Schedule::SubmitNow | Schedule::Deferred => None,
    }
}

/// The active document (or its content type) changed.
///
/// Documents without an analyzer are reported right away instead of after
/// the debounce.
pub fn schedule_analysis(
    service: &mut AnalysisService,
    document_id: DocumentId,
    immediate: bool,
) -> Option<Cmd> {
    let content_type = service.documents.get(document_id)?.content_type.clone();
    if !service.registry.supports(&content_type) {
        service.scheduler.cancel_pending_timer();
        return show_unsupported(service, document_id, &content_type);
    }

    match service.scheduler.on_change(document_id, immediate) {
        Schedule::SubmitNow => submit_active(service),
        schedule => arm(schedule),
    }
}

/// Snapshot the active document and hand it to the worker
pub fn submit_active(service: &mut AnalysisService) -> Option<Cmd> {
    let Some(doc) = service.documents.active_document() else {
        tracing::debug!("No active document to analyse");
        service.scheduler.cancel_pending_timer();
        return None;
    };

    let Some(analyzer) = service.registry.lookup(&doc.content_type) else {
        let (document_id, content_type) = (doc.id, doc.content_type.clone());
        return show_unsupported(service, document_id, &content_type);
    };

    let request = AnalysisRequest {
        document_id: doc.id,
        revision: doc.revision,
        content_type: doc.content_type.clone(),
        source: doc.text(),
    };
    tracing::debug!(
        "Submitting doc={} rev={} ({})",
        request.document_id.0,
        request.revision,
        request.content_type
    );
    service.scheduler.on_submitted(request.document_id);
    Some(Cmd::RunAnalysis(AnalysisJob::new(request, analyzer)))
}

fn show_unsupported(
    service: &mut AnalysisService,
    document_id: DocumentId,
    content_type: &str,
) -> Option<Cmd> {
    let unchanged = service.outline_document == Some(document_id)
        && service.outline == OutlineState::Unsupported(content_type.to_string());
    if unchanged {
        return None;
    }

    tracing::info!("No analyzer for {}", content_type);
    service.set_unsupported(document_id, content_type);
    service.search = None;
    Some(Cmd::batch(vec![
        Cmd::Notify(ServiceEvent::Unsupported {
            content_type: content_type.to_string(),
        }),
        Cmd::Redraw,
    ]))
}

fn on_completed(service: &mut AnalysisService, result: AnalysisResult) -> Option<Cmd> {
    let completion = service
        .scheduler
        .on_completed(result.document_id, service.documents.active_id());

    // The content type may have lost its analyzer while this ran
    let still_supported = service
        .documents
        .get(result.document_id)
        .is_some_and(|doc| service.registry.supports(&doc.content_type));

    let applied = if completion.apply && still_supported {
        apply_result(service, result)
    } else {
        tracing::trace!(
            "Discarding result for doc={} rev={}",
            result.document_id.0,
            result.revision
        );
        None
    };

    let resubmitted = if completion.resubmit {
        submit_active(service)
    } else {
        None
    };

    Cmd::combine([applied, resubmitted])
}

fn apply_result(service: &mut AnalysisService, result: AnalysisResult) -> Option<Cmd> {
    let document_id = result.document_id;
    match result.outcome {
        AnalysisOutcome::Structure(model) => {
            tracing::debug!(
                "Applied {} items for doc={} rev={}",
                model.len(),
                document_id.0,
                result.revision
            );
            service.set_structure(document_id, model.clone());
            Some(Cmd::batch(vec![
                Cmd::Notify(ServiceEvent::StructureChanged {
                    document_id,
                    items: model,
                }),
                Cmd::Redraw,
            ]))
        }
        AnalysisOutcome::Unsupported(content_type) => {
            show_unsupported(service, document_id, &content_type)
        }
        AnalysisOutcome::Failed(reason) => {
            tracing::warn!(
                "Analysis of doc={} rev={} failed: {}",
                document_id.0,
                result.revision,
                reason
            );
            // An outline from another document must not stay jumpable
            if service.outline_document != Some(document_id) {
                service.clear_outline();
            }
            service.last_failure = Some(reason);
            Some(Cmd::Redraw)
        }
    }
}
