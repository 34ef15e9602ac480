//! Host document signals

use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::AnalysisService;

use super::analysis::schedule_analysis;

/// Handle document messages (open, switch, edit, close)
pub fn update_document(service: &mut AnalysisService, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::Opened {
            document_id,
            content_type,
            text,
        } => {
            tracing::debug!("Opened doc={} as {}", document_id.0, content_type);
            service.documents.open(document_id, content_type, &text);
            if service.documents.is_active(document_id) {
                // Reopened in place: the text may be entirely different
                return schedule_analysis(service, document_id, true);
            }
            None
        }

        DocumentMsg::Activated { document_id } => {
            if service.documents.is_active(document_id) {
                return None;
            }
            if !service.documents.activate(document_id) {
                return None;
            }
            tracing::debug!("Switched to doc={}", document_id.0);
            service.last_failure = None;
            let closed_search = service.search.take().map(|_| Cmd::Redraw);
            Cmd::combine([closed_search, schedule_analysis(service, document_id, true)])
        }

        DocumentMsg::TextChanged { document_id, edit } => {
            let Some(revision) = service.documents.edit(document_id, &edit) else {
                tracing::warn!("Edit for untracked doc={}", document_id.0);
                return None;
            };
            tracing::trace!("doc={} now at rev={}", document_id.0, revision);
            if !service.documents.is_active(document_id) {
                return None;
            }
            schedule_analysis(service, document_id, false)
        }

        DocumentMsg::ContentTypeChanged {
            document_id,
            content_type,
        } => {
            if !service
                .documents
                .set_content_type(document_id, &content_type)
            {
                return None;
            }
            tracing::debug!("doc={} is now {}", document_id.0, content_type);
            if !service.documents.is_active(document_id) {
                return None;
            }
            schedule_analysis(service, document_id, true)
        }

        DocumentMsg::Closed { document_id } => {
            if !service.documents.close(document_id) {
                return None;
            }
            tracing::debug!("Active doc={} closed", document_id.0);
            service.scheduler.cancel_pending_timer();
            service.clear_outline();
            service.search = None;
            Some(Cmd::Redraw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzerError, AnalyzerRegistry};
    use crate::config::OutlineConfig;
    use crate::model::{DocumentId, OutlineState, StructureItem, TextEdit};

    fn service() -> AnalysisService {
        let mut registry = AnalyzerRegistry::new();
        registry.register_fn("text/x-demo", |_: &str| Ok::<_, AnalyzerError>(Vec::<StructureItem>::new()));
        AnalysisService::new(OutlineConfig::default(), registry)
    }

    fn opened(id: u64, content_type: &str) -> DocumentMsg {
        DocumentMsg::Opened {
            document_id: DocumentId(id),
            content_type: content_type.into(),
            text: String::new(),
        }
    }

    #[test]
    fn test_edits_to_background_documents_are_tracked_but_not_analysed() {
        let mut service = service();
        update_document(&mut service, opened(1, "text/x-demo"));
        update_document(&mut service, opened(2, "text/x-demo"));
        service.documents.activate(DocumentId(1));

        let cmd = update_document(
            &mut service,
            DocumentMsg::TextChanged {
                document_id: DocumentId(2),
                edit: TextEdit::Replace("x".into()),
            },
        );
        assert!(cmd.is_none());
        assert_eq!(service.documents.get(DocumentId(2)).unwrap().revision, 1);
    }

    #[test]
    fn test_switch_to_unsupported_is_immediate() {
        let mut service = service();
        update_document(&mut service, opened(1, "text/plain"));
        let cmd = update_document(
            &mut service,
            DocumentMsg::Activated {
                document_id: DocumentId(1),
            },
        );
        assert!(cmd.is_some());
        assert_eq!(service.outline, OutlineState::Unsupported("text/plain".into()));
        assert_eq!(
            service.browser.placeholder().as_deref(),
            Some("No analyser for\ntext/plain")
        );
    }

    #[test]
    fn test_content_type_change_reanalyses() {
        let mut service = service();
        update_document(&mut service, opened(1, "text/plain"));
        update_document(
            &mut service,
            DocumentMsg::Activated {
                document_id: DocumentId(1),
            },
        );
        let cmd = update_document(
            &mut service,
            DocumentMsg::ContentTypeChanged {
                document_id: DocumentId(1),
                content_type: "text/x-demo".into(),
            },
        );
        assert!(matches!(cmd, Some(Cmd::RunAnalysis(_))));
    }

    #[test]
    fn test_closing_active_document_clears_outline() {
        let mut service = service();
        update_document(&mut service, opened(1, "text/plain"));
        update_document(
            &mut service,
            DocumentMsg::Activated {
                document_id: DocumentId(1),
            },
        );
        let cmd = update_document(
            &mut service,
            DocumentMsg::Closed {
                document_id: DocumentId(1),
            },
        );
        assert!(matches!(cmd, Some(Cmd::Redraw)));
        assert_eq!(service.outline, OutlineState::Empty);
        assert!(service.documents.active_id().is_none());
    }
}
