//! Snippet expansion at the cursor

use crate::commands::Cmd;
use crate::expand::plan_expansion;
use crate::messages::ExpandMsg;
use crate::model::AnalysisService;
use crate::scan::Position;

pub fn update_expand(service: &mut AnalysisService, msg: ExpandMsg) -> Option<Cmd> {
    match msg {
        ExpandMsg::ExpandAtCursor { line, column } => {
            let Some(doc) = service.documents.active_document() else {
                return Some(Cmd::ShowMessage("No active document".to_string()));
            };
            let set = service.expansions.for_content_type(&doc.content_type);

            match plan_expansion(&doc.buffer, Position::new(line, column), set) {
                Ok(edit) => Some(Cmd::ApplyEdit {
                    document_id: doc.id,
                    edit,
                }),
                Err(e) => {
                    tracing::info!("Expansion at {}:{} failed: {}", line, column, e);
                    Some(Cmd::ShowMessage(e.to_string()))
                }
            }
        }
    }
}
