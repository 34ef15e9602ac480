//! Search overlay messages

use crate::commands::Cmd;
use crate::events::ServiceEvent;
use crate::messages::SearchMsg;
use crate::model::{AnalysisService, SearchOverlay};

pub fn update_search(service: &mut AnalysisService, msg: SearchMsg) -> Option<Cmd> {
    if let SearchMsg::Open = msg {
        let Some(model) = service.structure() else {
            tracing::debug!("No outline to search");
            return None;
        };
        let overlay = SearchOverlay::open(model.clone());
        let cmd = filter_changed(&overlay);
        service.search = Some(overlay);
        return cmd;
    }

    let overlay = service.search.as_mut()?;
    match msg {
        SearchMsg::Open => None,
        SearchMsg::Close => {
            service.search = None;
            Some(Cmd::Redraw)
        }
        SearchMsg::SetQuery(query) => {
            overlay.set_query(&query);
            filter_changed(overlay)
        }
        SearchMsg::InsertChar(ch) => {
            overlay.insert_char(ch);
            filter_changed(overlay)
        }
        SearchMsg::DeleteBackward => {
            overlay.delete_backward();
            filter_changed(overlay)
        }
        SearchMsg::SelectPrevious => {
            overlay.select_previous();
            Some(Cmd::Redraw)
        }
        SearchMsg::SelectNext => {
            overlay.select_next();
            Some(Cmd::Redraw)
        }
        SearchMsg::Confirm => {
            let line = overlay.selected_item().map(|item| item.line());
            service.search = None;
            match line {
                Some(line) => Some(Cmd::jump_to(line)),
                None => Some(Cmd::Redraw),
            }
        }
    }
}

fn filter_changed(overlay: &SearchOverlay) -> Option<Cmd> {
    Some(Cmd::batch(vec![
        Cmd::Notify(ServiceEvent::FilterChanged {
            query: overlay.query().to_string(),
            visible: overlay.visible_count(),
        }),
        Cmd::Redraw,
    ]))
}
