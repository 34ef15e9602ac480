//! Symbol browser navigation

use crate::commands::Cmd;
use crate::messages::BrowserMsg;
use crate::model::AnalysisService;

pub fn update_browser(service: &mut AnalysisService, msg: BrowserMsg) -> Option<Cmd> {
    let browser = &mut service.browser;
    match msg {
        BrowserMsg::SelectPrevious => {
            browser.select_previous();
            Some(Cmd::Redraw)
        }
        BrowserMsg::SelectNext => {
            browser.select_next();
            Some(Cmd::Redraw)
        }
        BrowserMsg::Activate { index } => {
            let line = browser.entry_line(index)?;
            browser.select(index);
            Some(Cmd::jump_to(line))
        }
        BrowserMsg::ActivateSelected => {
            let line = browser.entry_line(browser.selected_index()?)?;
            Some(Cmd::jump_to(line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalyzerRegistry;
    use crate::config::OutlineConfig;
    use crate::model::{DocumentId, StructureItem, StructureModel};

    fn service() -> AnalysisService {
        let mut service = AnalysisService::new(OutlineConfig::default(), AnalyzerRegistry::new());
        service.set_structure(
            DocumentId(1),
            StructureModel::from_items(vec![
                StructureItem::global(0, "x"),
                StructureItem::function(4, "main"),
            ])
            .unwrap(),
        );
        service
    }

    #[test]
    fn test_activate_jumps_to_anchor_line() {
        let mut service = service();
        let cmd = update_browser(&mut service, BrowserMsg::Activate { index: 1 });
        let Some(Cmd::Batch(cmds)) = cmd else {
            panic!("expected a jump");
        };
        assert!(matches!(cmds[0], Cmd::JumpToLineEnd { line: 4 }));
        assert!(matches!(cmds[1], Cmd::FocusEditor));
        assert_eq!(service.browser.selected_index(), Some(1));
    }

    #[test]
    fn test_activate_out_of_range_or_unsupported_does_nothing() {
        let mut service = service();
        assert!(update_browser(&mut service, BrowserMsg::Activate { index: 9 }).is_none());

        service.set_unsupported(DocumentId(1), "text/plain");
        assert!(update_browser(&mut service, BrowserMsg::Activate { index: 0 }).is_none());
        assert!(update_browser(&mut service, BrowserMsg::ActivateSelected).is_none());
    }

    #[test]
    fn test_keyboard_selection_then_activate() {
        let mut service = service();
        update_browser(&mut service, BrowserMsg::SelectNext);
        update_browser(&mut service, BrowserMsg::SelectNext);
        let cmd = update_browser(&mut service, BrowserMsg::ActivateSelected);
        assert!(matches!(cmd, Some(Cmd::Batch(ref cmds)) if matches!(cmds[0], Cmd::JumpToLineEnd { line: 4 })));
    }
}
