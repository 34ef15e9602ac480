//! source-outline - print and follow the structure of a source file

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use ropey::Rope;

use source_outline::analyzers::builtin_registry;
use source_outline::cli::CliArgs;
use source_outline::config::OutlineConfig;
use source_outline::events::{EventKind, ServiceEvent};
use source_outline::expand::ExpansionEdit;
use source_outline::fs_watcher::FileWatcher;
use source_outline::host::EditorHost;
use source_outline::messages::{ExpandMsg, Msg};
use source_outline::model::{matches_query, DocumentId, OutlineState, StructureModel};
use source_outline::runtime::Runtime;
use source_outline::util::{filename_for_display, read_source};

/// How long a one-shot run waits for the analyzer
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Sleep between watch loop iterations
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The only document the CLI ever opens
const DOCUMENT: DocumentId = DocumentId(1);

/// Terminal stand-in for an editor: keeps a copy of the buffer so
/// expansion edits can be applied and printed
struct ConsoleHost {
    buffer: Rope,
    edited: bool,
    messages: Vec<String>,
}

impl ConsoleHost {
    fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from_str(text),
            edited: false,
            messages: Vec::new(),
        }
    }
}

impl EditorHost for ConsoleHost {
    fn move_cursor_to_line_end(&mut self, line: usize) {
        tracing::debug!("Jump to end of line {} (no view in CLI)", line + 1);
    }

    fn apply_edit(&mut self, _document_id: DocumentId, edit: &ExpansionEdit) {
        edit.apply(&mut self.buffer);
        self.edited = true;
        if let Some(cursor) = edit.cursor {
            tracing::info!("Cursor after expansion: {}:{}", cursor.line + 1, cursor.column + 1);
        }
    }

    fn show_message(&mut self, message: &str) {
        eprintln!("{}", message);
        self.messages.push(message.to_string());
    }
}

/// Output options shared by one-shot and watch mode
#[derive(Debug, Clone)]
struct Printer {
    filter: Option<String>,
    json: bool,
    member_indent: usize,
}

impl Printer {
    fn render(&self, model: &StructureModel) -> Result<String> {
        let query = self.filter.as_deref().unwrap_or_default();
        let items: Vec<_> = model
            .items()
            .iter()
            .filter(|item| matches_query(item, query))
            .collect();

        if self.json {
            return serde_json::to_string_pretty(&items).context("failed to serialize outline");
        }

        let mut out = String::new();
        for item in items {
            let indent = item.kind().style(self.member_indent).indent;
            out.push_str(&format!(
                "{:>5}  {:<5} {}{}\n",
                item.line() + 1,
                item.kind().label(),
                " ".repeat(indent),
                item.long_name()
            ));
        }
        Ok(out)
    }

    fn print(&self, model: &StructureModel) {
        match self.render(model) {
            Ok(text) => {
                let mut stdout = std::io::stdout().lock();
                let _ = writeln!(stdout, "{}", text.trim_end());
                let _ = stdout.flush();
            }
            Err(e) => tracing::error!("{:#}", e),
        }
    }
}

fn unsupported_message(content_type: &str) -> String {
    format!("No analyser for {}", content_type)
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    source_outline::tracing::init(args.verbose);

    let mut config = OutlineConfig::load();
    if let Some(ms) = args.debounce_ms {
        config = config.with_debounce_ms(ms);
    }

    let content_type = args.resolved_content_type();
    let text = read_source(&args.file)
        .map_err(|e| anyhow!(e.user_message(&filename_for_display(&args.file))))?;
    tracing::debug!("Analysing {} as {}", args.file.display(), content_type);

    let printer = Printer {
        filter: args.filter.clone(),
        json: args.json,
        member_indent: config.member_indent,
    };

    let mut runtime = Runtime::new(config, builtin_registry(), ConsoleHost::new(&text))?;

    if args.watch {
        let on_change = printer.clone();
        runtime.subscribe(EventKind::StructureChanged, move |event| {
            if let ServiceEvent::StructureChanged { items, .. } = event {
                on_change.print(items);
            }
        });
        runtime.subscribe(EventKind::Unsupported, |event| {
            if let ServiceEvent::Unsupported { content_type } = event {
                eprintln!("{}", unsupported_message(content_type));
            }
        });
    }

    runtime.start();
    runtime.dispatch(Msg::opened(DOCUMENT, &content_type, &text));
    runtime.dispatch(Msg::activated(DOCUMENT));

    if let Some(cursor) = args.expand {
        let position = cursor.position();
        runtime.dispatch(Msg::Expand(ExpandMsg::ExpandAtCursor {
            line: position.line,
            column: position.column,
        }));
        let host = runtime.host();
        if !host.edited {
            bail!("{}", host.messages.join("\n"));
        }
        print!("{}", host.buffer);
        return Ok(());
    }

    if args.watch {
        return watch(&mut runtime, &args);
    }

    if !runtime.run_until_idle(ANALYSIS_TIMEOUT) {
        bail!("analysis did not finish within {:?}", ANALYSIS_TIMEOUT);
    }

    let service = runtime.service();
    match &service.outline {
        OutlineState::Ready(model) => printer.print(model),
        OutlineState::Unsupported(content_type) => bail!(unsupported_message(content_type)),
        OutlineState::Empty => match &service.last_failure {
            Some(reason) => bail!("analysis failed: {}", reason),
            None => bail!("no outline produced"),
        },
    }
    Ok(())
}

/// Reprint the outline every time the file changes. Runs until killed.
fn watch(runtime: &mut Runtime<ConsoleHost>, args: &CliArgs) -> Result<()> {
    let watcher = FileWatcher::new(&args.file)
        .with_context(|| format!("cannot watch {}", args.file.display()))?;
    let mut reported_failure: Option<String> = None;

    loop {
        if watcher.poll_changed() {
            match read_source(watcher.path()) {
                Ok(text) => {
                    runtime.dispatch(Msg::text_replaced(DOCUMENT, &text));
                }
                Err(e) => tracing::warn!("Cannot reread {}: {}", watcher.path().display(), e),
            }
        }

        runtime.pump();

        let failure = &runtime.service().last_failure;
        if *failure != reported_failure {
            if let Some(reason) = failure {
                eprintln!("analysis failed: {}", reason);
            }
            reported_failure = failure.clone();
        }

        thread::sleep(POLL_INTERVAL);
    }
}
