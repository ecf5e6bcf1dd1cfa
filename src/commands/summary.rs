use crate::cli::{SummaryArgs, SummaryFormat};
use crate::report::{self, Summary};
use crate::style;

use super::{CommandContext, write_output};

pub fn cmd_summary(args: SummaryArgs) -> i32 {
    let ctx = CommandContext::new(&args.source);

    let session = match ctx.load_session() {
        Ok(session) => session,
        Err(code) => return code,
    };

    let summary = Summary::build(session.topology());
    let mut buf = Vec::new();
    let written = match args.format {
        SummaryFormat::Markdown => report::write_markdown(&summary, &mut buf),
        SummaryFormat::Json => report::write_json(&summary, &mut buf),
    };
    if let Err(e) = written {
        style::error(&format!("Failed to format summary: {}", e));
        return 1;
    }
    let content = String::from_utf8_lossy(&buf);

    match (&args.output, args.format) {
        (None, SummaryFormat::Markdown) => {
            if let Err(e) = style::render_markdown(&content, &mut std::io::stdout()) {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
        }
        (output, _) => {
            if let Err(code) = write_output(output.as_deref(), &content) {
                return code;
            }
            if let Some(path) = output {
                style::success(&format!("Summary written to {}", style::path(path)));
            }
        }
    }

    let inconsistent = summary.inconsistent().count();
    if inconsistent > 0 {
        style::warning(&format!("{} inconsistent trees", inconsistent));
    }
    0
}
