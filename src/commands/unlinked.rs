use crate::cellar::Layout;
use crate::classify::{self, ReportOptions, UnlinkedFormula};
use crate::error::Result;
use crate::formulary::FormulaSource;
use colored::Colorize;

/// Output switches for the report
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlinkedArgs {
    pub desc: bool,
    pub reason: bool,
    pub json: bool,
}

/// List installed formulae that are not linked, excluding keg-only formulae
/// (since those are expected to be unlinked anyway).
pub fn unlinked(layout: &Layout, source: &dyn FormulaSource, args: UnlinkedArgs) -> Result<()> {
    let options = ReportOptions {
        desc: args.desc || args.json,
        reason: args.reason || args.json,
    };

    let entries = classify::find_unlinked(layout, source, options)?;

    if args.json {
        let json_str = serde_json::to_string_pretty(&entries)?;
        println!("{}", json_str);
        return Ok(());
    }

    for entry in &entries {
        println!("{}", render_line(entry, true));
    }

    Ok(())
}

/// `name`, then `: desc` and ` [reason]` when present
pub fn render_line(entry: &UnlinkedFormula, styled: bool) -> String {
    let mut line = entry.name.clone();

    if let Some(desc) = &entry.desc
        && !desc.is_empty()
    {
        line.push_str(": ");
        line.push_str(desc);
    }

    if let Some(reason) = &entry.reason {
        let tag = format!("[{}]", reason);
        line.push(' ');
        if styled {
            line.push_str(&tag.dimmed().to_string());
        } else {
            line.push_str(&tag);
        }
    }

    line
}
