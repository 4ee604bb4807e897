use atty::Stream;
use color_eyre::Result;
use gpip_core::{CommandStatus, ExecutionOutcome};
use serde_json::Value;

use crate::cli::{Action, GpipCli};
use crate::style::Style;

/// Prints `outcome` and returns the process exit code.
pub fn emit_output(cli: &GpipCli, action: &Action, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = outcome.exit_code();

    if cli.json {
        let payload = gpip_core::to_json_response(action.name(), outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    if outcome.status == CommandStatus::Ok {
        if cli.quiet {
            return Ok(code);
        }
        let style = Style::new(cli.no_color, atty::is(Stream::Stdout));
        if *action == Action::List {
            if let Some(table) = render_recipe_table(&style, &outcome.details) {
                println!("{table}");
            }
        } else {
            println!("{}", style.status(outcome.status, &outcome.message));
            if let Some(hint) = outcome.hint() {
                println!("{}", style.info(&format!("Hint: {hint}")));
            }
        }
    } else {
        let style = Style::new(cli.no_color, atty::is(Stream::Stderr));
        eprintln!("{}", style.status(outcome.status, &outcome.message));
        if let Some(hint) = outcome.hint() {
            eprintln!("{}", style.info(&format!("Hint: {hint}")));
        }
    }

    Ok(code)
}

struct RecipeRow<'a> {
    name: &'a str,
    summary: &'a str,
}

fn render_recipe_table(style: &Style, details: &Value) -> Option<String> {
    let packages = details.get("packages")?.as_array()?;
    let rows = packages
        .iter()
        .map(|pkg| {
            Some(RecipeRow {
                name: pkg.get("name")?.as_str()?,
                summary: pkg.get("summary").and_then(Value::as_str).unwrap_or(""),
            })
        })
        .collect::<Option<Vec<_>>>()?;
    if rows.is_empty() {
        return None;
    }
    Some(format_recipe_table(style, &rows))
}

fn format_recipe_table(style: &Style, rows: &[RecipeRow<'_>]) -> String {
    let width = rows.iter().map(|row| row.name.len()).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let padded = format!("{:<width$}", row.name);
            format!("{}  {}", style.package_name(&padded), row.summary)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recipe_table_aligns_summaries() {
        let style = Style::new(true, false);
        let details = json!({
            "packages": [
                { "name": "setuptools", "summary": "build tooling" },
                { "name": "numpy", "summary": "patched 1.14.3" },
            ]
        });
        let table = render_recipe_table(&style, &details).expect("table");
        assert_eq!(
            table,
            "setuptools  build tooling\nnumpy       patched 1.14.3"
        );
    }

    #[test]
    fn empty_registry_renders_nothing() {
        let style = Style::new(true, false);
        assert!(render_recipe_table(&style, &json!({ "packages": [] })).is_none());
    }
}
