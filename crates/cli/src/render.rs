use colored::*;
use researchmt::{
    EngineState, EngineStatus, ResearchResponse, report::Report, research::EngineAvailability,
};

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("{}\n", title.bright_blue().bold()));
}

fn section(out: &mut String, title: &str, items: &[String]) {
    heading(out, title);
    if items.is_empty() {
        out.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for item in items {
        // findings carry their own bullet
        if item.starts_with('•') {
            out.push_str(&format!("  {item}\n"));
        } else {
            out.push_str(&format!("  - {item}\n"));
        }
    }
    out.push('\n');
}

fn status_badge(status: EngineStatus) -> ColoredString {
    match status {
        EngineStatus::Ok => "OK".bright_green(),
        EngineStatus::Error => "ERROR".bright_red(),
        EngineStatus::Unavailable => "UNAVAILABLE".bright_yellow(),
    }
}

pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    heading(&mut out, "Executive Summary");
    out.push_str(&format!("  {}\n\n", report.executive_summary));
    section(&mut out, "Key Findings by Theme", &report.key_findings_by_theme);
    section(&mut out, "Tool Comparison", &report.tool_comparison);
    section(&mut out, "Risks & Uncertainties", &report.risks);
    section(&mut out, "Recommendations", &report.recommendations);
    out
}

pub fn render_engine_states(states: &[EngineState]) -> String {
    let mut out = String::new();
    heading(&mut out, "Engine Status");
    for state in states {
        let time = state
            .elapsed_ms
            .map(|ms| format!("{ms} ms"))
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!(
            "  {:<26} {:<12} {}",
            state.engine_id.label().bold(),
            status_badge(state.status),
            time
        ));
        if let Some(msg) = &state.message {
            out.push_str(&format!("  {}", msg.dimmed()));
        }
        out.push('\n');
    }
    out
}

pub fn render_response(response: &ResearchResponse, raw: bool) -> serde_json::Result<String> {
    let mut out = render_engine_states(&response.engine_states);
    out.push('\n');
    out.push_str(&render_report(&response.report));
    if raw {
        heading(&mut out, "Raw Engine Excerpts");
        out.push_str(&serde_json::to_string_pretty(&response.report.raw)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn render_engines(engines: &[EngineAvailability]) -> String {
    engines
        .iter()
        .map(|e| {
            let status = if e.configured {
                "configured".bright_green()
            } else {
                "missing API key".bright_yellow()
            };
            format!("- {} ({}): {}\n", e.engine_id, e.label, status)
        })
        .collect()
}
