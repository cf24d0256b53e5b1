use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use researchmt::{Researcher, config::ResearchConfig, subquestion};
use researchmt_utils::{paths::resolve_config, telemetry::setup_telemetry};
use spinners::{Spinner, Spinners};
use std::io::{self, IsTerminal, Read};

mod cli_args;
mod render;

use cli_args::{CliArgs, Commands};
use render::{render_engines, render_response};

fn load_config(args: &CliArgs) -> Result<ResearchConfig> {
    let path = resolve_config(args.config.as_deref());
    if let Some(p) = &path {
        tracing::debug!(config = %p.display(), "loading research config");
    }
    Ok(ResearchConfig::load(path.as_deref())?)
}

fn read_question(args: &CliArgs) -> Result<String> {
    if let Some(q) = &args.question {
        return Ok(q.clone());
    }
    if io::stdin().is_terminal() {
        return Err(anyhow!(
            "No question given. Pass it as an argument or pipe it on stdin"
        ));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = setup_telemetry(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
    let args = CliArgs::parse();
    let config = load_config(&args)?;

    match &args.command {
        Some(Commands::Prompt { question }) => {
            let subquestions = subquestion::generate_subquestions(question);
            println!("{}", subquestion::build_prompt(question, &subquestions));
            return Ok(());
        }
        Some(Commands::Engines) => {
            let researcher = Researcher::from_env(config);
            print!("{}", render_engines(&researcher.engine_availability()));
            return Ok(());
        }
        None => {}
    }

    let question = read_question(&args)?;
    let researcher = Researcher::from_env(config);

    let mut spinner = (!args.json && io::stdout().is_terminal()).then(|| {
        Spinner::new(
            Spinners::Dots12,
            "Researching...".bright_magenta().to_string(),
        )
    });
    let result = researcher.run(&question).await;
    if let Some(mut sp) = spinner.take() {
        sp.stop();
        print!("\r\x1B[K");
    }
    let response = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_response(&response, args.raw)?);
    }
    Ok(())
}
