mod cli;
mod config;
mod handlers;
mod language;
mod logging;
mod piston;
mod printer;
mod session;
mod tui;
mod utils;
mod view;

use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Result};
use config::Config;
use is_terminal::IsTerminal;
use language::Language;
use piston::PistonClient;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();

    // Load config; CLI flags override it
    let mut cfg = Config::load();
    if let Some(url) = &args.api_url {
        cfg.set("PISTON_API_URL", url.clone());
    }
    if let Some(secs) = args.timeout {
        cfg.set("REQUEST_TIMEOUT", secs.to_string());
    }

    let language = match args.lang.as_deref() {
        Some(name) => name.parse::<Language>()?,
        None => cfg.default_language(),
    };

    if args.list_languages {
        handlers::info::list_languages();
        return Ok(ExitCode::SUCCESS);
    }
    if args.example {
        handlers::info::print_example(language);
        return Ok(ExitCode::SUCCESS);
    }

    // Source for one-shot mode: --file, else piped stdin
    let stdin_is_tty = io::stdin().is_terminal();
    let source = match args.file.as_deref() {
        Some(path) => Some(utils::read_source_file(path)?),
        None if !stdin_is_tty && !args.runtimes => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Some(buf)
        }
        None => None,
    };

    let interactive = source.is_none() && !args.runtimes;
    if interactive {
        logging::init_file(&cfg.log_file())?;
    } else {
        logging::init_stderr();
    }

    let client = PistonClient::from_config(&cfg)?;
    tracing::debug!(api_url = client.base_url(), %language, "starting");

    if args.runtimes {
        handlers::info::list_runtimes(&client).await?;
        return Ok(ExitCode::SUCCESS);
    }

    match source {
        Some(code) => {
            let markdown = if args.no_md {
                false
            } else if args.md {
                true
            } else {
                cfg.get_bool("PRETTIFY_OUTPUT") && io::stdout().is_terminal()
            };
            let color = io::stdout().is_terminal();
            let ok = handlers::run::run(&client, language, code, markdown, color).await?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        None => {
            if args.md || args.no_md {
                bail!("--md/--no-md only apply to --file or piped input");
            }
            let api_url = client.base_url().to_string();
            tui::run_tui(Arc::new(client), language, api_url).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
