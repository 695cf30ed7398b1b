use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "piston-tui", about = "Run code snippets on the Piston execution API", version)]
#[command(group(ArgGroup::new("md_switch").args(["md", "no_md"]).multiple(false)))]
#[command(group(ArgGroup::new("action").args(["list_languages", "runtimes", "example"]).multiple(false)))]
pub struct Cli {
    /// Language to start with (name or alias, e.g. py, node, c++).
    #[arg(short = 'l', long = "lang")]
    pub lang: Option<String>,

    /// Run this file once and print the result instead of opening the TUI.
    ///
    /// Piped stdin is used the same way when no file is given.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<String>,

    /// Print the example snippet for --lang and exit.
    #[arg(long)]
    pub example: bool,

    /// List supported languages and their aliases.
    #[arg(long = "list-languages")]
    pub list_languages: bool,

    /// List runtimes installed on the execution service.
    #[arg(long)]
    pub runtimes: bool,

    /// Execution API base URL (overrides PISTON_API_URL).
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// Client-side request timeout in seconds (overrides REQUEST_TIMEOUT).
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Render one-shot output as Markdown.
    #[arg(long)]
    pub md: bool,
    /// Print one-shot output as plain coloured text.
    #[arg(long = "no-md")]
    pub no_md: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
