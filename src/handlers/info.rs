//! Informational commands: languages, examples and the service runtime list.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::{language::Language, piston::PistonClient};

pub fn list_languages() {
    for lang in Language::ALL {
        println!("{:<12} {}", lang.name().green(), lang.aliases().join(", "));
    }
}

pub fn print_example(language: Language) {
    println!("{}", language.example().trim_matches('\n'));
}

pub async fn list_runtimes(client: &PistonClient) -> Result<()> {
    let mut runtimes = client.runtimes().await?;
    runtimes.sort_by(|a, b| a.language.cmp(&b.language).then_with(|| a.version.cmp(&b.version)));
    for rt in runtimes {
        let aliases = if rt.aliases.is_empty() { String::new() } else { format!(" ({})", rt.aliases.join(", ")) };
        match rt.runtime {
            Some(runtime) => println!("{} {} [{}]{}", rt.language.green(), rt.version, runtime, aliases),
            None => println!("{} {}{}", rt.language.green(), rt.version, aliases),
        }
    }
    Ok(())
}
