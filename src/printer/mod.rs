//! Printers for one-shot mode: coloured text (owo-colors) and markdown (termimad).

use owo_colors::OwoColorize;
use termimad::MadSkin;

use crate::view::{Body, OutputBlock, Severity, StageSection, ViewModel};

pub struct TextPrinter {
    pub color: bool,
}

impl TextPrinter {
    pub fn print(&self, vm: &ViewModel) {
        print!("{}", self.render(vm));
    }

    pub fn render(&self, vm: &ViewModel) -> String {
        let mut out = String::new();
        out.push_str(&self.paint(&vm.banner.text, vm.banner.severity));
        out.push('\n');
        if let Some(runtime) = &vm.runtime {
            out.push_str(&self.paint(&format!("Ran on {}", runtime), Severity::Neutral));
            out.push('\n');
        }

        match &vm.body {
            Body::Empty | Body::Failure => {}
            Body::NoOutput { notice } => {
                out.push('\n');
                out.push_str(&self.paint(notice, Severity::Info));
                out.push('\n');
            }
            Body::Sections(sections) => {
                for section in sections {
                    out.push('\n');
                    self.render_section(&mut out, section);
                }
            }
        }
        out
    }

    fn render_section(&self, out: &mut String, section: &StageSection) {
        let title = format!("== {} ==", section.stage.title());
        out.push_str(&if self.color { format!("{}", title.bold()) } else { title });
        out.push('\n');
        for block in [&section.stdout, &section.stderr].into_iter().flatten() {
            out.push_str(&self.paint(block.label, block.severity));
            out.push('\n');
            out.push_str(&block.text);
            if !block.text.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str(&self.paint(&section.exit.text, section.exit.severity));
        out.push('\n');
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        match severity {
            Severity::Neutral => text.dimmed().to_string(),
            Severity::Info => text.cyan().to_string(),
            Severity::Success => text.green().to_string(),
            Severity::Warning => text.yellow().to_string(),
            Severity::Error => text.red().to_string(),
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, vm: &ViewModel) {
        self.skin.print_text(&to_markdown(vm));
        println!();
    }
}

/// Markdown rendition of a view model; code blocks are tagged with the
/// language that produced the outcome.
pub fn to_markdown(vm: &ViewModel) -> String {
    let lang = vm.code_language.map(|l| l.name()).unwrap_or("");
    let mut md = format!("**{}**\n", vm.banner.text);
    if let Some(runtime) = &vm.runtime {
        md.push_str(&format!("\n*Ran on {}*\n", runtime));
    }

    match &vm.body {
        Body::Empty | Body::Failure => {}
        Body::NoOutput { notice } => md.push_str(&format!("\n*{}*\n", notice)),
        Body::Sections(sections) => {
            for section in sections {
                md.push_str(&format!("\n### {}\n", section.stage.title()));
                for block in [&section.stdout, &section.stderr].into_iter().flatten() {
                    push_block(&mut md, block, lang);
                }
                if section.exit.flagged {
                    md.push_str(&format!("\n**{}**\n", section.exit.text));
                } else {
                    md.push_str(&format!("\n*{}*\n", section.exit.text));
                }
            }
        }
    }
    md
}

fn push_block(md: &mut String, block: &OutputBlock, lang: &str) {
    md.push_str(&format!("\n{}\n```{}\n{}", block.label, lang, block.text));
    if !block.text.ends_with('\n') {
        md.push('\n');
    }
    md.push_str("```\n");
}
