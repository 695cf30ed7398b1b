//! One-shot handler: submit a snippet once and print the result.

use anyhow::{bail, Result};

use crate::{
    language::Language,
    piston::Executor,
    printer::{MarkdownPrinter, TextPrinter},
    session::{Outcome, SessionState},
    view::derive_view_model,
};

/// Returns whether the execution succeeded overall.
pub async fn run<E: Executor + ?Sized>(
    executor: &E,
    language: Language,
    code: String,
    markdown: bool,
    color: bool,
) -> Result<bool> {
    let mut session = SessionState::new(language);
    session.edit_code(code);
    if let Err(e) = session.submit(executor).await {
        bail!("{}", e);
    }

    let vm = derive_view_model(&session);
    if markdown {
        MarkdownPrinter::default().print(&vm);
    } else {
        TextPrinter { color }.print(&vm);
    }

    Ok(matches!(session.last_outcome(), Some(Outcome::Result(r)) if r.overall_success()))
}
