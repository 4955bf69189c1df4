//! Prompt construction.
//!
//! Output is flat and line-oriented, one JSON object per message:
//!
//! ```text
//! <policy template>
//!
//! reported_message: {"author":"<author>","content":"<content>"}
//! surrounding_messages:
//! - {"author":"<author>","content":"<content>"}
//! - {"author":"<author>","content":"<content>"}
//! ```
//!
//! An empty context renders as `surrounding_messages: (none)`. Message text is
//! never capped. JSON string escaping keeps newlines and quotes inside their
//! entry, so message content cannot forge extra lines.

use std::fmt::Write as _;

use serde_json::json;
use warden_core::{ContextWindow, Prompt, ReportedMessage};

fn render_entry(author: &str, content: &str) -> String {
    json!({ "author": author, "content": content }).to_string()
}

/// Built-in Code of Conduct template.
pub const DEFAULT_POLICY_TEMPLATE: &str = include_str!("../prompts/code_of_conduct.md");

/// Render `template`, the reported message, and its context into a prompt.
///
/// Pure: identical inputs give byte-identical output.
pub fn build_prompt(template: &str, reported: &ReportedMessage, context: &ContextWindow) -> Prompt {
    let mut out = String::with_capacity(template.len() + 256);
    out.push_str(template.trim_end());
    out.push_str("\n\n");

    let _ = writeln!(
        out,
        "reported_message: {}",
        render_entry(&reported.author_name, &reported.content)
    );

    if context.is_empty() {
        out.push_str("surrounding_messages: (none)\n");
    } else {
        out.push_str("surrounding_messages:\n");
        for entry in context.entries() {
            let _ = writeln!(out, "- {}", render_entry(&entry.author_name, &entry.content));
        }
    }

    Prompt::new(out)
}

/// Holds the policy template for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    /// Builder using a custom policy template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Policy template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// See [`build_prompt`].
    pub fn build(&self, reported: &ReportedMessage, context: &ContextWindow) -> Prompt {
        build_prompt(&self.template, reported, context)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY_TEMPLATE)
    }
}
