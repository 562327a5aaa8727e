//! Short default prompt templates for small local models
//!
//! Placeholders (`%{diff}`, `%{branch_name}`, `%{commit_messages}`) are
//! filled in by the caller before evaluation.

use crate::types::{Message, Prompt};

const COMMIT_INSTRUCTIONS: &str = "Write a commit message for the diff below. \
Use a short imperative summary line of at most 50 characters, a blank line, \
then a brief body explaining what changed. Reply with the commit message only.";

const BRANCH_INSTRUCTIONS: &str = "Suggest a git branch name for the diff below. \
Use lowercase words separated by hyphens, at most five words. \
Reply with the branch name only.";

const PR_INSTRUCTIONS: &str = "Write a pull request description for the branch \
%{branch_name}. Summarize the commits below in a few sentences followed by a \
bullet list of notable changes. Reply with the description only.";

pub fn short_commit_template() -> Prompt {
    vec![
        Message::system(COMMIT_INSTRUCTIONS),
        Message::user("%{diff}"),
    ]
}

pub fn short_branch_template() -> Prompt {
    vec![
        Message::system(BRANCH_INSTRUCTIONS),
        Message::user("%{diff}"),
    ]
}

pub fn short_pr_template() -> Prompt {
    vec![
        Message::system(PR_INSTRUCTIONS),
        Message::user("%{commit_messages}"),
    ]
}

/// Replace every `%{key}` placeholder in the prompt's messages
pub fn fill_template(template: &[Message], values: &[(&str, &str)]) -> Prompt {
    template
        .iter()
        .map(|message| {
            let content = values.iter().fold(message.content.clone(), |acc, (key, value)| {
                acc.replace(&format!("%{{{}}}", key), value)
            });
            Message::new(message.role, content)
        })
        .collect()
}
