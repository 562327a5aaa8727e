//! User notices for stack operations that unapplied other stacks

use crate::stacks::types::{CreateBranchFromBranchOutcome, MoveBranchResult};

/// Test id attached to every "stacks unapplied" notice
pub const STACKS_UNAPPLIED_TEST_ID: &str = "stacks-unapplied-toast";

/// A toast-style message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub test_id: &'static str,
    pub title: String,
    pub message: String,
}

/// Sink for user notices (the UI toast layer)
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

fn stack_count(count: usize) -> String {
    if count == 1 {
        "1 stack".to_string()
    } else {
        format!("{} stacks", count)
    }
}

/// Human-readable list of stack names
///
/// Falls back to a count when the backend did not name every stack.
pub fn pretty_named_list(expected: usize, names: &[String]) -> String {
    if expected != names.len() {
        return stack_count(expected);
    }

    match names {
        [] => String::new(),
        [only] => format!("stack {}", only),
        [first, second] => format!("stack {} and stack {}", first, second),
        [all_but_last @ .., last] => {
            let head: Vec<String> = all_but_last.iter().map(|n| format!("stack {}", n)).collect();
            format!("{}, and stack {}", head.join(", "), last)
        }
    }
}

/// Notify when applying a branch forced other stacks out of the workspace
pub fn handle_create_branch_from_branch_outcome(
    outcome: &CreateBranchFromBranchOutcome,
    notifier: &dyn Notifier,
) {
    let count = outcome.unapplied_stacks.len();
    if count == 0 {
        return;
    }

    notifier.notify(Notice {
        test_id: STACKS_UNAPPLIED_TEST_ID,
        title: format!(
            "Heads up: we had to unapply {} to apply this branch",
            stack_count(count)
        ),
        message: format!(
            "Applying this branch to your workspace caused conflicts, so we automatically unapplied {}.\n\
             You can always reapply them from the branches page.",
            pretty_named_list(count, &outcome.unapplied_stacks_short_names)
        ),
    });
}

/// Notify when moving a branch forced other stacks out of the workspace
pub fn handle_move_branch_result(result: &MoveBranchResult, notifier: &dyn Notifier) {
    let count = result.unapplied_stacks.len();
    if count == 0 {
        return;
    }

    notifier.notify(Notice {
        test_id: STACKS_UNAPPLIED_TEST_ID,
        title: "Heads up: we had to unapply some stacks to move this branch".to_string(),
        message: format!(
            "It seems like the moved branch could not be applied cleanly alongside the other {}.\n\
             You can always reapply them from the branches page.",
            stack_count(count)
        ),
    });
}
