//! Derived view state for stacks and branches

use crate::errors::{BuddyError, Result};
use crate::stacks::types::{BranchDetails, PushStatus, Stack, StackDetails};
use chrono::{DateTime, TimeZone, Utc};

/// Name of the stack: the name of its top-most branch
pub fn stack_name(stack: &Stack) -> Result<&str> {
    stack
        .heads
        .first()
        .map(|head| head.name.as_str())
        .ok_or(BuddyError::EmptyStack)
}

pub fn stack_branch_names(stack: &Stack) -> Vec<&str> {
    stack.heads.iter().map(|head| head.name.as_str()).collect()
}

/// CSS color variable for a push status
pub fn push_status_color(status: PushStatus) -> &'static str {
    match status {
        PushStatus::NothingToPush
        | PushStatus::UnpushedCommits
        | PushStatus::UnpushedCommitsRequiringForce => "var(--clr-commit-remote)",
        PushStatus::CompletelyUnpushed => "var(--clr-commit-local)",
        PushStatus::Integrated => "var(--clr-commit-integrated)",
    }
}

/// Icon name for a push status
pub fn push_status_icon(status: PushStatus) -> &'static str {
    match status {
        PushStatus::CompletelyUnpushed => "branch-local",
        PushStatus::NothingToPush
        | PushStatus::UnpushedCommits
        | PushStatus::UnpushedCommitsRequiringForce
        | PushStatus::Integrated => "branch-remote",
    }
}

/// Last update of the branch in milliseconds since the epoch
pub fn branch_last_updated_at(branch: &BranchDetails) -> Option<u64> {
    branch.last_updated_at
}

pub fn branch_last_updated_at_date(branch: &BranchDetails) -> Option<DateTime<Utc>> {
    let millis = i64::try_from(branch_last_updated_at(branch)?).ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// True if the status has commits the remote does not
pub fn requires_push(status: PushStatus) -> bool {
    matches!(
        status,
        PushStatus::UnpushedCommits
            | PushStatus::UnpushedCommitsRequiringForce
            | PushStatus::CompletelyUnpushed
    )
}

pub fn stack_requires_force_push(stack: &StackDetails) -> bool {
    stack.push_status == PushStatus::UnpushedCommitsRequiringForce
}

pub fn branch_requires_force_push(branch: &BranchDetails) -> bool {
    branch.push_status == PushStatus::UnpushedCommitsRequiringForce
}

/// Does the branch, or any branch it depends on, require a force push?
///
/// `branches` is the whole stack ordered child to parent.
pub fn partial_stack_requests_force_push(branch_name: &str, branches: &[BranchDetails]) -> bool {
    branches
        .iter()
        .skip_while(|branch| branch.name != branch_name)
        .any(branch_requires_force_push)
}

pub fn stack_has_conflicts(stack: &StackDetails) -> bool {
    stack.is_conflicted
}

pub fn branch_has_conflicts(branch: &BranchDetails) -> bool {
    branch.is_conflicted
}

pub fn stack_has_unpushed_commits(stack: &StackDetails) -> bool {
    requires_push(stack.push_status)
}

pub fn branch_has_unpushed_commits(branch: &BranchDetails) -> bool {
    requires_push(branch.push_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stacks::types::StackHeadInfo;

    fn branch(name: &str, push_status: PushStatus) -> BranchDetails {
        BranchDetails {
            name: name.to_string(),
            push_status,
            is_conflicted: false,
            last_updated_at: None,
        }
    }

    fn stack(names: &[&str]) -> Stack {
        Stack {
            id: Some("stack-1".to_string()),
            heads: names
                .iter()
                .map(|name| StackHeadInfo {
                    name: name.to_string(),
                    tip: "0000000".to_string(),
                })
                .collect(),
            tip: "0000000".to_string(),
            order: 0,
        }
    }

    #[test]
    fn test_stack_name_is_top_branch() {
        let s = stack(&["top", "middle", "base"]);
        assert_eq!(stack_name(&s).unwrap(), "top");
        assert_eq!(stack_branch_names(&s), vec!["top", "middle", "base"]);
    }

    #[test]
    fn test_stack_name_without_heads() {
        assert!(matches!(stack_name(&stack(&[])), Err(BuddyError::EmptyStack)));
    }

    #[test]
    fn test_color_and_icon() {
        assert_eq!(push_status_color(PushStatus::Integrated), "var(--clr-commit-integrated)");
        assert_eq!(push_status_color(PushStatus::CompletelyUnpushed), "var(--clr-commit-local)");
        assert_eq!(push_status_color(PushStatus::UnpushedCommits), "var(--clr-commit-remote)");
        assert_eq!(push_status_icon(PushStatus::CompletelyUnpushed), "branch-local");
        assert_eq!(push_status_icon(PushStatus::Integrated), "branch-remote");
    }

    #[test]
    fn test_requires_push() {
        assert!(requires_push(PushStatus::UnpushedCommits));
        assert!(requires_push(PushStatus::UnpushedCommitsRequiringForce));
        assert!(requires_push(PushStatus::CompletelyUnpushed));
        assert!(!requires_push(PushStatus::NothingToPush));
        assert!(!requires_push(PushStatus::Integrated));
    }

    #[test]
    fn test_partial_stack_force_push() {
        let branches = vec![
            branch("child", PushStatus::UnpushedCommits),
            branch("middle", PushStatus::NothingToPush),
            branch("parent", PushStatus::UnpushedCommitsRequiringForce),
        ];
        assert!(partial_stack_requests_force_push("child", &branches));
        assert!(partial_stack_requests_force_push("parent", &branches));

        let branches = vec![
            branch("child", PushStatus::UnpushedCommitsRequiringForce),
            branch("parent", PushStatus::NothingToPush),
        ];
        // Only the named branch and its parents count
        assert!(!partial_stack_requests_force_push("parent", &branches));
        assert!(!partial_stack_requests_force_push("missing", &branches));
    }

    #[test]
    fn test_last_updated_date() {
        let mut b = branch("a", PushStatus::NothingToPush);
        assert!(branch_last_updated_at_date(&b).is_none());

        b.last_updated_at = Some(1_700_000_000_000);
        let date = branch_last_updated_at_date(&b).unwrap();
        assert_eq!(date.timestamp(), 1_700_000_000);
    }
}
