//! Stack data as delivered by the backend
//!
//! A stack is a sequence of dependent branches. Heads are ordered from the
//! top-most branch down to the base. Field names follow the backend's
//! camelCase JSON.

use serde::{Deserialize, Serialize};

/// Push state of a stack or branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PushStatus {
    NothingToPush,
    UnpushedCommits,
    UnpushedCommitsRequiringForce,
    CompletelyUnpushed,
    Integrated,
}

/// One branch head within a stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackHeadInfo {
    pub name: String,
    pub tip: String,
}

/// Entry returned by the `stacks` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: Option<String>,
    pub heads: Vec<StackHeadInfo>,
    pub tip: String,
    /// Zero-based sort position
    pub order: usize,
}

/// Stack whose id may be missing
///
/// The id is absent when no workspace is known or the workspace metadata is
/// out of sync with the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackOpt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub heads: Vec<StackHeadInfo>,
    pub tip: String,
    pub order: usize,
}

impl From<Stack> for StackOpt {
    fn from(stack: Stack) -> Self {
        Self {
            id: stack.id,
            heads: stack.heads,
            tip: stack.tip,
            order: stack.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDetails {
    pub name: String,
    pub push_status: PushStatus,
    #[serde(default)]
    pub is_conflicted: bool,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub last_updated_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackDetails {
    pub derived_name: String,
    pub push_status: PushStatus,
    #[serde(default)]
    pub is_conflicted: bool,
    /// Ordered child to parent
    #[serde(default)]
    pub branch_details: Vec<BranchDetails>,
}

/// Gerrit push options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "subject", rename_all = "camelCase")]
pub enum GerritPushFlag {
    Wip,
    Ready,
    Private,
    Hashtag(String),
    Topic(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorPosition {
    Above,
    Below,
}

/// Where a new reference is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "subject", rename_all = "camelCase")]
pub enum CreateRefAnchor {
    AtCommit {
        commit_id: String,
        position: AnchorPosition,
    },
    AtReference {
        short_name: String,
        position: AnchorPosition,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRefRequest {
    pub new_name: String,
    pub anchor: CreateRefAnchor,
}

/// One step of an interactive upstream integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "subject", rename_all = "camelCase")]
pub enum InteractiveIntegrationStep {
    #[serde(rename_all = "camelCase")]
    Skip { id: String, commit_id: String },
    #[serde(rename_all = "camelCase")]
    Pick { id: String, commit_id: String },
    #[serde(rename_all = "camelCase")]
    PickUpstream {
        id: String,
        commit_id: String,
        upstream_commit_id: String,
    },
    Squash {
        id: String,
        commits: Vec<String>,
        message: Option<String>,
    },
}

/// Result of creating a branch from another branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchFromBranchOutcome {
    pub stack_id: String,
    #[serde(default)]
    pub unapplied_stacks: Vec<String>,
    #[serde(default)]
    pub unapplied_stacks_short_names: Vec<String>,
}

/// Result of moving a branch onto another stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBranchResult {
    #[serde(default)]
    pub deleted_stacks: Vec<String>,
    #[serde(default)]
    pub unapplied_stacks: Vec<String>,
}
