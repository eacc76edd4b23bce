//! Task types returned by `get_tasks` and `check_task`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Completion status of a task, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Complete,
    Incomplete,
    /// The user completed the task and then undid it (e.g. unsubscribed).
    Abort,
    /// Any status this client does not know about yet.
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Complete => "complete",
            TaskStatus::Incomplete => "incomplete",
            TaskStatus::Abort => "abort",
            TaskStatus::Other(s) => s,
        }
    }

    /// Statuses bots treat as "the user still has to act".
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Incomplete | TaskStatus::Abort)
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "complete" => TaskStatus::Complete,
            "incomplete" => TaskStatus::Incomplete,
            "abort" => TaskStatus::Abort,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Other(String::new())
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote-defined action the user must complete.
///
/// Fields are lenient: a task the service sends with missing fields still decodes,
/// and anything not modelled here is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Kind identifier, e.g. `"subscribe channel"` or `"give boost"`.
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Action links, in display order.
    #[serde(default)]
    pub links: Vec<String>,
    /// Opaque token for [`recheck_task`](crate::FlyerClient::recheck_task).
    #[serde(default)]
    pub signature: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}
