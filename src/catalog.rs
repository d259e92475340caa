//! Static tool catalog returned by `tools/list`.

use std::sync::{Arc, OnceLock};

use rmcp::model::{JsonObject, Tool};
use serde_json::{json, Value};

use crate::tools::ToolName;

const STR: &str = "string";
const BOOL: &str = "boolean";

const OWNER: (&str, &str, &str) = ("owner", STR, "Repository owner (user or org)");
const REPO: (&str, &str, &str) = ("repo", STR, "Repository name");
const BRANCH: (&str, &str, &str) = ("branch", STR, "Branch (optional, default: main)");

/// JSON Schema object for a tool's arguments. `required` is omitted when empty.
fn schema(properties: &[(&str, &str, &str)], required: &[&str]) -> Arc<JsonObject> {
    let properties: JsonObject = properties
        .iter()
        .map(|&(name, kind, description)| {
            (name.to_string(), json!({ "type": kind, "description": description }))
        })
        .collect();

    let mut schema = JsonObject::new();
    schema.insert("type".into(), Value::from("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), json!(required));
    }
    Arc::new(schema)
}

impl ToolName {
    /// The `tools/list` entry for this tool.
    pub fn descriptor(self) -> Tool {
        let (description, input_schema) = match self {
            ToolName::ListRepos => (
                "List repositories of the authenticated user",
                schema(&[("type", STR, "Type: all, owner, member")], &[]),
            ),
            ToolName::CreateRepo => (
                "Create a new repository",
                schema(
                    &[
                        ("name", STR, "Repository name"),
                        ("description", STR, "Repository description"),
                        ("private", BOOL, "Private repository"),
                    ],
                    &["name"],
                ),
            ),
            ToolName::GetRepo => (
                "Get information about a repository",
                schema(&[OWNER, REPO], &["owner", "repo"]),
            ),
            ToolName::ListBranches => (
                "List branches of a repository",
                schema(&[OWNER, REPO], &["owner", "repo"]),
            ),
            ToolName::ListPulls => (
                "List pull requests of a repository",
                schema(
                    &[OWNER, REPO, ("state", STR, "State: open, closed, all")],
                    &["owner", "repo"],
                ),
            ),
            ToolName::CreatePull => (
                "Create a new pull request",
                schema(
                    &[
                        OWNER,
                        REPO,
                        ("title", STR, "Pull request title"),
                        ("body", STR, "Pull request description"),
                        ("head", STR, "Source branch"),
                        ("base", STR, "Target branch"),
                    ],
                    &["owner", "repo", "title", "head", "base"],
                ),
            ),
            ToolName::ListIssues => (
                "List issues of a repository",
                schema(
                    &[OWNER, REPO, ("state", STR, "State: open, closed, all")],
                    &["owner", "repo"],
                ),
            ),
            ToolName::CreateIssue => (
                "Create a new issue",
                schema(
                    &[
                        OWNER,
                        REPO,
                        ("title", STR, "Issue title"),
                        ("body", STR, "Issue description"),
                    ],
                    &["owner", "repo", "title"],
                ),
            ),
            ToolName::CreateFile => (
                "Create a new file in the repository",
                schema(
                    &[
                        OWNER,
                        REPO,
                        ("path", STR, "File path"),
                        ("content", STR, "File content"),
                        ("message", STR, "Commit message"),
                        BRANCH,
                    ],
                    &["owner", "repo", "path", "content", "message"],
                ),
            ),
            ToolName::UpdateFile => (
                "Update an existing file in the repository",
                schema(
                    &[
                        OWNER,
                        REPO,
                        ("path", STR, "File path"),
                        ("content", STR, "New file content"),
                        ("message", STR, "Commit message"),
                        ("sha", STR, "SHA of the file being replaced"),
                        BRANCH,
                    ],
                    &["owner", "repo", "path", "content", "message", "sha"],
                ),
            ),
            ToolName::GetFile => (
                "Get the content of a file in the repository",
                schema(
                    &[OWNER, REPO, ("path", STR, "File path"), BRANCH],
                    &["owner", "repo", "path"],
                ),
            ),
            ToolName::ListFiles => (
                "List files and directories at a path in the repository",
                schema(
                    &[
                        OWNER,
                        REPO,
                        ("path", STR, "Directory path (optional, default: repository root)"),
                        BRANCH,
                    ],
                    &["owner", "repo"],
                ),
            ),
        };

        Tool::new(self.as_str(), description, input_schema)
    }
}

/// The full catalog, built once on first use and never modified.
pub fn tool_catalog() -> &'static [Tool] {
    static CATALOG: OnceLock<Vec<Tool>> = OnceLock::new();
    CATALOG.get_or_init(|| ToolName::ALL.iter().map(|t| t.descriptor()).collect())
}
