//! The twelve tool adapters behind `tools/call`.
//!
//! Each adapter validates its required arguments in order, issues exactly one
//! [`ApiRequest`], and reshapes the JSON it gets back into either a
//! confirmation sentence or a pretty-printed field subset.

use base64::Engine;
use serde_json::{json, Value};

use crate::args::Arguments;
use crate::error::ToolError;
use crate::github::{ApiRequest, GithubApi};

const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListRepos,
    CreateRepo,
    GetRepo,
    ListBranches,
    ListPulls,
    CreatePull,
    ListIssues,
    CreateIssue,
    CreateFile,
    UpdateFile,
    GetFile,
    ListFiles,
}

impl ToolName {
    /// Catalog order.
    pub const ALL: [ToolName; 12] = [
        ToolName::ListRepos,
        ToolName::CreateRepo,
        ToolName::GetRepo,
        ToolName::ListBranches,
        ToolName::ListPulls,
        ToolName::CreatePull,
        ToolName::ListIssues,
        ToolName::CreateIssue,
        ToolName::CreateFile,
        ToolName::UpdateFile,
        ToolName::GetFile,
        ToolName::ListFiles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::ListRepos => "github_list_repos",
            ToolName::CreateRepo => "github_create_repo",
            ToolName::GetRepo => "github_get_repo",
            ToolName::ListBranches => "github_list_branches",
            ToolName::ListPulls => "github_list_prs",
            ToolName::CreatePull => "github_create_pr",
            ToolName::ListIssues => "github_list_issues",
            ToolName::CreateIssue => "github_create_issue",
            ToolName::CreateFile => "github_create_file",
            ToolName::UpdateFile => "github_update_file",
            ToolName::GetFile => "github_get_file",
            ToolName::ListFiles => "github_list_files",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

/// Run one tool to completion and return its text payload.
pub async fn call_tool(
    api: &dyn GithubApi,
    tool: ToolName,
    args: &Arguments,
) -> Result<String, ToolError> {
    match tool {
        ToolName::ListRepos => list_repos(api, args).await,
        ToolName::CreateRepo => create_repo(api, args).await,
        ToolName::GetRepo => get_repo(api, args).await,
        ToolName::ListBranches => list_branches(api, args).await,
        ToolName::ListPulls => list_pulls(api, args).await,
        ToolName::CreatePull => create_pull(api, args).await,
        ToolName::ListIssues => list_issues(api, args).await,
        ToolName::CreateIssue => create_issue(api, args).await,
        ToolName::CreateFile => put_file(api, args, false).await,
        ToolName::UpdateFile => put_file(api, args, true).await,
        ToolName::GetFile => get_file(api, args).await,
        ToolName::ListFiles => list_files(api, args).await,
    }
}

// -- Adapters --

async fn list_repos(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let kind = args.str_or("type", "all");
    let repos = api.call(ApiRequest::ListRepos { kind }).await?;
    let results: Vec<Value> = items(&repos).iter().map(repo_summary).collect();
    Ok(pretty(&results))
}

async fn create_repo(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let name = args.required_str("name", "repository name")?;
    let request = ApiRequest::CreateRepo {
        name,
        description: args.optional_str("description"),
        private: args.optional_bool("private"),
    };
    let repo = api.call(request).await?;
    Ok(format!(
        "Repository '{}' created successfully: {}",
        text(&repo, "/name"),
        text(&repo, "/html_url")
    ))
}

async fn get_repo(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let r = api.call(ApiRequest::GetRepo { owner, repo }).await?;

    let mut result = repo_summary(&r);
    if let Value::Object(ref mut map) = result {
        map.insert("forks".into(), count(&r, "/forks_count").into());
        map.insert("issues".into(), count(&r, "/open_issues_count").into());
        map.insert("created".into(), passthrough(&r, "/created_at"));
        map.insert("updated".into(), passthrough(&r, "/updated_at"));
    }
    Ok(pretty(&result))
}

async fn list_branches(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let branches = api.call(ApiRequest::ListBranches { owner, repo }).await?;

    let results: Vec<Value> = items(&branches)
        .iter()
        .map(|b| {
            json!({
                "name": text(b, "/name"),
                "protected": flag(b, "/protected"),
                "sha": text(b, "/commit/sha"),
            })
        })
        .collect();
    Ok(pretty(&results))
}

async fn list_pulls(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let state = args.str_or("state", "open");
    let pulls = api.call(ApiRequest::ListPulls { owner, repo, state }).await?;

    let results: Vec<Value> = items(&pulls)
        .iter()
        .map(|p| {
            json!({
                "number": count(p, "/number"),
                "title": text(p, "/title"),
                "state": text(p, "/state"),
                "url": text(p, "/html_url"),
                "user": text(p, "/user/login"),
                "head": text(p, "/head/ref"),
                "base": text(p, "/base/ref"),
            })
        })
        .collect();
    Ok(pretty(&results))
}

async fn create_pull(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let title = args.required_str("title", "title")?;
    let head = args.required_str("head", "head branch")?;
    let base = args.required_str("base", "base branch")?;

    let request = ApiRequest::CreatePull {
        owner,
        repo,
        title,
        head,
        base,
        body: args.optional_str("body"),
    };
    let pr = api.call(request).await?;
    Ok(format!(
        "Pull Request #{} created: {}",
        count(&pr, "/number"),
        text(&pr, "/html_url")
    ))
}

async fn list_issues(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let state = args.str_or("state", "open");
    let issues = api.call(ApiRequest::ListIssues { owner, repo, state }).await?;

    let results: Vec<Value> = items(&issues)
        .iter()
        .map(|i| {
            json!({
                "number": count(i, "/number"),
                "title": text(i, "/title"),
                "state": text(i, "/state"),
                "url": text(i, "/html_url"),
                "user": text(i, "/user/login"),
            })
        })
        .collect();
    Ok(pretty(&results))
}

async fn create_issue(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let title = args.required_str("title", "title")?;

    let request = ApiRequest::CreateIssue {
        owner,
        repo,
        title,
        body: args.optional_str("body"),
    };
    let issue = api.call(request).await?;
    Ok(format!(
        "Issue #{} created: {}",
        count(&issue, "/number"),
        text(&issue, "/html_url")
    ))
}

/// Shared by create and update; `update` additionally requires the blob sha.
async fn put_file(
    api: &dyn GithubApi,
    args: &Arguments,
    update: bool,
) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let path = args.required_str("path", "file path")?;
    let content = args.required_str("content", "file content")?;
    let message = args.required_str("message", "commit message")?;
    let sha = if update {
        Some(args.required_str("sha", "file SHA")?)
    } else {
        None
    };
    let branch = args.str_or("branch", DEFAULT_BRANCH);

    let request = ApiRequest::PutFile {
        owner,
        repo,
        path: path.clone(),
        content,
        message,
        branch,
        sha,
    };
    let written = api.call(request).await?;
    let verb = if update { "updated" } else { "created" };
    Ok(format!(
        "File '{}' {} successfully. Commit SHA: {}",
        path,
        verb,
        text(&written, "/commit/sha")
    ))
}

async fn get_file(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let path = args.required_str("path", "file path")?;
    let git_ref = args.str_or("branch", DEFAULT_BRANCH);

    let request = ApiRequest::GetContents {
        owner,
        repo,
        path: path.clone(),
        git_ref,
    };
    let file = api.call(request).await?;
    if file.is_array() {
        return Err(ToolError::Content(format!("'{}' is a directory", path)));
    }

    let result = json!({
        "path": text(&file, "/path"),
        "content": decode_content(&file)?,
        "sha": text(&file, "/sha"),
        "size": count(&file, "/size"),
        "encoding": text(&file, "/encoding"),
        "url": text(&file, "/html_url"),
    });
    Ok(pretty(&result))
}

async fn list_files(api: &dyn GithubApi, args: &Arguments) -> Result<String, ToolError> {
    let (owner, repo) = owner_and_repo(args)?;
    let path = args.str_or("path", "");
    let git_ref = args.str_or("branch", DEFAULT_BRANCH);

    let listing = api
        .call(ApiRequest::GetContents {
            owner,
            repo,
            path,
            git_ref,
        })
        .await?;

    let entry = |item: &Value| {
        json!({
            "name": text(item, "/name"),
            "path": text(item, "/path"),
            "type": text(item, "/type"),
            "size": count(item, "/size"),
            "sha": text(item, "/sha"),
            "url": text(item, "/html_url"),
        })
    };
    let results: Vec<Value> = match &listing {
        Value::Array(entries) => entries.iter().map(entry).collect(),
        Value::Object(_) => vec![entry(&listing)],
        _ => Vec::new(),
    };
    Ok(pretty(&results))
}

// -- Reshaping helpers --

fn owner_and_repo(args: &Arguments) -> Result<(String, String), ToolError> {
    let owner = args.required_str("owner", "owner")?;
    let repo = args.required_str("repo", "repository name")?;
    Ok((owner, repo))
}

fn repo_summary(r: &Value) -> Value {
    json!({
        "name": text(r, "/name"),
        "description": text(r, "/description"),
        "private": flag(r, "/private"),
        "url": text(r, "/html_url"),
        "language": text(r, "/language"),
        "stars": count(r, "/stargazers_count"),
    })
}

fn items(v: &Value) -> &[Value] {
    v.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn text<'a>(v: &'a Value, pointer: &str) -> &'a str {
    v.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

fn count(v: &Value, pointer: &str) -> u64 {
    v.pointer(pointer).and_then(Value::as_u64).unwrap_or(0)
}

fn flag(v: &Value, pointer: &str) -> bool {
    v.pointer(pointer).and_then(Value::as_bool).unwrap_or(false)
}

fn passthrough(v: &Value, pointer: &str) -> Value {
    v.pointer(pointer).cloned().unwrap_or(Value::Null)
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Decode the `content` field of a contents API file entry.
fn decode_content(file: &Value) -> Result<String, ToolError> {
    let raw = file.get("content").and_then(Value::as_str);
    match text(file, "/encoding") {
        "base64" => {
            let raw = raw.ok_or_else(|| {
                ToolError::Content("malformed response: base64 encoding of null content".into())
            })?;
            // GitHub wraps base64 bodies at 60 columns
            let cleaned: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(cleaned)
                .map_err(|e| ToolError::Content(e.to_string()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        "" => Ok(raw.unwrap_or_default().to_string()),
        other => Err(ToolError::Content(format!(
            "unsupported content encoding: {}",
            other
        ))),
    }
}
