//! Remote calls against the GitHub REST API.
//!
//! Every tool issues exactly one [`ApiRequest`] through a [`GithubApi`]
//! implementation and reshapes the raw JSON it gets back.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Map, Value};

use crate::error::ToolError;

/// One remote call, with every argument already resolved and defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ListRepos {
        kind: String,
    },
    CreateRepo {
        name: String,
        description: Option<String>,
        private: Option<bool>,
    },
    GetRepo {
        owner: String,
        repo: String,
    },
    ListBranches {
        owner: String,
        repo: String,
    },
    ListPulls {
        owner: String,
        repo: String,
        state: String,
    },
    CreatePull {
        owner: String,
        repo: String,
        title: String,
        head: String,
        base: String,
        body: Option<String>,
    },
    ListIssues {
        owner: String,
        repo: String,
        state: String,
    },
    CreateIssue {
        owner: String,
        repo: String,
        title: String,
        body: Option<String>,
    },
    /// Create a file, or replace it when `sha` names the current blob.
    PutFile {
        owner: String,
        repo: String,
        path: String,
        content: String,
        message: String,
        branch: String,
        sha: Option<String>,
    },
    GetContents {
        owner: String,
        repo: String,
        path: String,
        git_ref: String,
    },
}

#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn call(&self, request: ApiRequest) -> Result<Value, ToolError>;
}

/// [`GithubApi`] backed by an authenticated octocrab client.
#[derive(Clone)]
pub struct OctocrabClient {
    github: Arc<octocrab::Octocrab>,
}

impl OctocrabClient {
    pub fn new(github: octocrab::Octocrab) -> Self {
        Self {
            github: Arc::new(github),
        }
    }

    async fn get(&self, route: &str, query: Option<Value>) -> Result<Value, ToolError> {
        self.github
            .get(route, query.as_ref())
            .await
            .map_err(remote_error)
    }

    async fn post(&self, route: &str, body: Value) -> Result<Value, ToolError> {
        self.github
            .post(route, Some(&body))
            .await
            .map_err(remote_error)
    }

    async fn put(&self, route: &str, body: Value) -> Result<Value, ToolError> {
        self.github
            .put(route, Some(&body))
            .await
            .map_err(remote_error)
    }
}

#[async_trait]
impl GithubApi for OctocrabClient {
    async fn call(&self, request: ApiRequest) -> Result<Value, ToolError> {
        match request {
            ApiRequest::ListRepos { kind } => {
                self.get("/user/repos", Some(json!({ "type": kind }))).await
            }
            ApiRequest::CreateRepo {
                name,
                description,
                private,
            } => {
                let mut body = Map::new();
                body.insert("name".into(), name.into());
                insert_some(&mut body, "description", description);
                insert_some(&mut body, "private", private);
                self.post("/user/repos", Value::Object(body)).await
            }
            ApiRequest::GetRepo { owner, repo } => {
                self.get(&repo_route(&owner, &repo, "")?, None).await
            }
            ApiRequest::ListBranches { owner, repo } => {
                self.get(&repo_route(&owner, &repo, "/branches")?, None).await
            }
            ApiRequest::ListPulls { owner, repo, state } => {
                let route = repo_route(&owner, &repo, "/pulls")?;
                self.get(&route, Some(json!({ "state": state }))).await
            }
            ApiRequest::CreatePull {
                owner,
                repo,
                title,
                head,
                base,
                body,
            } => {
                let mut payload = Map::new();
                payload.insert("title".into(), title.into());
                payload.insert("head".into(), head.into());
                payload.insert("base".into(), base.into());
                insert_some(&mut payload, "body", body);
                let route = repo_route(&owner, &repo, "/pulls")?;
                self.post(&route, Value::Object(payload)).await
            }
            ApiRequest::ListIssues { owner, repo, state } => {
                let route = repo_route(&owner, &repo, "/issues")?;
                self.get(&route, Some(json!({ "state": state }))).await
            }
            ApiRequest::CreateIssue {
                owner,
                repo,
                title,
                body,
            } => {
                let mut payload = Map::new();
                payload.insert("title".into(), title.into());
                insert_some(&mut payload, "body", body);
                let route = repo_route(&owner, &repo, "/issues")?;
                self.post(&route, Value::Object(payload)).await
            }
            ApiRequest::PutFile {
                owner,
                repo,
                path,
                content,
                message,
                branch,
                sha,
            } => {
                let mut payload = Map::new();
                payload.insert("message".into(), message.into());
                payload.insert("content".into(), encode_content(&content).into());
                payload.insert("branch".into(), branch.into());
                insert_some(&mut payload, "sha", sha);
                let route = contents_route(&owner, &repo, &path)?;
                self.put(&route, Value::Object(payload)).await
            }
            ApiRequest::GetContents {
                owner,
                repo,
                path,
                git_ref,
            } => {
                let route = contents_route(&owner, &repo, &path)?;
                self.get(&route, Some(json!({ "ref": git_ref }))).await
            }
        }
    }
}

/// Flatten API error responses to the status line and GitHub's message.
fn remote_error(err: octocrab::Error) -> ToolError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            ToolError::Remote(format!("{}: {}", source.status_code, source.message))
        }
        other => ToolError::GitHub(other),
    }
}

fn insert_some<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

/// The contents API takes file bodies as standard base64.
pub fn encode_content(content: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(content.as_bytes())
}

fn repo_route(owner: &str, repo: &str, suffix: &str) -> Result<String, ToolError> {
    sanitize_github_name(owner, "owner")?;
    sanitize_github_name(repo, "repo")?;
    Ok(format!("/repos/{}/{}{}", owner, repo, suffix))
}

fn contents_route(owner: &str, repo: &str, path: &str) -> Result<String, ToolError> {
    let encoded: Vec<_> = path
        .trim_start_matches('/')
        .split('/')
        .map(urlencoding::encode)
        .collect();
    repo_route(owner, repo, &format!("/contents/{}", encoded.join("/")))
}

/// Reject owner/repo names that would change the shape of the request URL.
fn sanitize_github_name(name: &str, field: &str) -> Result<(), ToolError> {
    if name.is_empty() {
        return Err(ToolError::InvalidParam(format!("{} must not be empty", field)));
    }
    for ch in ['/', '?', '#', '%', '\0', ' ', '\n', '\t'] {
        if name.contains(ch) {
            return Err(ToolError::InvalidParam(format!(
                "{} contains invalid character '{}'",
                field, ch
            )));
        }
    }
    Ok(())
}
