//! Pull-request gateway — GitHub REST for list/create, GraphQL for the
//! best-effort auto-merge enablement.

use serde::Deserialize;
use serde_json::{json, Value};

use patronsync_core::config::RepoSlug;

use crate::error::SyncError;

const API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("patronsync/", env!("CARGO_PKG_VERSION"));

/// An open pull request, as much of it as the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    /// GraphQL node id, needed by the auto-merge mutation.
    pub node_id: String,
    pub html_url: String,
}

/// Pull-request operations the pipeline depends on.
///
/// List/create failures are fatal; auto-merge enablement is best-effort and
/// its failure is downgraded to a warning at the call site.
pub trait PullRequestGateway {
    /// Find the open pull request whose head is `branch`, if any.
    fn find_open(&self, branch: &str) -> Result<Option<PullRequest>, SyncError>;

    /// Open a pull request from `branch` into `base`.
    fn create(
        &self,
        branch: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest, SyncError>;

    /// Ask the service to merge the pull request automatically once its
    /// required checks pass.
    fn enable_auto_merge(&self, pr: &PullRequest) -> Result<(), SyncError>;
}

// ---------------------------------------------------------------------------
// GitHubApi
// ---------------------------------------------------------------------------

/// [`PullRequestGateway`] implementation over the GitHub HTTP API.
#[derive(Debug, Clone)]
pub struct GitHubApi {
    repo: RepoSlug,
    token: String,
}

impl GitHubApi {
    pub fn new(repo: RepoSlug, token: String) -> Self {
        Self { repo, token }
    }

    fn get(&self, url: &str) -> Result<Value, SyncError> {
        let response = ureq::get(url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| SyncError::PullRequest(err.to_string()))?;
        response
            .into_json()
            .map_err(|err| SyncError::PullRequest(format!("invalid response body: {err}")))
    }

    fn post(&self, url: &str, payload: Value) -> Result<Value, SyncError> {
        let response = ureq::post(url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .send_json(payload)
            .map_err(|err| SyncError::PullRequest(err.to_string()))?;
        response
            .into_json()
            .map_err(|err| SyncError::PullRequest(format!("invalid response body: {err}")))
    }
}

/// URL listing open pull requests whose head is `branch`.
fn list_url(api_root: &str, repo: &RepoSlug, branch: &str) -> String {
    format!(
        "{api_root}/repos/{}/{}/pulls?state=open&head={}:{branch}",
        repo.owner, repo.name, repo.owner
    )
}

fn create_url(api_root: &str, repo: &RepoSlug) -> String {
    format!("{api_root}/repos/{}/{}/pulls", repo.owner, repo.name)
}

fn create_payload(branch: &str, base: &str, title: &str, body: &str) -> Value {
    json!({
        "title": title,
        "head": branch,
        "base": base,
        "body": body,
    })
}

/// GraphQL mutation enabling auto-merge (squash) on a pull request node.
fn auto_merge_payload(node_id: &str) -> Value {
    json!({
        "query": "mutation($id: ID!) { \
            enablePullRequestAutoMerge(input: {pullRequestId: $id, mergeMethod: SQUASH}) { \
                clientMutationId } }",
        "variables": { "id": node_id },
    })
}

impl PullRequestGateway for GitHubApi {
    fn find_open(&self, branch: &str) -> Result<Option<PullRequest>, SyncError> {
        let url = list_url(API_ROOT, &self.repo, branch);
        let listed = self.get(&url)?;
        let mut pulls: Vec<PullRequest> = serde_json::from_value(listed)?;
        let first = pulls.drain(..).next();
        Ok(first)
    }

    fn create(
        &self,
        branch: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest, SyncError> {
        let url = create_url(API_ROOT, &self.repo);
        let created = self.post(&url, create_payload(branch, base, title, body))?;
        Ok(serde_json::from_value(created)?)
    }

    fn enable_auto_merge(&self, pr: &PullRequest) -> Result<(), SyncError> {
        let url = format!("{API_ROOT}/graphql");
        let response = self.post(&url, auto_merge_payload(&pr.node_id))?;
        // GraphQL reports failures in-band with a 200 status.
        if let Some(errors) = response.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let detail = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(SyncError::PullRequest(format!(
                    "enablePullRequestAutoMerge rejected: {detail}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoSlug {
        RepoSlug {
            owner: "octo".into(),
            name: "patrons".into(),
        }
    }

    #[test]
    fn list_url_filters_by_owner_qualified_head() {
        let url = list_url(API_ROOT, &repo(), "chore/update-patrons-list");
        assert_eq!(
            url,
            "https://api.github.com/repos/octo/patrons/pulls\
             ?state=open&head=octo:chore/update-patrons-list"
        );
    }

    #[test]
    fn create_payload_targets_base_branch() {
        let payload = create_payload("chore/update-patrons-list", "main", "title", "body");
        assert_eq!(payload["head"], "chore/update-patrons-list");
        assert_eq!(payload["base"], "main");
        assert_eq!(payload["title"], "title");
        assert_eq!(payload["body"], "body");
    }

    #[test]
    fn auto_merge_payload_carries_node_id() {
        let payload = auto_merge_payload("PR_node123");
        assert_eq!(payload["variables"]["id"], "PR_node123");
        let query = payload["query"].as_str().expect("query string");
        assert!(query.contains("enablePullRequestAutoMerge"));
        assert!(query.contains("mergeMethod: SQUASH"));
    }

    #[test]
    fn pull_request_deserializes_from_api_shape() {
        let pr: PullRequest = serde_json::from_str(
            r#"{"number":7,"node_id":"PR_abc","html_url":"https://github.com/octo/patrons/pull/7",
                "state":"open","title":"ignored extra fields"}"#,
        )
        .expect("deserialize");
        assert_eq!(pr.number, 7);
        assert_eq!(pr.node_id, "PR_abc");
    }
}
