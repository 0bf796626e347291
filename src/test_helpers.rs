//! Common test helper functions shared across test modules.
use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use git2::{Oid, Signature, Time};
use secrecy::SecretString;
use std::{
    collections::HashMap,
    net::SocketAddr,
    path::Path,
    sync::{Arc, Mutex},
};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

use crate::forge::config::RemoteConfig;

/// Creates a test RemoteConfig with sensible defaults.
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        host: "github.com".to_string(),
        scheme: "https".to_string(),
        owner: "juspay".to_string(),
        repo: "hyperswitch".to_string(),
        path: "juspay/hyperswitch".to_string(),
        token: SecretString::from("test-token".to_string()),
        commit_link_base_url: "https://github.com/juspay/hyperswitch/commit"
            .to_string(),
        dry_run: false,
    }
}

/// Throwaway git repository with deterministic commit timestamps.
///
/// ```ignore
/// let repo = TestRepo::new();
/// let sha = repo.commit("feat: add thing", 1_700_000_000);
/// repo.tag("v0.1.0", &sha);
/// ```
pub struct TestRepo {
    tmp_dir: TempDir,
    repo: git2::Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let tmp_dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp_dir.path()).unwrap();
        Self { tmp_dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.tmp_dir.path()
    }

    fn signature(timestamp: i64) -> Signature<'static> {
        Signature::new("Test Author", "test@example.com", &Time::new(timestamp, 0))
            .unwrap()
    }

    /// Commit an empty tree change on HEAD and return the new sha.
    pub fn commit(&self, message: &str, timestamp: i64) -> String {
        let sig = Self::signature(timestamp);
        let tree_id = self.repo.index().unwrap().write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok());
        let parents = parent.iter().collect::<Vec<_>>();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
            .to_string()
    }

    pub fn tag(&self, name: &str, sha: &str) {
        let object = self
            .repo
            .find_object(Oid::from_str(sha).unwrap(), None)
            .unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    pub fn annotated_tag(&self, name: &str, sha: &str) {
        let object = self
            .repo
            .find_object(Oid::from_str(sha).unwrap(), None)
            .unwrap();
        let tagger = Self::signature(1_700_000_000);
        self.repo.tag(name, &object, &tagger, name, false).unwrap();
    }
}

/// Scripted reply served by [`GithubStub`].
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.to_string(),
        }
    }
}

#[derive(Clone, Default)]
struct StubState {
    routes: Arc<HashMap<(String, String), StubResponse>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    bodies: Arc<Mutex<Vec<String>>>,
}

/// Local HTTP server answering `(method, path)` routes with fixed responses
/// and recording each request's method, path and body. Unrouted requests
/// get a 501.
pub struct GithubStub {
    addr: SocketAddr,
    state: StubState,
    server: JoinHandle<()>,
}

impl GithubStub {
    pub async fn spawn(routes: Vec<(&str, &str, StubResponse)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(method, path, reply)| {
                ((method.to_string(), path.to_string()), reply)
            })
            .collect();

        let state = StubState {
            routes: Arc::new(routes),
            ..StubState::default()
        };

        let app = Router::new()
            .fallback(stub_handler)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// `host:port` to use as the remote host.
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Method and path of every request received so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Non-empty request bodies received so far.
    pub fn bodies(&self) -> Vec<String> {
        self.state.bodies.lock().unwrap().clone()
    }
}

impl Drop for GithubStub {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn stub_handler(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let key = (method.to_string(), uri.path().to_string());

    state.requests.lock().unwrap().push(key.clone());

    if !body.is_empty() {
        state.bodies.lock().unwrap().push(body);
    }

    match state.routes.get(&key).cloned() {
        Some(reply) => (
            StatusCode::from_u16(reply.status).unwrap(),
            [(header::CONTENT_TYPE, reply.content_type)],
            reply.body,
        )
            .into_response(),
        None => StatusCode::NOT_IMPLEMENTED.into_response(),
    }
}
