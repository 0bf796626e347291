//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use reqwest::StatusCode;

use crate::{
    error::{CiError, Result},
    forge::{config::RemoteConfig, traits::Forge, types::Membership},
};

/// GitHub forge implementation using Octocrab for team membership lookups
/// and tag ref management.
///
/// Requests go through octocrab's raw methods so that every HTTP status is
/// seen as-is; only transport failures surface as octocrab errors.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with token authentication and API base URL
    /// configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_base_uri();
        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?
            .build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }

    fn refs_endpoint(&self) -> String {
        format!("{}/repos/{}/git/refs", self.base_uri, self.config.path)
    }

    fn tag_ref_endpoint(&self, tag: &str) -> String {
        format!("{}/tags/{tag}", self.refs_endpoint())
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn team_membership(
        &self,
        org: &str,
        team: &str,
        username: &str,
    ) -> Result<Membership> {
        let endpoint = format!(
            "{}/orgs/{org}/teams/{team}/memberships/{username}",
            self.base_uri
        );

        let response = self.instance._get(endpoint).await?;
        let status = response.status();

        if status != StatusCode::OK && status != StatusCode::NOT_FOUND {
            warn!(
                "unexpected status {status} checking {username} in team {team}: treating as non-member"
            );
        }

        Ok(Membership::from_status(status.as_u16()))
    }

    async fn create_tag_ref(&self, tag: &str, sha: &str) -> Result<()> {
        let body = serde_json::json!({
            "ref": format!("refs/tags/{tag}"),
            "sha": sha,
        });

        let response =
            self.instance._post(self.refs_endpoint(), Some(&body)).await?;
        let status = response.status();

        if !status.is_success() {
            let message = self.instance.body_to_string(response).await?;
            return Err(CiError::forge(format!(
                "creating tag {tag} failed with status {status}: {message}"
            )));
        }

        Ok(())
    }

    async fn update_tag_ref(&self, tag: &str, sha: &str) -> Result<()> {
        let body = serde_json::json!({
          "sha": sha,
          "force": true
        });

        let response = self
            .instance
            ._patch(self.tag_ref_endpoint(tag), Some(&body))
            .await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::NOT_FOUND
            || status == StatusCode::UNPROCESSABLE_ENTITY
        {
            info!("tag {tag} does not exist yet: creating");
            return self.create_tag_ref(tag, sha).await;
        }

        let message = self.instance.body_to_string(response).await?;

        Err(CiError::forge(format!(
            "updating tag {tag} failed with status {status}: {message}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        forge::manager::ForgeManager,
        release::authorize::authorize_actor,
        test_helpers::{self, GithubStub, StubResponse},
    };

    const ADMINS: &str =
        "/api/v3/orgs/juspay/teams/hyperswitch-admins/memberships/alice";
    const MAINTAINERS: &str =
        "/api/v3/orgs/juspay/teams/hyperswitch-maintainers/memberships/alice";
    const REFS: &str = "/api/v3/repos/juspay/hyperswitch/git/refs";
    const LATEST: &str = "/api/v3/repos/juspay/hyperswitch/git/refs/tags/latest";

    fn github(stub: &GithubStub) -> Github {
        Github::new(RemoteConfig {
            host: stub.host(),
            scheme: "http".into(),
            ..test_helpers::create_test_remote_config()
        })
        .unwrap()
    }

    async fn membership_for(reply: StubResponse) -> Membership {
        let stub = GithubStub::spawn(vec![("GET", ADMINS, reply)]).await;

        github(&stub)
            .team_membership("juspay", "hyperswitch-admins", "alice")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ok_status_is_member() {
        let membership = membership_for(StubResponse::json(
            200,
            r#"{"state":"active","role":"member"}"#,
        ))
        .await;

        assert_eq!(membership, Membership::Member);
    }

    #[tokio::test]
    async fn not_found_is_not_member() {
        let membership = membership_for(StubResponse::json(
            404,
            r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#,
        ))
        .await;

        assert_eq!(membership, Membership::NotMember { status: 404 });
    }

    #[tokio::test]
    async fn bad_gateway_html_is_not_member() {
        let membership = membership_for(StubResponse::html(
            502,
            "<html><body>Bad Gateway</body></html>",
        ))
        .await;

        assert_eq!(membership, Membership::NotMember { status: 502 });
    }

    #[tokio::test]
    async fn empty_error_body_is_not_member() {
        let membership = membership_for(StubResponse::html(403, "")).await;

        assert_eq!(membership, Membership::NotMember { status: 403 });
    }

    #[test_log::test(tokio::test)]
    async fn bad_gateway_on_first_team_still_checks_second() {
        let stub = GithubStub::spawn(vec![
            ("GET", ADMINS, StubResponse::html(502, "<html></html>")),
            ("GET", MAINTAINERS, StubResponse::json(200, r#"{"state":"active"}"#)),
        ])
        .await;

        let manager = ForgeManager::new(Box::new(github(&stub)));
        let teams = vec![
            "hyperswitch-admins".to_string(),
            "hyperswitch-maintainers".to_string(),
        ];

        authorize_actor(&manager, "juspay", &teams, "alice")
            .await
            .unwrap();

        let requests = stub.requests();
        assert_eq!(requests[0], ("GET".to_string(), ADMINS.to_string()));
        assert_eq!(
            requests.last(),
            Some(&("GET".to_string(), MAINTAINERS.to_string()))
        );
    }

    #[tokio::test]
    async fn creates_tag_ref() {
        let stub = GithubStub::spawn(vec![(
            "POST",
            REFS,
            StubResponse::json(201, r#"{"ref":"refs/tags/v1.2.4"}"#),
        )])
        .await;

        github(&stub).create_tag_ref("v1.2.4", "abc123").await.unwrap();

        assert_eq!(
            stub.requests(),
            vec![("POST".to_string(), REFS.to_string())]
        );
        assert_eq!(
            stub.bodies(),
            vec![r#"{"ref":"refs/tags/v1.2.4","sha":"abc123"}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn existing_tag_creation_is_an_error() {
        let stub = GithubStub::spawn(vec![(
            "POST",
            REFS,
            StubResponse::json(422, r#"{"message":"Reference already exists"}"#),
        )])
        .await;

        let err = github(&stub)
            .create_tag_ref("v1.2.4", "abc123")
            .await
            .unwrap_err();

        assert!(matches!(err, CiError::ForgeError(_)));
        assert!(err.to_string().contains("Reference already exists"));
    }

    #[tokio::test]
    async fn updates_existing_tag_with_force() {
        let stub = GithubStub::spawn(vec![(
            "PATCH",
            LATEST,
            StubResponse::json(200, r#"{"ref":"refs/tags/latest"}"#),
        )])
        .await;

        github(&stub).update_tag_ref("latest", "abc123").await.unwrap();

        assert_eq!(
            stub.requests(),
            vec![("PATCH".to_string(), LATEST.to_string())]
        );
        assert_eq!(
            stub.bodies(),
            vec![r#"{"sha":"abc123","force":true}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn missing_latest_tag_is_created() {
        let stub = GithubStub::spawn(vec![
            (
                "PATCH",
                LATEST,
                StubResponse::json(
                    422,
                    r#"{"message":"Reference does not exist"}"#,
                ),
            ),
            (
                "POST",
                REFS,
                StubResponse::json(201, r#"{"ref":"refs/tags/latest"}"#),
            ),
        ])
        .await;

        github(&stub).update_tag_ref("latest", "abc123").await.unwrap();

        assert_eq!(
            stub.requests(),
            vec![
                ("PATCH".to_string(), LATEST.to_string()),
                ("POST".to_string(), REFS.to_string()),
            ]
        );
        assert_eq!(
            stub.bodies().last(),
            Some(&r#"{"ref":"refs/tags/latest","sha":"abc123"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn update_server_error_is_an_error() {
        let stub = GithubStub::spawn(vec![(
            "PATCH",
            LATEST,
            StubResponse::html(500, "oops"),
        )])
        .await;

        let result = github(&stub).update_tag_ref("latest", "abc123").await;

        assert!(matches!(result, Err(CiError::ForgeError(_))));
        assert!(
            stub.requests()
                .iter()
                .all(|(method, _)| method.as_str() == "PATCH")
        );
    }
}
