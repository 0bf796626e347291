//! Confirm response validation command implementation.
use color_eyre::eyre::eyre;
use log::*;
use secrecy::SecretString;
use serde_json::{Value, json};
use std::fs;

use crate::{
    cli::ValidateArgs,
    config::Config,
    result::Result,
    validator::{
        ConfirmRequest, HttpResponse, TestRun, VariableStore,
        validate_confirm_response,
    },
};

/// Request body used for a live confirm when no payload file is given.
fn default_payload() -> Value {
    json!({
        "payment_method": "bank_redirect",
        "payment_method_type": "sofort",
        "payment_method_data": {
            "bank_redirect": {
                "sofort": {
                    "country": "DE",
                    "preferred_language": "en"
                }
            }
        }
    })
}

/// Build the live confirm request from args, falling back to the stored
/// `payment_id` variable.
fn build_request(
    args: &ValidateArgs,
    base_url: &str,
    variables: &VariableStore,
) -> Result<ConfirmRequest> {
    let payment_id = args
        .payment_id
        .clone()
        .or_else(|| variables.get("payment_id").map(|v| v.to_string()))
        .ok_or(eyre!("must set --payment-id or a payment_id variable"))?;

    let api_key = args
        .api_key
        .clone()
        .ok_or(eyre!("must set --api-key for live validation"))?;

    let payload = match &args.payload {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => default_payload(),
    };

    Ok(ConfirmRequest {
        base_url: base_url.to_string(),
        payment_id,
        api_key: SecretString::from(api_key),
        payload,
    })
}

async fn load_response(
    args: &ValidateArgs,
    variables: &VariableStore,
) -> Result<HttpResponse> {
    if let Some(path) = &args.response {
        info!("validating captured response {}", path.display());
        return Ok(HttpResponse::load(path)?);
    }

    let base_url = args
        .base_url
        .as_deref()
        .ok_or(eyre!("must set --response or --base-url"))?;

    let request = build_request(args, base_url, variables)?;

    Ok(request.send().await?)
}

/// Validate the confirm response, persist variables and fail when any
/// assertion failed.
pub async fn execute(args: &ValidateArgs, config: &Config) -> Result<TestRun> {
    let mut variables = VariableStore::load(&args.variables)?;

    let response = load_response(args, &variables).await?;

    let run = validate_confirm_response(
        &response,
        &config.expectations,
        &mut variables,
    );

    variables.save(&args.variables)?;

    run.report();

    if !run.all_passed() {
        return Err(eyre!(
            "{} of {} assertions failed",
            run.failed_count(),
            run.results().len()
        ));
    }

    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SOFORT_DEPRECATION_MESSAGE;
    use std::path::Path;
    use tempfile::TempDir;

    fn args(dir: &Path, response: &str) -> ValidateArgs {
        let response_path = dir.join("response.json");
        fs::write(&response_path, response).unwrap();

        ValidateArgs {
            response: Some(response_path),
            base_url: None,
            payment_id: None,
            api_key: None,
            payload: None,
            variables: dir.join("variables.json"),
        }
    }

    #[test_log::test(tokio::test)]
    async fn passing_response_saves_variables() {
        let dir = TempDir::new().unwrap();
        let body = json!({
            "payment_id": "pay_123",
            "client_secret": "pay_123_secret",
            "status": "failed",
            "next_action": null,
            "payment_method_type": "sofort",
            "error_code": "payment_method_not_available",
            "error_message": SOFORT_DEPRECATION_MESSAGE,
            "connector": "stripe"
        });
        let response = json!({
            "status": 200,
            "headers": { "content-type": "application/json" },
            "body": body
        });
        let args = args(dir.path(), &response.to_string());

        let run = execute(&args, &Config::default()).await.unwrap();

        assert!(run.all_passed());

        let variables = VariableStore::load(&args.variables).unwrap();
        assert_eq!(variables.get("payment_id"), Some("pay_123"));
        assert_eq!(variables.get("client_secret"), Some("pay_123_secret"));
        assert!(!variables.contains("mandate_id"));
    }

    #[tokio::test]
    async fn failing_assertion_is_an_error_but_variables_are_kept() {
        let dir = TempDir::new().unwrap();
        let response = json!({
            "status": 200,
            "headers": { "content-type": "application/json" },
            "body": { "payment_id": "pay_456", "status": "succeeded" }
        });
        let args = args(dir.path(), &response.to_string());

        let result = execute(&args, &Config::default()).await;

        assert!(result.is_err());

        let variables = VariableStore::load(&args.variables).unwrap();
        assert_eq!(variables.get("payment_id"), Some("pay_456"));
    }

    #[test]
    fn live_request_falls_back_to_stored_payment_id() {
        let mut variables = VariableStore::new();
        variables.set("payment_id", "pay_789");

        let args = ValidateArgs {
            response: None,
            base_url: Some("http://localhost:8080".into()),
            payment_id: None,
            api_key: Some("snd_key".into()),
            payload: None,
            variables: "variables.json".into(),
        };

        let request =
            build_request(&args, "http://localhost:8080", &variables).unwrap();

        assert_eq!(request.payment_id, "pay_789");
        assert_eq!(request.payload["payment_method_type"], "sofort");
        assert_eq!(
            request.endpoint().unwrap().as_str(),
            "http://localhost:8080/payments/pay_789/confirm"
        );
    }

    #[test]
    fn live_request_requires_payment_id() {
        let args = ValidateArgs {
            response: None,
            base_url: Some("http://localhost:8080".into()),
            payment_id: None,
            api_key: Some("snd_key".into()),
            payload: None,
            variables: "variables.json".into(),
        };

        let result =
            build_request(&args, "http://localhost:8080", &VariableStore::new());

        assert!(result.is_err());
    }
}
