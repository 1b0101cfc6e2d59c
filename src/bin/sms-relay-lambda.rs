//! Run the SMS relay as an AWS Lambda function behind API Gateway.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::json;
use sms_core::{HttpStatus, RelayResponse};
use sms_relay::{logging, AppConfig};
use sms_twilio::HttpClient;
use sms_web_generic::ResponseConverter;
use sms_web_lambda::{handle_event, ApiGatewayResponse, HttpEvent, LambdaResponseConverter};
use tracing::error;

/// Configuration is read fresh for every invocation; only the connection pool is shared.
async fn handle_request(
    http: HttpClient,
    event: LambdaEvent<HttpEvent>,
) -> Result<ApiGatewayResponse, Error> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return Ok(LambdaResponseConverter::from_relay_response(
                RelayResponse::json(
                    HttpStatus::InternalServerError,
                    &json!({ "success": false, "message": e.to_string() }),
                ),
            ));
        }
    };

    let processor = config.processor().with_http_client(http);
    Ok(handle_event(&processor, event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = AppConfig::load()?;
    logging::init(&config.logging)?;

    let http = HttpClient::new();
    lambda_runtime::run(service_fn(move |event| handle_request(http.clone(), event))).await
}
