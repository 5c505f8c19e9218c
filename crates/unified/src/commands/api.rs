//! Raw request passthrough.

use std::io::Write;

use tracing::debug;
use unified_api::{Method, Request};

use crate::cli::{ApiArgs, HttpMethod};
use crate::error::CliError;

use super::Context;

fn method_for(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Send the request and stream the body to stdout as received.
pub async fn handle(ctx: &Context, args: ApiArgs) -> Result<(), CliError> {
    let mut request = Request::new(method_for(args.method), args.path);
    if let Some(data) = args.data {
        // Reject malformed bodies before they reach the controller.
        serde_json::from_str::<serde_json::Value>(&data)?;
        request = request.raw_json(data);
    }

    let mut stdout = std::io::stdout();
    let meta = ctx.client.execute_to_writer(request, &mut stdout).await?;
    writeln!(stdout)?;
    debug!(status = meta.status.as_u16(), "raw request complete");
    Ok(())
}
