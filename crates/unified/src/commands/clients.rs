//! Client station command handlers.

use unified_api::GuestAuthorization;

use crate::cli::{ClientsArgs, ClientsCommand};
use crate::error::CliError;

use super::Context;

pub async fn handle(ctx: &Context, args: ClientsArgs) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::Block { mac } => {
            let resp = ctx.client.block_client(&mac, true).await?;
            ctx.render.command("block", &resp)
        }

        ClientsCommand::Unblock { mac } => {
            let resp = ctx.client.block_client(&mac, false).await?;
            ctx.render.command("unblock", &resp)
        }

        ClientsCommand::AuthorizeGuest {
            mac,
            minutes,
            up,
            down,
            mb,
            ap_mac,
        } => {
            let resp = ctx
                .client
                .authorize_guest(GuestAuthorization {
                    mac,
                    minutes,
                    up,
                    down,
                    bytes: mb,
                    ap_mac,
                })
                .await?;
            ctx.render.command("authorize-guest", &resp)
        }

        ClientsCommand::UnauthorizeGuest { mac } => {
            let resp = ctx.client.unauthorize_guest(&mac).await?;
            ctx.render.command("unauthorize-guest", &resp)
        }
    }
}
