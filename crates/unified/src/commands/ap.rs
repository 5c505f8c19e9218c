//! Access point command handlers.

use serde::Serialize;

use crate::cli::{ApArgs, ApCommand};
use crate::error::CliError;

use super::{Context, util};

#[derive(Serialize)]
struct LocateState {
    mac: String,
    locating: bool,
}

pub async fn handle(ctx: &Context, args: ApArgs) -> Result<(), CliError> {
    match args.command {
        ApCommand::Locate { mac, off } => {
            let resp = ctx.client.set_locate(&mac, !off).await?;
            let action = if off { "locate off" } else { "locate on" };
            ctx.render.command(action, &resp)
        }

        ApCommand::Locating { mac } => {
            let locating = ctx.client.is_locating(&mac).await?;
            let state = LocateState { mac, locating };
            ctx.render.single(
                &state,
                |s| format!("{}: {}", s.mac, if s.locating { "locating" } else { "not locating" }),
                |s| s.locating.to_string(),
            )
        }

        ApCommand::Restart { mac } => {
            if !util::confirm(
                &format!("Restart access point {mac}? Its clients will be disconnected."),
                ctx.yes,
                "ap restart",
            )? {
                return Ok(());
            }
            let resp = ctx.client.restart_ap(&mac).await?;
            ctx.render.command("restart", &resp)
        }

        ApCommand::Disable { mac } => {
            if !util::confirm(
                &format!("Disable access point {mac}? It will stop serving clients."),
                ctx.yes,
                "ap disable",
            )? {
                return Ok(());
            }
            let resp = ctx.client.disable_ap(&mac, true).await?;
            ctx.render.command("disable", &resp)
        }

        ApCommand::Enable { mac } => {
            let resp = ctx.client.disable_ap(&mac, false).await?;
            ctx.render.command("enable", &resp)
        }

        ApCommand::Rename { mac, name } => {
            let resp = ctx.client.rename_ap(&mac, &name).await?;
            ctx.render.command("rename", &resp)
        }
    }
}
