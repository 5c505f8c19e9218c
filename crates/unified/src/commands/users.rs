//! Known-client (user) command handlers.

use tabled::Tabled;
use unified_api::User;

use crate::cli::{RecordCommand, UsersArgs};
use crate::error::CliError;
use crate::output::{detail_lines, or_dash};

use super::{Context, USERS, util};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Vendor")]
    oui: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Blocked")]
    blocked: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

fn display_name(u: &User) -> String {
    u.name
        .clone()
        .or_else(|| u.hostname.clone())
        .unwrap_or_else(|| "-".into())
}

fn row(u: &User) -> UserRow {
    UserRow {
        id: u.id.clone(),
        mac: or_dash(u.mac.as_ref()),
        name: display_name(u),
        oui: or_dash(u.oui.as_ref()),
        guest: if u.is_guest { "yes" } else { "no" }.into(),
        blocked: if u.blocked { "yes" } else { "no" }.into(),
        last_seen: util::format_secs(u.last_seen),
    }
}

fn detail(u: &User) -> String {
    detail_lines(&[
        ("ID", u.id.clone()),
        ("MAC", or_dash(u.mac.as_ref())),
        ("Name", or_dash(u.name.as_ref())),
        ("Hostname", or_dash(u.hostname.as_ref())),
        ("Vendor", or_dash(u.oui.as_ref())),
        ("Wired", u.is_wired.to_string()),
        ("Guest", u.is_guest.to_string()),
        ("Blocked", u.blocked.to_string()),
        ("First seen", util::format_secs(u.first_seen)),
        ("Last seen", util::format_secs(u.last_seen)),
    ])
}

pub async fn handle(ctx: &Context, args: UsersArgs) -> Result<(), CliError> {
    match args.command {
        RecordCommand::List(list) => {
            let users = ctx
                .client
                .list_users(util::list_options(list).as_ref())
                .await?;
            ctx.mirror(USERS, &users, |u| u.id.clone())?;
            ctx.render.list(&users, row, |u| u.id.clone())
        }

        RecordCommand::Get { id } => {
            let user = ctx.client.get_user(id).await?;
            ctx.render.single(&user, detail, |u| u.id.clone())
        }
    }
}
