//! Site command handlers.

use tabled::Tabled;
use unified_api::Site;

use crate::cli::{RecordCommand, SitesArgs};
use crate::error::CliError;
use crate::output::{detail_lines, or_dash};

use super::{Context, SITES, util};

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    desc: String,
    #[tabled(rename = "Role")]
    role: String,
}

fn row(s: &Site) -> SiteRow {
    SiteRow {
        id: s.id.clone(),
        name: s.name.clone(),
        desc: or_dash(s.desc.as_ref()),
        role: or_dash(s.role.as_ref()),
    }
}

fn detail(s: &Site) -> String {
    detail_lines(&[
        ("ID", s.id.clone()),
        ("Name", s.name.clone()),
        ("Description", or_dash(s.desc.as_ref())),
        ("Role", or_dash(s.role.as_ref())),
        ("Hidden ID", or_dash(s.attr_hidden_id.as_ref())),
        ("No delete", or_dash(s.attr_no_delete.as_ref())),
    ])
}

pub async fn handle(ctx: &Context, args: SitesArgs) -> Result<(), CliError> {
    match args.command {
        RecordCommand::List(list) => {
            let sites = ctx
                .client
                .list_sites(util::list_options(list).as_ref())
                .await?;
            ctx.mirror(SITES, &sites, |s| s.id.clone())?;
            ctx.render.list(&sites, row, |s| s.name.clone())
        }

        RecordCommand::Get { id } => {
            let site = ctx.client.get_site(id).await?;
            ctx.render.single(&site, detail, |s| s.name.clone())
        }
    }
}
