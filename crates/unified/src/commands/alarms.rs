//! Alarm command handlers.

use tabled::Tabled;
use unified_api::Alarm;

use crate::cli::{AlarmsArgs, RecordCommand};
use crate::error::CliError;
use crate::output::{detail_lines, or_dash};

use super::{ALARMS, Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlarmRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Archived")]
    archived: String,
}

fn row(a: &Alarm) -> AlarmRow {
    AlarmRow {
        id: a.id.clone(),
        time: util::format_millis(a.time),
        key: or_dash(a.key.as_ref()),
        message: or_dash(a.message.as_ref()),
        archived: if a.archived { "yes" } else { "no" }.into(),
    }
}

fn detail(a: &Alarm) -> String {
    detail_lines(&[
        ("ID", a.id.clone()),
        ("Time", util::format_millis(a.time)),
        ("Key", or_dash(a.key.as_ref())),
        ("Message", or_dash(a.message.as_ref())),
        ("Subsystem", or_dash(a.subsystem.as_ref())),
        ("MAC", or_dash(a.mac.as_ref())),
        ("SSID", or_dash(a.essid.as_ref())),
        ("Occurs", or_dash(a.occurs.as_ref())),
        ("Archived", a.archived.to_string()),
        ("Handled by", or_dash(a.handled_admin_id.as_ref())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: AlarmsArgs) -> Result<(), CliError> {
    match args.command {
        RecordCommand::List(list) => {
            let alarms = ctx
                .client
                .list_alarms(util::list_options(list).as_ref())
                .await?;
            ctx.mirror(ALARMS, &alarms, |a| a.id.clone())?;
            ctx.render.list(&alarms, row, |a| a.id.clone())
        }

        RecordCommand::Get { id } => {
            let alarm = ctx.client.get_alarm(id).await?;
            ctx.render.single(&alarm, detail, |a| a.id.clone())
        }
    }
}
