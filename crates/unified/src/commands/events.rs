//! Event command handlers.

use tabled::Tabled;
use unified_api::Event;

use crate::cli::{EventsArgs, RecordCommand};
use crate::error::CliError;
use crate::output::{detail_lines, or_dash};

use super::{Context, EVENTS, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Subsystem")]
    subsystem: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn row(e: &Event) -> EventRow {
    EventRow {
        id: e.id.clone(),
        time: util::format_millis(e.time),
        subsystem: or_dash(e.subsystem.as_ref()),
        key: or_dash(e.key.as_ref()),
        message: or_dash(e.message.as_ref()),
    }
}

fn detail(e: &Event) -> String {
    let mut pairs = vec![
        ("ID", e.id.clone()),
        ("Time", util::format_millis(e.time)),
        ("Key", or_dash(e.key.as_ref())),
        ("Subsystem", or_dash(e.subsystem.as_ref())),
        ("Message", or_dash(e.message.as_ref())),
    ];
    // Only the actors this event actually names.
    let actors = [
        ("User", e.user.as_ref()),
        ("Guest", e.guest.as_ref()),
        ("Hostname", e.hostname.as_ref()),
        ("AP", e.ap.as_ref()),
        ("AP name", e.ap_name.as_ref()),
        ("Roamed from", e.ap_from.as_ref()),
        ("Roamed to", e.ap_to.as_ref()),
        ("Switch", e.switch.as_ref()),
        ("Gateway", e.gw.as_ref()),
        ("SSID", e.ssid.as_ref()),
        ("Network", e.network.as_ref()),
        ("Admin", e.admin.as_ref()),
    ];
    pairs.extend(
        actors
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v.clone()))),
    );
    if let Some(duration) = e.duration {
        pairs.push(("Duration", util::format_uptime(Some(duration))));
    }
    detail_lines(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: EventsArgs) -> Result<(), CliError> {
    match args.command {
        RecordCommand::List(list) => {
            let events = ctx
                .client
                .list_events(util::list_options(list).as_ref())
                .await?;
            ctx.mirror(EVENTS, &events, |e| e.id.clone())?;
            ctx.render.list(&events, row, |e| e.id.clone())
        }

        RecordCommand::Get { id } => {
            let event = ctx.client.get_event(id).await?;
            ctx.render.single(&event, detail, |e| e.id.clone())
        }
    }
}
