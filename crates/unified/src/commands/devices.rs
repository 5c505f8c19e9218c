//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;
use unified_api::{Device, DeviceFilter, DeviceShort};

use crate::cli::{DeviceKind, DevicesArgs, DevicesCommand};
use crate::error::CliError;
use crate::output::{detail_lines, or_dash};

use super::{Context, DEVICES, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Adopted")]
    adopted: String,
}

fn row(d: &DeviceShort) -> DeviceRow {
    DeviceRow {
        id: d.id.clone(),
        device_type: d.device_type.clone(),
        name: or_dash(d.name.as_ref()),
        mac: d.mac.clone(),
        model: or_dash(d.model.as_ref()),
        ip: or_dash(d.ip.as_ref()),
        version: or_dash(d.version.as_ref()),
        adopted: if d.adopted { "yes" } else { "no" }.into(),
    }
}

fn detail(d: &Device) -> String {
    let mut pairs = vec![
        ("ID", d.id.clone()),
        ("Name", d.label().to_owned()),
        ("MAC", d.mac.clone()),
        ("Type", d.device_type.clone()),
        ("Model", or_dash(d.model.as_ref())),
        ("Version", or_dash(d.version.as_ref())),
        ("Serial", or_dash(d.serial.as_ref())),
        ("IP", or_dash(d.ip.as_ref())),
        ("State", d.state.to_string()),
        ("Adopted", d.adopted.to_string()),
        ("Disabled", d.disabled.to_string()),
        ("Locating", d.locating.to_string()),
        ("Uptime", util::format_uptime(d.uptime)),
        ("Clients", or_dash(d.num_sta.as_ref())),
    ];
    if let Some(ref net) = d.config_network {
        pairs.push(("Addressing", or_dash(net.network_type.as_ref())));
    }
    if !d.port_table.is_empty() {
        let up = d.port_table.iter().filter(|p| p.up).count();
        pairs.push(("Ports", format!("{up}/{} up", d.port_table.len())));
    }
    if !d.downlink_table.is_empty() {
        pairs.push(("Downlinks", d.downlink_table.len().to_string()));
    }
    detail_lines(&pairs)
}

#[derive(Serialize)]
struct DeviceIp {
    mac: String,
    ip: String,
}

fn filter_for(kind: DeviceKind) -> DeviceFilter {
    match kind {
        DeviceKind::All => DeviceFilter::All,
        DeviceKind::Uap => DeviceFilter::Uap,
        DeviceKind::Ugw => DeviceFilter::Ugw,
        DeviceKind::Usw => DeviceFilter::Usw,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: DevicesArgs) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { kind, list } => {
            let devices = ctx
                .client
                .list_devices_short(filter_for(kind), util::list_options(list).as_ref())
                .await?;
            ctx.mirror(DEVICES, &devices, |d| d.id.clone())?;
            ctx.render.list(&devices, row, |d| d.mac.clone())
        }

        DevicesCommand::Get { id } => {
            let device = ctx.client.get_device(id).await?;
            ctx.render.single(&device, detail, |d| d.mac.clone())
        }

        DevicesCommand::Inspect { mac } => {
            let device = ctx.client.get_device_by_mac(&mac).await?;
            ctx.render.single(&device, detail, |d| d.mac.clone())
        }

        DevicesCommand::Ip { mac } => {
            let ip = ctx.client.device_ip_from_mac(&mac).await?;
            let answer = DeviceIp { mac, ip };
            ctx.render
                .single(&answer, |a| a.ip.clone(), |a| a.ip.clone())
        }
    }
}
