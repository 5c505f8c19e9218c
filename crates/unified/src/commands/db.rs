//! Document store command handlers. These never contact the controller.

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;
use tracing::info;
use unified_store::{DocId, DocumentStore};

use crate::cli::{CleanTarget, DbArgs, DbCommand};
use crate::error::CliError;
use crate::output::Render;

use super::{ALARMS, DEVICES, EVENTS, SITES, USERS, util};

/// Longest document preview shown in table mode.
const PREVIEW_CHARS: usize = 80;

#[derive(Serialize)]
struct CollectionInfo {
    name: String,
    documents: usize,
}

#[derive(Tabled)]
struct CollectionRow {
    #[tabled(rename = "Collection")]
    name: String,
    #[tabled(rename = "Documents")]
    documents: usize,
}

#[derive(Serialize)]
struct StoredDocument {
    id: DocId,
    document: Value,
}

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "#")]
    id: DocId,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Document")]
    preview: String,
}

fn document_row(d: &StoredDocument) -> DocumentRow {
    let compact = d.document.to_string();
    let preview = if compact.chars().count() > PREVIEW_CHARS {
        let mut cut: String = compact.chars().take(PREVIEW_CHARS).collect();
        cut.push('…');
        cut
    } else {
        compact
    };
    DocumentRow {
        id: d.id,
        key: document_key(d),
        preview,
    }
}

fn document_key(d: &StoredDocument) -> String {
    d.document
        .get("_id")
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_owned()
}

fn clean_targets(target: CleanTarget) -> &'static [&'static str] {
    match target {
        CleanTarget::All => &[ALARMS, EVENTS, DEVICES, SITES, USERS],
        CleanTarget::Alarms => &[ALARMS],
        CleanTarget::Events => &[EVENTS],
        CleanTarget::Devices => &[DEVICES],
        CleanTarget::Sites => &[SITES],
        CleanTarget::Users => &[USERS],
    }
}

pub fn handle(store: &DocumentStore, args: DbArgs, render: Render, yes: bool) -> Result<(), CliError> {
    match args.command {
        DbCommand::List => {
            let infos = store
                .collections()
                .into_iter()
                .map(|name| -> Result<CollectionInfo, CliError> {
                    let documents = store.len(&name)?;
                    Ok(CollectionInfo { name, documents })
                })
                .collect::<Result<Vec<_>, _>>()?;
            render.list(
                &infos,
                |c| CollectionRow {
                    name: c.name.clone(),
                    documents: c.documents,
                },
                |c| c.name.clone(),
            )
        }

        DbCommand::Show { collection } => {
            let documents: Vec<StoredDocument> = store
                .documents(&collection)?
                .into_iter()
                .map(|(id, document)| StoredDocument { id, document })
                .collect();
            render.list(&documents, document_row, document_key)
        }

        DbCommand::Clean { target } => {
            let names: Vec<&str> = clean_targets(target)
                .iter()
                .copied()
                .filter(|name| store.exists(name))
                .collect();
            if names.is_empty() {
                info!("nothing to clean");
                return Ok(());
            }
            if !util::confirm(
                &format!("Drop {} from the local store?", names.join(", ")),
                yes,
                "db clean",
            )? {
                return Ok(());
            }
            for name in &names {
                store.drop_collection(name)?;
            }
            store.flush()?;
            if !render.quiet {
                eprintln!("Dropped {}", names.join(", "));
            }
            Ok(())
        }
    }
}
