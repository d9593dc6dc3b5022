use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context};
use client::{ApiClient, FormDialog, FormResult};
use dotenvy::dotenv;
use models::{catalog, EntityDescriptor, FieldMap, RecordId, SchemaBinding};
use tracing::debug;

const USAGE: &str = "usage: client <clinica|restaurante|automoviles> <resource> list [filter] | create | update <id> | delete <id>";
const CANCEL: &str = ":q";

fn resolve(binding: &str, resource: &str) -> anyhow::Result<&'static EntityDescriptor> {
    let binding = SchemaBinding::from_segment(binding).ok_or_else(|| anyhow!("unknown binding {binding}\n{USAGE}"))?;
    catalog::find(binding, resource).ok_or_else(|| {
        let known: Vec<_> = catalog::entities(binding).iter().map(|d| d.resource).collect();
        anyhow!("unknown resource {resource}; expected one of: {}", known.join(", "))
    })
}

fn base_url() -> String {
    if let Ok(url) = std::env::var("API_URL") {
        return url;
    }
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => format!("http://{}", cfg.server.bind_addr()),
        Err(_) => "http://127.0.0.1:8080".to_string(),
    }
}

/// Prompt every field; an empty line keeps the current value. Loops until
/// the dialog saves or the user types `:q`.
fn run_dialog(mut dialog: FormDialog) -> anyhow::Result<Option<FormResult>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    println!("== {} ==  ({CANCEL} cancela)", dialog.title());
    loop {
        let names: Vec<&'static str> = dialog.fields().map(|(f, _)| f.name).collect();
        for name in names {
            let (field, widget) = dialog.fields().find(|(f, _)| f.name == name).context("field vanished")?;
            let mut prompt = format!("{} [{}]", field.label, widget.display());
            if let Some(valid) = dialog.email_indicator(name) {
                prompt.push_str(if valid { " ✓" } else { " ✗" });
            }
            print!("{prompt}: ");
            io::stdout().flush()?;

            let line = lines.next().transpose()?.unwrap_or_else(|| CANCEL.to_string());
            let line = line.trim_end_matches('\r');
            if line == CANCEL {
                dialog.cancel()?;
                return Ok(None);
            }
            if !line.is_empty() {
                dialog.input(name, line)?;
            }
        }
        match dialog.save() {
            Ok(result) => return Ok(Some(result)),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

/// Walk the pages until the record shows up; there is no single-item route.
async fn find_record(api: &ApiClient, descriptor: &EntityDescriptor, id: &RecordId) -> anyhow::Result<FieldMap> {
    let wanted = id.to_json();
    let mut page = 1;
    loop {
        let body = api.list(descriptor, page, 100, None).await?;
        if let Some(row) = body.data.into_iter().find(|row| row.get("id") == Some(&wanted)) {
            return Ok(row);
        }
        if !body.pagination.has_next {
            bail!("Recurso no encontrado");
        }
        page += 1;
    }
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let [binding, resource, command, rest @ ..] = args else {
        bail!(USAGE);
    };
    let descriptor = resolve(binding, resource)?;
    let api = ApiClient::new(base_url());
    let parse_id = |raw: Option<&String>| -> anyhow::Result<RecordId> {
        let raw = raw.ok_or_else(|| anyhow!(USAGE))?;
        RecordId::parse(&descriptor.identifier, raw).ok_or_else(|| anyhow!("invalid id {raw}"))
    };

    match command.as_str() {
        "list" => {
            let body = api.list(descriptor, 1, 50, rest.first().map(String::as_str)).await?;
            for row in &body.data {
                println!("{}", serde_json::Value::Object(row.clone()));
            }
            let p = body.pagination;
            println!("-- página {}/{} ({} registros)", p.page, p.total_pages, p.total_records);
        }
        "create" => {
            if let Some(form) = run_dialog(FormDialog::open_for(descriptor, None))? {
                println!("{}", api.create(descriptor, &form).await?);
            }
        }
        "update" => {
            let id = parse_id(rest.first())?;
            let current = find_record(&api, descriptor, &id).await?;
            if let Some(form) = run_dialog(FormDialog::open_for(descriptor, Some(&current)))? {
                println!("{}", api.update(descriptor, &id, &form).await?);
            }
        }
        "delete" => {
            let id = parse_id(rest.first())?;
            println!("{}", api.delete(descriptor, &id).await?);
        }
        other => bail!("unknown command {other}\n{USAGE}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    debug!(service = "client", event = "start", args = args.len(), "client starting");
    match run(&args).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
