//! Command implementations.

use std::path::Path;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use flowscope_core::{
    flatten_all, tree_all, Component, ComponentFilter, Config, Flow, HttpClient, KindSet, RunState,
    StatusDocument, Traversal,
};
use tracing::{info, warn};

use crate::SelectArgs;

/// Status documents and the root id their paths are relative to.
struct Fetched {
    documents: Vec<StatusDocument>,
    root_id: Option<String>,
}

pub async fn list(config: &Config, select: &SelectArgs, recursive: bool, json: bool) -> Result<()> {
    let recursive = recursive && config.traversal.recursive;
    let fetched = fetch(config, select, recursive).await?;

    let name_filter = select.name.as_deref().map(name_contains);
    let traversal = traversal(config, select, &fetched, as_filter(&name_filter))?
        .with_recursive(recursive);

    let components = flatten_all(&fetched.documents, &traversal)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&components)?);
    } else {
        for component in &components {
            println!(
                "{}\t{}\t{}",
                component.kind_label,
                component.id,
                component.full_path()
            );
        }
    }
    Ok(())
}

pub async fn tree(config: &Config, select: &SelectArgs) -> Result<()> {
    let fetched = fetch(config, select, true).await?;

    let name_filter = select.name.as_deref().map(name_contains);
    let traversal = traversal(config, select, &fetched, as_filter(&name_filter))?;

    let tree = tree_all(&fetched.documents, &traversal)?;
    print!("{}", tree);
    Ok(())
}

pub async fn info(config: &Config, id: &str) -> Result<()> {
    let flow = Flow::connect(HttpClient::from_config(&config.server)?).await?;
    let info = flow.info(id).await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

pub async fn set_state(config: &Config, id: &str, state: RunState) -> Result<()> {
    let flow = Flow::connect(HttpClient::from_config(&config.server)?).await?;
    let reported = flow.set_state(id, state).await?;
    println!("{}\t{}", id, reported);
    Ok(())
}

fn name_contains(needle: &str) -> impl Fn(&Component<'_>) -> bool + Send + Sync + '_ {
    move |component: &Component<'_>| component.name.contains(needle)
}

fn as_filter<'a, F>(filter: &'a Option<F>) -> Option<&'a ComponentFilter<'a>>
where
    F: Fn(&Component<'_>) -> bool + Send + Sync + 'a,
{
    filter.as_ref().map(|f| f as &ComponentFilter<'a>)
}

fn traversal<'a>(
    config: &Config,
    select: &SelectArgs,
    fetched: &'a Fetched,
    filter: Option<&'a ComponentFilter<'a>>,
) -> Result<Traversal<'a>> {
    let mut traversal = Traversal::from_config(&config.traversal).map_err(|e| eyre!(e))?;
    traversal = traversal.with_kinds(kinds(config, select)?);

    if let Some(root_id) = &fetched.root_id {
        traversal = traversal.with_root_id(root_id);
    }
    if let Some(filter) = filter {
        traversal = traversal.with_filter(filter);
    }
    Ok(traversal)
}

fn kinds(config: &Config, select: &SelectArgs) -> Result<KindSet> {
    if select.all_types {
        return Ok(KindSet::ALL_KINDS);
    }
    match &select.types {
        Some(types) => types.parse().map_err(|e: String| eyre!(e)),
        None => config.traversal.kind_set().map_err(|e| eyre!(e)),
    }
}

async fn fetch(config: &Config, select: &SelectArgs, recursive: bool) -> Result<Fetched> {
    if let Some(path) = &select.file {
        if !select.ids.is_empty() {
            warn!("process group ids are ignored when reading from a file");
        }
        return read_file(path, select.root_id.clone());
    }

    let flow = Flow::connect(HttpClient::from_config(&config.server)?).await?;
    let ids = if select.ids.is_empty() {
        vec![flow.root().id.clone()]
    } else {
        select.ids.clone()
    };

    let documents = flow.statuses(&ids, recursive).await?;
    info!(groups = documents.len(), "fetched status");
    Ok(Fetched {
        documents,
        root_id: Some(flow.root().id.clone()),
    })
}

fn read_file(path: &Path, root_id: Option<String>) -> Result<Fetched> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;

    let id = root_id.clone().unwrap_or_default();
    let document = StatusDocument::from_json(id, &text)
        .wrap_err_with(|| format!("failed to decode {}", path.display()))?;

    Ok(Fetched {
        documents: vec![document],
        root_id,
    })
}
