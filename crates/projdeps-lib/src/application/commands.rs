//! Command execution handlers
//!
//! Handlers are generic over the registry and write to an injected stream,
//! so tests can drive them against the in-memory registry.

use crate::application::{CliConfig, Commands};
use crate::graph::{DependencyError, DependencyGraph, resolver};
use crate::manager::{DependencyManager, HostlessCatalog};
use crate::model::{HostProject, ProjectDependency, Site};
use crate::registry::{HttpRegistryClient, RegistryClient};
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Execute CLI commands against the configured registry
pub async fn execute_command(config: CliConfig) -> Result<()> {
    let mut stdout = std::io::stdout();

    let command = match config.command {
        Some(cmd) => cmd,
        None => {
            writeln!(stdout, "projdeps - project package dependency inspection")?;
            writeln!(stdout, "Run 'projdeps --help' for usage information")?;
            return Ok(());
        }
    };

    let registry = Arc::new(HttpRegistryClient::new(
        &config.app_config.registry_url,
        config.app_config.net_timeout,
    )?);
    let catalog = config.app_config.load_catalog()?;

    execute_command_with_registry(command, registry, &catalog, &mut stdout).await
}

/// Execute a specific command with a provided registry (for testing)
pub async fn execute_command_with_registry<R: RegistryClient + 'static>(
    command: Commands,
    registry: Arc<R>,
    catalog: &HostlessCatalog,
    out: &mut dyn Write,
) -> Result<()> {
    debug!("Executing {}", command.name());
    match command {
        Commands::Resolve { project_id } => {
            handle_resolve(registry.as_ref(), catalog, &project_id, out).await
        }
        Commands::CheckImport { host, candidate } => {
            handle_check_import(registry, catalog, &host, &candidate, out).await
        }
        Commands::Dependents { project_id, pkg_id } => {
            handle_dependents(registry.as_ref(), &project_id, &pkg_id, out).await
        }
    }
}

/// Latest published model of `project_id`, if the project was ever published
async fn latest_model<R: RegistryClient>(
    registry: &R,
    project_id: &str,
) -> Result<Option<Arc<ProjectDependency>>> {
    let Some(pkg) = registry
        .get_pkg_by_project_id(project_id)
        .await
        .with_context(|| format!("Failed to look up package for {}", project_id))?
    else {
        return Ok(None);
    };

    let version = registry
        .get_pkg_version(&pkg.id)
        .await
        .with_context(|| format!("Failed to fetch latest version of {}", pkg.name))?;
    Ok(Some(version.model))
}

async fn require_model<R: RegistryClient>(
    registry: &R,
    project_id: &str,
) -> Result<Arc<ProjectDependency>> {
    match latest_model(registry, project_id).await? {
        Some(model) => Ok(model),
        None => Err(DependencyError::UnpublishedPackage {
            project_id: project_id.to_string(),
        }
        .into()),
    }
}

async fn handle_resolve<R: RegistryClient>(
    registry: &R,
    catalog: &HostlessCatalog,
    project_id: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let model = require_model(registry, project_id).await?;
    let map = resolver::build_map(&model.site)
        .with_context(|| format!("Dependencies of {} do not resolve", model))?;

    let mut resolved: Vec<_> = map.values().collect();
    resolved.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.pkg_id.cmp(&b.pkg_id)));

    writeln!(out, "{} resolves {} package(s)", model, resolved.len())?;
    for dep in resolved {
        writeln!(
            out,
            "  {}@{} ({})",
            catalog.display_name(dep),
            dep.version,
            dep.pkg_id
        )?;
    }
    Ok(())
}

async fn handle_check_import<R: RegistryClient + 'static>(
    registry: Arc<R>,
    catalog: &HostlessCatalog,
    host_project_id: &str,
    candidate: &str,
    out: &mut dyn Write,
) -> Result<()> {
    // Seed the host from its latest publication, or start empty
    let site = match latest_model(registry.as_ref(), host_project_id).await? {
        Some(model) => model.site.clone(),
        None => Site::new(format!("site-{}", host_project_id)),
    };
    let host = HostProject::new(host_project_id, site);

    let mut manager = DependencyManager::new(host, registry).with_catalog(catalog.clone());
    let imported = manager
        .import(candidate)
        .await
        .with_context(|| format!("Cannot import {} into {}", candidate, host_project_id))?;
    manager.settle_refreshes().await;

    info!("Import of {} into {} is compatible", imported, host_project_id);
    writeln!(
        out,
        "{} can be imported into {}",
        imported, host_project_id
    )?;
    writeln!(out, "Direct dependencies after import:")?;
    for record in manager.list_dependencies() {
        let dep = &record.model;
        write!(out, "  {}@{}", manager.nice_dep_name(dep), dep.version)?;
        match &record.latest_version_meta {
            Some(meta) if record.has_update() => {
                writeln!(out, " (update available: {})", meta.version)?
            }
            _ => writeln!(out)?,
        }
    }
    Ok(())
}

async fn handle_dependents<R: RegistryClient>(
    registry: &R,
    project_id: &str,
    pkg_id: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let model = require_model(registry, project_id).await?;
    let graph = DependencyGraph::from_root(&model);

    let Some(dependents) = graph.dependents(pkg_id) else {
        bail!("{} is not in the dependency tree of {}", pkg_id, model);
    };

    if dependents.is_empty() {
        writeln!(out, "Nothing in {} depends on {}", model, pkg_id)?;
        return Ok(());
    }
    writeln!(out, "{} package(s) depend on {}:", dependents.len(), pkg_id)?;
    for node in dependents {
        writeln!(out, "  {}", node)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
