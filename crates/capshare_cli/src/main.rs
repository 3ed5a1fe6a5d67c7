//! Host smoke binary.
//!
//! # Responsibility
//! - Boot a host registry from environment config and publish the shared
//!   extension store the way a plugin host does at startup.
//! - Register plugin manifests given on the command line and print what
//!   other plugins would observe.

use anyhow::{Context, Result};
use capshare_core::{
    core_version, global_host, import_extensions, init_logging_from_config, publish_extensions,
    CapabilityRegistry, DuplicatePolicy, ExtensionStore, HostConfig, PluginManifest,
};
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "capshare", version, about = "Publish the shared extension store and list registrations")]
struct Cli {
    /// Duplicate-key policy; overrides CAPSHARE_DUPLICATE_POLICY.
    #[arg(long)]
    policy: Option<DuplicatePolicy>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
    /// Plugin manifest JSON files to register into the extension store.
    manifests: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = HostConfig::from_env().context("invalid host configuration")?;
    if let Some(policy) = cli.policy {
        config.duplicate_policy = policy;
    }
    init_logging_from_config(&config).map_err(anyhow::Error::msg)?;

    let registry = Arc::new(config.build_registry());
    global_host()
        .install(registry.clone())
        .context("failed to install host registry")?;
    publish_extensions(global_host()).context("failed to publish extension store")?;

    let store = import_extensions(global_host()).context("failed to import extension store")?;
    for path in &cli.manifests {
        register_manifest_file(&store, path)?;
    }

    info!(
        "event=cli_report module=cli status=ok registrations={} plugins={}",
        registry.len(),
        store.len()
    );
    if cli.json {
        let report = build_report(&*registry, &store)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&*registry, &store));
    }
    Ok(())
}

fn register_manifest_file(store: &ExtensionStore, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest `{}`", path.display()))?;
    let manifest = PluginManifest::from_json(&text)
        .with_context(|| format!("failed to parse manifest `{}`", path.display()))?;
    store
        .register_manifest(&manifest)
        .with_context(|| format!("failed to register manifest `{}`", path.display()))
}

/// Plain-text report, one line per module and per registered extension.
fn render_text(registry: &dyn CapabilityRegistry, store: &ExtensionStore) -> String {
    let mut out = String::new();
    out.push_str(&format!("capshare_core version={}\n", core_version()));
    out.push_str(&format!("policy={}\n", registry.policy()));
    for row in registry.snapshot() {
        out.push_str(&format!(
            "module {} type={} version={} id={}\n",
            row.key,
            row.type_name,
            row.version.as_deref().unwrap_or("-"),
            row.registration_id
        ));
    }
    for point in store.extension_points() {
        for extension in store.extensions_for(&point) {
            out.push_str(&format!(
                "extension {} <- {} ({})\n",
                point, extension.component, extension.plugin_id
            ));
        }
    }
    out
}

/// JSON report: registry snapshot plus the extension store index.
fn build_report(
    registry: &dyn CapabilityRegistry,
    store: &ExtensionStore,
) -> Result<serde_json::Value> {
    let points: serde_json::Map<String, serde_json::Value> = store
        .extension_points()
        .into_iter()
        .map(|point| -> Result<(String, serde_json::Value), serde_json::Error> {
            let extensions = serde_json::to_value(store.extensions_for(&point))?;
            Ok((point, extensions))
        })
        .collect::<Result<_, _>>()?;

    Ok(serde_json::json!({
        "version": core_version(),
        "policy": registry.policy(),
        "modules": registry.snapshot(),
        "plugins": store.plugin_ids(),
        "extensionPoints": points,
    }))
}

#[cfg(test)]
mod tests {
    use super::{build_report, register_manifest_file, render_text, Cli};
    use capshare_core::{
        import_extensions, publish_extensions, DuplicatePolicy, ExtensionDeclaration,
        ExtensionStore, PluginManifest, SharedRegistry,
    };
    use clap::Parser;
    use std::io::Write;
    use std::sync::Arc;

    fn host_with_dashboard(policy: DuplicatePolicy) -> (Arc<SharedRegistry>, Arc<ExtensionStore>) {
        let registry = Arc::new(SharedRegistry::new(policy));
        publish_extensions(&registry).expect("publish extension store");
        let store = import_extensions(&registry).expect("import extension store");
        store
            .register_manifest(&PluginManifest {
                plugin_id: "dashboard".to_string(),
                version: "1.0.0".to_string(),
                extensions: vec![
                    ExtensionDeclaration::new("Logo", "jenkins.logo.top"),
                    ExtensionDeclaration::new("PipelineList", "jenkins.main.routes"),
                ],
            })
            .expect("register dashboard");
        (registry, store)
    }

    #[test]
    fn parses_policy_flag_and_manifest_paths() {
        let cli = Cli::try_parse_from(["capshare", "--policy", "overwrite", "--json", "a.json"])
            .expect("cli should parse");
        assert_eq!(cli.policy, Some(DuplicatePolicy::Overwrite));
        assert!(cli.json);
        assert_eq!(cli.manifests.len(), 1);

        assert!(Cli::try_parse_from(["capshare", "--policy", "merge"]).is_err());
    }

    #[test]
    fn registers_manifest_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp manifest");
        write!(
            file,
            r#"{{"pluginId":"dashboard","version":"1.0.0","extensions":[{{"component":"Logo","extensionPoint":"jenkins.logo.top"}}]}}"#
        )
        .expect("write manifest");

        let store = ExtensionStore::new();
        register_manifest_file(&store, file.path()).expect("register file");
        assert_eq!(store.extensions_for("jenkins.logo.top").len(), 1);

        let err = register_manifest_file(&store, file.path())
            .expect_err("second registration must fail");
        assert!(format!("{err:#}").contains("plugin already registered"));
    }

    #[test]
    fn json_report_lists_module_plugins_and_points() {
        let (registry, store) = host_with_dashboard(DuplicatePolicy::Reject);
        let report = build_report(&*registry, &store).expect("build report");

        assert_eq!(report["policy"], "reject");
        assert_eq!(report["modules"].as_array().map(Vec::len), Some(1));
        assert_eq!(report["modules"][0]["key"], "jenkins-cd:js-extensions");
        assert_eq!(report["modules"][0]["namespace"], "jenkins-cd");
        assert_eq!(report["modules"][0]["name"], "js-extensions");
        assert_eq!(report["plugins"], serde_json::json!(["dashboard"]));

        let logo = &report["extensionPoints"]["jenkins.logo.top"][0];
        assert_eq!(logo["pluginId"], "dashboard");
        assert_eq!(logo["component"], "Logo");
        assert_eq!(
            report["extensionPoints"]["jenkins.main.routes"][0]["component"],
            "PipelineList"
        );
    }

    #[test]
    fn json_report_carries_configured_policy() {
        let (registry, store) = host_with_dashboard(DuplicatePolicy::Overwrite);
        let report = build_report(&*registry, &store).expect("build report");
        assert_eq!(report["policy"], "overwrite");
    }

    #[test]
    fn text_report_lists_module_and_extensions() {
        let (registry, store) = host_with_dashboard(DuplicatePolicy::Reject);
        let text = render_text(&*registry, &store);

        assert!(text.contains("policy=reject\n"));
        assert!(text.contains("module jenkins-cd:js-extensions type="));
        assert!(text.contains(&format!("version={}", env!("CARGO_PKG_VERSION"))));
        assert!(text.contains("extension jenkins.logo.top <- Logo (dashboard)\n"));
        assert!(text.contains("extension jenkins.main.routes <- PipelineList (dashboard)\n"));
    }
}
