//! Provider catalog integration tests.

use std::io::Write;
use std::sync::Arc;

use af_core::{AppConfiguration, AuthProviderConfig, ConfigSource};
use af_provider::{DescriptorSource, ProviderCatalog};

use crate::common::{init_tracing, registry, shared_config, CONFIG_JSON};

fn ids<T: AsRef<str>>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    items.into_iter().map(|s| s.as_ref().to_string()).collect()
}

#[test]
fn catalog_lists_registered_providers() -> anyhow::Result<()> {
    init_tracing();
    let catalog = ProviderCatalog::with_default_icons(registry()?, shared_config()?);

    let entries = catalog.entries();
    assert_eq!(ids(entries.iter().map(|e| e.id())), vec!["ldap", "local", "sso"]);
    assert_eq!(entries[2].to_string(), "Single sign-on");
    Ok(())
}

#[test]
fn configurations_follow_store_order_and_skip_disabled() -> anyhow::Result<()> {
    init_tracing();
    let catalog = ProviderCatalog::with_default_icons(registry()?, shared_config()?);

    let ldap = catalog
        .entry("ldap")
        .ok_or_else(|| anyhow::anyhow!("ldap entry missing"))?;
    let configurations = ldap.configurations();
    assert_eq!(ids(configurations.iter().map(|c| &c.id)), vec!["corp", "partners"]);
    assert!(configurations.iter().all(|c| c.provider_id == "ldap"));

    let local = catalog
        .entry("local")
        .ok_or_else(|| anyhow::anyhow!("local entry missing"))?;
    assert!(local.configurations().is_empty());
    Ok(())
}

#[test]
fn configuration_views_fall_back_to_descriptor() -> anyhow::Result<()> {
    init_tracing();
    let catalog = ProviderCatalog::with_default_icons(registry()?, shared_config()?);

    let ldap = catalog
        .entry("ldap")
        .ok_or_else(|| anyhow::anyhow!("ldap entry missing"))?;
    let corp = &ldap.configurations()[0];
    assert_eq!(corp.display_name, "Corporate directory");
    assert_eq!(corp.description.as_deref(), Some("External LDAP directory"));
    assert_eq!(corp.icon.as_deref(), Some("auth.ldap/icons/ldap.png"));

    let sso = catalog
        .entry("sso")
        .ok_or_else(|| anyhow::anyhow!("sso entry missing"))?;
    let okta = &sso.configurations()[0];
    assert_eq!(okta.display_name, "Single sign-on");
    assert_eq!(okta.icon.as_deref(), Some("https://cdn/sso.svg"));
    assert_eq!(okta.parameters.get("tenant"), Some(&serde_json::json!("acme")));
    Ok(())
}

#[test]
fn configuration_changes_are_visible_without_rebuilding() -> anyhow::Result<()> {
    init_tracing();
    let config = shared_config()?;
    let catalog = ProviderCatalog::with_default_icons(registry()?, config.clone());
    let ldap = catalog
        .entry("ldap")
        .ok_or_else(|| anyhow::anyhow!("ldap entry missing"))?;

    assert!(config.set_configuration_disabled("legacy", false));
    config.upsert_provider_configuration("branch", AuthProviderConfig::new("ldap"))?;
    assert!(config.set_configuration_disabled("corp", true));

    let configurations = ldap.configurations();
    assert_eq!(
        ids(configurations.iter().map(|c| &c.id)),
        vec!["legacy", "partners", "branch"]
    );
    assert!(!config.set_configuration_disabled("missing", true));
    Ok(())
}

#[test]
fn default_provider_flag_tracks_configuration() -> anyhow::Result<()> {
    init_tracing();
    let config = shared_config()?;
    let catalog = ProviderCatalog::with_default_icons(registry()?, config.clone());
    let local = catalog
        .entry("local")
        .ok_or_else(|| anyhow::anyhow!("local entry missing"))?;
    let ldap = catalog
        .entry("ldap")
        .ok_or_else(|| anyhow::anyhow!("ldap entry missing"))?;

    assert!(local.is_default_provider());
    assert!(!ldap.is_default_provider());

    config.set_default_auth_provider(Some("ldap"));
    assert!(!local.is_default_provider());
    assert!(ldap.is_default_provider());

    config.set_default_auth_provider(None::<String>);
    assert!(!local.is_default_provider());
    assert!(!ldap.is_default_provider());
    assert!(catalog.default_entry().is_none());

    config.set_default_auth_provider(Some("  "));
    assert!(config.default_auth_provider().is_none());
    Ok(())
}

#[test]
fn enabled_providers_limit_sign_in_choices() -> anyhow::Result<()> {
    init_tracing();
    let config = shared_config()?;
    let catalog = ProviderCatalog::with_default_icons(registry()?, config.clone());

    config.set_enabled_auth_providers(Some(vec!["sso".to_string()]));
    assert_eq!(ids(catalog.entries().iter().map(|e| e.id())), vec!["sso"]);
    assert_eq!(catalog.all_entries().len(), 3);
    assert!(catalog.default_entry().is_none());

    config.set_enabled_auth_providers(Some(vec!["sso".to_string(), "local".to_string()]));
    let default = catalog
        .default_entry()
        .ok_or_else(|| anyhow::anyhow!("default entry missing"))?;
    assert_eq!(default.id(), "local");
    Ok(())
}

#[test]
fn catalog_reads_configuration_from_file() -> anyhow::Result<()> {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(CONFIG_JSON.as_bytes())?;

    let config = Arc::new(AppConfiguration::from_file(file.path())?);
    let catalog = ProviderCatalog::with_default_icons(registry()?, config);

    let default = catalog
        .default_entry()
        .ok_or_else(|| anyhow::anyhow!("default entry missing"))?;
    assert_eq!(default.label(), "Local");
    assert_eq!(default.icon().as_deref(), Some("auth.local/icons/local.png"));
    assert_eq!(default.credential_profiles()[0].id, "password");
    Ok(())
}

#[test]
#[allow(deprecated)]
fn legacy_credential_parameters_remain_available() -> anyhow::Result<()> {
    init_tracing();
    let catalog = ProviderCatalog::with_default_icons(registry()?, shared_config()?);
    let local = catalog
        .entry("local")
        .ok_or_else(|| anyhow::anyhow!("local entry missing"))?;

    let params = local.credential_parameters();
    assert_eq!(ids(params.iter().map(|p| &p.id)), vec!["user"]);
    assert!(params[0].user);
    Ok(())
}

#[test]
fn registry_is_a_descriptor_source() -> anyhow::Result<()> {
    let registry = registry()?;
    registry.validate_required(&["local", "ldap", "sso"])?;
    assert!(registry.validate_required(&["kerberos"]).is_err());

    let source: Arc<dyn DescriptorSource> = registry;
    assert_eq!(
        source.descriptor("sso").map(|d| d.label().to_string()),
        Some("Single sign-on".to_string())
    );
    Ok(())
}
