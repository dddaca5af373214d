//! Icon reference resolution.

/// Maps a raw icon reference from a descriptor to a resolvable identifier.
pub trait IconResolver: Send + Sync {
    /// Resolves the reference.
    fn resolve(&self, icon: &str) -> String;
}

impl<F> IconResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn resolve(&self, icon: &str) -> String {
        self(icon)
    }
}

const PLUGIN_PREFIX: &str = "platform:/plugin/";

/// Strips the plugin scheme so `platform:/plugin/<bundle>/<path>` becomes
/// `<bundle>/<path>`. Other references pass through trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIconResolver;

impl IconResolver for DefaultIconResolver {
    fn resolve(&self, icon: &str) -> String {
        let icon = icon.trim();
        icon.strip_prefix(PLUGIN_PREFIX).unwrap_or(icon).to_string()
    }
}
