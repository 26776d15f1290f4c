//! Built-in message catalogs
//!
//! The snapshot's `language` key selects the catalog (`en` when absent);
//! region suffixes such as `de-AT` fall back to their base language. Keys
//! missing from a catalog fall back to English.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::domain::ports::{Translator, TranslatorFactory};
use crate::domain::value_objects::ConfigSnapshot;

type Catalog = &'static [(&'static str, &'static str)];

const EN: Catalog = &[
    ("packages.none", "No packages configured"),
    ("targets.none", "No targets configured"),
    ("deploy.package.finished", "Deployed {0} file(s) of package '{1}'"),
    ("deploy.file.finished", "Deployed '{0}' to '{1}'"),
    ("pull.package.finished", "Pulled {0} file(s) of package '{1}'"),
    ("pull.file.finished", "Pulled '{0}' from '{1}'"),
    ("delete.package.finished", "Deleted {0} file(s) of package '{1}'"),
    ("delete.file.finished", "Deleted '{0}' in '{1}'"),
    ("list.empty", "'{0}' is empty"),
    ("watch.started", "Watching {0} workspace(s), press Ctrl+C to stop"),
    ("watch.change", "{0}: {1}"),
    ("watch.reloaded", "Reloaded settings of '{0}'"),
    ("watch.failed", "Could not handle '{0}': {1}"),
    ("watch.stopped", "Stopped watching"),
];

const DE: Catalog = &[
    ("packages.none", "Keine Pakete konfiguriert"),
    ("targets.none", "Keine Ziele konfiguriert"),
    ("deploy.package.finished", "{0} Datei(en) des Pakets '{1}' bereitgestellt"),
    ("deploy.file.finished", "'{0}' nach '{1}' bereitgestellt"),
    ("pull.package.finished", "{0} Datei(en) des Pakets '{1}' abgerufen"),
    ("pull.file.finished", "'{0}' von '{1}' abgerufen"),
    ("delete.package.finished", "{0} Datei(en) des Pakets '{1}' gelöscht"),
    ("delete.file.finished", "'{0}' in '{1}' gelöscht"),
    ("list.empty", "'{0}' ist leer"),
    ("watch.started", "Beobachte {0} Arbeitsbereich(e), Strg+C zum Beenden"),
    ("watch.change", "{0}: {1}"),
    ("watch.reloaded", "Einstellungen von '{0}' neu geladen"),
    ("watch.failed", "'{0}' konnte nicht verarbeitet werden: {1}"),
    ("watch.stopped", "Beobachtung beendet"),
];

fn catalog_for(language: &str) -> Option<Catalog> {
    let base = language
        .split(['-', '_'])
        .next()
        .unwrap_or(language)
        .to_lowercase();
    match base.as_str() {
        "en" => Some(EN),
        "de" => Some(DE),
        _ => None,
    }
}

fn find(catalog: Catalog, key: &str) -> Option<&'static str> {
    catalog.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translator over one catalog with English fallback
#[derive(Debug, Clone, Copy)]
pub struct CatalogTranslator {
    catalog: Catalog,
}

impl Translator for CatalogTranslator {
    fn lookup(&self, key: &str) -> Option<String> {
        find(self.catalog, key)
            .or_else(|| find(EN, key))
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogTranslatorFactory;

impl CatalogTranslatorFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TranslatorFactory for CatalogTranslatorFactory {
    async fn create(&self, snapshot: &ConfigSnapshot) -> Result<Arc<dyn Translator>> {
        let language = snapshot.language().unwrap_or("en");
        let catalog =
            catalog_for(language).ok_or_else(|| anyhow!("no messages for language '{}'", language))?;
        Ok(Arc::new(CatalogTranslator { catalog }))
    }
}
