use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{RuntimeError, RuntimeResult};

/// Supplies the FTL text of one (locale, namespace) pair. `Ok(None)` means the
/// pair has no resource, which is not an error.
pub trait ResourceSource {
    fn ftl_text(&self, locale: &str, namespace: &str) -> RuntimeResult<Option<String>>;
}

/// Reads `<root>/<locale>/<namespace>.ftl`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resource_path(&self, locale: &str, namespace: &str) -> RuntimeResult<PathBuf> {
        if !is_path_segment(locale) {
            return Err(RuntimeError::InvalidLocale(locale.to_string()));
        }
        if !is_path_segment(namespace) {
            return Err(RuntimeError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid namespace: {namespace}"),
            )));
        }
        Ok(self.root.join(locale).join(format!("{namespace}.ftl")))
    }
}

impl ResourceSource for DirectorySource {
    fn ftl_text(&self, locale: &str, namespace: &str) -> RuntimeResult<Option<String>> {
        let path = self.resource_path(locale, namespace)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\'])
}

/// In-memory resources, keyed by (locale, namespace).
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: BTreeMap<(String, String), String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        namespace: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.resources
            .insert((locale.into(), namespace.into()), text.into());
    }

    pub fn with(
        mut self,
        locale: impl Into<String>,
        namespace: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(locale, namespace, text);
        self
    }
}

impl ResourceSource for MemorySource {
    fn ftl_text(&self, locale: &str, namespace: &str) -> RuntimeResult<Option<String>> {
        Ok(self
            .resources
            .get(&(locale.to_string(), namespace.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectorySource, MemorySource, ResourceSource};
    use crate::RuntimeError;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("ftl_i18n_source_{nanos}"))
    }

    #[test]
    fn directory_source_reads_namespace_files() {
        let root = temp_dir();
        fs::create_dir_all(root.join("en")).expect("mkdir");
        fs::write(root.join("en").join("translation.ftl"), "hello = Hello\n").expect("write");

        let source = DirectorySource::new(&root);
        assert_eq!(
            source.ftl_text("en", "translation").expect("read"),
            Some("hello = Hello\n".to_string())
        );
        assert_eq!(source.ftl_text("en", "common").expect("read"), None);
        assert_eq!(source.ftl_text("de", "translation").expect("read"), None);
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn directory_source_rejects_escaping_segments() {
        let source = DirectorySource::new(temp_dir());
        assert!(matches!(
            source.ftl_text("..", "translation"),
            Err(RuntimeError::InvalidLocale(_))
        ));
        assert!(matches!(
            source.ftl_text("en", "../secrets"),
            Err(RuntimeError::Io(_))
        ));
    }

    #[test]
    fn memory_source_returns_inserted_text() {
        let source = MemorySource::new().with("en", "translation", "a = A");
        assert_eq!(
            source.ftl_text("en", "translation").expect("text"),
            Some("a = A".to_string())
        );
        assert_eq!(source.ftl_text("en", "other").expect("text"), None);
    }
}
