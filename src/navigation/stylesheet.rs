//! Stylesheet reference resolution.
//!
//! Views name their stylesheets by reference (for example `"books.toml"`).
//! A [`StylesheetResolver`] turns a reference into the URL of an existing
//! resource, or reports that it does not exist, and later reads the content
//! behind a URL it produced.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Resolves stylesheet references to loadable resources.
pub trait StylesheetResolver {
    /// URL of the resource behind `reference`, or `None` if it does not exist.
    fn resolve(&self, reference: &str) -> Option<String>;

    /// Reads the stylesheet at a URL previously returned by
    /// [`resolve`](Self::resolve).
    ///
    /// The default reads `url` as a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be read.
    fn read(&self, url: &str) -> io::Result<String> {
        fs::read_to_string(url)
    }
}

impl<F> StylesheetResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, reference: &str) -> Option<String> {
        self(reference)
    }
}

/// Stylesheets stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirStylesheets {
    root: PathBuf,
}

impl DirStylesheets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl StylesheetResolver for DirStylesheets {
    fn resolve(&self, reference: &str) -> Option<String> {
        let path = self.root.join(reference);
        path.is_file().then(|| path.to_string_lossy().into_owned())
    }
}

const BUILTIN_SCHEME: &str = "builtin:";

/// Stylesheets compiled into the binary, addressed as `builtin:<reference>`.
#[derive(Debug, Clone, Default)]
pub struct BuiltinStylesheets {
    sheets: Vec<(&'static str, &'static str)>,
}

impl BuiltinStylesheets {
    /// The stylesheets shipped with the demo client.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_static(&[
            ("base.toml", include_str!("../../styles/base.toml")),
            ("tables.toml", include_str!("../../styles/tables.toml")),
            ("books.toml", include_str!("../../styles/books.toml")),
            ("loans.toml", include_str!("../../styles/loans.toml")),
        ])
    }

    #[must_use]
    pub fn from_static(sheets: &[(&'static str, &'static str)]) -> Self {
        Self {
            sheets: sheets.to_vec(),
        }
    }

    fn lookup(&self, reference: &str) -> Option<&'static str> {
        self.sheets
            .iter()
            .find(|(name, _)| *name == reference)
            .map(|(_, content)| *content)
    }
}

impl StylesheetResolver for BuiltinStylesheets {
    fn resolve(&self, reference: &str) -> Option<String> {
        self.lookup(reference)
            .map(|_| format!("{BUILTIN_SCHEME}{reference}"))
    }

    fn read(&self, url: &str) -> io::Result<String> {
        url.strip_prefix(BUILTIN_SCHEME)
            .and_then(|reference| self.lookup(reference))
            .map(String::from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no built-in stylesheet at {url}")))
    }
}

/// Tries several resolvers in order; the first that resolves a reference wins.
#[derive(Default)]
pub struct LayeredStylesheets {
    layers: Vec<Box<dyn StylesheetResolver>>,
}

impl LayeredStylesheets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layer(mut self, layer: impl StylesheetResolver + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl StylesheetResolver for LayeredStylesheets {
    fn resolve(&self, reference: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.resolve(reference))
    }

    fn read(&self, url: &str) -> io::Result<String> {
        let mut last_error = io::Error::new(io::ErrorKind::NotFound, format!("no stylesheet at {url}"));
        for layer in &self.layers {
            match layer.read(url) {
                Ok(content) => return Ok(content),
                Err(err) => last_error = err,
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_resolver_only_resolves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[colors]\n").unwrap();

        let resolver = DirStylesheets::new(dir.path());
        let url = resolver.resolve("base.toml").unwrap();
        assert!(url.ends_with("base.toml"));
        assert_eq!(resolver.read(&url).unwrap(), "[colors]\n");
        assert!(resolver.resolve("missing.toml").is_none());
    }

    #[test]
    fn builtin_sheets_use_their_own_scheme() {
        let resolver = BuiltinStylesheets::from_static(&[("a.toml", "x = 1")]);
        assert_eq!(resolver.resolve("a.toml").as_deref(), Some("builtin:a.toml"));
        assert_eq!(resolver.read("builtin:a.toml").unwrap(), "x = 1");
        assert!(resolver.read("builtin:b.toml").is_err());
        assert!(resolver.resolve("b.toml").is_none());
    }

    #[test]
    fn bundled_sheets_are_present() {
        let resolver = BuiltinStylesheets::bundled();
        for reference in ["base.toml", "tables.toml", "books.toml", "loans.toml"] {
            assert!(resolver.resolve(reference).is_some(), "{reference}");
        }
    }

    #[test]
    fn layers_are_tried_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.toml"), "from disk").unwrap();

        let resolver = LayeredStylesheets::new()
            .with_layer(DirStylesheets::new(dir.path()))
            .with_layer(BuiltinStylesheets::from_static(&[("a.toml", "builtin"), ("b.toml", "b")]));

        let a = resolver.resolve("a.toml").unwrap();
        assert_eq!(resolver.read(&a).unwrap(), "from disk");

        let b = resolver.resolve("b.toml").unwrap();
        assert_eq!(b, "builtin:b.toml");
        assert_eq!(resolver.read(&b).unwrap(), "b");
    }

    #[test]
    fn closures_resolve() {
        let resolver = |reference: &str| (reference == "x").then(|| "mem:x".to_string());
        assert_eq!(resolver.resolve("x").as_deref(), Some("mem:x"));
        assert!(resolver.resolve("y").is_none());
    }
}
