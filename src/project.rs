use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    git::GitRepo,
    xml::XmlQuery,
};

/// The Maven project descriptor expected at the repository root.
pub const PROJECT_DESCRIPTOR: &str = "pom.xml";

/// The fields the comment header is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: String,
    pub version: String,
    /// Base URL for commit links; `None` disables link rendering.
    pub scm_url: Option<String>,
}

/// Finds the repository root for `start` and verifies the project layout:
/// a `.git` directory with a `pom.xml` next to it.
pub fn locate<P: AsRef<Path>>(start: P) -> Result<PathBuf> {
    let root = GitRepo::toplevel(&start)?;
    debug!("repository toplevel is {}", root.display());
    if !root.join(".git").exists() || !root.join(PROJECT_DESCRIPTOR).is_file() {
        return Err(Error::ProjectNotFound(root));
    }
    Ok(root)
}

/// Reads name, version and SCM base URL from the project descriptor.
///
/// The version and name are required; the SCM URL is optional and its
/// absence merely turns off the per-commit link lines.
pub fn read_metadata(root: &Path, xml: &dyn XmlQuery) -> Result<ProjectMetadata> {
    let pom = root.join(PROJECT_DESCRIPTOR);

    let version = xml
        .string_value(&pom, &["project", "version"])?
        .ok_or(Error::MetadataMissing("version"))?;
    let name = match xml.string_value(&pom, &["project", "name"])? {
        Some(name) => name,
        None => xml
            .string_value(&pom, &["project", "artifactId"])?
            .ok_or(Error::MetadataMissing("name"))?,
    };
    let scm_url = xml.string_value(&pom, &["project", "scm", "url"])?;
    if scm_url.is_none() {
        warn!("{PROJECT_DESCRIPTOR} has no <scm><url>, commit links will be omitted");
    }

    debug!("project {name} {version}");
    Ok(ProjectMetadata {
        name,
        version,
        scm_url,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct StubXml(HashMap<String, String>);

    impl StubXml {
        fn new(entries: &[(&str, &str)]) -> StubXml {
            StubXml(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl XmlQuery for StubXml {
        fn string_value(&self, _file: &Path, path: &[&str]) -> Result<Option<String>> {
            Ok(self.0.get(&path.join("/")).cloned())
        }
    }

    #[test]
    fn reads_name_version_and_url() {
        let xml = StubXml::new(&[
            ("project/name", "My Project"),
            ("project/version", "1.2.3"),
            ("project/scm/url", "https://github.com/me/my-project"),
        ]);
        let meta = read_metadata(Path::new("/p"), &xml).unwrap();
        assert_eq!(meta.name, "My Project");
        assert_eq!(meta.version, "1.2.3");
        assert_eq!(
            meta.scm_url.as_deref(),
            Some("https://github.com/me/my-project")
        );
    }

    #[test]
    fn name_falls_back_to_artifact_id() {
        let xml = StubXml::new(&[
            ("project/artifactId", "my-project"),
            ("project/version", "1.2.3"),
        ]);
        let meta = read_metadata(Path::new("/p"), &xml).unwrap();
        assert_eq!(meta.name, "my-project");
    }

    #[test]
    fn missing_version_is_fatal_and_specific() {
        let xml = StubXml::new(&[("project/name", "My Project")]);
        let err = read_metadata(Path::new("/p"), &xml).unwrap_err();
        assert!(matches!(err, Error::MetadataMissing("version")));
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn missing_name_is_fatal_and_specific() {
        let xml = StubXml::new(&[("project/version", "1.2.3")]);
        let err = read_metadata(Path::new("/p"), &xml).unwrap_err();
        assert!(matches!(err, Error::MetadataMissing("name")));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn missing_scm_url_is_not_fatal() {
        let xml = StubXml::new(&[
            ("project/name", "My Project"),
            ("project/version", "1.2.3"),
        ]);
        let meta = read_metadata(Path::new("/p"), &xml).unwrap();
        assert_eq!(meta.scm_url, None);
    }
}
