use std::{io, path::Path, process::Command};

use tracing::debug;

use crate::{
    deps,
    error::{Error, Result},
};

/// Extracts string values from an XML document. Implementations wrap the
/// platform XML tools; queries are namespace-insensitive so that the usual
/// `xmlns`-carrying project descriptors resolve without prefix plumbing.
pub trait XmlQuery {
    /// The `string()` value of the element at `path`, rooted at the document
    /// element, or `None` when the element is absent or empty.
    fn string_value(&self, file: &Path, path: &[&str]) -> Result<Option<String>>;
}

/// Picks the first available XML tool: `xmllint`, then the perl `xpath`
/// tool commonly present on macOS.
pub fn detect() -> Result<Box<dyn XmlQuery>> {
    if deps::is_available("xmllint") {
        debug!("using xmllint for XML queries");
        return Ok(Box::new(XmllintQuery));
    }
    if deps::is_available("xpath") {
        debug!("using xpath for XML queries");
        return Ok(Box::new(XpathQuery));
    }
    Err(Error::DependencyMissing("xmllint (or xpath)"))
}

/// Builds a namespace-insensitive `string()` XPath expression.
fn xpath_expr(path: &[&str]) -> String {
    let steps: String = path
        .iter()
        .map(|step| format!("/*[local-name()='{step}']"))
        .collect();
    format!("string({steps})")
}

fn query_tool(tool: &'static str, args: &[&str], file: &Path) -> Result<Option<String>> {
    let output = Command::new(tool)
        .args(args)
        .arg(file)
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::DependencyMissing(tool)
            } else {
                Error::Io(e)
            }
        })?;
    if !output.status.success() {
        return Err(Error::Tool {
            tool: tool.to_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    Ok((!value.is_empty()).then_some(value))
}

pub struct XmllintQuery;

impl XmlQuery for XmllintQuery {
    fn string_value(&self, file: &Path, path: &[&str]) -> Result<Option<String>> {
        query_tool("xmllint", &["--xpath", &xpath_expr(path)], file)
    }
}

pub struct XpathQuery;

impl XmlQuery for XpathQuery {
    fn string_value(&self, file: &Path, path: &[&str]) -> Result<Option<String>> {
        query_tool("xpath", &["-q", "-e", &xpath_expr(path)], file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_ignores_namespaces() {
        assert_eq!(
            xpath_expr(&["project", "version"]),
            "string(/*[local-name()='project']/*[local-name()='version'])"
        );
    }

    #[test]
    fn expression_for_nested_elements() {
        assert_eq!(
            xpath_expr(&["project", "scm", "url"]),
            "string(/*[local-name()='project']/*[local-name()='scm']/*[local-name()='url'])"
        );
    }
}
