//! Input documents: a tree of directories holding histogram records, read
//! from JSON, YAML or TOML.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::HedError;
use crate::target::Histogram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub objects: Vec<Object>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Object {
    Histogram(Histogram),
    Directory {
        name: String,
        #[serde(default)]
        objects: Vec<Object>,
    },
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, HedError> {
        let format = detect_document_format(path)?;
        let text = std::fs::read_to_string(path).map_err(|error| HedError::io(path, error))?;
        let invalid = |message: String| HedError::InvalidDocument {
            path: path.display().to_string(),
            message,
        };
        let document = match format {
            DocumentFormat::Json => {
                serde_json::from_str(&text).map_err(|error| invalid(error.to_string()))?
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(&text).map_err(|error| invalid(error.to_string()))?
            }
            DocumentFormat::Toml => {
                toml::from_str(&text).map_err(|error| invalid(error.to_string()))?
            }
        };
        debug!(path = %path.display(), ?format, "loaded document");
        Ok(document)
    }

    /// Flatten the tree depth-first in document order, filling each
    /// histogram's path and origin. `fallback_origin` is used when the
    /// document carries no name.
    pub fn into_histograms(self, fallback_origin: &str) -> Vec<Histogram> {
        let origin = self
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback_origin.to_string());
        let mut histograms = Vec::new();
        let mut directories = Vec::new();
        collect(self.objects, &origin, &mut directories, &mut histograms);
        histograms
    }
}

fn collect(
    objects: Vec<Object>,
    origin: &str,
    directories: &mut Vec<String>,
    histograms: &mut Vec<Histogram>,
) {
    for object in objects {
        match object {
            Object::Histogram(mut histogram) => {
                histogram.path = directories.join("/");
                histogram.origin = origin.to_string();
                histograms.push(histogram);
            }
            Object::Directory { name, objects } => {
                directories.push(name);
                collect(objects, origin, directories, histograms);
                directories.pop();
            }
        }
    }
}

/// Load `path` and flatten it, using the file name as the fallback origin.
pub fn load_histograms(path: &Path) -> Result<Vec<Histogram>, HedError> {
    let document = Document::load(path)?;
    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or_default()
        .to_string();
    Ok(document.into_histograms(&file_name))
}

fn detect_document_format(path: &Path) -> Result<DocumentFormat, HedError> {
    let unsupported = || HedError::UnsupportedInput {
        path: path.display().to_string(),
    };
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .ok_or_else(unsupported)?;

    match extension.as_str() {
        "json" => Ok(DocumentFormat::Json),
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        _ => Err(unsupported()),
    }
}
