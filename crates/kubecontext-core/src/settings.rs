//! The layered settings record declared by `.kubecontext` files.
//!
//! One [`Settings`] is deserialized per marker file and folded into an
//! accumulator with [`Settings::merge`]. A later layer wins a field only
//! when it actually declares a non-empty value; `environment` merges key by
//! key.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Settings declared by one marker file, or the merge of several.
///
/// YAML keys: `context`, `namespace`, `environment`, `kubeconfig`,
/// `command`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cluster context to activate.
    #[serde(rename = "context")]
    pub cluster_context: Option<String>,

    /// Namespace to make current within the active context.
    pub namespace: Option<String>,

    /// Environment variables exported to the launched tool.
    #[serde(deserialize_with = "deserialize_environment")]
    pub environment: BTreeMap<String, String>,

    /// Credentials file exported as `KUBECONFIG`.
    #[serde(rename = "kubeconfig")]
    pub kubeconfig_path: Option<PathBuf>,

    /// Replacement for the `kubectl` binary name.
    #[serde(rename = "command")]
    pub command_override: Option<String>,
}

impl Settings {
    /// Merge a more specific layer into this accumulator.
    ///
    /// Non-empty scalar fields of `layer` overwrite ours; empty or absent
    /// ones leave ours untouched. Environment entries are inserted one by
    /// one, so variables only set by earlier layers survive.
    pub fn merge(&mut self, layer: Self) {
        overlay(&mut self.cluster_context, layer.cluster_context);
        overlay(&mut self.namespace, layer.namespace);
        overlay(&mut self.kubeconfig_path, layer.kubeconfig_path);
        overlay(&mut self.command_override, layer.command_override);
        self.environment.extend(layer.environment);
    }

    /// Fold layers, least specific first, into a single record.
    #[must_use]
    pub fn merged<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        layers.into_iter().fold(Self::default(), |mut acc, layer| {
            acc.merge(layer);
            acc
        })
    }

    /// Make relative paths absolute by joining them onto `base`.
    ///
    /// `base` is the directory holding the marker file that declared them.
    /// This covers `kubeconfig`, and `command` when it names a path
    /// (`bin/oc`, `./oc`); a bare command name is left for `PATH` lookup.
    pub fn anchor_paths(&mut self, base: &Path) {
        if let Some(kubeconfig) = self.kubeconfig_path.as_mut() {
            if !kubeconfig.as_os_str().is_empty() && kubeconfig.is_relative() {
                *kubeconfig = base.join(&*kubeconfig);
            }
        }
        if let Some(command) = self.command_override.as_mut() {
            let path = Path::new(command.as_str());
            let anchored = (path.is_relative() && path.components().count() > 1)
                .then(|| base.join(path).into_os_string().into_string().ok())
                .flatten();
            if let Some(anchored) = anchored {
                *command = anchored;
            }
        }
    }

    /// `true` when the record would not change anything if applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_blank(self.cluster_context.as_ref())
            && is_blank(self.namespace.as_ref())
            && is_blank(self.kubeconfig_path.as_ref())
            && is_blank(self.command_override.as_ref())
            && self.environment.is_empty()
    }

    /// Context name, if one is set and non-empty.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.cluster_context.as_deref().filter(|s| !s.is_empty())
    }

    /// Namespace, if one is set and non-empty.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|s| !s.is_empty())
    }

    /// Kubeconfig path, if one is set and non-empty.
    #[must_use]
    pub fn kubeconfig(&self) -> Option<&Path> {
        self.kubeconfig_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Command override, if one is set and non-empty.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.command_override.as_deref().filter(|s| !s.is_empty())
    }
}

fn overlay<T: AsRef<OsStr>>(slot: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value.filter(|v| !v.as_ref().is_empty()) {
        *slot = Some(value);
    }
}

fn is_blank<T: AsRef<OsStr>>(value: Option<&T>) -> bool {
    value.is_none_or(|v| v.as_ref().is_empty())
}

/// Accept scalar values of any YAML type for environment variables.
///
/// `PORT: 8080` and `DEBUG: true` become `"8080"` and `"true"`; a null
/// value becomes the empty string. Sequences and mappings are rejected.
fn deserialize_environment<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_yaml::Value>>::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => {
                    return Err(D::Error::custom(format!(
                        "environment variable {name} must be a scalar value"
                    )));
                }
            };
            Ok((name, text))
        })
        .collect()
}
