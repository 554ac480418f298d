//! Action tags and the table of actions a server supports.
//!
//! Every ORC operation is addressed as `module/action`. Tags are parsed and
//! validated locally; the server's capability set is fetched once and
//! consulted before anything is dispatched.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{OrcError, Result};

/// A validated `module/action` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionTag {
    module: String,
    action: String,
}

impl ActionTag {
    /// Build a tag from its two parts. Both must be non-empty and free of `/`.
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Result<Self> {
        let module = module.into();
        let action = action.into();
        if !valid_segment(&module) || !valid_segment(&action) {
            return Err(OrcError::InvalidActionTag(format!("{}/{}", module, action)));
        }
        Ok(Self { module, action })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Request path for this action on the server.
    pub fn endpoint(&self) -> String {
        format!("/{}/{}", self.module, self.action)
    }
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/')
}

impl FromStr for ActionTag {
    type Err = OrcError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [module, action] if !module.is_empty() && !action.is_empty() => Ok(Self {
                module: module.to_string(),
                action: action.to_string(),
            }),
            _ => Err(OrcError::InvalidActionTag(s.to_string())),
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.action)
    }
}

/// Lookup table of module name to the actions it exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, Vec<String>>")]
pub struct SupportedActions {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl From<HashMap<String, Vec<String>>> for SupportedActions {
    fn from(raw: HashMap<String, Vec<String>>) -> Self {
        let modules = raw
            .into_iter()
            .map(|(module, actions)| (module, actions.into_iter().collect()))
            .collect();
        Self { modules }
    }
}

impl SupportedActions {
    /// Parse the payload of `GET /manage/actions_available`.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn contains(&self, tag: &ActionTag) -> bool {
        self.modules
            .get(tag.module())
            .map(|actions| actions.contains(tag.action()))
            .unwrap_or(false)
    }

    /// Iterate over `(module, actions)` in module order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.modules.iter().map(|(m, a)| (m.as_str(), a))
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
