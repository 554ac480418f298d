//! Typed facade over the ORC `keyval` module.

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::OrcClient;
use crate::error::{OrcError, Result};

/// Key-value operations routed through `keyval/*` actions.
pub struct KeyVal<'a> {
    client: &'a OrcClient,
}

impl<'a> KeyVal<'a> {
    pub(crate) fn new(client: &'a OrcClient) -> Self {
        Self { client }
    }

    /// `keyval/get`. Any server-side rejection is reported as
    /// [`OrcError::KeyNotFound`].
    pub async fn get(&self, key: &str) -> Result<Value> {
        let response = match self
            .client
            .dispatch("keyval/get", Some(json!({ "key": key })))
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_remote() => return Err(OrcError::KeyNotFound(key.to_string())),
            Err(e) => return Err(e),
        };

        match response {
            Value::Object(mut fields) => fields
                .remove("value")
                .ok_or_else(|| OrcError::KeyNotFound(key.to_string())),
            _ => Err(OrcError::KeyNotFound(key.to_string())),
        }
    }

    /// `keyval/set`.
    pub async fn set<V: Serialize>(&self, key: &str, value: V) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.client
            .dispatch("keyval/set", Some(json!({ "key": key, "val": value })))
            .await?;
        Ok(())
    }

    /// `keyval/del`.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .dispatch("keyval/del", Some(json!({ "key": key })))
            .await?;
        Ok(())
    }

    /// All keys known to the server, from `keyval/list`.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let mut response = self.client.dispatch("keyval/list", None).await?;
        let values = response
            .get_mut("values")
            .map(Value::take)
            .ok_or_else(|| OrcError::InvalidResponse("keyval/list: missing `values`".to_string()))?;
        Ok(serde_json::from_value(values)?)
    }

    /// Membership test. Fetches the whole key list on every call.
    pub async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.keys().await?.iter().any(|k| k == key))
    }
}
