//! Workflow runtime environment
//!
//! Named properties shared by a workflow's nodes (work directory,
//! environment variables, ...). Every effective change is announced with a
//! [`WorkflowEnvChanged`] event carrying the previous value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::event::{WorkflowEnvChanged, WorkflowEvent};
use crate::sink::EventSink;

/// Runtime environment of a workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeEnv {
    values: BTreeMap<String, Value>,
}

impl RuntimeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set a property and notify `sink` if its value changed
    ///
    /// The old value is `Null` when the property was not set before.
    /// Returns whether the stored value changed. If the sink fails the
    /// stored value is left untouched.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        sink: &dyn EventSink,
    ) -> Result<bool> {
        let name = name.into();
        let value = value.into();
        let old = self.values.get(&name).cloned().unwrap_or(Value::Null);
        if old == value {
            return Ok(false);
        }

        log::debug!("Workflow env '{}' changed: {} -> {}", name, old, value);
        sink.send(WorkflowEvent::EnvChanged(WorkflowEnvChanged::new(
            name.clone(),
            value.clone(),
            old,
        )))?;
        self.values.insert(name, value);
        Ok(true)
    }

    /// Remove a property, notifying `sink` with a `Null` new value
    ///
    /// Returns the removed value, or `None` (and sends nothing) if unset.
    /// The property is kept if the sink fails.
    pub fn remove(&mut self, name: &str, sink: &dyn EventSink) -> Result<Option<Value>> {
        let Some(old) = self.values.get(name) else {
            return Ok(None);
        };

        log::debug!("Workflow env '{}' removed", name);
        sink.send(WorkflowEvent::env_changed(name, Value::Null, old.clone()))?;
        Ok(self.values.remove(name))
    }
}
