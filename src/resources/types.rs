// Standard library
use std::collections::BTreeMap;

// 3rd party crates
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single message reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

/// Ordered collection of diagnostics for one operation.
///
/// Errors fail the operation; warnings are shown to the user but leave the
/// result in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.0.push(Diagnostic {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.0.push(Diagnostic {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }
}

/// Opaque per-resource storage kept by the host next to the resource state.
///
/// Values written here are handed back on every later operation for the same
/// resource instance and are never shown to the user. Entries are JSON values
/// keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivateState(BTreeMap<String, Value>);

impl PrivateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, or `None` when it was never set.
    pub fn get_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.0
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    pub fn set_key<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        self.0.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of one lifecycle call.
///
/// `state == None` with no error means the resource is gone: after a read it
/// must be dropped from tracked state, after a delete it has been destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceResponse<S> {
    pub state: Option<S>,
    pub private: PrivateState,
    pub diagnostics: Diagnostics,
}

impl<S> Default for ResourceResponse<S> {
    fn default() -> Self {
        Self {
            state: None,
            private: PrivateState::default(),
            diagnostics: Diagnostics::default(),
        }
    }
}

impl<S> ResourceResponse<S> {
    /// Starts a response that carries `private` forward unchanged.
    pub fn with_private(private: PrivateState) -> Self {
        Self {
            private,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning("Client Error", "Unable to update force_ssl");
        assert!(!diagnostics.has_error());

        diagnostics.add_error("Client Error", "Unable to read hostname");
        assert!(diagnostics.has_error());
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn private_state_round_trips_through_json() {
        let mut private = PrivateState::new();
        private
            .set_key("certificate", &json!({"Certificate": "PEM"}))
            .unwrap();

        let wire = serde_json::to_string(&private).unwrap();
        let restored: PrivateState = serde_json::from_str(&wire).unwrap();

        let value: Option<Value> = restored.get_key("certificate").unwrap();
        assert_eq!(value, Some(json!({"Certificate": "PEM"})));
        assert_eq!(restored.get_key::<Value>("missing").unwrap(), None);
    }
}
