//! User intents (C8 output): a concrete query plus initial/final state
//! attached to a [`crate::skeleton::TaskSkeleton`].

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::skeleton::{Pattern, TaskSkeleton};

/// A flat map value: intentionally excludes lists and nested objects.
/// Complex observations must be summarized as strings before landing here.
pub type StateValue = Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMeta {
    pub skeleton_id: String,
    pub scenario: String,
    pub pattern: Pattern,
    pub generator_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIntent {
    pub query: String,
    pub initial_state: BTreeMap<String, StateValue>,
    pub final_state: BTreeMap<String, StateValue>,
    pub available_tools: Vec<String>,
    pub meta: IntentMeta,
}

/// Is `value` a primitive the flatness rule allows (string, number, or
/// bool)? Arrays and objects are rejected.
pub fn is_flat_primitive(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// `"skel_" + md5(canonical_signature)`, the stable id linking an intent
/// back to the skeleton it was synthesized from.
pub fn skeleton_id(skeleton: &TaskSkeleton) -> String {
    let sig = skeleton.canonical_signature();
    let digest = Md5::digest(sig.as_bytes());
    format!("skel_{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_primitives_accepted_containers_rejected() {
        assert!(is_flat_primitive(&Value::String("x".into())));
        assert!(is_flat_primitive(&Value::from(42)));
        assert!(is_flat_primitive(&Value::Bool(true)));
        assert!(!is_flat_primitive(&Value::Array(vec![])));
        assert!(!is_flat_primitive(&serde_json::json!({"a": 1})));
    }
}
