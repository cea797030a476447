// Contact attribute normalization
//
// Journey Builder hands the execute endpoint an ordered list of attribute
// bundles (inArguments), each contributing one or a few fields for the same
// contact. This module folds that list into a single canonical record.

use serde_json::{Map, Value};

/// Sentinel used for fields absent from the merged inArguments.
pub const MISSING: &str = "N/A";

/// Canonical contact record derived from the host's inArguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub contact_key: String,
    pub email_address: String,
    pub first_name: String,
    pub journey_name: String,
}

impl ContactRecord {
    /// Build a record from an ordered sequence of attribute mappings.
    ///
    /// The mappings are folded left-to-right into one map; when a key recurs,
    /// the later bundle wins. Unrecognized keys are ignored and missing
    /// fields default to `"N/A"`, so this never fails — an empty sequence
    /// yields the all-`"N/A"` record.
    pub fn from_in_arguments(in_arguments: &[Map<String, Value>]) -> Self {
        let mut merged: Map<String, Value> = Map::new();
        for bundle in in_arguments {
            for (key, value) in bundle {
                merged.insert(key.clone(), value.clone());
            }
        }

        Self {
            contact_key: field(&merged, "contactKey"),
            email_address: field(&merged, "emailAddress"),
            first_name: field(&merged, "firstName"),
            journey_name: field(&merged, "journeyName"),
        }
    }
}

/// Extract a string field from the merged map, defaulting to the sentinel.
///
/// Non-string JSON values (numbers, booleans) are rendered with their JSON
/// representation rather than discarded.
fn field(merged: &Map<String, Value>, key: &str) -> String {
    match merged.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => MISSING.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_empty_in_arguments_yields_sentinels() {
        let record = ContactRecord::from_in_arguments(&[]);
        assert_eq!(record.contact_key, "N/A");
        assert_eq!(record.email_address, "N/A");
        assert_eq!(record.first_name, "N/A");
        assert_eq!(record.journey_name, "N/A");
    }

    #[test]
    fn test_fields_collected_across_bundles() {
        let record = ContactRecord::from_in_arguments(&[
            bundle(json!({"contactKey": "abc123"})),
            bundle(json!({"emailAddress": "a@b.com"})),
        ]);

        assert_eq!(record.contact_key, "abc123");
        assert_eq!(record.email_address, "a@b.com");
        assert_eq!(record.first_name, "N/A");
        assert_eq!(record.journey_name, "N/A");
    }

    #[test]
    fn test_later_bundles_override_earlier() {
        let record = ContactRecord::from_in_arguments(&[
            bundle(json!({"contactKey": "A"})),
            bundle(json!({"contactKey": "B"})),
        ]);

        assert_eq!(record.contact_key, "B");
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let record = ContactRecord::from_in_arguments(&[bundle(json!({
            "contactKey": "abc123",
            "loyaltyTier": "gold",
            "cartValue": 12.5,
        }))]);

        assert_eq!(record.contact_key, "abc123");
        assert_eq!(record.first_name, "N/A");
    }

    #[test]
    fn test_null_value_treated_as_missing() {
        let record = ContactRecord::from_in_arguments(&[bundle(json!({
            "emailAddress": null,
        }))]);

        assert_eq!(record.email_address, "N/A");
    }

    #[test]
    fn test_non_string_values_rendered_as_json() {
        let record = ContactRecord::from_in_arguments(&[bundle(json!({
            "contactKey": 42,
        }))]);

        assert_eq!(record.contact_key, "42");
    }
}
