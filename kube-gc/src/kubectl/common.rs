use std::{collections::BTreeMap, collections::HashMap, fmt};

use serde::Deserialize;

/// The `List` object `kubectl get --output=json` prints.
#[derive(Debug, Deserialize)]
pub struct GetResource<T> {
    #[serde(rename = "items")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// https://github.com/kubernetes/community/blob/master/contributors/devel/sig-architecture/api-conventions.md#metadata
pub struct ResourceMetadata {
    pub name: String,

    /// Empty for cluster scoped resources such as namespaces.
    #[serde(default)]
    pub namespace: String,

    /// `None` when the field is absent or can not be parsed.
    #[serde(default, deserialize_with = "lenient_rfc3339::deserialize")]
    pub creation_timestamp: Option<time::OffsetDateTime>,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub annotations: HashMap<String, String>,

    #[serde(default)]
    pub owner_references: Vec<OwnerReference>,
}

impl ResourceMetadata {
    /// Controllers list themselves first, so only the first owner reference is considered.
    pub fn controller(&self) -> Option<&OwnerReference> {
        self.owner_references.first()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OwnerReference {
    pub kind: String,
    pub name: String,
}

pub mod lenient_rfc3339 {
    use time::{format_description::well_known::Rfc3339, OffsetDateTime};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: Option<String> = serde::Deserialize::deserialize(deserializer)?;
        Ok(value.and_then(|value| OffsetDateTime::parse(&value, &Rfc3339).ok()))
    }
}

/// An equality based label selector, rendered the way `kubectl --selector` expects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LabelSelector(pub BTreeMap<String, String>);

impl LabelSelector {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        self.0
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_creation_timestamp_is_absent() {
        let metadata: ResourceMetadata = serde_json::from_value(serde_json::json!({
            "name": "web",
            "namespace": "shop-qa",
            "creationTimestamp": "last tuesday",
        }))
        .unwrap();
        assert_eq!(metadata.creation_timestamp, None);

        let metadata: ResourceMetadata = serde_json::from_value(serde_json::json!({
            "name": "web",
            "creationTimestamp": "2024-05-01T10:00:00Z",
        }))
        .unwrap();
        assert_eq!(
            metadata.creation_timestamp,
            Some(time::macros::datetime!(2024-05-01 10:00 UTC))
        );
        assert_eq!(metadata.namespace, "");
    }

    #[test]
    fn controller_is_first_owner() {
        let metadata: ResourceMetadata = serde_json::from_value(serde_json::json!({
            "name": "web-5d9c",
            "ownerReferences": [
                { "kind": "Deployment", "name": "web", "uid": "1" },
                { "kind": "Other", "name": "x", "uid": "2" },
            ],
        }))
        .unwrap();
        assert_eq!(
            metadata.controller(),
            Some(&OwnerReference {
                kind: "Deployment".to_owned(),
                name: "web".to_owned(),
            })
        );
    }

    #[test]
    fn label_selector_display_and_matching() {
        let selector = LabelSelector(BTreeMap::from([
            ("tier".to_owned(), "web".to_owned()),
            ("app".to_owned(), "shop".to_owned()),
        ]));
        assert_eq!(selector.to_string(), "app=shop,tier=web");

        let mut labels = HashMap::from([("app".to_owned(), "shop".to_owned())]);
        assert!(!selector.matches(&labels));
        labels.insert("tier".to_owned(), "web".to_owned());
        labels.insert("extra".to_owned(), "ignored".to_owned());
        assert!(selector.matches(&labels));
    }
}
