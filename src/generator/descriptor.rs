//! Project descriptors handed to the project-graph store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generator::features::FeatureSet;
use crate::generator::targets::TargetDefinition;

/// The structured record describing one buildable/deployable unit.
///
/// Created once per generator invocation and never mutated after being
/// handed to the graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Project name in the graph.
    pub name: String,
    /// Workspace-relative root path.
    pub root: String,
    /// Project-type tag (`application` for generated projects).
    #[serde(rename = "projectType")]
    pub project_type: String,
    /// Source root, when distinct from the project root.
    #[serde(rename = "sourceRoot", skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    /// Ordered classification tags.
    pub tags: Vec<String>,
    /// Named operations, keyed by operation name.
    pub targets: BTreeMap<String, TargetDefinition>,
}

/// Assembles the descriptor tag list in its fixed order: caller-supplied
/// tags first, then `type:firebase`, `scope:<base>`, `platform:firebase`,
/// then one `feature:<name>` per detected feature in detector table order.
#[must_use]
pub fn assemble_tags(caller_tags: &[String], base_name: &str, features: &FeatureSet) -> Vec<String> {
    let mut tags: Vec<String> = caller_tags.to_vec();
    tags.push("type:firebase".to_string());
    tags.push(format!("scope:{base_name}"));
    tags.push("platform:firebase".to_string());
    tags.extend(features.iter().map(super::features::Feature::tag));
    tags
}

/// Splits a comma-separated caller tag list, trimming whitespace and
/// dropping empty entries.
#[must_use]
pub fn parse_caller_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| t.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::features::{Feature, FeatureSet};

    #[test]
    fn tags_follow_fixed_order() {
        let features = FeatureSet::from_features(&[
            Feature::Functions,
            Feature::Firestore,
            Feature::Hosting,
            Feature::Storage,
            Feature::Emulators,
        ]);
        let tags = assemble_tags(&[], "my-app", &features);
        assert_eq!(
            tags,
            vec![
                "type:firebase",
                "scope:my-app",
                "platform:firebase",
                "feature:functions",
                "feature:firestore",
                "feature:hosting",
                "feature:storage",
                "feature:emulators",
            ]
        );
    }

    #[test]
    fn caller_tags_come_first() {
        let features = FeatureSet::from_features(&[Feature::Firestore]);
        let tags = assemble_tags(&["team:web".into(), "tier:infra".into()], "demo", &features);
        assert_eq!(
            tags,
            vec![
                "team:web",
                "tier:infra",
                "type:firebase",
                "scope:demo",
                "platform:firebase",
                "feature:firestore",
            ]
        );
    }

    #[test]
    fn parses_comma_separated_caller_tags() {
        assert_eq!(parse_caller_tags(Some("a, b ,c,,")), vec!["a", "b", "c"]);
        assert!(parse_caller_tags(None).is_empty());
    }

    #[test]
    fn descriptor_serializes_in_graph_schema() {
        let descriptor = ProjectDescriptor {
            name: "demo-firebase".into(),
            root: "apps/demo/firebase".into(),
            project_type: "application".into(),
            source_root: None,
            tags: vec!["type:firebase".into()],
            targets: BTreeMap::new(),
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["projectType"], "application");
        assert!(value.get("sourceRoot").is_none());
    }
}
