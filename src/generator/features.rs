//! Firebase feature detection from a `firebase.json` configuration file.

use std::path::Path;

use crate::ports::filesystem::FileSystem;

/// One Firebase capability configured in the source project.
///
/// The variant order is the fixed vocabulary order; every derived sequence
/// (tags, feature lists) follows it regardless of key order in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Cloud Functions (`functions` key).
    Functions,
    /// Firestore document store (`firestore` key).
    Firestore,
    /// Realtime Database (`database` key).
    Database,
    /// Hosting (`hosting` key).
    Hosting,
    /// Cloud Storage (`storage` key).
    Storage,
    /// Local emulator suite (`emulators` key).
    Emulators,
}

/// Fixed detection table; one configuration key implies one feature.
pub const FEATURE_TABLE: [Feature; 6] = [
    Feature::Functions,
    Feature::Firestore,
    Feature::Database,
    Feature::Hosting,
    Feature::Storage,
    Feature::Emulators,
];

/// Emulator service rows in emulator-start order: service name and port.
const EMULATOR_TABLE: [(Feature, &str, &str); 5] = [
    (Feature::Functions, "functions", "5001"),
    (Feature::Firestore, "firestore", "8080"),
    (Feature::Database, "database", "9000"),
    (Feature::Storage, "storage", "9199"),
    (Feature::Hosting, "hosting", "5000"),
];

impl Feature {
    /// The top-level `firebase.json` key whose presence marks this feature.
    #[must_use]
    pub fn config_key(self) -> &'static str {
        match self {
            Feature::Functions => "functions",
            Feature::Firestore => "firestore",
            Feature::Database => "database",
            Feature::Hosting => "hosting",
            Feature::Storage => "storage",
            Feature::Emulators => "emulators",
        }
    }

    /// The classification tag synthesized for this feature.
    #[must_use]
    pub fn tag(self) -> String {
        format!("feature:{}", self.config_key())
    }
}

/// Ordered set of detected features, immutable after detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet(Vec<Feature>);

impl FeatureSet {
    /// Builds a set from arbitrary features, normalized to table order.
    #[must_use]
    pub fn from_features(features: &[Feature]) -> Self {
        Self(FEATURE_TABLE.iter().copied().filter(|f| features.contains(f)).collect())
    }

    /// Returns `true` if the feature was detected.
    #[must_use]
    pub fn has(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    /// Returns `true` if nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates detected features in table order.
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    /// Detected feature names in table order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|f| f.config_key()).collect()
    }

    /// Emulator service names for the detected features, in emulator-start
    /// order, with `auth` appended whenever the emulator suite is configured.
    #[must_use]
    pub fn emulator_services(&self) -> Vec<&'static str> {
        let mut services: Vec<&'static str> = EMULATOR_TABLE
            .iter()
            .filter(|(feature, _, _)| self.has(*feature))
            .map(|(_, service, _)| *service)
            .collect();
        if self.has(Feature::Emulators) {
            services.push("auth");
        }
        services
    }

    /// Emulator ports matching [`FeatureSet::emulator_services`].
    #[must_use]
    pub fn emulator_ports(&self) -> Vec<&'static str> {
        let mut ports: Vec<&'static str> = EMULATOR_TABLE
            .iter()
            .filter(|(feature, _, _)| self.has(*feature))
            .map(|(_, _, port)| *port)
            .collect();
        if self.has(Feature::Emulators) {
            ports.push("9099");
        }
        ports
    }
}

/// Detects configured features from `<init_dir>/firebase.json`.
///
/// A missing file yields the empty set: at this stage absence is a valid
/// "nothing to integrate" state, validated earlier by the caller. A file
/// that cannot be read or parsed is logged as a warning and also yields the
/// empty set — detection degrades, it never aborts the run. Membership is
/// decided by top-level key presence, not the key's value.
#[must_use]
pub fn detect_features(fs: &dyn FileSystem, init_dir: &Path) -> FeatureSet {
    let path = init_dir.join("firebase.json");
    if !fs.exists(&path) {
        return FeatureSet::default();
    }

    let contents = match fs.read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            log::warn!("Could not read firebase.json: {err}");
            return FeatureSet::default();
        }
    };
    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Could not parse firebase.json: {err}");
            return FeatureSet::default();
        }
    };
    let Some(object) = value.as_object() else {
        log::warn!("Could not parse firebase.json: top-level value is not an object");
        return FeatureSet::default();
    };

    FeatureSet(
        FEATURE_TABLE.iter().copied().filter(|f| object.contains_key(f.config_key())).collect(),
    )
}
