//! Classification of configuration types.
//!
//! Only configuration types backed by a configuration API get parameters injected
//! into their manifest; every other type still has its reference fields rewritten
//! but produces no descriptors.

use crate::config::Settings;
use std::collections::BTreeSet;

/// Configuration API ids known to be API-backed out of the box.
pub const BUILTIN_API_IDS: &[&str] = &[
    "alerting-profile",
    "anomaly-detection-metrics",
    "app-detection-rule",
    "application-mobile",
    "application-web",
    "auto-tag",
    "aws-credentials",
    "azure-credentials",
    "calculated-metrics-application-mobile",
    "calculated-metrics-application-web",
    "calculated-metrics-log",
    "calculated-metrics-service",
    "calculated-metrics-synthetic",
    "conditional-naming-host",
    "conditional-naming-processgroup",
    "conditional-naming-service",
    "credential-vault",
    "custom-service-dotnet",
    "custom-service-go",
    "custom-service-java",
    "custom-service-nodejs",
    "custom-service-php",
    "dashboard",
    "extension",
    "failure-detection-parametersets",
    "failure-detection-rules",
    "kubernetes-credentials",
    "maintenance-window",
    "management-zone",
    "notification",
    "reports",
    "request-attributes",
    "request-naming-service",
    "service-detection-full-web-request",
    "service-detection-full-web-service",
    "service-detection-opaque-web-request",
    "service-detection-opaque-web-service",
    "slo",
    "span-attribute",
    "span-capture-rule",
    "span-context-propagation",
    "span-entry-point",
    "synthetic-location",
    "synthetic-monitor",
];

/// Decides whether a configuration type takes manifest parameters.
pub trait ApiClassifier {
    /// `true` when `config_type` (the type's directory name) is API-backed.
    fn is_api_backed(&self, config_type: &str) -> bool;
}

impl<F> ApiClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_api_backed(&self, config_type: &str) -> bool {
        self(config_type)
    }
}

/// Set-based classifier: the built-in API ids adjusted by [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownApis {
    ids: BTreeSet<String>,
}

impl KnownApis {
    /// Classifier over exactly `ids`.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in list with `api-types` added and `non-api-types` removed.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let mut ids: BTreeSet<String> = BUILTIN_API_IDS.iter().map(|id| (*id).to_string()).collect();
        ids.extend(settings.api_types.iter().cloned());
        for id in &settings.non_api_types {
            ids.remove(id);
        }
        Self {
            ids,
        }
    }

    /// All API-backed type names, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl Default for KnownApis {
    fn default() -> Self {
        Self::new(BUILTIN_API_IDS.iter().copied())
    }
}

impl ApiClassifier for KnownApis {
    fn is_api_backed(&self, config_type: &str) -> bool {
        self.ids.contains(config_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list_is_sorted_and_unique() {
        let mut sorted = BUILTIN_API_IDS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, BUILTIN_API_IDS);
    }

    #[test]
    fn test_default_classifier() {
        let apis = KnownApis::default();
        assert!(apis.is_api_backed("alerting-profile"));
        assert!(apis.is_api_backed("management-zone"));
        assert!(!apis.is_api_backed("my-notes"));
    }

    #[test]
    fn test_from_settings_adjusts_builtin_list() {
        let mut settings = Settings::default();
        settings.api_types.insert("my-notes".to_string());
        settings.non_api_types.insert("dashboard".to_string());

        let apis = KnownApis::from_settings(&settings);
        assert!(apis.is_api_backed("my-notes"));
        assert!(!apis.is_api_backed("dashboard"));
        assert!(apis.is_api_backed("auto-tag"));
    }

    #[test]
    fn test_closure_classifier() {
        let only_profiles = |config_type: &str| config_type == "alerting-profile";
        assert!(only_profiles.is_api_backed("alerting-profile"));
        assert!(!ApiClassifier::is_api_backed(&only_profiles, "auto-tag"));
    }
}
