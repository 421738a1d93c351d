//! Host classification by ordered name patterns.

use regex::Regex;

use fleetwatch_core::{ConfigError, ConfigResult, HostConfig};

use crate::error::{PolicyError, PolicyResult};

/// One compiled host-class rule.
#[derive(Debug)]
pub struct HostClass {
    pub name: String,
    pub min_cpu_avg: f64,
    pattern: Regex,
}

/// Ordered, first-match-wins classifier over host classes.
///
/// Two patterns may both match a given name; declaration order decides.
/// The rule list must end with a catch-all entry: a name that matches
/// nothing is a hard error, never silently skipped.
#[derive(Debug)]
pub struct HostClassifier {
    classes: Vec<HostClass>,
}

impl HostClassifier {
    /// Compile an ordered host-config list.
    ///
    /// Patterns are anchored at the start of the instance name.
    pub fn new(configs: &[HostConfig]) -> ConfigResult<Self> {
        if configs.is_empty() {
            return Err(ConfigError::NoHostClasses);
        }

        let mut classes = Vec::with_capacity(configs.len());
        for cfg in configs {
            let pattern = Regex::new(&format!("^(?:{})", cfg.pattern)).map_err(|e| {
                ConfigError::HostPattern {
                    name: cfg.name.clone(),
                    reason: e.to_string(),
                }
            })?;
            classes.push(HostClass {
                name: cfg.name.clone(),
                min_cpu_avg: cfg.min_cpu_avg,
                pattern,
            });
        }
        Ok(Self { classes })
    }

    /// First class whose pattern matches `name`, in declared order.
    pub fn classify(&self, name: &str) -> PolicyResult<&HostClass> {
        self.classes
            .iter()
            .find(|c| c.pattern.is_match(name))
            .ok_or_else(|| PolicyError::UnclassifiedHost(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str, pattern: &str, min_cpu_avg: f64) -> HostConfig {
        HostConfig {
            name: name.to_string(),
            pattern: pattern.to_string(),
            min_cpu_avg,
        }
    }

    #[test]
    fn first_match_wins_over_later_patterns() {
        let classifier = HostClassifier::new(&[
            config("master", "master", 0.0),
            config("star-cluster-node", "node[0-9]+", 90.0),
            config("default", ".*", 0.0),
        ])
        .unwrap();

        assert_eq!(classifier.classify("master-1").unwrap().name, "master");
        assert_eq!(
            classifier.classify("node17").unwrap().name,
            "star-cluster-node"
        );
        assert_eq!(classifier.classify("web-frontend").unwrap().name, "default");
    }

    #[test]
    fn catch_all_makes_classification_total() {
        let classifier = HostClassifier::new(&[
            config("star-cluster-node", "node[0-9]+", 90.0),
            config("default", ".*", 0.0),
        ])
        .unwrap();

        for name in ["", "x", "node", "completely-unrelated"] {
            assert_eq!(classifier.classify(name).unwrap().name, "default");
        }
    }

    #[test]
    fn no_match_without_catch_all_is_an_error() {
        let classifier =
            HostClassifier::new(&[config("star-cluster-node", "node[0-9]+", 90.0)]).unwrap();

        let err = classifier.classify("web-frontend").unwrap_err();
        assert!(matches!(err, PolicyError::UnclassifiedHost(name) if name == "web-frontend"));
    }

    #[test]
    fn patterns_are_anchored_at_the_start() {
        let classifier = HostClassifier::new(&[
            config("star-cluster-node", "node[0-9]+", 90.0),
            config("default", ".*", 0.0),
        ])
        .unwrap();

        // "mynode17" does not start with the pattern.
        assert_eq!(classifier.classify("mynode17").unwrap().name, "default");
    }

    #[test]
    fn empty_config_list_is_rejected() {
        let err = HostClassifier::new(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::NoHostClasses));
    }

    #[test]
    fn invalid_pattern_is_rejected_with_class_name() {
        let err = HostClassifier::new(&[config("broken", "node[", 0.0)]).unwrap_err();
        match err {
            ConfigError::HostPattern { name, .. } => assert_eq!(name, "broken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
