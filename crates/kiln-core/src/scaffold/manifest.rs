//! Dependency manifest generation.
//!
//! Builds the `package.json` written into each ephemeral project. A fixed
//! default dependency set (UI framework runtime, typings, theming helper,
//! build tooling) is merged with the caller's declared dependencies, caller
//! entries taking precedence on name collision.

use std::collections::BTreeMap;

use serde_json::json;

/// Fixed runtime dependency set present in every generated project.
pub const DEFAULT_DEPENDENCIES: &[(&str, &str)] = &[
    ("react", "^18.3.1"),
    ("react-dom", "^18.3.1"),
    ("next-themes", "^0.3.0"),
];

/// Build tooling and typings, installed alongside the runtime set.
pub const DEFAULT_DEV_DEPENDENCIES: &[(&str, &str)] = &[
    ("@types/react", "^18.3.3"),
    ("@types/react-dom", "^18.3.0"),
    ("@babel/core", "^7.24.7"),
    ("@babel/preset-react", "^7.24.7"),
    ("@babel/preset-typescript", "^7.24.7"),
    ("babel-loader", "^9.1.3"),
    ("css-loader", "^7.1.2"),
    ("style-loader", "^4.0.0"),
    ("esbuild", "^0.21.5"),
    ("webpack", "^5.93.0"),
    ("webpack-cli", "^5.1.4"),
];

/// Generate the `package.json` manifest for an ephemeral project.
///
/// # Arguments
///
/// * `name` - Package name (the validated request identifier)
/// * `extra_dependencies` - Caller-declared dependencies, merged over the
///   default set; on name collision the caller's version range wins
pub fn generate_package_json(
    name: &str,
    extra_dependencies: &BTreeMap<String, String>,
) -> String {
    let mut dependencies: BTreeMap<&str, &str> = DEFAULT_DEPENDENCIES.iter().copied().collect();
    for (name, version) in extra_dependencies {
        dependencies.insert(name.as_str(), version.as_str());
    }

    let dev_dependencies: BTreeMap<&str, &str> =
        DEFAULT_DEV_DEPENDENCIES.iter().copied().collect();

    let manifest = json!({
        "name": name,
        "version": "0.0.0",
        "private": true,
        "dependencies": dependencies,
        "devDependencies": dev_dependencies,
    });

    // BTreeMap keys keep the output deterministic across requests.
    serde_json::to_string_pretty(&manifest).expect("manifest is always serializable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_present() {
        let manifest = generate_package_json("demo", &BTreeMap::new());

        assert!(manifest.contains("\"react\": \"^18.3.1\""));
        assert!(manifest.contains("\"react-dom\": \"^18.3.1\""));
        assert!(manifest.contains("\"next-themes\""));
        assert!(manifest.contains("\"esbuild\""));
        assert!(manifest.contains("\"webpack\""));
    }

    #[test]
    fn test_caller_dependency_added() {
        let mut extra = BTreeMap::new();
        extra.insert("date-fns".to_string(), "^3.6.0".to_string());

        let manifest = generate_package_json("demo", &extra);
        assert!(manifest.contains("\"date-fns\": \"^3.6.0\""));
    }

    #[test]
    fn test_caller_wins_on_collision() {
        let mut extra = BTreeMap::new();
        extra.insert("react".to_string(), "^19.0.0".to_string());

        let manifest = generate_package_json("demo", &extra);
        assert!(manifest.contains("\"react\": \"^19.0.0\""));
        assert!(!manifest.contains("\"react\": \"^18.3.1\""));
    }

    #[test]
    fn test_is_valid_json() {
        let manifest = generate_package_json("demo", &BTreeMap::new());
        let parsed: serde_json::Value =
            serde_json::from_str(&manifest).expect("manifest should be valid JSON");
        assert_eq!(parsed["name"], "demo");
        assert_eq!(parsed["private"], true);
    }
}
