//! Framework compatibility shims.
//!
//! Caller code may import a handful of `next` APIs (image, link, head,
//! script, router, font, document) even though the framework itself never
//! runs inside this pipeline. A small stub package is written under
//! `shims/next/` and the bundler backends alias the real package name to
//! it, so those imports resolve to the stubs instead of failing.

use crate::error::Result;
use crate::project::EphemeralProject;

const SHIM_PACKAGE_JSON: &str = r#"{
  "name": "next",
  "version": "0.0.0",
  "main": "index.js"
}
"#;

const SHIM_INDEX: &str = r#"// Aggregate stub for bare `next` imports.
export { default as Image } from "./image";
export { default as Link } from "./link";
export { default as Head } from "./head";
export { default as Script } from "./script";
export { useRouter, usePathname, useSearchParams } from "./router";
export default {};
"#;

const SHIM_IMAGE: &str = r#"import React from "react";

// next/image optimization does not exist here; render a plain <img>.
export default function Image({ src, alt = "", fill, priority, loader, ...rest }) {
  return React.createElement("img", { src, alt, ...rest });
}
"#;

const SHIM_LINK: &str = r#"import React from "react";

export default function Link({ href, children, prefetch, scroll, ...rest }) {
  return React.createElement("a", { href, ...rest }, children);
}
"#;

const SHIM_HEAD: &str = r#"// Document head management is a no-op in a pre-rendered bundle.
export default function Head() {
  return null;
}
"#;

const SHIM_SCRIPT: &str = r#"import React from "react";

export default function Script({ src, strategy, children, ...rest }) {
  if (!src) return null;
  return React.createElement("script", { src, ...rest });
}
"#;

const SHIM_ROUTER: &str = r#"const noop = () => {};

const router = {
  pathname: "/",
  query: {},
  asPath: "/",
  push: noop,
  replace: noop,
  prefetch: noop,
  back: noop,
};

export function useRouter() {
  return router;
}

export function usePathname() {
  return "/";
}

export function useSearchParams() {
  return new URLSearchParams();
}

export default { useRouter };
"#;

// CommonJS on purpose: a Proxy default makes any named font import
// (`import { Inter } from "next/font/google"`) resolve to the stub factory.
const SHIM_FONT_GOOGLE: &str = r#"const fontStub = () => ({ className: "", variable: "", style: {} });

module.exports = new Proxy({}, { get: () => fontStub });
"#;

const SHIM_DOCUMENT: &str = r#"import React from "react";

export function Html({ children, ...rest }) {
  return React.createElement("html", rest, children);
}

export function Head({ children }) {
  return React.createElement("head", null, children);
}

export function Main() {
  return null;
}

export function NextScript() {
  return null;
}

export default function Document() {
  return null;
}
"#;

/// Every shim module, keyed by path relative to the shim package root.
const SHIM_MODULES: &[(&str, &str)] = &[
    ("package.json", SHIM_PACKAGE_JSON),
    ("index.js", SHIM_INDEX),
    ("image.js", SHIM_IMAGE),
    ("link.js", SHIM_LINK),
    ("head.js", SHIM_HEAD),
    ("script.js", SHIM_SCRIPT),
    ("router.js", SHIM_ROUTER),
    ("font/google.js", SHIM_FONT_GOOGLE),
    ("document.js", SHIM_DOCUMENT),
];

/// Write the shim package into the project.
pub async fn write_shims(project: &EphemeralProject) -> Result<()> {
    let shim_dir = project.shim_dir();
    tokio::fs::create_dir_all(shim_dir.join("font")).await?;

    for (relative, contents) in SHIM_MODULES {
        tokio::fs::write(shim_dir.join(relative), contents).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_all_shim_modules() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let project = EphemeralProject::create(temp.path(), "shim-test")
            .await
            .expect("Failed to create project");

        write_shims(&project).await.expect("shim write should succeed");

        for (relative, _) in SHIM_MODULES {
            assert!(
                project.shim_dir().join(relative).exists(),
                "missing shim {relative}"
            );
        }
    }

    #[test]
    fn test_shim_package_shadows_framework_name() {
        let parsed: serde_json::Value =
            serde_json::from_str(SHIM_PACKAGE_JSON).expect("shim manifest is valid JSON");
        assert_eq!(parsed["name"], "next");
    }
}
