//! Synthetic entry module generation.
//!
//! Every project gets a generated `src/main.jsx` that imports the caller's
//! top-level component, wraps it in a theme provider configured for
//! class-based switching with system-preference detection disabled, and
//! mounts it into a fixed root element.

/// Id of the root element the entry module mounts into. The published HTML
/// document carries a matching `<div>`.
pub const ROOT_ELEMENT_ID: &str = "root";

/// Generate the entry module source for the given entry component file.
///
/// `entry_file` is the component's path relative to the source root, e.g.
/// `App.tsx` or `components/Main.tsx`.
pub fn generate_entry_module(entry_file: &str) -> String {
    let specifier = format!("./{}", strip_extension(entry_file));

    format!(
        r#"import React from "react";
import {{ createRoot }} from "react-dom/client";
import {{ ThemeProvider }} from "next-themes";
import App from "{specifier}";
import "./globals.css";

const root = createRoot(document.getElementById("{ROOT_ELEMENT_ID}"));
root.render(
  <React.StrictMode>
    <ThemeProvider attribute="class" enableSystem={{false}}>
      <App />
    </ThemeProvider>
  </React.StrictMode>
);
"#
    )
}

/// Drop a trailing source extension so the import specifier stays
/// resolver-friendly for both backends.
fn strip_extension(path: &str) -> &str {
    for ext in [".tsx", ".ts", ".jsx", ".js"] {
        if let Some(stripped) = path.strip_suffix(ext) {
            return stripped;
        }
    }
    path
}
