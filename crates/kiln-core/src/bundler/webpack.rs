//! webpack backend adapter.
//!
//! The compatibility personality: a generated `webpack.config.js` drives a
//! full webpack pass (babel react/typescript presets, style pipeline,
//! sourcemaps). Script and sourcemap are explicit files read back from
//! disk afterwards.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::project::EphemeralProject;
use crate::request::BackendKind;

use super::{BackendFailure, BackendOutput, BundlerBackend, read_output_file, run_tool};

pub struct WebpackBackend {
    npx_path: PathBuf,
    timeout: Duration,
}

impl WebpackBackend {
    pub fn new(npx_path: PathBuf, timeout: Duration) -> Self {
        Self { npx_path, timeout }
    }
}

/// Generate the webpack configuration written into the project before the
/// tool runs. The shim alias mirrors the esbuild adapter so both backends
/// resolve framework imports identically.
pub fn generate_webpack_config() -> String {
    r#"const path = require("path");

module.exports = {
  mode: "production",
  entry: "./src/main.jsx",
  output: {
    path: path.resolve(__dirname, "dist"),
    filename: "bundle.js",
  },
  devtool: "source-map",
  resolve: {
    extensions: [".tsx", ".ts", ".jsx", ".js"],
    alias: {
      next: path.resolve(__dirname, "shims/next"),
    },
  },
  module: {
    rules: [
      {
        test: /\.[jt]sx?$/,
        exclude: /node_modules/,
        use: {
          loader: "babel-loader",
          options: {
            presets: [
              ["@babel/preset-react", { runtime: "automatic" }],
              ["@babel/preset-typescript", { isTSX: true, allExtensions: true }],
            ],
          },
        },
      },
      {
        test: /\.css$/,
        use: ["style-loader", "css-loader"],
      },
    ],
  },
};
"#
    .to_string()
}

#[async_trait]
impl BundlerBackend for WebpackBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Webpack
    }

    async fn bundle(
        &self,
        project: &EphemeralProject,
    ) -> Result<BackendOutput, BackendFailure> {
        let config_path = project.root().join("webpack.config.js");
        tokio::fs::write(&config_path, generate_webpack_config())
            .await
            .map_err(|e| BackendFailure {
                message: format!("failed to write webpack config: {}", e),
            })?;

        let mut command = Command::new(&self.npx_path);
        command
            .current_dir(project.root())
            .args(["webpack", "--config", "webpack.config.js"]);

        let output = run_tool(command, self.timeout, "webpack").await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(id = %project.id(), "webpack stats:\n{}", stdout);
        }

        let script = read_output_file(&project.out_dir().join("bundle.js"), "webpack").await?;
        let sourcemap = tokio::fs::read_to_string(project.out_dir().join("bundle.js.map"))
            .await
            .ok();

        Ok(BackendOutput {
            html: None,
            script,
            sourcemap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_aliases_shims() {
        let config = generate_webpack_config();
        assert!(config.contains(r#"next: path.resolve(__dirname, "shims/next")"#));
    }

    #[test]
    fn test_config_output_shape() {
        let config = generate_webpack_config();
        assert!(config.contains(r#"filename: "bundle.js""#));
        assert!(config.contains(r#"devtool: "source-map""#));
        assert!(config.contains("@babel/preset-react"));
        assert!(config.contains("@babel/preset-typescript"));
    }
}
