//! Test fixtures for common test scenarios.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::core::Layout;

/// Minimal vcpkg manifest.
pub const VCPKG_MANIFEST: &str = r#"{
  "name": "torsion",
  "version-string": "0.1.0",
  "dependencies": [
    "glfw3",
    { "name": "fmt", "features": [] }
  ]
}
"#;

/// Builder for an on-disk project tree.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    vcpkg_manifest: Option<String>,
    solutions: Vec<String>,
    interfaces: Vec<String>,
}

impl ProjectFixture {
    /// Sources for every stage: manifest, one solution, two interfaces.
    pub fn new() -> Self {
        ProjectFixture {
            vcpkg_manifest: Some(VCPKG_MANIFEST.to_string()),
            solutions: vec!["Torsion.sln".to_string()],
            interfaces: vec!["window.i".to_string(), "os/input.i".to_string()],
        }
    }

    pub fn without_vcpkg_manifest(mut self) -> Self {
        self.vcpkg_manifest = None;
        self
    }

    pub fn with_solutions(mut self, names: &[&str]) -> Self {
        self.solutions = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Interface files, relative to the bindings directory.
    pub fn with_interfaces(mut self, names: &[&str]) -> Self {
        self.interfaces = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Write the tree into a fresh temporary directory.
    pub fn create(&self) -> (TempDir, Layout) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let layout = self.write_to(tmp.path());
        (tmp, layout)
    }

    /// Write the tree under `root`.
    pub fn write_to(&self, root: &Path) -> Layout {
        let layout = Layout::new(root);

        write(
            &layout.native_src.join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.20)\nproject(torsion CXX)\n",
        );
        write(
            &layout.native_src.join("os/window.h"),
            "#pragma once\nclass Window {};\n",
        );
        if let Some(manifest) = &self.vcpkg_manifest {
            write(&layout.vcpkg_manifest(), manifest);
        }

        fs::create_dir_all(&layout.managed_src).expect("failed to create managed dir");
        for sln in &self.solutions {
            write(&layout.managed_src.join(sln), "Microsoft Visual Studio Solution File\n");
        }
        write(
            &layout.managed_src.join("TestApp/TestApp.csproj"),
            "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>\n",
        );

        fs::create_dir_all(&layout.bindings_src).expect("failed to create bindings dir");
        for iface in &self.interfaces {
            let module = Path::new(iface)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("module");
            write(
                &layout.bindings_src.join(iface),
                &format!("%module {module}\n%{{\n#include \"os/window.h\"\n%}}\n"),
            );
        }

        layout
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create fixture dir");
    }
    fs::write(path, content).expect("failed to write fixture file");
}
