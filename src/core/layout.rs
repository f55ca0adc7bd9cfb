//! Project directory layout.
//!
//! Every source and output location is derived from the project root here
//! and nowhere else.

use std::path::{Path, PathBuf};

/// Name of the packaged output directory inside the build root.
pub const PACKAGE_NAME: &str = "torsion";

/// Source and output directories for one project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    /// Native sources (`CMakeLists.txt`, `vcpkg.json`)
    pub native_src: PathBuf,
    /// Managed sources (one `*.sln`)
    pub managed_src: PathBuf,
    /// SWIG interface files
    pub bindings_src: PathBuf,
    /// Build root, wiped at the start of every build
    pub build_dir: PathBuf,
    /// CMake binary directory
    pub native_out: PathBuf,
    /// Managed build output
    pub managed_out: PathBuf,
    /// Generated bindings
    pub bindings_out: PathBuf,
    /// Where `dotnet publish` writes before install moves it
    pub managed_staging: PathBuf,
    /// Final package
    pub package_dir: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let engine = root.join("engine");
        let build_dir = root.join("out");
        let managed_src = engine.join("managed");

        Layout {
            native_src: engine.join("native"),
            managed_staging: managed_src.join("out"),
            managed_src,
            bindings_src: engine.join("bindings"),
            native_out: build_dir.join("cmake"),
            managed_out: build_dir.join("dotnet"),
            bindings_out: build_dir.join("swig"),
            package_dir: build_dir.join(PACKAGE_NAME),
            build_dir,
            root,
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The vcpkg manifest inside the native sources.
    pub fn vcpkg_manifest(&self) -> PathBuf {
        self.native_src.join("vcpkg.json")
    }

    /// The installed binaries directory inside the package.
    pub fn package_bin(&self) -> PathBuf {
        self.package_dir.join("bin")
    }
}

/// Whether `dir` looks like a project root.
pub fn is_project_root(dir: &Path) -> bool {
    dir.join("engine").is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/work/torsion");

        assert_eq!(layout.root(), Path::new("/work/torsion"));
        assert_eq!(layout.native_src, PathBuf::from("/work/torsion/engine/native"));
        assert_eq!(layout.managed_src, PathBuf::from("/work/torsion/engine/managed"));
        assert_eq!(layout.bindings_src, PathBuf::from("/work/torsion/engine/bindings"));
        assert_eq!(layout.build_dir, PathBuf::from("/work/torsion/out"));
        assert_eq!(layout.native_out, PathBuf::from("/work/torsion/out/cmake"));
        assert_eq!(layout.managed_out, PathBuf::from("/work/torsion/out/dotnet"));
        assert_eq!(layout.bindings_out, PathBuf::from("/work/torsion/out/swig"));
        assert_eq!(
            layout.managed_staging,
            PathBuf::from("/work/torsion/engine/managed/out")
        );
        assert_eq!(layout.package_dir, PathBuf::from("/work/torsion/out/torsion"));
        assert_eq!(layout.package_bin(), PathBuf::from("/work/torsion/out/torsion/bin"));
    }

    #[test]
    fn test_outputs_live_under_build_dir() {
        let layout = Layout::new("/p");
        let outputs = [
            &layout.native_out,
            &layout.managed_out,
            &layout.bindings_out,
            &layout.package_dir,
        ];
        for dir in outputs {
            assert!(dir.starts_with(&layout.build_dir));
        }
        // Staging lives beside the managed sources
        assert!(!layout.managed_staging.starts_with(&layout.build_dir));
    }

    #[test]
    fn test_is_project_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(!is_project_root(tmp.path()));
        std::fs::create_dir(tmp.path().join("engine")).unwrap();
        assert!(is_project_root(tmp.path()));
    }
}
