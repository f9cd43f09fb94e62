//! # Tool Path Resolver
//!
//! This module handles finding the external tools the compressor shells out to:
//! - A bundled tools directory (`TOOLS_DIR` environment variable)
//! - System-installed tools on the `PATH`

use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tools the compressor needs at runtime
pub const REQUIRED_TOOLS: [&str; 2] = ["ocrmypdf", "gs"];

/// Tool path resolver for different deployment environments
#[derive(Debug, Clone)]
pub struct ToolPathResolver {
    /// Directory where tools are bundled, checked before the search path
    tools_dir: Option<PathBuf>,
    /// Directories searched in order, normally taken from `PATH`
    search_dirs: Vec<PathBuf>,
}

impl ToolPathResolver {
    /// Create a resolver from the current environment
    pub fn new() -> Self {
        let tools_dir = env::var_os("TOOLS_DIR")
            .map(PathBuf::from)
            .filter(|dir| dir.is_dir());
        if let Some(ref dir) = tools_dir {
            debug!("Found tools directory via TOOLS_DIR: {:?}", dir);
        }

        let search_dirs = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();

        Self {
            tools_dir,
            search_dirs,
        }
    }

    /// Create a resolver that only looks in the given directories
    pub fn with_search_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            tools_dir: None,
            search_dirs,
        }
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool_name: &str) -> Option<PathBuf> {
        let file_name = Self::executable_name(tool_name);

        let found = self
            .tools_dir
            .iter()
            .chain(self.search_dirs.iter())
            .map(|dir| dir.join(&file_name))
            .find(|path| Self::is_executable(path));

        match found {
            Some(path) => {
                debug!("Resolved tool: {} -> {:?}", tool_name, path);
                Some(path)
            }
            None => {
                warn!("Tool not found: {}", tool_name);
                None
            }
        }
    }

    /// Check if a specific tool is available
    pub fn is_tool_available(&self, tool_name: &str) -> bool {
        self.resolve_tool(tool_name).is_some()
    }

    /// Names of the given tools that cannot be resolved
    pub fn missing_tools<'a>(&self, tools: &[&'a str]) -> Vec<&'a str> {
        tools
            .iter()
            .copied()
            .filter(|tool| !self.is_tool_available(tool))
            .collect()
    }

    fn executable_name(tool_name: &str) -> String {
        if cfg!(windows) && Path::new(tool_name).extension().is_none() {
            format!("{}.exe", tool_name)
        } else {
            tool_name.to_string()
        }
    }

    #[cfg(unix)]
    fn is_executable(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable(path: &Path) -> bool {
        path.is_file()
    }
}

impl Default for ToolPathResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_tool(dir: &Path, name: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_resolves_first_match_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_tool(first.path(), "ocrmypdf", 0o755);
        make_tool(second.path(), "ocrmypdf", 0o755);

        let resolver = ToolPathResolver::with_search_dirs(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(
            resolver.resolve_tool("ocrmypdf"),
            Some(first.path().join("ocrmypdf"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_skips_non_executable_files() {
        let dir = TempDir::new().unwrap();
        make_tool(dir.path(), "ocrmypdf", 0o644);

        let resolver = ToolPathResolver::with_search_dirs(vec![dir.path().to_path_buf()]);
        assert!(!resolver.is_tool_available("ocrmypdf"));
    }

    #[test]
    fn test_missing_tools_lists_unresolved() {
        let dir = TempDir::new().unwrap();
        let resolver = ToolPathResolver::with_search_dirs(vec![dir.path().to_path_buf()]);
        assert_eq!(resolver.missing_tools(&REQUIRED_TOOLS), vec!["ocrmypdf", "gs"]);
    }
}
