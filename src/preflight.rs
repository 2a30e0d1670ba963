//! @ai:module:intent Check the benchmarked program and its inputs before a session
//! @ai:module:layer infrastructure
//! @ai:module:public_api Preflight, PreflightStatus, MissingInput
//! @ai:module:stateless true

use crate::config::ProgramConfig;
use std::path::Path;

/// @ai:intent Information about a missing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInput {
    pub role: &'static str,
    pub path: String,
    pub hint: &'static str,
}

/// @ai:intent Status of preflight validation
#[derive(Debug, Default)]
pub struct PreflightStatus {
    pub missing: Vec<MissingInput>,
}

impl PreflightStatus {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

/// @ai:intent Validates that the program and input files exist
pub struct Preflight;

impl Preflight {
    /// @ai:intent Get hint for a missing role
    /// @ai:effects pure
    fn hint(role: &str) -> &'static str {
        match role {
            "binary" => "Build the intersection program or set [program].binary",
            "first input" => "Set [program].first_input or pass --first",
            "second input" => "Set [program].second_input or pass --second",
            _ => "Check the path",
        }
    }

    /// @ai:intent Only explicit paths can be checked; bare names are resolved by PATH
    /// @ai:effects pure
    fn is_path_like(value: &str) -> bool {
        value.contains('/') || value.contains('\\')
    }

    /// @ai:intent `~/` is expanded by the shell, so expand it here too
    /// @ai:effects env
    fn expand_home(value: &str) -> String {
        match (value.strip_prefix("~/"), std::env::var("HOME")) {
            (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
            _ => value.to_string(),
        }
    }

    /// @ai:intent Check if a file is present
    /// @ai:effects fs:read
    fn exists(value: &str) -> bool {
        Path::new(&Self::expand_home(value)).exists()
    }

    /// @ai:intent Validate the program configuration and return status
    /// @ai:effects fs:read
    pub fn check(program: &ProgramConfig) -> PreflightStatus {
        let mut missing = Vec::new();

        let mut candidates = Vec::new();
        if Self::is_path_like(&program.binary) {
            candidates.push(("binary", program.binary.as_str()));
        }
        candidates.push(("first input", program.first_input.as_str()));
        candidates.push(("second input", program.second_input.as_str()));

        for (role, path) in candidates {
            if !Self::exists(path) {
                missing.push(MissingInput {
                    role,
                    path: path.to_string(),
                    hint: Self::hint(role),
                });
            }
        }

        PreflightStatus { missing }
    }

    /// @ai:intent Log warnings for missing files
    /// @ai:effects io
    pub fn log_warnings(status: &PreflightStatus) {
        for missing in &status.missing {
            tracing::warn!(
                "{} '{}' not found. {}",
                missing.role,
                missing.path,
                missing.hint
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_all_present() {
        let temp = TempDir::new().unwrap();
        let binary = temp.path().join("isect");
        let first = temp.path().join("a.json");
        let second = temp.path().join("b.txt");
        for p in [&binary, &first, &second] {
            std::fs::write(p, "").unwrap();
        }

        let program = ProgramConfig {
            binary: binary.display().to_string(),
            first_input: first.display().to_string(),
            second_input: second.display().to_string(),
            ..Default::default()
        };

        assert!(Preflight::check(&program).is_ready());
    }

    #[test]
    fn test_reports_missing_inputs() {
        let program = ProgramConfig {
            binary: "/nonexistent/isect".to_string(),
            first_input: "/nonexistent/a.json".to_string(),
            second_input: "/nonexistent/b.txt".to_string(),
            ..Default::default()
        };

        let status = Preflight::check(&program);
        let roles: Vec<_> = status.missing.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["binary", "first input", "second input"]);
        assert!(status.missing[0].hint.contains("binary"));
    }

    #[test]
    fn test_bare_binary_name_is_not_checked() {
        let program = ProgramConfig {
            binary: "isect_on_path".to_string(),
            first_input: "/nonexistent/a.json".to_string(),
            second_input: "/nonexistent/b.txt".to_string(),
            ..Default::default()
        };

        let status = Preflight::check(&program);
        assert!(status.missing.iter().all(|m| m.role != "binary"));
    }

    #[test]
    fn test_expand_home() {
        if let Ok(home) = std::env::var("HOME") {
            let expanded = Preflight::expand_home("~/Downloads/x.txt");
            assert!(expanded.starts_with(home.trim_end_matches('/')));
            assert!(expanded.ends_with("/Downloads/x.txt"));
        }
        assert_eq!(Preflight::expand_home("./x.txt"), "./x.txt");
    }
}
