//! @ai:module:intent Configuration structs for the benchmark driver
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, ProgramConfig, RunConfig, PathConfig, LaunchMode
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// @ai:intent Main configuration for the benchmark driver
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub program: ProgramConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent How the command line is handed to the operating system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// `sh -c <command>`
    #[default]
    Shell,
    /// First whitespace-separated word is the executable, the rest are arguments
    Direct,
}

/// @ai:intent The benchmarked program and its input/output files
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramConfig {
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default = "default_first_input")]
    pub first_input: String,
    #[serde(default = "default_second_input")]
    pub second_input: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
    #[serde(default)]
    pub launch: LaunchMode,
}

/// @ai:intent Run configuration for a session
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_runs")]
    pub runs: u32,
    /// One discovery run before measuring; its time is not recorded
    #[serde(default = "default_warmup")]
    pub warmup: bool,
    #[serde(default)]
    pub disable_extensions: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub dry_run: bool,
}

/// @ai:intent Output locations
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            first_input: default_first_input(),
            second_input: default_second_input(),
            output_file: default_output_file(),
            extra_args: Vec::new(),
            launch: LaunchMode::default(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            warmup: default_warmup(),
            disable_extensions: false,
            timeout_secs: None,
            dry_run: false,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

fn default_binary() -> String {
    "./Bioinformatics_Textmining_Release_Linux".to_string()
}

fn default_first_input() -> String {
    "./src/Tests/Test_Data/test_ebm.json".to_string()
}

fn default_second_input() -> String {
    "./src/Tests/Test_Data/intervention.txt".to_string()
}

fn default_output_file() -> String {
    "./out.txt".to_string()
}

fn default_runs() -> u32 {
    5
}

fn default_warmup() -> bool {
    true
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ProgramConfig {
    /// @ai:intent Compose `<binary> -i <first> -j <second> -o <output> [extra...]`
    /// @ai:effects pure
    pub fn command_line(&self) -> String {
        let mut parts = vec![
            self.binary.clone(),
            "-i".to_string(),
            self.first_input.clone(),
            "-j".to_string(),
            self.second_input.clone(),
            "-o".to_string(),
            self.output_file.clone(),
        ];
        parts.extend(self.extra_args.iter().cloned());
        parts.join(" ")
    }
}

impl RunConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_command_line_composition() {
        let program = ProgramConfig {
            binary: "./isect".to_string(),
            first_input: "a.json".to_string(),
            second_input: "b.txt".to_string(),
            output_file: "out.txt".to_string(),
            extra_args: vec!["--keep_single_tokens".to_string()],
            launch: LaunchMode::Shell,
        };

        assert_eq!(
            program.command_line(),
            "./isect -i a.json -j b.txt -o out.txt --keep_single_tokens"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BenchmarkConfig = toml::from_str(
            r#"
            [program]
            binary = "/opt/isect"
            launch = "direct"

            [run]
            runs = 3
            timeout_secs = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.program.binary, "/opt/isect");
        assert_eq!(config.program.launch, LaunchMode::Direct);
        assert_eq!(config.program.output_file, "./out.txt");
        assert_eq!(config.run.runs, 3);
        assert!(config.run.warmup);
        assert_eq!(config.run.timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.paths.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("benchmark.toml");

        let mut config = BenchmarkConfig::default();
        config.run.disable_extensions = true;
        config.save(&path).unwrap();

        let loaded = BenchmarkConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
