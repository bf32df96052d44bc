use super::config::JsonAgentConfig;
use crate::agent::AgentConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Loads agent definition files from directories
///
/// Every `.json` file in a search path is one agent definition. Unlike a chat
/// app, a trip planner cannot run with a half-loaded agent set, so any file
/// that fails to parse or validate fails the whole load; missing directories
/// are skipped.
pub struct AgentLoader {
    /// Directories to search for agent JSON files, later ones win on id clashes
    search_paths: Vec<PathBuf>,
}

impl AgentLoader {
    /// Create a loader with no search paths
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
        }
    }

    pub fn add_search_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.search_paths.push(path.into());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Load all agents from configured search paths
    ///
    /// When two files define the same id, the one found later replaces the
    /// earlier one.
    ///
    /// # Errors
    /// - Unreadable directory or file
    /// - Invalid agent definition
    pub fn load_all(&self) -> Result<Vec<AgentConfig>> {
        let mut agents: Vec<AgentConfig> = Vec::new();

        for search_path in &self.search_paths {
            if !search_path.exists() {
                tracing::debug!("Agent search path does not exist: {:?}", search_path);
                continue;
            }

            for agent in self.load_from_directory(search_path)? {
                if let Some(existing) = agents.iter_mut().find(|a| a.id == agent.id) {
                    tracing::info!("Agent '{}' redefined by {:?}", agent.id, search_path);
                    *existing = agent;
                } else {
                    agents.push(agent);
                }
            }
        }

        Ok(agents)
    }

    /// Load agents from a specific directory, sorted by file name
    pub fn load_from_directory(&self, path: &Path) -> Result<Vec<AgentConfig>> {
        let entries = std::fs::read_dir(path)
            .with_context(|| format!("Failed to read agent directory: {:?}", path))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry_path = entry
                .with_context(|| format!("Failed to read directory entry in {:?}", path))?
                .path();

            // Only process .json files
            if entry_path.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(entry_path);
            }
        }
        files.sort();

        let mut agents = Vec::with_capacity(files.len());
        for file in files {
            let agent = self.load_agent(&file)?;
            tracing::info!("Loaded agent '{}' from {:?}", agent.id, file);
            agents.push(agent);
        }

        Ok(agents)
    }

    /// Load a single agent from a JSON file
    pub fn load_agent(&self, path: &Path) -> Result<AgentConfig> {
        JsonAgentConfig::from_file(path)?
            .into_agent_config()
            .with_context(|| format!("Invalid agent configuration in {:?}", path))
    }
}

impl Default for AgentLoader {
    fn default() -> Self {
        Self::new()
    }
}
