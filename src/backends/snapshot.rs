//! Environment snapshot.
//!
//! Activation state lives in ambient shell variables (`VIRTUAL_ENV`,
//! `CONDA_PREFIX`). Instead of reading the process environment from deep
//! inside adapters, a snapshot is captured once at the entry point and passed
//! down explicitly, so every probe is a pure function of its snapshot and
//! tests can fabricate arbitrary activation states.

use crate::core::types::Tool;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    /// `VIRTUAL_ENV`: root of an active virtualenv (uv- or pip-managed).
    pub virtual_env: Option<PathBuf>,
    /// `CONDA_PREFIX`: root of an active conda environment.
    pub conda_prefix: Option<PathBuf>,
    /// `CONDA_DEFAULT_ENV`: conda's name for the active environment.
    pub conda_default_env: Option<String>,
}

impl EnvSnapshot {
    /// Capture the calling process's activation state.
    pub fn capture() -> Self {
        Self {
            virtual_env: std::env::var_os("VIRTUAL_ENV").map(PathBuf::from),
            conda_prefix: std::env::var_os("CONDA_PREFIX").map(PathBuf::from),
            conda_default_env: std::env::var("CONDA_DEFAULT_ENV").ok(),
        }
    }

    /// Whether the active virtualenv was created by uv.
    ///
    /// uv stamps a `uv = <version>` key into the venv's `pyvenv.cfg`; a venv
    /// without the stamp belongs to plain venv/pip.
    pub fn venv_is_uv_managed(&self) -> bool {
        let Some(root) = &self.virtual_env else {
            return false;
        };
        pyvenv_cfg_has_uv_stamp(root)
    }

    /// Every tool whose activation marker is present, in declaration order.
    ///
    /// More than one entry means the shell is in an ambiguous state (e.g. a
    /// venv activated inside a conda environment); callers classify that
    /// against the recorded tool instead of picking a winner.
    pub fn active_tools(&self) -> Vec<Tool> {
        let mut active = Vec::new();
        if self.virtual_env.is_some() {
            active.push(if self.venv_is_uv_managed() {
                Tool::Uv
            } else {
                Tool::Pip
            });
        }
        if self.conda_prefix.is_some() {
            active.push(Tool::Conda);
        }
        active
    }

    /// Root of the active environment owned by `tool`, if any.
    pub fn prefix_for(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Conda => self.conda_prefix.as_deref(),
            Tool::Uv => self
                .virtual_env
                .as_deref()
                .filter(|_| self.venv_is_uv_managed()),
            Tool::Pip => self
                .virtual_env
                .as_deref()
                .filter(|_| !self.venv_is_uv_managed()),
        }
    }
}

fn pyvenv_cfg_has_uv_stamp(venv_root: &Path) -> bool {
    let Ok(content) = fs::read_to_string(venv_root.join("pyvenv.cfg")) else {
        return false;
    };
    content.lines().any(|line| {
        line.split_once('=')
            .map(|(key, _)| key.trim() == "uv")
            .unwrap_or(false)
    })
}
