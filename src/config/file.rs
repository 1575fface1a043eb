//! Configuration file data structures

use serde::Deserialize;

use crate::analyzer::callgraph::{CallMnemonics, CallPreset};
use crate::error::FootprintError;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".fn-footprint.toml";

/// fn-footprint configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    /// Call detection settings
    pub calls: Option<CallSettings>,

    /// Report settings
    pub report: Option<ReportSettings>,
}

/// Which instructions count as calls
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CallSettings {
    /// Named mnemonic set ("linked" or "tail-calls")
    #[serde(default)]
    pub preset: CallPreset,

    /// Mnemonics added on top of the preset
    #[serde(default)]
    pub extra: Vec<String>,
}

/// Console report settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportSettings {
    /// Maximum breakdown rows per root
    pub limit: Option<usize>,
}

impl ConfigFile {
    /// Mnemonic set described by the `[calls]` table, `linked` when absent
    pub fn call_mnemonics(&self) -> Result<CallMnemonics, FootprintError> {
        match &self.calls {
            Some(calls) => CallMnemonics::from_preset(calls.preset).extended(&calls.extra),
            None => Ok(CallMnemonics::default()),
        }
    }

    /// Breakdown row limit from the `[report]` table
    pub fn report_limit(&self) -> Option<usize> {
        self.report.as_ref().and_then(|report| report.limit)
    }
}
