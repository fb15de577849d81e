//! Generator configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::Int;

/// Sizing of the leaf pass-gate mux.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColumnMuxParams {
    /// Pass transistor width.
    pub tx_size: Int,
    /// Pass transistor channel length.
    pub length: Int,
}

impl Default for ColumnMuxParams {
    fn default() -> Self {
        Self {
            tx_size: 1_600,
            length: 400,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColumnMuxArrayParams {
    pub columns: usize,
    pub word_size: usize,
    #[serde(default)]
    pub mux: ColumnMuxParams,
}

impl ColumnMuxArrayParams {
    pub fn new(columns: usize, word_size: usize) -> Self {
        Self {
            columns,
            word_size,
            mux: ColumnMuxParams::default(),
        }
    }

    /// The number of columns multiplexed onto each output pair.
    pub fn words_per_row(&self) -> usize {
        self.columns / self.word_size
    }

    /// Rejects parameter combinations that would mis-route before any pin or
    /// geometry is produced.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.word_size == 0 {
            return Err(Error::BadParams(format!(
                "columns ({}) and word size ({}) must be positive",
                self.columns, self.word_size
            )));
        }
        if self.columns % self.word_size != 0 {
            return Err(Error::BadMuxRatio {
                columns: self.columns,
                word_size: self.word_size,
            });
        }
        if self.mux.tx_size <= 0 || self.mux.length <= 0 {
            return Err(Error::BadParams(format!(
                "mux tx_size ({}) and length ({}) must be positive",
                self.mux.tx_size, self.mux.length
            )));
        }
        Ok(())
    }
}

pub fn parse_colmux_config(path: impl AsRef<Path>) -> anyhow::Result<ColumnMuxArrayParams> {
    let contents = fs::read_to_string(path)?;
    let data = toml::from_str(&contents)?;
    Ok(data)
}
