use arcstr::ArcStr;

use crate::tech::Layer;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid params: {0}")]
    BadParams(String),
    #[error("columns ({columns}) must be an integer multiple of word size ({word_size})")]
    BadMuxRatio { columns: usize, word_size: usize },
    #[error("no such layer in tech config: {0}")]
    MissingLayer(Layer),
    #[error("no spacing rule between {from} and {to}")]
    MissingSpacing { from: Layer, to: Layer },
    #[error("no such contact stack: {0}")]
    MissingStack(ArcStr),
    #[error("cell {cell} has no pin {port}")]
    MissingPin { cell: ArcStr, port: ArcStr },
}

pub type Result<T> = std::result::Result<T, Error>;
