// Errors surfaced by the merge pipeline and its file boundary

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no second HTML document selected (pass --source <FILE>)")]
    MissingSource,

    #[error("failed to read template {}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read second document {}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "radio option count mismatch: second document provides {source_count}, template provides {template_count}"
    )]
    RadioCountMismatch {
        source_count: usize,
        template_count: usize,
    },

    #[error("failed to serialize document")]
    Serialize(#[source] io::Error),

    #[error("output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("failed to write output {}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
