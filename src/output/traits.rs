//! Document sink trait and errors
//!
//! A sink receives transformed documents one at a time, in order. The file
//! writer is the only sink the dumper uses; bulk loading into the
//! destination store happens outside this crate, from the written file.

use crate::transform::DestinationDocument;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for transformed documents
pub trait DocumentSink {
    /// Appends one document
    fn write_document(&mut self, document: &DestinationDocument) -> OutputResult<()>;

    /// Flushes buffered documents to their destination
    fn flush(&mut self) -> OutputResult<()>;

    /// Number of documents written so far
    fn documents_written(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// In-memory sink
    #[derive(Default)]
    struct VecSink {
        documents: Vec<DestinationDocument>,
        flushed: bool,
    }

    impl DocumentSink for VecSink {
        fn write_document(&mut self, document: &DestinationDocument) -> OutputResult<()> {
            self.documents.push(document.clone());
            Ok(())
        }

        fn flush(&mut self) -> OutputResult<()> {
            self.flushed = true;
            Ok(())
        }

        fn documents_written(&self) -> u64 {
            self.documents.len() as u64
        }
    }

    #[test]
    fn test_sink_as_trait_object() {
        let mut sink = VecSink::default();
        {
            let dyn_sink: &mut dyn DocumentSink = &mut sink;
            let mut doc = DestinationDocument::default();
            doc.insert("obj_id", json!("a"));
            dyn_sink.write_document(&doc).unwrap();
            dyn_sink.flush().unwrap();
            assert_eq!(dyn_sink.documents_written(), 1);
        }
        assert!(sink.flushed);
        assert_eq!(sink.documents[0].get("obj_id"), Some(&json!("a")));
    }
}
