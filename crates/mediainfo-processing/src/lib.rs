//! Media processing for the MediaInfo AME worker.
//!
//! Wraps the external `mediainfo` tool. The tool is the only thing that reads
//! media; this crate only builds its command line and captures what it prints.

pub mod extractor;

pub use extractor::{ExtractionError, ExtractionOutput, MediaInfoExtractor, MetadataExtractor};
