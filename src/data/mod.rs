//! File import and export for rendered images and photon trajectories.

pub mod import_export;

pub use import_export::{ExportError, ExportResult, FileFormat, ImportExport};
