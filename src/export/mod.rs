//! Recording a full animation run and delivering it as a file.
//!
//! [`ExportJob`] is the observable state (`idle → recording → encoding → done | error`);
//! [`ExportSession`] drives one export through it.

/// Shared export state machine.
pub mod job;
/// Recording and transcoding driver.
pub mod session;

pub use job::{ExportArtifact, ExportJob, ExportOptions, ExportState, ExportStatus};
pub use session::{ExportSession, ExporterConfig};
