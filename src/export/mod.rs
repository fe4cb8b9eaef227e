// src/export/mod.rs
pub mod backend;
pub mod clipboard;
pub mod font;
pub mod in_flight;
pub mod notifier;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod share;
pub mod sink;

pub use backend::{HttpBackend, ResumeBackend, SimulatedBackend};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use notifier::{MemoryNotifier, Notification, NotificationKind, Notifier, TracingNotifier};
pub use pipeline::{ExportArtifact, ExportPipeline, PreviewSurface};
pub use raster::Rasterizer;
pub use sink::{DirectorySink, DownloadSink, MemorySink};
