//! Load orchestration
//!
//! Fetch boundary types, format detection, observers and the state machine
//! that sequences a material library fetch before the geometry fetch.

pub mod fetch;
pub mod format;
pub mod observer;
pub mod orchestrator;
pub mod retry;
pub mod session;

pub use fetch::{ByteSource, FetchError, FetchEvent, FetchKind, FetchRequest, FileSource, MemorySource, Ticket};
pub use format::{derive_material_url, GeometryFormat};
pub use observer::{LoadEvent, LoadObserver, ObserverRegistry};
pub use orchestrator::{LoadError, LoadOrchestrator, ViewerContext};
pub use retry::RetryPolicy;
pub use session::{LoadPhase, LoadSession};
