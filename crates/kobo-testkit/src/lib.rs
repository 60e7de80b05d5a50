//! Test doubles for kobo: Enketo response simulators, a mock HTTP transport
//! and media attachments backed by fixture files.

pub mod attachment;
pub mod enketo;
pub mod form;
pub mod http;
pub mod snapshot;
pub mod transport;
pub mod xml;

pub use attachment::{
    Attachment, AttachmentError, AudioTranscoder, FfmpegTranscoder, MockAttachment, ProtectedPath,
    StoredAttachment,
};
pub use enketo::{EnketoSimulator, SimulatorError};
pub use http::{CapturedRequest, HttpMethod, SimulatedResponse};
pub use snapshot::{AssetSnapshot, InMemorySnapshotStore, SnapshotStore};
pub use transport::{register_enketo, MockTransport, StaticEndpoint, TransportError};
