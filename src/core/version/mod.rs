pub mod manifest;
pub mod marker;
pub mod status;

pub use manifest::RemoteManifest;
pub use marker::VersionMarker;
pub use status::{ControlAction, UpdateStatus};
