//! imagelab-io: Browser I/O and Dioxus component library.
//!
//! Sends submissions to the backend over `fetch`, saves processed images
//! through Blob downloads, manages preview object URLs, and provides the
//! reusable UI components of the imagelab web application.

pub mod components;
pub mod dispatch;
pub mod download;
pub mod notify;
pub mod object_url;
pub mod source;

pub use components::{
    FileUpload, HistogramChart, MappingChart, MaskEditor, OperationControls, OperationTabs,
    ParamEdit, ResultPanel, TransformControls,
};
pub use dispatch::RequestDispatcher;
pub use source::UploadedImage;
