//! imagelab-core: Request building and response handling for the
//! imagelab client (sans-IO).
//!
//! Turns user edits into validated form submissions for the image
//! processing backend and turns its JSON answers into displayable data:
//! kernel masks, transformation parameters, pyramid level budgets,
//! histogram bar heights, and downloadable artifacts.
//!
//! This crate has **no I/O dependencies** -- it never touches the
//! network or the DOM. Fetching, downloads, and rendering live in
//! `imagelab-io`.

pub mod api;
pub mod artifact;
pub mod coefficient;
pub mod config;
pub mod histogram;
pub mod mask;
pub mod operation;
pub mod params;
pub mod presets;
pub mod pyramid;
pub mod request;
pub mod transform;
pub mod types;

pub use api::{ClientError, ComputedHistogram, OperationOutcome};
pub use artifact::{ArtifactError, PreparedDownload, ProcessedArtifact};
pub use coefficient::Coefficient;
pub use config::ClientConfig;
pub use histogram::{Bar, HistogramPair, Panel};
pub use mask::{KernelSize, MaskError, MaskMatrixBuilder, MaskMode, MaskProvider, PresetKind};
pub use operation::Operation;
pub use params::{MinMaxKind, OperationParams, ParamBook, Submission};
pub use pyramid::PyramidBudget;
pub use request::{RequestToken, RequestTracker};
pub use transform::{TransformField, TransformKind, TransformParameters};
pub use types::{DimensionError, Dimensions};
