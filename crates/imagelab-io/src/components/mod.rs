//! Dioxus UI components for imagelab.
//!
//! Provides the image upload zone, operation navigation, per-operation
//! parameter controls, the convolution mask editor, histogram and
//! intensity mapping charts, and the result panel with its download
//! button.

mod controls;
mod histogram;
mod mapping;
mod mask_editor;
mod result;
mod tabs;
mod transform;
mod upload;
mod widgets;

pub use controls::{OperationControls, ParamEdit};
pub use histogram::HistogramChart;
pub use mapping::MappingChart;
pub use mask_editor::MaskEditor;
pub use result::ResultPanel;
pub use tabs::OperationTabs;
pub use transform::TransformControls;
pub use upload::FileUpload;
