//! Cropper Core - Crop selector library
//!
//! This crate provides the core of the crop selector widget: image decoding,
//! viewport fitting, the crop rectangle editor, overlay rendering and the
//! JPEG export of the selection. It has no browser dependencies; the wasm
//! bindings drive it through [`CropSession`].

pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod events;
pub mod export;
pub mod geometry;
pub mod render;
pub mod session;
pub mod viewport;

pub use config::CropperConfig;
pub use decode::{decode_image, is_image_media_type, load_image, DecodeError, DecodedImage};
pub use editor::{apply_aspect_ratio, apply_drag, apply_resize, Bounds, CropEditor, Interaction};
pub use encode::EncodeError;
pub use events::{AspectRatioPayload, Effect, EventError, InboundEvent, InboundKind, OutboundEvent};
pub use export::{export_crop, plan_export, CroppedImage, ExportError, ExportPlan};
pub use geometry::{CropRect, CropState, Cursor, Handle, Point};
pub use render::{render_frame, Frame, RenderStyle};
pub use session::{CropSession, LoadTicket, Reaction};
pub use viewport::Viewport;
