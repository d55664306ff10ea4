//! Per-widget crop session.
//!
//! Ties the loader, viewport, editor, renderer and exporter together for one
//! mounted widget. The session never touches the DOM: every operation returns
//! a [`Reaction`] describing the side effects, cursor and outbound event the
//! binding layer should carry out.
//!
//! # Loads
//!
//! Each accepted file selection takes a [`LoadTicket`] from a generation
//! counter. A completion only applies if its ticket is still the newest one,
//! so the last selection to *start* wins regardless of decode order.
//! [`CropSession::close`] retires every outstanding ticket.

use tracing::{debug, warn};

use crate::config::CropperConfig;
use crate::decode::{decode_image, is_image_media_type, DecodedImage};
use crate::editor::{Bounds, CropEditor};
use crate::events::{Effect, InboundEvent, OutboundEvent};
use crate::export::{export_crop, ExportError};
use crate::geometry::{CropState, Cursor, Point};
use crate::render::{render_frame, Frame, RenderStyle};
use crate::viewport::{display_backdrop, Viewport};

/// Token identifying one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// What the binding layer should do after a session operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    pub effects: Vec<Effect>,
    /// Cursor to show over the canvas, if it should change.
    pub cursor: Option<Cursor>,
    /// Event to push to the host.
    pub event: Option<OutboundEvent>,
}

impl Reaction {
    fn effects(effects: &[Effect]) -> Self {
        Self {
            effects: effects.to_vec(),
            ..Self::default()
        }
    }

    fn cursor(cursor: Cursor) -> Self {
        Self {
            cursor: Some(cursor),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.cursor.is_none() && self.event.is_none()
    }

    pub fn needs_redraw(&self) -> bool {
        self.effects.contains(&Effect::Redraw)
    }
}

/// Everything derived from one successfully decoded image.
#[derive(Debug)]
struct LoadedImage {
    source: DecodedImage,
    viewport: Viewport,
    backdrop: DecodedImage,
    editor: CropEditor,
}

/// State of one mounted crop widget.
#[derive(Debug)]
pub struct CropSession {
    config: CropperConfig,
    style: RenderStyle,
    generation: u64,
    closed: bool,
    aspect_ratio: Option<f64>,
    loaded: Option<LoadedImage>,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new(CropperConfig::default())
    }
}

impl CropSession {
    pub fn new(config: CropperConfig) -> Self {
        Self {
            style: RenderStyle::from(&config),
            aspect_ratio: config.default_aspect_ratio,
            generation: 0,
            closed: false,
            loaded: None,
            config,
        }
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Current aspect-ratio lock, applied to the next load when no image is
    /// loaded yet.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    pub fn state(&self) -> Option<&CropState> {
        self.loaded.as_ref().map(|l| l.editor.state())
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.loaded.as_ref().map(|l| l.viewport)
    }

    /// Intrinsic size of the loaded source image.
    pub fn source_dimensions(&self) -> Option<(u32, u32)> {
        self.loaded.as_ref().map(|l| l.source.dimensions())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tear the session down when its widget goes away.
    ///
    /// Drops the loaded image and invalidates every issued ticket, so a read
    /// still in flight completes into an empty reaction. Later selections are
    /// refused.
    pub fn close(&mut self) {
        self.generation += 1;
        self.closed = true;
        self.loaded = None;
        debug!(generation = self.generation, "session closed");
    }

    /// Accept a new file selection.
    ///
    /// Returns `None` for a non-image media type or a closed session.
    pub fn begin_load(&mut self, media_type: &str) -> Option<LoadTicket> {
        if self.closed {
            debug!(media_type, "ignoring file on closed session");
            return None;
        }
        if !is_image_media_type(media_type) {
            warn!(media_type, "ignoring non-image file");
            return None;
        }

        self.generation += 1;
        debug!(generation = self.generation, media_type, "load started");
        Some(LoadTicket(self.generation))
    }

    /// Complete a load with the file's bytes.
    ///
    /// Stale tickets and undecodable files produce an empty reaction and leave
    /// the session as it was.
    pub fn finish_load(&mut self, ticket: LoadTicket, bytes: &[u8], container_width: f64) -> Reaction {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding stale load"
            );
            return Reaction::default();
        }

        let source = match decode_image(bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "image decode failed");
                return Reaction::default();
            }
        };

        let viewport = Viewport::fit(
            source.width,
            source.height,
            container_width,
            self.config.display_height,
        );
        let backdrop = match display_backdrop(&source, &viewport) {
            Ok(backdrop) => backdrop,
            Err(e) => {
                warn!(error = %e, "display backdrop failed");
                return Reaction::default();
            }
        };

        let state = CropState::initial(&viewport, self.aspect_ratio, self.config.initial_fill);
        let bounds = Bounds::new(viewport.width(), viewport.height(), self.config.min_size);
        let editor = CropEditor::new(state, bounds, self.config.handle_tolerance);

        let (width, height) = source.dimensions();
        debug!(
            width,
            height,
            canvas_width = viewport.canvas_width,
            canvas_height = viewport.canvas_height,
            "image loaded"
        );

        self.loaded = Some(LoadedImage {
            source,
            viewport,
            backdrop,
            editor,
        });

        Reaction {
            effects: vec![Effect::ShowControls, Effect::Redraw],
            cursor: Some(Cursor::Default),
            event: Some(OutboundEvent::ImageLoaded { width, height }),
        }
    }

    pub fn pointer_down(&mut self, p: Point) -> Reaction {
        match self.loaded.as_mut() {
            Some(loaded) => Reaction::cursor(loaded.editor.pointer_down(p)),
            None => Reaction::default(),
        }
    }

    pub fn pointer_move(&mut self, p: Point) -> Reaction {
        let Some(loaded) = self.loaded.as_mut() else {
            return Reaction::default();
        };

        let (redraw, cursor) = loaded.editor.pointer_move(p);
        Reaction {
            effects: if redraw { vec![Effect::Redraw] } else { Vec::new() },
            cursor: Some(cursor),
            event: None,
        }
    }

    pub fn pointer_up(&mut self, p: Option<Point>) -> Reaction {
        match self.loaded.as_mut() {
            Some(loaded) => Reaction::cursor(loaded.editor.pointer_up(p)),
            None => Reaction::default(),
        }
    }

    /// Handle an inbound host event.
    pub fn dispatch(&mut self, event: InboundEvent) -> Reaction {
        match event {
            InboundEvent::ResetFileInput => Reaction::effects(&[Effect::ClearFileInput]),
            InboundEvent::ChangeAspectRatio { ratio } => {
                if let Some(r) = ratio {
                    if !r.is_finite() || r <= 0.0 {
                        warn!(ratio = r, "ignoring invalid aspect ratio");
                        return Reaction::default();
                    }
                }

                self.aspect_ratio = ratio;
                match self.loaded.as_mut() {
                    Some(loaded) => {
                        loaded.editor.set_aspect_ratio(ratio);
                        Reaction::effects(&[Effect::Redraw])
                    }
                    None => Reaction::default(),
                }
            }
        }
    }

    /// Render the current frame, if an image is loaded.
    pub fn render(&self) -> Option<Frame> {
        self.loaded
            .as_ref()
            .map(|l| render_frame(&l.backdrop, l.editor.state(), &self.style))
    }

    /// Export the current selection.
    ///
    /// On success the reaction carries `image_cropped` and asks for the file
    /// input to be cleared.
    pub fn commit(&self) -> Result<Reaction, ExportError> {
        let loaded = self.loaded.as_ref().ok_or(ExportError::NoImage)?;
        let cropped = export_crop(
            &loaded.source,
            loaded.editor.state(),
            &loaded.viewport,
            &self.config,
        )?;

        Ok(Reaction {
            effects: vec![Effect::ClearFileInput],
            cursor: None,
            event: Some(OutboundEvent::ImageCropped {
                data: cropped.data_uri,
                width: cropped.width,
                height: cropped.height,
            }),
        })
    }
}
