//! Interactive poster state.
//!
//! A [`PosterSession`] owns the current template, photo and text values and repaints its render
//! target after every change. Image decoding is the only work that leaves the calling thread: it
//! runs on a small `rayon` pool and reports back over a channel. Completed loads are applied in
//! the order they finish, so the most recently completed load is what gets rendered.

use std::{
    path::{Path, PathBuf},
    sync::mpsc,
};

use crate::{
    assets::{
        decode::{Image, decode_image},
        font::FontBook,
    },
    export,
    foundation::error::{PosterError, PosterResult},
    layout::spec::{LayoutSpec, TextField},
    render::{
        FrameRGBA,
        cpu::CpuTarget,
        poster::{PosterInputs, PosterRenderer, PosterText, RenderOutcome},
        target::RenderTarget,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Template,
    Photo,
}

/// Handle for one asynchronous load, in submission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

struct LoadMsg {
    slot: ImageSlot,
    ticket: LoadTicket,
    result: PosterResult<Image>,
}

/// What happened when a completed load was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadApplied {
    pub slot: ImageSlot,
    pub ticket: LoadTicket,
    pub ok: bool,
}

pub struct PosterSession {
    renderer: PosterRenderer,
    fonts: FontBook,
    pool: rayon::ThreadPool,
    tx: mpsc::Sender<LoadMsg>,
    rx: mpsc::Receiver<LoadMsg>,
    in_flight: usize,
    next_ticket: u64,
    template: Option<Image>,
    photo: Option<Image>,
    text: PosterText,
    target: Option<CpuTarget>,
    last_outcome: RenderOutcome,
}

impl std::fmt::Debug for PosterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterSession")
            .field("has_template", &self.template.is_some())
            .field("has_photo", &self.photo.is_some())
            .field("text", &self.text)
            .field("in_flight", &self.in_flight)
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}

impl PosterSession {
    pub fn new(layout: LayoutSpec, fonts: FontBook) -> PosterResult<Self> {
        let renderer = PosterRenderer::new(layout)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .thread_name(|i| format!("posterkit-decode-{i}"))
            .build()
            .map_err(|e| PosterError::Other(anyhow::anyhow!("build decode pool: {e}")))?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            renderer,
            fonts,
            pool,
            tx,
            rx,
            in_flight: 0,
            next_ticket: 0,
            template: None,
            photo: None,
            text: PosterText::default(),
            target: None,
            last_outcome: RenderOutcome::Skipped,
        })
    }

    pub fn layout(&self) -> &LayoutSpec {
        self.renderer.layout()
    }

    pub fn text(&self) -> &PosterText {
        &self.text
    }

    pub fn template(&self) -> Option<&Image> {
        self.template.as_ref()
    }

    pub fn photo(&self) -> Option<&Image> {
        self.photo.as_ref()
    }

    pub fn last_outcome(&self) -> RenderOutcome {
        self.last_outcome
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) -> PosterResult<()> {
        self.text.set(field, value);
        self.rerender().map(|_| ())
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> PosterResult<()> {
        self.set_text(TextField::Name, value)
    }

    pub fn set_unit(&mut self, value: impl Into<String>) -> PosterResult<()> {
        self.set_text(TextField::Unit, value)
    }

    pub fn set_dob(&mut self, value: impl Into<String>) -> PosterResult<()> {
        self.set_text(TextField::Dob, value)
    }

    /// Install a new template. The render target is recreated when the size changes.
    pub fn set_template(&mut self, template: Image) -> PosterResult<()> {
        self.install_template(template)?;
        self.rerender().map(|_| ())
    }

    /// Swap in `template` and a matching target. On error the previous template stays.
    fn install_template(&mut self, template: Image) -> PosterResult<()> {
        let same_size = self
            .target
            .as_ref()
            .is_some_and(|t| t.size() == template.size());
        if !same_size {
            self.target = Some(CpuTarget::for_template(&template, &self.fonts)?);
        }
        self.template = Some(template);
        Ok(())
    }

    pub fn set_photo(&mut self, photo: Image) -> PosterResult<()> {
        self.photo = Some(photo);
        self.rerender().map(|_| ())
    }

    pub fn clear_photo(&mut self) -> PosterResult<()> {
        self.photo = None;
        self.rerender().map(|_| ())
    }

    pub fn load_template_async(&mut self, bytes: Vec<u8>) -> LoadTicket {
        self.spawn_decode(ImageSlot::Template, bytes)
    }

    pub fn load_photo_async(&mut self, bytes: Vec<u8>) -> LoadTicket {
        self.spawn_decode(ImageSlot::Photo, bytes)
    }

    fn spawn_decode(&mut self, slot: ImageSlot, bytes: Vec<u8>) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight += 1;

        let tx = self.tx.clone();
        self.pool.spawn(move || {
            let result = decode_image(&bytes);
            // The receiver lives as long as the session; a send error means it was dropped.
            let _ = tx.send(LoadMsg {
                slot,
                ticket,
                result,
            });
        });
        tracing::debug!(?slot, ticket = ticket.0, "queued decode");
        ticket
    }

    /// Apply every load that has completed so far, without blocking.
    pub fn pump(&mut self) -> PosterResult<Vec<LoadApplied>> {
        let mut applied = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            applied.push(self.apply(msg)?);
        }
        Ok(applied)
    }

    /// Block until every queued load has completed and been applied.
    pub fn wait_idle(&mut self) -> PosterResult<Vec<LoadApplied>> {
        let mut applied = Vec::new();
        while self.in_flight > 0 {
            let msg = self
                .rx
                .recv()
                .map_err(|e| PosterError::Other(anyhow::anyhow!("decode channel closed: {e}")))?;
            applied.push(self.apply(msg)?);
        }
        Ok(applied)
    }

    #[tracing::instrument(skip(self, msg), fields(slot = ?msg.slot, ticket = msg.ticket.0))]
    fn apply(&mut self, msg: LoadMsg) -> PosterResult<LoadApplied> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let ok = match (msg.slot, msg.result) {
            (ImageSlot::Template, Ok(image)) => match self.install_template(image) {
                Ok(()) => {
                    self.rerender()?;
                    true
                }
                Err(err) => {
                    tracing::warn!(error = %err, "template rejected, keeping previous template");
                    false
                }
            },
            (ImageSlot::Photo, Ok(image)) => {
                self.set_photo(image)?;
                true
            }
            (_, Err(err)) => {
                tracing::warn!(error = %err, "image decode failed, keeping previous image");
                false
            }
        };
        Ok(LoadApplied {
            slot: msg.slot,
            ticket: msg.ticket,
            ok,
        })
    }

    /// Repaint from the current state. Without a template this does nothing.
    pub fn rerender(&mut self) -> PosterResult<RenderOutcome> {
        let outcome = match self.target.as_mut() {
            Some(target) => self.renderer.render(
                target,
                &PosterInputs {
                    template: self.template.as_ref(),
                    photo: self.photo.as_ref(),
                    text: &self.text,
                },
            )?,
            None => RenderOutcome::Skipped,
        };
        self.last_outcome = outcome;
        Ok(outcome)
    }

    /// Current pixels, if a template has been loaded.
    pub fn frame(&mut self) -> Option<FrameRGBA> {
        if self.template.is_none() {
            return None;
        }
        self.target.as_mut().map(CpuTarget::snapshot)
    }

    /// Save the current poster as PNG into `out` (a directory or a `.png` path).
    pub fn download(&mut self, out: &Path) -> PosterResult<PathBuf> {
        let frame = self.frame().ok_or(PosterError::NoTemplate)?;
        export::save_png(&frame, out)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
