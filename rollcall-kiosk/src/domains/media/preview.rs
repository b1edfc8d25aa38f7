//! Live preview surface
//!
//! The surface a stream is bound to while the Scan screen is showing. It
//! owns the stream between `attach` and `detach`.

use image::{RgbImage, imageops};

use super::devices::{MediaStream, TrackKind};

#[derive(Debug, Default)]
pub struct PreviewSurface {
    stream: Option<Box<dyn MediaStream>>,
    playing: bool,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a stream. A previously bound stream is handed back so the caller
    /// can stop it; the surface never silently drops one.
    pub fn attach(
        &mut self,
        stream: Box<dyn MediaStream>,
    ) -> Option<Box<dyn MediaStream>> {
        self.playing = false;
        self.stream.replace(stream)
    }

    pub fn play(&mut self) -> bool {
        self.playing = self.stream.is_some();
        self.playing
    }

    pub fn is_attached(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Decoded video size, only while playing and once non-zero.
    pub fn decoded_dimensions(&self) -> Option<(u32, u32)> {
        if !self.playing {
            return None;
        }
        self.stream
            .as_ref()?
            .video_dimensions()
            .filter(|(w, h)| *w > 0 && *h > 0)
    }

    /// Render the current frame into a raster of the video's native size.
    pub fn draw_frame(&self) -> Option<RgbImage> {
        let (width, height) = self.decoded_dimensions()?;
        let frame = self.stream.as_ref()?.current_frame()?;
        if frame.dimensions() == (width, height) {
            Some(frame)
        } else {
            Some(imageops::resize(
                &frame,
                width,
                height,
                imageops::FilterType::Triangle,
            ))
        }
    }

    /// Unbind the stream after stopping every track. Returns the number of
    /// tracks that were live.
    pub fn detach(&mut self) -> usize {
        self.playing = false;
        let Some(mut stream) = self.stream.take() else {
            return 0;
        };
        let mut stopped = 0;
        for track in stream.tracks() {
            if stream.stop_track(&track.id) {
                stopped += 1;
                log::debug!(
                    "[Media] Stopped {} track {} ({})",
                    match track.kind {
                        TrackKind::Video => "video",
                        TrackKind::Audio => "audio",
                    },
                    track.id,
                    track.label
                );
            }
        }
        stopped
    }
}
