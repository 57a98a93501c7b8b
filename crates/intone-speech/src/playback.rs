use crate::types::Waveform;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

#[derive(Debug, thiserror::Error)]
pub enum AudioSinkError {
    #[error("Failed to initialize audio output stream")]
    InitFailed,
}

/// Audio sink that turns a finished waveform into a playable clip.
pub struct AudioSink {
    _stream: OutputStream,
    sink: Sink,
}

impl AudioSink {
    /// Try to create a new audio sink
    /// Fails if no audio device is available
    pub fn try_new() -> Result<Self, AudioSinkError> {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(_) => return Err(AudioSinkError::InitFailed),
        };

        let sink = Sink::connect_new(stream.mixer());

        Ok(AudioSink {
            _stream: stream,
            sink,
        })
    }

    /// Queue a waveform for playback as one clip.
    pub fn play(&self, waveform: &Waveform) {
        let source = rodio::buffer::SamplesBuffer::new(
            waveform.channels as u16,
            waveform.sample_rate,
            waveform.samples.clone(),
        );
        self.sink.append(source);
    }

    /// Wait until all queued audio has finished playing
    pub fn wait_until_end(&self) {
        self.sink.sleep_until_end();
    }

    /// Check if audio is currently playing
    pub fn is_playing(&self) -> bool {
        !self.sink.empty()
    }
}
