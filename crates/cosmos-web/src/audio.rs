use cosmos_core::constants::ANALYSER_SMOOTHING;
use cosmos_core::{AudioBackend, AudioError, SetupError, SpectrumSource};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// WebAudio graph: media element -> analyser -> destination.
pub struct WebAudio {
    ctx: web::AudioContext,
    element: web::HtmlAudioElement,
    _source: web::MediaElementAudioSourceNode,
    analyser: web::AnalyserNode,
    closed: bool,
}

fn js_err(e: wasm_bindgen::JsValue) -> String {
    format!("{:?}", e)
}

impl WebAudio {
    /// Build the graph around `element`. Must run inside a user gesture on most browsers.
    pub fn attach(element: web::HtmlAudioElement, fft_size: u32) -> Result<Self, SetupError> {
        let ctx = web::AudioContext::new()
            .map_err(|e| SetupError::AudioUnavailable(js_err(e)))?;
        let analyser = ctx
            .create_analyser()
            .map_err(|e| SetupError::AudioUnavailable(js_err(e)))?;
        analyser.set_fft_size(fft_size);
        analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);

        let source = ctx
            .create_media_element_source(&element)
            .map_err(|e| SetupError::AudioUnavailable(js_err(e)))?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| SetupError::AudioUnavailable(js_err(e)))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| SetupError::AudioUnavailable(js_err(e)))?;

        log::info!(
            "[audio] analyser ready: fft {} -> {} bins",
            fft_size,
            analyser.frequency_bin_count()
        );
        Ok(Self {
            ctx,
            element,
            _source: source,
            analyser,
            closed: false,
        })
    }
}

impl SpectrumSource for WebAudio {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn read_decibels(&mut self, out: &mut [f32]) {
        self.analyser.get_float_frequency_data(out);
    }
}

impl AudioBackend for WebAudio {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.closed {
            return Err(AudioError::NoSource);
        }
        let promise = self
            .element
            .play()
            .map_err(|e| AudioError::PlaybackRejected(js_err(e)))?;
        // Autoplay rejection arrives asynchronously; the element stays paused.
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("[audio] playback rejected: {:?}", e);
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            log::warn!("[audio] pause failed: {:?}", e);
        }
    }

    fn is_playing(&self) -> bool {
        !self.closed && !self.element.paused()
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        let promise = self
            .ctx
            .resume()
            .map_err(|e| AudioError::ResumeFailed(js_err(e)))?;
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("[audio] resume failed: {:?}", e);
            }
        });
        Ok(())
    }

    fn suspend(&mut self) {
        if let Err(e) = self.ctx.suspend() {
            log::warn!("[audio] suspend failed: {:?}", e);
        }
    }

    fn is_suspended(&self) -> bool {
        !self.closed && self.ctx.state() == web::AudioContextState::Suspended
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.element.pause() {
            log::warn!("[audio] pause on close failed: {:?}", e);
        }
        if let Err(e) = self.analyser.disconnect() {
            log::warn!("[audio] disconnect failed: {:?}", e);
        }
        if let Err(e) = self.ctx.close() {
            log::warn!("[audio] close failed: {:?}", e);
        }
        log::info!("[audio] context closed");
    }
}
