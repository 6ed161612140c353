//! One-shot creation of the audio graph behind the play button.

/// Where the play button stands with respect to its audio graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudioGate {
    /// No click yet; the graph is built on the first one.
    #[default]
    Pending,
    Attached,
    /// Creation failed once. The failure is terminal and never retried.
    Failed,
}

impl AudioGate {
    /// Run `attach` on the first call only.
    ///
    /// Returns true when playback controls may be used. A failing `attach`
    /// is logged once and latches `Failed`.
    pub fn ensure<E: std::fmt::Display>(
        &mut self,
        attach: impl FnOnce() -> Result<(), E>,
    ) -> bool {
        match self {
            AudioGate::Attached => true,
            AudioGate::Failed => false,
            AudioGate::Pending => match attach() {
                Ok(()) => {
                    *self = AudioGate::Attached;
                    true
                }
                Err(e) => {
                    log::error!("[audio] setup failed: {}", e);
                    *self = AudioGate::Failed;
                    false
                }
            },
        }
    }
}
