use super::message_input_state::MessageInputState;

/// Cosmetic camera/microphone switches. Nothing is wired to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaToggles {
    pub video: bool,
    pub audio: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    message_input: MessageInputState,
    media: MediaToggles,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            message_input: MessageInputState::default(),
            media: MediaToggles::default(),
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn message_input(&self) -> &MessageInputState {
        &self.message_input
    }

    pub fn message_input_mut(&mut self) -> &mut MessageInputState {
        &mut self.message_input
    }

    pub fn media(&self) -> MediaToggles {
        self.media
    }

    pub fn toggle_video(&mut self) {
        self.media.video = !self.media.video;
    }

    pub fn toggle_audio(&mut self) {
        self.media.audio = !self.media.audio;
    }
}
