/// A change in whether the machine wants a tone played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEdge {
    Started,
    Stopped,
}

/// Turns the level-triggered `Machine::sound_active` into start/stop edges
/// for an audio device.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundWatcher {
    active: bool,
}

impl SoundWatcher {
    pub fn new() -> SoundWatcher {
        SoundWatcher::default()
    }

    pub fn observe(&mut self, active: bool) -> Option<SoundEdge> {
        let edge = match (self.active, active) {
            (false, true) => Some(SoundEdge::Started),
            (true, false) => Some(SoundEdge::Stopped),
            _ => None,
        };
        self.active = active;
        edge
    }
}
