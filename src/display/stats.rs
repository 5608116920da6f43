/// Display statistics
#[derive(Debug, Clone, Default)]
pub struct DisplayStats {
    pub frames_shown: u64,
    pub clears: u64,
}

impl DisplayStats {
    pub fn record_frame(&mut self) {
        self.frames_shown += 1;
    }

    pub fn record_clear(&mut self) {
        self.clears += 1;
    }
}
