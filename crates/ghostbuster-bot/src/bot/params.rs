/// Tunables shared by the heuristic bots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Peak posterior at which Normal and Hard commit to a burst.
    pub confidence: f64,
    /// Inquiries spent before a burst is allowed at all.
    pub min_inquiries: u32,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            confidence: 0.9,
            min_inquiries: 1,
        }
    }
}

impl BotParams {
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}
