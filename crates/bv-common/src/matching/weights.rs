/// Factor weights for compatibility scoring. Callers pass a table
/// explicitly; there is no hidden per-call-site copy.
#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    pub sector: f64,
    pub funding: f64,
    pub geography: f64,
    pub risk: f64,
    pub esg: f64,
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.sector + self.funding + self.geography + self.risk + self.esg
    }
}

/// Default weighting: sector fit and ticket-size fit carry the match,
/// the alignment factors refine it.
pub const STANDARD_MATCH_WEIGHTS: MatchWeights = MatchWeights {
    sector: 0.30,
    funding: 0.25,
    geography: 0.15,
    risk: 0.15,
    esg: 0.15,
};
