/// Outcome summary of one finished battle, from the player's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BattleReport {
    pub player_won: bool,
    pub turns: u32,
    /// Total damage the player's party took.
    pub damage_taken: u32,
    /// Party members knocked out.
    pub knockouts: u32,
    pub weakness_hits: u32,
    pub critical_hits: u32,
    pub technical_hits: u32,
}

/// Battles longer than this many turns start costing performance.
pub const PAR_TURNS: u32 = 10;

/// Player performance in [0, 100].
///
/// Starts at 50, rewards weakness hits (+5), criticals (+3) and technical
/// hits (+4); penalizes knockouts (-15), every 100 damage taken (-1) and
/// every turn past [`PAR_TURNS`] (-2).
pub fn performance_score(report: &BattleReport) -> f32 {
    let reward = report.weakness_hits as f32 * 5.0
        + report.critical_hits as f32 * 3.0
        + report.technical_hits as f32 * 4.0;
    let penalty = report.knockouts as f32 * 15.0
        + report.damage_taken as f32 / 100.0
        + report.turns.saturating_sub(PAR_TURNS) as f32 * 2.0;

    (50.0 + reward - penalty).clamp(0.0, 100.0)
}
