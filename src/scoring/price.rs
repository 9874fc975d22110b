/// Household income at which a school's average aid award is taken at face value.
pub const REFERENCE_INCOME: f64 = 120_000.0;

/// Rough net price: the sticker price minus the school's average aid,
/// scaled up for lower incomes and down for higher ones. Never negative.
pub fn estimate_net_price(sticker_price: f64, average_aid: f64, family_income: f64) -> f64 {
    let income = if family_income.is_finite() {
        family_income.max(1.0)
    } else {
        REFERENCE_INCOME
    };
    (sticker_price - average_aid * (REFERENCE_INCOME / income)).max(0.0)
}
