//! Monthly waste estimators attached to leak candidates.

/// Round to whole cents.
fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Steady-state waste: the resource bills this much every day of a month.
pub fn flat_monthly_waste(avg_daily_cost: f64) -> f64 {
    cents(avg_daily_cost * 30.0)
}

/// Waste accrued so far, capped at a month's worth of days.
pub fn lifespan_adjusted_waste(avg_daily_cost: f64, days_active: u32) -> f64 {
    cents(avg_daily_cost * f64::from(days_active.min(30)))
}

/// Projected month-over-baseline excess if the observed growth continues
/// linearly. Never negative; zero when the window is empty.
pub fn runaway_projected_waste(first_cost: f64, last_cost: f64, days: u32) -> f64 {
    if days == 0 {
        return 0.0;
    }
    let daily_growth = (last_cost - first_cost) / f64::from(days);
    let projected = last_cost + daily_growth * 30.0;
    let baseline = first_cost * 30.0;
    cents((projected - baseline).max(0.0))
}
