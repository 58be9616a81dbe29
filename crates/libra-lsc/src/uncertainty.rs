//! Descriptive statistics and uncertainty propagation for activities.

use libra_core::{Activity, ActivityUnit, Measurement};

/// Arithmetic mean; zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bessel-corrected sample standard deviation (divides by `n - 1`).
///
/// Fewer than two values have no spread and yield zero.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let centre = mean(values);
    let sum_sq = values
        .iter()
        .map(|value| (value - centre).powi(2))
        .sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Combines independent standard deviations: `sqrt(sum(u_i^2))`, in `unit`.
pub fn quadrature_sum(uncertainties: &[Activity], unit: ActivityUnit) -> Activity {
    let sum_sq = uncertainties
        .iter()
        .map(|u| u.magnitude_in(unit).powi(2))
        .sum::<f64>();
    Activity::new(sum_sq.sqrt(), unit)
}

/// Adds independent measurements: values sum linearly, uncertainties in
/// quadrature. The result is expressed in `unit`.
pub fn sum_measurements<'a, I>(measurements: I, unit: ActivityUnit) -> Measurement
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let mut value = Activity::zero(unit);
    let mut sum_sq = 0.0;
    for measurement in measurements {
        value += measurement.value;
        sum_sq += measurement.uncertainty.magnitude_in(unit).powi(2);
    }
    Measurement::new(value, Activity::new(sum_sq.sqrt(), unit))
}
