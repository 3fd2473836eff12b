use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, info};

use crate::models::{CurvePoint, Dataset, FitKind, LinearFit, LogFit, NOT_COMPUTED};
use crate::utils::DemandError;

/// Ordinary least-squares line through (x, y) with its goodness of fit
#[derive(Debug, Clone, Copy)]
struct LeastSquares {
    slope: f64,
    intercept: f64,
    /// Pearson correlation coefficient, clamped to [-1, 1]
    r: f64,
    p_value: f64,
}

/// Fit y = intercept + slope * x by ordinary least squares
///
/// `what` names the x variable in error messages.
fn least_squares(x: &[f64], y: &[f64], what: &str) -> Result<LeastSquares, DemandError> {
    if x.len() != y.len() {
        return Err(DemandError::ShapeMismatch {
            prices: x.len(),
            quantities: y.len(),
        });
    }

    let n = x.len();
    if n < 2 {
        return Err(DemandError::InsufficientData { required: 2, actual: n });
    }

    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(DemandError::InvalidDomain(
            "observations must be finite numbers".to_string(),
        ));
    }

    if x.iter().all(|&v| v == x[0]) {
        return Err(DemandError::DegenerateInput(format!(
            "all {} values are identical ({}), the slope is undefined",
            what, x[0]
        )));
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    // Centered sums of squares and cross products
    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if !(sxx > 0.0 && sxx.is_finite()) {
        return Err(DemandError::DegenerateInput(format!(
            "{} variance is zero or not representable",
            what
        )));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(DemandError::DegenerateInput(
            "least-squares coefficients overflowed".to_string(),
        ));
    }

    // Constant y: no correlation and no evidence against slope = 0
    let r = if syy > 0.0 {
        // Separate roots; sxx * syy overflows for large magnitudes
        (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    let p_value = slope_p_value(n, slope, r, sxx, syy)?;

    debug!(
        "OLS over {} points: slope={:.6}, intercept={:.6}, r={:.6}, p={:.6}",
        n, slope, intercept, r, p_value
    );

    Ok(LeastSquares {
        slope,
        intercept,
        r,
        p_value,
    })
}

/// Two-sided p-value for slope = 0 under Student's t with n - 2 degrees of freedom
fn slope_p_value(n: usize, slope: f64, r: f64, sxx: f64, syy: f64) -> Result<f64, DemandError> {
    let df = n - 2;

    // Two points always lie on their line; the test has no residual degrees of freedom
    if df == 0 {
        return Ok(if syy > 0.0 { 0.0 } else { 1.0 });
    }

    let ss_res = ((1.0 - r * r) * syy).max(0.0);
    let std_err = (ss_res / df as f64 / sxx).sqrt();

    if std_err == 0.0 {
        return Ok(if slope == 0.0 { 1.0 } else { 0.0 });
    }

    let t = slope / std_err;
    let dist = StudentsT::new(0.0, 1.0, df as f64)
        .map_err(|e| DemandError::DegenerateInput(format!("t distribution: {}", e)))?;

    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Linear demand fit Q = intercept + slope * P
pub fn fit_linear(prices: &[f64], quantities: &[f64]) -> Result<LinearFit, DemandError> {
    let line = least_squares(prices, quantities, "price")?;

    Ok(LinearFit {
        slope: line.slope,
        intercept: line.intercept,
        r_squared: line.r * line.r,
        p_value: line.p_value,
    })
}

/// Constant-elasticity demand fit Q = a * P^b, estimated on (ln P, ln Q)
pub fn fit_log(prices: &[f64], quantities: &[f64]) -> Result<LogFit, DemandError> {
    if prices.len() != quantities.len() {
        return Err(DemandError::ShapeMismatch {
            prices: prices.len(),
            quantities: quantities.len(),
        });
    }

    if prices.len() < 2 {
        return Err(DemandError::InsufficientData {
            required: 2,
            actual: prices.len(),
        });
    }

    if let Some(bad) = prices.iter().chain(quantities).find(|&&v| !(v > 0.0)) {
        return Err(DemandError::InvalidDomain(format!(
            "log-log regression requires strictly positive prices and quantities, found {}",
            bad
        )));
    }

    let log_prices: Vec<f64> = prices.iter().map(|p| p.ln()).collect();
    let log_quantities: Vec<f64> = quantities.iter().map(|q| q.ln()).collect();

    let line = least_squares(&log_prices, &log_quantities, "log price")?;

    let a = line.intercept.exp();
    if !a.is_finite() || a == 0.0 {
        return Err(DemandError::DegenerateInput(format!(
            "scale coefficient exp({:.4}) is not representable",
            line.intercept
        )));
    }

    Ok(LogFit {
        a,
        b: line.slope,
        r_squared: line.r * line.r,
        elasticity: line.slope,
    })
}

/// Fit the linear model on the dataset's observations and keep the snapshot
pub fn calculate_linear_regression(dataset: &mut Dataset) -> Result<LinearFit, DemandError> {
    let fit = fit_linear(dataset.prices(), dataset.quantities())?;
    info!(
        "Linear fit over {} points: Q = {:.4} + {:.4}*P (R²={:.4}, p={:.4})",
        dataset.len(),
        fit.intercept,
        fit.slope,
        fit.r_squared,
        fit.p_value
    );
    dataset.store_linear(fit);
    Ok(fit)
}

/// Fit the log-log model on the dataset's observations and keep the snapshot
pub fn calculate_log_regression(dataset: &mut Dataset) -> Result<LogFit, DemandError> {
    let fit = fit_log(dataset.prices(), dataset.quantities())?;
    info!(
        "Log-log fit over {} points: Q = {:.4} * P^{:.4} (R²={:.4})",
        dataset.len(),
        fit.a,
        fit.b,
        fit.r_squared
    );
    dataset.store_log(fit);
    Ok(fit)
}

pub fn predict_linear(fit: &LinearFit, price: f64) -> Result<f64, DemandError> {
    if !price.is_finite() {
        return Err(DemandError::InvalidDomain(format!("price {} is not finite", price)));
    }

    let quantity = fit.intercept + fit.slope * price;
    if !quantity.is_finite() {
        return Err(DemandError::InvalidDomain(format!(
            "prediction at price {} overflows",
            price
        )));
    }

    Ok(quantity)
}

/// Evaluate a * price^b
///
/// Negative prices are only defined for integer exponents; zero with a negative
/// exponent diverges.
pub fn predict_log(fit: &LogFit, price: f64) -> Result<f64, DemandError> {
    if !price.is_finite() {
        return Err(DemandError::InvalidDomain(format!("price {} is not finite", price)));
    }

    if price < 0.0 && fit.b.fract() != 0.0 {
        return Err(DemandError::InvalidDomain(format!(
            "negative price {} raised to non-integer exponent {:.4}",
            price, fit.b
        )));
    }

    let quantity = fit.a * price.powf(fit.b);
    if !quantity.is_finite() {
        return Err(DemandError::InvalidDomain(format!(
            "prediction at price {} is undefined for exponent {:.4}",
            price, fit.b
        )));
    }

    Ok(quantity)
}

/// Predict with the dataset's stored fit of the given kind
pub fn predict(dataset: &Dataset, kind: FitKind, price: f64) -> Result<f64, DemandError> {
    match kind {
        FitKind::Linear => {
            let fit = dataset.linear_fit().ok_or(DemandError::NotFitted(kind))?;
            predict_linear(fit, price)
        }
        FitKind::Log => {
            let fit = dataset.log_fit().ok_or(DemandError::NotFitted(kind))?;
            predict_log(fit, price)
        }
    }
}

pub fn linear_equation(fit: Option<&LinearFit>) -> String {
    match fit {
        Some(fit) => format!("Q = {:.2} + {:.2}*P", fit.intercept, fit.slope),
        None => NOT_COMPUTED.to_string(),
    }
}

pub fn log_equation(fit: Option<&LogFit>) -> String {
    match fit {
        Some(fit) => format!("Q = {:.2} * P^{:.2}", fit.a, fit.b),
        None => NOT_COMPUTED.to_string(),
    }
}

/// Fitted equation of the given kind, or the "not computed" marker
pub fn equation_string(dataset: &Dataset, kind: FitKind) -> String {
    match kind {
        FitKind::Linear => linear_equation(dataset.linear_fit()),
        FitKind::Log => log_equation(dataset.log_fit()),
    }
}

/// `count` evenly spaced prices over [min, max] inclusive
pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Sample the fitted curve of the given kind across the observed price range
pub fn curve_points(
    dataset: &Dataset,
    kind: FitKind,
    count: usize,
) -> Result<Vec<CurvePoint>, DemandError> {
    let (min, max) = dataset.price_range().ok_or(DemandError::InsufficientData {
        required: 2,
        actual: dataset.len(),
    })?;

    linspace(min, max, count)
        .into_iter()
        .map(|price| {
            predict(dataset, kind, price).map(|quantity| CurvePoint { price, quantity })
        })
        .collect()
}
