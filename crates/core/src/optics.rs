use std::f64::consts::PI;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum OpticsError {
    #[error("{field} must be positive and finite, got {provided}")]
    NonPositive { field: &'static str, provided: f64 },
    #[error("MTF curve needs at least two samples, got {provided}")]
    TooFewSamples { provided: usize },
}

fn positive(field: &'static str, value: f64) -> Result<f64, OpticsError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(OpticsError::NonPositive {
            field,
            provided: value,
        })
    }
}

//
// ─── DEPTH OF FIELD ────────────────────────────────────────────────────────────
//

/// Circle of confusion commonly used for full-frame sensors, in millimetres.
pub const FULL_FRAME_COC_MM: f64 = 0.03;

/// Depth of field for a thin lens focused at a given distance.
///
/// All distances are in metres. `far_limit_m` and `total_m` are `None` when the
/// subject sits at or beyond the hyperfocal distance, i.e. focus extends to
/// infinity.
///
/// # Examples
///
/// ```
/// # use lesson_core::optics::{DepthOfField, FULL_FRAME_COC_MM};
/// let dof = DepthOfField::compute(50.0, 8.0, 3.0, FULL_FRAME_COC_MM)?;
/// assert!(dof.near_limit_m < 3.0);
/// assert!(dof.far_limit_m.unwrap() > 3.0);
/// # Ok::<(), lesson_core::optics::OpticsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOfField {
    pub hyperfocal_m: f64,
    pub near_limit_m: f64,
    pub far_limit_m: Option<f64>,
    pub total_m: Option<f64>,
}

impl DepthOfField {
    /// # Errors
    ///
    /// Returns `OpticsError::NonPositive` if any input is zero, negative, or
    /// not finite.
    pub fn compute(
        focal_length_mm: f64,
        f_number: f64,
        subject_distance_m: f64,
        coc_mm: f64,
    ) -> Result<Self, OpticsError> {
        let f = positive("focal length", focal_length_mm)?;
        let n = positive("f-number", f_number)?;
        let s = positive("subject distance", subject_distance_m)? * 1000.0;
        let c = positive("circle of confusion", coc_mm)?;

        let h = f * f / (n * c) + f;
        let near = s * (h - f) / (h + s - 2.0 * f);
        let far = (s < h).then(|| s * (h - f) / (h - s));

        Ok(Self {
            hyperfocal_m: h / 1000.0,
            near_limit_m: near / 1000.0,
            far_limit_m: far.map(|mm| mm / 1000.0),
            total_m: far.map(|mm| (mm - near) / 1000.0),
        })
    }
}

//
// ─── EXPOSURE ──────────────────────────────────────────────────────────────────
//

/// Exposure value normalised to ISO 100.
///
/// `EV = log2(N² / t) − log2(ISO / 100)`. f/1 at 1 s and ISO 100 is EV 0.
///
/// # Errors
///
/// Returns `OpticsError::NonPositive` for non-positive or non-finite inputs.
pub fn exposure_value(f_number: f64, shutter_s: f64, iso: f64) -> Result<f64, OpticsError> {
    let n = positive("f-number", f_number)?;
    let t = positive("shutter time", shutter_s)?;
    let iso = positive("ISO", iso)?;
    Ok((n * n / t).log2() - (iso / 100.0).log2())
}

//
// ─── MTF ───────────────────────────────────────────────────────────────────────
//

/// Wavelength of green light, used as the default for MTF estimates.
pub const GREEN_LIGHT_NM: f64 = 550.0;

/// Frequency (line pairs per mm) beyond which a perfect lens passes no
/// contrast at the given aperture.
///
/// # Errors
///
/// Returns `OpticsError::NonPositive` for non-positive or non-finite inputs.
pub fn diffraction_cutoff(f_number: f64, wavelength_nm: f64) -> Result<f64, OpticsError> {
    let n = positive("f-number", f_number)?;
    let lambda_mm = positive("wavelength", wavelength_nm)? * 1e-6;
    Ok(1.0 / (lambda_mm * n))
}

/// Diffraction-limited MTF of a circular aperture at `lp_per_mm`.
///
/// Returns a contrast in `[0, 1]`; zero frequency is 1.0 and anything at or
/// above the cutoff is 0.0.
///
/// # Errors
///
/// Returns `OpticsError::NonPositive` for invalid aperture or wavelength, or a
/// negative/non-finite frequency.
pub fn diffraction_mtf(
    lp_per_mm: f64,
    f_number: f64,
    wavelength_nm: f64,
) -> Result<f64, OpticsError> {
    let cutoff = diffraction_cutoff(f_number, wavelength_nm)?;
    if !lp_per_mm.is_finite() || lp_per_mm < 0.0 {
        return Err(OpticsError::NonPositive {
            field: "spatial frequency",
            provided: lp_per_mm,
        });
    }

    let ratio = lp_per_mm / cutoff;
    if ratio >= 1.0 {
        return Ok(0.0);
    }
    let phi = ratio.acos();
    Ok((2.0 / PI) * (phi - phi.cos() * phi.sin()))
}

/// Evenly spaced `(lp_per_mm, contrast)` samples from 0 to `max_lp_per_mm`.
///
/// # Errors
///
/// Returns `OpticsError` for invalid inputs or fewer than two samples.
#[allow(clippy::cast_precision_loss)]
pub fn mtf_curve(
    f_number: f64,
    wavelength_nm: f64,
    max_lp_per_mm: f64,
    samples: usize,
) -> Result<Vec<(f64, f64)>, OpticsError> {
    if samples < 2 {
        return Err(OpticsError::TooFewSamples { provided: samples });
    }
    let max = positive("max frequency", max_lp_per_mm)?;
    let step = max / (samples - 1) as f64;

    (0..samples)
        .map(|i| {
            let freq = step * i as f64;
            diffraction_mtf(freq, f_number, wavelength_nm).map(|mtf| (freq, mtf))
        })
        .collect()
}
