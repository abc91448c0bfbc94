use crate::algebra::*;
use crate::fillreduce::FillReducing;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A field holds a value outside its admissible range
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Settings shared by the sparse solvers
///
/// Build with [`SolverSettingsBuilder`], which checks the numeric ranges,
/// or start from `SolverSettings::default()`.

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverSettings<T: FloatT> {
    /// fill-reducing permutation applied before factorization
    #[builder(default = "FillReducing::Amd")]
    pub fill_reducing: FillReducing,

    /// seed for [`FillReducing::Random`]
    #[builder(default = "0x5eed")]
    pub seed: u64,

    /// scaling of the dense row threshold of the AMD ordering
    #[builder(default = "1.0")]
    pub amd_dense_scale: f64,

    /// LU threshold pivoting tolerance in `(0,1]`.  The diagonal is kept as
    /// pivot if its magnitude is at least `pivot_tol` times the largest
    /// candidate.  `1` is classic partial pivoting.
    #[builder(default = "T::one()")]
    pub pivot_tol: T,

    /// sparse QR reports failure when some `|R(k,k)|` is at most
    /// `singular_tol * max|R(i,i)|`
    #[builder(default = "T::epsilon()")]
    pub singular_tol: T,
}

impl<T> Default for SolverSettings<T>
where
    T: FloatT,
{
    fn default() -> SolverSettings<T> {
        SolverSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> SolverSettings<T>
where
    T: FloatT,
{
    /// Checks that numeric fields are within their admissible ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_pivot_tol(self.pivot_tol)?;
        validate_singular_tol(self.singular_tol)?;
        validate_amd_dense_scale(self.amd_dense_scale)?;
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for SolverSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SolverSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> SolverSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(pivot_tol) = self.pivot_tol {
            validate_pivot_tol(pivot_tol)?;
        }
        if let Some(singular_tol) = self.singular_tol {
            validate_singular_tol(singular_tol)?;
        }
        if let Some(scale) = self.amd_dense_scale {
            validate_amd_dense_scale(scale)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_pivot_tol<T: FloatT>(pivot_tol: T) -> Result<(), SettingsError> {
    if pivot_tol > T::zero() && pivot_tol <= T::one() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("pivot_tol"))
    }
}

fn validate_singular_tol<T: FloatT>(singular_tol: T) -> Result<(), SettingsError> {
    // also rejects NaN
    if singular_tol >= T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("singular_tol"))
    }
}

fn validate_amd_dense_scale(scale: f64) -> Result<(), SettingsError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("amd_dense_scale"))
    }
}

#[test]
fn test_settings_defaults() {
    let settings = SolverSettings::<f64>::default();
    assert_eq!(settings.fill_reducing, FillReducing::Amd);
    assert_eq!(settings.seed, 0x5eed);
    assert_eq!(settings.amd_dense_scale, 1.0);
    assert_eq!(settings.pivot_tol, 1.0);
    assert_eq!(settings.singular_tol, f64::EPSILON);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_validate() {
    // all good
    let builder = SolverSettingsBuilder::<f64>::default()
        .pivot_tol(0.1)
        .singular_tol(0.)
        .fill_reducing(FillReducing::Random)
        .build();
    assert!(builder.is_ok());

    // out of range pivot tolerances
    assert!(SolverSettingsBuilder::<f64>::default().pivot_tol(0.).build().is_err());
    assert!(SolverSettingsBuilder::<f64>::default().pivot_tol(1.5).build().is_err());

    // negative singular tolerance
    assert!(SolverSettingsBuilder::<f64>::default().singular_tol(-1e-3).build().is_err());

    // direct construction is checked by validate
    let mut settings = SolverSettings::<f64>::default();
    settings.amd_dense_scale = 0.;
    assert_eq!(settings.validate(), Err(SettingsError::BadFieldValue("amd_dense_scale")));
}
