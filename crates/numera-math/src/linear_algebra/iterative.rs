//! Iterative solvers for `Ax = b`: Jacobi, Gauss-Seidel and SOR.
//!
//! All three split `A = D - L - U` (diagonal, strictly lower, strictly
//! upper) and iterate `x_{k+1} = T x_k + c`. The error of each step is the
//! configured norm of `x_{k+1} - x_k`. Before iterating, the spectral radius
//! of `T` is computed and reported; `ρ(T) < 1` guarantees convergence to the
//! unique solution.
//!
//! A run is reported as diverged when an iterate stops being finite or the
//! error grows for [`DIVERGENCE_WINDOW`] consecutive iterations.

use std::fmt;
use std::str::FromStr;

use nalgebra::linalg::Schur;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::convergence::{should_stop_vector, ToleranceSpec};
use crate::error::{MathError, MathResult};
use crate::history::IterationRecorder;
use crate::linear_algebra::{is_diagonally_dominant, validate_system, PIVOT_EPSILON};
use crate::status::Status;

/// Consecutive error increases after which a run is declared divergent.
pub const DIVERGENCE_WINDOW: usize = 8;

/// Iteration cap for the Schur decomposition behind the spectral radius.
const SCHUR_MAX_ITERATIONS: usize = 10_000;

/// Iterative linear-system method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IterativeMethod {
    /// Every component is updated from the previous iterate.
    Jacobi,
    /// Components are updated in place, in order.
    GaussSeidel,
    /// Gauss-Seidel with a relaxation factor.
    Sor,
}

impl IterativeMethod {
    /// All methods, in presentation order.
    pub const ALL: [Self; 3] = [Self::Jacobi, Self::GaussSeidel, Self::Sor];

    /// Returns the method name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jacobi => "Jacobi",
            Self::GaussSeidel => "Gauss-Seidel",
            Self::Sor => "SOR",
        }
    }
}

impl fmt::Display for IterativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IterativeMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "jacobi" => Ok(Self::Jacobi),
            "gaussseidel" | "seidel" => Ok(Self::GaussSeidel),
            "sor" => Ok(Self::Sor),
            _ => Err(MathError::invalid_input(format!(
                "unknown iterative method '{s}'"
            ))),
        }
    }
}

/// One recorded iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterativeStep {
    /// 1-based iteration index.
    pub index: usize,
    /// Iterate produced by this iteration.
    pub iterate: DVector<f64>,
    /// Norm of the change from the previous iterate.
    pub error: f64,
}

/// Outcome of an iterative solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterativeLinearResult {
    /// Method that produced the result.
    pub method: IterativeMethod,
    /// Terminal status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Iteration history, in order.
    pub steps: Vec<IterativeStep>,
    /// Last finite iterate.
    pub final_iterate: Option<DVector<f64>>,
    /// Spectral radius of the iteration matrix, when it could be computed.
    pub spectral_radius: Option<f64>,
}

impl IterativeLinearResult {
    /// Number of recorded iterations.
    pub fn iterations(&self) -> usize {
        self.steps.len()
    }

    /// True if the iteration converged.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Jacobi iteration: `x_i = (b_i - sum_{j != i} a_ij x_j) / a_ii` using
/// only the previous iterate.
pub fn jacobi(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    spec: &ToleranceSpec,
) -> IterativeLinearResult {
    solve_iterative(IterativeMethod::Jacobi, a, b, x0, None, spec)
}

/// Gauss-Seidel iteration: like Jacobi, but each component is used as soon
/// as it is updated.
pub fn gauss_seidel(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    spec: &ToleranceSpec,
) -> IterativeLinearResult {
    solve_iterative(IterativeMethod::GaussSeidel, a, b, x0, None, spec)
}

/// Successive over-relaxation with factor `w` in `(0, 2)`.
///
/// `w = 1` is Gauss-Seidel.
pub fn sor(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    w: f64,
    spec: &ToleranceSpec,
) -> IterativeLinearResult {
    solve_iterative(IterativeMethod::Sor, a, b, x0, Some(w), spec)
}

/// Runs the given method. `relaxation` is only read by SOR, where it is
/// required.
pub fn solve_iterative(
    method: IterativeMethod,
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    relaxation: Option<f64>,
    spec: &ToleranceSpec,
) -> IterativeLinearResult {
    let mut run = IterativeRun::new(method, spec);

    let w = match method {
        IterativeMethod::Jacobi | IterativeMethod::GaussSeidel => 1.0,
        IterativeMethod::Sor => match relaxation {
            Some(w) => w,
            None => {
                return run.fail(MathError::invalid_input(
                    "SOR requires a relaxation factor",
                ))
            }
        },
    };
    if let Err(e) = validate(a, b, x0, method, w) {
        return run.fail(e);
    }

    run.spectral_radius = iteration_matrix(method, a, w).and_then(|t| spectral_radius(&t));
    run.diagonally_dominant = is_diagonally_dominant(a);
    log::debug!(
        "{} on a {}x{} system, spectral radius {:?}",
        method,
        a.nrows(),
        a.ncols(),
        run.spectral_radius
    );

    let mut x = x0.clone();
    let mut previous_error = f64::INFINITY;
    let mut increases = 0;

    for iteration in 1..=spec.max_iterations() {
        let next = match method {
            IterativeMethod::Jacobi => jacobi_sweep(a, b, &x),
            IterativeMethod::GaussSeidel | IterativeMethod::Sor => relaxed_sweep(a, b, &x, w),
        };
        if next.iter().any(|v| !v.is_finite()) {
            return run.fail(MathError::diverged(iteration, "the iterate is not finite"));
        }

        let decision = should_stop_vector(&x, &next, iteration, spec);
        run.record(IterativeStep {
            index: iteration,
            iterate: next.clone(),
            error: decision.error,
        });

        if decision.converged() {
            return run.converged(next);
        }

        if decision.error > previous_error {
            increases += 1;
            if increases >= DIVERGENCE_WINDOW {
                return run.fail(MathError::diverged(
                    iteration,
                    format!("the error grew for {DIVERGENCE_WINDOW} consecutive iterations"),
                ));
            }
        } else {
            increases = 0;
        }
        previous_error = decision.error;
        x = next;
    }

    run.exhausted()
}

fn validate(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    method: IterativeMethod,
    w: f64,
) -> MathResult<()> {
    validate_system(a, b)?;
    if x0.len() != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: a.nrows(),
            cols1: a.ncols(),
            rows2: x0.len(),
            cols2: 1,
        });
    }
    if x0.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("the initial guess contains non-finite values"));
    }
    if method == IterativeMethod::Sor && !(w > 0.0 && w < 2.0) {
        return Err(MathError::invalid_input(format!(
            "the relaxation factor must lie in (0, 2), got {w}"
        )));
    }
    if let Some(row) = (0..a.nrows()).find(|&i| a[(i, i)].abs() < PIVOT_EPSILON) {
        return Err(MathError::ZeroDiagonal { row });
    }
    Ok(())
}

fn jacobi_sweep(a: &DMatrix<f64>, b: &DVector<f64>, x: &DVector<f64>) -> DVector<f64> {
    let n = x.len();
    DVector::from_fn(n, |i, _| {
        let sigma: f64 = (0..n).filter(|&j| j != i).map(|j| a[(i, j)] * x[j]).sum();
        (b[i] - sigma) / a[(i, i)]
    })
}

fn relaxed_sweep(a: &DMatrix<f64>, b: &DVector<f64>, x: &DVector<f64>, w: f64) -> DVector<f64> {
    let n = x.len();
    let mut next = x.clone();
    for i in 0..n {
        let sigma: f64 = (0..n).filter(|&j| j != i).map(|j| a[(i, j)] * next[j]).sum();
        let gauss_seidel = (b[i] - sigma) / a[(i, i)];
        next[i] = (1.0 - w) * next[i] + w * gauss_seidel;
    }
    next
}

/// Iteration matrix `T`, or `None` if the splitting matrix is singular.
///
/// - Jacobi: `T = D⁻¹ (L + U)`
/// - SOR: `T = (D - wL)⁻¹ ((1 - w) D + wU)`, Gauss-Seidel being `w = 1`
pub fn iteration_matrix(method: IterativeMethod, a: &DMatrix<f64>, w: f64) -> Option<DMatrix<f64>> {
    let diagonal = DMatrix::from_diagonal(&a.diagonal());
    let lower = -a.lower_triangle() + &diagonal;
    let upper = -a.upper_triangle() + &diagonal;

    let (m, n_part) = match method {
        IterativeMethod::Jacobi => (diagonal.clone(), &lower + &upper),
        IterativeMethod::GaussSeidel | IterativeMethod::Sor => {
            let w = if method == IterativeMethod::GaussSeidel { 1.0 } else { w };
            (&diagonal - &lower * w, &diagonal * (1.0 - w) + &upper * w)
        }
    };
    m.try_inverse().map(|inverse| inverse * n_part)
}

/// Largest eigenvalue modulus of `t`.
pub fn spectral_radius(t: &DMatrix<f64>) -> Option<f64> {
    let schur = Schur::try_new(t.clone(), f64::EPSILON, SCHUR_MAX_ITERATIONS)?;
    let radius = schur
        .complex_eigenvalues()
        .iter()
        .map(|lambda| lambda.norm())
        .fold(0.0_f64, f64::max);
    radius.is_finite().then_some(radius)
}

fn format_vector(v: &DVector<f64>) -> String {
    let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

struct IterativeRun {
    method: IterativeMethod,
    tolerance: f64,
    recorder: IterationRecorder<IterativeStep>,
    spectral_radius: Option<f64>,
    diagonally_dominant: bool,
}

impl IterativeRun {
    fn new(method: IterativeMethod, spec: &ToleranceSpec) -> Self {
        Self {
            method,
            tolerance: spec.tolerance(),
            recorder: IterationRecorder::new(spec.max_iterations()),
            spectral_radius: None,
            diagonally_dominant: true,
        }
    }

    fn record(&mut self, step: IterativeStep) {
        log::trace!("{} step {}: error = {}", self.method, step.index, step.error);
        self.recorder.push(step);
    }

    fn failure_hint(&self) -> String {
        let mut hint = String::new();
        if let Some(rho) = self.spectral_radius.filter(|rho| *rho >= 1.0) {
            hint.push_str(&format!(
                " It is possible that the method failed because the spectral radius of T \
                 is {rho} and is greater than or equal to 1."
            ));
        }
        if !self.diagonally_dominant {
            hint.push_str(" The matrix is not diagonally dominant.");
        }
        hint
    }

    fn converged(self, x: DVector<f64>) -> IterativeLinearResult {
        let mut message = format!(
            "The approximate solution is: {}, with a tolerance = {}",
            format_vector(&x),
            self.tolerance
        );
        if let Some(rho) = self.spectral_radius.filter(|rho| *rho < 1.0) {
            message.push_str(&format!(
                " This solution is unique because the spectral radius of T is {rho} \
                 and is less than 1."
            ));
        }
        self.finish(Status::Converged, message, Some(x))
    }

    fn exhausted(self) -> IterativeLinearResult {
        let message = format!(
            "Failed in {} iterations.{}",
            self.recorder.len(),
            self.failure_hint()
        );
        let last = self.recorder.last().map(|s| s.iterate.clone());
        self.finish(Status::MaxIterationsReached, message, last)
    }

    fn fail(self, error: MathError) -> IterativeLinearResult {
        log::warn!("{} failed: {}", self.method, error);
        let message = format!("{error}.{}", self.failure_hint());
        let last = self.recorder.last().map(|s| s.iterate.clone());
        self.finish(error.status(), message, last)
    }

    fn finish(
        self,
        status: Status,
        message: String,
        final_iterate: Option<DVector<f64>>,
    ) -> IterativeLinearResult {
        log::debug!(
            "{} finished after {} iterations: {}",
            self.method,
            self.recorder.len(),
            status
        );
        IterativeLinearResult {
            method: self.method,
            status,
            message,
            steps: self.recorder.into_steps(),
            final_iterate,
            spectral_radius: self.spectral_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::Norm;
    use crate::linear_algebra::pivot_gaussian_elimination;
    use approx::assert_relative_eq;

    fn dominant() -> (DMatrix<f64>, DVector<f64>) {
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[4.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 4.0],
        );
        let b = DVector::from_vec(vec![2.0, 4.0, 10.0]);
        (a, b)
    }

    fn spec() -> ToleranceSpec {
        ToleranceSpec::new(1e-10, 200).unwrap()
    }

    #[test]
    fn test_jacobi_and_gauss_seidel_agree() {
        let (a, b) = dominant();
        let x0 = DVector::zeros(3);
        let exact = pivot_gaussian_elimination(&a, &b).solution.unwrap();

        let j = jacobi(&a, &b, &x0, &spec());
        let gs = gauss_seidel(&a, &b, &x0, &spec());
        assert_eq!(j.status, Status::Converged);
        assert_eq!(gs.status, Status::Converged);

        let (xj, xgs) = (j.final_iterate.clone().unwrap(), gs.final_iterate.clone().unwrap());
        for i in 0..3 {
            assert_relative_eq!(xj[i], exact[i], epsilon = 1e-8);
            assert_relative_eq!(xgs[i], exact[i], epsilon = 1e-8);
        }
        assert!(gs.iterations() <= j.iterations());
        assert!(j.message.contains("This solution is unique"));
    }

    #[test]
    fn test_spectral_radius() {
        let (a, _) = dominant();
        // Jacobi on this tridiagonal matrix: ρ = cos(π/4) / 2
        let t = iteration_matrix(IterativeMethod::Jacobi, &a, 1.0).unwrap();
        let rho = spectral_radius(&t).unwrap();
        assert_relative_eq!(rho, std::f64::consts::FRAC_1_SQRT_2 / 2.0, epsilon = 1e-10);
        // Gauss-Seidel: ρ = ρ_J²
        let t = iteration_matrix(IterativeMethod::GaussSeidel, &a, 1.0).unwrap();
        let rho_gs = spectral_radius(&t).unwrap();
        assert_relative_eq!(rho_gs, rho * rho, epsilon = 1e-10);
    }

    #[test]
    fn test_sor_with_unit_factor_is_gauss_seidel() {
        let (a, b) = dominant();
        let x0 = DVector::zeros(3);
        let gs = gauss_seidel(&a, &b, &x0, &spec());
        let relaxed = sor(&a, &b, &x0, 1.0, &spec());
        assert_eq!(gs.steps, relaxed.steps);
        assert_eq!(relaxed.method, IterativeMethod::Sor);
    }

    #[test]
    fn test_sor_converges() {
        let (a, b) = dominant();
        let result = sor(&a, &b, &DVector::zeros(3), 1.1, &spec());
        assert_eq!(result.status, Status::Converged);
    }

    #[test]
    fn test_relaxation_out_of_range() {
        let (a, b) = dominant();
        for w in [0.0, 2.0, -1.0, f64::NAN] {
            let result = sor(&a, &b, &DVector::zeros(3), w, &spec());
            assert_eq!(result.status, Status::InvalidInput);
        }
        let result =
            solve_iterative(IterativeMethod::Sor, &a, &b, &DVector::zeros(3), None, &spec());
        assert_eq!(result.status, Status::InvalidInput);
    }

    #[test]
    fn test_zero_diagonal() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        let result = jacobi(&a, &b, &DVector::zeros(2), &spec());
        assert_eq!(result.status, Status::DomainError);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_divergence_detected() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        let result = jacobi(&a, &b, &DVector::zeros(2), &spec());

        assert_eq!(result.status, Status::Diverged);
        assert_eq!(result.iterations(), DIVERGENCE_WINDOW + 1);
        assert!(result.spectral_radius.unwrap() > 1.0);
        assert!(result.message.contains("not diagonally dominant"));
    }

    #[test]
    fn test_max_iterations() {
        let (a, b) = dominant();
        let spec = ToleranceSpec::new(1e-14, 2).unwrap().with_norm(Norm::L2);
        let result = jacobi(&a, &b, &DVector::zeros(3), &spec);
        assert_eq!(result.status, Status::MaxIterationsReached);
        assert_eq!(result.iterations(), 2);
        assert!(result.message.starts_with("Failed in 2 iterations."));
        assert_eq!(result.final_iterate, Some(result.steps[1].iterate.clone()));
    }

    #[test]
    fn test_first_error_is_norm_of_first_iterate() {
        let (a, b) = dominant();
        let result = jacobi(&a, &b, &DVector::zeros(3), &spec());
        // x1 = b / 4 from a zero start
        assert_relative_eq!(result.steps[0].error, 2.5);
    }
}
