//! Two-amplitude coherence state.
//!
//! A minimal superposition model: two complex amplitudes `(a0, a1)` kept
//! normalized so `|a0|² + |a1|² = 1`. The scalar "coherence" is the magnitude
//! of the off-diagonal density-matrix element, `2·|a0·conj(a1)|`, which lies
//! in [0, 1]. Drive rotates the amplitudes; decoherence shrinks the
//! off-diagonal term by `exp(-dt/T2)` while preserving phases and which
//! population dominates.

use num_complex::Complex;
use num_traits::{One, Zero};

/// Normalized two-amplitude state vector.
#[derive(Debug, Clone, PartialEq)]
pub struct CoherenceState {
    a0: Complex<f64>,
    a1: Complex<f64>,
}

impl CoherenceState {
    /// Ground state: `a0 = 1`, `a1 = 0`. Coherence is exactly zero.
    pub fn ground() -> Self {
        Self {
            a0: Complex::one(),
            a1: Complex::zero(),
        }
    }

    /// Equal superposition `(1/√2, 1/√2)`. Coherence is exactly one.
    pub fn superposed() -> Self {
        let amp = Complex::new(1.0 / 2.0_f64.sqrt(), 0.0);
        Self { a0: amp, a1: amp }
    }

    /// Construct from raw amplitudes, normalizing. A zero vector falls back
    /// to the ground state.
    pub fn from_amplitudes(a0: Complex<f64>, a1: Complex<f64>) -> Self {
        let mut state = Self { a0, a1 };
        if !state.normalize() {
            state = Self::ground();
        }
        state
    }

    /// The amplitude pair `(a0, a1)`.
    pub fn amplitudes(&self) -> (Complex<f64>, Complex<f64>) {
        (self.a0, self.a1)
    }

    /// Off-diagonal coherence `2·|a0·conj(a1)|`, in [0, 1].
    pub fn coherence(&self) -> f64 {
        2.0 * (self.a0 * self.a1.conj()).norm()
    }

    /// Population of the excited component, `|a1|²`.
    pub fn excited_population(&self) -> f64 {
        self.a1.norm_sqr()
    }

    /// Apply an X-axis rotation by angle `theta` (radians):
    ///
    /// ```text
    /// a0' =  cos(θ/2)·a0 − i·sin(θ/2)·a1
    /// a1' = −i·sin(θ/2)·a0 + cos(θ/2)·a1
    /// ```
    ///
    /// The rotation is unitary; normalization is re-applied to absorb
    /// floating-point drift.
    pub fn rotate(&mut self, theta: f64) {
        let half = theta / 2.0;
        let c = Complex::new(half.cos(), 0.0);
        let neg_i_s = Complex::new(0.0, -half.sin());
        let a0 = c * self.a0 + neg_i_s * self.a1;
        let a1 = neg_i_s * self.a0 + c * self.a1;
        self.a0 = a0;
        self.a1 = a1;
        self.normalize();
    }

    /// Decay the off-diagonal term by `exp(-dt/t2)` and renormalize.
    ///
    /// The pure-state proxy: the off-diagonal magnitude `m = |a0|·|a1|` is
    /// scaled by the decay factor, populations are re-solved from
    /// `p0 + p1 = 1`, `p0·p1 = m'²` keeping the dominant component dominant,
    /// and the amplitude phases are preserved. Coherence after the call is
    /// exactly `factor × coherence` before it.
    pub fn decay(&mut self, dt: f64, t2: f64) {
        let factor = (-dt / t2).exp();
        let m = (self.a0 * self.a1.conj()).norm();
        if m <= 0.0 {
            return;
        }
        let m_new = m * factor;

        // p0, p1 are roots of x² − x + m'² = 0; 4m'² ≤ 4m² ≤ 1.
        let disc = (1.0 - 4.0 * m_new * m_new).max(0.0).sqrt();
        let p0_old = self.a0.norm_sqr();
        let p0 = if p0_old >= 0.5 {
            (1.0 + disc) / 2.0
        } else {
            (1.0 - disc) / 2.0
        };
        let p1 = 1.0 - p0;

        let phase0 = unit_phase(self.a0);
        let phase1 = unit_phase(self.a1);
        self.a0 = phase0 * p0.max(0.0).sqrt();
        self.a1 = phase1 * p1.max(0.0).sqrt();
        self.normalize();
    }

    /// Renormalize to unit length. Returns false if the state has zero norm
    /// (left unchanged in that case).
    fn normalize(&mut self) -> bool {
        let norm = (self.a0.norm_sqr() + self.a1.norm_sqr()).sqrt();
        if norm <= 0.0 {
            return false;
        }
        self.a0 /= norm;
        self.a1 /= norm;
        true
    }
}

impl Default for CoherenceState {
    fn default() -> Self {
        Self::ground()
    }
}

/// Unit-modulus phase factor of `z`, or 1 for a zero amplitude.
fn unit_phase(z: Complex<f64>) -> Complex<f64> {
    let n = z.norm();
    if n <= 0.0 {
        Complex::one()
    } else {
        z / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn norm_sqr_sum(s: &CoherenceState) -> f64 {
        let (a0, a1) = s.amplitudes();
        a0.norm_sqr() + a1.norm_sqr()
    }

    #[test]
    fn ground_state_has_zero_coherence() {
        let s = CoherenceState::ground();
        assert!(s.coherence().abs() < TOL);
        assert!((norm_sqr_sum(&s) - 1.0).abs() < TOL);
    }

    #[test]
    fn superposed_state_has_unit_coherence() {
        let s = CoherenceState::superposed();
        assert!((s.coherence() - 1.0).abs() < TOL);
    }

    #[test]
    fn rotation_preserves_normalization() {
        let mut s = CoherenceState::ground();
        for theta in [0.1, 0.5, 1.3, 2.9, -0.7] {
            s.rotate(theta);
            assert!(
                (norm_sqr_sum(&s) - 1.0).abs() < TOL,
                "norm drifted after rotate({})",
                theta
            );
        }
    }

    #[test]
    fn rotation_from_ground_builds_coherence() {
        let mut s = CoherenceState::ground();
        s.rotate(std::f64::consts::FRAC_PI_2);
        // Rx(π/2) on |0⟩ gives an equal superposition.
        assert!((s.coherence() - 1.0).abs() < TOL);
    }

    #[test]
    fn coherence_stays_in_bounds_under_arbitrary_rotation() {
        let mut s = CoherenceState::ground();
        for k in 0..200 {
            s.rotate(0.37 * k as f64);
            let c = s.coherence();
            assert!((-TOL..=1.0 + TOL).contains(&c), "coherence {} out of [0,1]", c);
        }
    }

    #[test]
    fn decay_scales_coherence_exactly() {
        let mut s = CoherenceState::superposed();
        let dt = 0.1;
        let t2 = 100.0;
        let before = s.coherence();
        s.decay(dt, t2);
        let expected = before * (-dt / t2).exp();
        assert!(
            (s.coherence() - expected).abs() < TOL,
            "coherence {} vs expected {}",
            s.coherence(),
            expected
        );
    }

    #[test]
    fn decay_never_increases_coherence() {
        let mut s = CoherenceState::superposed();
        let mut prev = s.coherence();
        for _ in 0..50 {
            s.decay(1.0, 20.0);
            let c = s.coherence();
            assert!(c <= prev + TOL, "coherence rose from {} to {}", prev, c);
            prev = c;
        }
    }

    #[test]
    fn decay_on_ground_state_is_identity() {
        let mut s = CoherenceState::ground();
        s.decay(1.0, 10.0);
        assert_eq!(s, CoherenceState::ground());
    }

    #[test]
    fn decay_preserves_dominant_population() {
        // Mostly-ground state: p0 > p1 must survive the decay.
        let mut s = CoherenceState::from_amplitudes(
            Complex::new(0.9, 0.0),
            Complex::new(0.435889894354, 0.0),
        );
        assert!(s.excited_population() < 0.5);
        s.decay(5.0, 10.0);
        assert!(s.excited_population() < 0.5);
    }

    #[test]
    fn from_zero_amplitudes_falls_back_to_ground() {
        let s = CoherenceState::from_amplitudes(Complex::zero(), Complex::zero());
        assert_eq!(s, CoherenceState::ground());
    }
}
