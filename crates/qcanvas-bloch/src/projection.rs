//! Per-qubit state projection.
//!
//! A qubit's state is the fold of its time-ordered gate history over the
//! |0⟩ vector. A multi-qubit gate only moves its target (the last operand),
//! and only when every control (the leading operands) is *active*: the
//! control's own projection, restricted to gates strictly before the
//! controlled gate, has `z < CONTROL_ACTIVATION_THRESHOLD`.
//!
//! This is a classical approximation. There is no joint state, so a control
//! in superposition is either fully on or fully off, never entangled.
//!
//! Control evaluation always moves to strictly earlier positions, so it
//! terminates. Pending evaluations live on a heap-allocated work stack, and
//! each `(qubit, prefix)` pair is folded once per [`Projector`], resuming
//! from the longest prefix of the same lane already folded.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use qcanvas_ir::{Circuit, CircuitSnapshot, Gate, QubitId, QubitTimeline};

use crate::state::BlochState;
use crate::transform;
use crate::vector::BlochVector;

/// A control is active when its projected z-component is below this value.
pub const CONTROL_ACTIVATION_THRESHOLD: f64 = 0.1;

/// Projects qubits of one circuit, sharing recursive results between calls.
pub struct Projector<'a> {
    circuit: &'a Circuit,
    timeline: &'a QubitTimeline,
    /// Folded lane prefixes per qubit, keyed by prefix length.
    memo: FxHashMap<QubitId, BTreeMap<usize, BlochVector>>,
}

impl<'a> Projector<'a> {
    /// `timeline` must have been built from `circuit`.
    pub fn new(circuit: &'a Circuit, timeline: &'a QubitTimeline) -> Self {
        Self {
            circuit,
            timeline,
            memo: FxHashMap::default(),
        }
    }

    /// Project against a store snapshot and its prebuilt timeline.
    pub fn for_snapshot(snapshot: &'a CircuitSnapshot) -> Self {
        Self::new(snapshot.circuit(), snapshot.timeline())
    }

    /// State of `qubit` after its whole gate history.
    ///
    /// Qubits without gates, including indices outside the circuit, are |0⟩.
    pub fn project(&mut self, qubit: QubitId) -> BlochState {
        let timeline = self.timeline;
        let lane = timeline.lane(qubit);
        let state = BlochState::from_vector(self.fold(qubit, lane.len()));
        debug!(
            qubit = %qubit,
            gates = lane.len(),
            theta = state.theta,
            phi = state.phi,
            "projected qubit"
        );
        state
    }

    /// State of `qubit` after the gates with position strictly below
    /// `position`.
    pub fn project_before(&mut self, qubit: QubitId, position: u32) -> BlochState {
        let timeline = self.timeline;
        let prefix = timeline.prefix_before(qubit, position);
        BlochState::from_vector(self.fold(qubit, prefix.len()))
    }

    /// Project every qubit in `0..num_qubits`.
    pub fn project_all(&mut self) -> Vec<BlochState> {
        (0..self.circuit.num_qubits())
            .map(|q| self.project(QubitId(q)))
            .collect()
    }

    /// Cartesian vector of `qubit` after the first `len` gates of its lane.
    pub fn vector(&mut self, qubit: QubitId, len: usize) -> BlochVector {
        self.fold(qubit, len)
    }

    /// Fold the first `len` gates of `qubit`'s lane.
    ///
    /// Control prefixes are resolved on an explicit work stack rather than by
    /// recursion, so control chains of any length stay off the call stack. A
    /// frame that meets an unresolved control memoizes the prefix it has
    /// folded so far and resumes from it once the control is known.
    fn fold(&mut self, qubit: QubitId, len: usize) -> BlochVector {
        let circuit = self.circuit;
        let timeline = self.timeline;
        let len = len.min(timeline.lane(qubit).len());

        let mut pending = vec![(qubit, len)];
        let mut in_progress = FxHashSet::default();
        in_progress.insert((qubit, len));

        while let Some(&(q, len)) = pending.last() {
            let lane = timeline.lane(q);
            let (mut done, mut v) = self.resume_point(q, len);

            let mut blocked = None;
            for entry in &lane[done..len] {
                if let Some(gate) = entry.resolve(circuit) {
                    match self.gate_effect(gate, q) {
                        Effect::Apply => v = transform::apply(&gate.kind, v),
                        Effect::Skip => {}
                        // Only reachable with a timeline built from another circuit.
                        Effect::Blocked(request) if in_progress.contains(&request) => {
                            warn!(gate = %gate.id, qubit = %q, "cyclic control dependency, control treated as inactive");
                        }
                        Effect::Blocked(request) => {
                            blocked = Some(request);
                            break;
                        }
                    }
                }
                done += 1;
            }

            self.memoize(q, done, v);
            match blocked {
                Some(request) => {
                    in_progress.insert(request);
                    pending.push(request);
                }
                None => {
                    in_progress.remove(&(q, len));
                    pending.pop();
                }
            }
        }

        self.memoized(qubit, len).unwrap_or(BlochVector::ZERO)
    }

    /// Longest memoized prefix of `qubit`'s lane no longer than `len`.
    fn resume_point(&self, qubit: QubitId, len: usize) -> (usize, BlochVector) {
        self.memo
            .get(&qubit)
            .and_then(|prefixes| prefixes.range(..=len).next_back())
            .map_or((0, BlochVector::ZERO), |(&done, &v)| (done, v))
    }

    fn memoized(&self, qubit: QubitId, len: usize) -> Option<BlochVector> {
        if len == 0 {
            return Some(BlochVector::ZERO);
        }
        self.memo.get(&qubit)?.get(&len).copied()
    }

    fn memoize(&mut self, qubit: QubitId, len: usize, v: BlochVector) {
        if len > 0 {
            self.memo.entry(qubit).or_default().insert(len, v);
        }
    }

    /// What `gate` does to `qubit`, given the controls resolved so far.
    ///
    /// Controls are checked in order and the first inactive one decides, so
    /// a control after an inactive one is never evaluated.
    fn gate_effect(&self, gate: &Gate, qubit: QubitId) -> Effect {
        if gate.target() != Some(qubit) || transform::is_no_op(&gate.kind) {
            return Effect::Skip;
        }
        if gate.qubits.len() == 1 {
            return Effect::Apply;
        }
        for &control in gate.controls() {
            let prefix = self.timeline.prefix_before(control, gate.position).len();
            let Some(v) = self.memoized(control, prefix) else {
                return Effect::Blocked((control, prefix));
            };
            if v.z >= CONTROL_ACTIVATION_THRESHOLD {
                trace!(gate = %gate.id, qubit = %qubit, control = %control, "control inactive");
                return Effect::Skip;
            }
        }
        Effect::Apply
    }
}

/// Outcome of one gate on one lane.
enum Effect {
    Apply,
    Skip,
    /// Needs the folded prefix `(control, len)` first.
    Blocked((QubitId, usize)),
}

/// Project one qubit of `circuit`.
///
/// Builds a throwaway timeline; use a [`Projector`] to share work across
/// qubits.
pub fn project_qubit_state(circuit: &Circuit, qubit: QubitId) -> BlochState {
    let timeline = QubitTimeline::build(circuit);
    Projector::new(circuit, &timeline).project(qubit)
}

/// Project every qubit of `circuit`.
pub fn project_all(circuit: &Circuit) -> Vec<BlochState> {
    let timeline = QubitTimeline::build(circuit);
    Projector::new(circuit, &timeline).project_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcanvas_ir::GateKind;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-9;

    fn q(n: u32) -> QubitId {
        QubitId(n)
    }

    #[test]
    fn test_control_on_one_fires() {
        let mut c = Circuit::new(2);
        c.x(q(0), 0).unwrap();
        c.cx(q(0), q(1), 1).unwrap();
        assert!((project_qubit_state(&c, q(1)).theta - PI).abs() < TOL);
    }

    #[test]
    fn test_control_on_zero_is_inactive() {
        let mut c = Circuit::new(2);
        c.cx(q(0), q(1), 0).unwrap();
        assert_eq!(project_qubit_state(&c, q(1)).theta, 0.0);
    }

    #[test]
    fn test_control_is_left_unchanged() {
        let mut c = Circuit::new(2);
        c.x(q(0), 0).unwrap();
        c.cx(q(0), q(1), 1).unwrap();
        let control = project_qubit_state(&c, q(0));
        assert!((control.theta - PI).abs() < TOL);
    }

    #[test]
    fn test_control_only_sees_earlier_gates() {
        // X on the control at the same slot as the CX does not count.
        let mut c = Circuit::new(2);
        c.x(q(0), 1).unwrap();
        c.cx(q(0), q(1), 1).unwrap();
        assert_eq!(project_qubit_state(&c, q(1)).theta, 0.0);
    }

    #[test]
    fn test_controlled_kind_without_controls_applies() {
        let c = Circuit::from_gates(1, vec![Gate::new(GateKind::CX, [q(0)], 0)]);
        assert!((project_qubit_state(&c, q(0)).theta - PI).abs() < TOL);
    }

    #[test]
    fn test_project_before() {
        let mut c = Circuit::new(1);
        c.x(q(0), 0).unwrap();
        c.x(q(0), 5).unwrap();
        let timeline = QubitTimeline::build(&c);
        let mut p = Projector::new(&c, &timeline);
        assert_eq!(p.project_before(q(0), 0).theta, 0.0);
        assert!((p.project_before(q(0), 5).theta - PI).abs() < TOL);
        assert!(p.project(q(0)).theta.abs() < TOL);
    }

    fn memo_entries(p: &Projector<'_>) -> usize {
        p.memo.values().map(BTreeMap::len).sum()
    }

    #[test]
    fn test_memo_is_shared_across_qubits() {
        let c = Circuit::ghz(4).unwrap();
        let timeline = QubitTimeline::build(&c);
        let mut p = Projector::new(&c, &timeline);
        let states = p.project_all();
        assert_eq!(states.len(), 4);
        assert!(memo_entries(&p) >= 4);
        // A second pass is served entirely from the memo.
        let before = memo_entries(&p);
        assert_eq!(p.project_all(), states);
        assert_eq!(memo_entries(&p), before);
    }

    #[test]
    fn test_fold_resumes_from_shorter_prefix() {
        let mut c = Circuit::new(1);
        c.h(q(0), 0).unwrap();
        c.x(q(0), 1).unwrap();
        c.z(q(0), 7).unwrap();
        let timeline = QubitTimeline::build(&c);
        let mut p = Projector::new(&c, &timeline);

        let partial = p.project_before(q(0), 5).vector();
        let (done, v) = p.resume_point(q(0), 3);
        assert_eq!(done, 2);
        assert!(v.approx_eq(partial, TOL));
        // Resuming gives the same answer as folding from scratch.
        assert_eq!(p.project(q(0)), project_qubit_state(&c, q(0)));
    }

    #[test]
    fn test_long_control_chain_uses_no_recursion() {
        // Run on a small stack: a recursive fold would overflow it.
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let c = Circuit::ghz(20_000).unwrap();
                project_qubit_state(&c, q(19_999))
            })
            .unwrap();
        let state = handle.join().unwrap();
        assert!((state.theta - PI).abs() < TOL);
    }

    #[test]
    fn test_alternating_controls() {
        // X(q0), then CX(q0, q1), CX(q1, q0) repeated; the pair of
        // classical bits cycles with period three.
        let mut c = Circuit::new(2);
        c.x(q(0), 0).unwrap();
        for k in 0..6 {
            c.cx(q(0), q(1), 2 * k + 1).unwrap();
            c.cx(q(1), q(0), 2 * k + 2).unwrap();
        }
        let states = project_all(&c);
        // After six rounds the bits are (1, 0).
        assert!((states[0].theta - PI).abs() < TOL);
        assert!(states[1].theta.abs() < TOL);
    }

    #[test]
    fn test_mismatched_timeline_does_not_panic() {
        let ghz = Circuit::ghz(3).unwrap();
        let timeline = QubitTimeline::build(&ghz);

        let empty = Circuit::new(3);
        let mut p = Projector::new(&empty, &timeline);
        assert!(p.project_all().iter().all(|s| s.theta == 0.0));

        // Same gate count, operands reversed.
        let reversed = Circuit::from_gates(
            3,
            vec![
                Gate::new(GateKind::H, [q(2)], 0),
                Gate::new(GateKind::CX, [q(2), q(1)], 1),
                Gate::new(GateKind::CX, [q(1), q(0)], 2),
            ],
        );
        let mut p = Projector::new(&reversed, &timeline);
        assert_eq!(p.project_all().len(), 3);
    }
}
