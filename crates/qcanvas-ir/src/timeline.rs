//! Per-qubit gate index.
//!
//! Built once per circuit snapshot so that repeated "gates on qubit q before
//! position p" queries are a binary search over a pre-sorted lane instead of
//! a filter-and-sort over the whole gate list.

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::qubit::QubitId;

/// One gate on one qubit's lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    /// Time slot of the gate.
    pub position: u32,
    /// Index into [`Circuit::gates`].
    pub gate: usize,
}

impl TimelineEntry {
    /// The indexed gate, or `None` if `circuit` is not the circuit this
    /// entry was built from.
    pub fn resolve<'c>(&self, circuit: &'c Circuit) -> Option<&'c Gate> {
        circuit.gates().get(self.gate)
    }
}

/// Gate indices for every qubit, each lane stably sorted by position.
#[derive(Debug, Clone, Default)]
pub struct QubitTimeline {
    lanes: Vec<Vec<TimelineEntry>>,
}

impl QubitTimeline {
    /// Index the gates of `circuit`.
    ///
    /// Operands outside the circuit width are skipped; the gate still appears
    /// on the lanes of its in-range operands.
    pub fn build(circuit: &Circuit) -> Self {
        let mut lanes = vec![Vec::new(); circuit.num_qubits() as usize];

        for (index, gate) in circuit.gates().iter().enumerate() {
            for qubit in &gate.qubits {
                let Some(lane) = lanes.get_mut(qubit.index()) else {
                    continue;
                };
                // A malformed gate may list the same wire twice.
                if lane.last().is_some_and(|e: &TimelineEntry| e.gate == index) {
                    continue;
                }
                lane.push(TimelineEntry {
                    position: gate.position,
                    gate: index,
                });
            }
        }

        for lane in &mut lanes {
            lane.sort_by_key(|e| e.position);
        }

        Self { lanes }
    }

    /// Number of indexed qubits.
    pub fn num_qubits(&self) -> usize {
        self.lanes.len()
    }

    /// Every gate on `qubit`, in time order. Empty for unknown qubits.
    pub fn lane(&self, qubit: QubitId) -> &[TimelineEntry] {
        self.lanes.get(qubit.index()).map_or(&[], Vec::as_slice)
    }

    /// Gates on `qubit` with a position strictly below `position`.
    pub fn prefix_before(&self, qubit: QubitId, position: u32) -> &[TimelineEntry] {
        let lane = self.lane(qubit);
        let end = lane.partition_point(|e| e.position < position);
        &lane[..end]
    }

    /// Resolve a lane back to gates.
    ///
    /// Entries that do not exist in `circuit` are skipped.
    pub fn resolve<'c>(
        entries: &'c [TimelineEntry],
        circuit: &'c Circuit,
    ) -> impl Iterator<Item = &'c Gate> + 'c {
        entries.iter().filter_map(move |e| e.resolve(circuit))
    }
}
