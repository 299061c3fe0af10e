//! Levelization: compiles a gate list into the deterministic evaluation
//! order specified by §4.3.
//!
//! Grounded on the teacher's `parser/scheduler.rs` — the dependency-graph
//! construction and the Tarjan SCC extraction (`TarjanContext`,
//! `strong_connect`) are carried over nearly verbatim. What is dropped is
//! everything downstream of SCC detection: the teacher's scheduler
//! tolerates intentional combinational loops via `greedy_fas_sort` plus
//! static unrolling or a dynamic-convergence runtime loop (Strategy A/B).
//! This crate has no such provision — every non-trivial SCC, and every
//! self-loop, is rejected outright (see DESIGN.md).

use std::collections::BTreeSet;

use super::{GateRecord, NetlistDesc};
use crate::error::SimError;
use crate::HashMap;

/// The compiled result of [`compute_schedule`].
pub struct Schedule {
    /// Dense signal name -> index table, covering inputs, outputs and wires.
    pub signal_index: HashMap<String, usize>,
    /// Indices into `NetlistDesc::gates` of the combinational gates, in the
    /// deterministic evaluation order (§4.3 steps 1-3).
    pub comb_order: Vec<usize>,
    /// Indices into `NetlistDesc::gates` of the DFFs, in declaration order.
    pub dff_order: Vec<usize>,
}

pub fn compute_schedule(netlist: &NetlistDesc) -> Result<Schedule, SimError> {
    let mut signal_index: HashMap<String, usize> = HashMap::default();
    for name in netlist.inputs.iter().chain(&netlist.outputs).chain(&netlist.wires) {
        let next = signal_index.len();
        signal_index.entry(name.clone()).or_insert(next);
    }

    let driver = check_single_driver(&netlist.gates, &signal_index)?;

    let (comb, dff): (Vec<usize>, Vec<usize>) = (0..netlist.gates.len())
        .partition(|&i| netlist.gates[i].kind.is_combinational());

    let adj = build_dependency_graph(&netlist.gates, &comb, &driver);

    for scc in tarjan_scc(&adj) {
        let is_loop = scc.len() > 1 || adj[scc[0]].contains(&scc[0]);
        if is_loop {
            let signal = netlist.gates[comb[scc[0]]].output().to_string();
            return Err(SimError::CombinationalCycle { signal });
        }
    }

    let comb_order = kahn_order(&adj).into_iter().map(|pos| comb[pos]).collect();

    Ok(Schedule {
        signal_index,
        comb_order,
        dff_order: dff,
    })
}

/// Groups gates by output signal; a signal driven by more than one gate is
/// a `DuplicateDriver` error. Returns the driver index (into `gates`) for
/// every signal that has one.
fn check_single_driver<'a>(
    gates: &'a [GateRecord],
    signal_index: &HashMap<String, usize>,
) -> Result<HashMap<&'a str, usize>, SimError> {
    let mut driver: HashMap<&str, usize> = HashMap::default();
    for (i, gate) in gates.iter().enumerate() {
        let out = gate.output();
        if !signal_index.contains_key(out) {
            return Err(SimError::UnknownSignal(out.to_string()));
        }
        if let Some(&first) = driver.get(out) {
            return Err(SimError::DuplicateDriver {
                signal: out.to_string(),
                first_gate: gates[first].name.clone(),
                second_gate: gate.name.clone(),
            });
        }
        driver.insert(out, i);
    }
    Ok(driver)
}

/// Edge `u -> v` iff combinational gate `u`'s output feeds combinational
/// gate `v`'s input. DFF outputs are roots and DFF inputs are sinks (§9),
/// so neither appears as a node here.
fn build_dependency_graph(gates: &[GateRecord], comb: &[usize], driver: &HashMap<&str, usize>) -> Vec<Vec<usize>> {
    let comb_pos: HashMap<usize, usize> = comb.iter().enumerate().map(|(pos, &gi)| (gi, pos)).collect();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); comb.len()];
    for (pos, &gi) in comb.iter().enumerate() {
        for input_name in gates[gi].inputs() {
            if let Some(&driver_gi) = driver.get(input_name.as_str()) {
                if let Some(&driver_pos) = comb_pos.get(&driver_gi) {
                    adj[driver_pos].push(pos);
                }
            }
        }
    }
    adj
}

struct TarjanContext {
    index: usize,
    stack: Vec<usize>,
    on_stack: Vec<bool>,
    indices: Vec<Option<usize>>,
    lowlink: Vec<Option<usize>>,
    sccs: Vec<Vec<usize>>,
}

fn tarjan_scc(adj: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adj.len();
    let mut ctx = TarjanContext {
        index: 0,
        stack: Vec::new(),
        on_stack: vec![false; n],
        indices: vec![None; n],
        lowlink: vec![None; n],
        sccs: Vec::new(),
    };
    for i in 0..n {
        if ctx.indices[i].is_none() {
            strong_connect(i, adj, &mut ctx);
        }
    }
    ctx.sccs
}

fn strong_connect(u: usize, adj: &[Vec<usize>], ctx: &mut TarjanContext) {
    ctx.indices[u] = Some(ctx.index);
    ctx.lowlink[u] = Some(ctx.index);
    ctx.index += 1;
    ctx.stack.push(u);
    ctx.on_stack[u] = true;

    for &v in &adj[u] {
        if ctx.indices[v].is_none() {
            strong_connect(v, adj, ctx);
            ctx.lowlink[u] = Some(ctx.lowlink[u].unwrap().min(ctx.lowlink[v].unwrap()));
        } else if ctx.on_stack[v] {
            ctx.lowlink[u] = Some(ctx.lowlink[u].unwrap().min(ctx.indices[v].unwrap()));
        }
    }

    if ctx.lowlink[u] == ctx.indices[u] {
        let mut scc = Vec::new();
        while let Some(w) = ctx.stack.pop() {
            ctx.on_stack[w] = false;
            scc.push(w);
            if w == u {
                break;
            }
        }
        ctx.sccs.push(scc);
    }
}

/// Kahn's algorithm with a stable tie-break on insertion index (Testable
/// Property 9): the ready set is always drained in ascending original
/// index order, so the result is a deterministic function of gate
/// declaration order alone.
fn kahn_order(adj: &[Vec<usize>]) -> Vec<usize> {
    let n = adj.len();
    let mut in_degree = vec![0usize; n];
    for edges in adj {
        for &v in edges {
            in_degree[v] += 1;
        }
    }
    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(&u) = ready.iter().next() {
        ready.remove(&u);
        order.push(u);
        for &v in &adj[u] {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                ready.insert(v);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;

    fn gate(kind: GateKind, name: &str, ports: &[&str]) -> GateRecord {
        GateRecord {
            kind,
            name: name.to_string(),
            ports: ports.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn deterministic_order_independent_of_traversal() {
        // c = a AND b; d = c OR a -- d must be scheduled after c.
        let netlist = NetlistDesc {
            inputs: vec!["a".into(), "b".into()],
            outputs: vec!["d".into()],
            wires: vec!["c".into()],
            gates: vec![
                gate(GateKind::Or, "g_d", &["d", "c", "a"]),
                gate(GateKind::And, "g_c", &["c", "a", "b"]),
            ],
        };
        let schedule = compute_schedule(&netlist).unwrap();
        let pos_c = schedule.comb_order.iter().position(|&i| netlist.gates[i].name == "g_c").unwrap();
        let pos_d = schedule.comb_order.iter().position(|&i| netlist.gates[i].name == "g_d").unwrap();
        assert!(pos_c < pos_d);
    }

    #[test]
    fn self_loop_rejected() {
        let netlist = NetlistDesc {
            inputs: vec![],
            outputs: vec!["a".into()],
            wires: vec![],
            gates: vec![gate(GateKind::Not, "g", &["a", "a"])],
        };
        let err = compute_schedule(&netlist).unwrap_err();
        assert!(matches!(err, SimError::CombinationalCycle { .. }));
    }

    #[test]
    fn two_gate_cycle_rejected() {
        let netlist = NetlistDesc {
            inputs: vec![],
            outputs: vec!["a".into(), "b".into()],
            wires: vec![],
            gates: vec![
                gate(GateKind::Not, "g1", &["a", "b"]),
                gate(GateKind::Not, "g2", &["b", "a"]),
            ],
        };
        let err = compute_schedule(&netlist).unwrap_err();
        assert!(matches!(err, SimError::CombinationalCycle { .. }));
    }

    #[test]
    fn duplicate_driver_rejected() {
        let netlist = NetlistDesc {
            inputs: vec!["a".into(), "b".into()],
            outputs: vec!["c".into()],
            wires: vec![],
            gates: vec![
                gate(GateKind::And, "g1", &["c", "a", "b"]),
                gate(GateKind::Or, "g2", &["c", "a", "b"]),
            ],
        };
        let err = compute_schedule(&netlist).unwrap_err();
        assert!(matches!(err, SimError::DuplicateDriver { .. }));
    }

    #[test]
    fn dff_breaks_feedback_loop() {
        // q <- DFF(q): not a combinational cycle, since DFF inputs are
        // sinks and DFF outputs are roots of the combinational graph.
        let netlist = NetlistDesc {
            inputs: vec![],
            outputs: vec!["q".into()],
            wires: vec![],
            gates: vec![gate(GateKind::Dff, "ff", &["q", "q", "clk"])],
        };
        let schedule = compute_schedule(&netlist).unwrap();
        assert_eq!(schedule.dff_order, vec![0]);
        assert!(schedule.comb_order.is_empty());
    }
}
