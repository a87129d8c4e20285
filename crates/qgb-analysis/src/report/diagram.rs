//! Circuit diagrams.

use qgb_ir::{Circuit, InstructionKind, StandardGate};

use super::svg::{Anchor, SvgDocument};

const COL_W: f64 = 46.0;
const ROW_H: f64 = 44.0;
const MARGIN_X: f64 = 60.0;
const MARGIN_Y: f64 = 50.0;
const BOX: f64 = 30.0;

/// Column index of every instruction, packed left as far as the qubit
/// span of earlier instructions allows. Barriers occupy a column of their
/// own across their span.
pub fn layout_columns(circuit: &Circuit) -> Vec<usize> {
    let mut next_free = vec![0usize; circuit.num_qubits()];
    let mut columns = Vec::with_capacity(circuit.instructions().len());

    for inst in circuit.instructions() {
        if inst.qubits.is_empty() {
            columns.push(next_free.iter().copied().max().unwrap_or(0));
            continue;
        }
        let lo = inst.qubits.iter().map(|q| q.index()).min().unwrap_or(0);
        let hi = inst.qubits.iter().map(|q| q.index()).max().unwrap_or(0);
        let col = next_free[lo..=hi].iter().copied().max().unwrap_or(0);
        for slot in &mut next_free[lo..=hi] {
            *slot = col + 1;
        }
        columns.push(col);
    }
    columns
}

/// Draw `circuit` as a wire diagram.
pub fn circuit_diagram(circuit: &Circuit) -> SvgDocument {
    let columns = layout_columns(circuit);
    let n_cols = columns.iter().map(|c| c + 1).max().unwrap_or(1);
    let width = 2.0 * MARGIN_X + COL_W * n_cols as f64;
    let height = 2.0 * MARGIN_Y + ROW_H * circuit.num_qubits().max(1) as f64;
    let mut doc = SvgDocument::new(width, height);

    let wire_y = |q: usize| MARGIN_Y + ROW_H * (q as f64 + 0.5);
    let col_x = |c: usize| MARGIN_X + COL_W * (c as f64 + 0.5);

    doc.text(width / 2.0, 28.0, 16.0, Anchor::Middle, circuit.name());
    for q in 0..circuit.num_qubits() {
        let y = wire_y(q);
        doc.text(MARGIN_X - 12.0, y + 4.0, 12.0, Anchor::End, &format!("q{q}"));
        doc.line(MARGIN_X, y, width - MARGIN_X / 2.0, y, "#555555");
    }

    for (inst, &col) in circuit.instructions().iter().zip(&columns) {
        if inst.qubits.is_empty() {
            continue;
        }
        let x = col_x(col);
        let ys: Vec<f64> = inst.qubits.iter().map(|q| wire_y(q.index())).collect();
        let (top, bottom) = (
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        );

        match &inst.kind {
            InstructionKind::Barrier => {
                doc.dashed_line(x, top - ROW_H / 2.0, x, bottom + ROW_H / 2.0, "#999999");
            }
            InstructionKind::Reset => gate_box(&mut doc, x, ys[0], "|0⟩"),
            InstructionKind::Measure => {
                gate_box(&mut doc, x, ys[0], "M");
                let clbit = inst.clbits.first().map(|c| c.0).unwrap_or(0);
                doc.text(x, ys[0] + BOX / 2.0 + 12.0, 9.0, Anchor::Middle, &format!("c{clbit}"));
            }
            InstructionKind::Gate(gate) => match gate {
                StandardGate::CX => {
                    doc.line(x, top, x, bottom, "#000000");
                    doc.circle(x, ys[0], 4.0, "#000000");
                    target(&mut doc, x, ys[1]);
                }
                StandardGate::CSwap => {
                    doc.line(x, top, x, bottom, "#000000");
                    doc.circle(x, ys[0], 4.0, "#000000");
                    cross(&mut doc, x, ys[1]);
                    cross(&mut doc, x, ys[2]);
                }
                single => gate_box(&mut doc, x, ys[0], &single_label(single)),
            },
        }
    }
    doc
}

fn single_label(gate: &StandardGate) -> String {
    match gate.angle() {
        Some(theta) => format!("{}({theta:.2})", gate.name().to_uppercase()),
        None => gate.name().to_uppercase(),
    }
}

fn gate_box(doc: &mut SvgDocument, x: f64, y: f64, label: &str) {
    let w = BOX.max(7.0 * label.chars().count() as f64);
    doc.frame(x - w / 2.0, y - BOX / 2.0, w, BOX, "#1e3a8a");
    doc.text(x, y + 4.0, 11.0, Anchor::Middle, label);
}

fn target(doc: &mut SvgDocument, x: f64, y: f64) {
    doc.circle(x, y, 9.0, "#1e3a8a");
    doc.line(x - 6.0, y, x + 6.0, y, "#ffffff");
    doc.line(x, y - 6.0, x, y + 6.0, "#ffffff");
}

fn cross(doc: &mut SvgDocument, x: f64, y: f64) {
    doc.line(x - 6.0, y - 6.0, x + 6.0, y + 6.0, "#000000");
    doc.line(x - 6.0, y + 6.0, x + 6.0, y - 6.0, "#000000");
}
