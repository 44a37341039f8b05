use crate::config::{QubitIdx, Real};

#[derive(Debug, Clone, PartialEq)]
pub enum GateDefn {
    CCX {
        control1: QubitIdx,
        control2: QubitIdx,
        target: QubitIdx,
    },
    CPhase {
        control: QubitIdx,
        target: QubitIdx,
        rot: Real,
    },
    CX {
        control: QubitIdx,
        target: QubitIdx,
    },
    CZ {
        control: QubitIdx,
        target: QubitIdx,
    },
    Hadamard(QubitIdx),
    Identity(QubitIdx),
    Measure(QubitIdx),
    MeasureAll,
    MeasureX(QubitIdx),
    MeasureY(QubitIdx),
    MX90(QubitIdx),
    MY90(QubitIdx),
    PauliY(QubitIdx),
    PauliZ(QubitIdx),
    PrepX(QubitIdx),
    PrepY(QubitIdx),
    PrepZ(QubitIdx),
    RX {
        rot: Real,
        target: QubitIdx,
    },
    RY {
        rot: Real,
        target: QubitIdx,
    },
    RZ {
        rot: Real,
        target: QubitIdx,
    },
    S(QubitIdx),
    Sdg(QubitIdx),
    Swap {
        target1: QubitIdx,
        target2: QubitIdx,
    },
    T(QubitIdx),
    Tdg(QubitIdx),
    X(QubitIdx),
    X90(QubitIdx),
    Y90(QubitIdx),
}

impl GateDefn {
    fn decompose_prep(defn: &GateDefn) -> Vec<GateDefn> {
        match *defn {
            GateDefn::PrepX(qi) => vec![GateDefn::PrepZ(qi), GateDefn::Hadamard(qi)],
            GateDefn::PrepY(qi) => vec![
                GateDefn::PrepZ(qi),
                GateDefn::Hadamard(qi),
                GateDefn::S(qi),
            ],
            _ => vec![],
        }
    }

    fn decompose_measure(defn: &GateDefn) -> Vec<GateDefn> {
        match *defn {
            // rotate the measured axis onto Z first
            GateDefn::MeasureX(qi) => vec![GateDefn::Hadamard(qi), GateDefn::Measure(qi)],
            GateDefn::MeasureY(qi) => vec![
                GateDefn::Sdg(qi),
                GateDefn::Hadamard(qi),
                GateDefn::Measure(qi),
            ],
            _ => vec![],
        }
    }

    /// Expands composite operations into operations the simulator executes directly.
    pub fn decompose_gate(&self) -> Vec<GateDefn> {
        match self {
            GateDefn::PrepX(_) | GateDefn::PrepY(_) => GateDefn::decompose_prep(self),
            GateDefn::MeasureX(_) | GateDefn::MeasureY(_) => GateDefn::decompose_measure(self),
            _ => vec![self.clone()],
        }
    }

    pub fn is_unitary(&self) -> bool {
        !matches!(
            self,
            GateDefn::Measure(_)
                | GateDefn::MeasureAll
                | GateDefn::MeasureX(_)
                | GateDefn::MeasureY(_)
                | GateDefn::PrepX(_)
                | GateDefn::PrepY(_)
                | GateDefn::PrepZ(_)
        )
    }
}
