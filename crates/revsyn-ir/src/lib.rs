//! Revsyn Reversible Circuit Intermediate Representation
//!
//! This crate provides the data structures that reversible logic synthesis
//! produces and that simulation, cost evaluation and export consume.
//!
//! # Overview
//!
//! A [`Circuit`] is a fixed set of bit lines plus an ordered list of
//! reversible gates. Circuits are assembled with the append-only
//! [`CircuitBuilder`] and frozen with [`CircuitBuilder::finish`]; afterwards
//! only read accessors are available.
//!
//! # Core Components
//!
//! - **Lines**: [`LineId`] addresses a line; [`Line`] carries its role, input
//!   and output names, constant input value and garbage flag
//! - **Registers**: [`Register`] groups the lines of one declared variable
//! - **Gates**: [`Gate`] of kind [`GateKind`] with a control set and ordered targets
//! - **Costs**: [`cost`] folds computing quantum and transistor cost
//! - **Export**: [`export`] writers for RevLib `.real` and OpenQASM 2
//!
//! # Example: A Controlled Copy
//!
//! ```rust
//! use revsyn_ir::{CircuitBuilder, LineRole};
//!
//! let mut builder = CircuitBuilder::new("copy");
//! let a = builder.add_register("a", LineRole::Input, 2).unwrap();
//! let c = builder.add_register("c", LineRole::Output, 2).unwrap();
//!
//! for (src, dst) in a.iter().zip(&c) {
//!     builder.cnot(*src, *dst).unwrap();
//! }
//!
//! let circuit = builder.finish();
//! assert_eq!(circuit.num_lines(), 4);
//! assert_eq!(circuit.quantum_cost(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Targets | Description |
//! |------|---------|-------------|
//! | `Toffoli` | 1 | Flip the target when all controls hold 1 (NOT, CNOT, CCX, ...) |
//! | `Fredkin` | 2 | Swap the targets when all controls hold 1 |
//! | `Peres` | 2 | `t2 ^= t1`, then flip `t1`, when all controls hold 1 |
//! | `InversePeres` | 2 | Flip `t1`, then `t2 ^= t1`, when all controls hold 1 |

pub mod circuit;
pub mod cost;
pub mod error;
pub mod export;
pub mod gate;
pub mod line;

pub use circuit::{Circuit, CircuitBuilder};
pub use error::{IrError, IrResult};
pub use export::{RealOptions, to_qasm, to_real, write_qasm, write_real};
pub use gate::{Gate, GateKind};
pub use line::{Line, LineId, LineRole, Register};
