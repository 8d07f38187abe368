//! `revsyn-sim` — classical simulation of reversible circuits.
//!
//! Every gate of a reversible circuit is a permutation of bit assignments,
//! so a circuit can be evaluated one gate at a time on a plain `bool`
//! vector:
//!
//! - [`simulate`] runs a circuit on one assignment of all its lines
//! - [`Assignment`] and [`read_register`] address lines by register name
//! - [`truth_table`] enumerates every assignment of the free input lines
//!
//! # Quick start
//!
//! ```rust
//! use revsyn_ir::{CircuitBuilder, LineRole};
//! use revsyn_sim::{Assignment, read_register, simulate};
//!
//! let mut builder = CircuitBuilder::new("copy");
//! let a = builder.add_register("a", LineRole::Input, 3).unwrap();
//! let c = builder.add_register("c", LineRole::Output, 3).unwrap();
//! for (src, dst) in a.iter().zip(&c) {
//!     builder.cnot(*src, *dst).unwrap();
//! }
//! let circuit = builder.finish();
//!
//! let mut input = Assignment::new(&circuit);
//! input.set("a", 6).unwrap();
//! let output = simulate(&circuit, input.bits()).unwrap();
//! assert_eq!(read_register(&circuit, &output, "c").unwrap(), 6);
//! ```

pub mod error;
pub mod register;
pub mod simulator;
pub mod truth_table;

pub use error::{SimError, SimResult};
pub use register::{Assignment, read_register};
pub use simulator::{apply_gate, bits_from_value, simulate, value_from_bits};
pub use truth_table::{MAX_FREE_INPUTS, Row, TruthTable, truth_table};
