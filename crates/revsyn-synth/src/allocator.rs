//! Scratch-line allocation.
//!
//! Scratch lines are handed out lowest-first and must be given back in
//! strict LIFO order. A line is given back either by [`Allocator::release`],
//! which makes it reusable, or by [`Allocator::retain`], which keeps it as a
//! permanent garbage line.

use std::collections::BTreeSet;

use revsyn_ir::{CircuitBuilder, LineId};

use crate::error::{SynthesisError, SynthesisResult};

/// Pool of reusable ancilla lines.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    free: BTreeSet<LineId>,
    outstanding: Vec<LineId>,
    created: usize,
}

impl Allocator {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lowest free scratch line, adding a new ancilla if none is free.
    pub fn acquire(&mut self, builder: &mut CircuitBuilder) -> SynthesisResult<LineId> {
        let line = match self.free.pop_first() {
            Some(line) => line,
            None => {
                self.created += 1;
                builder.add_ancilla()?
            }
        };
        self.outstanding.push(line);
        Ok(line)
    }

    /// Take `width` scratch lines.
    pub fn acquire_many(
        &mut self,
        builder: &mut CircuitBuilder,
        width: usize,
    ) -> SynthesisResult<Vec<LineId>> {
        (0..width).map(|_| self.acquire(builder)).collect()
    }

    fn pop(&mut self, line: LineId, action: &str) -> SynthesisResult<()> {
        match self.outstanding.last() {
            Some(&top) if top == line => {
                self.outstanding.pop();
                Ok(())
            }
            Some(&top) => Err(SynthesisError::AllocatorInvariant(format!(
                "cannot {action} {line}: most recent acquisition is {top}"
            ))),
            None => Err(SynthesisError::AllocatorInvariant(format!(
                "cannot {action} {line}: no scratch line is outstanding"
            ))),
        }
    }

    /// Return the most recently acquired line to the free set.
    pub fn release(&mut self, line: LineId) -> SynthesisResult<()> {
        self.pop(line, "release")?;
        self.free.insert(line);
        Ok(())
    }

    /// Give up the most recently acquired line for good.
    pub fn retain(&mut self, line: LineId) -> SynthesisResult<()> {
        self.pop(line, "retain")
    }

    /// Number of outstanding acquisitions.
    pub fn depth(&self) -> usize {
        self.outstanding.len()
    }

    /// Release every acquisition made after the allocator was at `depth`.
    pub fn release_to(&mut self, depth: usize) -> SynthesisResult<()> {
        while self.outstanding.len() > depth {
            if let Some(&line) = self.outstanding.last() {
                self.release(line)?;
            }
        }
        Ok(())
    }

    /// Retain every acquisition made after the allocator was at `depth`.
    pub fn retain_to(&mut self, depth: usize) -> SynthesisResult<()> {
        while self.outstanding.len() > depth {
            if let Some(&line) = self.outstanding.last() {
                self.retain(line)?;
            }
        }
        Ok(())
    }

    /// Number of ancilla lines this allocator has added to the circuit.
    pub fn num_created(&self) -> usize {
        self.created
    }

    /// Check that every acquisition has been given back.
    pub fn finish(&self) -> SynthesisResult<()> {
        if self.outstanding.is_empty() {
            Ok(())
        } else {
            let lines: Vec<String> = self.outstanding.iter().map(ToString::to_string).collect();
            Err(SynthesisError::AllocatorInvariant(format!(
                "scratch lines still outstanding: {}",
                lines.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revsyn_ir::LineRole;

    fn builder() -> CircuitBuilder {
        let mut builder = CircuitBuilder::new("alloc");
        builder.add_register("x", LineRole::InOut, 2).unwrap();
        builder
    }

    #[test]
    fn test_acquire_extends_then_reuses() {
        let mut b = builder();
        let mut alloc = Allocator::new();
        let a = alloc.acquire(&mut b).unwrap();
        let c = alloc.acquire(&mut b).unwrap();
        assert_eq!((a, c), (LineId(2), LineId(3)));
        assert_eq!(b.num_lines(), 4);

        alloc.release(c).unwrap();
        alloc.release(a).unwrap();
        assert_eq!(alloc.acquire(&mut b).unwrap(), LineId(2));
        assert_eq!(b.num_lines(), 4);
        assert_eq!(alloc.num_created(), 2);
    }

    #[test]
    fn test_out_of_order_release_is_an_error() {
        let mut b = builder();
        let mut alloc = Allocator::new();
        let a = alloc.acquire(&mut b).unwrap();
        let _c = alloc.acquire(&mut b).unwrap();
        let err = alloc.release(a).unwrap_err();
        assert!(matches!(err, SynthesisError::AllocatorInvariant(_)));
        assert!(Allocator::new().release(a).is_err());
    }

    #[test]
    fn test_retained_lines_are_not_reused() {
        let mut b = builder();
        let mut alloc = Allocator::new();
        let a = alloc.acquire(&mut b).unwrap();
        alloc.retain(a).unwrap();
        assert_eq!(alloc.acquire(&mut b).unwrap(), LineId(3));
    }

    #[test]
    fn test_release_to_depth_and_finish() {
        let mut b = builder();
        let mut alloc = Allocator::new();
        let base = alloc.depth();
        alloc.acquire_many(&mut b, 3).unwrap();
        assert!(alloc.finish().is_err());
        alloc.release_to(base).unwrap();
        assert!(alloc.finish().is_ok());
        assert_eq!(alloc.acquire(&mut b).unwrap(), LineId(2));
    }
}
