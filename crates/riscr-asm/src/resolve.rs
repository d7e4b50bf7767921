//! Two-pass label resolution.
//!
//! Labels have no declaration syntax: a label name shows up as the target of
//! exactly two branches. The first branch (at offset `A`) declares it, the
//! second (at `B`) completes it. Each use's displacement is measured from the
//! end of its own 4-byte instruction:
//!
//! | table state            | set when                 | value            | lands at |
//! |------------------------|--------------------------|------------------|----------|
//! | `Declared { at }`      | pass 1, first sighting   | `A`              | -        |
//! | `Forward { distance }` | pass 1, second sighting  | `B - A - 4`      | `B`      |
//! | `Backward { distance }`| pass 2, forward consumed | `-(B - A - 4) - 4` | `A + 4` |
//!
//! So the declaring branch jumps forward onto the completing one, and the
//! completing branch jumps back to the instruction right after the declaring
//! one. That is the rotated loop:
//!
//! ```text
//!     JMP loop          ; enter at the test
//!     ...body...        ; <- back edge lands here
//!     JNE t0, a0, loop  ; <- forward edge lands here
//! ```

use std::collections::BTreeMap;

use riscr::decoder::OpFlags;
use tracing::debug;

use crate::encode::{Record, Tail, Target};
use crate::error::AsmError;

/// Width of the branch instruction a label distance is measured across.
const BRANCH_WIDTH: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    Declared { at: u32 },
    Forward { distance: i32 },
    Backward { distance: i32 },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelTable {
    entries: BTreeMap<String, LabelState>,
}

impl LabelTable {
    pub fn get(&self, name: &str) -> Option<LabelState> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pass 1: record a use of `name` by the branch at `offset`.
    pub fn sight(&mut self, line: usize, name: &str, offset: u32) -> Result<(), AsmError> {
        let next = match self.entries.get(name) {
            None => LabelState::Declared { at: offset },
            Some(LabelState::Declared { at }) => LabelState::Forward {
                distance: offset as i32 - *at as i32 - BRANCH_WIDTH,
            },
            Some(_) => {
                return Err(AsmError::LabelReused {
                    line,
                    name: name.to_string(),
                })
            }
        };
        self.entries.insert(name.to_string(), next);
        Ok(())
    }

    /// Pass 2: hand out the current distance for `name` and flip direction.
    pub fn consume(&mut self, line: usize, name: &str) -> Result<i16, AsmError> {
        let (distance, next) = match self.entries.get(name) {
            Some(LabelState::Forward { distance }) => (
                *distance,
                LabelState::Backward {
                    distance: -*distance - BRANCH_WIDTH,
                },
            ),
            Some(LabelState::Backward { distance }) => (
                *distance,
                LabelState::Forward {
                    distance: -*distance - BRANCH_WIDTH,
                },
            ),
            Some(LabelState::Declared { .. }) | None => {
                return Err(AsmError::DanglingLabel {
                    line,
                    name: name.to_string(),
                })
            }
        };
        let disp = i16::try_from(distance).map_err(|_| AsmError::DisplacementOutOfRange {
            line,
            name: name.to_string(),
            distance,
        })?;
        self.entries.insert(name.to_string(), next);
        Ok(disp)
    }
}

/// Pass 1: walk the records with a running byte offset and fill the label table.
pub fn accumulate(records: &[Record]) -> Result<LabelTable, AsmError> {
    let mut table = LabelTable::default();
    let mut offset = 0u32;
    for rec in records {
        if let Some(name) = rec.label() {
            table.sight(rec.line, name, offset)?;
        }
        offset += rec.width();
    }
    debug!(labels = table.len(), bytes = offset, "label pass 1 done");
    Ok(table)
}

/// Pass 2: replace every label placeholder with its displacement.
pub fn resolve(records: &mut [Record], table: &mut LabelTable) -> Result<(), AsmError> {
    for rec in records.iter_mut() {
        let Some(name) = rec.label().map(str::to_string) else {
            continue;
        };
        let disp = table.consume(rec.line, &name)?;
        debug!(label = %name, line = rec.line, disp, "resolved");
        rec.tail = Tail::Target(Target::Resolved(disp));
    }
    Ok(())
}

/// Set RETRO on every record whose predecessor is 4 bytes long.
pub fn mark_retro(records: &mut [Record]) {
    for i in 1..records.len() {
        if records[i - 1].width() == 4 {
            records[i].opcode |= OpFlags::RETRO.bits();
        }
    }
}
