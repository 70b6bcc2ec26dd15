//! Visibility-blind slot writes.
//!
//! The field accessor refuses unexported fields. Deep duplication has to
//! copy them anyway, so it fills freshly allocated containers through this
//! path instead. Nothing outside the crate can reach it.

use super::{Data, Value};
use crate::errors::{MetaError, MetaResult};
use crate::types::Kind;

impl Value {
    /// Store `source` in slot `index` of a record, array or slice.
    ///
    /// Record slots are written regardless of field visibility. The caller
    /// guarantees `source` already has the slot's type.
    pub(crate) fn force_write(&mut self, index: usize, source: Value) -> MetaResult<()> {
        if matches!(self.data(), Some(Data::Slice(None))) {
            return Err(MetaError::NilWrite {
                type_name: self.type_name(),
            });
        }

        let kind = self.kind();
        match self.data_mut() {
            Some(Data::Struct(slots) | Data::Array(slots)) => write_slot(slots, index, source),
            Some(Data::Slice(Some(storage))) => {
                write_slot(storage.write().as_mut_slice(), index, source)
            }
            _ => Err(MetaError::UnexpectedKind {
                expected: Kind::Struct,
                got: kind,
            }),
        }
    }
}

fn write_slot(slots: &mut [Value], index: usize, source: Value) -> MetaResult<()> {
    let len = slots.len();
    let slot = slots
        .get_mut(index)
        .ok_or(MetaError::IndexOutOfRange { index, len })?;
    debug_assert!(
        slot.ty() == source.ty(),
        "slot of type {} written with {}",
        slot.type_name(),
        source.type_name()
    );
    *slot = source;
    Ok(())
}

#[cfg(test)]
mod tests;
