use std::collections::BTreeMap;

use crate::continuity::ast::VarSlot;

/// Continuity variables, one set of slots per marcher.
///
/// A slot reads as `None` until it is written for that marcher; the compiler turns such reads
/// into an undefined-variable diagnostic. Values persist across sheets for as long as the
/// environment lives, which is one animation build.
#[derive(Clone, Debug, Default)]
pub struct VariableEnv {
    slots: BTreeMap<usize, [Option<f64>; VarSlot::COUNT]>,
}

impl VariableEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: VarSlot, point: usize) -> Option<f64> {
        self.slots.get(&point).and_then(|s| s[slot.index()])
    }

    pub fn set(&mut self, slot: VarSlot, point: usize, value: f64) {
        self.slots.entry(point).or_insert([None; VarSlot::COUNT])[slot.index()] = Some(value);
    }
}
