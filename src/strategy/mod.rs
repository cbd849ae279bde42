//! Concrete hook tables.
pub mod columns;
pub mod identity;
pub mod nullable;

use crate::mapper::{Mapper, Strategy};

/// Named strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyKind {
    /// rebuild the tree unchanged in shape
    Identity,
    /// collapse `[T, "null"]` type lists to `T`
    Nullable,
    /// drop object/array properties, keeping scalar columns
    Columns,
}

impl StrategyKind {
    pub fn strategy(self) -> Strategy {
        match self {
            StrategyKind::Identity => Strategy::identity(),
            StrategyKind::Nullable => nullable::strategy(),
            StrategyKind::Columns => columns::strategy(),
        }
    }

    pub fn mapper(self) -> Mapper {
        Mapper::new(self.strategy())
    }
}
