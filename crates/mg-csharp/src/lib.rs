//! C# emission for the reactive member generator: notifying properties, command adapters
//! and the rendering of generated units.

pub mod attributes;
pub mod command;
pub mod config;
pub mod notification;
pub mod property;
pub mod render;
pub mod usings;
pub mod writer;

use std::sync::Arc;

use mg_core::oracle::SymbolOracle;
use mg_core::{EmitterRegistry, Generator};

pub use command::{validate_command, CommandDescriptor, CommandEmitter};
pub use config::{LineEnding, PrinterConfig};
pub use property::NotifyPropertyEmitter;
pub use render::render_unit;

/// The emitters every C# generation pass runs, in order.
pub fn default_registry() -> EmitterRegistry {
    EmitterRegistry::new()
        .with(Arc::new(NotifyPropertyEmitter))
        .with(Arc::new(CommandEmitter))
}

pub fn generator(oracle: Arc<dyn SymbolOracle>) -> Generator {
    Generator::new(default_registry(), oracle)
}
