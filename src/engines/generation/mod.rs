pub mod genome;
pub mod decoder;
pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use genome::{Gene, GeneKind, Genotype, GenotypeLayout};
pub use decoder::Decoder;
pub use evolution_engine::{EvolutionEngine, EvolutionResult, GenerationSummary, ProgressCallback};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage, SilentProgressCallback};
