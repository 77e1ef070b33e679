pub mod in_memory;

pub use in_memory::{
    InMemoryAksjonspunktRepository, InMemoryJournalpostRepository, InMemoryMappeRepository,
    InMemorySoknadRepository,
};
