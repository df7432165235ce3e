pub mod anchor;
pub mod cancel;
pub mod candidate;
pub mod launch;
pub mod orchestrator;
pub mod ports;
pub mod scanner;
