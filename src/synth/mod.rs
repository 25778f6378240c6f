// Purpose: the contract voices render against, and realtime control of the
// effects that process their output

pub mod message;
pub mod processor;
pub mod voice;
