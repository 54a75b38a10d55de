pub mod archive;
pub mod domain;
pub mod form;
pub mod handoff;
pub mod ports;
pub mod push_id;
pub mod render;

pub use domain::{
    ArchiveItem, CaseStudyRecord, Difficulty, GenerateEnvelope, GenerationMetadata,
    GenerationRequest, GenerationResult, QaPair, TimeConstraint, UserId,
};
pub use ports::{
    CaseStudyGenerator, CaseStudyStore, CaseStudySubmitter, IdentityVerifier, PortError,
    PortResult,
};
