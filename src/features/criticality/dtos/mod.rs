mod criticality_dto;

pub use criticality_dto::CriticalityLevelDto;
