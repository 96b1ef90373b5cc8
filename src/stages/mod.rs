pub mod stage0_validate;
pub mod stage1_merge;
pub mod stage2_aggregate;
pub mod stage3_render;
pub mod stage_by_person;

pub use stage0_validate::*;
pub use stage1_merge::*;
pub use stage2_aggregate::*;
pub use stage3_render::*;
pub use stage_by_person::*;
