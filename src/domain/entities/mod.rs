//! Domain Entities

pub mod descriptor;
pub mod workspace_root;

pub use descriptor::{
    normalize_name, DeployOnSave, Descriptor, DescriptorKind, Package, PackageKind, Target,
    TargetKind,
};
pub use workspace_root::{WorkspaceId, WorkspaceRoot};
