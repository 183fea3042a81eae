//! Resource endpoints
//!
//! Each method maps to exactly one API call with a fixed method and path.
//! Optional payload fields are omitted from the body when not supplied.

pub mod campaign;
pub mod message;
pub mod workspace;

pub use campaign::{CampaignApi, CampaignUpdate, NewCampaign};
pub use message::{CampaignMessage, InstantMessage, MessageApi};
pub use workspace::{NewWorkspace, WorkspaceApi, WorkspaceUpdate};
