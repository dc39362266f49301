mod merge_adjacent_roles;
mod sanitize_tool_ids;

pub use merge_adjacent_roles::MergeAdjacentRoles;
pub use sanitize_tool_ids::SanitizeToolIds;
