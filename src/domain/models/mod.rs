mod content_type;
mod object_metadata;

pub use content_type::{content_type_for_name, content_type_for_path};
pub use object_metadata::ObjectMetadata;
