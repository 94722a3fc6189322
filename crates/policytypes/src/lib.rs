//! policytypes — extract Firefox `nsContentPolicyType` constants from IDL and render them as generated source.

pub mod extract;
pub mod render;
pub mod types;

pub use extract::{check_ordinals, declaration_regex, extract_constants, DECLARATION_PATTERN};
pub use render::{render, render_list, render_to_string};
pub use types::*;
