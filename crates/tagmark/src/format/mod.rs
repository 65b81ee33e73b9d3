//! Value formatting helpers shared by the tag handlers.
//!
//! - [`get_attribute`]: attributes that may point at a record field
//! - [`enclose`]: helper and filter post-processing plus HTML wrapping
//! - [`format_date`]: PHP-style date formatting with translated names
//! - [`auto_link`]: linking of bare URLs and e-mail addresses
//! - [`show_tag_error`]: the inline error block for misused tags

mod autolink;
mod date;
mod enclose;
mod filters;
mod tag_error;

pub use autolink::auto_link;
pub use date::{format_date, format_php, parse_date, DEFAULT_DATE_FORMAT};
pub use enclose::{enclose, get_attribute};
pub use filters::{
    character_limiter, escape_html, strip_tags, ucfirst, ucwords, url_title, urlencode,
    word_limiter, Filter, FilterRegistry,
};
pub use tag_error::show_tag_error;
