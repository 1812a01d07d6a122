mod sanitize;

pub use sanitize::Sanitize;
