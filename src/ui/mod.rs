pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, section, success};
pub use table::{key_table, record_table};
pub use theme::{theme, Theme};
