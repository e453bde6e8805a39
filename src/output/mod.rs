pub mod formatter;

pub use formatter::{
    format_age, format_explanation, format_ranked_table, format_tsv, get_terminal_width,
    should_use_colors,
};
