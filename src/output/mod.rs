pub mod formatter;

pub use formatter::{
    format_chance, format_comparables_table, format_currency, format_explanation,
    format_probability, format_school_list, should_use_colors,
};
