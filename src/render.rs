//! Textual form of values held in a cycle.
//!
//! There is exactly one rendering policy: an absent value (`None` when the
//! cycle holds `Option<U>`) is shown as [`ABSENT_PLACEHOLDER`], whether it is
//! displayed on its own or as part of a listing.

use std::fmt;

pub const ABSENT_PLACEHOLDER: &str = "Value does not exist.";

pub trait CellDisplay {
    fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! cell_display_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CellDisplay for $ty {
                fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }
            }
        )*
    };
}

cell_display_via_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String,
);

impl<T: CellDisplay + ?Sized> CellDisplay for &T {
    fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_cell(f)
    }
}

impl<T: CellDisplay> CellDisplay for Option<T> {
    fn fmt_cell(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => value.fmt_cell(f),
            None => f.write_str(ABSENT_PLACEHOLDER),
        }
    }
}

/// Adapter so any [`CellDisplay`] value can be used with `format!`.
pub struct Rendered<'a, T: ?Sized>(pub &'a T);

impl<T: CellDisplay + ?Sized> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_cell(f)
    }
}

pub fn render<T: CellDisplay + ?Sized>(value: &T) -> String {
    Rendered(value).to_string()
}
